use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use ragchat_core::{update, AppState, ChatPolicy, Msg, SessionId};
use ragchat_logging::{rag_debug, rag_info};

use super::cli::Cli;
use super::effects::{EffectRunner, EffectSink};
use super::persistence;
use super::ui::commands::{parse_line, InputCommand, HELP_LINES};
use super::ui::render::TerminalRenderer;

/// Everything the main loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Core(Msg),
    ShowSession,
    Help,
    Quit,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    ragchat_logging::initialize(cli.log_destination(), cli.log_level(), &cli.log_file);
    rag_info!("Starting ragchat against {}", cli.backend_url);

    let session_id = persistence::load_session_id(&cli.data_dir);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(cli.backend_settings(), event_tx.clone())
        .with_context(|| format!("cannot use backend at {}", cli.backend_url))?;

    let mut app = ChatApp::new(cli.chat_policy(), runner, io::stdout());
    app.start(session_id)?;
    spawn_input_reader(event_tx);

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Core(msg) => app.dispatch(msg)?,
            AppEvent::ShowSession => app.show_session()?,
            AppEvent::Help => app.print_lines(HELP_LINES.iter().copied())?,
            AppEvent::Quit => break,
        }
    }

    rag_info!("ragchat exiting");
    Ok(())
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let command = parse_line(&line);
            let quit = command == InputCommand::Quit;
            for event in command.into_events() {
                if event_tx.send(event).is_err() {
                    return;
                }
            }
            if quit {
                return;
            }
        }
        rag_debug!("stdin closed");
        let _ = event_tx.send(AppEvent::Quit);
    });
}

/// Owns the state machine and pushes each update through effects and rendering.
pub(crate) struct ChatApp<E, W> {
    state: AppState,
    effects: E,
    renderer: TerminalRenderer,
    out: W,
}

impl<E: EffectSink, W: Write> ChatApp<E, W> {
    pub(crate) fn new(policy: ChatPolicy, effects: E, out: W) -> Self {
        Self {
            state: AppState::with_policy(policy),
            effects,
            renderer: TerminalRenderer::new(),
            out,
        }
    }

    pub(crate) fn start(&mut self, session_id: SessionId) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, Msg::SessionLoaded(session_id));
        state.consume_dirty();
        let header = self.renderer.header(&state.view());
        self.state = state;
        self.effects.enqueue(effects);
        self.print_lines(header.iter().map(String::as_str))?;
        self.print_lines(["Type /help for commands."])
    }

    pub(crate) fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let alert = state.take_alert();
        let view = state.consume_dirty().then(|| state.view());
        self.state = state;

        self.effects.enqueue(effects);

        if let Some(alert) = alert {
            writeln!(self.out, "! {alert}")?;
        }
        if let Some(view) = view {
            let lines = self.renderer.render(&view);
            self.print_lines(lines.iter().map(String::as_str))?;
        }
        self.out.flush()
    }

    pub(crate) fn show_session(&mut self) -> io::Result<()> {
        let line = match self.state.session_id() {
            Some(id) => format!("Session: {id}"),
            None => "Session: (initializing)".to_string(),
        };
        self.print_lines([line.as_str()])
    }

    pub(crate) fn print_lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}
