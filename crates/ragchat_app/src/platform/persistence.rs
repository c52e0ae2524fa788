use std::collections::BTreeMap;
use std::path::Path;

use ragchat_core::{obtain_session_id, SessionId, SessionStore, SessionStoreError};
use ragchat_engine::DataDir;
use ragchat_logging::{rag_info, rag_warn};
use serde::{Deserialize, Serialize};

const SESSION_FILENAME: &str = "session.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedEntries {
    entries: BTreeMap<String, String>,
}

/// Key-value session store backed by `{data_dir}/session.ron`.
pub(crate) struct FileSessionStore {
    data: DataDir,
}

impl FileSessionStore {
    pub(crate) fn new(data_dir: &Path) -> Self {
        Self {
            data: DataDir::new(data_dir),
        }
    }

    fn load(&self) -> Result<PersistedEntries, SessionStoreError> {
        let content = match self.data.read(SESSION_FILENAME) {
            Ok(Some(text)) => text,
            Ok(None) => return Ok(PersistedEntries::default()),
            Err(err) => return Err(SessionStoreError::Read(err.to_string())),
        };

        match ron::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                // The file is rewritten on the next put.
                rag_warn!(
                    "Ignoring unreadable session file in {:?}: {}",
                    self.data.path(),
                    err
                );
                Ok(PersistedEntries::default())
            }
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(self.load()?.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        let mut persisted = self.load()?;
        persisted.entries.insert(key.to_string(), value.to_string());

        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(&persisted, pretty)
            .map_err(|err| SessionStoreError::Write(err.to_string()))?;
        self.data
            .write(SESSION_FILENAME, &content)
            .map_err(|err| SessionStoreError::Write(err.to_string()))?;
        Ok(())
    }
}

/// Obtain the durable session id, falling back to a process-lifetime id when storage fails.
pub(crate) fn load_session_id(data_dir: &Path) -> SessionId {
    let mut store = FileSessionStore::new(data_dir);
    match obtain_session_id(&mut store) {
        Ok(id) => {
            rag_info!("Using session {} from {:?}", id.short(), data_dir);
            id
        }
        Err(err) => {
            let id = SessionId::generate();
            rag_warn!(
                "Session storage in {:?} unavailable ({}); using ephemeral session {}",
                data_dir,
                err,
                id.short()
            );
            id
        }
    }
}
