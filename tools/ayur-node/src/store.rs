//! File-backed session persistence: one JSON record at a well-known path.
//! A missing or unreadable file simply means "no active session".

use std::path::PathBuf;

use ayur_registry::session::{Session, SessionStore};

pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        let cache = dirs::cache_dir().unwrap_or_else(|| PathBuf::from("/tmp"));
        cache.join("ayur").join("session.json")
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let data = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&data).ok()
    }

    fn save(&mut self, session: &Session) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), error = %e, "failed to create session dir");
                return;
            }
        }
        match serde_json::to_string_pretty(session) {
            Ok(data) => {
                if let Err(e) = std::fs::write(&self.path, data) {
                    tracing::warn!(path = %self.path.display(), error = %e, "failed to write session");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize session"),
        }
    }

    fn clear(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to clear session");
            }
        }
    }
}
