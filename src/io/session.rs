use std::fs;
use std::path::{Path, PathBuf};

use super::atomic_write;
use super::store::StoreError;
use crate::model::User;
use crate::service::{Auth, ServiceError};

/// Session persisted as session.json in the data directory
pub struct LocalAuth {
    data_dir: PathBuf,
}

impl LocalAuth {
    pub fn new(data_dir: &Path) -> Self {
        LocalAuth {
            data_dir: data_dir.to_path_buf(),
        }
    }

    fn path(&self) -> PathBuf {
        self.data_dir.join("session.json")
    }
}

impl Auth for LocalAuth {
    fn current_user(&self) -> Result<Option<User>, ServiceError> {
        let path = self.path();
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Read { path, source: e }.into()),
        };
        match serde_json::from_str(&text) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                // An unreadable session is a logged-out session
                tracing::warn!(path = %path.display(), error = %e, "discarding corrupt session");
                Ok(None)
            }
        }
    }

    fn login(&self, user: User) -> Result<User, ServiceError> {
        if user.name.trim().is_empty() {
            return Err(ServiceError::MissingField("user name"));
        }
        let path = self.path();
        fs::create_dir_all(&self.data_dir).map_err(|e| StoreError::Write {
            path: self.data_dir.clone(),
            source: e,
        })?;
        let json = serde_json::to_string_pretty(&user).map_err(StoreError::from)?;
        atomic_write(&path, json.as_bytes()).map_err(|e| StoreError::Write { path, source: e })?;
        tracing::info!(user = %user.name, "logged in");
        Ok(user)
    }

    fn logout(&self) -> Result<(), ServiceError> {
        let path = self.path();
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("logged out");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Write { path, source: e }.into()),
        }
    }
}
