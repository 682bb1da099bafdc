use crate::ports::{RegistrationStore, StoreError};
use crate::types::matches::MatchId;
use crate::types::push::Registration;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Default, Serialize, Deserialize)]
struct RegistrationFile {
    #[serde(default)]
    registrations: Vec<Registration>,
}

/// Registrations kept in memory and, when a path is given, mirrored to a
/// TOML file that is rewritten after every change.
#[derive(Debug)]
pub struct FileRegistrationStore {
    path: Option<PathBuf>,
    registrations: Mutex<Vec<Registration>>,
}

impl FileRegistrationStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            registrations: Mutex::new(Vec::new()),
        }
    }

    /// Loads `path` if it exists; a missing file starts an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let registrations = match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str::<RegistrationFile>(&contents)?.registrations,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(err.into()),
        };
        tracing::info!(
            path = %path.display(),
            count = registrations.len(),
            "loaded push registrations"
        );
        Ok(Self {
            path: Some(path),
            registrations: Mutex::new(registrations),
        })
    }

    fn persist(&self, registrations: &[Registration]) -> Result<(), StoreError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let contents = toml::to_string(&RegistrationFile {
            registrations: registrations.to_vec(),
        })?;
        write_atomically(path, &contents)?;
        Ok(())
    }

    fn mutate<R>(
        &self,
        change: impl FnOnce(&mut Vec<Registration>) -> R,
    ) -> Result<R, StoreError> {
        let mut registrations = self.registrations.lock().expect("registrations lock");
        let mut updated = registrations.clone();
        let result = change(&mut updated);
        self.persist(&updated)?;
        *registrations = updated;
        Ok(result)
    }
}

fn write_atomically(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)
}

impl RegistrationStore for FileRegistrationStore {
    fn list(&self, match_id: &MatchId) -> Result<Vec<Registration>, StoreError> {
        let registrations = self.registrations.lock().expect("registrations lock");
        Ok(registrations
            .iter()
            .filter(|registration| &registration.match_id == match_id)
            .cloned()
            .collect())
    }

    fn find(
        &self,
        match_id: &MatchId,
        device_id: &str,
    ) -> Result<Option<Registration>, StoreError> {
        let registrations = self.registrations.lock().expect("registrations lock");
        Ok(registrations
            .iter()
            .find(|registration| {
                &registration.match_id == match_id && registration.device_id == device_id
            })
            .cloned())
    }

    fn upsert(&self, registration: Registration) -> Result<(), StoreError> {
        self.mutate(|registrations| {
            let existing = registrations.iter_mut().find(|existing| {
                existing.match_id == registration.match_id
                    && existing.device_id == registration.device_id
            });
            match existing {
                Some(existing) => *existing = registration,
                None => registrations.push(registration),
            }
        })
    }

    fn remove(&self, match_id: &MatchId, device_id: &str) -> Result<bool, StoreError> {
        self.mutate(|registrations| {
            let before = registrations.len();
            registrations.retain(|registration| {
                !(&registration.match_id == match_id && registration.device_id == device_id)
            });
            registrations.len() != before
        })
    }

    fn remove_endpoint(&self, match_id: &MatchId, endpoint: &str) -> Result<usize, StoreError> {
        self.mutate(|registrations| {
            let before = registrations.len();
            registrations.retain(|registration| {
                !(&registration.match_id == match_id
                    && registration.subscription.endpoint == endpoint)
            });
            before - registrations.len()
        })
    }
}
