//! High-score persistence in a small JSON document.

use std::{
    ffi::{OsStr, OsString},
    fs::{self, File},
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};

use bastion_core::HighScores;
use bastion_system_scoreboard::{ScoreStore, StoreError};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(rename = "highScores")]
    high_scores: HighScores,
}

/// Stores the table under the `highScores` key of a JSON file.
#[derive(Clone, Debug)]
pub(crate) struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Hidden sibling the table is written to before it replaces the target.
    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_else(|| OsStr::new("scores")));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<HighScores, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no high-score file yet");
                return Ok(HighScores::default());
            }
            Err(error) => return Err(StoreError::Io(error)),
        };
        let document: Document = serde_json::from_str(&contents)
            .map_err(|error| StoreError::Malformed(error.to_string()))?;
        Ok(document.high_scores)
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), StoreError> {
        let document = Document {
            high_scores: scores.clone(),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|error| StoreError::Malformed(error.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        // The previous file is only replaced once the new table is fully on disk.
        let staging = self.staging_path();
        if let Err(error) =
            write_synced(&staging, json.as_bytes()).and_then(|()| fs::rename(&staging, &self.path))
        {
            let _ = fs::remove_file(&staging);
            return Err(StoreError::Io(error));
        }
        debug!(path = %self.path.display(), "high scores saved");
        Ok(())
    }
}
