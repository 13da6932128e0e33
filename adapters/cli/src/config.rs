//! Optional TOML configuration file merged beneath command-line flags.

use std::{
    fs,
    path::{Path, PathBuf},
};

use bastion_core::Difficulty;
use serde::Deserialize;
use thiserror::Error;

/// Default location of the high-score file.
pub(crate) const DEFAULT_SCORES_PATH: &str = "bastion-scores.json";

/// Default seed for the spawn generator.
pub(crate) const DEFAULT_SEED: u64 = 0x4d59_5df4_d0f3_3173;

/// Failure while loading the configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Values accepted in the configuration file; every key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) seed: Option<u64>,
    pub(crate) scores: Option<PathBuf>,
    pub(crate) vsync: Option<bool>,
    pub(crate) show_fps: Option<bool>,
}

impl FileConfig {
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Fully resolved runtime settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) difficulty: Difficulty,
    pub(crate) seed: u64,
    pub(crate) scores: PathBuf,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

/// Command-line values that override the file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) seed: Option<u64>,
    pub(crate) scores: Option<PathBuf>,
    pub(crate) vsync: Option<bool>,
    pub(crate) show_fps: bool,
}

impl Settings {
    /// Resolves flags over file values over built-in defaults.
    pub(crate) fn resolve(overrides: Overrides, file: FileConfig) -> Self {
        Self {
            difficulty: overrides
                .difficulty
                .or(file.difficulty)
                .unwrap_or_default(),
            seed: overrides.seed.or(file.seed).unwrap_or(DEFAULT_SEED),
            scores: overrides
                .scores
                .or(file.scores)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORES_PATH)),
            vsync: overrides.vsync.or(file.vsync).unwrap_or(true),
            show_fps: overrides.show_fps || file.show_fps.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let file = FileConfig::parse("").expect("empty toml is valid");
        let settings = Settings::resolve(Overrides::default(), file);
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(settings.seed, DEFAULT_SEED);
        assert_eq!(settings.scores, PathBuf::from(DEFAULT_SCORES_PATH));
        assert!(settings.vsync);
        assert!(!settings.show_fps);
    }

    #[test]
    fn flags_take_precedence_over_file_values() {
        let file = FileConfig::parse(
            r#"
            difficulty = "hard"
            seed = 7
            scores = "from-file.json"
            vsync = false
            "#,
        )
        .expect("valid config");
        let settings = Settings::resolve(
            Overrides {
                difficulty: Some(Difficulty::Easy),
                scores: Some(PathBuf::from("flag.json")),
                ..Overrides::default()
            },
            file,
        );
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.seed, 7);
        assert_eq!(settings.scores, PathBuf::from("flag.json"));
        assert!(!settings.vsync);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::parse("speed = 3").is_err());
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = FileConfig::load(Path::new("definitely/not/here.toml"))
            .expect_err("missing file must fail");
        assert!(error.to_string().contains("definitely/not/here.toml"));
    }
}
