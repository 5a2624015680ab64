//! Where the data file and CSV files live.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

pub const DATA_ENV_VAR: &str = "EVENTBOOK_DATA";
pub const DEFAULT_IMPORT_PATH: &str = "import/import.csv";
pub const DEFAULT_EXPORT_PATH: &str = "export/export.csv";

const APP_DIR: &str = "eventbook";
const DATA_FILE: &str = "eventbook.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub import_path: PathBuf,
    pub export_path: PathBuf,
}

impl Config {
    /// Flag beats `EVENTBOOK_DATA`, which beats the platform data dir.
    pub fn load(data_flag: Option<PathBuf>) -> Result<Self> {
        let env_path = env::var_os(DATA_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve(data_flag, env_path, dirs::data_dir().as_deref())
    }

    fn resolve(
        data_flag: Option<PathBuf>,
        env_path: Option<PathBuf>,
        data_dir: Option<&Path>,
    ) -> Result<Self> {
        let data_path = match data_flag.or(env_path) {
            Some(path) => path,
            None => data_dir
                .map(|dir| dir.join(APP_DIR).join(DATA_FILE))
                .ok_or_else(|| {
                    anyhow!(
                        "Could not determine data directory. Pass --data or set {DATA_ENV_VAR}."
                    )
                })?,
        };
        Ok(Self {
            data_path,
            import_path: PathBuf::from(DEFAULT_IMPORT_PATH),
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins() {
        let config = Config::resolve(
            Some(PathBuf::from("flag.json")),
            Some(PathBuf::from("env.json")),
            Some(Path::new("/data")),
        )
        .unwrap();
        assert_eq!(config.data_path, PathBuf::from("flag.json"));
    }

    #[test]
    fn test_env_beats_data_dir() {
        let env_path = Some(PathBuf::from("env.json"));
        let config = Config::resolve(None, env_path, Some(Path::new("/data"))).unwrap();
        assert_eq!(config.data_path, PathBuf::from("env.json"));
    }

    #[test]
    fn test_data_dir_default() {
        let config = Config::resolve(None, None, Some(Path::new("/data"))).unwrap();
        assert_eq!(config.data_path, Path::new("/data").join("eventbook").join("eventbook.json"));
        assert_eq!(config.import_path, PathBuf::from("import/import.csv"));
        assert_eq!(config.export_path, PathBuf::from("export/export.csv"));
    }

    #[test]
    fn test_no_location_is_error() {
        assert!(Config::resolve(None, None, None).is_err());
    }
}
