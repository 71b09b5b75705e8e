use anyhow::{bail, Result};
use clap::Args;
use rolodex_storage::DEFAULT_STORAGE_KEY;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const CONFIG_RELATIVE_PATH: &str = ".rolodex/config.json";
const DATA_DIR_ENV: &str = "ROLODEX_DATA_DIR";

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Directory holding persisted collections
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Keep everything in memory for this run
    #[arg(long, global = true)]
    pub ephemeral: bool,
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RolodexConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub storage_key: Option<String>,
    #[serde(default)]
    pub default_deadlines: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub storage_key: String,
    pub default_deadlines: BTreeMap<String, String>,
    pub ephemeral: bool,
}

impl Settings {
    pub fn resolve(args: &GlobalArgs) -> Result<Self> {
        let root = std::env::current_dir()?;
        let config = load_config(&root, dirs::home_dir().as_deref()).unwrap_or_default();
        let env_dir = std::env::var(DATA_DIR_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        Self::from_sources(args, config, env_dir, &root)
    }

    fn from_sources(
        args: &GlobalArgs,
        config: RolodexConfig,
        env_dir: Option<PathBuf>,
        root: &Path,
    ) -> Result<Self> {
        let data_dir = args
            .data_dir
            .clone()
            .or(env_dir)
            .or(config.data_dir)
            .or_else(|| dirs::data_dir().map(|dir| dir.join("rolodex")))
            .unwrap_or_else(|| root.join(".rolodex"));
        let storage_key = config
            .storage_key
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.trim().is_empty() {
            bail!("storageKey cannot be empty");
        }
        Ok(Self {
            data_dir,
            storage_key,
            default_deadlines: config.default_deadlines,
            ephemeral: args.ephemeral,
        })
    }
}

/// Project config wins over the one in the home directory. A file that
/// fails to parse is reported and skipped.
pub fn load_config(root: &Path, home: Option<&Path>) -> Option<RolodexConfig> {
    let project = root.join(CONFIG_RELATIVE_PATH);
    let candidate = if project.exists() {
        project
    } else {
        home?.join(CONFIG_RELATIVE_PATH)
    };

    let content = fs::read_to_string(&candidate).ok()?;
    match serde_json::from_str::<RolodexConfig>(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            warn!(event = "config_parse_failed", path = %candidate.display(), error = %err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) {
        let path = dir.join(CONFIG_RELATIVE_PATH);
        fs::create_dir_all(path.parent().expect("config parent")).expect("create config dir");
        fs::write(path, content).expect("write config");
    }

    #[test]
    fn project_config_takes_precedence_over_home() {
        let project = TempDir::new().expect("project dir");
        let home = TempDir::new().expect("home dir");
        write_config(project.path(), r#"{"storageKey": "project"}"#);
        write_config(home.path(), r#"{"storageKey": "home"}"#);

        let config = load_config(project.path(), Some(home.path())).expect("config");
        assert_eq!(config.storage_key.as_deref(), Some("project"));
    }

    #[test]
    fn falls_back_to_home_and_skips_malformed() {
        let project = TempDir::new().expect("project dir");
        let home = TempDir::new().expect("home dir");
        write_config(
            home.path(),
            r#"{"dataDir": "/tmp/rolodex", "defaultDeadlines": {"Lazard": "2025-10-01"}}"#,
        );
        let config = load_config(project.path(), Some(home.path())).expect("home config");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/rolodex")));
        assert_eq!(
            config.default_deadlines.get("Lazard").map(String::as_str),
            Some("2025-10-01")
        );

        write_config(project.path(), "{ not json");
        assert!(load_config(project.path(), Some(home.path())).is_none());
    }

    #[test]
    fn flag_beats_env_beats_config() {
        let root = Path::new("/work");
        let config = || RolodexConfig {
            data_dir: Some(PathBuf::from("/from-config")),
            ..RolodexConfig::default()
        };
        let args = GlobalArgs {
            data_dir: Some(PathBuf::from("/from-flag")),
            ..GlobalArgs::default()
        };

        let settings = Settings::from_sources(&args, config(), Some(PathBuf::from("/from-env")), root)
            .expect("settings");
        assert_eq!(settings.data_dir, PathBuf::from("/from-flag"));

        let settings = Settings::from_sources(
            &GlobalArgs::default(),
            config(),
            Some(PathBuf::from("/from-env")),
            root,
        )
        .expect("settings");
        assert_eq!(settings.data_dir, PathBuf::from("/from-env"));

        let settings =
            Settings::from_sources(&GlobalArgs::default(), config(), None, root).expect("settings");
        assert_eq!(settings.data_dir, PathBuf::from("/from-config"));
        assert_eq!(settings.storage_key, DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn empty_storage_key_is_rejected() {
        let config = RolodexConfig {
            storage_key: Some("  ".to_string()),
            ..RolodexConfig::default()
        };
        assert!(Settings::from_sources(&GlobalArgs::default(), config, None, Path::new("/")).is_err());
    }
}
