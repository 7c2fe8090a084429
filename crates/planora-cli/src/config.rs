//! Configuration file management for planora.
//!
//! Provides a TOML-based config file at `~/.config/planora/config.toml` and a
//! resolution chain for plan defaults: CLI flag > env var > config file >
//! built-in default.

use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use planora_core::document::DEFAULT_COURSE_TYPE;
use planora_core::{ExamType, PlanOptions, PlanRequest};

pub const DEFAULT_PLAN_LENGTH: u32 = 14;
pub const DEFAULT_HOURS_PER_DAY: f64 = 2.0;

const ENV_PLAN_LENGTH: &str = "PLANORA_PLAN_LENGTH";
const ENV_HOURS_PER_DAY: &str = "PLANORA_HOURS_PER_DAY";
const ENV_EXAM_TYPE: &str = "PLANORA_EXAM_TYPE";
const ENV_REVIEW_DAY_FRACTION: &str = "PLANORA_REVIEW_DAY_FRACTION";
const ENV_COURSE_TYPE: &str = "PLANORA_COURSE_TYPE";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: DefaultsSection,
}

/// Plan settings used when neither a flag nor an env var provides one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsSection {
    pub plan_length: u32,
    pub hours_per_day: f64,
    pub exam_type: ExamType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_day_fraction: Option<f64>,
    pub course_type: String,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            plan_length: DEFAULT_PLAN_LENGTH,
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            exam_type: ExamType::Final,
            review_day_fraction: None,
            course_type: DEFAULT_COURSE_TYPE.to_string(),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the planora config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/planora` or `~/.config/planora`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("planora");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("planora")
}

/// Return the path to the planora config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))
}

/// Load the config file if one exists. A present but malformed file is an
/// error.
pub fn load_config_if_present() -> Result<Option<ConfigFile>> {
    if config_path().exists() {
        load_config().map(Some)
    } else {
        Ok(None)
    }
}

fn parse_config(contents: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(contents)?)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Plan settings given on the command line. `None` defers to the next
/// layer of the chain.
#[derive(Debug, Default, Clone)]
pub struct PlanOverrides {
    pub plan_length: Option<u32>,
    pub hours_per_day: Option<f64>,
    pub exam_type: Option<ExamType>,
    pub review_day_fraction: Option<f64>,
    pub course_type: Option<String>,
}

/// Fully resolved plan settings, ready for use.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanoraConfig {
    pub plan_length: u32,
    pub hours_per_day: f64,
    pub exam_type: ExamType,
    pub review_day_fraction: Option<f64>,
    pub course_type: String,
}

impl PlanoraConfig {
    /// Resolve settings using the chain: CLI flag > env var > config file > default.
    pub fn resolve(cli: &PlanOverrides) -> Result<Self> {
        let file = load_config_if_present()?.map(|c| c.defaults);
        Self::resolve_with(cli, file.unwrap_or_default())
    }

    /// Resolve against an already-loaded `[defaults]` table.
    ///
    /// A malformed env value is an error, except `PLANORA_REVIEW_DAY_FRACTION`,
    /// which counts as unset when it is not a number.
    pub fn resolve_with(cli: &PlanOverrides, file: DefaultsSection) -> Result<Self> {
        let plan_length = match cli.plan_length {
            Some(v) => v,
            None => env_parsed(ENV_PLAN_LENGTH)?.unwrap_or(file.plan_length),
        };
        let hours_per_day = match cli.hours_per_day {
            Some(v) => v,
            None => env_parsed(ENV_HOURS_PER_DAY)?.unwrap_or(file.hours_per_day),
        };
        let exam_type = match cli.exam_type {
            Some(v) => v,
            None => env_parsed(ENV_EXAM_TYPE)?.unwrap_or(file.exam_type),
        };
        let review_day_fraction = cli
            .review_day_fraction
            .or_else(|| env_var(ENV_REVIEW_DAY_FRACTION).and_then(|v| v.parse().ok()))
            .or(file.review_day_fraction);
        let course_type = cli
            .course_type
            .clone()
            .or_else(|| env_var(ENV_COURSE_TYPE))
            .unwrap_or(file.course_type);

        Ok(Self {
            plan_length,
            hours_per_day,
            exam_type,
            review_day_fraction,
            course_type,
        })
    }

    pub fn request(&self) -> PlanRequest {
        PlanRequest::new(self.plan_length, self.hours_per_day, self.exam_type)
            .with_review_day_fraction(self.review_day_fraction)
    }

    pub fn plan_options(&self) -> PlanOptions {
        let mut options = PlanOptions::new(self.request());
        options.course_type = self.course_type.clone();
        options
    }
}

/// Non-empty, trimmed value of an env var.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parsed<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    env_var(name)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| anyhow::anyhow!("invalid {name} value {raw:?}: {e}"))
        })
        .transpose()
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_env() -> std::sync::MutexGuard<'static, ()> {
        crate::test_util::lock_env()
    }

    fn clear_planora_env() {
        for name in [
            ENV_PLAN_LENGTH,
            ENV_HOURS_PER_DAY,
            ENV_EXAM_TYPE,
            ENV_REVIEW_DAY_FRACTION,
            ENV_COURSE_TYPE,
        ] {
            unsafe { std::env::remove_var(name) };
        }
    }

    #[test]
    fn config_file_roundtrip() {
        let original = ConfigFile {
            defaults: DefaultsSection {
                plan_length: 21,
                hours_per_day: 1.5,
                exam_type: ExamType::RegularTest,
                review_day_fraction: Some(0.1),
                course_type: "Biology".to_string(),
            },
        };
        let contents = toml::to_string_pretty(&original).unwrap();
        let loaded = parse_config(&contents).unwrap();
        assert_eq!(loaded.defaults, original.defaults);
    }

    #[test]
    fn partial_defaults_table_fills_builtins() {
        let loaded = parse_config("[defaults]\nplan_length = 10\n").unwrap();
        assert_eq!(loaded.defaults.plan_length, 10);
        assert_eq!(loaded.defaults.hours_per_day, DEFAULT_HOURS_PER_DAY);
        assert_eq!(loaded.defaults.course_type, DEFAULT_COURSE_TYPE);

        let empty = parse_config("").unwrap();
        assert_eq!(empty.defaults, DefaultsSection::default());
    }

    #[test]
    fn save_config_writes_to_xdg_dir_with_private_permissions() {
        let _lock = lock_env();
        let tmp = tempfile::TempDir::new().unwrap();
        let orig_xdg = std::env::var("XDG_CONFIG_HOME").ok();
        unsafe { std::env::set_var("XDG_CONFIG_HOME", tmp.path()) };

        let result = save_config(&ConfigFile::default()).and_then(|()| load_config());
        let path = config_path();

        match orig_xdg {
            Some(x) => unsafe { std::env::set_var("XDG_CONFIG_HOME", x) },
            None => unsafe { std::env::remove_var("XDG_CONFIG_HOME") },
        }

        let loaded = result.unwrap();
        assert_eq!(loaded.defaults, DefaultsSection::default());
        assert!(path.starts_with(tmp.path()));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let meta = std::fs::metadata(&path).unwrap();
            assert_eq!(meta.permissions().mode() & 0o777, 0o600);
        }
    }

    #[test]
    fn cli_flag_overrides_env_and_file() {
        let _lock = lock_env();
        clear_planora_env();
        unsafe { std::env::set_var(ENV_PLAN_LENGTH, "30") };

        let cli = PlanOverrides {
            plan_length: Some(5),
            ..PlanOverrides::default()
        };
        let config = PlanoraConfig::resolve_with(&cli, DefaultsSection::default());
        clear_planora_env();

        assert_eq!(config.unwrap().plan_length, 5);
    }

    #[test]
    fn env_var_overrides_config_file() {
        let _lock = lock_env();
        clear_planora_env();
        unsafe { std::env::set_var(ENV_EXAM_TYPE, "regular_test") };
        unsafe { std::env::set_var(ENV_COURSE_TYPE, "Physics") };

        let file = DefaultsSection {
            course_type: "Biology".to_string(),
            ..DefaultsSection::default()
        };
        let config = PlanoraConfig::resolve_with(&PlanOverrides::default(), file);
        clear_planora_env();

        let config = config.unwrap();
        assert_eq!(config.exam_type, ExamType::RegularTest);
        assert_eq!(config.course_type, "Physics");
    }

    #[test]
    fn config_file_overrides_builtin_defaults() {
        let _lock = lock_env();
        clear_planora_env();

        let file = DefaultsSection {
            hours_per_day: 3.0,
            review_day_fraction: Some(0.2),
            ..DefaultsSection::default()
        };
        let config = PlanoraConfig::resolve_with(&PlanOverrides::default(), file).unwrap();
        assert_eq!(config.hours_per_day, 3.0);
        assert_eq!(config.plan_length, DEFAULT_PLAN_LENGTH);
        assert_eq!(config.request().review_day_fraction, Some(0.2));
    }

    #[test]
    fn malformed_env_value_is_an_error() {
        let _lock = lock_env();
        clear_planora_env();
        unsafe { std::env::set_var(ENV_HOURS_PER_DAY, "lots") };

        let result = PlanoraConfig::resolve_with(&PlanOverrides::default(), DefaultsSection::default());
        clear_planora_env();

        let msg = result.unwrap_err().to_string();
        assert!(msg.contains(ENV_HOURS_PER_DAY), "unexpected error: {msg}");
    }

    #[test]
    fn non_numeric_review_fraction_counts_as_unset() {
        let _lock = lock_env();
        clear_planora_env();
        unsafe { std::env::set_var(ENV_REVIEW_DAY_FRACTION, "some") };

        let file = DefaultsSection {
            review_day_fraction: Some(0.15),
            ..DefaultsSection::default()
        };
        let config = PlanoraConfig::resolve_with(&PlanOverrides::default(), file);
        clear_planora_env();

        assert_eq!(config.unwrap().review_day_fraction, Some(0.15));
    }

    #[test]
    fn config_path_ends_with_expected_filename() {
        let path = config_path();
        assert!(
            path.ends_with("planora/config.toml"),
            "unexpected config path: {}",
            path.display()
        );
    }
}
