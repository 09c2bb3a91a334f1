//! Interview configuration.
//!
//! Loaded from `~/.interview/config.toml` unless `--config` points elsewhere.
//! Every key is optional; a missing file means all defaults.
//!
//! The recipient is resolved through a chain:
//!
//! 1. `--to <address>`: explicit per-command override
//! 2. `INTERVIEW_RECIPIENT` env var
//! 3. `recipient` in the config file
//! 4. [`DEFAULT_RECIPIENT`]

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};

use serde::Deserialize;

use crate::model::EmailRule;

pub const DEFAULT_RECIPIENT: &str = "interviews@example.com";

/// Environment variable overriding the configured recipient.
pub const RECIPIENT_ENV: &str = "INTERVIEW_RECIPIENT";

const DEFAULT_RESET_DELAY_SECS: u64 = 3;

/// Interview configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Where interview requests are addressed.
    pub recipient: String,

    /// Seconds the success view stays up before the wizard resets.
    pub reset_delay_secs: u64,

    /// Require a well-formed email address on the contact step.
    /// Off by default: any non-empty text is accepted.
    pub strict_email: bool,

    /// Command used to open the `mailto:` URI, e.g. `"xdg-open"`.
    /// The platform default when unset.
    pub opener: Option<String>,

    /// Directory for log files. `~/.interview/logs` when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            reset_delay_secs: DEFAULT_RESET_DELAY_SECS,
            strict_email: false,
            opener: None,
            log_dir: None,
        }
    }
}

impl Config {
    /// Load config from `~/.interview/config.toml`.
    pub fn load() -> Result<Self, String> {
        let path = Self::path().ok_or("could not determine home directory")?;
        Self::load_from(&path)
    }

    /// Load config from `path`. A missing file yields the defaults;
    /// an unreadable or invalid one is an error.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let contents = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(format!("failed to read {}: {e}", path.display())),
        };

        let config: Self = toml::from_str(&contents)
            .map_err(|e| format!("invalid config at {}: {e}", path.display()))?;

        if config.recipient.trim().is_empty() {
            return Err(format!(
                "recipient is empty in {}\n\
                 Set it to the address interview requests should go to.",
                path.display()
            ));
        }

        Ok(config)
    }

    /// The config file path: `~/.interview/config.toml`.
    pub fn path() -> Option<PathBuf> {
        Self::home().map(|h| h.join("config.toml"))
    }

    /// Resolve the recipient from the flag, env var, then this config.
    pub fn resolve_recipient(&self, explicit: Option<&str>) -> String {
        self.resolve_recipient_with(explicit, |key| env::var(key).ok())
    }

    /// [`Config::resolve_recipient`] with the environment lookup supplied.
    fn resolve_recipient_with(
        &self,
        explicit: Option<&str>,
        var: impl Fn(&str) -> Option<String>,
    ) -> String {
        if let Some(to) = explicit {
            return to.to_string();
        }

        if let Some(to) = var(RECIPIENT_ENV)
            && !to.is_empty()
        {
            return to;
        }

        self.recipient.clone()
    }

    pub fn email_rule(&self) -> EmailRule {
        if self.strict_email {
            EmailRule::WellFormed
        } else {
            EmailRule::Present
        }
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_secs(self.reset_delay_secs)
    }

    /// Where log files go.
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.log_dir
            .clone()
            .or_else(|| Self::home().map(|h| h.join("logs")))
    }

    fn home() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".interview"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.reset_delay(), Duration::from_secs(3));
        assert_eq!(config.email_rule(), EmailRule::Present);
    }

    #[test]
    fn reads_kebab_case_keys() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
recipient = "hiring@acme.dev"
reset-delay-secs = 5
strict-email = true
opener = "open -a Mail"
"#,
        );
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.recipient, "hiring@acme.dev");
        assert_eq!(config.reset_delay(), Duration::from_secs(5));
        assert_eq!(config.email_rule(), EmailRule::WellFormed);
        assert_eq!(config.opener.as_deref(), Some("open -a Mail"));
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "strict-email = true\n");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.recipient, DEFAULT_RECIPIENT);
        assert!(config.strict_email);
    }

    #[test]
    fn invalid_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "reset-delay-secs = \"soon\"\n");
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.contains("invalid config"));
        assert!(err.contains("config.toml"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "recipeint = \"typo@acme.dev\"\n");
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn empty_recipient_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "recipient = \"\"\n");
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.contains("recipient is empty"));
    }

    fn env_with(value: &str) -> impl Fn(&str) -> Option<String> {
        let value = value.to_string();
        move |key: &str| (key == RECIPIENT_ENV).then(|| value.clone())
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn explicit_recipient_wins() {
        let config = Config {
            recipient: "file@acme.dev".to_string(),
            ..Config::default()
        };
        let to = config.resolve_recipient_with(Some("cto@acme.dev"), env_with("env@acme.dev"));
        assert_eq!(to, "cto@acme.dev");
    }

    #[test]
    fn env_recipient_beats_the_file() {
        let config = Config {
            recipient: "file@acme.dev".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.resolve_recipient_with(None, env_with("env@acme.dev")),
            "env@acme.dev"
        );
    }

    #[test]
    fn empty_env_falls_through_to_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "recipient = \"file@acme.dev\"\n");
        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.resolve_recipient_with(None, env_with("")), "file@acme.dev");
        assert_eq!(config.resolve_recipient_with(None, no_env), "file@acme.dev");
    }

    #[test]
    fn default_recipient_is_the_last_resort() {
        let config = Config::default();
        assert_eq!(config.resolve_recipient_with(None, no_env), DEFAULT_RECIPIENT);
    }

    #[test]
    fn configured_log_dir_is_used() {
        let config = Config {
            log_dir: Some(PathBuf::from("/tmp/interview-logs")),
            ..Config::default()
        };
        assert_eq!(config.log_dir(), Some(PathBuf::from("/tmp/interview-logs")));
    }
}
