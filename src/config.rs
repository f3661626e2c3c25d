//! Runtime configuration resolved from flags and the environment.
//!
//! Everything here is read once at startup and passed into the components
//! explicitly; nothing downstream consults the process environment.

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::warn;

use crate::backend::Backend;

/// Default timeout for a single prompt in interactive mode (1 minute).
pub const DEFAULT_ASK_TIMEOUT_SECS: u64 = 60;

/// Default timeout for a conversation turn (2 minutes).
pub const DEFAULT_CONVERSE_TIMEOUT_SECS: u64 = 120;

/// Environment variable to override the default timeout.
pub const TIMEOUT_ENV_VAR: &str = "SUMMONER_TIMEOUT";

pub const DEFAULT_ROUNDS: u32 = 5;

/// Pause between conversation rounds.
pub const DEFAULT_DELAY_SECS: u64 = 3;

pub const DEFAULT_OUTPUT_DIR: &str = "conversations";

/// Resolve the invocation timeout.
///
/// An explicit flag wins, then `SUMMONER_TIMEOUT`, then `default_secs`.
/// Logs a warning if the environment variable is set but is not a whole
/// number of seconds.
pub fn resolve_timeout(flag: Option<u64>, default_secs: u64) -> Duration {
    if let Some(secs) = flag {
        return Duration::from_secs(secs);
    }

    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, default_secs
                );
                Duration::from_secs(default_secs)
            }
        },
        _ => Duration::from_secs(default_secs),
    }
}

/// An API key read from the environment, forwarded to the child process.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    var: String,
    value: String,
}

impl Credential {
    pub fn new(var: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            value: value.into(),
        }
    }

    /// Read the backend's credential variable. Empty values count as unset.
    pub fn from_env(backend: Backend) -> Option<Self> {
        let var = backend.credential_var();
        match env::var(var) {
            Ok(value) if !value.trim().is_empty() => Some(Self::new(var, value)),
            _ => None,
        }
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("var", &self.var)
            .field("value", &format_args!("<{} chars>", self.value.len()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_timeout_default() {
        temp_env::with_var_unset(TIMEOUT_ENV_VAR, || {
            let timeout = resolve_timeout(None, DEFAULT_ASK_TIMEOUT_SECS);
            assert_eq!(timeout, Duration::from_secs(DEFAULT_ASK_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_resolve_timeout_from_env() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("45"), || {
            let timeout = resolve_timeout(None, DEFAULT_ASK_TIMEOUT_SECS);
            assert_eq!(timeout, Duration::from_secs(45));
        });
    }

    #[test]
    fn test_resolve_timeout_flag_beats_env() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("45"), || {
            let timeout = resolve_timeout(Some(7), DEFAULT_ASK_TIMEOUT_SECS);
            assert_eq!(timeout, Duration::from_secs(7));
        });
    }

    #[test]
    fn test_resolve_timeout_invalid_env_uses_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some("-3"), || {
            let timeout = resolve_timeout(None, DEFAULT_CONVERSE_TIMEOUT_SECS);
            assert_eq!(timeout, Duration::from_secs(DEFAULT_CONVERSE_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_resolve_timeout_empty_env_uses_default() {
        temp_env::with_var(TIMEOUT_ENV_VAR, Some(""), || {
            let timeout = resolve_timeout(None, DEFAULT_CONVERSE_TIMEOUT_SECS);
            assert_eq!(timeout, Duration::from_secs(DEFAULT_CONVERSE_TIMEOUT_SECS));
        });
    }

    #[test]
    fn test_credential_from_env() {
        temp_env::with_var("GEMINI_API_KEY", Some("abc123"), || {
            let credential = Credential::from_env(Backend::Gemini).expect("credential set");
            assert_eq!(credential.var(), "GEMINI_API_KEY");
            assert_eq!(credential.value(), "abc123");
        });
    }

    #[test]
    fn test_blank_credential_is_ignored() {
        temp_env::with_var("OPENAI_API_KEY", Some("  "), || {
            assert!(Credential::from_env(Backend::Codex).is_none());
        });
    }

    #[test]
    fn test_credential_debug_hides_value() {
        let credential = Credential::new("OPENAI_API_KEY", "sk-very-secret");
        let debug = format!("{:?}", credential);
        assert!(debug.contains("OPENAI_API_KEY"));
        assert!(!debug.contains("sk-very-secret"));
    }
}
