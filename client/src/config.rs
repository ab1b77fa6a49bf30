use std::env;

/// Placeholder used where a concrete value is required but none was configured.
pub const UNKNOWN: &str = "unknown";

/// Shown in human-readable output for a missing setting.
pub const UNSET: &str = "—";

const REGION_VAR: &str = "PHOTOSTORE_REGION";
const BUCKET_VAR: &str = "PHOTOSTORE_BUCKET";
const API_ROOT_VAR: &str = "PHOTOSTORE_API_ROOT";
const API_KEY_VAR: &str = "PHOTOSTORE_API_KEY";

/// Read-only runtime settings.
///
/// Loaded once at startup and never mutated afterwards. Every field is
/// optional: the client stays functional with a completely empty
/// configuration, it just cannot reach a real backend.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub region: Option<String>,
    pub bucket: Option<String>,
    pub api_root: Option<String>,
    pub api_key: Option<String>,
}

impl Config {
    /// Reads configuration from `PHOTOSTORE_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            region: env::var(REGION_VAR).ok().filter(|v| !v.is_empty()),
            bucket: env::var(BUCKET_VAR).ok().filter(|v| !v.is_empty()),
            api_root: env::var(API_ROOT_VAR).ok().filter(|v| !v.is_empty()),
            api_key: env::var(API_KEY_VAR).ok().filter(|v| !v.is_empty()),
        }
    }

    /// Applies explicit overrides (CLI flags) on top of this configuration.
    #[must_use]
    pub fn with_overrides(
        mut self,
        region: Option<String>,
        bucket: Option<String>,
        api_root: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        if region.is_some() {
            self.region = region;
        }
        if bucket.is_some() {
            self.bucket = bucket;
        }
        if api_root.is_some() {
            self.api_root = api_root;
        }
        if api_key.is_some() {
            self.api_key = api_key;
        }
        self
    }

    pub fn region_or_unknown(&self) -> &str {
        self.region.as_deref().unwrap_or(UNKNOWN)
    }

    pub fn bucket_or_unknown(&self) -> &str {
        self.bucket.as_deref().unwrap_or(UNKNOWN)
    }

    /// API key for display: first four characters, an ellipsis, last four.
    /// Keys too short to keep both ends distinct are shown as a bare ellipsis.
    #[must_use]
    pub fn masked_key(&self) -> String {
        match self.api_key.as_deref() {
            None => UNSET.to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                if chars.len() <= 8 {
                    "…".to_string()
                } else {
                    let head: String = chars[..4].iter().collect();
                    let tail: String = chars[chars.len() - 4..].iter().collect();
                    format!("{head}…{tail}")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn from_env_reads_all_settings() {
        // Arrange
        env::set_var(REGION_VAR, "us-east-1");
        env::set_var(BUCKET_VAR, "b1");
        env::set_var(API_ROOT_VAR, "https://api.example.com/prod");
        env::set_var(API_KEY_VAR, "abcd1234efgh5678");

        // Act
        let cfg = Config::from_env();

        // Assert
        assert_eq!(cfg.region.as_deref(), Some("us-east-1"));
        assert_eq!(cfg.bucket.as_deref(), Some("b1"));
        assert_eq!(cfg.api_root.as_deref(), Some("https://api.example.com/prod"));
        assert_eq!(cfg.api_key.as_deref(), Some("abcd1234efgh5678"));

        env::remove_var(REGION_VAR);
        env::remove_var(BUCKET_VAR);
        env::remove_var(API_ROOT_VAR);
        env::remove_var(API_KEY_VAR);
    }

    #[test]
    #[serial]
    fn from_env_empty_values_count_as_absent() {
        // Arrange
        env::set_var(REGION_VAR, "");
        env::remove_var(BUCKET_VAR);

        // Act
        let cfg = Config::from_env();

        // Assert
        assert!(cfg.region.is_none());
        assert!(cfg.bucket.is_none());

        env::remove_var(REGION_VAR);
    }

    #[test]
    fn overrides_win_over_loaded_values() {
        // Arrange
        let cfg = Config {
            region: Some("us-east-1".to_string()),
            bucket: Some("b1".to_string()),
            ..Config::default()
        };

        // Act
        let cfg = cfg.with_overrides(Some("eu-west-1".to_string()), None, None, None);

        // Assert
        assert_eq!(cfg.region.as_deref(), Some("eu-west-1"));
        assert_eq!(cfg.bucket.as_deref(), Some("b1"));
    }

    #[test]
    fn unknown_placeholders() {
        // Arrange
        let cfg = Config::default();

        // Act / Assert
        assert_eq!(cfg.region_or_unknown(), UNKNOWN);
        assert_eq!(cfg.bucket_or_unknown(), UNKNOWN);
    }

    #[test]
    fn masked_key_keeps_both_ends() {
        // Arrange
        let cfg = Config {
            api_key: Some("abcd1234efgh5678".to_string()),
            ..Config::default()
        };

        // Act / Assert
        assert_eq!(cfg.masked_key(), "abcd…5678");
    }

    #[test]
    fn masked_key_short_key_fully_hidden() {
        // Arrange
        let cfg = Config {
            api_key: Some("abcd".to_string()),
            ..Config::default()
        };

        // Act / Assert
        assert_eq!(cfg.masked_key(), "…");
    }

    #[test]
    fn masked_key_absent() {
        // Arrange
        let cfg = Config::default();

        // Act / Assert
        assert_eq!(cfg.masked_key(), UNSET);
    }
}
