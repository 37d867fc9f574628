//! Content API configuration
//!
//! Settings are read from the environment (a `.env` file is loaded first by
//! the binary). Server mode talks to the live API with the read token; public
//! mode goes through the CDN with no credentials.

use thiserror::Error;

/// Dataset used when none is configured
pub const DEFAULT_DATASET: &str = "production";

/// API version pinned for all queries
pub const DEFAULT_API_VERSION: &str = "2024-08-01";

const PROJECT_ID_VARS: [&str; 2] = ["SANITY_PROJECT_ID", "NEXT_PUBLIC_SANITY_PROJECT_ID"];
const DATASET_VARS: [&str; 2] = ["SANITY_DATASET", "NEXT_PUBLIC_SANITY_DATASET"];
const API_VERSION_VAR: &str = "SANITY_API_VERSION";
const TOKEN_VAR: &str = "SANITY_API_READ_TOKEN";

/// Errors raised while building the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("Missing required environment variable {0}")]
    Missing(&'static str),

    /// The value cannot be used in a host name or URL path
    #[error("Invalid {name}: '{value}' (expected lowercase letters, digits, '-' or '_')")]
    Invalid { name: &'static str, value: String },
}

/// Which document revisions queries see
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    /// Only published documents
    Published,
    /// Drafts layered over published documents (needs a token)
    PreviewDrafts,
}

impl Perspective {
    /// Query-string value understood by the API
    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Published => "published",
            Perspective::PreviewDrafts => "previewDrafts",
        }
    }
}

/// Connection settings for the content API
#[derive(Clone, PartialEq, Eq)]
pub struct SanityConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub token: Option<String>,
    pub use_cdn: bool,
    pub perspective: Perspective,
}

impl std::fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("use_cdn", &self.use_cdn)
            .field("perspective", &self.perspective)
            .finish()
    }
}

impl SanityConfig {
    /// Server-mode configuration for `project_id` with default dataset and version
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            dataset: DEFAULT_DATASET.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            token: None,
            use_cdn: false,
            perspective: Perspective::Published,
        }
    }

    /// Builds the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup
    ///
    /// Empty values count as unset. A token switches the perspective to
    /// drafts so editors see unpublished copy.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let first = |names: &[&str]| names.iter().find_map(|name| get(name));

        let project_id =
            first(&PROJECT_ID_VARS[..]).ok_or(ConfigError::Missing(PROJECT_ID_VARS[0]))?;
        validate_segment("project id", &project_id)?;

        let dataset = first(&DATASET_VARS[..]).unwrap_or_else(|| DEFAULT_DATASET.to_string());
        validate_segment("dataset", &dataset)?;

        let api_version = get(API_VERSION_VAR).unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let mut config = Self {
            project_id,
            dataset,
            api_version,
            ..Self::new("")
        };
        if let Some(token) = get(TOKEN_VAR) {
            config = config.with_token(token);
        }
        Ok(config)
    }

    /// Attaches a read token and switches to the drafts perspective
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self.use_cdn = false;
        self.perspective = Perspective::PreviewDrafts;
        self
    }

    /// Switches to anonymous CDN reads of published documents
    pub fn public(mut self) -> Self {
        self.token = None;
        self.use_cdn = true;
        self.perspective = Perspective::Published;
        self
    }

    /// Query endpoint, e.g. `https://abc123.api.sanity.io/v2024-08-01/data/query/production`
    pub fn query_url(&self) -> String {
        let host = if self.use_cdn { "apicdn" } else { "api" };
        format!(
            "https://{}.{}.sanity.io/v{}/data/query/{}",
            self.project_id, host, self.api_version, self.dataset
        )
    }
}

fn validate_segment(name: &'static str, value: &str) -> Result<(), ConfigError> {
    let valid = value
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_missing_project_id_is_an_error() {
        let result = SanityConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(ConfigError::Missing("SANITY_PROJECT_ID"))));
    }

    #[test]
    fn test_empty_project_id_counts_as_missing() {
        let result = SanityConfig::from_lookup(lookup_from(&[("SANITY_PROJECT_ID", "  ")]));
        assert!(matches!(result, Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_defaults_without_token() {
        let config =
            SanityConfig::from_lookup(lookup_from(&[("SANITY_PROJECT_ID", "abc123")])).unwrap();

        assert_eq!(config.dataset, "production");
        assert_eq!(config.api_version, "2024-08-01");
        assert!(config.token.is_none());
        assert!(!config.use_cdn);
        assert_eq!(config.perspective, Perspective::Published);
    }

    #[test]
    fn test_public_prefixed_aliases_are_read() {
        let config = SanityConfig::from_lookup(lookup_from(&[
            ("NEXT_PUBLIC_SANITY_PROJECT_ID", "abc123"),
            ("NEXT_PUBLIC_SANITY_DATASET", "staging"),
        ]))
        .unwrap();

        assert_eq!(config.project_id, "abc123");
        assert_eq!(config.dataset, "staging");
    }

    #[test]
    fn test_token_enables_preview_drafts() {
        let config = SanityConfig::from_lookup(lookup_from(&[
            ("SANITY_PROJECT_ID", "abc123"),
            ("SANITY_API_READ_TOKEN", "sk-secret"),
        ]))
        .unwrap();

        assert_eq!(config.token.as_deref(), Some("sk-secret"));
        assert_eq!(config.perspective, Perspective::PreviewDrafts);
        assert!(!format!("{:?}", config).contains("sk-secret"));
    }

    #[test]
    fn test_public_mode_drops_token_and_uses_cdn() {
        let config = SanityConfig::new("abc123").with_token("sk-secret").public();

        assert!(config.token.is_none());
        assert!(config.use_cdn);
        assert_eq!(config.perspective, Perspective::Published);
        assert_eq!(
            config.query_url(),
            "https://abc123.apicdn.sanity.io/v2024-08-01/data/query/production"
        );
    }

    #[test]
    fn test_query_url_for_live_api() {
        let config = SanityConfig::new("abc123");
        assert_eq!(
            config.query_url(),
            "https://abc123.api.sanity.io/v2024-08-01/data/query/production"
        );
    }

    #[test]
    fn test_rejects_project_id_with_url_characters() {
        let result = SanityConfig::from_lookup(lookup_from(&[("SANITY_PROJECT_ID", "evil.com/x")]));
        assert!(matches!(result, Err(ConfigError::Invalid { name: "project id", .. })));
    }
}
