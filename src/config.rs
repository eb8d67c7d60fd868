//! Configuration types for minfy-capture

use crate::error::{Error, Result};
use crate::types::{MediaType, Source};
use crate::utils::is_plain_component;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Extraction behavior (link resolution, locale-dependent parsing, media URLs)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Base URL that relative links in the page are resolved against (default: "https://x.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Platform tag written to every record (default: x)
    #[serde(default)]
    pub source: Source,

    /// Pattern locating the like count inside the like button's accessible label
    ///
    /// Must contain exactly one capture group around the number. The default
    /// matches comma-grouped digits ("1,234 Likes. Like", "1,234 件のいいね").
    /// Labels are localized, so deployments for other locales should set this
    /// together with [`group_separator`](Self::group_separator).
    #[serde(default = "default_like_count_pattern")]
    pub like_count_pattern: String,

    /// Digit-group separator removed from the captured like count (default: ",")
    #[serde(default = "default_group_separator")]
    pub group_separator: String,

    /// Query parameters that select a rendition size and are stripped from image URLs
    #[serde(default = "default_sizing_params")]
    pub sizing_params: Vec<String>,

    /// Re-append `name=orig` to image URLs to request the largest variant (default: false)
    #[serde(default)]
    pub request_original_size: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            source: Source::default(),
            like_count_pattern: default_like_count_pattern(),
            group_separator: default_group_separator(),
            sizing_params: default_sizing_params(),
            request_original_size: false,
        }
    }
}

impl ExtractConfig {
    /// Parsed [`base_url`](Self::base_url)
    pub fn base(&self) -> Result<Url> {
        Url::parse(&self.base_url).map_err(|e| Error::config("base_url", e.to_string()))
    }

    /// Compiled [`like_count_pattern`](Self::like_count_pattern)
    pub fn like_count_regex(&self) -> Result<Regex> {
        let regex = Regex::new(&self.like_count_pattern)
            .map_err(|e| Error::config("like_count_pattern", e.to_string()))?;
        if regex.captures_len() < 2 {
            return Err(Error::config(
                "like_count_pattern",
                "pattern must contain a capture group around the number",
            ));
        }
        Ok(regex)
    }
}

/// How record identifiers are assigned
///
/// One policy is chosen per [`Config`] and applied to every record a pipeline
/// produces. Mixing policies between captures breaks deduplication.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPolicy {
    /// UUIDv5 over a fixed namespace and the canonical `rawUrl` (default)
    #[default]
    ContentAddressed,
    /// Fresh UUIDv4 per capture (legacy, no deduplication)
    Random,
}

/// What the storage collaborator does when a target path already exists
///
/// Deliberately has no default: overwriting silently replaces an earlier
/// capture of the same post, so the choice must be made explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Append (1), (2), etc. to the file name
    Uniquify,
    /// Replace the existing file
    Overwrite,
}

/// Storage layout and persistence settings
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all captured posts (default: "./MINFY")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Conflict handling for existing files (required)
    pub conflict_policy: ConflictPolicy,

    /// File name of the manifest inside each post directory (default: "manifest.json")
    #[serde(default = "default_manifest_file_name")]
    pub manifest_file_name: String,

    /// Extension for image media (default: "jpg")
    #[serde(default = "default_image_extension")]
    pub image_extension: String,

    /// Extension for video and gif media (default: "mp4")
    #[serde(default = "default_video_extension")]
    pub video_extension: String,

    /// Extension for audio media (default: "m4a")
    #[serde(default = "default_audio_extension")]
    pub audio_extension: String,

    /// Timeout for fetching one remote byte source (default: 30 seconds)
    #[serde(default = "default_fetch_timeout", with = "duration_serde")]
    pub fetch_timeout: Duration,
}

impl StorageConfig {
    /// Storage config with the given conflict policy and default everything else
    pub fn new(conflict_policy: ConflictPolicy) -> Self {
        Self {
            output_dir: default_output_dir(),
            conflict_policy,
            manifest_file_name: default_manifest_file_name(),
            image_extension: default_image_extension(),
            video_extension: default_video_extension(),
            audio_extension: default_audio_extension(),
            fetch_timeout: default_fetch_timeout(),
        }
    }

    /// File extension for a media type
    pub fn extension_for(&self, media_type: MediaType) -> &str {
        match media_type {
            MediaType::Image => &self.image_extension,
            MediaType::Video | MediaType::Gif => &self.video_extension,
            MediaType::Audio => &self.audio_extension,
        }
    }
}

/// Retry configuration for remote fetches in the storage collaborator
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 30 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// Main configuration
///
/// Sub-configs are flattened, so the serialized form is a single flat
/// object except for `retry`. `conflict_policy` has no default and must be
/// present when deserializing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Version string written to every manifest (default: this crate's version)
    #[serde(default = "default_extension_version")]
    pub extension_version: String,

    /// Identifier policy applied to every record
    #[serde(default)]
    pub identity_policy: IdentityPolicy,

    /// Extraction settings
    #[serde(flatten)]
    pub extract: ExtractConfig,

    /// Storage layout and conflict handling
    #[serde(flatten)]
    pub storage: StorageConfig,

    /// Retry behavior for remote fetches
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Config {
    /// Config with an explicit conflict policy and defaults for everything else
    pub fn new(conflict_policy: ConflictPolicy) -> Self {
        Self {
            extension_version: default_extension_version(),
            identity_policy: IdentityPolicy::default(),
            extract: ExtractConfig::default(),
            storage: StorageConfig::new(conflict_policy),
            retry: RetryConfig::default(),
        }
    }

    /// Check settings that serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        self.extract.base()?;
        self.extract.like_count_regex()?;

        if self.extension_version.trim().is_empty() {
            return Err(Error::config(
                "extension_version",
                "extension version must not be empty",
            ));
        }
        let manifest_name = &self.storage.manifest_file_name;
        if manifest_name.trim().is_empty() || !is_plain_component(manifest_name) {
            return Err(Error::config(
                "manifest_file_name",
                format!(
                    "manifest file name must be a single path component, got {:?}",
                    manifest_name
                ),
            ));
        }
        for (key, ext) in [
            ("image_extension", &self.storage.image_extension),
            ("video_extension", &self.storage.video_extension),
            ("audio_extension", &self.storage.audio_extension),
        ] {
            if ext.is_empty() || ext.contains(['/', '\\', '.']) {
                return Err(Error::config(
                    key,
                    format!("invalid file extension {ext:?}"),
                ));
            }
        }
        Ok(())
    }
}

fn default_extension_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_base_url() -> String {
    "https://x.com".to_string()
}

fn default_like_count_pattern() -> String {
    r"(\d{1,3}(?:,\d{3})+|\d+)".to_string()
}

fn default_group_separator() -> String {
    ",".to_string()
}

fn default_sizing_params() -> Vec<String> {
    vec!["name".to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./MINFY")
}

fn default_manifest_file_name() -> String {
    "manifest.json".to_string()
}

fn default_image_extension() -> String {
    "jpg".to_string()
}

fn default_video_extension() -> String {
    "mp4".to_string()
}

fn default_audio_extension() -> String {
    "m4a".to_string()
}

fn default_fetch_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_is_valid() {
        let config = Config::new(ConflictPolicy::Uniquify);
        config.validate().unwrap();
        assert_eq!(config.identity_policy, IdentityPolicy::ContentAddressed);
        assert_eq!(config.storage.manifest_file_name, "manifest.json");
        assert_eq!(config.extension_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_conflict_policy_is_required() {
        let result: std::result::Result<Config, _> = serde_json::from_str("{}");
        assert!(result.is_err(), "config without conflict_policy must not load");

        let config: Config =
            serde_json::from_str(r#"{"conflict_policy": "overwrite"}"#).unwrap();
        assert_eq!(config.storage.conflict_policy, ConflictPolicy::Overwrite);
        assert_eq!(config.extract.base_url, "https://x.com");
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_flattened_fields_deserialize() {
        let config: Config = serde_json::from_str(
            r#"{
                "conflict_policy": "uniquify",
                "identity_policy": "random",
                "base_url": "https://twitter.com",
                "output_dir": "/tmp/minfy",
                "image_extension": "png",
                "fetch_timeout": 5,
                "retry": { "max_attempts": 1, "jitter": false }
            }"#,
        )
        .unwrap();

        assert_eq!(config.identity_policy, IdentityPolicy::Random);
        assert_eq!(config.extract.base_url, "https://twitter.com");
        assert_eq!(config.storage.output_dir, PathBuf::from("/tmp/minfy"));
        assert_eq!(config.storage.extension_for(MediaType::Image), "png");
        assert_eq!(config.storage.fetch_timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_attempts, 1);
        assert!(!config.retry.jitter);
    }

    #[test]
    fn test_extension_mapping() {
        let storage = StorageConfig::new(ConflictPolicy::Uniquify);
        assert_eq!(storage.extension_for(MediaType::Image), "jpg");
        assert_eq!(storage.extension_for(MediaType::Video), "mp4");
        assert_eq!(storage.extension_for(MediaType::Gif), "mp4");
        assert_eq!(storage.extension_for(MediaType::Audio), "m4a");
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let mut config = Config::new(ConflictPolicy::Uniquify);
        config.extract.base_url = "not a url".into();
        assert_eq!(config.validate().unwrap_err().error_code(), "config_error");

        let mut config = Config::new(ConflictPolicy::Uniquify);
        config.extract.like_count_pattern = r"\d+".into();
        assert!(config.validate().is_err(), "pattern without capture group");

        let mut config = Config::new(ConflictPolicy::Uniquify);
        config.storage.video_extension = ".mp4".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_manifest_name_outside_record() {
        for name in ["../x.json", "a/b.json", "..", "", "  "] {
            let mut config = Config::new(ConflictPolicy::Uniquify);
            config.storage.manifest_file_name = name.into();
            let err = config.validate().unwrap_err();
            assert!(
                matches!(&err, Error::Config { key, .. } if key.as_deref() == Some("manifest_file_name")),
                "{name:?} accepted: {err:?}"
            );
        }

        let mut config = Config::new(ConflictPolicy::Uniquify);
        config.storage.manifest_file_name = "record.json".into();
        assert!(config.validate().is_ok());
    }
}
