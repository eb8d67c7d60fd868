//! Test configuration builders

use minfy_capture::{Config, ConflictPolicy, RetryConfig};
use std::path::Path;
use std::time::Duration;

/// Default config with the given conflict policy
pub fn test_config(policy: ConflictPolicy) -> Config {
    Config::new(policy)
}

/// Config writing below `output_dir` with fast, deterministic retries
pub fn fs_config(output_dir: &Path, policy: ConflictPolicy) -> Config {
    let mut config = Config::new(policy);
    config.storage.output_dir = output_dir.to_path_buf();
    config.storage.fetch_timeout = Duration::from_secs(5);
    config.retry = RetryConfig {
        max_attempts: 1,
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(20),
        backoff_multiplier: 2.0,
        jitter: false,
    };
    config
}
