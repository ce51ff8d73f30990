//! Centralized configuration for Nimbus.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::path::PathBuf;
use std::time::Duration;

/// Central configuration for all Nimbus components.
///
/// Groups related configuration settings into logical sections.
#[derive(Debug, Clone, Default)]
pub struct NimbusConfig {
    pub storage: StorageConfig,
    pub simulation: SimulationConfig,
    pub auth: AuthConfig,
    pub http: HttpConfig,
}

/// File storage configuration.
///
/// Controls where uploaded torrent descriptors and materialized download
/// directories live. Everything under the download root is ephemeral.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for per-torrent download folders
    pub download_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            download_dir: std::env::temp_dir().join("nimbus-downloads"),
        }
    }
}

/// Statistics simulation parameters.
///
/// The simulated engine draws progress, speeds, and swarm counts from these
/// ranges on every update tick. Bounds mirror the dashboard's expectations;
/// the exact distribution is not a contract.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Deterministic seed for reproducible runs
    pub deterministic_seed: Option<u64>,
    /// Progress added per tick while downloading, in percent
    pub progress_step_pct: (f64, f64),
    /// Instantaneous download speed range in KB/s
    pub download_speed_kbps: (f64, f64),
    /// Instantaneous upload speed range in KB/s
    pub upload_speed_kbps: (f64, f64),
    /// Connected peer count range
    pub peers: (u32, u32),
    /// Seed count range
    pub seeds: (u32, u32),
    /// Total torrent size range in MiB, fixed at creation
    pub total_size_mib: (u64, u64),
    /// Number of placeholder files written on completion
    pub placeholder_files: (usize, usize),
    /// Extension candidates for placeholder files
    pub placeholder_extensions: &'static [&'static str],
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            deterministic_seed: None,
            progress_step_pct: (0.5, 3.0),
            download_speed_kbps: (500.0, 5000.0),
            upload_speed_kbps: (50.0, 500.0),
            peers: (5, 50),
            seeds: (10, 100),
            total_size_mib: (100, 5000),
            placeholder_files: (2, 5),
            placeholder_extensions: &[".mp4", ".mkv", ".avi", ".txt", ".pdf", ".zip"],
        }
    }
}

impl SimulationConfig {
    /// Creates a configuration for deterministic testing.
    pub fn deterministic_testing() -> Self {
        Self {
            deterministic_seed: Some(42),
            ..Self::default()
        }
    }
}

/// Credentials the API adapter validates mutating requests against.
///
/// Two fixed configured values, overridable through `NIMBUS_USERNAME` and
/// `NIMBUS_PASSWORD`. There is no real security boundary here: the data is
/// fake and session-scoped.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            username: std::env::var("NIMBUS_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            password: std::env::var("NIMBUS_PASSWORD").unwrap_or_else(|_| "nimbus".to_string()),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Interval between statistics refresh ticks
    pub refresh_interval: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_reference_bounds() {
        let config = NimbusConfig::default();

        assert_eq!(config.simulation.progress_step_pct, (0.5, 3.0));
        assert_eq!(config.simulation.download_speed_kbps, (500.0, 5000.0));
        assert_eq!(config.simulation.upload_speed_kbps, (50.0, 500.0));
        assert_eq!(config.simulation.peers, (5, 50));
        assert_eq!(config.simulation.seeds, (10, 100));
        assert_eq!(config.simulation.total_size_mib, (100, 5000));
        assert_eq!(config.simulation.placeholder_files, (2, 5));
        assert_eq!(config.http.refresh_interval, Duration::from_secs(3));
    }

    #[test]
    fn test_deterministic_testing_sets_seed() {
        let config = SimulationConfig::deterministic_testing();
        assert_eq!(config.deterministic_seed, Some(42));
    }
}
