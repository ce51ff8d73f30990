//! Statistics simulation standing in for a real download engine.
//!
//! Progress is a bounded random walk, not a model of network behavior. The
//! walk sits behind [`ProgressSource`] so a real engine could be substituted
//! without touching the manager or any adapter.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::record::TorrentRecord;
use super::TorrentStatus;
use crate::config::SimulationConfig;

/// What a single statistics step did to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Record is paused or terminal; nothing to advance
    Idle,
    /// Progress advanced but the download is still running
    Advanced,
    /// This step drove progress to 100 and the record just completed
    Completed,
}

/// Source of per-tick statistics updates for a record.
///
/// Implementations must keep `progress` non-decreasing while a record is
/// downloading and report [`StepOutcome::Completed`] exactly once, on the
/// step that reaches 100 percent.
pub trait ProgressSource: Send {
    /// Applies one statistics step to the record.
    fn step(&mut self, record: &mut TorrentRecord) -> StepOutcome;
}

/// The reference random-walk simulation.
///
/// Draws every value independently per tick from the configured bounds.
/// Seedable for reproducible runs.
pub struct RandomWalkSource {
    config: SimulationConfig,
    rng: ChaCha8Rng,
}

impl RandomWalkSource {
    /// Creates a source from the simulation configuration.
    ///
    /// Uses the configured deterministic seed when present, OS entropy
    /// otherwise.
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.deterministic_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self { config, rng }
    }
}

impl ProgressSource for RandomWalkSource {
    fn step(&mut self, record: &mut TorrentRecord) -> StepOutcome {
        match record.status {
            TorrentStatus::Downloading => {
                let (step_lo, step_hi) = self.config.progress_step_pct;
                record.progress = (record.progress + self.rng.random_range(step_lo..=step_hi))
                    .min(100.0);

                let (dl_lo, dl_hi) = self.config.download_speed_kbps;
                let (ul_lo, ul_hi) = self.config.upload_speed_kbps;
                record.download_speed = self.rng.random_range(dl_lo..=dl_hi);
                record.upload_speed = self.rng.random_range(ul_lo..=ul_hi);

                let (peers_lo, peers_hi) = self.config.peers;
                let (seeds_lo, seeds_hi) = self.config.seeds;
                record.peers = self.rng.random_range(peers_lo..=peers_hi);
                record.seeds = self.rng.random_range(seeds_lo..=seeds_hi);

                record.downloaded =
                    ((record.progress / 100.0) * record.total_size as f64) as u64;

                record.eta = if record.download_speed > 0.0 {
                    let remaining_kb =
                        (record.total_size - record.downloaded) as f64 / 1024.0;
                    Some(Duration::from_secs(
                        (remaining_kb / record.download_speed) as u64,
                    ))
                } else {
                    None
                };

                if record.progress >= 100.0 {
                    record.progress = 100.0;
                    record.downloaded = record.total_size;
                    record.status = TorrentStatus::Completed;
                    record.download_speed = 0.0;
                    record.eta = Some(Duration::ZERO);
                    StepOutcome::Completed
                } else {
                    StepOutcome::Advanced
                }
            }
            TorrentStatus::Paused => {
                record.download_speed = 0.0;
                record.upload_speed = 0.0;
                record.eta = None;
                StepOutcome::Idle
            }
            TorrentStatus::Completed | TorrentStatus::Error => StepOutcome::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::torrent::record::TorrentOrigin;
    use crate::torrent::TorrentId;

    fn seeded_source() -> RandomWalkSource {
        RandomWalkSource::new(SimulationConfig::deterministic_testing())
    }

    fn test_record() -> TorrentRecord {
        TorrentRecord::new(
            TorrentId::from_origin("magnet:?xt=urn:btih:SIM"),
            "Sim".to_string(),
            TorrentOrigin::Magnet("magnet:?xt=urn:btih:SIM".to_string()),
            500 * 1024 * 1024,
            PathBuf::from("/tmp/nimbus-test/Sim"),
        )
    }

    #[test]
    fn test_progress_is_monotone_and_bounded() {
        let mut source = seeded_source();
        let mut record = test_record();
        let mut previous = 0.0;

        for _ in 0..50 {
            source.step(&mut record);
            assert!(record.progress >= previous);
            assert!(record.progress <= 100.0);
            assert!(record.downloaded <= record.total_size);
            previous = record.progress;
            if record.status == TorrentStatus::Completed {
                break;
            }
        }
    }

    #[test]
    fn test_downloading_draws_stay_within_bounds() {
        let mut source = seeded_source();
        let mut record = test_record();

        source.step(&mut record);
        assert!((500.0..=5000.0).contains(&record.download_speed));
        assert!((50.0..=500.0).contains(&record.upload_speed));
        assert!((5..=50).contains(&record.peers));
        assert!((10..=100).contains(&record.seeds));
        assert!(record.eta.is_some());
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let mut source = seeded_source();
        let mut record = test_record();
        let mut completions = 0;

        // Worst case is 200 ticks at the minimum step of 0.5 percent.
        for _ in 0..300 {
            if source.step(&mut record) == StepOutcome::Completed {
                completions += 1;
            }
        }

        assert_eq!(completions, 1);
        assert_eq!(record.status, TorrentStatus::Completed);
        assert_eq!(record.progress, 100.0);
        assert_eq!(record.downloaded, record.total_size);
        assert_eq!(record.download_speed, 0.0);
        assert_eq!(record.eta, Some(Duration::ZERO));
    }

    #[test]
    fn test_paused_record_freezes_progress_and_zeroes_speeds() {
        let mut source = seeded_source();
        let mut record = test_record();

        source.step(&mut record);
        let progress = record.progress;
        let peers = record.peers;
        let seeds = record.seeds;

        record.status = TorrentStatus::Paused;
        assert_eq!(source.step(&mut record), StepOutcome::Idle);
        assert_eq!(record.progress, progress);
        assert_eq!(record.peers, peers);
        assert_eq!(record.seeds, seeds);
        assert_eq!(record.download_speed, 0.0);
        assert_eq!(record.upload_speed, 0.0);
        assert!(record.eta.is_none());
    }

    #[test]
    fn test_terminal_states_are_untouched() {
        let mut source = seeded_source();
        let mut record = test_record();
        record.status = TorrentStatus::Error;
        record.progress = 12.5;

        assert_eq!(source.step(&mut record), StepOutcome::Idle);
        assert_eq!(record.progress, 12.5);
        assert_eq!(record.status, TorrentStatus::Error);
    }

    #[test]
    fn test_seeded_walks_are_reproducible() {
        let mut first = seeded_source();
        let mut second = seeded_source();
        let mut a = test_record();
        let mut b = test_record();

        for _ in 0..10 {
            first.step(&mut a);
            second.step(&mut b);
        }

        assert_eq!(a.progress, b.progress);
        assert_eq!(a.download_speed, b.download_speed);
        assert_eq!(a.peers, b.peers);
    }
}
