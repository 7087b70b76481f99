//! Tuning knobs and resolved paths for a single run, collected into one
//! struct constructed at startup and passed by reference into the stages.

use std::path::PathBuf;

const DEFAULT_MIN_PATTERN_SIZE: usize = 3;
const DEFAULT_PATTERN_START_OFFSET: usize = 10;
const DEFAULT_FALLBACK_VOTE_THRESHOLD: u32 = 10;

fn env_override<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub old_root: PathBuf,
    pub new_root: PathBuf,
    pub reference_path: PathBuf,
    pub output_path: PathBuf,
    pub log_path: PathBuf,
    pub verify_path: Option<PathBuf>,

    pub min_pattern_size: usize,
    pub pattern_start_offset: usize,
    pub fallback_vote_threshold: u32,
}

impl RunConfig {
    /// Build from parsed CLI args, applying the `CROSSMAP_*` environment
    /// overrides to the tuning knobs over their reference defaults.
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            old_root: cli.old_root.clone(),
            new_root: cli.new_root.clone(),
            reference_path: cli.reference.clone(),
            output_path: cli.output.clone(),
            log_path: cli.log_file.clone(),
            verify_path: cli.verify.clone(),
            min_pattern_size: env_override(
                "CROSSMAP_MIN_PATTERN_SIZE",
                DEFAULT_MIN_PATTERN_SIZE,
            ),
            pattern_start_offset: env_override(
                "CROSSMAP_PATTERN_START_OFFSET",
                DEFAULT_PATTERN_START_OFFSET,
            ),
            fallback_vote_threshold: env_override(
                "CROSSMAP_FALLBACK_VOTE_THRESHOLD",
                DEFAULT_FALLBACK_VOTE_THRESHOLD,
            ),
        }
    }
}
