//src/config.rs

use crate::error::{BarcodeError, Result};

pub const DEFAULT_PRIMER_START: usize = 6;
pub const DEFAULT_PRIMER_END: usize = 15;
pub const DEFAULT_MAX_HAMMING_DISTANCE: usize = 1;
pub const DEFAULT_KV_SEPARATOR: &str = ":";
pub const DEFAULT_PAIR_SEPARATOR: &str = "_";

/// How the selector treats a candidate whose distance equals the current best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum TieBreak {
    /// Replace on `<=`: the last candidate evaluated at the minimum distance wins.
    #[default]
    Last,
    /// Replace on `<`: the first candidate evaluated at the minimum distance wins.
    First,
}

/// Parameters shared by every read in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchConfig {
    /// First primer start offset searched (inclusive).
    pub primer_start: usize,
    /// Last primer start offset searched (exclusive).
    pub primer_end: usize,
    /// Reads whose best distance is at most this are `Matched`.
    pub max_hamming_distance: usize,
    pub kv_separator: String,
    pub pair_separator: String,
    pub tie_break: TieBreak,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            primer_start: DEFAULT_PRIMER_START,
            primer_end: DEFAULT_PRIMER_END,
            max_hamming_distance: DEFAULT_MAX_HAMMING_DISTANCE,
            kv_separator: DEFAULT_KV_SEPARATOR.to_string(),
            pair_separator: DEFAULT_PAIR_SEPARATOR.to_string(),
            tie_break: TieBreak::default(),
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.primer_start >= self.primer_end {
            return Err(BarcodeError::InvalidConfig(format!(
                "primer start ({}) must be less than primer end ({})",
                self.primer_start, self.primer_end
            )));
        }
        if self.kv_separator.is_empty() {
            return Err(BarcodeError::InvalidConfig(
                "key/value separator must not be empty".to_string(),
            ));
        }
        if self.pair_separator.is_empty() {
            return Err(BarcodeError::InvalidConfig(
                "pair separator must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
