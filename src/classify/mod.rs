pub mod classify_read;
pub mod classify_stats;
pub mod matcher;

pub use classify_read::{annotate_read, annotated_id, classify_read, NO_PRIMER};
pub use classify_stats::{AggregateTables, CountTables};
pub use matcher::{hamming, select_best_match};
