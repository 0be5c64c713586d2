// src/classify/classify_stats.rs

use ahash::AHashMap;
use std::collections::BTreeMap;

use crate::types::Classification;

/// Counts for one classification class:
///   - reads per barcode length, iterated in ascending length
///   - reads per primer id, iterated in first-observed order
#[derive(Default, Debug, Clone)]
pub struct CountTables {
    by_length: BTreeMap<usize, u64>,
    by_primer: Vec<(String, u64)>,
    /// primer id -> slot in `by_primer`
    primer_slots: AHashMap<String, usize>,
}

// `primer_slots` is derived from `by_primer`
impl PartialEq for CountTables {
    fn eq(&self, other: &Self) -> bool {
        self.by_length == other.by_length && self.by_primer == other.by_primer
    }
}

impl Eq for CountTables {}

impl CountTables {
    pub fn record(&mut self, barcode_length: usize, primer_id: &str) {
        *self.by_length.entry(barcode_length).or_insert(0) += 1;

        match self.primer_slots.get(primer_id) {
            Some(&slot) => self.by_primer[slot].1 += 1,
            None => {
                self.primer_slots
                    .insert(primer_id.to_string(), self.by_primer.len());
                self.by_primer.push((primer_id.to_string(), 1));
            }
        }
    }

    pub fn length_counts(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.by_length.iter().map(|(&len, &count)| (len, count))
    }

    pub fn primer_counts(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.by_primer.iter().map(|(id, count)| (id.as_str(), *count))
    }

    pub fn length_count(&self, barcode_length: usize) -> u64 {
        self.by_length.get(&barcode_length).copied().unwrap_or(0)
    }

    pub fn primer_count(&self, primer_id: &str) -> u64 {
        self.primer_slots
            .get(primer_id)
            .map_or(0, |&slot| self.by_primer[slot].1)
    }

    /// Reads recorded, summed over the length table.
    pub fn total_by_length(&self) -> u64 {
        self.by_length.values().sum()
    }

    /// Reads recorded, summed over the primer table.
    pub fn total_by_primer(&self) -> u64 {
        self.by_primer.iter().map(|(_, c)| c).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_length.is_empty()
    }
}

/// Length and primer tables for both classes.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct AggregateTables {
    pub matched: CountTables,
    pub unmatched: CountTables,
}

impl AggregateTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bump exactly one length counter and one primer counter of `classification`.
    pub fn record(&mut self, classification: Classification, barcode_length: usize, primer_id: &str) {
        self.get_mut(classification).record(barcode_length, primer_id);
    }

    pub fn get(&self, classification: Classification) -> &CountTables {
        match classification {
            Classification::Matched => &self.matched,
            Classification::Unmatched => &self.unmatched,
        }
    }

    fn get_mut(&mut self, classification: Classification) -> &mut CountTables {
        match classification {
            Classification::Matched => &mut self.matched,
            Classification::Unmatched => &mut self.unmatched,
        }
    }

    pub fn total(&self) -> u64 {
        self.matched.total_by_length() + self.unmatched.total_by_length()
    }

    /// Both tables of each class agree on the number of reads in that class.
    pub fn is_conserved(&self) -> bool {
        [&self.matched, &self.unmatched]
            .iter()
            .all(|t| t.total_by_length() == t.total_by_primer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_iterate_ascending() {
        let mut t = CountTables::default();
        for len in [12, 4, 8, 4, 0] {
            t.record(len, "p");
        }
        let rows: Vec<_> = t.length_counts().collect();
        assert_eq!(rows, vec![(0, 1), (4, 2), (8, 1), (12, 1)]);
    }

    #[test]
    fn primers_iterate_in_first_seen_order() {
        let mut t = CountTables::default();
        for id in ["zeta", "alpha", "zeta", "mid", "alpha", "zeta"] {
            t.record(1, id);
        }
        let rows: Vec<_> = t.primer_counts().collect();
        assert_eq!(rows, vec![("zeta", 3), ("alpha", 2), ("mid", 1)]);
        assert_eq!(t.primer_count("alpha"), 2);
        assert_eq!(t.primer_count("missing"), 0);
    }

    #[test]
    fn record_touches_only_its_class() {
        let mut tables = AggregateTables::new();
        tables.record(Classification::Matched, 4, "p1");
        tables.record(Classification::Matched, 4, "p2");
        tables.record(Classification::Unmatched, 7, "p1");

        assert_eq!(tables.matched.length_count(4), 2);
        assert_eq!(tables.matched.length_count(7), 0);
        assert_eq!(tables.unmatched.length_count(7), 1);
        assert_eq!(tables.get(Classification::Unmatched).primer_count("p1"), 1);
        assert_eq!(tables.total(), 3);
        assert!(tables.is_conserved());
    }

    #[test]
    fn empty_tables_are_conserved() {
        let tables = AggregateTables::new();
        assert!(tables.matched.is_empty());
        assert_eq!(tables.total(), 0);
        assert!(tables.is_conserved());
    }
}
