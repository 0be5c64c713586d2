// src/classify/matcher.rs

use crate::config::TieBreak;
use crate::types::{BestMatch, MatchOutcome, Primer};

/// Number of positions where `primer` differs from `read[offset..offset + primer.len()]`.
///
/// Comparison is byte-exact; 'N' is an ordinary symbol here.
/// Callers must ensure the window fits inside the read.
#[inline]
pub fn hamming(primer: &[u8], read: &[u8], offset: usize) -> usize {
    debug_assert!(offset + primer.len() <= read.len());
    primer
        .iter()
        .zip(&read[offset..offset + primer.len()])
        .filter(|(p, r)| p != r)
        .count()
}

/// Searches every primer (in list order) at every start offset in `start..end`
/// (ascending) and returns the candidate with the smallest Hamming distance.
///
/// Windows that would run past the end of the read are skipped. Equal-distance
/// candidates are resolved by `tie_break`. If no window fits at all the result is
/// `MatchOutcome::NoViableCandidate`.
pub fn select_best_match(
    read: &[u8],
    primers: &[Primer],
    start: usize,
    end: usize,
    tie_break: TieBreak,
) -> MatchOutcome {
    let mut best: Option<BestMatch> = None;

    for (primer_index, primer) in primers.iter().enumerate() {
        let primer_seq = primer.normalized.as_slice();
        for offset in start..end {
            if primer_seq.len() > read.len() || offset > read.len() - primer_seq.len() {
                // every later offset is longer still
                break;
            }
            let distance = hamming(primer_seq, read, offset);
            log::trace!("Hamming distance for {} at {}: {}", primer.id, offset, distance);

            let replace = match (best, tie_break) {
                (None, _) => true,
                (Some(current), TieBreak::Last) => distance <= current.distance,
                (Some(current), TieBreak::First) => distance < current.distance,
            };
            if replace {
                best = Some(BestMatch {
                    primer_index,
                    offset,
                    distance,
                });
            }
        }
    }

    match best {
        Some(m) => MatchOutcome::Found(m),
        None => MatchOutcome::NoViableCandidate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primers::normalize_primers;
    use crate::types::RawPrimer;

    fn primers(seqs: &[(&str, &str)]) -> Vec<Primer> {
        normalize_primers(seqs.iter().map(|(id, s)| RawPrimer::new(*id, s)).collect()).unwrap()
    }

    #[test]
    fn hamming_counts_mismatches() {
        assert_eq!(hamming(b"ACGT", b"TTTTACGTGGGG", 4), 0);
        assert_eq!(hamming(b"ACGT", b"TTTTACGAGGGG", 4), 1);
        assert_eq!(hamming(b"ACGT", b"TTTTACGTGGGG", 0), 3);
        assert_eq!(hamming(b"ACGT", b"TGCA", 0), 4);
        // masks are not wildcards
        assert_eq!(hamming(b"ANGT", b"ACGT", 0), 1);
        assert_eq!(hamming(b"ACGT", b"ACGT", 0), 0);
    }

    #[test]
    fn hamming_is_bounded_by_primer_length() {
        let read = b"GATTACAGATTACA";
        let primer = b"CCCGG";
        for offset in 0..=read.len() - primer.len() {
            let d = hamming(primer, read, offset);
            assert!(d <= primer.len());
        }
    }

    #[test]
    fn finds_exact_match_in_window() {
        let p = primers(&[("p1", "ACGT")]);
        let outcome = select_best_match(b"TTTTACGTGGGG", &p, 2, 6, TieBreak::Last);
        assert_eq!(
            outcome,
            MatchOutcome::Found(BestMatch {
                primer_index: 0,
                offset: 4,
                distance: 0
            })
        );
    }

    #[test]
    fn masked_primer_matches_like_stripped_primer() {
        let masked = primers(&[("p1", "NNACGTNN")]);
        let plain = primers(&[("p1", "ACGT")]);
        let read = b"TTTTACGTGGGG";
        assert_eq!(
            select_best_match(read, &masked, 2, 6, TieBreak::Last),
            select_best_match(read, &plain, 2, 6, TieBreak::Last)
        );
    }

    #[test]
    fn ties_follow_policy() {
        // both primers match exactly at offset 0
        let p = primers(&[("a", "ACG"), ("b", "ACG")]);
        let read = b"ACGACG";
        let last = select_best_match(read, &p, 0, 4, TieBreak::Last);
        let first = select_best_match(read, &p, 0, 4, TieBreak::First);
        assert_eq!(
            last,
            MatchOutcome::Found(BestMatch {
                primer_index: 1,
                offset: 3,
                distance: 0
            })
        );
        assert_eq!(
            first,
            MatchOutcome::Found(BestMatch {
                primer_index: 0,
                offset: 0,
                distance: 0
            })
        );
    }

    #[test]
    fn first_policy_accepts_a_worst_case_first_candidate() {
        let p = primers(&[("a", "AAAA")]);
        let outcome = select_best_match(b"CCCC", &p, 0, 3, TieBreak::First);
        assert_eq!(
            outcome,
            MatchOutcome::Found(BestMatch {
                primer_index: 0,
                offset: 0,
                distance: 4
            })
        );
    }

    #[test]
    fn short_windows_are_skipped() {
        let p = primers(&[("long", "ACGTACGTAC"), ("short", "GG")]);
        // only the short primer fits
        let outcome = select_best_match(b"TTTTGG", &p, 2, 6, TieBreak::Last);
        assert_eq!(
            outcome,
            MatchOutcome::Found(BestMatch {
                primer_index: 1,
                offset: 4,
                distance: 0
            })
        );
    }

    #[test]
    fn too_short_read_has_no_candidate() {
        let p = primers(&[("p1", "ACGT"), ("p2", "GGGGG")]);
        assert_eq!(
            select_best_match(b"ACGTA", &p, 2, 6, TieBreak::Last),
            MatchOutcome::NoViableCandidate
        );
        assert_eq!(
            select_best_match(b"", &p, 0, 6, TieBreak::First),
            MatchOutcome::NoViableCandidate
        );
    }

    #[test]
    fn window_near_usize_max_has_no_candidate() {
        let p = primers(&[("p1", "ACGT")]);
        assert_eq!(
            select_best_match(b"TTTTACGTGGGG", &p, usize::MAX - 1, usize::MAX, TieBreak::Last),
            MatchOutcome::NoViableCandidate
        );
    }

    #[test]
    fn best_distance_is_minimal_over_grid() {
        let p = primers(&[("a", "ACGTA"), ("b", "TTGCA"), ("c", "GANTC")]);
        let read = b"GGATCCTTGCAAGACGTTAGANTCA";
        let (start, end) = (1, 15);
        for tie_break in [TieBreak::Last, TieBreak::First] {
            let best = match select_best_match(read, &p, start, end, tie_break) {
                MatchOutcome::Found(m) => m,
                MatchOutcome::NoViableCandidate => panic!("expected a candidate"),
            };
            for primer in &p {
                for offset in start..end {
                    if offset + primer.len() <= read.len() {
                        assert!(best.distance <= hamming(&primer.normalized, read, offset));
                    }
                }
            }
        }
    }
}
