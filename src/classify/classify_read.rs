// src/classify/classify_read.rs

use std::fmt::Write;

use crate::config::MatchConfig;
use crate::types::{BarcodeRecord, Classification, FastqRead, MatchOutcome, Primer};

/// Primer label reported for reads that no primer window fits.
pub const NO_PRIMER: &str = "none";

/// Field keys appended to annotated read identifiers, in output order.
pub const FIELD_PRIMER: &str = "PRIMER";
pub const FIELD_DISTANCE: &str = "PRIMERHAMMINGDISTANCE";
pub const FIELD_BARCODE_LENGTH: &str = "BARCODELENGTH";
pub const FIELD_BARCODE: &str = "BARCODE";

/// Turn a match outcome into a barcode record.
///
/// * `Found` => barcode is the read prefix before the primer; `Matched` iff
///   `distance <= max_hamming_distance`.
/// * `NoViableCandidate` => always `Unmatched`, distance is the read length and
///   the barcode is the whole read.
pub fn classify_read(
    read: &FastqRead,
    outcome: MatchOutcome,
    primers: &[Primer],
    max_hamming_distance: usize,
) -> BarcodeRecord {
    match outcome {
        MatchOutcome::Found(best) => {
            let classification = if best.distance <= max_hamming_distance {
                Classification::Matched
            } else {
                Classification::Unmatched
            };
            BarcodeRecord {
                primer_id: primers[best.primer_index].id.clone(),
                distance: best.distance,
                barcode: read.seq[..best.offset].to_vec(),
                barcode_length: best.offset,
                classification,
            }
        }
        MatchOutcome::NoViableCandidate => BarcodeRecord {
            primer_id: NO_PRIMER.to_string(),
            distance: read.len(),
            barcode: read.seq.clone(),
            barcode_length: read.len(),
            classification: Classification::Unmatched,
        },
    }
}

/// `<id><pair>PRIMER<kv>..<pair>PRIMERHAMMINGDISTANCE<kv>..<pair>BARCODELENGTH<kv>..<pair>BARCODE<kv>..`
pub fn annotated_id(id: &str, record: &BarcodeRecord, kv_sep: &str, pair_sep: &str) -> String {
    let mut out = String::with_capacity(id.len() + 64 + record.barcode.len());
    out.push_str(id);
    let barcode = String::from_utf8_lossy(&record.barcode);
    let fields: [(&str, &dyn std::fmt::Display); 4] = [
        (FIELD_PRIMER, &record.primer_id),
        (FIELD_DISTANCE, &record.distance),
        (FIELD_BARCODE_LENGTH, &record.barcode_length),
        (FIELD_BARCODE, &barcode),
    ];
    for (key, value) in fields {
        let _ = write!(out, "{pair_sep}{key}{kv_sep}{value}");
    }
    out
}

/// Rename `read` with its barcode annotation. Sequence, qualities and
/// description are left untouched.
pub fn annotate_read(mut read: FastqRead, record: &BarcodeRecord, config: &MatchConfig) -> FastqRead {
    read.id = annotated_id(&read.id, record, &config.kv_separator, &config.pair_separator);
    read
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BestMatch;

    fn read(seq: &str) -> FastqRead {
        FastqRead {
            id: "r1".to_string(),
            description: None,
            seq: seq.as_bytes().to_vec(),
            quals: vec![b'I'; seq.len()],
        }
    }

    fn primer(id: &str, seq: &str) -> Primer {
        Primer {
            id: id.to_string(),
            raw: seq.as_bytes().to_vec(),
            normalized: seq.as_bytes().to_vec(),
        }
    }

    fn found(offset: usize, distance: usize) -> MatchOutcome {
        MatchOutcome::Found(BestMatch {
            primer_index: 0,
            offset,
            distance,
        })
    }

    #[test]
    fn barcode_is_prefix_before_primer() {
        let primers = [primer("p1", "ACGT")];
        let record = classify_read(&read("TTTTACGTGGGG"), found(4, 0), &primers, 1);
        assert_eq!(record.barcode, b"TTTT");
        assert_eq!(record.barcode_length, 4);
        assert_eq!(record.primer_id, "p1");
        assert_eq!(record.distance, 0);
        assert_eq!(record.classification, Classification::Matched);
    }

    #[test]
    fn threshold_is_inclusive() {
        let primers = [primer("p1", "ACGT")];
        let r = read("TTTTACGAGGGG");
        assert_eq!(
            classify_read(&r, found(4, 2), &primers, 2).classification,
            Classification::Matched
        );
        assert_eq!(
            classify_read(&r, found(4, 3), &primers, 2).classification,
            Classification::Unmatched
        );
    }

    #[test]
    fn no_candidate_is_unmatched_whole_read() {
        let primers = [primer("p1", "ACGT")];
        let record = classify_read(&read("ACG"), MatchOutcome::NoViableCandidate, &primers, 1);
        assert_eq!(record.classification, Classification::Unmatched);
        assert_eq!(record.distance, 3);
        assert_eq!(record.barcode, b"ACG");
        assert_eq!(record.barcode_length, 3);
        assert_eq!(record.primer_id, NO_PRIMER);
    }

    #[test]
    fn annotation_uses_fixed_field_order() {
        let primers = [primer("p1", "ACGT")];
        let record = classify_read(&read("TTTTACGTGGGG"), found(4, 0), &primers, 1);
        assert_eq!(
            annotated_id("r1", &record, ":", "_"),
            "r1_PRIMER:p1_PRIMERHAMMINGDISTANCE:0_BARCODELENGTH:4_BARCODE:TTTT"
        );
        assert_eq!(
            annotated_id("r1", &record, "=", ";"),
            "r1;PRIMER=p1;PRIMERHAMMINGDISTANCE=0;BARCODELENGTH=4;BARCODE=TTTT"
        );
    }

    #[test]
    fn annotate_read_keeps_sequence_and_description() {
        let primers = [primer("p1", "ACGT")];
        let mut r = read("TTTTACGTGGGG");
        r.description = Some("lane=1".to_string());
        let record = classify_read(&r, found(4, 0), &primers, 1);
        let annotated = annotate_read(r.clone(), &record, &MatchConfig::default());
        assert!(annotated.id.starts_with("r1_PRIMER:p1"));
        assert_eq!(annotated.seq, r.seq);
        assert_eq!(annotated.quals, r.quals);
        assert_eq!(annotated.description, r.description);
    }
}
