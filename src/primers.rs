//src/primers.rs

use ahash::AHashSet;
use noodles::fasta;
use std::io::{self, BufRead};
use std::path::Path;

use crate::error::{BarcodeError, Result};
use crate::fastq::open_maybe_gz;
use crate::types::{Primer, RawPrimer};

/// The placeholder base stripped from primer ends before matching.
pub const MASK_SYMBOL: u8 = b'N';

/// Anything that can hand over the complete raw primer list up front.
pub trait PrimerSource {
    fn read_primers(self) -> io::Result<Vec<RawPrimer>>;
}

impl PrimerSource for Vec<RawPrimer> {
    fn read_primers(self) -> io::Result<Vec<RawPrimer>> {
        Ok(self)
    }
}

/// Reads a FASTA file of primers:
/// ```text
/// >primer_id optional description
/// ACGTNNACGT
/// ```
/// The primer id is the record name; the description is ignored.
pub struct FastaPrimerReader<R: BufRead> {
    reader: fasta::io::Reader<R>,
}

impl<R: BufRead> FastaPrimerReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: fasta::io::Reader::new(reader),
        }
    }
}

impl FastaPrimerReader<Box<dyn BufRead>> {
    /// Opens a (possibly .gz) FASTA file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::new(open_maybe_gz(path.as_ref())?))
    }
}

impl<R: BufRead> PrimerSource for FastaPrimerReader<R> {
    fn read_primers(mut self) -> io::Result<Vec<RawPrimer>> {
        let mut primers = Vec::new();
        for result in self.reader.records() {
            let record = result?;
            let id = String::from_utf8_lossy(record.name()).to_string();
            primers.push(RawPrimer::new(id, record.sequence().as_ref()));
        }
        Ok(primers)
    }
}

/// Removes the run of `MASK_SYMBOL` at each end of `seq`. Interior masks are kept.
pub fn strip_masked_ends(seq: &[u8]) -> &[u8] {
    let start = seq
        .iter()
        .position(|&b| b != MASK_SYMBOL)
        .unwrap_or(seq.len());
    let end = seq
        .iter()
        .rposition(|&b| b != MASK_SYMBOL)
        .map_or(start, |i| i + 1);
    &seq[start..end]
}

/// Builds the fixed primer set used for every read, preserving input order.
pub fn normalize_primers(raw: Vec<RawPrimer>) -> Result<Vec<Primer>> {
    if raw.is_empty() {
        return Err(BarcodeError::NoPrimers);
    }

    let mut seen = AHashSet::with_capacity(raw.len());
    let mut primers = Vec::with_capacity(raw.len());
    for RawPrimer { id, seq } in raw {
        if !seen.insert(id.clone()) {
            return Err(BarcodeError::DuplicatePrimer { id });
        }
        let normalized = strip_masked_ends(&seq).to_vec();
        if normalized.is_empty() {
            return Err(BarcodeError::InvalidPrimer { id });
        }
        if normalized.len() != seq.len() {
            log::debug!(
                "Primer {id}: stripped masked ends {} -> {}",
                String::from_utf8_lossy(&seq),
                String::from_utf8_lossy(&normalized)
            );
        }
        primers.push(Primer {
            id,
            raw: seq,
            normalized,
        });
    }
    Ok(primers)
}

/// Reads and normalizes all primers from `source`.
pub fn load_primers<S: PrimerSource>(source: S) -> Result<Vec<Primer>> {
    let raw = source.read_primers().map_err(BarcodeError::PrimerSource)?;
    let primers = normalize_primers(raw)?;
    log::info!("Loaded {} primers", primers.len());
    Ok(primers)
}
