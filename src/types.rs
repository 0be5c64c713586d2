//src/types.rs

/// A primer as read from the primer file, before any masking is removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPrimer {
    pub id: String,
    pub seq: Vec<u8>,
}

impl RawPrimer {
    pub fn new(id: impl Into<String>, seq: impl AsRef<[u8]>) -> Self {
        Self {
            id: id.into(),
            seq: seq.as_ref().to_vec(),
        }
    }
}

/// A primer ready for matching.
/// `normalized` is `raw` without its leading/trailing 'N' run and is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primer {
    pub id: String,
    pub raw: Vec<u8>,
    pub normalized: Vec<u8>,
}

impl Primer {
    pub fn len(&self) -> usize {
        self.normalized.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// One sequenced read. `quals` holds the raw ASCII quality line, one byte per base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastqRead {
    pub id: String,
    pub description: Option<String>,
    pub seq: Vec<u8>,
    pub quals: Vec<u8>,
}

impl FastqRead {
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// The winning (primer, offset) pair for one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestMatch {
    /// Index into the normalized primer list.
    pub primer_index: usize,
    pub offset: usize,
    pub distance: usize,
}

/// Result of searching one read against the primer × offset grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Found(BestMatch),
    /// The read is too short for every (primer, offset) window.
    NoViableCandidate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Matched,
    Unmatched,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Matched => "matched",
            Classification::Unmatched => "unmatched",
        }
    }
}

/// Everything derived from a read and its match outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeRecord {
    pub primer_id: String,
    pub distance: usize,
    pub barcode: Vec<u8>,
    pub barcode_length: usize,
    pub classification: Classification,
}
