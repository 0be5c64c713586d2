// src/lib.rs
pub mod classify;
pub mod config;
pub mod error;
pub mod fastq;
pub mod primers;
pub mod report;
pub mod types;

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::classify::{annotate_read, classify_read, select_best_match, AggregateTables};
use crate::config::MatchConfig;
use crate::error::{BarcodeError, Result};
use crate::fastq::{FastqReader, FastqWriter, OutputFile, ReadSink, ReadSource};
use crate::primers::{load_primers, FastaPrimerReader};
use crate::report::{write_tables, ReportEmitter, TableSinks};
use crate::types::{Classification, MatchOutcome, Primer};

/// What a run produced besides the annotated reads themselves.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BarcodeResults {
    /// Per-class barcode length and primer counts
    pub tables: AggregateTables,
    pub total_reads: u64,
    pub matched_reads: u64,
    pub unmatched_reads: u64,
    /// Unmatched reads that were too short for any primer window
    pub no_viable_reads: u64,
    /// Original identifier of the last read fully processed
    pub last_read_id: Option<String>,
}

/// Single forward pass over `reads`: match, classify, count and emit each read
/// before pulling the next one.
///
/// Annotated reads are written to `emitter` in input order. The count tables
/// are returned, not written; see [`report::write_tables`].
pub fn find_barcodes<S, M, U>(
    config: &MatchConfig,
    primers: &[Primer],
    reads: S,
    emitter: &mut ReportEmitter<M, U>,
) -> Result<BarcodeResults>
where
    S: ReadSource,
    M: ReadSink,
    U: ReadSink,
{
    config.validate()?;
    if primers.is_empty() {
        return Err(BarcodeError::NoPrimers);
    }
    log::info!(
        "Searching {} primers at offsets {}..{} (max Hamming distance {}, ties: {:?})",
        primers.len(),
        config.primer_start,
        config.primer_end,
        config.max_hamming_distance,
        config.tie_break
    );

    let mut results = BarcodeResults::default();

    for read_result in reads {
        let read = read_result.map_err(|source| BarcodeError::SourceExhaustedWithError {
            last_read: results.last_read_id.clone(),
            source,
        })?;

        let outcome = select_best_match(
            &read.seq,
            primers,
            config.primer_start,
            config.primer_end,
            config.tie_break,
        );
        if outcome == MatchOutcome::NoViableCandidate {
            log::warn!(
                "Read {} ({} bp) is too short for any primer window",
                read.id,
                read.len()
            );
            results.no_viable_reads += 1;
        }

        let record = classify_read(&read, outcome, primers, config.max_hamming_distance);
        log::trace!(
            "{}: {:?} primer={} distance={} barcode_length={}",
            read.id,
            record.classification,
            record.primer_id,
            record.distance,
            record.barcode_length
        );

        results
            .tables
            .record(record.classification, record.barcode_length, &record.primer_id);
        match record.classification {
            Classification::Matched => results.matched_reads += 1,
            Classification::Unmatched => results.unmatched_reads += 1,
        }
        results.total_reads += 1;

        let original_id = read.id.clone();
        let annotated = annotate_read(read, &record, config);
        emitter
            .emit(record.classification, &annotated)
            .map_err(|e| e.after_read(results.last_read_id.as_deref()))?;
        results.last_read_id = Some(original_id);
    }

    emitter
        .flush()
        .map_err(|e| e.after_read(results.last_read_id.as_deref()))?;
    log::info!(
        "Processed {} reads: {} matched, {} unmatched ({} too short for any primer)",
        results.total_reads,
        results.matched_reads,
        results.unmatched_reads,
        results.no_viable_reads
    );
    Ok(results)
}

/// Where the file-based entry point writes its six outputs.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub output_dir: PathBuf,
    pub prefix: String,
    /// gzip the two FASTQ outputs
    pub gzip: bool,
}

impl OutputOptions {
    pub fn reads_path(&self, classification: Classification) -> PathBuf {
        let ext = if self.gzip { "fastq.gz" } else { "fastq" };
        self.output_dir
            .join(format!("{}_{}.{}", self.prefix, classification.label(), ext))
    }

    pub fn lengths_path(&self, classification: Classification) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{}_barcode_lengths.csv",
            self.prefix,
            classification.label()
        ))
    }

    pub fn primers_path(&self, classification: Classification) -> PathBuf {
        self.output_dir
            .join(format!("{}_{}_primers.csv", self.prefix, classification.label()))
    }
}

fn create_table(path: &Path) -> Result<BufWriter<File>> {
    Ok(BufWriter::new(File::create(path)?))
}

/// Load primers and reads from disk, run [`find_barcodes`], and write the
/// matched/unmatched FASTQ files plus the four count tables.
pub fn find_barcodes_in_files(
    config: &MatchConfig,
    primers_path: &Path,
    reads_path: &Path,
    outputs: &OutputOptions,
) -> Result<BarcodeResults> {
    config.validate()?;

    let primer_source =
        FastaPrimerReader::from_path(primers_path).map_err(BarcodeError::PrimerSource)?;
    let primers = load_primers(primer_source)?;

    let reads = FastqReader::from_path(reads_path)?;

    if !outputs.output_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&outputs.output_dir)?;
    }
    let matched = OutputFile::create(outputs.reads_path(Classification::Matched), outputs.gzip)?;
    let unmatched =
        OutputFile::create(outputs.reads_path(Classification::Unmatched), outputs.gzip)?;
    let mut emitter = ReportEmitter::new(FastqWriter::new(matched), FastqWriter::new(unmatched));

    let results = find_barcodes(config, &primers, reads, &mut emitter)?;

    let last_read = results.last_read_id.as_deref();
    let (matched, unmatched) = emitter.into_sinks();
    matched
        .into_inner()
        .finish()
        .map_err(|e| BarcodeError::sink("matched reads")(e).after_read(last_read))?;
    unmatched
        .into_inner()
        .finish()
        .map_err(|e| BarcodeError::sink("unmatched reads")(e).after_read(last_read))?;

    let sinks = TableSinks {
        matched_lengths: create_table(&outputs.lengths_path(Classification::Matched))?,
        matched_primers: create_table(&outputs.primers_path(Classification::Matched))?,
        unmatched_lengths: create_table(&outputs.lengths_path(Classification::Unmatched))?,
        unmatched_primers: create_table(&outputs.primers_path(Classification::Unmatched))?,
    };
    write_tables(&results.tables, sinks).map_err(|e| e.after_read(last_read))?;

    Ok(results)
}
