//src/report.rs

use std::io::{self, Write};

use crate::classify::{AggregateTables, CountTables};
use crate::error::{BarcodeError, Result};
use crate::fastq::ReadSink;
use crate::types::{Classification, FastqRead};

pub const LENGTH_TABLE_HEADER: [&str; 2] = ["barcode_length", "count"];
pub const PRIMER_TABLE_HEADER: [&str; 2] = ["primer_id", "count"];

/// Routes annotated reads to the matched or unmatched sink, in arrival order.
pub struct ReportEmitter<M: ReadSink, U: ReadSink> {
    matched: M,
    unmatched: U,
}

impl<M: ReadSink, U: ReadSink> ReportEmitter<M, U> {
    pub fn new(matched: M, unmatched: U) -> Self {
        Self { matched, unmatched }
    }

    pub fn emit(&mut self, classification: Classification, read: &FastqRead) -> Result<()> {
        let written = match classification {
            Classification::Matched => self.matched.write_read(read),
            Classification::Unmatched => self.unmatched.write_read(read),
        };
        written.map_err(BarcodeError::sink(sink_name(classification, "reads")))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.matched
            .flush()
            .map_err(BarcodeError::sink(sink_name(Classification::Matched, "reads")))?;
        self.unmatched
            .flush()
            .map_err(BarcodeError::sink(sink_name(Classification::Unmatched, "reads")))
    }

    pub fn into_sinks(self) -> (M, U) {
        (self.matched, self.unmatched)
    }
}

fn sink_name(classification: Classification, what: &str) -> String {
    format!("{} {}", classification.label(), what)
}

/// The four tabular outputs written at end of stream.
pub struct TableSinks<W: Write> {
    pub matched_lengths: W,
    pub matched_primers: W,
    pub unmatched_lengths: W,
    pub unmatched_primers: W,
}

/// `barcode_length,count`, one row per length, ascending.
pub fn write_length_table<W: Write>(writer: W, counts: &CountTables) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(LENGTH_TABLE_HEADER)?;
    for (len, count) in counts.length_counts() {
        wtr.write_record([len.to_string(), count.to_string()])?;
    }
    wtr.flush()
}

/// `primer_id,count`, one row per primer in first-observed order.
pub fn write_primer_table<W: Write>(writer: W, counts: &CountTables) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(PRIMER_TABLE_HEADER)?;
    for (id, count) in counts.primer_counts() {
        wtr.write_record([id, count.to_string().as_str()])?;
    }
    wtr.flush()
}

pub fn write_tables<W: Write>(tables: &AggregateTables, sinks: TableSinks<W>) -> Result<()> {
    let TableSinks {
        matched_lengths,
        matched_primers,
        unmatched_lengths,
        unmatched_primers,
    } = sinks;

    write_length_table(matched_lengths, &tables.matched)
        .map_err(BarcodeError::sink("matched barcode length counts"))?;
    write_primer_table(matched_primers, &tables.matched)
        .map_err(BarcodeError::sink("matched primer counts"))?;
    write_length_table(unmatched_lengths, &tables.unmatched)
        .map_err(BarcodeError::sink("unmatched barcode length counts"))?;
    write_primer_table(unmatched_primers, &tables.unmatched)
        .map_err(BarcodeError::sink("unmatched primer counts"))?;
    Ok(())
}
