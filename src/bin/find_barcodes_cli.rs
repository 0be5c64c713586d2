use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use find_barcodes::config::{
    MatchConfig, TieBreak, DEFAULT_KV_SEPARATOR, DEFAULT_MAX_HAMMING_DISTANCE,
    DEFAULT_PAIR_SEPARATOR, DEFAULT_PRIMER_END, DEFAULT_PRIMER_START,
};
use find_barcodes::{find_barcodes_in_files, OutputOptions};

/// Find amplicon primers in reads and extract the barcode in front of them.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// FASTA file of primer sequences (.gz supported)
    #[arg(short = 'p', long)]
    primers: PathBuf,

    /// FASTQ file of reads (.gz supported)
    #[arg(short = 'r', long)]
    reads: PathBuf,

    /// Directory for the FASTQ and CSV outputs
    #[arg(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,

    /// Prefix for every output file name
    #[arg(long, default_value = "barcodes")]
    prefix: String,

    /// First primer start offset to search (inclusive)
    #[arg(long, default_value_t = DEFAULT_PRIMER_START)]
    primer_start: usize,

    /// Last primer start offset to search (exclusive)
    #[arg(long, default_value_t = DEFAULT_PRIMER_END)]
    primer_end: usize,

    /// Reads whose best primer hit is within this distance are matched
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_HAMMING_DISTANCE)]
    max_hamming_distance: usize,

    /// Separator between a field name and its value in read names
    #[arg(long, default_value = DEFAULT_KV_SEPARATOR)]
    kv_separator: String,

    /// Separator between fields appended to read names
    #[arg(long, default_value = DEFAULT_PAIR_SEPARATOR)]
    pair_separator: String,

    /// Which candidate wins when several share the lowest distance
    #[arg(long, value_enum, default_value_t = TieBreak::Last)]
    tie_break: TieBreak,

    /// Write gzip-compressed FASTQ outputs
    #[arg(long, default_value_t = false)]
    gzip: bool,
}

fn spinner(color: &str, msg: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template(&format!("{{spinner:.{color}}} {{msg}}"))
            .expect("Invalid spinner template"),
    );
    spinner.set_message(msg);
    spinner
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = MatchConfig {
        primer_start: args.primer_start,
        primer_end: args.primer_end,
        max_hamming_distance: args.max_hamming_distance,
        kv_separator: args.kv_separator,
        pair_separator: args.pair_separator,
        tie_break: args.tie_break,
    };
    let outputs = OutputOptions {
        output_dir: args.output_dir,
        prefix: args.prefix,
        gzip: args.gzip,
    };

    let progress = spinner("green", "Matching primers...");
    let results = find_barcodes_in_files(&config, &args.primers, &args.reads, &outputs)
        .with_context(|| format!("failed to process {}", args.reads.display()))?;
    progress.finish_with_message(format!(
        "Processed {} reads: {} matched, {} unmatched ({} too short for any primer).",
        results.total_reads,
        results.matched_reads,
        results.unmatched_reads,
        results.no_viable_reads
    ));

    let done = spinner("cyan", "All done!");
    done.finish_with_message(format!("Outputs written to {}", outputs.output_dir.display()));
    Ok(())
}
