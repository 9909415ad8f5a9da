use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use serde::Serialize;

/// Information about a single run of the match engine.
#[derive(Serialize, Default, Debug)]
pub struct MatchStatistics {
    pub motifmatch_version: String,
    pub run_date: String,
    pub fasta_path: String,
    pub width: usize,
    pub gene_count: usize,
    pub reference_count: usize,
    pub query_count: usize,
    pub matched_queries: usize,
    pub unmatched_queries: usize,
    pub match_rows: usize,
    pub elapsed: f64,
}

impl MatchStatistics {
    pub fn new(fasta_path: &str, width: usize) -> Self {
        MatchStatistics {
            motifmatch_version: crate::cli::VERSION.to_string(),
            run_date: format!("{:?}", chrono::offset::Local::now()),
            fasta_path: fasta_path.to_string(),
            width,
            ..MatchStatistics::default()
        }
    }

    pub fn report(&self) {
        info!(
            "Stats: {} of {} queries matched, {} rows, {} references searched, {:.1}s runtime",
            self.matched_queries,
            self.query_count,
            self.match_rows,
            self.reference_count,
            self.elapsed,
        );
        if self.unmatched_queries > 0 {
            info!("{} queries had no match", self.unmatched_queries);
        }
    }

    /// Writes the statistics to `path` as pretty-printed JSON.
    pub fn write_json(&self, path: &str) -> Result<()> {
        let file =
            File::create(path).with_context(|| format!("Unable to create stats file {path}"))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).context("Could not serialize stats")?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
