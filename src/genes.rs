use std::collections::HashSet;
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};

use anyhow::{Context, Result};
use thiserror::Error;

/// The set of gene identifiers which are allowed to take part in matching.
#[derive(Debug, Default, Clone)]
pub struct GeneList {
    genes: HashSet<String>,
}

impl GeneList {
    /// Reads a gene list file, with one gene name per line. Names are trimmed, and empty
    /// lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns `GeneListErr::NotFound` if no file exists at `path`, or an I/O error if
    /// it could not be read.
    pub fn from_path(path: &str) -> Result<Self> {
        let file = File::open(path).map_err(|source| GeneListErr::NotFound {
            path: path.to_string(),
            source,
        })?;

        let mut genes = HashSet::new();
        for line in BufReader::new(file).lines() {
            let line = line.with_context(|| format!("Unable to read gene list {path}"))?;
            let gene = line.trim();
            if !gene.is_empty() {
                genes.insert(gene.to_string());
            }
        }

        info!("Loaded {} genes from {path}", genes.len());
        Ok(GeneList { genes })
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.genes.contains(gene)
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for GeneList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        GeneList {
            genes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Writes gene names to `path`, one per line, in the order given.
pub fn write_gene_list<'a>(path: &str, genes: impl IntoIterator<Item = &'a String>) -> Result<()> {
    let mut writer = BufWriter::new(
        File::create(path).with_context(|| format!("Unable to create gene list {path}"))?,
    );
    for gene in genes {
        writeln!(writer, "{gene}")?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Error, Debug)]
pub enum GeneListErr {
    #[error("gene list file not found: {path} ({source})")]
    NotFound {
        path: String,
        source: std::io::Error,
    },
}
