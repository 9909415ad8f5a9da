use anyhow::Result;
use serde::Serialize;

use crate::fasta::{filter_fasta, Reference};
use crate::genes::GeneList;
use crate::query::{load_queries, QueryMap};
use crate::stats::MatchStatistics;

/// A single exact match of a query peptide inside a reference sequence.
///
/// Serialises, in order, to `gene`, `window`, `motif`, `group`.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct MatchRecord<'a> {
    /// The gene name of the matching reference
    pub gene: &'a str,
    /// Up to `width` residues of the reference, starting at the match position
    pub window: &'a str,
    /// The motif-x motif that the query peptide was reported under
    pub motif: &'a str,
    /// The experimental group of the query peptide
    pub group: &'a str,
}

/// Matches query peptides against the reference sequences of a restricted set of genes.
///
/// All inputs are read once on construction and are not modified afterwards.
pub struct MatchEngine {
    pub genes: GeneList,
    pub references: Vec<Reference>,
    pub queries: QueryMap,
    pub width: usize,
}

impl MatchEngine {
    /// Loads the gene list, the reference sequences of those genes, and the query peptides.
    ///
    /// # Arguments
    ///
    /// * `fasta` - path to the reference fasta file.
    /// * `gene` - path to the gene list, used to restrict the fasta records.
    /// * `seq` - path to the `PEPTIDE,GROUP,MOTIF` query file.
    /// * `width` - the number of reference residues reported for every match.
    /// * `skip_malformed` - skip malformed query rows instead of failing.
    pub fn from_paths(
        fasta: &str,
        gene: &str,
        seq: &str,
        width: usize,
        skip_malformed: bool,
    ) -> Result<Self> {
        let genes = GeneList::from_path(gene)?;
        if genes.is_empty() {
            warn!("The gene list {gene} is empty, so nothing can match");
        }

        let references = filter_fasta(fasta, &genes)?;
        let queries = load_queries(seq, skip_malformed)?;

        Ok(MatchEngine {
            genes,
            references,
            queries,
            width,
        })
    }

    /// Finds every occurrence of every query peptide in every reference.
    ///
    /// Records are produced for each query in load order, then for each reference in file
    /// order, then for each position in increasing order. Overlapping occurrences are all
    /// reported. Queries without any occurrence produce nothing.
    pub fn find_matches(&self, stats: &mut MatchStatistics) -> Vec<MatchRecord<'_>> {
        let mut matches = Vec::new();

        for (peptide, query) in self.queries.iter() {
            let before = matches.len();

            for reference in self.references.iter() {
                for pos in match_positions(&reference.seq, peptide) {
                    matches.push(MatchRecord {
                        gene: &reference.id,
                        window: window(&reference.seq, pos, self.width),
                        motif: &query.motif,
                        group: &query.group,
                    });
                }
            }

            if matches.len() == before {
                debug!("No match for {peptide}");
                stats.unmatched_queries += 1;
            } else {
                stats.matched_queries += 1;
            }
        }

        stats.query_count = self.queries.len();
        stats.gene_count = self.genes.len();
        stats.reference_count = self.references.len();
        stats.match_rows = matches.len();

        matches
    }
}

/// Yields every start position of `needle` in `haystack`, including overlapping ones.
fn match_positions<'a>(haystack: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    let step = needle.chars().next().map_or(1, char::len_utf8);
    let mut from = 0;

    std::iter::from_fn(move || {
        let pos = from + haystack.get(from..)?.find(needle)?;
        from = pos + step;
        Some(pos)
    })
}

/// Returns up to `width` characters of `seq` starting at `start`. The window is cut short at
/// the end of the sequence and is never padded.
fn window(seq: &str, start: usize, width: usize) -> &str {
    let rest = &seq[start..];
    let end = rest
        .char_indices()
        .nth(width)
        .map_or(rest.len(), |(i, _)| i);
    &rest[..end]
}
