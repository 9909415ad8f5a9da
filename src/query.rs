use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecord};
use indexmap::IndexMap;
use thiserror::Error;

/// What is known about a query peptide: which group it came from, and which motif
/// motif-x placed it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMotif {
    pub group: String,
    pub motif: String,
}

/// Query peptides keyed by their sequence, iterated in the order they were first seen.
pub type QueryMap = IndexMap<String, QueryMotif>;

/// Reads a `PEPTIDE,GROUP,MOTIF` file into a `QueryMap`.
///
/// Fields are split on every comma (there is no quoting), and only the first three fields of
/// a row are used. When a peptide appears on more than one row, the last row wins, but the
/// peptide keeps its original position.
///
/// # Arguments
///
/// * `path` - the query file.
/// * `skip_malformed` - skip rows which are too short or have an empty peptide, instead of
///   returning an error.
pub fn load_queries(path: &str, skip_malformed: bool) -> Result<QueryMap> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_path(path)
        .with_context(|| format!("Unable to open query file {path}"))?;

    let mut queries = QueryMap::new();
    let mut skipped = 0usize;

    for result in rdr.records() {
        let record = result.with_context(|| format!("Unable to read query file {path}"))?;
        let line = record.position().map_or(0, |p| p.line());

        let (peptide, query) = match parse_row(&record, line) {
            Ok(v) => v,
            Err(e) => {
                if !skip_malformed {
                    bail!(e)
                }
                warn!("Skipping: {e}");
                skipped += 1;
                continue;
            }
        };

        if let Some(previous) = queries.insert(peptide, query) {
            warn!("Duplicate query peptide on line {line}, replacing {previous:?}");
        }
    }

    if skipped > 0 {
        warn!("Skipped {skipped} malformed rows in {path}");
    }
    info!("Loaded {} query peptides from {path}", queries.len());

    Ok(queries)
}

fn parse_row(record: &StringRecord, line: u64) -> Result<(String, QueryMotif), QueryErr> {
    if record.len() < 3 {
        return Err(QueryErr::ShortRow {
            line,
            row: record.iter().collect::<Vec<_>>().join(","),
        });
    }

    // the row has its trailing whitespace removed, which only touches the final field
    let field = |i: usize| -> String {
        if i == record.len() - 1 {
            record[i].trim_end().to_string()
        } else {
            record[i].to_string()
        }
    };

    let peptide = field(0);
    if peptide.is_empty() {
        return Err(QueryErr::EmptyPeptide { line });
    }

    Ok((
        peptide,
        QueryMotif {
            group: field(1),
            motif: field(2),
        },
    ))
}

#[derive(Error, Debug)]
pub enum QueryErr {
    #[error(
        "query row on line {line} should be of the format
  `PEPTIDE,GROUP,MOTIF`
but instead got
  {row}
suggestion: pass --skip-malformed to ignore rows like this"
    )]
    ShortRow { line: u64, row: String },

    #[error("query row on line {line} has an empty peptide")]
    EmptyPeptide { line: u64 },
}
