use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

use crate::genes::write_gene_list;

const PPEP_COLUMN: &str = "Ppep";
const GROUP_COLUMN: &str = "Group";
const PEPTIDE_COLUMN: &str = "Motif_X_Input_Peptide";

/// The contents of a peptide table which are needed to submit a motif-x job.
#[derive(Debug, Default)]
pub struct PeptideTable {
    /// Peptide to submit, keyed by its `Ppep` name, i.e. `YNR047W_T428`
    pub peptides: IndexMap<String, String>,
    /// Unique gene names, taken from the part of `Ppep` before the first `_`
    pub genes: IndexSet<String>,
    /// The group of the first row in the table
    pub group: Option<String>,
}

/// Column positions of the required columns, found by name.
struct Columns {
    ppep: usize,
    group: usize,
    peptide: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, TableErr> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| TableErr::MissingColumn {
                    name,
                    headers: headers.iter().collect::<Vec<_>>().join(","),
                })
        };

        Ok(Columns {
            ppep: find(PPEP_COLUMN)?,
            group: find(GROUP_COLUMN)?,
            peptide: find(PEPTIDE_COLUMN)?,
        })
    }
}

/// Reads a peptide table (a .csv export of the spreadsheet, with a header row). The column
/// order does not matter, but the `Ppep`, `Group` and `Motif_X_Input_Peptide` columns must
/// be present.
///
/// When a `Ppep` name appears more than once, the peptide of its first row is used.
pub fn read_table(path: &str) -> Result<PeptideTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)
        .with_context(|| format!("Unable to open peptide table {path}"))?;

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut table = PeptideTable::default();

    for result in rdr.records() {
        let record = result.with_context(|| format!("Unable to read peptide table {path}"))?;

        let (Some(ppep), Some(group), Some(peptide)) = (
            record.get(columns.ppep),
            record.get(columns.group),
            record.get(columns.peptide),
        ) else {
            let line = record.position().map_or(0, |p| p.line());
            return Err(TableErr::ShortRow { line }.into());
        };

        if ppep.is_empty() {
            continue;
        }

        table.group.get_or_insert_with(|| group.to_string());

        let gene = ppep.split('_').next().unwrap_or(ppep);
        table.genes.insert(gene.to_string());

        table
            .peptides
            .entry(ppep.to_string())
            .or_insert_with(|| peptide.to_string());
    }

    Ok(table)
}

/// Writes the peptides of `table` to `peptides`, one per line, and its gene names to `genes`.
pub fn prepare(path: &str, peptides: &str, genes: &str) -> Result<PeptideTable> {
    info!("Reading peptide table {path}");
    let table = read_table(path)?;

    let mut writer = BufWriter::new(
        File::create(peptides)
            .with_context(|| format!("Unable to create peptide file {peptides}"))?,
    );
    for peptide in table.peptides.values() {
        writeln!(writer, "{peptide}")?;
    }
    writer.flush()?;

    write_gene_list(genes, &table.genes)?;

    info!(
        "Wrote {} peptides to {peptides} and {} genes to {genes}",
        table.peptides.len(),
        table.genes.len()
    );
    match &table.group {
        Some(group) => info!("Group of the first row: {group}"),
        None => warn!("The peptide table {path} has no rows"),
    }

    Ok(table)
}

#[derive(Error, Debug)]
pub enum TableErr {
    #[error("peptide table is missing the `{name}` column, found columns:\n  {headers}")]
    MissingColumn { name: &'static str, headers: String },

    #[error("row on line {line} of the peptide table is missing columns")]
    ShortRow { line: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
Group,Ppep,Localized_Sequence,Motif_X_Input_Peptide
Induced,YGL076C_T8_S11,AAEKILtPEsQLKK,AAEKILT*PES*QLKK
Induced,YNR047W_T428,AASEPNGLQLASATSPtSSSAR,AASEPNGLQLASATSPT*SSSAR
Induced,YNR047W_S430,AASEPNGLQLASATSPTsSSAR,AASEPNGLQLASATSPTS*SSAR
Induced,YNR047W_T428,duplicate,DUPLICATE
";

    #[test]
    fn columns_are_found_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        std::fs::write(&path, TABLE).unwrap();

        let table = read_table(path.to_str().unwrap()).unwrap();

        assert_eq!(table.group.as_deref(), Some("Induced"));
        assert_eq!(
            table.peptides.values().collect::<Vec<_>>(),
            vec![
                "AAEKILT*PES*QLKK",
                "AASEPNGLQLASATSPT*SSSAR",
                "AASEPNGLQLASATSPTS*SSAR"
            ]
        );
        assert_eq!(
            table.genes.iter().collect::<Vec<_>>(),
            vec!["YGL076C", "YNR047W"]
        );
    }

    #[test]
    fn writes_peptide_and_gene_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let peptides = dir.path().join("pepFile.txt");
        let genes = dir.path().join("GeneList.txt");
        std::fs::write(&path, TABLE).unwrap();

        prepare(
            path.to_str().unwrap(),
            peptides.to_str().unwrap(),
            genes.to_str().unwrap(),
        )
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(peptides).unwrap(),
            "AAEKILT*PES*QLKK\nAASEPNGLQLASATSPT*SSSAR\nAASEPNGLQLASATSPTS*SSAR\n"
        );
        assert_eq!(
            std::fs::read_to_string(genes).unwrap(),
            "YGL076C\nYNR047W\n"
        );
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        std::fs::write(&path, "Ppep,Group\nYNR047W_T428,Induced\n").unwrap();

        let err = read_table(path.to_str().unwrap()).unwrap_err();

        match err.downcast_ref::<TableErr>() {
            Some(TableErr::MissingColumn { name, .. }) => assert_eq!(*name, PEPTIDE_COLUMN),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
