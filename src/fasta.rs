use anyhow::{Context, Result};
use bio::io::fasta;

use crate::genes::GeneList;

/// A reference protein sequence, keyed by its gene name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub id: String,
    pub seq: String,
}

/// Reads every record of a FASTA file, keeping only those whose identifier is a member of
/// `genes`. Identifiers are compared exactly; the identifier of a record is the token directly
/// after the `>`, up to the first whitespace.
///
/// # Returns
///
/// The retained records, in the order they appear in the file.
///
/// # Errors
///
/// This function will return an error if:
/// * The file cannot be opened.
/// * A record is malformed, i.e. the file does not start with a `>` header.
/// * A retained sequence is not valid UTF-8.
pub fn filter_fasta(path: &str, genes: &GeneList) -> Result<Vec<Reference>> {
    let reader = fasta::Reader::from_file(path)
        .with_context(|| format!("Unable to open fasta file {path}"))?;

    let mut total = 0usize;
    let mut retained = Vec::new();

    for rec in reader.records() {
        let rec = rec.with_context(|| format!("Invalid fasta record in {path}"))?;
        total += 1;

        if !genes.contains(rec.id()) {
            continue;
        }

        let seq = String::from_utf8(rec.seq().to_vec())
            .with_context(|| format!("Sequence of {} is not valid UTF-8", rec.id()))?;

        retained.push(Reference {
            id: rec.id().to_string(),
            seq,
        });
    }

    info!(
        "Retained {} of {} fasta records using the gene list",
        retained.len(),
        total
    );

    Ok(retained)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fasta(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn keeps_exactly_the_allowed_genes() {
        let file = write_fasta(
            ">YAL001C TFC3 SGDID:S000000001\nMVLTIYPDELVQ\n\
             >YNR047W FPK1\nAASEPNGLQLAS\nATSPTSSSAR*\n\
             >YNR047WX\nMMMM\n\
             >YPL085W\nPPPP\n",
        );
        let genes: GeneList = ["YNR047W", "YPL085W", "YMISSING"].into_iter().collect();

        let refs = filter_fasta(file.path().to_str().unwrap(), &genes).unwrap();

        assert_eq!(
            refs,
            vec![
                Reference {
                    id: String::from("YNR047W"),
                    seq: String::from("AASEPNGLQLASATSPTSSSAR*"),
                },
                Reference {
                    id: String::from("YPL085W"),
                    seq: String::from("PPPP"),
                },
            ]
        );
    }

    #[test]
    fn empty_gene_list_retains_nothing() {
        let file = write_fasta(">YAL001C\nMVLT\n");
        let refs = filter_fasta(file.path().to_str().unwrap(), &GeneList::default()).unwrap();
        assert!(refs.is_empty());
    }

    #[test]
    fn rejects_non_fasta_input() {
        let file = write_fasta("this is not a fasta file\n");
        let genes: GeneList = ["YAL001C"].into_iter().collect();
        assert!(filter_fasta(file.path().to_str().unwrap(), &genes).is_err());
    }
}
