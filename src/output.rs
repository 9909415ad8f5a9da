use std::fs::File;
use std::io::{Seek, SeekFrom};

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use tempfile::tempfile_in;

/// Writes rows as tab separated lines, with no header and no quoting, to `path`.
///
/// The rows are first written to a temporary file in the directory of `path`. The output file
/// is only created (or truncated) once every row has been written, so a failure part way
/// through leaves any previous output untouched.
///
/// # Errors
///
/// This function will return an error if the temporary file or the output file cannot be
/// created, or if writing to either fails.
pub fn write_tsv<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    info!("Writing to {path}...");

    // get the directory of the output file
    let mut tempfile_dir = std::path::absolute(path)?;
    tempfile_dir.pop();

    let mut temp_file = tempfile_in(&tempfile_dir)
        .with_context(|| format!("Unable to create a temporary file in {}", tempfile_dir.display()))?;

    {
        let mut wtr = WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(QuoteStyle::Never)
            .from_writer(&mut temp_file);

        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
    }

    // copy from the temporary file into the final output file
    temp_file.seek(SeekFrom::Start(0))?;
    let mut out = File::create(path).with_context(|| format!("Unable to create {path}"))?;
    std::io::copy(&mut temp_file, &mut out)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchRecord;

    fn rows() -> Vec<MatchRecord<'static>> {
        vec![
            MatchRecord {
                gene: "YNR047W",
                window: "AASEPNGLQLASA",
                motif: "......T......",
                group: "Induced",
            },
            MatchRecord {
                gene: "YGL076C",
                window: "KILT*PES",
                motif: "\"quoted\",x",
                group: "Induced",
            },
        ]
    }

    #[test]
    fn writes_plain_tab_separated_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matched.txt");
        let path = path.to_str().unwrap();

        write_tsv(path, &rows()).unwrap();

        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "YNR047W\tAASEPNGLQLASA\t......T......\tInduced\n\
             YGL076C\tKILT*PES\t\"quoted\",x\tInduced\n"
        );
    }

    #[test]
    fn overwrites_and_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matched.txt");
        std::fs::write(&path, "old contents which are longer than the new ones\n".repeat(20))
            .unwrap();
        let path = path.to_str().unwrap();

        write_tsv(path, &rows()).unwrap();
        let first = std::fs::read(path).unwrap();
        write_tsv(path, &rows()).unwrap();
        let second = std::fs::read(path).unwrap();

        assert_eq!(first, second);
        assert!(!String::from_utf8(first).unwrap().contains("old contents"));
    }

    #[test]
    fn empty_results_give_an_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matched.txt");
        let path = path.to_str().unwrap();

        write_tsv::<MatchRecord>(path, &[]).unwrap();

        assert_eq!(std::fs::read(path).unwrap().len(), 0);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("matched.txt");
        assert!(write_tsv(path.to_str().unwrap(), &rows()).is_err());
    }
}
