use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use indexmap::IndexMap;
use itertools::Itertools;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// The motif section of a results page starts after this `<font>` element (0-indexed).
const MOTIF_SECTION_FONT: usize = 3;

/// Lines at the start and end of each peptide listing which are page furniture.
const LISTING_HEAD_LINES: usize = 2;
const LISTING_TAIL_LINES: usize = 3;

/// One row of the query file consumed by `match`.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct QueryRow<'a> {
    pub peptide: &'a str,
    pub group: &'a str,
    pub motif: &'a str,
}

/// Finds every motif on a motif-x results page, along with the raw text of its peptide
/// listing. Only the layout of the motif-x results page is understood: the motifs are the
/// text of the `<a>` elements after the fourth `<font>` element, and each listing is the text
/// directly following its `</a>`. Anchors without any text, such as those around logo images,
/// are skipped.
pub fn parse_page(html: &str) -> Result<Vec<(String, String)>> {
    let font = Regex::new(r"(?i)<font\b[^>]*>")?;
    let font_close = Regex::new(r"(?i)</font\s*>")?;
    let anchor = Regex::new(r"(?is)<a\b[^>]*>(.*?)</a\s*>([^<]*)")?;
    let tag = Regex::new(r"(?s)<[^>]*>")?;

    let fonts = font.find_iter(html).count();
    let Some(open) = font.find_iter(html).nth(MOTIF_SECTION_FONT) else {
        return Err(PageErr::MissingMotifSection { fonts }.into());
    };
    let start = font_close
        .find_at(html, open.end())
        .map_or(open.end(), |m| m.end());

    let motifs = anchor
        .captures_iter(&html[start..])
        .filter_map(|caps| {
            let motif = tag.replace_all(&caps[1], "").trim().to_string();
            if motif.is_empty() {
                return None;
            }
            Some((motif, caps[2].to_string()))
        })
        .collect();

    Ok(motifs)
}

/// Splits a peptide listing into peptides, dropping the framing lines at its start and end.
pub fn listing_peptides(listing: &str) -> Vec<String> {
    listing
        .split('\n')
        .dropping(LISTING_HEAD_LINES)
        .dropping_back(LISTING_TAIL_LINES)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Reads every results page, and writes a `PEPTIDE,GROUP,MOTIF` row for every peptide of every
/// motif to `output`. When a motif is seen more than once, only its first listing is used.
///
/// # Returns
///
/// The number of rows written.
pub fn extract(pages: &[String], group: &str, output: &str) -> Result<usize> {
    let mut motifs: IndexMap<String, Vec<String>> = IndexMap::new();

    for page in pages {
        let html = std::fs::read_to_string(page)
            .with_context(|| format!("Unable to read results page {page}"))?;
        let found = parse_page(&html).with_context(|| format!("Unable to parse {page}"))?;

        info!("Found {} motifs in {page}", found.len());

        for (motif, listing) in found {
            if motifs.contains_key(&motif) {
                debug!("Motif {motif} already seen, ignoring the listing in {page}");
                continue;
            }
            let peptides = listing_peptides(&listing);
            if peptides.is_empty() {
                warn!("Motif {motif} in {page} has no peptides");
            }
            motifs.insert(motif, peptides);
        }
    }

    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_path(output)
        .with_context(|| format!("Unable to create query file {output}"))?;

    let mut rows = 0usize;
    for (motif, peptides) in motifs.iter() {
        for peptide in peptides {
            wtr.serialize(QueryRow {
                peptide,
                group,
                motif,
            })?;
            rows += 1;
        }
    }
    wtr.flush()?;

    info!("Wrote {rows} rows for {} motifs to {output}", motifs.len());
    Ok(rows)
}

#[derive(Error, Debug)]
pub enum PageErr {
    #[error(
        "unexpected results page layout: the motifs follow the fourth <font> element, \
         but the page only has {fonts}"
    )]
    MissingMotifSection { fonts: usize },
}
