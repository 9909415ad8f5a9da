use clap::builder::styling::AnsiColor;
use clap::builder::Styles;
use clap::{Parser, Subcommand};

const fn extra_build_info() -> &'static str {
    match option_env!("CARGO_BUILD_DESC") {
        Some(e) => e,
        None => env!("CARGO_PKG_VERSION"),
    }
}
pub const VERSION: &str = extra_build_info();
const INFO_STRING: &str = "
🧬 motifmatch version ";
const AFTER_STRING: &str = "
   ──────────────────────────────────
   map motif-x peptide motifs back to their source genes";

// colouring of the help
const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().bold())
    .usage(AnsiColor::BrightMagenta.on_default().bold())
    .literal(AnsiColor::BrightMagenta.on_default())
    .placeholder(AnsiColor::White.on_default());

pub const DEFAULT_WIDTH: usize = 13;

#[derive(Parser)]
#[command(
    version = VERSION,
    about = format!("{}{}{}", INFO_STRING, VERSION, AFTER_STRING),
    arg_required_else_help = true,
    flatten_help = true,
    styles = STYLES
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Exact-match peptides from a motif-x results table against a reference proteome
    #[command(arg_required_else_help = true)]
    Match {
        /// the reference fasta file (.fasta, .fsa, .fa), gene name right after the `>`
        #[arg(
            short,
            long,
            required_unless_present = "detail",
            value_parser = |x: &str| existing_path(x)
        )]
        fasta: Option<String>,

        /// gene list file, one gene name per line. only these genes are searched
        #[arg(
            short,
            long,
            required_unless_present = "detail",
            value_parser = |x: &str| existing_path(x)
        )]
        gene: Option<String>,

        /// query sequence file, with every line in the format:
        ///   PEPTIDE,GROUP,MOTIF
        /// any extra columns are ignored
        #[arg(
            short,
            long,
            required_unless_present = "detail",
            value_parser = |x: &str| existing_path(x),
            verbatim_doc_comment
        )]
        seq: Option<String>,

        /// the output file
        #[arg(short, long, required_unless_present = "detail")]
        out: Option<String>,

        /// width of the reference window reported for every match
        #[arg(
            short,
            long,
            value_parser = |x: &str| parse_width(x),
            default_value_t = DEFAULT_WIDTH
        )]
        width: usize,

        /// skip, instead of error, on query rows with fewer than three columns or an empty
        /// peptide
        #[arg(long)]
        skip_malformed: bool,

        /// also write run statistics as JSON to this path
        #[arg(long)]
        stats: Option<String>,

        /// print a more detailed description and exit
        #[arg(short, long, action)]
        detail: bool,
    },

    /// Build the motif-x peptide upload file and the gene list from a peptide table (.csv).
    /// The table needs the columns `Ppep`, `Group` and `Motif_X_Input_Peptide`, in any order.
    #[command(arg_required_else_help = true)]
    Prepare {
        /// the peptide table, exported from the spreadsheet as .csv
        #[arg(value_parser = |x: &str| existing_path(x))]
        table: String,

        /// output file for the peptides, one per line
        #[arg(long, default_value = "pepFile.txt")]
        peptides: String,

        /// output file for the unique gene names, one per line
        #[arg(long, default_value = "GeneList.txt")]
        genes: String,
    },

    /// Turn saved motif-x result pages into a `PEPTIDE,GROUP,MOTIF` query file
    #[command(arg_required_else_help = true)]
    Extract {
        /// one saved results page per central residue
        #[arg(required = true, num_args = 1.., value_parser = |x: &str| existing_path(x))]
        pages: Vec<String>,

        /// the experimental group label written on every row, i.e. Induced
        #[arg(short, long)]
        group: String,

        /// the output query file
        #[arg(short, default_value = "Motifx-results.txt")]
        output: String,
    },
}

/// Error type for a command line value which failed validation.
#[derive(Debug)]
pub struct InvalidArgErr(String);

impl std::fmt::Display for InvalidArgErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvalidArgErr {}

/// Accepts a path only if something exists there, so that a missing input is reported
/// as a usage error before any work starts.
fn existing_path(arg: &str) -> Result<String, InvalidArgErr> {
    if std::path::Path::new(arg).exists() {
        Ok(arg.to_string())
    } else {
        Err(InvalidArgErr(format!("file does not exist: {arg}")))
    }
}

fn parse_width(arg: &str) -> Result<usize, InvalidArgErr> {
    match arg.trim().parse::<usize>() {
        Ok(0) => Err(InvalidArgErr(String::from("width must be at least 1"))),
        Ok(w) => Ok(w),
        Err(_) => Err(InvalidArgErr(format!(
            "invalid width: '{arg}' (should be a positive integer)"
        ))),
    }
}
