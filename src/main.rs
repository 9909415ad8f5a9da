extern crate env_logger;
#[macro_use]
extern crate log;

use anyhow::{bail, Result};
use clap::Parser;

mod cli;
mod extract;
mod fasta;
mod genes;
mod matcher;
mod output;
mod prepare;
mod query;
mod stats;

use cli::{Cli, Commands};

const DETAIL: &str = indoc::indoc! {"

    motifmatch match

    Purpose: exact match short peptides from motif-x to a gene in a fasta file.

    Required parameters:
      -f fasta file, expected to be an orf file,
         where the gene name is right after the >
         example:  >YAL001C
      -g gene file, one gene name per line.
         Used to reduce the fasta search space.
         YAL001C
         YAL002W
      -o output file name
      -s sequence file, one short sequence per line, as a CSV file
         PEPTIDE,GROUP,MOTIF
         any extra columns will be ignored
         PRARSSSVSNAAL,Induced,...R..S.S....
         LRERSRSNSSALA,Induced,...R..S.S....

    Optional parameters:
      -w number of reference residues reported for each match (13)
      --skip-malformed  skip query rows with fewer than three columns
      --stats           write run statistics as JSON

    Output file, tab separated, one row per match:
      GENE  WINDOW  MOTIF  GROUP
"};

fn try_main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_target(false)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Match {
            fasta,
            gene,
            seq,
            out,
            width,
            skip_malformed,
            stats: stats_path,
            detail,
        } => {
            if *detail {
                println!("{DETAIL}");
                std::process::exit(1);
            }

            let (Some(fasta), Some(gene), Some(seq), Some(out)) = (fasta, gene, seq, out) else {
                bail!("--fasta, --gene, --seq and --out are all required");
            };

            let now = std::time::Instant::now();
            let mut statistics = stats::MatchStatistics::new(fasta, *width);

            let engine =
                matcher::MatchEngine::from_paths(fasta, gene, seq, *width, *skip_malformed)?;
            let matches = engine.find_matches(&mut statistics);
            output::write_tsv(out, &matches)?;

            statistics.elapsed = now.elapsed().as_secs_f64();
            statistics.report();

            if let Some(path) = stats_path {
                statistics.write_json(path)?;
            }

            info!("Completed matching to {out}");
        }
        Commands::Prepare {
            table,
            peptides,
            genes,
        } => {
            prepare::prepare(table, peptides, genes)?;
            info!("Completed successfully.")
        }
        Commands::Extract {
            pages,
            group,
            output,
        } => {
            extract::extract(pages, group, output)?;
            info!("Completed successfully.")
        }
    };
    Ok(())
}

fn main() {
    if let Err(err) = try_main() {
        error!("{}", err);

        // report any errors that are produced
        err.chain()
            .skip(1)
            .for_each(|cause| error!("  because: {}", cause));

        std::process::exit(1);
    }
}
