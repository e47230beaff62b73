use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::OutputFormat;
use crate::library::builder::KmerLibrary;

#[derive(Args)]
pub struct MakeLibraryArgs {
    /// FASTA file of adapter or contaminant sequences (plain or gzip)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Pattern file to write
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// K-mer length
    #[arg(short = 'l', long = "length", value_parser = clap::value_parser!(u64).range(1..))]
    pub length: u64,
}

/// Execute make-library subcommand
///
/// # Errors
///
/// Returns an error if the FASTA file cannot be read or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: MakeLibraryArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let k = usize::try_from(args.length).context("K-mer length does not fit in memory")?;

    let library = KmerLibrary::from_fasta(&args.input, k)
        .with_context(|| format!("Cannot build library from {}", args.input.display()))?;
    library
        .write_file(&args.output)
        .with_context(|| format!("Cannot write {}", args.output.display()))?;

    info!(
        "Wrote {} distinct {k}-mers to {}",
        library.len(),
        args.output.display()
    );

    match format {
        OutputFormat::Text => {}
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "input": args.input.display().to_string(),
                "output": args.output.display().to_string(),
                "k": k,
                "kmers": library.len(),
            })
        ),
        OutputFormat::Tsv => {
            println!("input\toutput\tk\tkmers");
            println!(
                "{}\t{}\t{k}\t{}",
                args.input.display(),
                args.output.display(),
                library.len()
            );
        }
    }

    Ok(())
}
