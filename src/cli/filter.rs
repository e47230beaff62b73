use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;
use tracing::info;

use crate::cli::OutputFormat;
use crate::core::config::{ClassifierConfig, DustConfig};
use crate::matching::automaton::MatchAutomaton;
use crate::matching::classifier::ReadClassifier;
use crate::parsing::fastq::{create_writer, open_reader};
use crate::parsing::patterns::load_patterns_file;
use crate::pipeline::filter::{filter_paired, filter_single, Destination, FilterOptions, Mode};
use crate::pipeline::stats::Stats;
use crate::utils::paths::{
    check_distinct_basenames, ensure_output_dir, output_path, EXTRACTED_SUFFIX, FILTERED_SUFFIX,
    OK_SUFFIX,
};

#[derive(Args)]
pub struct FilterArgs {
    /// FASTQ files of single-end reads (plain or gzip)
    #[arg(
        short = 'i',
        long = "input",
        num_args = 1..,
        required_unless_present = "fastq1",
        conflicts_with_all = ["fastq1", "fastq2"]
    )]
    pub input: Vec<PathBuf>,

    /// FASTQ files of first mates
    #[arg(short = '1', long = "fastq1", num_args = 1.., requires = "fastq2")]
    pub fastq1: Vec<PathBuf>,

    /// FASTQ files of second mates, in the same order as --fastq1
    #[arg(short = '2', long = "fastq2", num_args = 1.., requires = "fastq1")]
    pub fastq2: Vec<PathBuf>,

    /// Pattern file: one k-mer per line, optional tab-separated metadata
    #[arg(short = 'f', long = "fragments")]
    pub fragments: PathBuf,

    /// Directory for output files (created if missing)
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Substitutions allowed when matching patterns
    #[arg(short = 'e', long, default_value = "0", value_parser = clap::value_parser!(u8).range(0..=2))]
    pub errors: u8,

    /// Reads with a G or C run longer than this are removed
    #[arg(short = 'p', long, default_value = "13")]
    pub polygc: usize,

    /// Reads shorter than this are removed
    #[arg(short = 'l', long, default_value = "50")]
    pub length: usize,

    /// Remove low-complexity reads with the DUST filter
    #[arg(short = 'd', long)]
    pub dust: bool,

    /// DUST score cutoff
    #[arg(short = 'c', long, default_value = "2")]
    pub dust_cutoff: f64,

    /// DUST window size in bases
    #[arg(short = 'k', long, default_value = "64")]
    pub dust_k: usize,

    /// Remove reads containing any N
    #[arg(short = 'N', long, conflicts_with = "max_n")]
    pub filter_n: bool,

    /// Remove reads with more than this many N
    #[arg(long)]
    pub max_n: Option<usize>,

    /// Classification threads (defaults to the number of CPUs)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Also write removed reads to <name>.filtered.fastq, tagged with their verdict
    #[arg(long)]
    pub write_filtered: bool,

    /// Print the planned outputs and exit without processing
    #[arg(long)]
    pub dry_run: bool,

    /// Write only reads with a pattern hit to <name>.extracted.fastq (pairs
    /// when either mate hits); the quality checks are not applied
    #[arg(short = 'x', long)]
    pub extract: bool,
}

impl FilterArgs {
    /// Thresholds for the classifier, validated later by `ReadClassifier::new`
    #[must_use]
    pub fn classifier_config(&self) -> ClassifierConfig {
        let max_n = if self.filter_n { Some(0) } else { self.max_n };
        let dust = self.dust.then_some(DustConfig {
            window: self.dust_k,
            cutoff: self.dust_cutoff,
        });

        ClassifierConfig {
            max_errors: self.errors,
            min_length: self.length,
            homopolymer_threshold: self.polygc,
            max_n,
            dust,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.extract {
            Mode::Extract
        } else {
            Mode::Filter
        }
    }

    /// Suffix of the file receiving kept reads
    #[must_use]
    pub fn primary_suffix(&self) -> &'static str {
        match self.mode() {
            Mode::Filter => OK_SUFFIX,
            Mode::Extract => EXTRACTED_SUFFIX,
        }
    }

    /// Stats for one mate; the concordance counters only apply when filtering
    fn mate_stats(&self, path: &Path) -> Stats {
        let file = path.display().to_string();
        match self.mode() {
            Mode::Filter => Stats::new_paired(file),
            Mode::Extract => Stats::new(file),
        }
    }

    /// Single files or mate pairs to process, one stats block per file
    ///
    /// # Errors
    ///
    /// Returns an error if the mate file lists differ in length.
    pub fn jobs(&self) -> anyhow::Result<Vec<Job>> {
        if self.fastq1.len() != self.fastq2.len() {
            bail!(
                "Got {} first-mate files but {} second-mate files",
                self.fastq1.len(),
                self.fastq2.len()
            );
        }

        let jobs: Vec<Job> = if self.input.is_empty() {
            self.fastq1
                .iter()
                .zip(&self.fastq2)
                .map(|(r1, r2)| Job::Paired(r1.clone(), r2.clone()))
                .collect()
        } else {
            self.input.iter().cloned().map(Job::Single).collect()
        };

        if jobs.is_empty() {
            bail!("No input files given");
        }
        Ok(jobs)
    }
}

/// One unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Single(PathBuf),
    Paired(PathBuf, PathBuf),
}

impl Job {
    fn inputs(&self) -> Vec<&PathBuf> {
        match self {
            Self::Single(path) => vec![path],
            Self::Paired(r1, r2) => vec![r1, r2],
        }
    }
}

/// Execute filter subcommand
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the pattern file is
/// unusable, or any input or output file cannot be opened.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FilterArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let config = args.classifier_config();
    config.validate()?;

    let jobs = args.jobs()?;
    check_distinct_basenames(jobs.iter().flat_map(Job::inputs))?;

    if args.dry_run {
        for job in &jobs {
            for input in job.inputs() {
                info!(
                    "{} -> {}",
                    input.display(),
                    output_path(&args.output, input, args.primary_suffix())?.display()
                );
                if args.write_filtered {
                    info!(
                        "{} -> {}",
                        input.display(),
                        output_path(&args.output, input, FILTERED_SUFFIX)?.display()
                    );
                }
            }
        }
        return Ok(());
    }

    ensure_output_dir(&args.output)?;

    let patterns = load_patterns_file(&args.fragments)
        .with_context(|| format!("Cannot load patterns from {}", args.fragments.display()))?;
    info!("Building trie from {} patterns...", patterns.len());
    let classifier = ReadClassifier::new(MatchAutomaton::build(&patterns), config)?;
    if verbose {
        info!("Automaton has {} nodes", classifier.automaton().node_count());
    }

    let options = FilterOptions {
        threads: args.threads.unwrap_or_else(num_cpus::get).max(1),
        mode: args.mode(),
        ..FilterOptions::default()
    };
    if options.mode == Mode::Extract {
        info!("Extracting reads with a pattern hit");
    }

    let mut all_stats = Vec::new();
    for job in &jobs {
        match job {
            Job::Single(input) => {
                all_stats.push(run_single(&classifier, input, &args, &options)?);
            }
            Job::Paired(r1, r2) => {
                let (stats1, stats2) = run_paired(&classifier, r1, r2, &args, &options)?;
                all_stats.push(stats1);
                all_stats.push(stats2);
            }
        }
    }

    match format {
        OutputFormat::Text => {
            for stats in &all_stats {
                print!("{}", stats.to_text());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&all_stats)?),
        OutputFormat::Tsv => {
            println!("{}", Stats::tsv_header());
            for stats in &all_stats {
                println!("{}", stats.to_tsv_row());
            }
        }
    }

    Ok(())
}

fn run_single(
    classifier: &ReadClassifier,
    input: &Path,
    args: &FilterArgs,
    options: &FilterOptions,
) -> anyhow::Result<Stats> {
    let mut reader = open_reader(input)?;
    let mut ok = create_writer(&output_path(&args.output, input, args.primary_suffix())?)?;
    let mut filtered = if args.write_filtered {
        Some(create_writer(&output_path(&args.output, input, FILTERED_SUFFIX)?)?)
    } else {
        None
    };

    info!("Filtering {}", input.display());
    let mut stats = Stats::new(input.display().to_string());
    let mut out = Destination::new(&mut ok, &mut stats);
    if let Some(sink) = filtered.as_mut() {
        out = out.with_filtered(sink);
    }

    let processed = filter_single(classifier, &mut reader, out, options)
        .with_context(|| format!("Failed to filter {}", input.display()))?;
    info!("{}: {processed} reads processed", input.display());

    Ok(stats)
}

fn run_paired(
    classifier: &ReadClassifier,
    r1: &Path,
    r2: &Path,
    args: &FilterArgs,
    options: &FilterOptions,
) -> anyhow::Result<(Stats, Stats)> {
    let mut reader1 = open_reader(r1)?;
    let mut reader2 = open_reader(r2)?;
    let mut ok1 = create_writer(&output_path(&args.output, r1, args.primary_suffix())?)?;
    let mut ok2 = create_writer(&output_path(&args.output, r2, args.primary_suffix())?)?;
    let mut filtered = if args.write_filtered {
        Some((
            create_writer(&output_path(&args.output, r1, FILTERED_SUFFIX)?)?,
            create_writer(&output_path(&args.output, r2, FILTERED_SUFFIX)?)?,
        ))
    } else {
        None
    };

    info!("Filtering pair {} / {}", r1.display(), r2.display());
    let mut stats1 = args.mate_stats(r1);
    let mut stats2 = args.mate_stats(r2);
    let mut out1 = Destination::new(&mut ok1, &mut stats1);
    let mut out2 = Destination::new(&mut ok2, &mut stats2);
    if let Some((sink1, sink2)) = filtered.as_mut() {
        out1 = out1.with_filtered(sink1);
        out2 = out2.with_filtered(sink2);
    }

    let pairs = filter_paired(classifier, &mut reader1, &mut reader2, out1, out2, options)
        .with_context(|| format!("Failed to filter {} / {}", r1.display(), r2.display()))?;
    info!("{} / {}: {pairs} pairs processed", r1.display(), r2.display());

    Ok((stats1, stats2))
}
