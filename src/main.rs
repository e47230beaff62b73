use clap::Parser;
use cookiecutter::cli;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("cookiecutter=debug,info")
    } else {
        EnvFilter::new("cookiecutter=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Filter(args) => {
            cli::filter::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::MakeLibrary(args) => {
            cli::make_library::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
