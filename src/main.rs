use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kmy_import::banks::roklen;
use kmy_import::{convert_file, get_parser, SourceType};

fn main() {
    init_logging();

    let cli = Cli::parse();
    if let Err(error) = run(cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "kmy_import=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Fio(args) => convert_all(SourceType::Fio, &args.files),
        Command::Air(args) => convert_all(SourceType::AirBank, &args.files),
        Command::Entropay(args) => convert_all(SourceType::Entropay, &args.files),
        Command::Mbdcz(args) => convert_all(SourceType::MailboxDe, &args.files),
        Command::Roklen(args) => {
            roklen::process_files(&args.transactions, &args.payments, &args.output_dir)
                .with_context(|| {
                    format!(
                        "Failed to convert {} and {}",
                        args.transactions.display(),
                        args.payments.display()
                    )
                })?;
            Ok(())
        }
    }
}

/// Files are converted one after another; the first failure stops the run.
fn convert_all(source: SourceType, files: &[PathBuf]) -> Result<()> {
    let parser = get_parser(source)
        .with_context(|| format!("{} has no single-file parser", source.name()))?;

    for file in files {
        convert_file(parser.as_ref(), file)
            .with_context(|| format!("Failed to convert {}", file.display()))?;
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Convert bank exports to csv files import-able by KMyMoney."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fio banka exports.
    Fio(FilesArgs),
    /// Air Bank exports.
    Air(FilesArgs),
    /// Entropay exports.
    Entropay(FilesArgs),
    /// MailboxDE.cz exports.
    Mbdcz(FilesArgs),
    /// RoklenFX transactions and payments exports.
    ///
    /// For each currency present in the given files an export file is created
    /// named RoklenFX-<date>-<currency>.kmy.csv. Each of them should be
    /// imported into its own KMyMoney account of the same currency.
    Roklen(RoklenArgs),
}

#[derive(clap::Args)]
struct FilesArgs {
    /// Files to process. Each is written next to itself as <name>.kmy.<ext>.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(clap::Args)]
struct RoklenArgs {
    /// Transactions file.
    transactions: PathBuf,

    /// Payments file.
    payments: PathBuf,

    /// Directory receiving the per-currency files.
    #[arg(long, short, default_value = ".")]
    output_dir: PathBuf,
}
