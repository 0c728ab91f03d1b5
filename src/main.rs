// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Load the locale files
// 3. Check every link they contain and print the failures
// 4. Exit with proper code (0 = all links fine, 1 = broken links, 2 = error)
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser;

use locale_link_check::catalog::{FsCatalog, LocaleCatalog};
use locale_link_check::checker::{HttpFetcher, Validator};
use locale_link_check::cli::{CheckArgs, Cli, Commands, SourceArgs};
use locale_link_check::config::CheckConfig;
use locale_link_check::logging;
use locale_link_check::report::{JsonReporter, Reporter, TextReporter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err   = could not run the check at all (exit code 2)
async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check(args) => handle_check(args).await,
        Commands::Locales { source } => handle_locales(&source),
    }
}

// Handles the 'check' subcommand
async fn handle_check(args: CheckArgs) -> Result<i32> {
    let config = CheckConfig::new(
        args.max_redirects,
        args.timeout,
        args.concurrency,
        args.user_agent,
    )?;

    let catalog = open_catalog(&args.source)?;
    let locales = if args.locales.is_empty() {
        catalog.locales()?
    } else {
        args.locales
    };

    // Progress goes to stdout only in text mode; JSON output must stay parseable
    if !args.json {
        println!(
            "🔍 Checking links in {} locale(s) from {}",
            locales.len(),
            catalog.root().display()
        );
    }

    let fetcher = HttpFetcher::new(&config).context("Failed to create HTTP client")?;
    let mut validator = Validator::new(fetcher, &config);
    let summary = validator.validate_catalog(&catalog, &locales).await?;

    let stdout = std::io::stdout().lock();
    if args.json {
        JsonReporter::new(stdout).report(&summary)?;
    } else {
        TextReporter::new(stdout).report(&summary)?;
    }

    if summary.failures.is_empty() {
        Ok(0)
    } else {
        Ok(1)
    }
}

// Handles the 'locales' subcommand
fn handle_locales(source: &SourceArgs) -> Result<i32> {
    let catalog = open_catalog(source)?;
    for locale in catalog.locales()? {
        println!("{:<10} {} file(s)", locale, catalog.files_for(&locale).len());
    }
    Ok(0)
}

fn open_catalog(source: &SourceArgs) -> Result<FsCatalog> {
    FsCatalog::open(&source.locales_dir).with_context(|| {
        format!(
            "Failed to open locales directory {}",
            source.locales_dir.display()
        )
    })
}
