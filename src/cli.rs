use anyhow::{bail, Context};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::driver::HttpDriver;
use crate::services::{init_logging, CrawlSession, CsvSink};
use crate::types::CrawlConfig;

#[derive(Parser, Debug)]
#[command(
    name = "catalog-crawl",
    version,
    about = "Crawl a paginated product catalog into a deduplicated CSV"
)]
pub struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Visit detail pages for descriptions (skips the prompt).
    #[arg(long, conflicts_with = "no_descriptions")]
    descriptions: bool,

    /// Listing pages only (skips the prompt).
    #[arg(long)]
    no_descriptions: bool,

    /// Crawl only the first category.
    #[arg(long, conflicts_with = "limit")]
    test_one: bool,

    /// Crawl only the first N categories.
    #[arg(long)]
    limit: Option<usize>,

    /// Delivery zip code used to pick the regional catalog.
    #[arg(long)]
    zip: Option<String>,

    #[arg(long)]
    output: Option<PathBuf>,

    /// Checkpoint CSV; the resume manifest is written next to it.
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// Continue an interrupted crawl from its checkpoint and manifest.
    #[arg(long)]
    resume: bool,

    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CrawlConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => CrawlConfig::default(),
    };
    apply_overrides(&cli, &mut config);

    if !cli.descriptions && !cli.no_descriptions {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut out = io::stdout();
        let (fetch, limit) = ask_mode(&mut input, &mut out)?;
        config.fetch_descriptions = fetch;
        config.category_limit = config.category_limit.or(limit);
    }
    config.validate().context("invalid configuration")?;

    let _guard = init_logging(config.log_file.as_deref(), cli.verbose)?;

    print_banner(&config);

    let driver = HttpDriver::new().context("failed to start page driver")?;
    let mut session = CrawlSession::new(driver, CsvSink::new(), config);
    if cli.resume {
        session.resume().context("failed to resume from checkpoint")?;
    }

    let report = session.run().context("crawl aborted")?;
    println!("\n{report}");

    if !report.failed.is_empty() {
        bail!(
            "{} categories failed; rerun with --resume to retry them",
            report.failed.len()
        );
    }
    Ok(())
}

fn apply_overrides(cli: &Cli, config: &mut CrawlConfig) {
    if cli.descriptions {
        config.fetch_descriptions = true;
    }
    if cli.no_descriptions {
        config.fetch_descriptions = false;
    }
    if cli.test_one {
        config.category_limit = Some(1);
    }
    if let Some(limit) = cli.limit {
        config.category_limit = Some(limit);
    }
    if let Some(zip) = &cli.zip {
        config.zip_code = zip.clone();
    }
    if let Some(output) = &cli.output {
        config.output_path = output.clone();
    }
    if let Some(checkpoint) = &cli.checkpoint {
        config.checkpoint_path = checkpoint.clone();
        config.manifest_path = checkpoint.with_extension("manifest.json");
    }
    if let Some(log_file) = &cli.log_file {
        config.log_file = Some(log_file.clone());
    }
}

/// The two interactive questions: enrichment, and (only then) a one
/// category trial run.
fn ask_mode(input: &mut impl BufRead, out: &mut impl Write) -> io::Result<(bool, Option<usize>)> {
    let fetch = ask_yes_no("Fetch product descriptions? (y/n, default=n): ", input, out)?;
    if !fetch {
        return Ok((false, None));
    }
    let test_one = ask_yes_no("Test with just 1 category first? (y/n, default=n): ", input, out)?;
    Ok((true, test_one.then_some(1)))
}

fn ask_yes_no(prompt: &str, input: &mut impl BufRead, out: &mut impl Write) -> io::Result<bool> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}

fn print_banner(config: &CrawlConfig) {
    println!("\nCatalog Crawl");
    println!("=============");
    println!("Zip Code: {}", config.zip_code);
    println!("Fetch Descriptions: {}", config.fetch_descriptions);
    if let Some(limit) = config.category_limit {
        println!("TEST MODE: Limited to {limit} category");
    }
    println!("Starting crawl...\n");
}
