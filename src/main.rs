#![allow(clippy::uninlined_format_args)]

use clap::Parser;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rmanga_scraper::{BrowserOptions, BrowserType, ScrapeError, scraper, validation};

// Exit codes
const EXIT_SUCCESS: i32 = 0;

#[derive(Parser)]
#[command(name = "rmanga-scraper")]
#[command(version, about = "Simple cli for readmanga and mintmanga content scraping", long_about = None)]
struct Cli {
    /// Manga title page, e.g. https://readmanga.live/van_pis__A5664
    manga_title_page: String,

    /// Absolute path of an existing destination folder
    save_path: String,

    /// Browser to drive
    #[arg(short, long, value_enum, default_value = "chrome")]
    browser: BrowserType,

    /// Run browser in visible mode (disables headless)
    #[arg(long = "no-headless")]
    no_headless: bool,

    /// Persistent profile name (temporary if not specified)
    #[arg(short, long)]
    profile: Option<String>,

    /// Use a running WebDriver instead of starting one
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Seconds to wait for any page element before giving up
    #[arg(long, default_value = "30")]
    wait_timeout: u64,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            if let ScrapeError::Validation(errors) = &err {
                for e in errors {
                    eprintln!("Error: {}: {}", e.code(), e);
                }
            } else {
                eprintln!("Error: {}", err);
            }
            std::process::exit(err.exit_code());
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "rmanga_scraper=debug"
    } else {
        "rmanga_scraper=info"
    };

    // Logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

async fn run(cli: Cli) -> Result<(), ScrapeError> {
    let args = validation::validate_arguments(&cli.manga_title_page, &cli.save_path)?;

    let options = BrowserOptions {
        browser: cli.browser,
        headless: !cli.no_headless,
        profile: cli.profile,
        webdriver_url: cli.webdriver_url,
        wait_timeout: Duration::from_secs(cli.wait_timeout),
    };

    let report = scraper::run(&args, &options).await?;
    println!(
        "{}: {} chapter(s), {} image(s) saved, {} already present",
        report.manga_name,
        report.chapters.len(),
        report.images_saved(),
        report.images_skipped()
    );
    Ok(())
}
