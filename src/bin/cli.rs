//! Print the enriched accessibility tree of a page.
//!
//! ```bash
//! a11y-tree https://example.com
//! a11y-tree --only-input-fields --log-dir /tmp/a11y example.com/login
//! ```

use a11y_tree::browser::config::DEFAULT_LOG_DIR;
use a11y_tree::browser::{BrowserSession, ExtractionOptions, LaunchOptions};
use a11y_tree::tools::utils::normalize_url;
use anyhow::{Context, bail};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "a11y-tree")]
#[command(version)]
#[command(about = "Dump the enriched accessibility tree an agent would see", long_about = None)]
struct Cli {
    /// Page to load
    url: String,

    /// Keep only inputs, buttons and text areas
    #[arg(long)]
    only_input_fields: bool,

    /// Directory for the raw and enriched JSON artifacts
    #[arg(long, value_name = "DIR", default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,

    /// Show the browser window
    #[arg(long)]
    headed: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let session = BrowserSession::launch(LaunchOptions::new().headless(!cli.headed))
        .context("Failed to launch browser")?;

    let url = normalize_url(&cli.url);
    session.navigate(&url).with_context(|| format!("Failed to open {}", url))?;
    session.wait_for_navigation()?;

    let options = ExtractionOptions::new()
        .only_input_fields(cli.only_input_fields)
        .log_dir(&cli.log_dir);

    let Some(tree) = session.accessibility_tree(&options)? else {
        bail!("No accessibility tree could be built for {}", url);
    };

    println!("{}", tree.to_json()?);
    session.close()?;
    Ok(())
}
