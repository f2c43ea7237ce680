use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use team_roster::config::{DEFAULT_BRANCH, DEFAULT_IMAGES_DIR, DEFAULT_OUTPUT, DEFAULT_WORKDIR};
use team_roster::{run, PublishConfig, Publisher, RosterConfig, RunSummary, MAX_DIMENSION};

#[derive(Parser)]
#[command(name = "team-roster", version)]
#[command(about = "Build the website team roster from the members spreadsheet")]
struct Args {
    /// Roster spreadsheet (.csv export, or .xlsx/.xlsm/.xls/.ods workbook)
    sheet: PathBuf,

    /// Website repository to publish to (https://github.com/...). Skips publishing when absent.
    #[arg(long)]
    repository: Option<String>,

    /// Directory holding profile photos
    #[arg(long, default_value = DEFAULT_IMAGES_DIR)]
    images: PathBuf,

    /// Roster JSON to write
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Previously published roster to merge with. Default: the output file
    #[arg(long)]
    previous: Option<PathBuf>,

    /// Longer side of normalized photos, in pixels
    #[arg(long, default_value_t = MAX_DIMENSION)]
    max_dimension: u32,

    /// Branch to push the update to
    #[arg(long, default_value = DEFAULT_BRANCH)]
    branch: String,

    /// Scratch directory for the repository clone
    #[arg(long, default_value = DEFAULT_WORKDIR)]
    workdir: PathBuf,
}

impl Args {
    fn into_config(self) -> RosterConfig {
        let publish = self.repository.map(|repository| PublishConfig {
            repository,
            branch: self.branch,
            workdir: self.workdir,
        });

        RosterConfig {
            previous_path: self.previous.unwrap_or_else(|| self.output.clone()),
            sheet_path: self.sheet,
            images_dir: self.images,
            output_path: self.output,
            max_image_dimension: self.max_dimension,
            publish,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "team_roster=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Args::parse().into_config();
    config.validate()?;

    println!("📋 Team Roster v{}", team_roster::VERSION);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!("\n📂 Building roster from {}...", config.sheet_path.display());
    let summary = run(&config, Utc::now())
        .with_context(|| format!("Failed to build roster from {}", config.sheet_path.display()))?;
    print_summary(&summary);
    println!("✓ Wrote {}", config.output_path.display());

    if let Some(publish) = config.publish.clone() {
        println!("\n🚀 Publishing to {}...", publish.repository);
        Publisher::new(publish)
            .publish(&config.output_path, &config.images_dir)
            .context("Failed to publish roster")?;
        println!("✓ Changes pushed");
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✅ Done");
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    println!("✓ Read {} rows ({} with photos)", summary.rows, summary.photos);
    println!("✓ {}", summary.reconciliation.summary());
    for (team, count) in &summary.buckets {
        println!("   {:<12} {}", team.as_str(), count);
    }
    println!("✓ {} roster entries", summary.entries());
}
