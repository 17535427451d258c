use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use phenomenologist::prelude::*;
use phenomenologist::report::{render_description, render_outcome};

fn read_passage() -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "Enter a short text passage: ")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let settings = Settings::from_env_and_dotenv().context("failed to load configuration")?;
    let phenomenologist = Phenomenologist::from_settings(&settings).context("failed to set up the phenomenologist")?;

    let passage = read_passage().context("failed to read the text passage")?;

    let described = phenomenologist.describe(&passage).await?;
    print!("{}", render_description(&described));
    io::stdout().flush()?;

    let report = phenomenologist.finish(described).await?;
    print!("{}", render_outcome(&report));

    let usage = report.total_usage();
    info!(
        calls = report.call_count(),
        prompt_tokens = usage.prompt_tokens,
        completion_tokens = usage.completion_tokens,
        total_tokens = usage.total_tokens,
        "run complete"
    );
    Ok(())
}
