use anyhow::{Context, Result};
use chrono_tz::Tz;
use clap::Parser;
use datediff_engine::DiffCalculator;

/// Compute the difference between two datetimes
#[derive(Parser)]
#[command(name = "datediff", version, about)]
struct Cli {
    /// Start datetime (e.g. "2024-01-01T00:00:00+00:00", "2024-01-01", "Thu, 02 Jun 2022 16:58:35 +0000")
    start: String,

    /// End datetime, must not be earlier than the start
    end: String,

    /// Unit: days, weekdays, weeks, hours, minutes, seconds or years
    #[arg(short, long, default_value = "days")]
    unit: String,

    /// IANA timezone for datetimes without an offset
    #[arg(short = 'z', long, default_value = "UTC")]
    timezone: String,

    /// Print {"result": n} instead of the bare number
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let tz = cli
        .timezone
        .parse::<Tz>()
        .map_err(|e| anyhow::anyhow!("invalid timezone '{}': {e}", cli.timezone))?;

    let diff = DiffCalculator::with_default_timezone(tz).calculate(&cli.start, &cli.end, &cli.unit)?;

    if cli.json {
        let output = serde_json::to_string(&diff).context("failed to serialize result")?;
        println!("{output}");
    } else {
        println!("{}", diff.result);
    }

    Ok(())
}
