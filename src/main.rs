use std::time::Duration;

use anyhow::Result;
use yartemp_core::Config;
use yartemp_feed::{FeedClient, Snapshot, WeatherModel};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    yartemp_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    let client = FeedClient::with_options(
        &config.feed.url,
        Duration::from_secs(config.feed.timeout_secs),
    )?;
    let model = WeatherModel::new(client);

    tracing::info!("YarTemp started");

    // YARTEMP_OFFLINE feeds a canned observation line instead of the network.
    match std::env::var("YARTEMP_OFFLINE") {
        Ok(raw) => {
            tracing::info!("Using offline observation line");
            model.refresh_offline(&raw).await;
        }
        Err(_) => model.refresh().await,
    }

    let snapshot = model.snapshot();
    if snapshot.reading.is_none() {
        if let Some(error) = snapshot.error {
            anyhow::bail!("Refresh failed: {}", error);
        }
        anyhow::bail!("No reading available");
    }

    render(&snapshot);
    Ok(())
}

/// Print the panel rows for one reading.
fn render(snapshot: &Snapshot) {
    if let Some(error) = &snapshot.error {
        println!("{}", error.user_message());
        println!("Showing the last known reading.");
        println!();
    }

    let Some(reading) = snapshot.reading else {
        return;
    };

    println!("Yaroslavl  {}", reading.temperature);
    if let Some(fetched_at) = snapshot.fetched_at {
        println!("Fetched at {}", fetched_at.format("%Y-%m-%d %H:%M UTC"));
    }
    println!();

    let change = reading.temperature_change.value();
    row("Temp. change", format!("{:+.1} °C {}", change, arrow(change)));
    row("Day low", reading.temperature_day_min.to_string());
    row("Day high", reading.temperature_day_max.to_string());
    row("Day average", reading.temperature_day_average.to_string());
    row("Last year was", reading.temperature_day_last_year.to_string());
    row("Pressure", reading.pressure.to_string());

    let pressure_change = reading.pressure_change.value();
    row(
        "Pressure change",
        format!("{:+.1} mmHg {}", pressure_change, arrow(pressure_change)),
    );
}

fn row(label: &str, value: String) {
    println!("  {:<16}{:>12}", label, value);
}

fn arrow(change: f64) -> char {
    if change > 0.0 {
        '↑'
    } else {
        '↓'
    }
}
