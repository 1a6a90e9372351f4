use std::time::Duration;

use vvs_board::filter::FilterSettings;
use vvs_board::normalize::NormalizedDeparture;
use vvs_board::poll::{BoardConsumer, PollConfig, Poller};
use vvs_board::vvs::{VvsClient, VvsConfig};

/// Consumer that renders the board to stdout, one row per departure.
struct ConsoleBoard;

impl BoardConsumer for ConsoleBoard {
    fn on_loading(&self) {
        println!("loading...");
    }

    fn on_departures(&self, departures: Vec<NormalizedDeparture>) {
        let Some(first) = departures.first() else {
            println!("No station info available");
            return;
        };

        println!();
        println!("=== {} ===", first.stop_name());
        for d in &departures {
            let delay = if d.delay_sign == 0 {
                String::new()
            } else {
                format!("  {}{}", d.delay_type, d.delay_abs)
            };
            println!(
                "[{}] {:>4}  {:<30} {:>4} min{}",
                d.line_type,
                d.number(),
                d.direction(),
                d.departure_in_minutes,
                delay
            );
        }
    }

    fn on_error(&self, message: String) {
        eprintln!("fetch failed: {message}");
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let station = std::env::var("VVS_STATION").unwrap_or_default();

    let mut vvs_config = VvsConfig::new();
    if let Ok(url) = std::env::var("VVS_URL") {
        vvs_config = vvs_config.with_base_url(url);
    }
    let client = VvsClient::new(vvs_config).expect("Failed to create VVS client");

    let mut settings = FilterSettings::default();
    if let Ok(pattern) = std::env::var("VVS_FILTER_DIRECTION") {
        settings = settings
            .with_direction_filter(&pattern)
            .expect("Invalid VVS_FILTER_DIRECTION pattern");
    }
    if let Ok(pattern) = std::env::var("VVS_FILTER_LINE") {
        settings = settings
            .with_line_filter(&pattern)
            .expect("Invalid VVS_FILTER_LINE pattern");
    }

    let config = PollConfig::new(&station)
        .with_settings(settings)
        .with_update_interval(Duration::from_secs(90));

    let poller = match Poller::spawn(client, config, ConsoleBoard) {
        Ok(poller) => poller,
        Err(e) => {
            eprintln!("Configuration error: {e} (set VVS_STATION)");
            std::process::exit(1);
        }
    };

    println!("Polling departures for station {station}. Press Ctrl-C to stop.");
    tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl-C");
    poller.stop();
}
