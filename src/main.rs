use live_tally::pipeline::HttpFetcher;
use live_tally::views::{closest_contests, party_tally};
use live_tally::{snapshot, Config, Refresher};
use log::{error, info};

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let fetcher = match HttpFetcher::new(&config) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let (publisher, mut reader) = snapshot::channel();
    let refresher = Refresher::new(fetcher, &config, publisher);

    // --- Start Background Refresh ---
    let task = tokio::spawn(refresher.run());

    // Stand-in consumer: report every new snapshot until the task stops.
    while let Ok(snapshot) = reader.changed().await {
        let tally: Vec<String> = party_tally(&snapshot.table)
            .iter()
            .map(|t| format!("{} {}", t.party_code, t.seats))
            .collect();
        info!(
            "v{} at {:?}: {} seats, leads [{}]",
            snapshot.version,
            snapshot.published_at,
            snapshot.table.len(),
            tally.join(", ")
        );
        for record in closest_contests(&snapshot.table, 5) {
            info!("  close: {}", record.label);
        }
    }

    if let Err(e) = task.await {
        error!("Refresh task failed: {}", e);
        return;
    }

    let last = reader.snapshot();
    match serde_json::to_string_pretty(&party_tally(&last.table)) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to encode final tally: {}", e),
    }
}
