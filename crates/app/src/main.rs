use api_types::draw::Processed;
use clap::Parser;

mod api;
mod settings;
mod source;

#[derive(Parser, Debug)]
#[command(name = "drawrun")]
#[command(about = "Allocate budget funds to pending draw requests")]
struct Cli {
    /// Settings file, without extension (also read from `DRAWRUN_SETTINGS`).
    #[arg(long, env = "DRAWRUN_SETTINGS", default_value = "settings")]
    settings: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.settings)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "drawrun={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Loading draw data from {}", settings.source);
    let snapshot = match source::load(&settings.source).await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            tracing::error!("failed to load draw data: {err}");
            return Err(err.into());
        }
    };

    let settlement = match engine::process(snapshot, settings.app.policy) {
        Ok(settlement) => settlement,
        Err(err) => {
            tracing::error!("draw run aborted: {err}");
            return Err(err.into());
        }
    };

    for (budget_id, balance) in settlement.budgets.iter() {
        tracing::debug!("{budget_id} remaining balance {balance}");
    }
    for (item_id, budget_id, capacity) in settlement.items.iter() {
        tracing::debug!("{item_id} ({budget_id}) remaining capacity {capacity}");
    }

    let processed = Processed::from(settlement.processed);
    println!("{}", serde_json::to_string(&processed)?);

    Ok(())
}
