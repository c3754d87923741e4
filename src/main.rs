use orb_swarm::adapters::inbound::{FileEventStore, InMemoryEventStore};
use orb_swarm::adapters::outbound::{init_combined_logger, init_console_logger};
use orb_swarm::application::SimulationService;
use orb_swarm::domains::simulation::Simulation;
use orb_swarm::{Config, EventStore};
use std::error::Error;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting orb-swarm");

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = match Config::from_file(&config_path).await {
        Ok(config) => {
            info!("Configuration loaded from {}", config_path);
            config
        }
        Err(e) => {
            warn!("Could not load {} ({}), using defaults", config_path, e);
            Config::default()
        }
    };

    let level = config.log.level_filter();
    let logger = match &config.log.file {
        Some(path) => init_combined_logger(path, level),
        None => init_console_logger("orb-swarm", level),
    };

    let params = config.to_params(rand::random())?;
    info!(
        "Grid {}x{}, {} holes, {} orbs, seed {}",
        params.width, params.height, params.hole_count, params.orb_count, params.seed
    );
    let simulation = Simulation::new(params, logger)?;

    let event_store: Arc<dyn EventStore + Send + Sync> = match &config.journal.directory {
        Some(directory) => Arc::new(FileEventStore::new(directory)),
        None => Arc::new(InMemoryEventStore::new()),
    };

    let mut service = SimulationService::start(simulation, event_store).await?;
    let summary = service.run_to_completion(config.run.max_rounds).await?;

    info!(
        "Run {} ended after {} rounds: score {}/{} (journal stream {})",
        summary.run_id, summary.rounds, summary.score, summary.max_score, summary.stream_id
    );
    for (agent_id, score) in &summary.per_agent {
        info!("  agent {} filled {} holes", agent_id, score);
    }
    if summary.reached_max_score() {
        info!("Agents completed the task");
    } else {
        warn!("Run ended before every reachable hole was filled");
    }

    Ok(())
}
