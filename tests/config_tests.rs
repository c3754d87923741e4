use orb_swarm::common::SetupError;
use orb_swarm::domains::agent::EnergyPolicy;
use orb_swarm::domains::grid::Position;
use orb_swarm::domains::simulation::AgentPlacement;
use orb_swarm::Config;
use std::io::Write;
use tempfile::NamedTempFile;

const SAMPLE: &str = r#"
[grid]
width = 7
height = 6
holes = 2
orbs = 4
drift_probability = 0.25
obstacles = [{ x = 3, y = 3 }]

[agents]
field_of_view = 4
energy = 20
energy_policy = "charge_on_attempt"
teams = [{ team = 1, min_agents = 2 }, { team = 2, min_agents = 1 }]
placements = [{ x = 0, y = 0, team = 1 }]

[run]
seed = 42
max_rounds = 80

[log]
level = "warn"
"#;

#[test]
fn test_parse_full_config() {
    let config = Config::from_toml(SAMPLE).unwrap();

    assert_eq!(config.grid.width, 7);
    assert_eq!(config.grid.obstacles, vec![Position::new(3, 3)]);
    assert_eq!(config.agents.energy_policy, EnergyPolicy::ChargeOnAttempt);
    assert_eq!(config.agents.teams.len(), 2);
    assert_eq!(config.run.max_rounds, 80);
    assert_eq!(config.log.level_filter(), log::LevelFilter::Warn);
    assert!(config.journal.directory.is_none());

    let params = config.to_params(999).unwrap();
    assert_eq!(params.seed, 42);
    assert_eq!(params.field_of_view, 4);
    assert_eq!(params.hole_count, 2);
    assert_eq!(params.placements, vec![AgentPlacement { x: 0, y: 0, team: 1 }]);
}

#[test]
fn test_missing_sections_use_defaults() {
    let config = Config::from_toml("[run]\nmax_rounds = 10\n").unwrap();

    assert_eq!(config.grid.width, 5);
    assert_eq!(config.agents.field_of_view, 3);
    assert_eq!(config.agents.energy_policy, EnergyPolicy::ChargeOnSuccess);
    assert_eq!(config.log.level_filter(), log::LevelFilter::Info);
    assert_eq!(config.to_params(17).unwrap().seed, 17);
}

#[test]
fn test_invalid_values_are_rejected() {
    let config = Config::from_toml("[agents]\nfield_of_view = 0\n").unwrap();
    assert_eq!(config.to_params(1), Err(SetupError::InvalidFieldOfView(0)));

    let config = Config::from_toml("[grid]\ndrift_probability = 1.5\n").unwrap();
    assert_eq!(config.to_params(1), Err(SetupError::InvalidDriftProbability(1.5)));

    assert!(Config::from_toml("[grid]\nwidth = \"wide\"\n").is_err());
}

#[tokio::test]
async fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let config = Config::from_file(file.path()).await.unwrap();
    assert_eq!(config.grid.height, 6);
    assert_eq!(config.run.seed, Some(42));
}
