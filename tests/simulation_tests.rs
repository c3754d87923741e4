use orb_swarm::adapters::outbound::{init_noop_logger, LogLevel, MemoryLogger};
use orb_swarm::common::{GridError, PolicyError, SetupError};
use orb_swarm::domains::agent::*;
use orb_swarm::domains::grid::*;
use orb_swarm::domains::random::seeded;
use orb_swarm::domains::simulation::*;
use orb_swarm::domains::DynLogger;

fn placement(x: i32, y: i32, team: TeamId) -> AgentPlacement {
    AgentPlacement { x, y, team }
}

/// One agent at the centre of a 5x5 grid that sees everything, one orb in
/// the top-left corner and one hole in the bottom-right corner.
fn single_agent_params() -> SimulationParams {
    SimulationParams {
        width: 5,
        height: 5,
        hole_count: 1,
        orb_count: 1,
        field_of_view: 9,
        energy: 30,
        tracked_team: 1,
        teams: vec![TeamQuota {
            team: 1,
            min_agents: 1,
        }],
        placements: vec![placement(2, 2, 1)],
        holes: vec![Position::new(4, 4)],
        orbs: vec![Position::new(0, 0)],
        obstacles: Vec::new(),
        drift_probability: 0.0,
        energy_policy: EnergyPolicy::ChargeOnSuccess,
        seed: 7,
    }
}

fn two_team_params(seed: u64) -> SimulationParams {
    SimulationParams {
        width: 7,
        height: 7,
        hole_count: 4,
        orb_count: 4,
        field_of_view: 3,
        energy: 40,
        tracked_team: 1,
        teams: vec![
            TeamQuota {
                team: 1,
                min_agents: 2,
            },
            TeamQuota {
                team: 2,
                min_agents: 2,
            },
        ],
        seed,
        ..SimulationParams::default()
    }
}

fn first_agent_id(simulation: &Simulation) -> AgentId {
    simulation.agents()[0].id.clone()
}

#[test]
fn test_single_agent_fills_the_hole_in_fourteen_rounds() {
    let mut simulation = Simulation::new(single_agent_params(), init_noop_logger()).unwrap();
    let id = first_agent_id(&simulation);
    assert_eq!(simulation.max_score(), 1);

    for round in 1..14 {
        assert!(!simulation.step_round(), "finished early in round {round}");
    }
    assert!(simulation.step_round());
    assert_eq!(simulation.round(), 14);
    assert_eq!(simulation.score(), 1);

    let picked = simulation.snapshot(5).unwrap().agent(&id).unwrap().clone();
    assert_eq!(picked.position, Position::new(0, 0));
    assert!(picked.carrying);

    let last = simulation.latest_snapshot().unwrap();
    assert!(last.finished);
    assert_eq!(last.agent(&id).unwrap().position, Position::new(4, 4));
    assert_eq!(last.agent(&id).unwrap().energy, 30 - 12);
    assert_eq!(last.agent(&id).unwrap().score, 1);
    assert_eq!(last.cell(Position::new(4, 4)).unwrap().terrain, Terrain::FilledHole);

    // nothing changes once finished
    assert!(simulation.step_round());
    assert_eq!(simulation.round(), 14);
    assert_eq!(simulation.history().len(), 15);
}

#[test]
fn test_oversized_field_of_view_sees_the_whole_grid() {
    let params = SimulationParams {
        field_of_view: i32::MAX,
        ..single_agent_params()
    };
    let mut simulation = Simulation::new(params, init_noop_logger()).unwrap();

    assert!(simulation.run(100));
    assert_eq!(simulation.round(), 14);
    assert_eq!(simulation.score(), 1);
}

#[test]
fn test_round_zero_snapshot_is_initial_layout() {
    let simulation = Simulation::new(single_agent_params(), init_noop_logger()).unwrap();
    let id = first_agent_id(&simulation);
    let initial = simulation.snapshot(0).unwrap();

    assert_eq!(initial.agent(&id).unwrap().position, Position::new(2, 2));
    assert_eq!(initial.cell(Position::new(0, 0)).unwrap().terrain, Terrain::Orb);
    assert_eq!(initial.cell(Position::new(4, 4)).unwrap().terrain, Terrain::Hole);
    assert_eq!(initial.score, 0);
    assert!(!initial.finished);
}

#[test]
fn test_locks_are_released_by_the_end_of_a_run() {
    let params = SimulationParams {
        hole_count: 2,
        orb_count: 2,
        holes: vec![Position::new(4, 4), Position::new(0, 4)],
        orbs: vec![Position::new(0, 0), Position::new(4, 0)],
        ..single_agent_params()
    };
    let mut simulation = Simulation::new(params, init_noop_logger()).unwrap();
    let id = first_agent_id(&simulation);

    while !simulation.step_round() {
        let agent = simulation.agent(&id).unwrap();
        if let Some(target) = agent.target.filter(|t| t.kind == TargetKind::Item) {
            assert!(agent.knowledge.is_locked(target.position));
        }
        assert!(simulation.round() < 100);
    }

    let agent = simulation.agent(&id).unwrap();
    assert_eq!(simulation.round(), 24);
    assert_eq!(simulation.score(), 2);
    assert!(agent.knowledge.locked().is_empty());
    assert!(agent.target.is_none());
}

/// Every lock a live agent holds, once all pending gossip is merged, belongs
/// to some agent's current item target.
fn assert_locks_are_owned(simulation: &Simulation) {
    let mut agents = simulation.agents().to_vec();
    for agent in agents.iter_mut() {
        agent.drain_inbox();
    }
    let targeted: Vec<Position> = agents
        .iter()
        .filter_map(|agent| agent.target)
        .filter(|target| target.kind == TargetKind::Item)
        .map(|target| target.position)
        .collect();

    for agent in agents.iter().filter(|agent| !agent.is_retired()) {
        for locked in agent.knowledge.locked() {
            assert!(
                targeted.contains(locked),
                "round {}: agent {} holds a lock on {} that nobody targets",
                simulation.round(),
                agent.id,
                locked
            );
        }
    }
}

#[test]
fn test_teammates_never_keep_stale_locks() {
    for seed in 0..8 {
        let params = SimulationParams {
            width: 7,
            height: 7,
            hole_count: 3,
            orb_count: 3,
            field_of_view: 3,
            energy: 40,
            tracked_team: 1,
            teams: vec![TeamQuota {
                team: 1,
                min_agents: 3,
            }],
            seed,
            ..SimulationParams::default()
        };
        let mut simulation = Simulation::new(params, init_noop_logger()).unwrap();
        assert_eq!(simulation.agents().len(), 3);

        while !simulation.step_round() && simulation.round() < 200 {
            assert_locks_are_owned(&simulation);
        }
        assert_locks_are_owned(&simulation);
    }
}

#[test]
fn test_exhausted_agent_retires_and_ends_the_run() {
    let params = SimulationParams {
        energy: 1,
        ..single_agent_params()
    };
    let mut simulation = Simulation::new(params, init_noop_logger()).unwrap();
    let id = first_agent_id(&simulation);

    assert!(!simulation.step_round());
    assert_eq!(simulation.agent(&id).unwrap().energy, 0);
    assert!(simulation.step_round());

    let agent = simulation.agent(&id).unwrap();
    assert!(agent.is_retired());
    assert!(agent.target.is_none());
    assert!(agent.knowledge.locked().is_empty());
    assert_eq!(simulation.last_actions(), &[(id.clone(), TurnAction::Retired)]);
    assert!(simulation.step_round());
    assert_eq!(simulation.round(), 2);
}

#[test]
fn test_same_seed_reproduces_the_run() {
    let mut first = Simulation::new(two_team_params(99), init_noop_logger()).unwrap();
    let mut second = Simulation::new(two_team_params(99), init_noop_logger()).unwrap();
    first.run(60);
    second.run(60);

    assert_eq!(first.history(), second.history());
}

#[test]
fn test_reset_with_seed_matches_a_fresh_simulation() {
    let mut simulation = Simulation::new(two_team_params(1), init_noop_logger()).unwrap();
    simulation.run(10);
    simulation.reset_with_seed(2).unwrap();
    simulation.run(30);

    let mut fresh = Simulation::new(two_team_params(2), init_noop_logger()).unwrap();
    fresh.run(30);

    assert_eq!(simulation.params().seed, 2);
    assert_eq!(simulation.history(), fresh.history());
}

#[test]
fn test_carried_orb_is_not_believed_on_the_grid() {
    let mut simulation = Simulation::new(two_team_params(5), init_noop_logger()).unwrap();

    for _ in 0..80 {
        let finished = simulation.step_round();
        for (id, action) in simulation.last_actions() {
            if let TurnAction::Picked(position) = action {
                let agent = simulation.agent(id).unwrap();
                assert!(agent.carrying);
                assert!(!agent.knowledge.knows_orb(*position));
            }
        }
        if finished {
            break;
        }
    }
}

#[test]
fn test_score_only_drops_on_a_steal() {
    let mut simulation = Simulation::new(two_team_params(13), init_noop_logger()).unwrap();
    let mut previous = simulation.score();

    for _ in 0..120 {
        let finished = simulation.step_round();
        let stolen = simulation
            .last_actions()
            .iter()
            .any(|(_, action)| matches!(action, TurnAction::Stole(_)));
        if !stolen {
            assert!(simulation.score() >= previous);
        }
        assert!(simulation.score() <= simulation.max_score());
        previous = simulation.score();
        if finished {
            break;
        }
    }
}

#[test]
fn test_gossip_reaches_later_teammates_in_the_same_round() {
    let params = SimulationParams {
        width: 5,
        height: 3,
        hole_count: 1,
        orb_count: 1,
        field_of_view: 1,
        teams: vec![TeamQuota {
            team: 1,
            min_agents: 2,
        }],
        placements: vec![placement(0, 0, 1), placement(4, 0, 1)],
        holes: vec![Position::new(2, 2)],
        orbs: vec![Position::new(2, 1)],
        ..single_agent_params()
    };
    let mut simulation = Simulation::new(params, init_noop_logger()).unwrap();
    let first = simulation.agents()[0].id.clone();
    let second = simulation.agents()[1].id.clone();

    simulation.step_round();
    let early = simulation.agent(&first).unwrap();
    let late = simulation.agent(&second).unwrap();
    assert!(late.knowledge.visited().contains(&Position::new(0, 0)));
    assert!(!early.knowledge.visited().contains(&Position::new(4, 0)));
    assert!(early.pending_messages() > 0);

    simulation.step_round();
    let early = simulation.agent(&first).unwrap();
    assert!(early.knowledge.visited().contains(&Position::new(4, 0)));
}

#[test]
fn test_setup_rejections() {
    let cases = vec![
        (
            SimulationParams {
                width: 0,
                ..single_agent_params()
            },
            SetupError::InvalidDimensions { width: 0, height: 5 },
        ),
        (
            SimulationParams {
                field_of_view: 0,
                ..single_agent_params()
            },
            SetupError::InvalidFieldOfView(0),
        ),
        (
            SimulationParams {
                energy: 0,
                ..single_agent_params()
            },
            SetupError::InvalidEnergy(0),
        ),
        (
            SimulationParams {
                placements: vec![placement(5, 0, 1)],
                ..single_agent_params()
            },
            SetupError::PlacementOutOfBounds {
                position: Position::new(5, 0),
            },
        ),
        (
            SimulationParams {
                placements: vec![placement(4, 4, 1)],
                ..single_agent_params()
            },
            SetupError::DuplicatePlacement {
                position: Position::new(4, 4),
            },
        ),
        (
            SimulationParams {
                width: 1,
                height: 1,
                placements: Vec::new(),
                holes: Vec::new(),
                orbs: Vec::new(),
                teams: vec![TeamQuota {
                    team: 1,
                    min_agents: 2,
                }],
                ..single_agent_params()
            },
            SetupError::NotEnoughAgentCells { team: 1, missing: 1 },
        ),
    ];

    let oversized = SimulationParams {
        width: 100_000,
        height: 100_000,
        ..single_agent_params()
    };
    let cases = cases
        .into_iter()
        .chain([(
            oversized,
            SetupError::InvalidDimensions {
                width: 100_000,
                height: 100_000,
            },
        )]);

    for (params, expected) in cases {
        match Simulation::new(params, init_noop_logger()) {
            Err(err) => assert_eq!(err, expected),
            Ok(_) => panic!("expected {expected}"),
        }
    }
}

#[test]
fn test_too_many_holes_for_the_grid() {
    let params = SimulationParams {
        width: 3,
        height: 3,
        hole_count: 9,
        orb_count: 1,
        placements: vec![placement(1, 1, 1)],
        holes: Vec::new(),
        orbs: Vec::new(),
        ..single_agent_params()
    };
    assert!(matches!(
        Simulation::new(params, init_noop_logger()),
        Err(SetupError::NotEnoughCells { .. })
    ));
}

struct FailingPolicy;

impl DecisionPolicy for FailingPolicy {
    fn name(&self) -> &str {
        "failing"
    }

    fn propose_target(&mut self, _context: &PolicyContext<'_>) -> Result<Position, PolicyError> {
        Err(PolicyError::Unavailable {
            reason: "offline".to_string(),
        })
    }
}

struct StepPolicy(Direction);

impl DecisionPolicy for StepPolicy {
    fn name(&self) -> &str {
        "step"
    }

    fn propose_target(&mut self, context: &PolicyContext<'_>) -> Result<Position, PolicyError> {
        Ok(context.position.step(self.0))
    }
}

#[test]
fn test_failing_policy_falls_back_to_nearest_target() {
    let logger = MemoryLogger::new();
    let dyn_logger: DynLogger = logger.clone();
    let mut simulation = Simulation::new(single_agent_params(), dyn_logger).unwrap();
    let id = first_agent_id(&simulation);
    assert!(simulation.set_policy(&id, Box::new(FailingPolicy)));
    assert!(!simulation.set_policy("nobody", Box::new(FailingPolicy)));

    assert!(simulation.run(50));
    assert_eq!(simulation.round(), 14);
    assert!(logger
        .messages(LogLevel::Warn)
        .iter()
        .any(|message| message.contains("policy failing failed")));
}

#[test]
fn test_policy_proposal_is_followed() {
    let mut simulation = Simulation::new(single_agent_params(), init_noop_logger()).unwrap();
    let id = first_agent_id(&simulation);
    simulation.set_policy(&id, Box::new(StepPolicy(Direction::Down)));

    simulation.step_round();
    let agent = simulation.latest_snapshot().unwrap().agent(&id).unwrap().clone();
    assert_eq!(agent.position, Position::new(2, 3));
    assert_eq!(agent.target_kind, Some(TargetKind::Policy));
    assert!(simulation.agent(&id).unwrap().knowledge.locked().is_empty());
}

#[test]
fn test_out_of_bounds_policy_proposal_is_ignored() {
    let mut params = single_agent_params();
    params.placements = vec![placement(2, 0, 1)];
    let mut simulation = Simulation::new(params, init_noop_logger()).unwrap();
    let id = first_agent_id(&simulation);
    simulation.set_policy(&id, Box::new(StepPolicy(Direction::Up)));

    simulation.step_round();
    let agent = simulation.agent(&id).unwrap();
    assert_eq!(agent.target.map(|t| t.kind), Some(TargetKind::Item));
    assert_eq!(agent.position, Position::new(1, 0));
    assert!(simulation.clear_policy(&id).is_some());
}

fn turn_context<'a>(
    grid: &'a mut Grid,
    rng: &'a mut orb_swarm::domains::random::RandomSource,
    roster: &'a TeamRoster,
    energy_policy: EnergyPolicy,
    logger: &'a DynLogger,
) -> TurnContext<'a> {
    TurnContext {
        grid,
        rng,
        roster,
        field_of_view: 3,
        energy_policy,
        policy: None,
        logger,
    }
}

fn head_on_pair(grid: &mut Grid) -> Vec<Agent> {
    let mut a = Agent::new("a".to_string(), 1, Position::new(1, 0), 10);
    a.facing = Direction::Right;
    a.set_target(Position::new(3, 0), TargetKind::Exploration);
    let mut b = Agent::new("b".to_string(), 1, Position::new(2, 0), 5);
    b.facing = Direction::Left;
    b.set_target(Position::new(0, 0), TargetKind::Exploration);
    grid.enter(a.position, &a.id).unwrap();
    grid.enter(b.position, &b.id).unwrap();
    vec![a, b]
}

#[test]
fn test_head_on_conflict_reroutes_the_stronger_agent() {
    let mut grid = Grid::new(5, 3, 0.0).unwrap();
    let mut agents = head_on_pair(&mut grid);
    let roster = TeamRoster::build(agents.iter().map(|a| (&a.id, a.team)));
    let mut rng = seeded(3);
    let logger = init_noop_logger();

    let mut ctx = turn_context(&mut grid, &mut rng, &roster, EnergyPolicy::ChargeOnSuccess, &logger);
    let first = take_turn(&mut agents, 0, &mut ctx);
    let second = take_turn(&mut agents, 1, &mut ctx);

    assert_eq!(
        first,
        TurnAction::Moved {
            from: Position::new(1, 0),
            to: Position::new(1, 1)
        }
    );
    assert_eq!(
        second,
        TurnAction::Moved {
            from: Position::new(2, 0),
            to: Position::new(1, 0)
        }
    );
    assert_ne!(agents[0].position, agents[1].position);
    assert_eq!(grid.agent_position("a"), Some(Position::new(1, 1)));
    assert_eq!(grid.agent_position("b"), Some(Position::new(1, 0)));
}

#[test]
fn test_head_on_conflict_weaker_agent_holds() {
    let mut grid = Grid::new(5, 3, 0.0).unwrap();
    let mut agents = head_on_pair(&mut grid);
    let roster = TeamRoster::build(agents.iter().map(|a| (&a.id, a.team)));
    let mut rng = seeded(3);
    let logger = init_noop_logger();

    let mut ctx = turn_context(&mut grid, &mut rng, &roster, EnergyPolicy::ChargeOnSuccess, &logger);
    let weaker = take_turn(&mut agents, 1, &mut ctx);
    let stronger = take_turn(&mut agents, 0, &mut ctx);

    assert_eq!(weaker, TurnAction::Held);
    assert!(matches!(stronger, TurnAction::Moved { .. }));
    assert_eq!(agents[1].position, Position::new(2, 0));
    assert_eq!(agents[1].energy, 5);
}

#[test]
fn test_negotiation_is_deterministic() {
    let grid = Grid::new(5, 3, 0.0).unwrap();
    let me = NegotiationParty {
        position: Position::new(1, 0),
        facing: Direction::Right,
        target: Some(Position::new(3, 0)),
        energy: 10,
    };
    let opponent = NegotiationParty {
        position: Position::new(2, 0),
        facing: Direction::Left,
        target: Some(Position::new(0, 0)),
        energy: 5,
    };

    let first = negotiate(&me, &opponent, &grid);
    for _ in 0..10 {
        assert_eq!(negotiate(&me, &opponent, &grid), first);
    }
    assert_eq!(first, Resolution::Reroute(Direction::Down));
    assert_eq!(negotiate(&opponent, &me, &grid), Resolution::Hold);
}

#[test]
fn test_blocked_move_cost_depends_on_energy_policy() {
    for (policy, expected_energy) in [
        (EnergyPolicy::ChargeOnSuccess, 10),
        (EnergyPolicy::ChargeOnAttempt, 9),
    ] {
        let mut grid = Grid::new(3, 1, 0.0).unwrap();
        grid.seed_terrain(Position::new(1, 0), Terrain::Obstacle).unwrap();
        let mut agent = Agent::new("a".to_string(), 1, Position::new(0, 0), 10);
        agent.set_target(Position::new(2, 0), TargetKind::Exploration);
        grid.enter(agent.position, &agent.id).unwrap();
        let mut agents = vec![agent];
        let roster = TeamRoster::build(agents.iter().map(|a| (&a.id, a.team)));
        let mut rng = seeded(1);
        let logger = init_noop_logger();

        let mut ctx = turn_context(&mut grid, &mut rng, &roster, policy, &logger);
        let action = take_turn(&mut agents, 0, &mut ctx);

        assert_eq!(
            action,
            TurnAction::Blocked(GridError::Obstructed {
                position: Position::new(1, 0)
            })
        );
        assert_eq!(agents[0].energy, expected_energy);
        assert_eq!(agents[0].position, Position::new(0, 0));
        // boxed in on a single row, so the target is given up
        assert!(agents[0].target.is_none());

        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains("Obstructed"));
        assert_eq!(serde_json::from_str::<TurnAction>(&json).unwrap(), action);
    }
}

#[test]
fn test_agent_walks_around_an_obstacle() {
    let params = SimulationParams {
        width: 5,
        height: 3,
        placements: vec![placement(0, 1, 1)],
        holes: vec![Position::new(0, 0)],
        orbs: vec![Position::new(4, 1)],
        obstacles: vec![Position::new(2, 1)],
        ..single_agent_params()
    };
    let mut simulation = Simulation::new(params, init_noop_logger()).unwrap();
    let id = first_agent_id(&simulation);

    while !simulation.step_round() {
        assert!(simulation.round() < 50, "agent stalled behind the obstacle");
    }

    assert_eq!(simulation.round(), 13);
    assert_eq!(simulation.score(), 1);
    let position_after = |round: u64| simulation.snapshot(round).unwrap().agent(&id).unwrap().position;
    assert_eq!(position_after(1), Position::new(1, 1));
    assert_eq!(position_after(2), Position::new(1, 0));
    assert_eq!(position_after(7), Position::new(4, 1));
    assert_eq!(position_after(9), Position::new(3, 0));
    assert_eq!(simulation.agent(&id).unwrap().energy, 19);
}

fn rival_filled_hole(filler_team: TeamId) -> (Grid, Vec<Agent>, TeamRoster) {
    let mut grid = Grid::new(3, 1, 0.0).unwrap();
    let mut rng = seeded(4);
    grid.seed_terrain(Position::new(1, 0), Terrain::Hole).unwrap();
    grid.place_item(Position::new(1, 0), "filler", true, &mut rng).unwrap();
    let thief = Agent::new("thief".to_string(), 2, Position::new(1, 0), 10);
    grid.enter(thief.position, &thief.id).unwrap();

    let members: Vec<(AgentId, TeamId)> = vec![("filler".to_string(), filler_team), ("thief".to_string(), 2)];
    let roster = TeamRoster::build(members.iter().map(|(id, team)| (id, *team)));
    (grid, vec![thief], roster)
}

#[test]
fn test_rival_filled_hole_is_stolen_and_relearned() {
    let (mut grid, mut agents, roster) = rival_filled_hole(1);
    let mut rng = seeded(8);
    let logger = init_noop_logger();

    let mut ctx = turn_context(&mut grid, &mut rng, &roster, EnergyPolicy::ChargeOnSuccess, &logger);
    let action = take_turn(&mut agents, 0, &mut ctx);

    assert_eq!(action, TurnAction::Stole(Position::new(1, 0)));
    assert_eq!(grid.filled_hole_count(), 0);
    assert_eq!(grid.orb_count(), 1);
    assert_eq!(grid.hole_filler(Position::new(1, 0)), None);
    let knowledge = &agents[0].knowledge;
    assert!(knowledge.knows_hole(Position::new(1, 0)));
    assert!(!knowledge.filled_holes().contains(&Position::new(1, 0)));
    assert!(!agents[0].carrying);
}

#[test]
fn test_teammate_filled_hole_is_left_alone() {
    let (mut grid, mut agents, roster) = rival_filled_hole(2);
    let mut rng = seeded(8);
    let logger = init_noop_logger();

    let mut ctx = turn_context(&mut grid, &mut rng, &roster, EnergyPolicy::ChargeOnSuccess, &logger);
    let action = take_turn(&mut agents, 0, &mut ctx);

    assert!(!matches!(action, TurnAction::Stole(_)));
    assert_eq!(grid.filled_hole_count(), 1);
    assert_eq!(grid.hole_filler(Position::new(1, 0)), Some(&"filler".to_string()));
}

#[test]
fn test_agents_from_opposite_corners_resolve_head_on() {
    let mut grid = Grid::new(5, 3, 0.0).unwrap();
    let mut agents = Vec::new();
    for (id, x) in [("a", 0), ("b", 4)] {
        let mut agent = Agent::new(id.to_string(), 1, Position::new(x, 0), 10);
        agent.set_target(Position::new(2, 0), TargetKind::Exploration);
        grid.enter(agent.position, &agent.id).unwrap();
        agents.push(agent);
    }
    let roster = TeamRoster::build(agents.iter().map(|a| (&a.id, a.team)));
    let mut rng = seeded(6);
    let logger = init_noop_logger();
    let mut ctx = turn_context(&mut grid, &mut rng, &roster, EnergyPolicy::ChargeOnSuccess, &logger);

    take_turn(&mut agents, 0, &mut ctx);
    take_turn(&mut agents, 1, &mut ctx);
    assert_eq!(agents[0].position, Position::new(1, 0));
    assert_eq!(agents[1].position, Position::new(3, 0));

    let first = take_turn(&mut agents, 0, &mut ctx);
    let second = take_turn(&mut agents, 1, &mut ctx);

    assert_eq!(
        first,
        TurnAction::Moved {
            from: Position::new(1, 0),
            to: Position::new(2, 0)
        }
    );
    // b meets a head-on with more energy left and backs off
    assert_eq!(
        second,
        TurnAction::Moved {
            from: Position::new(3, 0),
            to: Position::new(4, 0)
        }
    );
    assert_eq!(agents[1].facing, Direction::Right);
    assert_ne!(agents[0].position, agents[1].position);
}
