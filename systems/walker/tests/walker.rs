use gridpath_core::{CellCoord, Command, Event, GridConfig, PlayMode, TerrainKind};
use gridpath_system_pathfinding::Pathfinder;
use gridpath_system_walker::{AssignRejection, Walker};
use gridpath_world::{self as world, query, World};

struct Harness {
    world: World,
    walker: Walker,
    events: Vec<Event>,
}

impl Harness {
    fn new(agent: CellCoord) -> Self {
        let config = GridConfig {
            width: 3,
            height: 3,
            wall_percent: 0.0,
            water_percent: 0.0,
            ..GridConfig::default()
        };
        let mut harness = Self {
            world: World::new(config).expect("valid configuration"),
            walker: Walker::new(),
            events: Vec::new(),
        };
        harness.apply(vec![
            Command::SetPlayMode {
                mode: PlayMode::Edit,
            },
            Command::PlaceAgent { cell: agent },
            Command::SetPlayMode {
                mode: PlayMode::Explore,
            },
        ]);
        harness
    }

    fn apply(&mut self, commands: Vec<Command>) {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        self.events.extend(events);
    }

    /// Feeds pending events to the walker and applies whatever it proposes.
    fn tick(&mut self) {
        let events = std::mem::take(&mut self.events);
        let mut commands = Vec::new();
        self.walker.handle(&events, true, &mut commands);
        self.apply(commands);
    }

    fn walk_out(&mut self) {
        for _ in 0..64 {
            if !self.walker.is_walking() {
                return;
            }
            self.tick();
        }
        panic!("walker never finished its route");
    }

    fn route_to(&self, goal: CellCoord) -> gridpath_core::Route {
        let start = query::agent(&self.world).expect("agent placed");
        let (route, _) = Pathfinder::default()
            .find_path(query::grid(&self.world), start, goal)
            .expect("endpoints on grid")
            .into_parts();
        route
    }
}

#[test]
fn walks_the_agent_to_the_goal() {
    let mut harness = Harness::new(CellCoord::new(-3, -3));
    harness.tick();
    let goal = CellCoord::new(2, 3);

    let route = harness.route_to(goal);
    assert_eq!(route.len(), 11);
    harness.walker.assign(route).expect("walker idle");
    harness.walk_out();

    assert_eq!(query::agent(&harness.world), Some(goal));
    assert!(!harness.walker.needs_replan());
}

#[test]
fn stale_route_is_caught_at_the_blocked_step() {
    let mut harness = Harness::new(CellCoord::new(0, -3));
    harness.tick();
    let goal = CellCoord::new(0, 3);
    let route = harness.route_to(goal);
    assert!(route.contains(CellCoord::new(0, 0)));

    harness.apply(vec![
        Command::SetPlayMode {
            mode: PlayMode::Edit,
        },
        Command::PaintTerrain {
            cell: CellCoord::new(0, 0),
            kind: TerrainKind::Wall,
        },
        Command::SetPlayMode {
            mode: PlayMode::Explore,
        },
    ]);
    harness.tick();
    harness.walker.assign(route).expect("walker idle");
    harness.walk_out();

    assert_eq!(query::agent(&harness.world), Some(CellCoord::new(0, -1)));
    assert!(harness.walker.needs_replan());

    let detour = harness.route_to(goal);
    assert!(!detour.contains(CellCoord::new(0, 0)));
    harness.walker.assign(detour).expect("walker idle after replan");
    harness.walk_out();

    assert_eq!(query::agent(&harness.world), Some(goal));
    assert!(!harness.walker.needs_replan());
}

#[test]
fn queries_are_refused_mid_walk() {
    let mut harness = Harness::new(CellCoord::new(-3, 0));
    harness.tick();
    let route = harness.route_to(CellCoord::new(3, 0));
    harness.walker.assign(route).expect("walker idle");
    harness.tick();

    let again = harness.route_to(CellCoord::new(-3, 3));
    assert_eq!(
        harness.walker.assign(again),
        Err(AssignRejection::StillWalking)
    );

    harness.walk_out();
    assert_eq!(query::agent(&harness.world), Some(CellCoord::new(3, 0)));
}
