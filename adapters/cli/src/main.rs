#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that seeds a grid, applies edits and renders path queries.

mod config;
mod render;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use gridpath_core::{CellCoord, Command, Event, PlayMode, Route, TerrainKind};
use gridpath_system_editor::{Brush, Editor, EditorInput};
use gridpath_system_pathfinding::{MovementModel, Pathfinder};
use gridpath_system_walker::Walker;
use gridpath_world::{self as world, query, World};
use tracing_subscriber::EnvFilter;

use crate::config::{GridOverrides, PaintEdit};
use crate::render::Overlay;

/// Seeds a terrain grid, applies edits and shows a weighted A* route.
#[derive(Parser, Debug)]
#[command(name = "gridpath", version)]
struct Args {
    /// TOML file with `[grid]` settings and `[[paint]]` edits
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: GridOverrides,

    /// Clear the seeded board back to floor before painting
    #[arg(long)]
    reset: bool,

    /// Terrain edit applied after seeding, as `x,y=kind`; may be repeated
    #[arg(long = "paint", value_name = "X,Y=KIND", value_parser = config::parse_paint)]
    paints: Vec<PaintEdit>,

    /// Move the agent marker to this cell before querying
    #[arg(long, value_name = "X,Y", value_parser = config::parse_cell)]
    agent: Option<CellCoord>,

    /// Query start; defaults to the agent marker
    #[arg(long, value_name = "X,Y", value_parser = config::parse_cell)]
    from: Option<CellCoord>,

    /// Query goal; the board is only printed when omitted
    #[arg(long, value_name = "X,Y", value_parser = config::parse_cell)]
    to: Option<CellCoord>,

    /// Neighbour set and matching heuristic used by the search
    #[arg(long, value_enum, default_value_t = Model::Cardinal)]
    model: Model,

    /// Walk the agent along the route once it has been found
    #[arg(long)]
    walk: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Model {
    /// Four neighbours with the Manhattan-weighted heuristic
    Cardinal,
    /// Eight neighbours with the octile heuristic
    Octile,
}

impl From<Model> for MovementModel {
    fn from(model: Model) -> Self {
        match model {
            Model::Cardinal => MovementModel::Cardinal,
            Model::Octile => MovementModel::Octile,
        }
    }
}

/// Entry point for the gridpath command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let file = config::load(args.config.as_deref())?;
    let mut grid_config = file.grid;
    args.overrides.apply(&mut grid_config);

    let mut world = World::new(grid_config).context("invalid grid configuration")?;
    let grid = query::grid(&world);
    tracing::info!(
        columns = grid.extent().columns(),
        rows = grid.extent().rows(),
        walls = grid.count(TerrainKind::Wall),
        water = grid.count(TerrainKind::Water),
        agent = ?query::agent(&world),
        "grid seeded"
    );

    let mut edits = file.paint;
    edits.extend(args.paints.iter().copied());
    edit(&mut world, args.reset, &edits, args.agent);

    let Some(goal) = args.to else {
        print!(
            "{}",
            render::render(
                query::grid(&world),
                &Overlay {
                    agent: query::agent(&world),
                    ..Overlay::default()
                },
            )
        );
        return Ok(());
    };

    let agent = query::agent(&world);
    let Some(start) = args.from.or(agent) else {
        bail!("no agent on the grid; pass --from or --agent to choose a start");
    };
    if args.walk && Some(start) != agent {
        bail!("--walk starts from the agent marker; use --agent instead of --from");
    }

    let pathfinder = Pathfinder::new(args.model.into());
    let outcome = pathfinder
        .find_path(query::grid(&world), start, goal)
        .with_context(|| format!("cannot query a path from {start} to {goal}"))?;

    print!(
        "{}",
        render::render(
            query::grid(&world),
            &Overlay {
                agent: None,
                query: Some((start, goal)),
                outcome: Some(&outcome),
            },
        )
    );
    match outcome.cost() {
        Some(cost) => println!(
            "route {start} -> {goal}: {} steps, cost {cost}, {} cells expanded",
            outcome.route().len(),
            outcome.trace().expanded().len()
        ),
        None => println!(
            "no route {start} -> {goal}: {} cells expanded",
            outcome.trace().expanded().len()
        ),
    }

    if args.walk && outcome.found() {
        let (route, _) = outcome.into_parts();
        walk(&mut world, route)?;
        println!(
            "agent now at {}",
            query::agent(&world).map_or_else(|| "nowhere".to_owned(), |cell| cell.to_string())
        );
    }
    Ok(())
}

/// Routes the requested edits through the editor system while in Edit mode.
fn edit(world: &mut World, reset: bool, edits: &[PaintEdit], agent: Option<CellCoord>) {
    if !reset && edits.is_empty() && agent.is_none() {
        return;
    }

    let mut editor = Editor::new();
    let mut events = Vec::new();
    let mut commands = Vec::new();
    world::apply(
        world,
        Command::SetPlayMode {
            mode: PlayMode::Edit,
        },
        &mut events,
    );

    let strokes = edits
        .iter()
        .map(|edit| (Brush::Terrain(edit.kind), edit.cell))
        .chain(agent.map(|cell| (Brush::Agent, cell)));
    let mut inputs = Vec::new();
    if reset {
        inputs.push((editor.brush(), EditorInput::new(false, true, None)));
    }
    inputs.extend(strokes.map(|(brush, cell)| (brush, EditorInput::new(true, false, Some(cell)))));

    for (brush, input) in inputs {
        if let Some(cell) = input.cursor_cell.filter(|&cell| !query::contains(world, cell)) {
            tracing::warn!(%cell, "edit target lies outside the grid");
        }
        editor.set_brush(brush);
        let view: &World = world;
        editor.handle(
            &events,
            input,
            |cell| query::contains(view, cell),
            &mut commands,
        );
        events.clear();
        for command in commands.drain(..) {
            world::apply(world, command, &mut events);
        }
        report(&events);
    }

    world::apply(
        world,
        Command::SetPlayMode {
            mode: PlayMode::Explore,
        },
        &mut events,
    );
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::EditRejected { cell, kind, reason } => {
                tracing::warn!(?cell, %kind, ?reason, "terrain edit rejected");
            }
            Event::AgentPlacementRejected { cell, reason } => {
                tracing::warn!(%cell, ?reason, "agent placement rejected");
            }
            _ => {}
        }
    }
}

/// Steps the agent along `route` until it arrives or a step is refused.
fn walk(world: &mut World, route: Route) -> Result<()> {
    let mut walker = Walker::new();
    walker
        .assign(route)
        .map_err(|reason| anyhow!("walker refused the route: {reason:?}"))?;

    let mut events = Vec::new();
    let mut commands = Vec::new();
    while walker.is_walking() {
        walker.handle(&events, true, &mut commands);
        events.clear();
        for command in commands.drain(..) {
            world::apply(world, command, &mut events);
        }
    }

    if walker.needs_replan() {
        tracing::warn!("route went stale before the agent arrived");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("gridpath").chain(flags.iter().copied()))
            .expect("flags parse")
    }

    fn open_world() -> World {
        let config = gridpath_core::GridConfig {
            width: 2,
            height: 2,
            wall_percent: 0.0,
            water_percent: 0.0,
            ..gridpath_core::GridConfig::default()
        };
        World::new(config).expect("valid configuration")
    }

    #[test]
    fn flags_parse_into_overrides_edits_and_query() {
        let args = args(&[
            "--width", "3", "--paint", "0,1=wall", "--paint", "1,1=water", "--to", "2,2",
            "--model", "octile",
        ]);

        assert_eq!(args.overrides.width, Some(3));
        assert_eq!(args.overrides.height, None);
        assert_eq!(args.paints.len(), 2);
        assert_eq!(args.to, Some(CellCoord::new(2, 2)));
        assert_eq!(args.model, Model::Octile);
        assert!(Args::try_parse_from(["gridpath", "--paint", "0,1"]).is_err());
    }

    #[test]
    fn edits_are_applied_through_the_editor() {
        let mut world = open_world();
        let edits = [
            PaintEdit {
                cell: CellCoord::new(0, 0),
                kind: TerrainKind::Wall,
            },
            PaintEdit {
                cell: CellCoord::new(7, 7),
                kind: TerrainKind::Water,
            },
        ];

        edit(&mut world, true, &edits, Some(CellCoord::new(1, 1)));

        assert_eq!(
            query::terrain_at(&world, CellCoord::new(0, 0)),
            Ok(TerrainKind::Wall)
        );
        assert_eq!(query::grid(&world).count(TerrainKind::Water), 0);
        assert_eq!(query::agent(&world), Some(CellCoord::new(1, 1)));
        assert_eq!(query::play_mode(&world), PlayMode::Explore);
    }

    #[test]
    fn walking_moves_the_agent_to_the_goal() {
        let mut world = open_world();
        edit(&mut world, false, &[], Some(CellCoord::new(-2, -2)));
        let (route, _) = Pathfinder::default()
            .find_path(query::grid(&world), CellCoord::new(-2, -2), CellCoord::new(2, 1))
            .expect("endpoints on grid")
            .into_parts();

        walk(&mut world, route).expect("walker idle");

        assert_eq!(query::agent(&world), Some(CellCoord::new(2, 1)));
    }

    #[test]
    fn run_reports_bad_input() {
        let open = ["--walls", "0", "--width", "2", "--height", "2"];
        let with = |extra: &[&str]| args(&[&open[..], extra].concat());

        assert!(run(with(&["--agent", "0,0", "--to", "2,2", "--walk"])).is_ok());
        assert!(run(with(&["--pitch", "0"])).is_err());
        assert!(run(args(&["--width", "32768", "--height", "32768"])).is_err());
        assert!(run(with(&["--to", "9,9"])).is_err());
        assert!(run(with(&["--agent", "1,1", "--from", "0,0", "--to", "2,2", "--walk"])).is_err());
    }
}
