#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid state for gridpath.
//!
//! The world owns the [`Grid`], the agent marker and the active play mode.
//! It only changes through [`apply`], which reports every outcome, including
//! refusals, as [`Event`] values.

use gridpath_core::{
    CellCoord, Command, EditRejection, Event, GridConfig, GridError, PlayMode, StepRejection,
    TerrainKind,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

mod grid;
pub mod seeding;

pub use grid::{Cell, Grid};
pub use seeding::{SeedReport, SeedRules};

/// Represents the authoritative gridpath world state.
#[derive(Debug)]
pub struct World {
    config: GridConfig,
    grid: Grid,
    agent: Option<CellCoord>,
    play_mode: PlayMode,
}

impl World {
    /// Builds and seeds a world from the provided configuration.
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        let built = build(&config)?;
        Ok(Self {
            config,
            grid: built.grid,
            agent: built.agent,
            play_mode: PlayMode::Explore,
        })
    }

    /// Wraps an already constructed grid without seeding or placing an agent.
    #[must_use]
    pub fn from_grid(grid: Grid) -> Self {
        let extent = grid.extent();
        let config = GridConfig {
            width: extent.half_width(),
            height: extent.half_height(),
            pitch: extent.pitch(),
            wall_percent: 0.0,
            water_percent: 0.0,
            ..GridConfig::default()
        };
        Self {
            config,
            grid,
            agent: None,
            play_mode: PlayMode::Explore,
        }
    }

    fn paint(&mut self, cell: CellCoord, kind: TerrainKind, out_events: &mut Vec<Event>) {
        if self.play_mode != PlayMode::Edit {
            reject_edit(Some(cell), kind, EditRejection::InvalidMode, out_events);
            return;
        }

        match self.grid.set_terrain(cell, kind) {
            Ok(previous) if previous == kind => {}
            Ok(previous) => {
                tracing::debug!(%cell, from = %previous, to = %kind, "painted terrain");
                out_events.push(Event::TerrainPainted {
                    cell,
                    from: previous,
                    to: kind,
                });
            }
            Err(error) => reject_edit(Some(cell), kind, edit_rejection(&error), out_events),
        }
    }

    fn reset(&mut self, kind: TerrainKind, out_events: &mut Vec<Event>) {
        if self.play_mode != PlayMode::Edit {
            reject_edit(None, kind, EditRejection::InvalidMode, out_events);
            return;
        }

        match self.grid.reset_all(kind) {
            Ok(()) => {
                tracing::debug!(%kind, "reset terrain");
                out_events.push(Event::TerrainReset { kind });
            }
            Err(error) => reject_edit(None, kind, edit_rejection(&error), out_events),
        }
    }

    fn place_agent(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let rejection = if self.play_mode != PlayMode::Edit {
            Some(EditRejection::InvalidMode)
        } else {
            match self.grid.is_passable(cell) {
                Ok(true) => None,
                Ok(false) => Some(EditRejection::Impassable),
                Err(error) => Some(edit_rejection(&error)),
            }
        };

        if let Some(reason) = rejection {
            tracing::debug!(%cell, ?reason, "agent placement rejected");
            out_events.push(Event::AgentPlacementRejected { cell, reason });
            return;
        }

        self.agent = Some(cell);
        out_events.push(Event::AgentPlaced { cell });
    }

    fn step_agent(&mut self, to: CellCoord, out_events: &mut Vec<Event>) {
        match self.check_step(to) {
            Ok(from) => {
                self.agent = Some(to);
                out_events.push(Event::AgentStepped { from, to });
            }
            Err(reason) => {
                tracing::debug!(%to, ?reason, "agent step rejected");
                out_events.push(Event::AgentStepRejected { to, reason });
            }
        }
    }

    /// Revalidates a single step against the grid as it is right now.
    ///
    /// Diagonal steps need both orthogonal cells they pass to be open.
    fn check_step(&self, to: CellCoord) -> Result<CellCoord, StepRejection> {
        let from = self.agent.ok_or(StepRejection::NoAgent)?;
        let cell = self
            .grid
            .cell_at(to)
            .map_err(|_| StepRejection::OutOfBounds)?;
        if from.chebyshev_distance(to) != self.grid.extent().pitch() {
            return Err(StepRejection::NotAdjacent);
        }
        if !cell.is_passable() {
            return Err(StepRejection::Impassable);
        }
        if from.x() != to.x() && from.y() != to.y() {
            let corners = [
                CellCoord::new(to.x(), from.y()),
                CellCoord::new(from.x(), to.y()),
            ];
            if !corners
                .into_iter()
                .all(|corner| self.grid.is_passable(corner).unwrap_or(false))
            {
                return Err(StepRejection::CutsCorner);
            }
        }
        Ok(from)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { config } => match build(&config) {
            Ok(built) => {
                out_events.push(Event::GridConfigured {
                    extent: *built.grid.extent(),
                    walls: built.report.walls.len(),
                    water: built.report.water.len(),
                    agent: built.agent,
                });
                world.config = config;
                world.grid = built.grid;
                world.agent = built.agent;
            }
            Err(reason) => {
                tracing::warn!(%reason, "grid configuration rejected");
                out_events.push(Event::ConfigurationRejected { reason });
            }
        },
        Command::SetPlayMode { mode } => {
            if world.play_mode != mode {
                world.play_mode = mode;
                out_events.push(Event::PlayModeChanged { mode });
            }
        }
        Command::PaintTerrain { cell, kind } => world.paint(cell, kind, out_events),
        Command::ResetTerrain { kind } => world.reset(kind, out_events),
        Command::PlaceAgent { cell } => world.place_agent(cell, out_events),
        Command::StepAgent { to } => world.step_agent(to, out_events),
    }
}

struct BuiltGrid {
    grid: Grid,
    report: SeedReport,
    agent: Option<CellCoord>,
}

fn build(config: &GridConfig) -> Result<BuiltGrid, GridError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let (grid, report) = Grid::initialize(config, &mut rng)?;
    let agent = seeding::choose_spawn(&grid, &mut rng);
    Ok(BuiltGrid {
        grid,
        report,
        agent,
    })
}

fn reject_edit(
    cell: Option<CellCoord>,
    kind: TerrainKind,
    reason: EditRejection,
    out_events: &mut Vec<Event>,
) {
    tracing::debug!(?cell, %kind, ?reason, "edit rejected");
    out_events.push(Event::EditRejected { cell, kind, reason });
}

fn edit_rejection(error: &GridError) -> EditRejection {
    match error {
        GridError::UnregisteredTerrain { .. } => EditRejection::UnregisteredTerrain,
        _ => EditRejection::OutOfBounds,
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use gridpath_core::{CellCoord, GridConfig, GridError, PlayMode, TerrainKind};

    use super::{Grid, World};

    /// Provides read-only access to the grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Configuration the current grid was built from.
    #[must_use]
    pub fn config(world: &World) -> &GridConfig {
        &world.config
    }

    /// Cell currently holding the agent marker, if any.
    #[must_use]
    pub fn agent(world: &World) -> Option<CellCoord> {
        world.agent
    }

    /// Mode the world is currently in.
    #[must_use]
    pub fn play_mode(world: &World) -> PlayMode {
        world.play_mode
    }

    /// Terrain painted at `cell`.
    pub fn terrain_at(world: &World, cell: CellCoord) -> Result<TerrainKind, GridError> {
        world.grid.cell_at(cell).map(|cell| cell.terrain())
    }

    /// Reports whether `cell` lies on the grid.
    #[must_use]
    pub fn contains(world: &World, cell: CellCoord) -> bool {
        world.grid.contains(cell)
    }
}
