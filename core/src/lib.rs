#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the gridpath engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired edits, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems read immutable grid state and respond exclusively with
//! new command batches.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod terrain;

pub use terrain::{TerrainCatalog, TerrainCosts, TerrainKind, TerrainProfile};

/// Seed used for terrain generation when the configuration does not name one.
pub const DEFAULT_TERRAIN_SEED: u64 = 0x5eed_9a7d_1c3b_4e21;

/// Largest half-extent accepted along either grid axis.
pub const MAX_HALF_EXTENT: u32 = 1 << 15;

/// Largest number of cells a grid may hold.
pub const MAX_GRID_CELLS: u64 = 1 << 22;

/// Describes the active interaction mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayMode {
    /// Path queries are issued and the agent walks the resulting routes.
    Explore,
    /// Terrain painting and agent placement are permitted.
    Edit,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Rebuilds the grid from scratch and reseeds its terrain.
    ConfigureGrid {
        /// Dimensions, seeding rules and terrain costs for the new grid.
        config: GridConfig,
    },
    /// Requests that the world transition to the provided play mode.
    SetPlayMode {
        /// Mode the world should activate.
        mode: PlayMode,
    },
    /// Overwrites the terrain of a single cell.
    PaintTerrain {
        /// Cell receiving the new terrain.
        cell: CellCoord,
        /// Terrain painted onto the cell.
        kind: TerrainKind,
    },
    /// Overwrites the terrain of every cell.
    ResetTerrain {
        /// Terrain applied to the whole board.
        kind: TerrainKind,
    },
    /// Moves the agent marker to the provided cell.
    PlaceAgent {
        /// Destination of the marker.
        cell: CellCoord,
    },
    /// Advances the agent a single step along its route.
    StepAgent {
        /// Cell the agent attempts to enter.
        to: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a fresh grid was built and seeded.
    GridConfigured {
        /// Extent of the new grid.
        extent: GridExtent,
        /// Number of cells converted to walls by seeding.
        walls: usize,
        /// Number of cells converted to water by seeding.
        water: usize,
        /// Cell chosen for the agent, absent when no cell is passable.
        agent: Option<CellCoord>,
    },
    /// Reports that a grid configuration could not be applied.
    ConfigurationRejected {
        /// Reason the configuration was refused.
        reason: GridError,
    },
    /// Announces that the world entered a new play mode.
    PlayModeChanged {
        /// Mode that became active.
        mode: PlayMode,
    },
    /// Confirms that a cell changed terrain.
    TerrainPainted {
        /// Cell whose terrain changed.
        cell: CellCoord,
        /// Terrain the cell held before the edit.
        from: TerrainKind,
        /// Terrain the cell holds after the edit.
        to: TerrainKind,
    },
    /// Confirms that every cell now holds the same terrain.
    TerrainReset {
        /// Terrain applied to the board.
        kind: TerrainKind,
    },
    /// Reports that a paint or reset request was refused.
    EditRejected {
        /// Cell targeted by the request, absent for whole-board resets.
        cell: Option<CellCoord>,
        /// Terrain requested for the cell.
        kind: TerrainKind,
        /// Specific reason the edit failed.
        reason: EditRejection,
    },
    /// Confirms that the agent marker moved to a new cell.
    AgentPlaced {
        /// Cell now holding the agent.
        cell: CellCoord,
    },
    /// Reports that an agent placement request was refused.
    AgentPlacementRejected {
        /// Cell targeted by the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: EditRejection,
    },
    /// Confirms that the agent advanced a single step.
    AgentStepped {
        /// Cell the agent occupied before the step.
        from: CellCoord,
        /// Cell the agent occupies after the step.
        to: CellCoord,
    },
    /// Reports that the agent could not take the requested step.
    AgentStepRejected {
        /// Cell the agent attempted to enter.
        to: CellCoord,
        /// Specific reason the step failed.
        reason: StepRejection,
    },
}

/// Reasons an edit or agent placement may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditRejection {
    /// The world is not in edit mode.
    InvalidMode,
    /// The target cell is not part of the grid.
    OutOfBounds,
    /// The requested terrain has no profile in the catalog.
    UnregisteredTerrain,
    /// The agent cannot stand on an impassable cell.
    Impassable,
}

/// Reasons an agent step may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepRejection {
    /// No agent is present on the grid.
    NoAgent,
    /// The target cell is not part of the grid.
    OutOfBounds,
    /// The target cell is not one step away from the agent.
    NotAdjacent,
    /// The target cell cannot be entered in its current state.
    Impassable,
    /// The diagonal step would squeeze past an impassable orthogonal cell.
    CutsCorner,
}

/// Failures raised by grid construction, lookups and terrain edits.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The coordinate does not address a cell of the grid.
    #[error("cell {cell} lies outside the grid")]
    OutOfBounds {
        /// Coordinate that was looked up.
        cell: CellCoord,
    },
    /// A terrain name did not match any known kind.
    #[error("unknown terrain kind `{name}`")]
    InvalidTerrainKind {
        /// Name that failed to parse.
        name: String,
    },
    /// The terrain kind is known but the catalog carries no profile for it.
    #[error("terrain kind `{kind}` is not registered in the catalog")]
    UnregisteredTerrain {
        /// Kind missing from the catalog.
        kind: TerrainKind,
    },
    /// A passable terrain kind was configured with a zero movement cost.
    #[error("passable terrain `{kind}` needs a positive movement cost")]
    ZeroCost {
        /// Kind carrying the invalid cost.
        kind: TerrainKind,
    },
    /// The requested half-extent or total cell count is too large.
    #[error("grid half-extent {half_width}x{half_height} exceeds the supported maximum")]
    InvalidDimensions {
        /// Requested half-width.
        half_width: u32,
        /// Requested half-height.
        half_height: u32,
    },
    /// The cell pitch was zero.
    #[error("cell pitch must be positive")]
    InvalidPitch,
}

/// Location of a single grid cell expressed in world-aligned integer units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate displaced by the provided offsets, if representable.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Computes the Chebyshev distance between two coordinates.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Rectangular lattice `[-half_width, +half_width] × [-half_height, +half_height]`
/// stepped by the cell pitch.
///
/// Only coordinates that sit on the lattice address a cell; everything else is
/// out of bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridExtent {
    half_width: u32,
    half_height: u32,
    pitch: u32,
}

impl GridExtent {
    /// Validates and creates a new extent.
    pub fn new(half_width: u32, half_height: u32, pitch: u32) -> Result<Self, GridError> {
        if pitch == 0 {
            return Err(GridError::InvalidPitch);
        }
        let invalid = GridError::InvalidDimensions {
            half_width,
            half_height,
        };
        if half_width > MAX_HALF_EXTENT || half_height > MAX_HALF_EXTENT {
            return Err(invalid);
        }
        let extent = Self {
            half_width,
            half_height,
            pitch,
        };
        if u64::from(extent.columns()) * u64::from(extent.rows()) > MAX_GRID_CELLS {
            return Err(invalid);
        }
        Ok(extent)
    }

    /// Half-width of the lattice in world units.
    #[must_use]
    pub const fn half_width(&self) -> u32 {
        self.half_width
    }

    /// Half-height of the lattice in world units.
    #[must_use]
    pub const fn half_height(&self) -> u32 {
        self.half_height
    }

    /// Distance between adjacent cells in world units.
    #[must_use]
    pub const fn pitch(&self) -> u32 {
        self.pitch
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.half_width * 2 / self.pitch + 1
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.half_height * 2 / self.pitch + 1
    }

    /// Total number of cells on the lattice.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let columns = usize::try_from(self.columns()).unwrap_or(0);
        let rows = usize::try_from(self.rows()).unwrap_or(0);
        columns.saturating_mul(rows)
    }

    /// Reports whether `cell` addresses a cell of the lattice.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.column_of(cell).is_some() && self.row_of(cell).is_some()
    }

    /// Dense row-major index of `cell`, if it lies on the lattice.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = usize::try_from(self.column_of(cell)?).ok()?;
        let row = usize::try_from(self.row_of(cell)?).ok()?;
        let width = usize::try_from(self.columns()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Coordinate stored at the provided dense index.
    #[must_use]
    pub fn coord_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cell_count() {
            return None;
        }
        let width = usize::try_from(self.columns()).ok()?;
        let column = i64::try_from(index % width).ok()?;
        let row = i64::try_from(index / width).ok()?;
        let pitch = i64::from(self.pitch);
        let x = column * pitch - i64::from(self.half_width);
        let y = row * pitch - i64::from(self.half_height);
        Some(CellCoord::new(i32::try_from(x).ok()?, i32::try_from(y).ok()?))
    }

    /// Iterates every coordinate of the lattice in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.cell_count()).filter_map(move |index| self.coord_at(index))
    }

    /// Horizontal and vertical separation between two cells measured in steps.
    #[must_use]
    pub fn steps_between(&self, from: CellCoord, to: CellCoord) -> (u32, u32) {
        (
            from.x().abs_diff(to.x()) / self.pitch,
            from.y().abs_diff(to.y()) / self.pitch,
        )
    }

    fn column_of(&self, cell: CellCoord) -> Option<u32> {
        lattice_index(cell.x(), self.half_width, self.pitch)
    }

    fn row_of(&self, cell: CellCoord) -> Option<u32> {
        lattice_index(cell.y(), self.half_height, self.pitch)
    }
}

fn lattice_index(value: i32, half: u32, pitch: u32) -> Option<u32> {
    let shifted = i64::from(value) + i64::from(half);
    if shifted < 0 || shifted > i64::from(half) * 2 {
        return None;
    }
    let pitch = i64::from(pitch);
    if shifted % pitch != 0 {
        return None;
    }
    u32::try_from(shifted / pitch).ok()
}

/// Everything required to build and seed a grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Half-width of the grid; columns span `-width..=width`.
    pub width: u32,
    /// Half-height of the grid; rows span `-height..=height`.
    pub height: u32,
    /// Distance between adjacent cells.
    pub pitch: u32,
    /// Share of all cells converted to walls, in percent.
    pub wall_percent: f32,
    /// Share of the remaining passable cells converted to water, in percent.
    pub water_percent: f32,
    /// Seed for the terrain generator.
    pub seed: u64,
    /// Entry costs for the passable terrain kinds.
    pub terrain_costs: TerrainCosts,
}

impl GridConfig {
    /// Validates the configured dimensions and returns the resulting extent.
    pub fn extent(&self) -> Result<GridExtent, GridError> {
        GridExtent::new(self.width, self.height, self.pitch)
    }

    /// Builds the terrain catalog described by the configured costs.
    pub fn catalog(&self) -> Result<TerrainCatalog, GridError> {
        TerrainCatalog::from_costs(&self.terrain_costs)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            pitch: 1,
            wall_percent: 20.0,
            water_percent: 10.0,
            seed: DEFAULT_TERRAIN_SEED,
            terrain_costs: TerrainCosts::default(),
        }
    }
}

/// Ordered cells leading from (but excluding) the start to (and including) the goal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    cells: Vec<CellCoord>,
}

impl Route {
    /// Wraps an ordered list of steps.
    #[must_use]
    pub fn new(cells: Vec<CellCoord>) -> Self {
        Self { cells }
    }

    /// Route with no steps, used when nothing needs traversing.
    #[must_use]
    pub const fn empty() -> Self {
        Self { cells: Vec::new() }
    }

    /// Steps of the route in travel order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the route has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Final cell of the route.
    #[must_use]
    pub fn goal(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Reports whether the route passes through `cell`.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Consumes the route, yielding its steps.
    #[must_use]
    pub fn into_vec(self) -> Vec<CellCoord> {
        self.cells
    }
}
