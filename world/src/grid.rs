//! Dense cell storage backing the world.

use gridpath_core::{
    CellCoord, GridConfig, GridError, GridExtent, TerrainCatalog, TerrainKind, TerrainProfile,
};
use rand::Rng;

use crate::seeding::{self, SeedReport, SeedRules};

const CARDINAL_OFFSETS: [(i32, i32); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];
const DIAGONAL_OFFSETS: [(i32, i32); 4] = [(-1, 1), (1, 1), (-1, -1), (1, -1)];

/// A single grid cell together with the profile derived from its terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    coord: CellCoord,
    terrain: TerrainKind,
    profile: TerrainProfile,
}

impl Cell {
    /// Coordinate identifying the cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Terrain currently painted onto the cell.
    #[must_use]
    pub const fn terrain(&self) -> TerrainKind {
        self.terrain
    }

    /// Reports whether the cell may be entered.
    #[must_use]
    pub const fn is_passable(&self) -> bool {
        self.profile.is_passable()
    }

    /// Cost charged for entering the cell.
    #[must_use]
    pub const fn movement_cost(&self) -> u32 {
        self.profile.movement_cost()
    }
}

/// Fixed rectangular set of cells keyed by coordinate.
///
/// Cells are created once, all at once, and only their terrain changes
/// afterwards. Every lookup validates the coordinate against the extent and
/// fails with [`GridError::OutOfBounds`] instead of growing the grid.
#[derive(Clone, Debug)]
pub struct Grid {
    extent: GridExtent,
    catalog: TerrainCatalog,
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid covering `extent` with every cell set to floor.
    pub fn new(extent: GridExtent, catalog: TerrainCatalog) -> Result<Self, GridError> {
        let profile = catalog.profile(TerrainKind::Floor)?;
        let cells = extent
            .coords()
            .map(|coord| Cell {
                coord,
                terrain: TerrainKind::Floor,
                profile,
            })
            .collect();
        Ok(Self {
            extent,
            catalog,
            cells,
        })
    }

    /// Builds a floor grid from `config` and applies its seeding rules.
    pub fn initialize<R>(config: &GridConfig, rng: &mut R) -> Result<(Self, SeedReport), GridError>
    where
        R: Rng + ?Sized,
    {
        let mut grid = Self::new(config.extent()?, config.catalog()?)?;
        let report = seeding::seed_terrain(&mut grid, &SeedRules::from(config), rng)?;
        Ok((grid, report))
    }

    /// Extent covered by the grid.
    #[must_use]
    pub const fn extent(&self) -> &GridExtent {
        &self.extent
    }

    /// Catalog used to derive cell profiles.
    #[must_use]
    pub const fn catalog(&self) -> &TerrainCatalog {
        &self.catalog
    }

    /// Reports whether `coord` addresses a cell of the grid.
    #[must_use]
    pub fn contains(&self, coord: CellCoord) -> bool {
        self.extent.contains(coord)
    }

    /// Looks up the cell stored at `coord`.
    pub fn cell_at(&self, coord: CellCoord) -> Result<&Cell, GridError> {
        self.extent
            .index(coord)
            .and_then(|index| self.cells.get(index))
            .ok_or(GridError::OutOfBounds { cell: coord })
    }

    /// Reports whether the cell at `coord` may be entered.
    pub fn is_passable(&self, coord: CellCoord) -> Result<bool, GridError> {
        self.cell_at(coord).map(Cell::is_passable)
    }

    /// Axis-aligned neighbours of `coord` that exist in the grid, in
    /// up, down, left, right order.
    ///
    /// Passability is not considered here; the caller decides which
    /// neighbours may be entered.
    pub fn neighbors_of(&self, coord: CellCoord) -> Result<Vec<CellCoord>, GridError> {
        self.offset_neighbors(coord, &CARDINAL_OFFSETS)
    }

    /// Diagonal neighbours of `coord` that exist in the grid.
    pub fn diagonal_neighbors_of(&self, coord: CellCoord) -> Result<Vec<CellCoord>, GridError> {
        self.offset_neighbors(coord, &DIAGONAL_OFFSETS)
    }

    /// Overwrites the terrain at `coord`, returning the terrain it replaced.
    pub fn set_terrain(
        &mut self,
        coord: CellCoord,
        kind: TerrainKind,
    ) -> Result<TerrainKind, GridError> {
        let profile = self.catalog.profile(kind)?;
        let index = self
            .extent
            .index(coord)
            .ok_or(GridError::OutOfBounds { cell: coord })?;
        let cell = self
            .cells
            .get_mut(index)
            .ok_or(GridError::OutOfBounds { cell: coord })?;
        let previous = cell.terrain;
        cell.terrain = kind;
        cell.profile = profile;
        Ok(previous)
    }

    /// Overwrites the terrain of every cell.
    pub fn reset_all(&mut self, kind: TerrainKind) -> Result<(), GridError> {
        let profile = self.catalog.profile(kind)?;
        for cell in &mut self.cells {
            cell.terrain = kind;
            cell.profile = profile;
        }
        Ok(())
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Number of cells currently holding `kind`.
    #[must_use]
    pub fn count(&self, kind: TerrainKind) -> usize {
        self.cells.iter().filter(|cell| cell.terrain == kind).count()
    }

    fn offset_neighbors(
        &self,
        coord: CellCoord,
        offsets: &[(i32, i32)],
    ) -> Result<Vec<CellCoord>, GridError> {
        if !self.contains(coord) {
            return Err(GridError::OutOfBounds { cell: coord });
        }

        let Ok(pitch) = i32::try_from(self.extent.pitch()) else {
            return Ok(Vec::new());
        };

        Ok(offsets
            .iter()
            .filter_map(|&(dx, dy)| coord.offset(dx * pitch, dy * pitch))
            .filter(|neighbor| self.contains(*neighbor))
            .collect())
    }
}
