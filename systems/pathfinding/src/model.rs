//! Neighbour expansion paired with the heuristic that matches it.

use gridpath_core::{CellCoord, GridError, GridExtent};
use gridpath_world::{Cell, Grid};

const ORTHOGONAL_STEP: u32 = 10;
const DIAGONAL_STEP: u32 = 14;

/// Movement rules used by the pathfinder.
///
/// Each variant fixes both the neighbour set and the heuristic so the two can
/// never disagree about which moves exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MovementModel {
    /// Four-directional movement scored with the Manhattan-weighted heuristic.
    ///
    /// The heuristic multiplies the Manhattan step count by the entry cost of
    /// the cell being scored. It is a coarse estimate that can overshoot when
    /// that cell is expensive, so routes are low-cost rather than guaranteed
    /// optimal on mixed terrain.
    #[default]
    Cardinal,
    /// Eight-directional movement scored with the octile heuristic.
    ///
    /// Diagonal entries cost `14 / 10` of the entered cell's cost and may not
    /// cut past an impassable orthogonal neighbour. The heuristic is
    /// unweighted (`10` per straight step, `14` per diagonal step), which
    /// stays admissible while every passable cost is at least `10`.
    Octile,
}

impl MovementModel {
    /// Cells reachable from `coord` in one move, before passability of the
    /// target itself is checked.
    pub fn neighbors(self, grid: &Grid, coord: CellCoord) -> Result<Vec<CellCoord>, GridError> {
        let mut neighbors = grid.neighbors_of(coord)?;
        if self == Self::Cardinal {
            return Ok(neighbors);
        }

        for diagonal in grid.diagonal_neighbors_of(coord)? {
            let horizontal = CellCoord::new(diagonal.x(), coord.y());
            let vertical = CellCoord::new(coord.x(), diagonal.y());
            if open(grid, horizontal) && open(grid, vertical) {
                neighbors.push(diagonal);
            }
        }
        Ok(neighbors)
    }

    /// Cost charged for moving from `from` into `entered`.
    ///
    /// The cost always comes from the entered cell's own terrain.
    #[must_use]
    pub fn step_cost(self, from: CellCoord, entered: &Cell) -> u32 {
        let base = entered.movement_cost();
        let to = entered.coord();
        if self == Self::Octile && from.x() != to.x() && from.y() != to.y() {
            base.saturating_mul(DIAGONAL_STEP) / ORTHOGONAL_STEP
        } else {
            base
        }
    }

    /// Estimated remaining cost from `cell` to `goal`.
    #[must_use]
    pub fn heuristic(self, extent: &GridExtent, cell: &Cell, goal: CellCoord) -> u32 {
        let (dx, dy) = extent.steps_between(cell.coord(), goal);
        match self {
            Self::Cardinal => (dx + dy).saturating_mul(cell.movement_cost()),
            Self::Octile => {
                let diagonal = dx.min(dy);
                let straight = dx.max(dy) - diagonal;
                diagonal
                    .saturating_mul(DIAGONAL_STEP)
                    .saturating_add(straight.saturating_mul(ORTHOGONAL_STEP))
            }
        }
    }
}

fn open(grid: &Grid, coord: CellCoord) -> bool {
    grid.is_passable(coord).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use gridpath_core::{TerrainCatalog, TerrainKind};

    use super::*;

    fn floor_grid(half: u32) -> Grid {
        let extent = GridExtent::new(half, half, 1).expect("valid extent");
        Grid::new(extent, TerrainCatalog::default()).expect("grid builds")
    }

    #[test]
    fn cardinal_heuristic_scales_by_scored_cell_cost() {
        let mut grid = floor_grid(3);
        let water = CellCoord::new(-1, 0);
        let _ = grid.set_terrain(water, TerrainKind::Water).expect("in bounds");
        let goal = CellCoord::new(2, 2);

        let floor = grid.cell_at(CellCoord::new(0, 0)).expect("in bounds");
        let water = grid.cell_at(water).expect("in bounds");

        assert_eq!(
            MovementModel::Cardinal.heuristic(grid.extent(), floor, goal),
            40
        );
        assert_eq!(
            MovementModel::Cardinal.heuristic(grid.extent(), water, goal),
            150
        );
    }

    #[test]
    fn octile_heuristic_mixes_diagonal_and_straight_steps() {
        let grid = floor_grid(3);
        let origin = grid.cell_at(CellCoord::new(-3, -3)).expect("in bounds");
        assert_eq!(
            MovementModel::Octile.heuristic(grid.extent(), origin, CellCoord::new(0, 2)),
            3 * 14 + 2 * 10
        );
    }

    #[test]
    fn heuristics_count_steps_not_world_units() {
        let extent = GridExtent::new(4, 4, 2).expect("valid extent");
        let grid = Grid::new(extent, TerrainCatalog::default()).expect("grid builds");
        let origin = grid.cell_at(CellCoord::new(-4, -4)).expect("in bounds");
        assert_eq!(
            MovementModel::Cardinal.heuristic(grid.extent(), origin, CellCoord::new(0, -4)),
            20
        );
    }

    #[test]
    fn diagonal_steps_cost_more_than_straight_ones() {
        let mut grid = floor_grid(1);
        let _ = grid
            .set_terrain(CellCoord::new(1, 1), TerrainKind::Water)
            .expect("in bounds");
        let water = grid.cell_at(CellCoord::new(1, 1)).expect("in bounds");
        let floor = grid.cell_at(CellCoord::new(1, 0)).expect("in bounds");

        assert_eq!(MovementModel::Octile.step_cost(CellCoord::new(0, 0), water), 42);
        assert_eq!(MovementModel::Octile.step_cost(CellCoord::new(0, 0), floor), 10);
        assert_eq!(MovementModel::Cardinal.step_cost(CellCoord::new(0, 0), water), 30);
    }

    #[test]
    fn octile_neighbors_do_not_cut_corners() {
        let mut grid = floor_grid(1);
        assert_eq!(
            MovementModel::Octile
                .neighbors(&grid, CellCoord::new(0, 0))
                .map(|cells| cells.len()),
            Ok(8)
        );

        let _ = grid
            .set_terrain(CellCoord::new(1, 0), TerrainKind::Wall)
            .expect("in bounds");
        let neighbors = MovementModel::Octile
            .neighbors(&grid, CellCoord::new(0, 0))
            .expect("in bounds");
        assert!(!neighbors.contains(&CellCoord::new(1, 1)));
        assert!(!neighbors.contains(&CellCoord::new(1, -1)));
        assert!(neighbors.contains(&CellCoord::new(-1, 1)));
        assert_eq!(
            MovementModel::Cardinal
                .neighbors(&grid, CellCoord::new(0, 0))
                .map(|cells| cells.len()),
            Ok(4)
        );
    }
}
