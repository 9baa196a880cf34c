//! Random terrain seeding applied to freshly built grids.

use gridpath_core::{CellCoord, GridConfig, GridError, TerrainKind};
use rand::{seq::IteratorRandom, Rng};

use crate::grid::Grid;

/// Percentages controlling how much of a fresh grid becomes wall and water.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedRules {
    /// Share of the candidate cells converted to walls, in percent.
    pub wall_percent: f32,
    /// Share of the cells left after walls converted to water, in percent.
    pub water_percent: f32,
}

impl From<&GridConfig> for SeedRules {
    fn from(config: &GridConfig) -> Self {
        Self {
            wall_percent: config.wall_percent,
            water_percent: config.water_percent,
        }
    }
}

/// Cells converted by a seeding pass, in selection order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Cells converted to walls.
    pub walls: Vec<CellCoord>,
    /// Cells converted to water.
    pub water: Vec<CellCoord>,
}

/// Converts a share of the passable cells to walls, then a share of the
/// remaining cells to water.
///
/// Candidates are drawn without replacement from a single pool, so a cell
/// picked for a wall is never drawn again for water. Cells that are already
/// walls never enter the pool.
pub fn seed_terrain<R>(
    grid: &mut Grid,
    rules: &SeedRules,
    rng: &mut R,
) -> Result<SeedReport, GridError>
where
    R: Rng + ?Sized,
{
    let mut pool: Vec<CellCoord> = grid
        .cells()
        .filter(|cell| cell.is_passable())
        .map(|cell| cell.coord())
        .collect();
    let mut report = SeedReport::default();

    let wall_count = share_of(pool.len(), rules.wall_percent);
    for _ in 0..wall_count {
        let Some(cell) = draw(&mut pool, rng) else {
            break;
        };
        let _ = grid.set_terrain(cell, TerrainKind::Wall)?;
        report.walls.push(cell);
    }

    let water_count = share_of(pool.len(), rules.water_percent);
    for _ in 0..water_count {
        let Some(cell) = draw(&mut pool, rng) else {
            break;
        };
        let _ = grid.set_terrain(cell, TerrainKind::Water)?;
        report.water.push(cell);
    }

    tracing::debug!(
        walls = report.walls.len(),
        water = report.water.len(),
        "seeded grid terrain"
    );
    Ok(report)
}

/// Picks a uniformly random passable cell, if any exists.
pub fn choose_spawn<R>(grid: &Grid, rng: &mut R) -> Option<CellCoord>
where
    R: Rng + ?Sized,
{
    grid.cells()
        .filter(|cell| cell.is_passable())
        .map(|cell| cell.coord())
        .choose(rng)
}

fn draw<R>(pool: &mut Vec<CellCoord>, rng: &mut R) -> Option<CellCoord>
where
    R: Rng + ?Sized,
{
    if pool.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..pool.len());
    Some(pool.swap_remove(index))
}

fn share_of(count: usize, percent: f32) -> usize {
    let percent = if percent.is_nan() {
        0.0
    } else {
        f64::from(percent.clamp(0.0, 100.0))
    };
    let scaled = (count as f64 * percent / 100.0).floor();
    scaled as usize
}
