//! Plain-text rendering of the grid with an optional query overlay.

use gridpath_core::{CellCoord, TerrainKind};
use gridpath_system_pathfinding::PathOutcome;
use gridpath_world::{Cell, Grid};

/// Markers drawn over the terrain.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overlay<'a> {
    /// Cell holding the agent marker.
    pub(crate) agent: Option<CellCoord>,
    /// Start and goal of the rendered query.
    pub(crate) query: Option<(CellCoord, CellCoord)>,
    /// Result of the rendered query.
    pub(crate) outcome: Option<&'a PathOutcome>,
}

/// Renders `grid` top row first, one character per cell.
///
/// Overlay markers take precedence over terrain: `@` agent, `S` start,
/// `G` goal, `*` route, `o` expanded, `+` discovered but never expanded.
pub(crate) fn render(grid: &Grid, overlay: &Overlay<'_>) -> String {
    let columns = usize::try_from(grid.extent().columns()).unwrap_or(1).max(1);
    let cells: Vec<&Cell> = grid.cells().collect();

    let mut output = String::with_capacity(cells.len() + cells.len() / columns);
    for row in cells.chunks(columns).rev() {
        output.extend(row.iter().map(|cell| glyph(cell, overlay)));
        output.push('\n');
    }
    output
}

fn glyph(cell: &Cell, overlay: &Overlay<'_>) -> char {
    let coord = cell.coord();
    if overlay.agent == Some(coord) {
        return '@';
    }
    if let Some((start, goal)) = overlay.query {
        if coord == start {
            return 'S';
        }
        if coord == goal {
            return 'G';
        }
    }
    if let Some(outcome) = overlay.outcome {
        if outcome.route().contains(coord) {
            return '*';
        }
        if outcome.trace().expanded().contains(&coord) {
            return 'o';
        }
        if outcome.trace().contains(coord) {
            return '+';
        }
    }
    match cell.terrain() {
        TerrainKind::Floor => '.',
        TerrainKind::Water => '~',
        TerrainKind::Bridge => '=',
        TerrainKind::Wall => '#',
    }
}

#[cfg(test)]
mod tests {
    use gridpath_core::{GridExtent, TerrainCatalog};
    use gridpath_system_pathfinding::Pathfinder;

    use super::*;

    fn grid() -> Grid {
        let extent = GridExtent::new(2, 1, 1).expect("valid extent");
        let mut grid = Grid::new(extent, TerrainCatalog::default()).expect("grid builds");
        for (x, y, kind) in [
            (0, 1, TerrainKind::Wall),
            (0, 0, TerrainKind::Wall),
            (-2, 1, TerrainKind::Water),
            (0, -1, TerrainKind::Bridge),
        ] {
            let _ = grid
                .set_terrain(CellCoord::new(x, y), kind)
                .expect("in bounds");
        }
        grid
    }

    #[test]
    fn terrain_renders_top_row_first() {
        assert_eq!(render(&grid(), &Overlay::default()), "~.#..\n..#..\n..=..\n");
    }

    #[test]
    fn query_overlay_marks_route_and_endpoints() {
        let grid = grid();
        let start = CellCoord::new(-2, 0);
        let goal = CellCoord::new(2, 0);
        let outcome = Pathfinder::default()
            .find_path(&grid, start, goal)
            .expect("endpoints on grid");

        let text = render(
            &grid,
            &Overlay {
                agent: None,
                query: Some((start, goal)),
                outcome: Some(&outcome),
            },
        );

        assert_eq!(outcome.cost(), Some(60));
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["++#+.", "S*#*G", "+***+"]
        );
    }

    #[test]
    fn agent_marker_wins_over_everything() {
        let text = render(
            &grid(),
            &Overlay {
                agent: Some(CellCoord::new(0, 0)),
                ..Overlay::default()
            },
        );
        assert_eq!(text.lines().nth(1), Some("..@.."));
    }
}
