#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Weighted A* search over the world grid.
//!
//! Every search keeps its scores in a map scoped to that one call, so nothing
//! carries over between queries and a single [`Pathfinder`] can serve any
//! number of them. The search never performs I/O; callers receive the route
//! together with a [`SearchTrace`] they may visualise however they like.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap, HashSet},
};

use gridpath_core::{CellCoord, GridError, Route};
use gridpath_world::Grid;

mod model;

pub use model::MovementModel;

/// Scores recorded for a cell during a single search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellScores {
    /// Accumulated entry cost from the start along the best known path.
    pub g: u32,
    /// Estimated remaining cost to the goal.
    pub h: u32,
    /// `g + h`, the priority used to pick the next cell.
    pub f: u32,
    /// Predecessor on the best known path; absent for the start cell.
    pub came_from: Option<CellCoord>,
}

/// Cells touched by a search, kept for visualisation only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchTrace {
    discovered: Vec<CellCoord>,
    expanded: Vec<CellCoord>,
    scores: HashMap<CellCoord, CellScores>,
}

impl SearchTrace {
    /// Cells added to the frontier, in the order they were first reached.
    #[must_use]
    pub fn discovered(&self) -> &[CellCoord] {
        &self.discovered
    }

    /// Cells taken off the frontier and expanded, in expansion order.
    #[must_use]
    pub fn expanded(&self) -> &[CellCoord] {
        &self.expanded
    }

    /// Final scores recorded for `cell`, if the search reached it.
    #[must_use]
    pub fn scores(&self, cell: CellCoord) -> Option<CellScores> {
        self.scores.get(&cell).copied()
    }

    /// Reports whether the search added `cell` to the frontier.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.scores.contains_key(&cell)
    }
}

/// Result of a single path query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathOutcome {
    route: Route,
    trace: SearchTrace,
    cost: Option<u32>,
}

impl PathOutcome {
    /// Route from (excluding) the start to (including) the goal.
    ///
    /// Empty when the goal is unreachable or equal to the start.
    #[must_use]
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Cells the search touched.
    #[must_use]
    pub fn trace(&self) -> &SearchTrace {
        &self.trace
    }

    /// Cost of the route, `None` when no path exists.
    #[must_use]
    pub fn cost(&self) -> Option<u32> {
        self.cost
    }

    /// Reports whether the goal was reached.
    #[must_use]
    pub fn found(&self) -> bool {
        self.cost.is_some()
    }

    /// Consumes the outcome, yielding its route and trace.
    #[must_use]
    pub fn into_parts(self) -> (Route, SearchTrace) {
        (self.route, self.trace)
    }
}

/// Weighted A* pathfinder.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pathfinder {
    model: MovementModel,
}

impl Pathfinder {
    /// Creates a pathfinder using the provided movement rules.
    #[must_use]
    pub const fn new(model: MovementModel) -> Self {
        Self { model }
    }

    /// Movement rules used by this pathfinder.
    #[must_use]
    pub const fn model(&self) -> MovementModel {
        self.model
    }

    /// Finds a minimum-cost route from `start` to `goal`.
    ///
    /// Both endpoints must lie on the grid, otherwise
    /// [`GridError::OutOfBounds`] is returned. An impassable endpoint or an
    /// unreachable goal yields an empty route with no cost; `start == goal`
    /// yields an empty route costing zero.
    pub fn find_path(
        &self,
        grid: &Grid,
        start: CellCoord,
        goal: CellCoord,
    ) -> Result<PathOutcome, GridError> {
        let start_cell = grid.cell_at(start)?;
        let goal_cell = grid.cell_at(goal)?;

        if !start_cell.is_passable() || !goal_cell.is_passable() {
            tracing::debug!(%start, %goal, "path query against an impassable endpoint");
            return Ok(PathOutcome::default());
        }
        if start == goal {
            return Ok(PathOutcome {
                cost: Some(0),
                ..PathOutcome::default()
            });
        }

        let mut search = Search::new(grid, self.model, goal);
        search.seed(start)?;
        let outcome = search.run(start)?;

        tracing::debug!(
            %start,
            %goal,
            found = outcome.found(),
            cost = ?outcome.cost,
            steps = outcome.route.len(),
            expanded = outcome.trace.expanded.len(),
            "path query finished"
        );
        Ok(outcome)
    }

    /// Sums the cost of walking `route` from `start` on the grid as it is now.
    pub fn route_cost(
        &self,
        grid: &Grid,
        start: CellCoord,
        route: &Route,
    ) -> Result<u32, GridError> {
        let mut previous = start;
        let mut total: u32 = 0;
        for &step in route.cells() {
            let cell = grid.cell_at(step)?;
            total = total.saturating_add(self.model.step_cost(previous, cell));
            previous = step;
        }
        Ok(total)
    }
}

/// Frontier entry; ordered so the heap yields the lowest `f`, then the lowest
/// `h`, then the lowest coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    h: u32,
    g: u32,
    cell: CellCoord,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.cell.cmp(&self.cell))
            .then_with(|| other.g.cmp(&self.g))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// State owned by one `find_path` call.
struct Search<'a> {
    grid: &'a Grid,
    model: MovementModel,
    goal: CellCoord,
    open: BinaryHeap<OpenEntry>,
    closed: HashSet<CellCoord>,
    trace: SearchTrace,
}

impl<'a> Search<'a> {
    fn new(grid: &'a Grid, model: MovementModel, goal: CellCoord) -> Self {
        Self {
            grid,
            model,
            goal,
            open: BinaryHeap::new(),
            closed: HashSet::new(),
            trace: SearchTrace::default(),
        }
    }

    fn seed(&mut self, start: CellCoord) -> Result<(), GridError> {
        let cell = self.grid.cell_at(start)?;
        let h = self.model.heuristic(self.grid.extent(), cell, self.goal);
        let _ = self.trace.scores.insert(
            start,
            CellScores {
                g: 0,
                h,
                f: h,
                came_from: None,
            },
        );
        self.open.push(OpenEntry {
            f: h,
            h,
            g: 0,
            cell: start,
        });
        Ok(())
    }

    fn run(mut self, start: CellCoord) -> Result<PathOutcome, GridError> {
        while let Some(entry) = self.open.pop() {
            if self.is_stale(&entry) {
                continue;
            }

            let current = entry.cell;
            if current == self.goal {
                let route = self.reconstruct(start);
                return Ok(PathOutcome {
                    route,
                    trace: self.trace,
                    cost: Some(entry.g),
                });
            }

            let _ = self.closed.insert(current);
            self.trace.expanded.push(current);
            self.relax_neighbors(current, entry.g)?;
        }

        Ok(PathOutcome {
            route: Route::empty(),
            trace: self.trace,
            cost: None,
        })
    }

    /// Heap entries are never removed in place; an entry is dead once its
    /// cell is closed or a cheaper path to it has been recorded.
    fn is_stale(&self, entry: &OpenEntry) -> bool {
        if self.closed.contains(&entry.cell) {
            return true;
        }
        self.trace
            .scores
            .get(&entry.cell)
            .map_or(true, |scores| scores.g != entry.g)
    }

    fn relax_neighbors(&mut self, current: CellCoord, current_g: u32) -> Result<(), GridError> {
        for neighbor in self.model.neighbors(self.grid, current)? {
            if self.closed.contains(&neighbor) {
                continue;
            }
            let cell = self.grid.cell_at(neighbor)?;
            if !cell.is_passable() {
                continue;
            }

            let tentative = current_g.saturating_add(self.model.step_cost(current, cell));
            let improves = self
                .trace
                .scores
                .get(&neighbor)
                .map_or(true, |known| tentative < known.g);
            if !improves {
                continue;
            }

            let h = self.model.heuristic(self.grid.extent(), cell, self.goal);
            let scores = CellScores {
                g: tentative,
                h,
                f: tentative.saturating_add(h),
                came_from: Some(current),
            };
            if self.trace.scores.insert(neighbor, scores).is_none() {
                self.trace.discovered.push(neighbor);
            }
            self.open.push(OpenEntry {
                f: scores.f,
                h,
                g: tentative,
                cell: neighbor,
            });
        }
        Ok(())
    }

    fn reconstruct(&self, start: CellCoord) -> Route {
        let mut cells = Vec::new();
        let mut current = self.goal;
        while current != start {
            cells.push(current);
            match self
                .trace
                .scores
                .get(&current)
                .and_then(|scores| scores.came_from)
            {
                Some(previous) => current = previous,
                None => break,
            }
        }
        cells.reverse();
        Route::new(cells)
    }
}
