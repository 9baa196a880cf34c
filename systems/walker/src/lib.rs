#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that walks the agent along a computed route one step at a time.
//!
//! Routes are never revalidated here. Each proposed step is checked by the
//! world against the grid as it is when the step is applied, and a rejected
//! step makes the walker drop the rest of the route and ask for a new query.

use std::collections::VecDeque;

use gridpath_core::{CellCoord, Command, Event, PlayMode, Route};

/// Reasons a route can be refused by [`Walker::assign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssignRejection {
    /// The previous route is still being walked.
    StillWalking,
    /// Routes are only walked in Explore mode.
    InvalidMode,
}

/// Walks the agent marker along a route by proposing single steps.
#[derive(Debug)]
pub struct Walker {
    play_mode: PlayMode,
    remaining: VecDeque<CellCoord>,
    pending: Option<CellCoord>,
    needs_replan: bool,
}

impl Default for Walker {
    fn default() -> Self {
        Self {
            play_mode: PlayMode::Explore,
            remaining: VecDeque::new(),
            pending: None,
            needs_replan: false,
        }
    }
}

impl Walker {
    /// Creates an idle walker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts walking `route`.
    ///
    /// A new route is refused while the previous one still has steps left.
    pub fn assign(&mut self, route: Route) -> Result<(), AssignRejection> {
        if self.play_mode != PlayMode::Explore {
            return Err(AssignRejection::InvalidMode);
        }
        if self.is_walking() {
            return Err(AssignRejection::StillWalking);
        }

        self.remaining = route.into_vec().into();
        self.pending = None;
        self.needs_replan = false;
        Ok(())
    }

    /// Reports whether steps remain on the current route.
    #[must_use]
    pub fn is_walking(&self) -> bool {
        !self.remaining.is_empty()
    }

    /// Reports whether the last route was abandoned because a step was refused.
    #[must_use]
    pub const fn needs_replan(&self) -> bool {
        self.needs_replan
    }

    /// Steps still to be taken, starting with the next one.
    pub fn remaining(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.remaining.iter().copied()
    }

    /// Consumes world events and emits at most one step per call.
    ///
    /// A step is only proposed when `advance` is set and the previous step has
    /// been answered by the world.
    pub fn handle(&mut self, events: &[Event], advance: bool, out: &mut Vec<Command>) {
        for event in events {
            self.observe(event);
        }

        if self.play_mode != PlayMode::Explore || !advance || self.pending.is_some() {
            return;
        }

        if let Some(&next) = self.remaining.front() {
            self.pending = Some(next);
            out.push(Command::StepAgent { to: next });
        }
    }

    fn observe(&mut self, event: &Event) {
        match event {
            Event::PlayModeChanged { mode } => {
                self.play_mode = *mode;
                if *mode == PlayMode::Edit {
                    self.abandon();
                }
            }
            Event::GridConfigured { .. } | Event::AgentPlaced { .. } => self.abandon(),
            Event::AgentStepped { to, .. } if self.pending == Some(*to) => {
                self.pending = None;
                let _ = self.remaining.pop_front();
            }
            Event::AgentStepRejected { to, reason } if self.pending == Some(*to) => {
                tracing::debug!(%to, ?reason, dropped = self.remaining.len(), "route went stale");
                self.abandon();
                self.needs_replan = true;
            }
            _ => {}
        }
    }

    fn abandon(&mut self) {
        self.remaining.clear();
        self.pending = None;
    }
}
