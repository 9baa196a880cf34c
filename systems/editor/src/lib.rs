#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure edit-mode system that turns brush input into terrain and agent commands.

use gridpath_core::{CellCoord, Command, Event, PlayMode, TerrainKind};

/// What the editor paints when the paint action fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Brush {
    /// Paints the selected terrain kind onto the hovered cell.
    Terrain(TerrainKind),
    /// Moves the agent marker to the hovered cell.
    Agent,
}

/// Floor, so a paint action before any brush is chosen only clears cells.
impl Default for Brush {
    fn default() -> Self {
        Self::Terrain(TerrainKind::Floor)
    }
}

/// Describes what the active brush would do at the hovered cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrushPreview {
    /// Brush that would be applied.
    pub brush: Brush,
    /// In-grid cell under the cursor.
    pub cell: CellCoord,
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorInput {
    /// Indicates whether the brush was applied on this frame.
    pub paint_action: bool,
    /// Indicates whether the player asked to clear the board on this frame.
    pub reset_action: bool,
    /// Cell currently hovered by the cursor.
    pub cursor_cell: Option<CellCoord>,
}

impl EditorInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        paint_action: bool,
        reset_action: bool,
        cursor_cell: Option<CellCoord>,
    ) -> Self {
        Self {
            paint_action,
            reset_action,
            cursor_cell,
        }
    }
}

/// Edit-mode system translating brush input into world commands.
#[derive(Clone, Debug)]
pub struct Editor {
    play_mode: PlayMode,
    brush: Brush,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    /// Creates an editor holding the default brush, idle until Edit mode starts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            play_mode: PlayMode::Explore,
            brush: Brush::default(),
        }
    }

    /// Brush applied by the paint action.
    #[must_use]
    pub const fn brush(&self) -> Brush {
        self.brush
    }

    /// Selects the brush used by subsequent paint actions.
    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    /// Mode the editor last observed from the world.
    #[must_use]
    pub const fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    /// Consumes world events and adapter input to emit edit commands.
    ///
    /// The `contains` closure should mirror the world's `query::contains`
    /// helper so cursor positions outside the grid never become commands.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: EditorInput,
        contains: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> bool,
    {
        for event in events {
            if let Event::PlayModeChanged { mode } = event {
                self.play_mode = *mode;
            }
        }

        if self.play_mode != PlayMode::Edit {
            return;
        }

        if input.reset_action {
            out.push(Command::ResetTerrain {
                kind: TerrainKind::Floor,
            });
        }

        if input.paint_action {
            if let Some(preview) = self.preview(input.cursor_cell, &contains) {
                out.push(match preview.brush {
                    Brush::Terrain(kind) => Command::PaintTerrain {
                        cell: preview.cell,
                        kind,
                    },
                    Brush::Agent => Command::PlaceAgent { cell: preview.cell },
                });
            }
        }
    }

    /// Describes what the paint action would do at `cursor`.
    ///
    /// Returns `None` outside Edit mode or when the cursor is off the grid.
    #[must_use]
    pub fn preview<F>(&self, cursor: Option<CellCoord>, contains: F) -> Option<BrushPreview>
    where
        F: Fn(CellCoord) -> bool,
    {
        if self.play_mode != PlayMode::Edit {
            return None;
        }
        cursor.filter(|&cell| contains(cell)).map(|cell| BrushPreview {
            brush: self.brush,
            cell,
        })
    }
}
