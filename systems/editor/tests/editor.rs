use gridpath_core::{CellCoord, Command, Event, GridConfig, PlayMode, TerrainKind};
use gridpath_system_editor::{Brush, BrushPreview, Editor, EditorInput};
use gridpath_world::{self as world, query, World};

fn edit_mode() -> [Event; 1] {
    [Event::PlayModeChanged {
        mode: PlayMode::Edit,
    }]
}

fn within(half: i32) -> impl Fn(CellCoord) -> bool {
    move |cell| cell.x().abs() <= half && cell.y().abs() <= half
}

fn paint_at(cell: CellCoord) -> EditorInput {
    EditorInput::new(true, false, Some(cell))
}

#[test]
fn paint_emits_terrain_command_in_edit_mode() {
    let mut editor = Editor::default();
    editor.set_brush(Brush::Terrain(TerrainKind::Water));
    let mut commands = Vec::new();

    editor.handle(
        &edit_mode(),
        paint_at(CellCoord::new(1, -1)),
        within(2),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PaintTerrain {
            cell: CellCoord::new(1, -1),
            kind: TerrainKind::Water,
        }]
    );
}

#[test]
fn paint_ignored_in_explore_mode() {
    let mut editor = Editor::default();
    let mut commands = Vec::new();

    editor.handle(
        &[],
        paint_at(CellCoord::new(0, 0)),
        within(2),
        &mut commands,
    );

    assert!(commands.is_empty(), "explore mode must not emit edits");
}

#[test]
fn leaving_edit_mode_stops_commands() {
    let mut editor = Editor::default();
    let mut commands = Vec::new();
    editor.handle(&edit_mode(), EditorInput::default(), within(2), &mut commands);

    editor.handle(
        &[Event::PlayModeChanged {
            mode: PlayMode::Explore,
        }],
        paint_at(CellCoord::new(0, 0)),
        within(2),
        &mut commands,
    );

    assert!(commands.is_empty());
    assert_eq!(editor.play_mode(), PlayMode::Explore);
}

#[test]
fn cursor_outside_grid_emits_nothing() {
    let mut editor = Editor::default();
    let mut commands = Vec::new();

    editor.handle(
        &edit_mode(),
        paint_at(CellCoord::new(3, 0)),
        within(2),
        &mut commands,
    );
    editor.handle(
        &[],
        EditorInput::new(true, false, None),
        within(2),
        &mut commands,
    );

    assert!(commands.is_empty());
}

#[test]
fn agent_brush_moves_the_marker() {
    let mut editor = Editor::default();
    editor.set_brush(Brush::Agent);
    let mut commands = Vec::new();

    editor.handle(
        &edit_mode(),
        paint_at(CellCoord::new(-2, 2)),
        within(2),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PlaceAgent {
            cell: CellCoord::new(-2, 2),
        }]
    );
}

#[test]
fn reset_clears_board_to_floor_before_painting() {
    let mut editor = Editor::default();
    let mut commands = Vec::new();

    editor.handle(
        &edit_mode(),
        EditorInput::new(true, true, Some(CellCoord::new(0, 0))),
        within(1),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![
            Command::ResetTerrain {
                kind: TerrainKind::Floor,
            },
            Command::PaintTerrain {
                cell: CellCoord::new(0, 0),
                kind: TerrainKind::Floor,
            },
        ]
    );
}

#[test]
fn default_brush_only_clears_cells() {
    let mut editor = Editor::default();
    let mut commands = Vec::new();
    assert_eq!(editor.brush(), Brush::Terrain(TerrainKind::Floor));

    editor.handle(
        &edit_mode(),
        paint_at(CellCoord::new(1, 0)),
        within(1),
        &mut commands,
    );

    assert_eq!(
        commands,
        vec![Command::PaintTerrain {
            cell: CellCoord::new(1, 0),
            kind: TerrainKind::Floor,
        }]
    );
}

#[test]
fn preview_follows_mode_cursor_and_brush() {
    let mut editor = Editor::default();
    let cursor = Some(CellCoord::new(1, 1));
    assert_eq!(editor.preview(cursor, within(1)), None);

    let mut commands = Vec::new();
    editor.handle(&edit_mode(), EditorInput::default(), within(1), &mut commands);
    editor.set_brush(Brush::Terrain(TerrainKind::Bridge));

    assert_eq!(
        editor.preview(cursor, within(1)),
        Some(BrushPreview {
            brush: Brush::Terrain(TerrainKind::Bridge),
            cell: CellCoord::new(1, 1),
        })
    );
    assert_eq!(editor.preview(Some(CellCoord::new(2, 1)), within(1)), None);
    assert!(commands.is_empty());
}

#[test]
fn editor_commands_drive_the_world() {
    let config = GridConfig {
        width: 2,
        height: 2,
        wall_percent: 0.0,
        water_percent: 0.0,
        ..GridConfig::default()
    };
    let mut world = World::new(config).expect("valid configuration");
    let mut editor = Editor::default();
    editor.set_brush(Brush::Terrain(TerrainKind::Wall));
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::SetPlayMode {
            mode: PlayMode::Edit,
        },
        &mut events,
    );

    let mut commands = Vec::new();
    let cell = CellCoord::new(0, 1);
    editor.handle(
        &events,
        paint_at(cell),
        |cell| query::contains(&world, cell),
        &mut commands,
    );
    events.clear();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    assert_eq!(
        events,
        vec![Event::TerrainPainted {
            cell,
            from: TerrainKind::Floor,
            to: TerrainKind::Wall,
        }]
    );
    assert_eq!(query::terrain_at(&world, cell), Ok(TerrainKind::Wall));
}
