use crate::app::state::NoticeLevel;
use crate::app::tools::{EditorTool, InputEvent, Key, Modifiers};
use crate::app::{AppCommand, AppIntent, AppState};

use super::map_intent_to_commands;

fn key(state: &AppState, key: Key, modifiers: Modifiers) -> Vec<AppCommand> {
    map_intent_to_commands(state, AppIntent::KeyPressed { key, modifiers })
}

#[test]
fn ctrl_z_maps_to_undo_and_ctrl_shift_z_to_redo() {
    let state = AppState::new();

    assert!(matches!(
        key(&state, Key::Char('z'), Modifiers::CTRL)[..],
        [AppCommand::Undo]
    ));
    let ctrl_shift = Modifiers {
        shift: true,
        ctrl: true,
    };
    assert!(matches!(
        key(&state, Key::Char('z'), ctrl_shift)[..],
        [AppCommand::Redo]
    ));
    assert!(matches!(
        key(&state, Key::Char('y'), Modifiers::CTRL)[..],
        [AppCommand::Redo]
    ));
}

#[test]
fn other_keys_go_to_the_active_tool() {
    let state = AppState::new();

    let commands = key(&state, Key::Escape, Modifiers::default());

    assert_eq!(commands.len(), 1);
    assert!(matches!(
        commands[0],
        AppCommand::ToolInput {
            event: InputEvent::Key {
                key: Key::Escape,
                ..
            }
        }
    ));
    assert!(matches!(
        key(&state, Key::Char('z'), Modifiers::default())[..],
        [AppCommand::ToolInput { .. }]
    ));
}

#[test]
fn tool_selected_maps_to_set_tool() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::ToolSelected {
            tool: EditorTool::DrawBezier,
        },
    );

    assert!(matches!(
        commands[..],
        [AppCommand::SetTool {
            tool: EditorTool::DrawBezier
        }]
    ));
}

#[test]
fn dropped_files_are_routed_by_extension() {
    let state = AppState::new();
    let dropped = |name: &str| {
        map_intent_to_commands(
            &state,
            AppIntent::FileDropped {
                name: name.to_string(),
                contents: Ok("{}".to_string()),
            },
        )
    };

    assert!(matches!(dropped("plan.SVG")[..], [AppCommand::ImportSvg { .. }]));
    assert!(matches!(
        dropped("roads.geojson")[..],
        [AppCommand::ImportGeoJson { .. }]
    ));
    assert!(matches!(
        dropped("roads.json")[..],
        [AppCommand::ImportGeoJson { .. }]
    ));
    assert!(matches!(
        dropped("photo.png")[..],
        [AppCommand::ReportNotice {
            level: NoticeLevel::Warning,
            ..
        }]
    ));
}

#[test]
fn unreadable_drop_becomes_error_notice() {
    let state = AppState::new();

    let commands = map_intent_to_commands(
        &state,
        AppIntent::FileDropped {
            name: "a.svg".to_string(),
            contents: Err("Zugriff verweigert".to_string()),
        },
    );

    match &commands[..] {
        [AppCommand::ReportNotice { level, message }] => {
            assert_eq!(*level, NoticeLevel::Error);
            assert!(message.contains("Zugriff verweigert"));
        }
        other => panic!("ReportNotice erwartet, war {:?}", other),
    }
}
