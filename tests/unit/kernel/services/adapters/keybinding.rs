use super::*;

#[test]
fn save_uses_primary_keybinding() {
    let service = KeybindingService::new();
    assert_eq!(
        service.resolve(KeybindingContext::Global, &Key::primary(KeyCode::Char('s'))),
        Some(&Command::Save)
    );
}

#[test]
fn ctrl_and_meta_resolve_the_same_chord() {
    let service = KeybindingService::new();
    let ctrl = KeyEvent::new(KeyCode::Char('p')).ctrl().shift();
    let meta = KeyEvent::new(KeyCode::Char('P')).meta();
    assert_eq!(
        service.resolve_event(KeybindingContext::Global, &ctrl),
        Some(Command::OpenCommandPalette)
    );
    assert_eq!(
        service.resolve_event(KeybindingContext::Global, &meta),
        Some(Command::OpenCommandPalette)
    );
}

#[test]
fn esc_resolves_to_escape_in_all_contexts() {
    let service = KeybindingService::new();
    let esc = Key::simple(KeyCode::Esc);
    assert_eq!(
        service.resolve(KeybindingContext::Global, &esc),
        Some(&Command::Escape)
    );
    assert_eq!(
        service.resolve(KeybindingContext::CommandPalette, &esc),
        Some(&Command::Escape)
    );
}

#[test]
fn palette_navigation_only_in_palette_context() {
    let service = KeybindingService::new();
    let enter = Key::simple(KeyCode::Enter);
    assert_eq!(
        service.resolve(KeybindingContext::CommandPalette, &enter),
        Some(&Command::PaletteConfirm)
    );
    assert_eq!(service.resolve(KeybindingContext::Global, &enter), None);
}

#[test]
fn delete_chord_suppressed_while_typing() {
    let service = KeybindingService::new();
    let chord = KeyEvent::new(KeyCode::Backspace).ctrl().shift();
    assert_eq!(
        service.resolve_event(KeybindingContext::Global, &chord),
        Some(Command::DeleteFile)
    );
    assert_eq!(
        service.resolve_event(KeybindingContext::Global, &chord.in_editable()),
        None
    );

    let save = KeyEvent::new(KeyCode::Char('s')).ctrl().in_editable();
    assert_eq!(
        service.resolve_event(KeybindingContext::Global, &save),
        Some(Command::Save)
    );
}

#[test]
fn user_rules_override_defaults_and_skip_unknown() {
    let mut service = KeybindingService::new();
    let rules = vec![
        KeybindingRule {
            key: "ctrl+r".to_string(),
            command: "run".to_string(),
            context: None,
        },
        KeybindingRule {
            key: "ctrl+".to_string(),
            command: "save".to_string(),
            context: None,
        },
        KeybindingRule {
            key: "ctrl+k".to_string(),
            command: "launchRockets".to_string(),
            context: None,
        },
        KeybindingRule {
            key: "tab".to_string(),
            command: "paletteMoveDown".to_string(),
            context: Some("palette".to_string()),
        },
        KeybindingRule {
            key: "ctrl+j".to_string(),
            command: "save".to_string(),
            context: Some("sidebar".to_string()),
        },
    ];
    assert_eq!(service.apply_rules(&rules), 2);
    assert_eq!(
        service.resolve(KeybindingContext::CommandPalette, &Key::simple(KeyCode::Tab)),
        Some(&Command::PaletteMoveDown)
    );
    assert_eq!(service.resolve(KeybindingContext::Global, &Key::simple(KeyCode::Tab)), None);
    assert_eq!(
        service.resolve(KeybindingContext::Global, &Key::primary(KeyCode::Char('r'))),
        Some(&Command::Run)
    );
    assert_eq!(
        service.resolve(KeybindingContext::Global, &Key::primary(KeyCode::Char('k'))),
        None
    );
}

#[test]
fn unbind_removes_chord() {
    let mut service = KeybindingService::new();
    let key = Key::primary(KeyCode::Char('f'));
    assert_eq!(
        service.unbind(KeybindingContext::Global, &key),
        Some(Command::ToggleSearchPanel)
    );
    assert!(!service.bindings(KeybindingContext::Global).contains_key(&key));
}

#[test]
fn context_parse() {
    assert_eq!(KeybindingContext::parse("Palette"), Some(KeybindingContext::CommandPalette));
    assert_eq!(KeybindingContext::parse("global"), Some(KeybindingContext::Global));
    assert_eq!(KeybindingContext::parse("editor"), None);
}
