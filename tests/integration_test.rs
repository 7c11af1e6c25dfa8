// Integration tests for userdir-manager

// 1) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use std::{fs, path::PathBuf, time::{SystemTime, UNIX_EPOCH}};
    use userdir_manager::app::Theme;

    // Unique temp path
    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("udm_theme_{}_{}.conf", std::process::id(), nonce));
    let path_str = path.to_string_lossy().to_string();

    // Roundtrip write/read
    let t = Theme::slate();
    t.write_file(&path_str).expect("write theme");
    let t2 = Theme::from_file(&path_str).expect("read theme");
    assert_eq!(format!("{:?}", t.text), format!("{:?}", t2.text));
    assert_eq!(format!("{:?}", t.title), format!("{:?}", t2.title));
    assert_eq!(format!("{:?}", t.role_admin), format!("{:?}", t2.role_admin));
    assert_eq!(format!("{:?}", t.status_inactive), format!("{:?}", t2.status_inactive));

    // load_or_init creates the file if missing
    let mut p2 = PathBuf::from(&path_str);
    p2.set_file_name(format!("{}_init.conf", p2.file_stem().unwrap().to_string_lossy()));
    let p2_str = p2.to_string_lossy().to_string();
    let _ = fs::remove_file(&p2_str);
    let _created = Theme::load_or_init(&p2_str);
    assert!(PathBuf::from(&p2_str).exists());

    // Cleanup best-effort
    let _ = fs::remove_file(&path_str);
    let _ = fs::remove_file(&p2_str);
}

// 2) Theme config robustness: unknown keys ignored, invalid values ignored
#[test]
fn theme_from_file_robustness() {
    use std::{fs, time::{SystemTime, UNIX_EPOCH}};
    use userdir_manager::app::Theme;

    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("udm_theme_rb_{}_{}.conf", std::process::id(), nonce));
    let p = path.to_string_lossy().to_string();

    let contents = r#"
text = #112233
title = not-a-color
header_bg = reset
unknown_key = #abcdef
"#;
    fs::write(&p, contents).expect("write theme file");

    let t = Theme::from_file(&p).expect("load theme");
    let slate = Theme::slate();

    assert_eq!(
        format!("{:?}", t.text),
        format!("{:?}", ratatui::style::Color::Rgb(0x11, 0x22, 0x33))
    );
    assert_eq!(
        format!("{:?}", t.header_bg),
        format!("{:?}", ratatui::style::Color::Reset)
    );
    // title invalid -> should remain default (slate)
    assert_eq!(format!("{:?}", t.title), format!("{:?}", slate.title));

    let _ = std::fs::remove_file(&p);
}

// 3) Keymap roundtrip and custom bindings
#[test]
fn keymap_roundtrip_and_custom_bindings() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::{fs, time::{SystemTime, UNIX_EPOCH}};
    use userdir_manager::app::keymap::{KeyAction, Keymap};

    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("udm_keys_{}_{}.conf", std::process::id(), nonce));
    let p = path.to_string_lossy().to_string();

    let km = Keymap::new_defaults();
    km.write_file(&p).expect("write keymap");
    let km2 = Keymap::from_file(&p).expect("read keymap");
    let ev = KeyEvent::new(KeyCode::Char('m'), KeyModifiers::NONE);
    assert_eq!(km2.resolve(&ev), Some(KeyAction::LoadMore));

    // Custom override on top of defaults
    fs::write(&p, "Quit = Ctrl+q\nLoadMore = L\n").expect("write custom keymap");
    let km3 = Keymap::from_file(&p).expect("read custom keymap");
    let ctrl_q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL);
    assert_eq!(km3.resolve(&ctrl_q), Some(KeyAction::Quit));
    let big_l = KeyEvent::new(KeyCode::Char('L'), KeyModifiers::NONE);
    assert_eq!(km3.resolve(&big_l), Some(KeyAction::LoadMore));

    let _ = fs::remove_file(&p);
}

// 4) Collection flow: page load, search, create, delete
#[test]
fn collection_flow_load_search_create_delete() {
    use userdir_manager::api::{ApiEvent, Role, Status, User, UserDraft};
    use userdir_manager::app::{sync, AppState, Settings, SortField};

    fn mk_user(id: u64, first: &str, last: &str, department: &str) -> User {
        User {
            id,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: format!("{}.{}@corp.example", first.to_lowercase(), last.to_lowercase()),
            department: department.to_string(),
            avatar: String::new(),
            role: Role::User,
            status: Status::Active,
            created_at: 0,
        }
    }

    let mut app = AppState::detached(Settings { page_size: 3, ..Settings::default() });

    // Full first page: collection replaced, more assumed available
    let page1 = vec![
        mk_user(1, "Ann", "Zed", "Engineering"),
        mk_user(2, "Bea", "Young", "Sales"),
        mk_user(3, "Cal", "Xu", "Engineering"),
    ];
    sync::apply_event(&mut app, ApiEvent::PageLoaded { page: 1, result: Ok(page1) });
    assert_eq!(app.users_all.len(), 3);
    assert!(app.has_more);
    // Default sort: last name ascending
    let names: Vec<&str> = app.users.iter().map(|u| u.last_name.as_str()).collect();
    assert_eq!(names, ["Xu", "Young", "Zed"]);

    // Search narrows the visible list without touching the collection
    app.search_query = "engineering".to_string();
    userdir_manager::view::apply_view(&mut app);
    assert_eq!(app.users.len(), 2);
    assert_eq!(app.users_all.len(), 3);
    app.search_query.clear();

    // A confirmed create prepends; under recency sort it is shown first
    app.toggle_sort(SortField::CreatedAt);
    app.toggle_sort(SortField::CreatedAt); // descending: newest first
    let draft = UserDraft {
        first_name: "Dee".to_string(),
        last_name: "Waters".to_string(),
        email: "dee@corp.example".to_string(),
        department: "Support".to_string(),
        role: Role::Manager,
        status: Status::Active,
    };
    sync::apply_event(&mut app, ApiEvent::Created { draft, result: Ok(4) });
    assert_eq!(app.users_all.len(), 4);
    assert_eq!(app.users[0].last_name, "Waters");

    // A confirmed delete removes the record everywhere
    sync::apply_event(&mut app, ApiEvent::Deleted { id: 2, result: Ok(()) });
    assert_eq!(app.users_all.len(), 3);
    assert!(app.users.iter().all(|u| u.id != 2));
}

// 5) UI render smoke tests
#[test]
fn test_ui_render_smoke() {
    use ratatui::{backend::TestBackend, Terminal};
    use userdir_manager::app::{AppState, Settings};
    use userdir_manager::ui::render;

    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).expect("create terminal");
    let mut app = AppState::detached(Settings::default());
    terminal
        .draw(|f| {
            render(f, &mut app);
        })
        .expect("render frame with empty data");
}

#[test]
fn test_ui_render_with_data_and_form_modal() {
    use ratatui::{backend::TestBackend, Terminal};
    use userdir_manager::api::{ApiEvent, Role, Status, User};
    use userdir_manager::app::form::FormState;
    use userdir_manager::app::{sync, AppState, InputMode, ModalState, Settings};

    let backend = TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend).expect("create terminal");
    let mut app = AppState::detached(Settings::default());

    let users: Vec<User> = (1..=4)
        .map(|i| User {
            id: i,
            first_name: format!("First{}", i),
            last_name: format!("Last{}", i),
            email: format!("user{}@corp.example", i),
            department: "Engineering".to_string(),
            avatar: String::new(),
            role: Role::User,
            status: Status::Active,
            created_at: 0,
        })
        .collect();
    sync::apply_event(&mut app, ApiEvent::PageLoaded { page: 1, result: Ok(users) });

    let mut form = FormState::create();
    form.draft.email = "broken".to_string();
    form.validate();
    app.modal = Some(ModalState::UserForm { form });
    app.input_mode = InputMode::Modal;
    app.error = Some("Failed to delete user: server returned 500".to_string());

    terminal
        .draw(|f| {
            userdir_manager::ui::render(f, &mut app);
        })
        .expect("render frame with data and modal");
}
