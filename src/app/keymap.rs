//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map
//! keys to actions.
//!
//! Supports loading custom keybindings from a config file, sensible defaults
//! when no config is present, resolving key presses (with modifiers) to
//! semantic actions, and exporting the current keymap back to a file for
//! reference or customization.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions that can be bound to key combinations.
///
/// Multiple key combinations can map to the same action (e.g. both 'j' and
/// the Down arrow move down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Start typing a search term.
    StartSearch,
    /// Open the role/status filter menu.
    OpenFilterMenu,
    /// Open the sort column menu.
    OpenSortMenu,
    /// Open the create-user dialog.
    NewUser,
    /// Open the edit dialog for the selected record.
    EditSelection,
    /// Ask to delete the selected record.
    DeleteSelection,
    /// Fetch the next page of the collection.
    LoadMore,
    /// Reload the collection from its first page.
    Reload,
    /// Clear the currently shown error message.
    DismissError,
    /// Display the help dialog.
    OpenHelp,
    /// Open an action menu for the selected record.
    EnterAction,
    /// Move up in the list.
    MoveUp,
    /// Move down in the list.
    MoveDown,
    /// Jump a screenful up.
    MoveLeftPage,
    /// Jump a screenful down.
    MoveRightPage,
    /// Jump a screenful up.
    PageUp,
    /// Jump a screenful down.
    PageDown,
    /// Ignore this key.
    Ignore,
}

/// Manages keybinding configuration and key-to-action resolution.
#[derive(Clone, Debug)]
pub struct Keymap {
    /// Canonical mapping from (modifiers, code) to action.
    bindings: std::collections::HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings: arrow keys and vim-style
    /// hjkl for navigation, plus q (quit), / (search), f (filter), s (sort),
    /// n (new), e (edit), m (load more), r (reload), x (dismiss error).
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = std::collections::HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('f')), KeyAction::OpenFilterMenu);
        bindings.insert((M::NONE, Char('s')), KeyAction::OpenSortMenu);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('m')), KeyAction::LoadMore);
        bindings.insert((M::NONE, Char('r')), KeyAction::Reload);
        bindings.insert((M::NONE, Char('x')), KeyAction::DismissError);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Enter), KeyAction::EnterAction);
        // Navigation
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Left), KeyAction::MoveLeftPage);
        bindings.insert((M::NONE, Right), KeyAction::MoveRightPage);
        // Vim-like keys
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::MoveLeftPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::MoveRightPage);
        // Page keys
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);

        Self { bindings }
    }

    /// Load a keymap from a file, or create defaults if the file doesn't
    /// exist. Missing files are first looked up in the standard config
    /// location, and a fresh default file is written otherwise.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        if let Some(existing) = crate::app::config_file_read_path("keybinds.conf") {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let km = Self::default();
        let _ = km.write_file(path);
        km
    }

    /// Load a keymap from a configuration file in `<Action> = <KeySpec>`
    /// format (the legacy `<KeySpec> = <Action>` order is also accepted).
    /// Starts from the defaults and overrides with the file's bindings.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
                continue;
            }
            if let (Some(key), Some(action)) = (parse_key(lhs), parse_action(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        Some(map)
    }

    /// Write the current keymap to a configuration file in a human-readable
    /// format, with comments describing the accepted keys and actions.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userdir-manager keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Tab, Up, Down, Left, Right, PageUp, PageDown, Delete, /, n, f, s, j, k, h, l\n");
        buf.push_str("# Actions: Quit, StartSearch, OpenFilterMenu, OpenSortMenu, NewUser, EditSelection, DeleteSelection, LoadMore, Reload, DismissError, OpenHelp, EnterAction, MoveUp, MoveDown, MoveLeftPage, MoveRightPage, PageUp, PageDown, Ignore\n\n");

        // Emit a stable, readable subset of current bindings
        let dump = [
            ("q", KeyAction::Quit),
            ("Esc", KeyAction::Ignore),
            ("/", KeyAction::StartSearch),
            ("f", KeyAction::OpenFilterMenu),
            ("s", KeyAction::OpenSortMenu),
            ("n", KeyAction::NewUser),
            ("e", KeyAction::EditSelection),
            ("Delete", KeyAction::DeleteSelection),
            ("m", KeyAction::LoadMore),
            ("r", KeyAction::Reload),
            ("x", KeyAction::DismissError),
            ("?", KeyAction::OpenHelp),
            ("Enter", KeyAction::EnterAction),
            ("Up", KeyAction::MoveUp),
            ("Down", KeyAction::MoveDown),
            ("Left", KeyAction::MoveLeftPage),
            ("Right", KeyAction::MoveRightPage),
            ("k", KeyAction::MoveUp),
            ("j", KeyAction::MoveDown),
            ("h", KeyAction::MoveLeftPage),
            ("l", KeyAction::MoveRightPage),
            ("PageUp", KeyAction::PageUp),
            ("PageDown", KeyAction::PageDown),
        ];
        for (k, a) in dump {
            let _ = writeln!(&mut buf, "{} = {}", format_action(a), k);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event (modifiers + code) to its bound action, if any.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Format a key (modifiers + code) into a human-readable spec like
    /// "Ctrl+q" or "PageDown".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char('/') => "/".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let mut rest = s;
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = s.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    }
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "/" => Char('/'),
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let chars: Vec<char> = rest.chars().collect();
            if chars.len() == 1 {
                KeyCode::Char(chars[0])
            } else {
                return None;
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    match s.trim() {
        "Quit" => Some(KeyAction::Quit),
        "StartSearch" => Some(KeyAction::StartSearch),
        "OpenFilterMenu" => Some(KeyAction::OpenFilterMenu),
        "OpenSortMenu" => Some(KeyAction::OpenSortMenu),
        "NewUser" => Some(KeyAction::NewUser),
        "EditSelection" => Some(KeyAction::EditSelection),
        "DeleteSelection" => Some(KeyAction::DeleteSelection),
        "LoadMore" => Some(KeyAction::LoadMore),
        "Reload" => Some(KeyAction::Reload),
        "DismissError" => Some(KeyAction::DismissError),
        "OpenHelp" => Some(KeyAction::OpenHelp),
        "EnterAction" => Some(KeyAction::EnterAction),
        "MoveUp" => Some(KeyAction::MoveUp),
        "MoveDown" => Some(KeyAction::MoveDown),
        "MoveLeftPage" => Some(KeyAction::MoveLeftPage),
        "MoveRightPage" => Some(KeyAction::MoveRightPage),
        "PageUp" => Some(KeyAction::PageUp),
        "PageDown" => Some(KeyAction::PageDown),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::OpenFilterMenu => "OpenFilterMenu",
        KeyAction::OpenSortMenu => "OpenSortMenu",
        KeyAction::NewUser => "NewUser",
        KeyAction::EditSelection => "EditSelection",
        KeyAction::DeleteSelection => "DeleteSelection",
        KeyAction::LoadMore => "LoadMore",
        KeyAction::Reload => "Reload",
        KeyAction::DismissError => "DismissError",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::EnterAction => "EnterAction",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::MoveLeftPage => "MoveLeftPage",
        KeyAction::MoveRightPage => "MoveRightPage",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::Ignore => "Ignore",
    }
}
