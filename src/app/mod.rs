//! Application state types and entry glue.
//!
//! Defines the enums and structs that model the TUI state, the theme
//! configuration, and helpers to construct defaults and run the application
//! loop (re-exported as `run`).

pub mod form;
pub mod keymap;
pub mod sync;
pub mod update;

use std::sync::mpsc::{self, Receiver, Sender};

use ratatui::style::Color;

use crate::api::{ApiEvent, DirectoryClient, Role, Status, User};
use crate::app::form::FormState;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Column the visible list is ordered by.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortField {
    FirstName,
    LastName,
    Email,
    Department,
    Role,
    Status,
    CreatedAt,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::FirstName,
        SortField::LastName,
        SortField::Email,
        SortField::Department,
        SortField::Role,
        SortField::Status,
        SortField::CreatedAt,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortField::FirstName => "First name",
            SortField::LastName => "Last name",
            SortField::Email => "Email",
            SortField::Department => "Department",
            SortField::Role => "Role",
            SortField::Status => "Status",
            SortField::CreatedAt => "Added",
        }
    }
}

/// Direction of the user-selected sort.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Settings resolved from the command line before the UI starts.
#[derive(Clone, Debug)]
pub struct Settings {
    pub base_url: String,
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "https://jsonplaceholder.typicode.com".to_string(),
            page_size: 6,
        }
    }
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error_fg: Color,
    pub role_admin: Color,
    pub role_manager: Color,
    pub role_user: Color,
    pub status_active: Color,
    pub status_inactive: Color,
}

impl Theme {
    /// Plain dark theme built from named terminal colors.
    #[allow(dead_code)]
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error_fg: Color::Red,
            role_admin: Color::Magenta,
            role_manager: Color::Yellow,
            role_user: Color::Green,
            status_active: Color::Green,
            status_inactive: Color::Red,
        }
    }

    /// Slate default theme: dark gray chrome with a blue accent, role badges
    /// in purple/yellow/green.
    pub fn slate() -> Self {
        Self {
            text: Color::Rgb(0xe5, 0xe7, 0xeb),
            muted: Color::Rgb(0x9c, 0xa3, 0xaf),
            title: Color::Rgb(0x60, 0xa5, 0xfa),
            border: Color::Rgb(0x37, 0x41, 0x51),
            header_bg: Color::Rgb(0x11, 0x18, 0x27),
            header_fg: Color::Rgb(0x93, 0xc5, 0xfd),
            status_bg: Color::Rgb(0x1f, 0x29, 0x37),
            status_fg: Color::Rgb(0xd1, 0xd5, 0xdb),
            highlight_fg: Color::Rgb(0xf9, 0xfa, 0xfb),
            highlight_bg: Color::Rgb(0x37, 0x41, 0x51),
            error_fg: Color::Rgb(0xf8, 0x71, 0x71),
            role_admin: Color::Rgb(0xc0, 0x84, 0xfc),
            role_manager: Color::Rgb(0xfa, 0xcc, 0x15),
            role_user: Color::Rgb(0x4a, 0xde, 0x80),
            status_active: Color::Rgb(0x4a, 0xde, 0x80),
            status_inactive: Color::Rgb(0xf8, 0x71, 0x71),
        }
    }

    /// Load theme from a simple key=value file. Unknown or missing keys fall
    /// back to `slate`.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::slate();

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "error_fg" => theme.error_fg = color,
                    "role_admin" => theme.role_admin = color,
                    "role_manager" => theme.role_manager = color,
                    "role_user" => theme.role_user = color,
                    "status_active" => theme.status_active = color,
                    "status_inactive" => theme.status_inactive = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or the special name
    /// "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        None
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userdir-manager theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // For named colors, emit a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(i) => format!("index:{}", i),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("error_fg", self.error_fg);
        kv("role_admin", self.role_admin);
        kv("role_manager", self.role_manager);
        kv("role_user", self.role_user);
        kv("status_active", self.status_active);
        kv("status_inactive", self.status_inactive);

        std::fs::write(path, buf)
    }

    /// Ensure a config file exists; if missing, write one with the default
    /// theme and return it. If present, load from it; on parse errors,
    /// return `slate`.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_else(Self::slate);
        }
        if let Some(existing) = config_file_read_path("theme.conf") {
            return Self::from_file(&existing).unwrap_or_else(Self::slate);
        }
        let t = Self::slate();
        let _ = t.write_file(path);
        t
    }
}

/// Resolve a config file name against the user's config directory when it is
/// not present next to the binary.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(std::path::PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|h| std::path::PathBuf::from(h).join(".config"))
        })?;
    let path = base.join("userdir-manager").join(name);
    if path.exists() {
        Some(path.to_string_lossy().into_owned())
    } else {
        None
    }
}

/// Rows of the filter menu, in display order. The update loop maps the
/// chosen index onto the role/status filters.
pub const FILTER_OPTIONS: [&str; 7] = [
    "All roles",
    "Admins only",
    "Managers only",
    "Users only",
    "All statuses",
    "Active only",
    "Inactive only",
];

/// Modal dialog states.
#[derive(Clone, Debug)]
pub enum ModalState {
    /// Menu of operations on the selected record.
    Actions { selected: usize },
    /// Create/edit dialog.
    UserForm { form: FormState },
    FilterMenu { selected: usize },
    SortMenu { selected: usize },
    DeleteConfirm { selected: usize },
    Help,
}

pub struct AppState {
    pub settings: Settings,
    pub client: DirectoryClient,
    pub api_tx: Sender<ApiEvent>,
    pub api_rx: Receiver<ApiEvent>,
    /// Authoritative local copy of the remote collection. Mutated only by
    /// `sync::apply_event` on the UI thread.
    pub users_all: Vec<User>,
    /// Derived sequence actually rendered; recomputed by `view::apply_view`.
    pub users: Vec<User>,
    /// Last page number a successful load delivered.
    pub page: u32,
    /// A full page is assumed to imply more may follow; a short page signals
    /// the end of the data.
    pub has_more: bool,
    pub loading: bool,
    /// Most recent operation failure. Newer failures overwrite it; only an
    /// explicit dismiss clears it.
    pub error: Option<String>,
    pub input_mode: InputMode,
    pub search_query: String,
    /// `None` shows every role.
    pub role_filter: Option<Role>,
    /// `None` shows every status.
    pub status_filter: Option<Status>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    pub modal: Option<ModalState>,
    /// High-water mark for observation timestamps, so `created_at` never
    /// decreases in insertion order even when the wall clock stalls.
    pub observed_at: i64,
}

impl AppState {
    /// Create the state and request the first page from the directory.
    pub fn new(settings: Settings) -> Self {
        let mut app = Self::detached(settings);
        app.theme = Theme::load_or_init("theme.conf");
        app.keymap = keymap::Keymap::load_or_init("keybinds.conf");
        sync::request_page(&mut app, 1);
        app
    }

    /// Create the state without issuing any request and without touching
    /// config files. Used by `new` and by tests.
    pub fn detached(settings: Settings) -> Self {
        let (api_tx, api_rx) = mpsc::channel();
        let client = DirectoryClient::new(settings.base_url.clone());
        Self {
            settings,
            client,
            api_tx,
            api_rx,
            users_all: Vec::new(),
            users: Vec::new(),
            page: 0,
            has_more: true,
            loading: false,
            error: None,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            role_filter: None,
            status_filter: None,
            sort_field: SortField::LastName,
            sort_direction: SortDirection::Ascending,
            selected_index: 0,
            rows_per_page: 10,
            theme: Theme::slate(),
            keymap: keymap::Keymap::new_defaults(),
            modal: None,
            observed_at: 0,
        }
    }

    /// Flip direction when the active sort column is chosen again; otherwise
    /// switch to the new column ascending.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.flipped();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Ascending;
        }
    }

    /// Clear the surfaced error message without affecting any data.
    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.selected_index)
    }

    /// Next observation timestamp: the current wall clock, clamped so the
    /// sequence of stamps never decreases.
    pub fn stamp_observation(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.observed_at = now.max(self.observed_at);
        self.observed_at
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
