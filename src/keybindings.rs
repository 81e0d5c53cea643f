//! Keybinding registry: maps (context, key) to actions with config overrides.
//!
//! Default bindings are registered in one place; users remap actions through
//! the `[keybindings]` table of config.toml.
use crossterm::event::{KeyCode, KeyModifiers};
use std::collections::HashMap;

// ============================================================================
// Action Enum
// ============================================================================

/// All user-facing actions that can be triggered by keybindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    NavDown,
    NavUp,
    NavTop,
    NavBottom,
    Back,
    ShowDetails,
    Refresh,
    EnterSearch,
    ExitSearch,
    CommitSearch,
    NextCategory,
    PrevCategory,
    /// Jump to a category selector position (0 = All).
    SelectCategory(u8),
    DeleteApp,
    CycleTheme,
    ShowHelp,
}

impl Action {
    /// Human-readable description for the help screen.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Quit => "Quit application",
            Self::NavDown => "Select next app",
            Self::NavUp => "Select previous app",
            Self::NavTop => "Jump to first app",
            Self::NavBottom => "Jump to last app",
            Self::Back => "Close popup / clear search",
            Self::ShowDetails => "Show app details",
            Self::Refresh => "Reload catalog",
            Self::EnterSearch => "Search apps",
            Self::ExitSearch => "Clear search",
            Self::CommitSearch => "Apply search now",
            Self::NextCategory => "Next category",
            Self::PrevCategory => "Previous category",
            Self::SelectCategory(0) => "Show all categories",
            Self::SelectCategory(_) => "Pick category",
            Self::DeleteApp => "Remove app (local only)",
            Self::CycleTheme => "Cycle theme",
            Self::ShowHelp => "Show help",
        }
    }
}

// ============================================================================
// Context Enum
// ============================================================================

/// Dispatch context: determines which bindings are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Context {
    Global,
    Search,
    Details,
}

impl Context {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Browse",
            Self::Search => "Search",
            Self::Details => "Details",
        }
    }
}

// ============================================================================
// Key Specification
// ============================================================================

/// A key event: code + modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeySpec {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeySpec {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub const fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub const fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    pub const fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    /// Drop SHIFT from character keys and BackTab; the key code already carries it.
    fn normalized(self) -> Self {
        match self.code {
            KeyCode::Char(_) | KeyCode::BackTab => {
                Self::new(self.code, self.modifiers.difference(KeyModifiers::SHIFT))
            }
            _ => self,
        }
    }
}

/// Parse a key string from config into a KeySpec.
///
/// Supported formats:
/// - Single char: "q", "j", "/"
/// - Named keys: "Enter", "Esc", "Tab", "Up", "Down", "Home", "End", "Backspace"
/// - Modifier combos: "Ctrl+r"
/// - Function keys: "F1" through "F12"
fn parse_key_string(s: &str) -> Option<KeySpec> {
    let s = s.trim();

    if let Some(rest) = s.strip_prefix("Ctrl+") {
        let mut chars = rest.trim().chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) => Some(KeySpec::ctrl(c)),
            _ => None,
        };
    }

    let named = match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "backtab" | "shift+tab" => Some(KeyCode::BackTab),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "backspace" => Some(KeyCode::Backspace),
        "space" => Some(KeyCode::Char(' ')),
        _ => None,
    };
    if let Some(code) = named {
        return Some(KeySpec::plain(code));
    }

    if let Some(n) = s
        .strip_prefix(['F', 'f'])
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (1..=12)
            .contains(&n)
            .then(|| KeySpec::plain(KeyCode::F(n)));
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeySpec::char(c)),
        _ => None,
    }
}

/// Format a KeySpec as a human-readable string for the help screen.
fn format_key(key: &KeySpec) -> String {
    let modifier = if key.modifiers.contains(KeyModifiers::CONTROL) {
        "Ctrl+"
    } else {
        ""
    };

    let key_name = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => "?".to_string(),
    };

    format!("{}{}", modifier, key_name)
}

// ============================================================================
// Keybinding Registry
// ============================================================================

/// Registry of keybindings, supporting default bindings and config overrides.
///
/// The same key can map to different actions in different contexts; lookups
/// fall back to `Global` when the active context has no binding.
pub struct KeybindingRegistry {
    lookup: HashMap<(Context, KeySpec), Action>,
    /// All bindings in registration order, for the help screen
    bindings: Vec<(Context, KeySpec, Action)>,
}

impl KeybindingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            lookup: HashMap::new(),
            bindings: Vec::new(),
        };
        registry.register_defaults();
        registry
    }

    fn bind(&mut self, context: Context, key: KeySpec, action: Action) {
        self.lookup.insert((context, key), action);
        self.bindings.push((context, key, action));
    }

    fn register_defaults(&mut self) {
        use Context::{Details, Global, Search};

        // === Browse ===
        self.bind(Global, KeySpec::char('q'), Action::Quit);

        self.bind(Global, KeySpec::char('j'), Action::NavDown);
        self.bind(Global, KeySpec::plain(KeyCode::Down), Action::NavDown);
        self.bind(Global, KeySpec::char('k'), Action::NavUp);
        self.bind(Global, KeySpec::plain(KeyCode::Up), Action::NavUp);
        self.bind(Global, KeySpec::char('g'), Action::NavTop);
        self.bind(Global, KeySpec::plain(KeyCode::Home), Action::NavTop);
        self.bind(Global, KeySpec::char('G'), Action::NavBottom);
        self.bind(Global, KeySpec::plain(KeyCode::End), Action::NavBottom);

        self.bind(Global, KeySpec::plain(KeyCode::Enter), Action::ShowDetails);
        self.bind(Global, KeySpec::plain(KeyCode::Esc), Action::Back);

        self.bind(Global, KeySpec::char('r'), Action::Refresh);
        self.bind(Global, KeySpec::plain(KeyCode::F(5)), Action::Refresh);
        self.bind(Global, KeySpec::ctrl('r'), Action::Refresh);

        self.bind(Global, KeySpec::char('/'), Action::EnterSearch);

        self.bind(Global, KeySpec::char('c'), Action::NextCategory);
        self.bind(Global, KeySpec::plain(KeyCode::Tab), Action::NextCategory);
        self.bind(Global, KeySpec::char('C'), Action::PrevCategory);
        self.bind(Global, KeySpec::plain(KeyCode::BackTab), Action::PrevCategory);
        for (n, digit) in ('0'..='5').enumerate() {
            self.bind(Global, KeySpec::char(digit), Action::SelectCategory(n as u8));
        }

        self.bind(Global, KeySpec::char('d'), Action::DeleteApp);
        self.bind(Global, KeySpec::char('T'), Action::CycleTheme);
        self.bind(Global, KeySpec::char('?'), Action::ShowHelp);

        // === Details popup ===
        self.bind(Details, KeySpec::plain(KeyCode::Esc), Action::Back);
        self.bind(Details, KeySpec::plain(KeyCode::Enter), Action::Back);
        self.bind(Details, KeySpec::char('q'), Action::Back);

        // === Search mode ===
        self.bind(Search, KeySpec::plain(KeyCode::Esc), Action::ExitSearch);
        self.bind(Search, KeySpec::plain(KeyCode::Enter), Action::CommitSearch);
        self.bind(Search, KeySpec::plain(KeyCode::Tab), Action::NextCategory);
        self.bind(Search, KeySpec::plain(KeyCode::BackTab), Action::PrevCategory);
        self.bind(Search, KeySpec::plain(KeyCode::Down), Action::NavDown);
        self.bind(Search, KeySpec::plain(KeyCode::Up), Action::NavUp);
        self.bind(Search, KeySpec::ctrl('r'), Action::Refresh);
    }

    /// Apply user overrides from the config keybindings map.
    ///
    /// Keys in the map are action names (e.g., "quit", "nav_down").
    /// Values are key strings (e.g., "q", "Ctrl+r", "F5").
    ///
    /// Returns a list of warnings for unrecognized action names or unparseable keys.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();

        for (action_name, key_str) in overrides {
            let Some(action) = parse_action_name(action_name) else {
                warnings.push(format!("Unknown action '{}', ignoring", action_name));
                continue;
            };

            let Some(key) = parse_key_string(key_str) else {
                warnings.push(format!(
                    "Cannot parse key '{}' for action '{}', ignoring",
                    key_str, action_name
                ));
                continue;
            };

            let mut contexts: Vec<Context> = Vec::new();
            for (ctx, _, a) in &self.bindings {
                if *a == action && !contexts.contains(ctx) {
                    contexts.push(*ctx);
                }
            }
            if contexts.is_empty() {
                contexts.push(Context::Global);
            }

            self.lookup.retain(|_, a| *a != action);
            self.bindings.retain(|(_, _, a)| *a != action);

            for ctx in contexts {
                self.bind(ctx, key, action);
            }

            tracing::info!(
                action = %action_name,
                key = %key_str,
                "Applied keybinding override"
            );
        }

        warnings
    }

    /// Look up the action for a key, trying `context` first and then `Global`.
    pub fn action_for_key(
        &self,
        code: KeyCode,
        modifiers: KeyModifiers,
        context: Context,
    ) -> Option<Action> {
        let key = KeySpec::new(code, modifiers).normalized();

        if let Some(&action) = self.lookup.get(&(context, key)) {
            return Some(action);
        }

        // Search mode types characters into the query, so only Global
        // bindings with a modifier or a non-character key apply there.
        let typed_char = matches!(key.code, KeyCode::Char(_)) && key.modifiers.is_empty();
        if context == Context::Search && typed_char {
            return None;
        }

        if context != Context::Global {
            return self.lookup.get(&(Context::Global, key)).copied();
        }

        None
    }

    /// All bindings for the help screen as (context, key label, description).
    pub fn all_bindings(&self) -> Vec<(Context, String, &'static str)> {
        self.bindings
            .iter()
            .map(|(ctx, key, action)| (*ctx, format_key(key), action.describe()))
            .collect()
    }
}

impl Default for KeybindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse an action name string (from config) into an Action.
fn parse_action_name(name: &str) -> Option<Action> {
    let name = name.to_lowercase();
    if let Some(n) = name
        .strip_prefix("category_")
        .and_then(|rest| rest.parse::<u8>().ok())
    {
        return (n <= 5).then_some(Action::SelectCategory(n));
    }

    match name.as_str() {
        "quit" => Some(Action::Quit),
        "nav_down" | "navdown" | "down" => Some(Action::NavDown),
        "nav_up" | "navup" | "up" => Some(Action::NavUp),
        "nav_top" | "top" => Some(Action::NavTop),
        "nav_bottom" | "bottom" => Some(Action::NavBottom),
        "back" => Some(Action::Back),
        "show_details" | "details" | "select" => Some(Action::ShowDetails),
        "refresh" | "reload" => Some(Action::Refresh),
        "enter_search" | "search" => Some(Action::EnterSearch),
        "exit_search" | "clear_search" => Some(Action::ExitSearch),
        "commit_search" => Some(Action::CommitSearch),
        "next_category" | "category" => Some(Action::NextCategory),
        "prev_category" => Some(Action::PrevCategory),
        "delete_app" | "delete" => Some(Action::DeleteApp),
        "cycle_theme" | "theme" => Some(Action::CycleTheme),
        "show_help" | "help" => Some(Action::ShowHelp),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
