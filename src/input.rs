//! Key handling: maps terminal key events to game commands
//!
//! Held keys rely on the terminal's own auto-repeat; every press event
//! produces at most one command.

use blockfall::settings::{KeyBindings, PlayerKeys};
use blockfall::{EventType, PlayerId};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

/// What a key press asks the driver to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(PlayerId, EventType),
    TogglePause,
    NewGame,
    ToggleVersus,
    ToggleDifficulty,
    Quit,
}

#[derive(Debug, Clone)]
struct PlayerKeyCodes {
    left: Vec<KeyCode>,
    right: Vec<KeyCode>,
    down: Vec<KeyCode>,
    rotate: Vec<KeyCode>,
}

impl PlayerKeyCodes {
    fn from_settings(keys: &PlayerKeys) -> Self {
        Self {
            left: parse_keys(&keys.left),
            right: parse_keys(&keys.right),
            down: parse_keys(&keys.down),
            rotate: parse_keys(&keys.rotate),
        }
    }

    fn event_for(&self, code: KeyCode) -> Option<EventType> {
        if self.left.contains(&code) {
            Some(EventType::Left)
        } else if self.right.contains(&code) {
            Some(EventType::Right)
        } else if self.down.contains(&code) {
            Some(EventType::Down)
        } else if self.rotate.contains(&code) {
            Some(EventType::Rotate)
        } else {
            None
        }
    }
}

/// Parsed key bindings
#[derive(Debug, Clone)]
pub struct KeyMap {
    player_one: PlayerKeyCodes,
    player_two: PlayerKeyCodes,
    pause: Vec<KeyCode>,
    new_game: Vec<KeyCode>,
    versus: Vec<KeyCode>,
    difficulty: Vec<KeyCode>,
    quit: Vec<KeyCode>,
}

impl KeyMap {
    /// Create a key map from settings
    pub fn from_settings(keys: &KeyBindings) -> Self {
        Self {
            player_one: PlayerKeyCodes::from_settings(&keys.player_one),
            player_two: PlayerKeyCodes::from_settings(&keys.player_two),
            pause: parse_keys(&keys.pause),
            new_game: parse_keys(&keys.new_game),
            versus: parse_keys(&keys.versus),
            difficulty: parse_keys(&keys.difficulty),
            quit: parse_keys(&keys.quit),
        }
    }

    /// Command for a key press; player two's keys only count in versus mode
    pub fn command_for(&self, key: KeyEvent, versus: bool) -> Option<Command> {
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Command::Quit);
        }

        let code = normalize_key(key.code);

        if let Some(kind) = self.player_one.event_for(code) {
            return Some(Command::Move(PlayerId::One, kind));
        }
        if versus {
            if let Some(kind) = self.player_two.event_for(code) {
                return Some(Command::Move(PlayerId::Two, kind));
            }
        }

        if self.pause.contains(&code) {
            Some(Command::TogglePause)
        } else if self.new_game.contains(&code) {
            Some(Command::NewGame)
        } else if self.versus.contains(&code) {
            Some(Command::ToggleVersus)
        } else if self.difficulty.contains(&code) {
            Some(Command::ToggleDifficulty)
        } else if self.quit.contains(&code) {
            Some(Command::Quit)
        } else {
            None
        }
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::from_settings(&KeyBindings::default())
    }
}

/// Parse a key string into KeyCode
fn parse_key(s: &str) -> Option<KeyCode> {
    let lower = s.to_lowercase();
    let code = match lower.as_str() {
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "esc" | "escape" => KeyCode::Esc,
        _ => {
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

/// Parse a list of key strings, skipping any that are not recognised
fn parse_keys(keys: &[String]) -> Vec<KeyCode> {
    keys.iter()
        .filter_map(|s| {
            let code = parse_key(s);
            if code.is_none() {
                warn!("Ignoring unknown key binding '{}'", s);
            }
            code
        })
        .collect()
}

/// Normalize key codes for consistent handling
fn normalize_key(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}
