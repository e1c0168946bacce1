//! Key normalization
//!
//! TV remotes, keyboards and terminals all report keys differently. Everything
//! downstream of this module only sees [`NavKey`].

use crossterm::event::{KeyCode, KeyEvent, MediaKeyCode};
use phf::phf_map;

use super::geometry::Direction;

/// Logical actions understood by the navigation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Return,
    ChannelUp,
    ChannelDown,
    MediaPlayPause,
    Guide,
}

impl NavKey {
    /// Directional keys map to a [`Direction`]
    pub fn direction(self) -> Option<Direction> {
        match self {
            NavKey::Up => Some(Direction::Up),
            NavKey::Down => Some(Direction::Down),
            NavKey::Left => Some(Direction::Left),
            NavKey::Right => Some(Direction::Right),
            _ => None,
        }
    }
}

static KEY_NAMES: phf::Map<&'static str, NavKey> = phf_map! {
    "ArrowUp" => NavKey::Up,
    "Up" => NavKey::Up,
    "ArrowDown" => NavKey::Down,
    "Down" => NavKey::Down,
    "ArrowLeft" => NavKey::Left,
    "Left" => NavKey::Left,
    "ArrowRight" => NavKey::Right,
    "Right" => NavKey::Right,
    "Enter" => NavKey::Enter,
    "Select" => NavKey::Enter,
    "Return" => NavKey::Return,
    "Escape" => NavKey::Return,
    "Backspace" => NavKey::Return,
    "XF86Back" => NavKey::Return,
    "ChannelUp" => NavKey::ChannelUp,
    "XF86RaiseChannel" => NavKey::ChannelUp,
    "PageUp" => NavKey::ChannelUp,
    "ChannelDown" => NavKey::ChannelDown,
    "XF86LowerChannel" => NavKey::ChannelDown,
    "PageDown" => NavKey::ChannelDown,
    "MediaPlayPause" => NavKey::MediaPlayPause,
    "XF86AudioPlay" => NavKey::MediaPlayPause,
    "XF86PlayBack" => NavKey::MediaPlayPause,
    "MediaPlay" => NavKey::MediaPlayPause,
    "MediaPause" => NavKey::MediaPlayPause,
    "Guide" => NavKey::Guide,
    "Epg" => NavKey::Guide,
    "XF86ChannelGuide" => NavKey::Guide,
};

// Keyboard codes plus the vendor remote codes (10009 Tizen back, 461 webOS back, ...)
static KEY_CODES: phf::Map<u32, NavKey> = phf_map! {
    38u32 => NavKey::Up,
    40u32 => NavKey::Down,
    37u32 => NavKey::Left,
    39u32 => NavKey::Right,
    13u32 => NavKey::Enter,
    10009u32 => NavKey::Return,
    461u32 => NavKey::Return,
    27u32 => NavKey::Return,
    8u32 => NavKey::Return,
    33u32 => NavKey::ChannelUp,
    427u32 => NavKey::ChannelUp,
    34u32 => NavKey::ChannelDown,
    428u32 => NavKey::ChannelDown,
    19u32 => NavKey::MediaPlayPause,
    415u32 => NavKey::MediaPlayPause,
    457u32 => NavKey::Guide,
};

/// A key event as delivered by an input source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawKey {
    pub name: Option<String>,
    pub code: Option<u32>,
}

impl RawKey {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            code: None,
        }
    }

    pub fn code(code: u32) -> Self {
        Self {
            name: None,
            code: Some(code),
        }
    }
}

impl From<&KeyEvent> for RawKey {
    fn from(event: &KeyEvent) -> Self {
        let name = match event.code {
            KeyCode::Up => Some("ArrowUp".to_string()),
            KeyCode::Down => Some("ArrowDown".to_string()),
            KeyCode::Left => Some("ArrowLeft".to_string()),
            KeyCode::Right => Some("ArrowRight".to_string()),
            KeyCode::Enter => Some("Enter".to_string()),
            KeyCode::Esc => Some("Escape".to_string()),
            KeyCode::Backspace => Some("Backspace".to_string()),
            KeyCode::PageUp => Some("PageUp".to_string()),
            KeyCode::PageDown => Some("PageDown".to_string()),
            KeyCode::Media(MediaKeyCode::PlayPause) => Some("MediaPlayPause".to_string()),
            KeyCode::Media(MediaKeyCode::Play) => Some("MediaPlay".to_string()),
            KeyCode::Media(MediaKeyCode::Pause) => Some("MediaPause".to_string()),
            KeyCode::Char(c) => Some(c.to_string()),
            KeyCode::F(n) => Some(format!("F{}", n)),
            _ => None,
        };
        Self { name, code: None }
    }
}

/// Result of normalizing a raw key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Nav(NavKey),
    /// Unrecognized key, passed through by name
    Other(String),
}

/// Map a raw key to a logical action. The name is checked before the code.
pub fn normalize(raw: &RawKey) -> Key {
    if let Some(key) = raw.name.as_deref().and_then(|n| KEY_NAMES.get(n)) {
        return Key::Nav(*key);
    }
    if let Some(key) = raw.code.and_then(|c| KEY_CODES.get(&c)) {
        return Key::Nav(*key);
    }
    Key::Other(
        raw.name
            .clone()
            .or_else(|| raw.code.map(|c| c.to_string()))
            .unwrap_or_default(),
    )
}
