use ratatui::style::Color;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use xdg::BaseDirectories;

use crate::nav::ScrollSettings;

/// Environment variable that overrides `[api] api_key`
pub const API_KEY_ENV: &str = "TOUCHLINE_API_KEY";

/// Terminal rows are laid out as this many scroll units
pub const UNITS_PER_ROW: f64 = 20.0;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub log_file: String,
    /// Identity used to load and save the user profile
    pub user_id: String,
    /// Live poll period in seconds
    pub refresh_interval: u32,
    /// Poll only when a rendered match kicks off within this many minutes
    pub lookahead_minutes: u32,
    pub alert_duration_secs: u32,
    /// League ids whose live matches are always relevant
    pub allowed_leagues: Vec<i64>,
    pub api: ApiConfig,
    pub scroll: ScrollConfig,
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScrollConfig {
    pub rate_px_per_sec: f64,
    pub debounce_ms: u64,
    pub release_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub focus_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub live_fg: Color,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            log_file: "/dev/null".to_string(),
            user_id: "default".to_string(),
            refresh_interval: 30,
            lookahead_minutes: 5,
            alert_duration_secs: 10,
            allowed_leagues: Vec::new(),
            api: ApiConfig::default(),
            scroll: ScrollConfig::default(),
            theme: ThemeConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "https://v3.football.api-sports.io".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    /// API key from the environment, falling back to the config file
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key.clone())
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        ScrollConfig {
            rate_px_per_sec: 650.0,
            debounce_ms: 25,
            release_timeout_ms: 600,
        }
    }
}

impl ScrollConfig {
    /// Settings for a view tree measured in terminal rows
    pub fn settings(&self) -> ScrollSettings {
        ScrollSettings {
            rate_per_sec: self.rate_px_per_sec / UNITS_PER_ROW,
            debounce_ms: self.debounce_ms,
            release_timeout_ms: self.release_timeout_ms,
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        ThemeConfig {
            focus_fg: Color::Rgb(255, 165, 0), // Orange
            live_fg: Color::Red,
        }
    }
}

/// Deserialize a color from a string (supports named colors, RGB hex, or RGB tuple)
fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color(&s).ok_or_else(|| serde::de::Error::custom(format!("Invalid color: {}", s)))
}

/// Parse a color string into a ratatui Color
/// Supports:
/// - Named colors: "red", "blue", "cyan", "orange", etc.
/// - Hex colors: "#FF6600", "#f60"
/// - RGB tuples: "255,165,0"
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "black" => return Some(Color::Black),
        "red" => return Some(Color::Red),
        "green" => return Some(Color::Green),
        "yellow" => return Some(Color::Yellow),
        "blue" => return Some(Color::Blue),
        "magenta" => return Some(Color::Magenta),
        "cyan" => return Some(Color::Cyan),
        "gray" | "grey" => return Some(Color::Gray),
        "darkgray" | "darkgrey" => return Some(Color::DarkGray),
        "white" => return Some(Color::White),
        "orange" => return Some(Color::Rgb(255, 165, 0)),
        _ => {}
    }

    if let Some(hex) = s.strip_prefix('#') {
        return match hex.len() {
            6 => Some(Color::Rgb(
                u8::from_str_radix(&hex[0..2], 16).ok()?,
                u8::from_str_radix(&hex[2..4], 16).ok()?,
                u8::from_str_radix(&hex[4..6], 16).ok()?,
            )),
            3 => Some(Color::Rgb(
                u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?,
                u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?,
                u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?,
            )),
            _ => None,
        };
    }

    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() == 3 {
        let r = parts[0].trim().parse::<u8>().ok()?;
        let g = parts[1].trim().parse::<u8>().ok()?;
        let b = parts[2].trim().parse::<u8>().ok()?;
        return Some(Color::Rgb(r, g, b));
    }

    None
}

fn base_dirs() -> BaseDirectories {
    BaseDirectories::with_prefix(env!("CARGO_PKG_NAME"))
}

pub fn get_config_path() -> Option<PathBuf> {
    let config_home = base_dirs().get_config_home()?;
    Some(config_home.join("config.toml"))
}

/// Directory holding persisted user profiles
pub fn get_profiles_dir() -> Option<PathBuf> {
    let data_home = base_dirs().get_data_home()?;
    Some(data_home.join("profiles"))
}

pub fn read() -> Config {
    let config_path = match get_config_path() {
        Some(path) => path,
        None => return Config::default(),
    };

    if !config_path.exists() {
        return Config::default();
    }

    let content = match fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };

    toml::from_str(&content).unwrap_or_else(|e| {
        tracing::warn!("Invalid config file {}: {}", config_path.display(), e);
        Config::default()
    })
}
