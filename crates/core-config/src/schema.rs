//! `termpane.toml` layout. Every table and field is optional; unknown
//! fields are ignored.

use core_geometry::{Border, Glyphs, GeometrySpec};
use core_model::RegionSpec;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    pub terminal: TerminalConfig,
    pub events: EventsConfig,
    pub render: RenderConfig,
    pub remote: RemoteConfig,
    pub log: LogConfig,
    #[serde(rename = "region")]
    pub regions: Vec<RegionConfig>,
}

#[derive(Debug, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModeName {
    #[default]
    Raw,
    Cooked,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TerminalConfig {
    pub mode: ModeName,
    /// Fixed canvas rows instead of the terminal's.
    pub height: Option<u16>,
    pub width: Option<u16>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EventsConfig {
    pub resize_delay_ms: u64,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            resize_delay_ms: 150,
        }
    }
}

impl EventsConfig {
    pub fn resize_delay(&self) -> Duration {
        Duration::from_millis(self.resize_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendName {
    Terminal,
    Null,
    Capture,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RenderConfig {
    pub backends: Vec<BackendName>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backends: vec![BackendName::Terminal],
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RemoteConfig {
    pub enabled: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    pub path: PathBuf,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("termpane.log"),
            filter: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ColourConfig {
    pub foreground: Option<String>,
    pub background: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BorderConfig {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
    pub title: Option<String>,
    pub horizontal: Option<char>,
    pub vertical: Option<char>,
    pub top_left: Option<char>,
    pub top_right: Option<char>,
    pub bottom_left: Option<char>,
    pub bottom_right: Option<char>,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            top: true,
            bottom: true,
            left: true,
            right: true,
            title: None,
            horizontal: None,
            vertical: None,
            top_left: None,
            top_right: None,
            bottom_left: None,
            bottom_right: None,
        }
    }
}

impl BorderConfig {
    pub fn to_border(&self) -> Border {
        let defaults = Glyphs::default();
        Border {
            top: self.top,
            bottom: self.bottom,
            left: self.left,
            right: self.right,
            glyphs: Glyphs {
                top_left: self.top_left.unwrap_or(defaults.top_left),
                top_right: self.top_right.unwrap_or(defaults.top_right),
                bottom_left: self.bottom_left.unwrap_or(defaults.bottom_left),
                bottom_right: self.bottom_right.unwrap_or(defaults.bottom_right),
                horizontal: self.horizontal.unwrap_or(defaults.horizontal),
                vertical: self.vertical.unwrap_or(defaults.vertical),
            },
            title: self.title.clone(),
            ..Border::enabled()
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RegionConfig {
    pub name: String,
    pub group: Option<String>,
    pub y: Option<i32>,
    pub yn: Option<i32>,
    pub x: Option<i32>,
    pub xn: Option<i32>,
    pub height: Option<i32>,
    pub width: Option<i32>,
    pub centred: bool,
    pub maximised: bool,
    pub colour: ColourConfig,
    pub style: Vec<String>,
    pub cursor_visible: bool,
    pub delay_ms: u64,
    pub lines: Vec<String>,
    pub border: Option<BorderConfig>,
}

impl RegionConfig {
    /// The declarative spec; validation happens when it is built.
    pub fn to_spec(&self) -> RegionSpec {
        let mut spec = RegionSpec::new(self.name.clone())
            .geometry(GeometrySpec {
                y: self.y,
                yn: self.yn,
                x: self.x,
                xn: self.xn,
                height: self.height,
                width: self.width,
                centred: self.centred,
                maximised: self.maximised,
            })
            .colour(
                self.colour.foreground.as_deref(),
                self.colour.background.as_deref(),
            )
            .cursor_visible(self.cursor_visible)
            .delay(Duration::from_millis(self.delay_ms))
            .lines(&self.lines);
        spec.style = self.style.clone();
        if let Some(group) = &self.group {
            spec = spec.group(group.clone());
        }
        if let Some(border) = &self.border {
            spec = spec.border(border.to_border());
        }
        spec
    }
}
