//! Foreground/background colour pairs.

use crate::BuildError;
use std::fmt;

/// A single terminal colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColourValue {
    /// 24-bit colour written as `#rrggbb`.
    Rgb(u8, u8, u8),
    /// One of the eight basic ANSI colours (0 = black .. 7 = white).
    Named(u8),
    /// The terminal's own default colour.
    Default,
}

const NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

impl ColourValue {
    pub fn parse(input: &str) -> Result<Self, BuildError> {
        let trimmed = input.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| BuildError::InvalidColour(input.to_string()));
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower == "default" {
            return Ok(Self::Default);
        }
        NAMES
            .iter()
            .position(|name| *name == lower)
            .map(|idx| Self::Named(idx as u8))
            .ok_or_else(|| BuildError::InvalidColour(input.to_string()))
    }

    fn sgr(&self, layer: Layer) -> String {
        let (rgb, base, default) = match layer {
            Layer::Foreground => (38, 30, 39),
            Layer::Background => (48, 40, 49),
        };
        match self {
            Self::Rgb(r, g, b) => format!("\x1b[{rgb};2;{r};{g};{b}m"),
            Self::Named(n) => format!("\x1b[{}m", base + u16::from(*n)),
            Self::Default => format!("\x1b[{default}m"),
        }
    }
}

fn parse_hex(hex: &str) -> Option<ColourValue> {
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(ColourValue::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[derive(Clone, Copy)]
enum Layer {
    Foreground,
    Background,
}

/// Colour pair attached to cells, streams, lines and regions. An unset side
/// inherits from the enclosing element when content is flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub foreground: Option<ColourValue>,
    pub background: Option<ColourValue>,
}

impl Colour {
    pub const fn new(foreground: Option<ColourValue>, background: Option<ColourValue>) -> Self {
        Self {
            foreground,
            background,
        }
    }

    /// Terminal default on both sides.
    pub const fn terminal_default() -> Self {
        Self::new(Some(ColourValue::Default), Some(ColourValue::Default))
    }

    pub fn parse(foreground: Option<&str>, background: Option<&str>) -> Result<Self, BuildError> {
        Ok(Self {
            foreground: foreground.map(ColourValue::parse).transpose()?,
            background: background.map(ColourValue::parse).transpose()?,
        })
    }

    /// Fill unset sides from `parent`.
    pub fn inherit(self, parent: Colour) -> Colour {
        Colour {
            foreground: self.foreground.or(parent.foreground),
            background: self.background.or(parent.background),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.foreground.is_none() && self.background.is_none()
    }

    /// Both sides set, unset ones as the terminal default. Two colours
    /// with equal resolved forms write identical sequences.
    pub fn resolved(self) -> Colour {
        self.inherit(Self::terminal_default())
    }

    /// SGR sequence selecting this pair. Unset sides emit the terminal
    /// default so a colour change never leaves the previous side behind.
    pub fn escape(&self) -> String {
        let resolved = self.resolved();
        let mut out = resolved
            .foreground
            .unwrap_or(ColourValue::Default)
            .sgr(Layer::Foreground);
        out.push_str(
            &resolved
                .background
                .unwrap_or(ColourValue::Default)
                .sgr(Layer::Background),
        );
        out
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.escape())
    }
}
