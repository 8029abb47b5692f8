//! Text attributes.

use crate::BuildError;
use bitflags::bitflags;

bitflags! {
    /// Attribute set applied to a cell. The empty set is "normal".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Style: u8 {
        const BOLD      = 0b0000_0001;
        const DIM       = 0b0000_0010;
        const UNDERLINE = 0b0000_0100;
        const BLINK     = 0b0000_1000;
        const NEGATIVE  = 0b0001_0000;
    }
}

/// Attributes switched off by a style change: underline off, normal
/// intensity, positive image, blink off.
pub const NORMAL_SGR: &str = "\x1b[24m\x1b[22m\x1b[27m\x1b[25m";

impl Style {
    /// Accepts attribute names as written in layouts (`bold`, `underline`,
    /// `negative`, `normal`, ...).
    pub fn parse_name(name: &str) -> Result<Self, BuildError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bold" => Ok(Self::BOLD),
            "dim" => Ok(Self::DIM),
            "underline" => Ok(Self::UNDERLINE),
            "blink" => Ok(Self::BLINK),
            "negative" | "reverse" => Ok(Self::NEGATIVE),
            "normal" | "positive" => Ok(Self::empty()),
            _ => Err(BuildError::UnknownStyle(name.to_string())),
        }
    }

    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Self, BuildError> {
        names
            .iter()
            .try_fold(Self::empty(), |acc, name| Ok(acc | Self::parse_name(name.as_ref())?))
    }

    /// Resets every attribute then switches on the ones in the set, so the
    /// sequence is correct regardless of the previously emitted style.
    pub fn escape(&self) -> String {
        let mut out = String::from(NORMAL_SGR);
        for (flag, code) in [
            (Self::BOLD, "\x1b[1m"),
            (Self::DIM, "\x1b[2m"),
            (Self::UNDERLINE, "\x1b[4m"),
            (Self::BLINK, "\x1b[5m"),
            (Self::NEGATIVE, "\x1b[7m"),
        ] {
            if self.contains(flag) {
                out.push_str(code);
            }
        }
        out
    }
}
