//! Key names.
//!
//! Every keypress is reduced to a stable name before it reaches the keymap:
//! printable characters name themselves (`a`, `Q`, `é`), space is `space`,
//! special keys use lowercase words (`up`, `page_down`, `f5`), control
//! chords are `ctrl_<letter>` and alt chords `alt_<char>`.
//!
//! Two decoders produce the same names: [`decode`] / [`decode_all`] for raw
//! terminal bytes and [`key_name`] for crossterm key events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

const ESC: u8 = 0x1b;

/// Name of the single keypress encoded by `bytes`.
///
/// Returns `None` for empty input, unknown escape sequences and input that
/// holds more than one key.
pub fn decode(bytes: &[u8]) -> Option<String> {
    let (name, used) = next_key(bytes)?;
    (used == bytes.len()).then_some(name).flatten()
}

/// Split a byte stream into key names. Unknown escape sequences are
/// consumed and skipped; invalid UTF-8 bytes are skipped one at a time.
pub fn decode_all(bytes: &[u8]) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = bytes;
    while let Some((name, used)) = next_key(rest) {
        out.extend(name);
        rest = &rest[used..];
    }
    out
}

/// Decode one key from the front of `bytes`, returning its name (if known)
/// and the number of bytes it occupied.
fn next_key(bytes: &[u8]) -> Option<(Option<String>, usize)> {
    let first = *bytes.first()?;
    if first == ESC {
        return Some(escape_sequence(bytes));
    }
    if let Some(name) = control_byte(first) {
        return Some((Some(name), 1));
    }
    let len = utf8_len(first);
    let decoded = bytes
        .get(..len)
        .and_then(|chunk| std::str::from_utf8(chunk).ok());
    Some(match decoded {
        Some(" ") => (Some("space".to_string()), len),
        Some(s) => (Some(s.to_string()), len),
        None => (None, 1),
    })
}

fn utf8_len(lead: u8) -> usize {
    match lead {
        0xf0..=0xf7 => 4,
        0xe0..=0xef => 3,
        0xc0..=0xdf => 2,
        _ => 1,
    }
}

fn control_byte(byte: u8) -> Option<String> {
    let name = match byte {
        b'\r' | b'\n' => "enter",
        b'\t' => "tab",
        0x7f | 0x08 => "backspace",
        0x00 => "ctrl_space",
        0x01..=0x1a => return Some(format!("ctrl_{}", char::from(b'a' + byte - 1))),
        0x1c..=0x1f => return Some(format!("ctrl_{}", char::from(b'4' + byte - 0x1c))),
        _ => return None,
    };
    Some(name.to_string())
}

/// `bytes[0]` is ESC.
fn escape_sequence(bytes: &[u8]) -> (Option<String>, usize) {
    match bytes.get(1) {
        None => (Some("escape".to_string()), 1),
        Some(b'[') => csi(bytes),
        Some(b'O') => match bytes.get(2) {
            Some(&final_byte) => (ss3_name(final_byte).map(str::to_string), 3),
            None => (Some("alt_O".to_string()), 2),
        },
        Some(&ESC) => (Some("escape".to_string()), 1),
        Some(_) => match next_key(&bytes[1..]) {
            Some((Some(name), used)) if name.chars().count() == 1 => {
                (Some(format!("alt_{name}")), used + 1)
            }
            Some((name, used)) => (name, used + 1),
            None => (Some("escape".to_string()), 1),
        },
    }
}

/// `ESC [ params final`; the final byte is in `0x40..=0x7e`.
fn csi(bytes: &[u8]) -> (Option<String>, usize) {
    let body = &bytes[2..];
    let Some(end) = body.iter().position(|b| (0x40..=0x7e).contains(b)) else {
        return (None, bytes.len());
    };
    let params = &body[..end];
    let final_byte = body[end];
    let name = match (params, final_byte) {
        (b"", b'A') => Some("up"),
        (b"", b'B') => Some("down"),
        (b"", b'C') => Some("right"),
        (b"", b'D') => Some("left"),
        (b"", b'H') => Some("home"),
        (b"", b'F') => Some("end"),
        (b"", b'Z') => Some("shift_tab"),
        (_, b'~') => tilde_name(params),
        _ => None,
    };
    (name.map(str::to_string), end + 3)
}

fn ss3_name(final_byte: u8) -> Option<&'static str> {
    match final_byte {
        b'A' => Some("up"),
        b'B' => Some("down"),
        b'C' => Some("right"),
        b'D' => Some("left"),
        b'H' => Some("home"),
        b'F' => Some("end"),
        b'P' => Some("f1"),
        b'Q' => Some("f2"),
        b'R' => Some("f3"),
        b'S' => Some("f4"),
        _ => None,
    }
}

fn tilde_name(params: &[u8]) -> Option<&'static str> {
    let name = match params {
        b"1" | b"7" => "home",
        b"2" => "insert",
        b"3" => "delete",
        b"4" | b"8" => "end",
        b"5" => "page_up",
        b"6" => "page_down",
        b"11" => "f1",
        b"12" => "f2",
        b"13" => "f3",
        b"14" => "f4",
        b"15" => "f5",
        b"17" => "f6",
        b"18" => "f7",
        b"19" => "f8",
        b"20" => "f9",
        b"21" => "f10",
        b"23" => "f11",
        b"24" => "f12",
        _ => return None,
    };
    Some(name)
}

/// Name of a crossterm key event, matching [`decode`]'s naming.
pub fn key_name(event: &KeyEvent) -> Option<String> {
    let mods = event.modifiers;
    let name = match event.code {
        KeyCode::Char(c) if mods.contains(KeyModifiers::CONTROL) => {
            if c == ' ' {
                "ctrl_space".to_string()
            } else {
                format!("ctrl_{}", c.to_ascii_lowercase())
            }
        }
        KeyCode::Char(' ') if mods.contains(KeyModifiers::ALT) => "alt_space".to_string(),
        KeyCode::Char(c) if mods.contains(KeyModifiers::ALT) => format!("alt_{c}"),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "escape".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "shift_tab".to_string(),
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Home => "home".to_string(),
        KeyCode::End => "end".to_string(),
        KeyCode::PageUp => "page_up".to_string(),
        KeyCode::PageDown => "page_down".to_string(),
        KeyCode::Insert => "insert".to_string(),
        KeyCode::Delete => "delete".to_string(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };
    Some(name)
}

/// The character a key name stands for when typed into a line, if any.
pub fn printable(name: &str) -> Option<char> {
    if name == "space" {
        return Some(' ');
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_control() => Some(c),
        _ => None,
    }
}
