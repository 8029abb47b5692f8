//! Argument and result values carried through the dispatcher.

use std::fmt;

/// Positional handler argument or handler result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Int(i64),
    Bool(bool),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view; numeric strings are accepted so command-line style
    /// arguments (`_cursor_reposition_ main 3 4`) work unchanged.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            Value::Str(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Value::Str(s) => s.as_bytes(),
            Value::Bytes(b) => b,
            Value::Int(_) | Value::Bool(_) => &[],
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

/// Control-flow signal raised by a handler and interpreted by the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Toggle the terminal between raw and cooked mode.
    ModeSwitch,
    /// Leave the main loop.
    Exit,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::ModeSwitch => "mode_switch",
            Signal::Exit => "exit",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single handler hands back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Reply {
    #[default]
    None,
    Value(Value),
    Signal(Signal),
}

/// Combined result of one trigger across all handlers that ran.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    pub values: Vec<Value>,
    pub signal: Option<Signal>,
    /// Set when the trigger only (re)armed a debounce timer.
    pub deferred: bool,
}

impl Outcome {
    pub fn signalled(&self) -> bool {
        self.signal.is_some()
    }

    pub fn last_value(&self) -> Option<&Value> {
        self.values.last()
    }
}

/// Lets a handler that cascades into another trigger pass the nested
/// result straight back: a nested signal wins, otherwise the last value.
impl From<Outcome> for Reply {
    fn from(outcome: Outcome) -> Self {
        match outcome.signal {
            Some(signal) => Reply::Signal(signal),
            None => outcome.values.into_iter().last().map_or(Reply::None, Reply::Value),
        }
    }
}
