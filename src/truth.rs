//! The `t` / `nil` truth symbols
//!
//! Results cross the library boundary as the two Lisp symbols rather than as
//! `true`/`false`. Internally everything is a `bool`; this type only exists at
//! the edges (batch output, REPL, assignment text).

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Truth {
    T,
    Nil,
}

impl Truth {
    pub fn as_bool(self) -> bool {
        matches!(self, Truth::T)
    }
}

impl From<bool> for Truth {
    fn from(value: bool) -> Self {
        if value {
            Truth::T
        } else {
            Truth::Nil
        }
    }
}

impl From<Truth> for bool {
    fn from(value: Truth) -> Self {
        value.as_bool()
    }
}

impl fmt::Display for Truth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Truth::T => write!(f, "t"),
            Truth::Nil => write!(f, "nil"),
        }
    }
}

impl FromStr for Truth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "t" => Ok(Truth::T),
            "nil" => Ok(Truth::Nil),
            other => Err(format!("expected 't' or 'nil', found '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(Truth::from(true).to_string(), "t");
        assert_eq!(Truth::from(false).to_string(), "nil");
        assert_eq!("nil".parse::<Truth>(), Ok(Truth::Nil));
        assert!("T".parse::<Truth>().is_err());
    }
}
