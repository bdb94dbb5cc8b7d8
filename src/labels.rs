//! Condition and class vocabularies.
//!
//! Both are closed enums.  User-supplied names go through a single
//! normalization (lowercase, whitespace removed) and are then matched
//! against English and Spanish aliases, so `"Pronunciado"`, `"pron"` and
//! `" P "` all mean [`Condition::Pronounced`].
use std::fmt;
use std::str::FromStr;

use crate::codes::*;
use crate::error::EventError;

/// Normalize a user-facing name: lowercase, all whitespace removed.
pub fn normalize_name(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase).collect()
}

/// `sub-01` … `sub-09`, `sub-10` …
pub fn subject_name(n: u32) -> String {
    format!("sub-{n:02}")
}

// ── Condition ─────────────────────────────────────────────────────────────

/// Speech paradigm of a block.  Discriminants are the stored condition column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Condition {
    Pronounced = 0,
    Inner      = 1,
    Visualized = 2,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Self::Pronounced, Self::Inner, Self::Visualized];

    /// Condition opened by a block marker (21 / 22 / 23).
    pub fn from_block_code(code: i32) -> Option<Self> {
        match code {
            BLOCK_PRONOUNCED => Some(Self::Pronounced),
            BLOCK_INNER      => Some(Self::Inner),
            BLOCK_VISUALIZED => Some(Self::Visualized),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pronounced => "pronounced",
            Self::Inner      => "inner",
            Self::Visualized => "visualized",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Class ─────────────────────────────────────────────────────────────────

/// Cued direction.  Discriminants are the standardized labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Class {
    Up    = 0,
    Down  = 1,
    Right = 2,
    Left  = 3,
}

impl Class {
    pub const ALL: [Class; 4] = [Self::Up, Self::Down, Self::Right, Self::Left];

    /// Class of a tag code (31..=34).
    pub fn from_tag(code: i32) -> Option<Self> {
        match code {
            TAG_UP    => Some(Self::Up),
            TAG_DOWN  => Some(Self::Down),
            TAG_RIGHT => Some(Self::Right),
            TAG_LEFT  => Some(Self::Left),
            _ => None,
        }
    }

    pub fn tag(self) -> i32 {
        TAGS[self as usize]
    }

    /// Standardized label: 31 → 0 … 34 → 3.
    pub fn label(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Up    => "up",
            Self::Down  => "down",
            Self::Right => "right",
            Self::Left  => "left",
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── Name parsing ──────────────────────────────────────────────────────────

/// Either every value or a single one, as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T: Copy + PartialEq> Selection<T> {
    pub fn matches(&self, v: T) -> bool {
        match self {
            Self::All => true,
            Self::Only(x) => *x == v,
        }
    }
}

fn is_all(norm: &str) -> bool {
    matches!(norm, "a" | "all" | "todo" | "todos")
}

impl FromStr for Condition {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, EventError> {
        match normalize_name(s).as_str() {
            "p" | "pron" | "pronounced" | "pronunciado" => Ok(Self::Pronounced),
            "i" | "in" | "inner" | "interno"            => Ok(Self::Inner),
            "v" | "vis" | "visualized" | "visualizado"  => Ok(Self::Visualized),
            _ => Err(EventError::UnknownCondition(s.to_string())),
        }
    }
}

impl FromStr for Class {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, EventError> {
        match normalize_name(s).as_str() {
            "u" | "up" | "ar" | "arriba"             => Ok(Self::Up),
            "d" | "down" | "ab" | "abajo"            => Ok(Self::Down),
            "r" | "right" | "der" | "derecha"        => Ok(Self::Right),
            "l" | "left" | "i" | "izq" | "izquierda" => Ok(Self::Left),
            _ => Err(EventError::UnknownClass(s.to_string())),
        }
    }
}

impl FromStr for Selection<Condition> {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, EventError> {
        if is_all(&normalize_name(s)) {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl FromStr for Selection<Class> {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, EventError> {
        if is_all(&normalize_name(s)) {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}
