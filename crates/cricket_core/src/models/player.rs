use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;

/// Anything the scoring calculator can use to tell players apart.
///
/// A blank identifier stands for "not yet named" and is skipped when
/// enumerating batsmen and bowlers.
pub trait Identifier: Clone + Eq + Hash + fmt::Debug {
    fn is_blank(&self) -> bool;
}

/// Free-text player identifier supplied by the scorer.
///
/// Not validated against any roster; the same text may appear in two roles at
/// once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The "not yet named" identifier, e.g. the striker slot after a wicket.
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unassigned(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Identifier for PlayerId {
    fn is_blank(&self) -> bool {
        self.is_unassigned()
    }
}

impl Identifier for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Identifier for u32 {
    fn is_blank(&self) -> bool {
        false
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for PlayerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for PlayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for PlayerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for PlayerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
