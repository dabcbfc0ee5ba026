//! Labels, key actions and key binding tables

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The classification assigned to an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Take,
    Leave,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Take => "take",
            Label::Leave => "leave",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "take" => Ok(Label::Take),
            "leave" => Ok(Label::Leave),
            other => Err(Error::InvalidConfig(format!("unknown label '{}'", other))),
        }
    }
}

/// What a key does while annotating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotateAction {
    Label(Label),
    /// Persist and stop the session; never stored as a label
    End,
}

impl fmt::Display for AnnotateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotateAction::Label(label) => label.fmt(f),
            AnnotateAction::End => f.write_str("end"),
        }
    }
}

impl FromStr for AnnotateAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "end" | "quit" => Ok(AnnotateAction::End),
            other => other.parse().map(AnnotateAction::Label).map_err(|_| {
                Error::InvalidConfig(format!(
                    "unknown annotate action '{}', expected take, leave or end",
                    other
                ))
            }),
        }
    }
}

/// What a key does while browsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    Next,
    Previous,
    Quit,
}

impl fmt::Display for BrowseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BrowseAction::Next => "next",
            BrowseAction::Previous => "previous",
            BrowseAction::Quit => "quit",
        })
    }
}

impl FromStr for BrowseAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "next" => Ok(BrowseAction::Next),
            "previous" | "prev" => Ok(BrowseAction::Previous),
            "quit" | "end" => Ok(BrowseAction::Quit),
            other => Err(Error::InvalidConfig(format!(
                "unknown browse action '{}', expected next, previous or quit",
                other
            ))),
        }
    }
}

/// Ordered table of single-character keys and the actions they trigger.
///
/// Keys that are not in the table are ignored by the sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMap<A> {
    bindings: Vec<(char, A)>,
}

impl<A: Copy> KeyMap<A> {
    /// Build a map, rejecting a key bound twice
    pub fn new(bindings: impl IntoIterator<Item = (char, A)>) -> Result<Self> {
        let mut map = Self {
            bindings: Vec::new(),
        };
        for (key, action) in bindings {
            if map.action(key).is_some() {
                return Err(Error::InvalidConfig(format!("key '{}' is bound twice", key)));
            }
            map.bindings.push((key, action));
        }
        Ok(map)
    }

    /// Action bound to `key`, if any
    pub fn action(&self, key: char) -> Option<A> {
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|(_, action)| *action)
    }

    /// Bound keys in binding order
    pub fn keys(&self) -> impl Iterator<Item = char> + '_ {
        self.bindings.iter().map(|(key, _)| *key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, A)> + '_ {
        self.bindings.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<A> KeyMap<A>
where
    A: Copy + FromStr<Err = Error>,
{
    /// Parse bindings written as `"<key>=<action>"`, e.g. `"1=take"`
    pub fn parse<S: AsRef<str>>(entries: &[S]) -> Result<Self> {
        let bindings = entries
            .iter()
            .map(|entry| parse_binding(entry.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(bindings)
    }
}

fn parse_binding<A: FromStr<Err = Error>>(entry: &str) -> Result<(char, A)> {
    let (key, action) = entry.split_once('=').ok_or_else(|| {
        Error::InvalidConfig(format!("key binding '{}' is not of the form KEY=ACTION", entry))
    })?;
    let mut chars = key.trim().chars();
    let key = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(Error::InvalidConfig(format!(
                "key '{}' must be a single character",
                key
            )))
        }
    };
    Ok((key, action.parse()?))
}

impl Default for KeyMap<AnnotateAction> {
    fn default() -> Self {
        Self {
            bindings: vec![
                ('1', AnnotateAction::Label(Label::Take)),
                ('2', AnnotateAction::Label(Label::Leave)),
                ('q', AnnotateAction::End),
            ],
        }
    }
}

impl Default for KeyMap<BrowseAction> {
    fn default() -> Self {
        Self {
            bindings: vec![
                ('1', BrowseAction::Next),
                ('2', BrowseAction::Previous),
                ('q', BrowseAction::Quit),
            ],
        }
    }
}

impl<A: fmt::Display> fmt::Display for KeyMap<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, action)) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", key, action)?;
        }
        Ok(())
    }
}
