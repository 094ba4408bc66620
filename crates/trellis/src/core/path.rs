use std::{collections::VecDeque, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{self, Result};

/// A source route through the tree: node ids ordered from the root to a target.
///
/// Upward messages grow a path at the front, one id per hop. Downward messages
/// consume it from the front, one id per hop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    /// Stored path components.
    path: VecDeque<String>,
}

impl FromStr for Path {
    type Err = error::Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        for (i, component) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

impl Path {
    /// Construct an empty path.
    pub fn empty() -> Self {
        Self {
            path: VecDeque::new(),
        }
    }

    /// Construct a path from a sequence of components.
    pub fn new<I>(v: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            path: v.into_iter().map(|x| x.as_ref().to_string()).collect(),
        }
    }

    /// Add a component at the front. Used by each ancestor on the way up.
    pub fn prepend(&mut self, id: impl Into<String>) {
        self.path.push_front(id.into());
    }

    /// Add a component at the back.
    pub fn push_back(&mut self, id: impl Into<String>) {
        self.path.push_back(id.into());
    }

    /// Remove and return the front component. Used on each hop on the way down.
    pub fn pop_front(&mut self) -> Option<String> {
        self.path.pop_front()
    }

    /// The front component, if any.
    pub fn first(&self) -> Option<&str> {
        self.path.front().map(String::as_str)
    }

    /// The last component, if any.
    pub fn last(&self) -> Option<&str> {
        self.path.back().map(String::as_str)
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Return true if there are no components.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Iterate over components from the front.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.path.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for Path {
    fn from(path: Vec<String>) -> Self {
        Self { path: path.into() }
    }
}

impl From<&[&str]> for Path {
    fn from(v: &[&str]) -> Self {
        Self::new(v.iter().filter(|x| !x.is_empty()))
    }
}

impl From<&str> for Path {
    fn from(v: &str) -> Self {
        Self::new(v.split('/').filter(|x| !x.is_empty()))
    }
}

impl PartialEq<[&str]> for Path {
    fn eq(&self, other: &[&str]) -> bool {
        self.path.len() == other.len() && self.path.iter().zip(other).all(|(a, b)| a == b)
    }
}

impl<const N: usize> PartialEq<[&str; N]> for Path {
    fn eq(&self, other: &[&str; N]) -> bool {
        self == &other[..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse() {
        let p = Path::from("/topwidget/a/b");
        assert_eq!(p.to_string(), "/topwidget/a/b");
        assert_eq!(p, ["topwidget", "a", "b"]);
        assert_eq!(Path::empty().to_string(), "/");
        assert_eq!(Path::from("a//b/"), ["a", "b"]);
    }

    #[test]
    fn grows_at_front_and_shrinks_at_front() {
        let mut p = Path::empty();
        p.prepend("leaf");
        p.prepend("mid");
        p.prepend("root");
        assert_eq!(p, ["root", "mid", "leaf"]);
        assert_eq!(p.first(), Some("root"));
        assert_eq!(p.last(), Some("leaf"));

        assert_eq!(p.pop_front().as_deref(), Some("root"));
        assert_eq!(p.len(), 2);
        assert_eq!(p.first(), Some("mid"));
    }

    #[test]
    fn serializes_as_array() {
        let p = Path::new(["topwidget", "a"]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"["topwidget","a"]"#);
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
