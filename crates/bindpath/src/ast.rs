//! The compiled form of a binding path.
use std::fmt;

/// Optional bracket suffix on a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// `[*]`: fan out over every entry of a repeated section.
    All,
    /// `[n]`: the n-th entry (0-based).
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub selector: Option<Selector>,
}

/// A parsed binding path such as `/title/owners[*]/name`.
///
/// An empty relative path is the current node (`.`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingPath {
    pub absolute: bool,
    pub segments: Vec<Segment>,
}

impl BindingPath {
    pub fn current() -> Self {
        Self {
            absolute: false,
            segments: Vec::new(),
        }
    }

    pub fn is_current(&self) -> bool {
        !self.absolute && self.segments.is_empty()
    }

    /// True when evaluating the path can yield more than one node.
    pub fn fans_out(&self) -> bool {
        self.segments
            .iter()
            .any(|s| s.selector == Some(Selector::All))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match self.selector {
            Some(Selector::All) => f.write_str("[*]"),
            Some(Selector::Index(i)) => write!(f, "[{}]", i),
            None => Ok(()),
        }
    }
}

impl fmt::Display for BindingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_current() {
            return f.write_str(".");
        }
        if self.absolute {
            f.write_str("/")?;
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
