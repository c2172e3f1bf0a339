use serde::Serialize;
use std::fmt;

/// Identifies one element of a template by its page and element index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementRef {
    pub page: usize,
    pub element: usize,
}

impl ElementRef {
    pub fn new(page: usize, element: usize) -> Self {
        Self { page, element }
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pages[{}].elements[{}]", self.page, self.element)
    }
}
