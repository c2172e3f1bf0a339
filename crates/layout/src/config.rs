use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fewest table rows allowed alone at the end of a non-final page when
    /// neither the table nor the template sets `min_rows`.
    ///
    /// Defaults to `2`.
    pub default_min_rows: usize,
    /// Text appended to truncated lines.
    ///
    /// Defaults to `"..."`.
    pub ellipsis: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_min_rows: 2,
            ellipsis: "...".to_string(),
        }
    }
}
