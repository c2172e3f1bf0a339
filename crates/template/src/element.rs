//! Typed page elements.
use serde::{Deserialize, Serialize};
use titlepress_bindpath::{BindingPath, Coercion};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// What a text box does when its wrapped lines exceed the declared height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    #[default]
    Error,
    Flow,
    Ellipsis,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Tab leader drawn from the end of a line's text up to `to_x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Leader {
    #[serde(default = "default_leader_text")]
    pub text: String,
    pub to_x: f32,
}

fn default_leader_text() -> String {
    ".".to_string()
}

fn default_text_size() -> f32 {
    10.0
}

fn default_table_size() -> f32 {
    9.0
}

fn default_true() -> bool {
    true
}

fn default_rule_width() -> f32 {
    0.5
}

fn default_table_padding() -> Padding {
    Padding::uniform(2.0)
}

/// A single line of literal or bound text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextElement {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub binding: Option<String>,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub max_width: Option<f32>,
    pub font: String,
    #[serde(default = "default_text_size")]
    pub size: f32,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub leader: Option<Leader>,
    #[serde(default)]
    pub separator: Option<String>,
    #[serde(default)]
    pub repeat: bool,
}

/// Wrapped multi-line text inside a fixed box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextBoxElement {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub binding: Option<String>,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font: String,
    #[serde(default = "default_text_size")]
    pub size: f32,
    #[serde(default)]
    pub leading: Option<f32>,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub padding: Padding,
    #[serde(default = "default_true")]
    pub hyphenate: bool,
    #[serde(default)]
    pub overflow: Overflow,
    #[serde(default)]
    pub separator: Option<String>,
    #[serde(default)]
    pub repeat: bool,
}

impl TextBoxElement {
    pub fn leading(&self) -> f32 {
        self.leading.unwrap_or(self.size * 1.2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Column {
    #[serde(default)]
    pub header: String,
    pub path: String,
    pub width: f32,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub coerce: Coercion,
    #[serde(default)]
    pub optional: bool,
    #[serde(skip)]
    pub(crate) compiled: Option<BindingPath>,
}

impl Column {
    /// The compiled column path. Present on every column of a validated template.
    pub fn compiled_path(&self) -> Option<&BindingPath> {
        self.compiled.as_ref()
    }
}

/// A table with one row per node of a `nodes` binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableElement {
    pub binding: String,
    pub x: f32,
    pub y: f32,
    pub columns: Vec<Column>,
    pub font: String,
    #[serde(default = "default_table_size")]
    pub size: f32,
    #[serde(default)]
    pub leading: Option<f32>,
    #[serde(default)]
    pub header_font: Option<String>,
    #[serde(default)]
    pub header_size: Option<f32>,
    #[serde(default)]
    pub header_leading: Option<f32>,
    #[serde(default = "default_table_padding")]
    pub padding: Padding,
    #[serde(default)]
    pub header_gap: Option<f32>,
    #[serde(default = "default_true")]
    pub repeat_header: bool,
    #[serde(default)]
    pub min_rows: Option<usize>,
    #[serde(default)]
    pub continue_at: Option<f32>,
}

impl TableElement {
    pub fn leading(&self) -> f32 {
        self.leading.unwrap_or(self.size * 1.2)
    }

    pub fn header_font(&self) -> &str {
        self.header_font.as_deref().unwrap_or(&self.font)
    }

    pub fn header_size(&self) -> f32 {
        self.header_size.unwrap_or(self.size)
    }

    pub fn header_leading(&self) -> f32 {
        self.header_leading.unwrap_or(self.header_size() * 1.2)
    }

    pub fn header_gap(&self) -> f32 {
        self.header_gap.unwrap_or(0.0)
    }

    pub fn total_width(&self) -> f32 {
        self.columns.iter().map(|c| c.width).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageElement {
    pub asset: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub repeat: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleElement {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(default = "default_rule_width")]
    pub width: f32,
    #[serde(default)]
    pub repeat: bool,
}

/// One placement on a page definition, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Text(TextElement),
    TextBox(TextBoxElement),
    Table(TableElement),
    Image(ImageElement),
    Rule(RuleElement),
}

impl Element {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Element::Text(_) => "text",
            Element::TextBox(_) => "text_box",
            Element::Table(_) => "table",
            Element::Image(_) => "image",
            Element::Rule(_) => "rule",
        }
    }

    /// Name of the declared binding this element reads, if any.
    pub fn binding_name(&self) -> Option<&str> {
        match self {
            Element::Text(t) => t.binding.as_deref(),
            Element::TextBox(t) => t.binding.as_deref(),
            Element::Table(t) => Some(&t.binding),
            Element::Image(_) | Element::Rule(_) => None,
        }
    }

    /// Font aliases used by this element, in the order they are drawn.
    pub fn font_aliases(&self) -> Vec<&str> {
        match self {
            Element::Text(t) => vec![t.font.as_str()],
            Element::TextBox(t) => vec![t.font.as_str()],
            Element::Table(t) => vec![t.header_font(), t.font.as_str()],
            Element::Image(_) | Element::Rule(_) => Vec::new(),
        }
    }

    /// True for elements that may spill onto continuation pages.
    pub fn flows(&self) -> bool {
        match self {
            Element::TextBox(t) => t.overflow == Overflow::Flow,
            Element::Table(_) => true,
            _ => false,
        }
    }

    /// True when the element is drawn on continuation pages as well.
    pub fn repeats(&self) -> bool {
        match self {
            Element::Text(t) => t.repeat,
            Element::TextBox(t) => t.repeat,
            Element::Image(i) => i.repeat,
            Element::Rule(r) => r.repeat,
            Element::Table(_) => false,
        }
    }
}
