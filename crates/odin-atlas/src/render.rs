//! Cell rendering for heterogeneous values.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Marker shown for a value an entity does not have.
pub const PLACEHOLDER: &str = "—";

/// Rendered form of one comparison cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "camelCase")]
pub enum RenderedCell {
    /// Value is absent
    Placeholder,
    /// Plain string, number or boolean
    Literal(String),
    /// Enumerated items
    List(Vec<RenderedCell>),
    /// `key: value` pairs in stored order
    Map(Vec<(String, RenderedCell)>),
}

impl RenderedCell {
    /// Whether this is the absent-value marker.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    fn is_nested(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    fn write_block(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            Self::Placeholder => write!(f, "{PLACEHOLDER}"),
            Self::Literal(text) => write!(f, "{text}"),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    if item.is_nested() {
                        write!(f, "{indent}-")?;
                    } else {
                        write!(f, "{indent}- ")?;
                    }
                    item.write_nested(f, depth + 1)?;
                }
                Ok(())
            }
            Self::Map(pairs) => {
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{indent}{key}:")?;
                    if value.is_nested() {
                        writeln!(f)?;
                        value.write_block(f, depth + 1)?;
                    } else {
                        write!(f, " ")?;
                        value.write_block(f, 0)?;
                    }
                }
                Ok(())
            }
        }
    }

    fn write_nested(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        if self.is_nested() {
            writeln!(f)?;
            self.write_block(f, depth)
        } else {
            self.write_block(f, 0)
        }
    }
}

impl fmt::Display for RenderedCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_block(f, 0)
    }
}

/// Render a possibly absent value.
///
/// `null` counts as absent. Strings, numbers and booleans render literally,
/// arrays as enumerations and objects recursively as `key: value` pairs.
#[must_use]
pub fn render(value: Option<&Value>) -> RenderedCell {
    match value {
        None | Some(Value::Null) => RenderedCell::Placeholder,
        Some(Value::String(text)) => RenderedCell::Literal(text.clone()),
        Some(Value::Bool(flag)) => RenderedCell::Literal(flag.to_string()),
        Some(Value::Number(number)) => RenderedCell::Literal(number.to_string()),
        Some(Value::Array(items)) => {
            RenderedCell::List(items.iter().map(|item| render(Some(item))).collect())
        }
        Some(Value::Object(map)) => RenderedCell::Map(
            map.iter()
                .map(|(key, value)| (key.clone(), render(Some(value))))
                .collect(),
        ),
    }
}

/// Render a possibly absent value as text.
#[must_use]
pub fn render_text(value: Option<&Value>) -> String {
    render(value).to_string()
}
