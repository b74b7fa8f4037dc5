//! Indentation-based debug rendering of a document tree.

use serde_json::Value;

use crate::document::Document;
use crate::node::NodeId;

/// Rendering knobs for [`Document::pretty`]
#[derive(Debug, Clone)]
pub struct PrettyOptions {
    /// How many characters of string values to show before truncating
    pub max_chars: usize,
    /// Per-line marker put in front of element names
    pub emphasize_with: String,
    /// Indentation width per level
    pub indent: usize,
    /// Indentation character
    pub indent_with: char,
    /// Level to start rendering at
    pub level: usize,
}

impl Default for PrettyOptions {
    fn default() -> Self {
        PrettyOptions {
            max_chars: 20,
            emphasize_with: String::new(),
            indent: 2,
            indent_with: ' ',
            level: 0,
        }
    }
}

impl Document {
    /// Pretty representation of the subtree under `id`: one line per node
    /// with its qualified name and truncated value, attributes rendered
    /// before child elements, children in materialization order.
    pub fn pretty(&self, id: NodeId, opts: &PrettyOptions) -> String {
        let mut out = String::new();
        self.pretty_into(id, opts, opts.level, &mut out);
        out
    }

    fn pretty_into(&self, id: NodeId, opts: &PrettyOptions, level: usize, out: &mut String) {
        let top_level = self.is_top_level(id);

        if !top_level {
            out.push_str(&pad(opts, level));
            out.push_str(&opts.emphasize_with);
            out.push_str(&self.full_name(id));
            if let Some(value) = self.value_of(id) {
                out.push(' ');
                out.push_str(&truncated(value, opts.max_chars));
            }
        }

        for attr in self.attrs_of(id) {
            out.push('\n');
            out.push_str(&pad(opts, level + 1));
            out.push('#');
            out.push_str(&attr.name);
            if let Some(value) = attr.value.as_ref() {
                out.push(' ');
                out.push_str(&truncated(value, opts.max_chars));
            }
        }

        for &child in self.children_of(id) {
            out.push('\n');
            self.pretty_into(child, opts, if top_level { level } else { level + 1 }, out);
        }
    }
}

fn pad(opts: &PrettyOptions, level: usize) -> String {
    std::iter::repeat(opts.indent_with)
        .take(level * opts.indent)
        .collect()
}

/// String values are cut at `max_chars` characters with a `(+N)` marker;
/// other scalars render whole.
fn truncated(value: &Value, max_chars: usize) -> String {
    match value {
        Value::String(s) => {
            let shown: String = s.chars().take(max_chars).collect();
            let total = s.chars().count();
            if total > max_chars {
                format!("{} (+{})", shown, total - max_chars)
            } else {
                shown
            }
        }
        other => other.to_string(),
    }
}
