//! Template block markup
//!
//! Wraps template source in a `<script>` element so a page can carry it and
//! an [`HtmlDocument`](crate::source::HtmlDocument) can find it again by name.

use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::source::{EMBER_SCRIPT_TYPE, HANDLEBARS_SCRIPT_TYPE};

/// Attribute convention for emitted script blocks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScriptStyle {
    /// `<script type="text/x-handlebars-template" id="NAME">`
    #[default]
    Standard,
    /// `<script type="text/x-handlebars" data-template-name="NAME">`
    Ember,
}

impl ScriptStyle {
    pub fn script_type(&self) -> &'static str {
        match self {
            Self::Standard => HANDLEBARS_SCRIPT_TYPE,
            Self::Ember => EMBER_SCRIPT_TYPE,
        }
    }

    pub fn name_attr(&self) -> &'static str {
        match self {
            Self::Standard => "id",
            Self::Ember => "data-template-name",
        }
    }
}

/// Wrap `body` in a named template script block; the body is not escaped
///
/// Fails when the body would end the script element early or push the
/// parser into escaped script data, since it could no longer be resolved
/// back unchanged.
pub fn script_block(name: &str, body: &str, style: ScriptStyle) -> Result<String, CacheError> {
    check_body(name, body)?;

    Ok(format!(
        "<script type=\"{}\" {}=\"{}\">{}</script>",
        style.script_type(),
        style.name_attr(),
        escape_attr(name),
        body
    ))
}

fn check_body(name: &str, body: &str) -> Result<(), CacheError> {
    let lower = body.to_ascii_lowercase();
    let reason = if lower.contains("</script") {
        "contains a closing script tag"
    } else if lower.contains("<!--") && lower.contains("<script") {
        "contains a comment opener together with a script tag"
    } else {
        return Ok(());
    };

    Err(CacheError::InvalidBody {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
