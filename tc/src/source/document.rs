//! HTML document source
//!
//! Indexes the template blocks of an HTML page so they can be looked up by
//! element id, the way a browser page embeds Handlebars templates:
//!
//! ```html
//! <script type="text/x-handlebars-template" id="greeting">Hello, {{name}}!</script>
//! <script type="text/x-handlebars" data-template-name="farewell">Bye, {{name}}.</script>
//! <template id="row"><tr><td>{{value}}</td></tr></template>
//! ```
//!
//! The page is parsed with a real HTML parser, so quoted `>` in attributes and
//! tag-like text inside other scripts do not confuse the index. Script bodies
//! are raw text and come back exactly as written. `<template>` bodies are the
//! element's content as serialized by the parser.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::TemplateSource;
use crate::error::CacheError;

/// Script type emitted for standard template blocks
pub const HANDLEBARS_SCRIPT_TYPE: &str = "text/x-handlebars-template";

/// Script type emitted for Ember-style template blocks
pub const EMBER_SCRIPT_TYPE: &str = "text/x-handlebars";

/// One template block found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBlock {
    /// Element id (or `data-template-name`)
    pub name: String,
    /// Inner markup
    pub body: String,
}

/// An HTML document indexed by template block name
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    html: String,
    label: String,
    blocks: Vec<TemplateBlock>,
    index: HashMap<String, usize>,
}

impl HtmlDocument {
    /// Index the template blocks of an HTML string
    pub fn parse(html: impl Into<String>) -> Self {
        Self::parse_labeled(html, "inline document")
    }

    /// Read and index an HTML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        let html = fs::read_to_string(path).map_err(|e| CacheError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let doc = Self::parse_labeled(html, &format!("document {}", path.display()));
        debug!(?path, blocks = doc.blocks.len(), "Loaded HTML document");
        Ok(doc)
    }

    fn parse_labeled(html: impl Into<String>, label: &str) -> Self {
        let html = html.into();
        let document = Html::parse_document(&html);

        let blocks: Vec<TemplateBlock> = template_elements(&document)
            .into_iter()
            .map(|(element, name)| TemplateBlock {
                name,
                body: block_body(&element),
            })
            .collect();

        let mut index = HashMap::new();
        for (i, block) in blocks.iter().enumerate() {
            // getElementById semantics: the first element with an id wins
            index.entry(block.name.clone()).or_insert(i);
        }

        Self {
            html,
            label: label.to_string(),
            blocks,
            index,
        }
    }

    /// Look up a template block by name
    pub fn get(&self, name: &str) -> Option<&TemplateBlock> {
        self.index.get(name).map(|&i| &self.blocks[i])
    }

    /// All template blocks in document order, duplicates included
    pub fn blocks(&self) -> &[TemplateBlock] {
        &self.blocks
    }

    /// The document, re-serialized, with every template block removed
    pub fn remainder(&self) -> String {
        let mut document = Html::parse_document(&self.html);
        let ids: Vec<_> = template_elements(&document)
            .into_iter()
            .map(|(element, _)| element.id())
            .collect();

        for id in ids {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }
        document.html()
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

impl TemplateSource for HtmlDocument {
    fn resolve(&self, name: &str) -> Result<Option<String>, CacheError> {
        Ok(self.get(name).map(|block| block.body.clone()))
    }

    fn names(&self) -> Result<Vec<String>, CacheError> {
        let mut names: Vec<String> = self.index.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Every named template element, in document order
fn template_elements(document: &Html) -> Vec<(ElementRef<'_>, String)> {
    let selector = Selector::parse("script, template").expect("valid block selector");

    document
        .select(&selector)
        .filter_map(|element| block_name(&element).map(|name| (element, name)))
        .collect()
}

fn block_name(element: &ElementRef<'_>) -> Option<String> {
    let el = element.value();
    let name = match el.name() {
        "script" => {
            let script_type = el.attr("type")?.trim().to_ascii_lowercase();
            if script_type != HANDLEBARS_SCRIPT_TYPE && script_type != EMBER_SCRIPT_TYPE {
                return None;
            }
            el.attr("data-template-name").or_else(|| el.attr("id"))?
        }
        "template" => el.attr("id")?,
        _ => return None,
    };

    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

fn block_body(element: &ElementRef<'_>) -> String {
    match element.value().name() {
        // Script content is a single raw text node
        "script" => element.text().collect(),
        _ => element.inner_html(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html>
<head><title>Demo</title></head>
<body>
<script type="text/x-handlebars-template" id="greeting">Hello, {{name}}!</script>
<script type='text/x-handlebars' data-template-name='farewell'>Bye, {{name}}.</script>
<script>console.log("<template id='fake'>x</template>");</script>
<template id=row><tr><td>{{value}}</td></tr></template>
<p>content</p>
</body>
</html>"#;

    #[test]
    fn test_resolve_standard_script() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(doc.resolve("greeting").unwrap().as_deref(), Some("Hello, {{name}}!"));
    }

    #[test]
    fn test_resolve_ember_script() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(doc.resolve("farewell").unwrap().as_deref(), Some("Bye, {{name}}."));
    }

    #[test]
    fn test_resolve_template_element_unquoted_id() {
        let doc = HtmlDocument::parse(PAGE);
        assert_eq!(doc.resolve("row").unwrap().as_deref(), Some("<tr><td>{{value}}</td></tr>"));
    }

    #[test]
    fn test_plain_scripts_are_skipped() {
        let doc = HtmlDocument::parse(PAGE);

        assert!(doc.resolve("fake").unwrap().is_none());
        assert_eq!(doc.names().unwrap(), vec!["farewell", "greeting", "row"]);
    }

    #[test]
    fn test_template_tag_inside_plain_script_is_text() {
        let html = "<script>var s = \"<template id='x'>\";</script>\n<template id=\"real\">R {{v}}</template>";
        let doc = HtmlDocument::parse(html);

        assert!(doc.get("x").is_none());
        assert_eq!(doc.resolve("real").unwrap().as_deref(), Some("R {{v}}"));
        assert_eq!(doc.names().unwrap(), vec!["real"]);
    }

    #[test]
    fn test_script_after_template_with_script_text() {
        let html = r#"<template id="a">uses "<script" text</template><script type="text/x-handlebars-template" id="g">G</script>"#;
        let doc = HtmlDocument::parse(html);

        assert_eq!(doc.resolve("g").unwrap().as_deref(), Some("G"));
        assert!(doc.get("a").is_some());
    }

    #[test]
    fn test_quoted_angle_bracket_in_attribute() {
        let html = r#"<script type="text/x-handlebars-template" data-x="a>b" id="g">G</script>"#;
        let doc = HtmlDocument::parse(html);

        assert_eq!(doc.resolve("g").unwrap().as_deref(), Some("G"));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let html = r#"<script type="text/x-handlebars-template" id="t">first</script>
<script type="text/x-handlebars-template" id="t">second</script>"#;
        let doc = HtmlDocument::parse(html);

        assert_eq!(doc.resolve("t").unwrap().as_deref(), Some("first"));
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.names().unwrap(), vec!["t"]);
    }

    #[test]
    fn test_case_insensitive_tags_and_attrs() {
        let html = r#"<SCRIPT TYPE="Text/X-Handlebars-Template" ID="loud">{{x}}</SCRIPT >"#;
        let doc = HtmlDocument::parse(html);

        assert_eq!(doc.resolve("loud").unwrap().as_deref(), Some("{{x}}"));
    }

    #[test]
    fn test_body_is_verbatim() {
        let html = "<script type=\"text/x-handlebars-template\" id=\"list\">\n  {{#each items}}\n    <li>{{this}}</li>\n  {{/each}}\n</script>";
        let doc = HtmlDocument::parse(html);

        assert_eq!(
            doc.resolve("list").unwrap().as_deref(),
            Some("\n  {{#each items}}\n    <li>{{this}}</li>\n  {{/each}}\n")
        );
    }

    #[test]
    fn test_empty_id_is_not_a_name() {
        let html = r#"<script type="text/x-handlebars-template" id="">x</script>"#;
        let doc = HtmlDocument::parse(html);

        assert!(doc.blocks().is_empty());
    }

    #[test]
    fn test_remainder_strips_templates() {
        let html = r#"<div>a</div><script type="text/x-handlebars-template" id="t">x</script><template id="u">y</template><div>b</div>"#;
        let doc = HtmlDocument::parse(html);
        let rest = doc.remainder();

        assert!(rest.contains("<div>a</div><div>b</div>"), "got: {}", rest);
        assert!(!rest.contains("<script"));
        assert!(!rest.contains("<template"));
    }

    #[test]
    fn test_remainder_keeps_plain_scripts() {
        let doc = HtmlDocument::parse(PAGE);
        let rest = doc.remainder();

        assert!(rest.contains("console.log"));
        assert!(rest.contains("<p>content</p>"));
        assert!(!rest.contains("greeting"));
    }

    #[test]
    fn test_escaped_attribute_value() {
        let html = r#"<script type="text/x-handlebars-template" id="a&amp;b">x</script>"#;
        let doc = HtmlDocument::parse(html);

        assert!(doc.get("a&b").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let err = HtmlDocument::load("/nonexistent/page.html").unwrap_err();
        assert!(matches!(err, CacheError::Io { .. }));
    }
}
