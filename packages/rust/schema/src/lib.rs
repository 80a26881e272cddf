//! Schema.org JSON → flat list of [`WorkRecord`]s.
//!
//! Only a small subset of Schema.org is understood:
//! - `ItemList` / `ListItem` containers are walked recursively
//! - `Article`, `BlogPosting`, `ImageGallery`, `Recipe`, `TechArticle` and
//!   `WebPage` each become one record
//! - everything else (e.g. `WebSite`) is skipped without error
//!
//! Parsing is permissive: missing or oddly-typed fields leave the matching
//! record field empty instead of rejecting the node or the document.

mod entities;
mod node;

use serde_json::Value;
use tracing::{debug, trace};
use workfind_shared::{Result, WorkRecord, WorkfindError};

use crate::node::SchemaNode;

pub use entities::decode_entities;

/// Parse a Schema.org document (a single node or an array of nodes) into
/// work records attributed to `source_name`, preserving document order.
pub fn parse(document: &Value, source_name: &str) -> Vec<WorkRecord> {
    let mut works = Vec::new();
    collect(document, source_name, &mut works);
    debug!(site = source_name, works = works.len(), "parsed schema document");
    works
}

/// Decode `body` as JSON and [`parse`] it.
///
/// Fails only if the body is not JSON at all.
pub fn parse_str(body: &str, source_name: &str) -> Result<Vec<WorkRecord>> {
    parse_slice(body.as_bytes(), source_name)
}

/// Byte-slice form of [`parse_str`], for bodies read straight off the wire.
pub fn parse_slice(body: &[u8], source_name: &str) -> Result<Vec<WorkRecord>> {
    let document: Value = serde_json::from_slice(body)
        .map_err(|e| WorkfindError::parse(source_name, format!("invalid JSON: {e}")))?;
    Ok(parse(&document, source_name))
}

fn collect(value: &Value, site: &str, out: &mut Vec<WorkRecord>) {
    if let Value::Array(items) = value {
        for item in items {
            collect(item, site, out);
        }
        return;
    }

    match SchemaNode::classify(value) {
        SchemaNode::ItemList { elements } => {
            if let Some(elements) = elements {
                collect(elements, site, out);
            }
        }
        SchemaNode::ListItem { item } => {
            if let Some(item) = item {
                collect(item, site, out);
            }
        }
        SchemaNode::Work(node) => out.push(node.into_record(site)),
        SchemaNode::Unrecognized { tag } => {
            trace!(site, tag = tag.unwrap_or("<none>"), "skipping node");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use workfind_shared::WorkType;

    fn load_fixture(name: &str) -> String {
        let path = format!("../../../fixtures/json/{name}");
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    #[test]
    fn every_leaf_type_yields_one_record() {
        for work_type in WorkType::ALL {
            let node = json!({"@type": work_type.as_str(), "name": "n"});
            let works = parse(&node, "Notebook");
            assert_eq!(works.len(), 1, "{work_type}");
            assert_eq!(works[0].site, "Notebook");
            assert_eq!(works[0].work_type, work_type);
        }
    }

    #[test]
    fn unrecognized_types_yield_nothing() {
        for tag in ["WebSite", "Person", "Organization", "article", ""] {
            let node = json!({"@type": tag, "name": "ignored"});
            assert!(parse(&node, "s").is_empty(), "{tag}");
        }
        assert!(parse(&json!(null), "s").is_empty());
        assert!(parse(&json!(17), "s").is_empty());
        assert!(parse(&json!([]), "s").is_empty());
    }

    #[test]
    fn item_list_preserves_order() {
        let titles = ["first", "second", "third", "fourth"];
        let elements: Vec<Value> = titles
            .iter()
            .map(|t| json!({"@type": "ListItem", "item": {"@type": "BlogPosting", "headline": t}}))
            .collect();
        let doc = json!({"@type": "ItemList", "itemListElement": elements});

        let works = parse(&doc, "blog");
        let names: Vec<&str> = works.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, titles);
    }

    #[test]
    fn nested_containers_and_arrays_flatten() {
        let doc = json!([
            {"@type": "Article", "name": "a"},
            {"@type": "ItemList", "itemListElement": {
                "@type": "ListItem",
                "item": [
                    {"@type": "ItemList", "itemListElement": [{"@type": "Recipe", "name": "b"}]},
                    {"@type": "WebSite"},
                    {"@type": "WebPage", "name": "c"}
                ]
            }},
            {"@type": "ListItem"}
        ]);
        let names: Vec<String> = parse(&doc, "s").into_iter().map(|w| w.name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn parse_notebook_fixture() {
        let works = parse_str(&load_fixture("notebook.json"), "Notebook").unwrap();

        assert_eq!(works.len(), 2);

        let first = &works[0];
        assert_eq!(first.name, "Tabs & Spaces, Revisited");
        assert_eq!(first.description, "Why I switched \u{2014} again \u{2026}");
        assert_eq!(first.date.as_deref(), Some("2021-05-02"));
        assert_eq!(first.image.as_deref(), Some("https://notebook.example/img/tabs.png"));
        assert_eq!(first.url.as_deref(), Some("https://notebook.example/tabs"));
        assert_eq!(first.work_type, WorkType::BlogPosting);

        let second = &works[1];
        assert_eq!(second.name, "Writing a Tiny Parser");
        assert_eq!(second.url.as_deref(), Some("https://notebook.example/tiny-parser"));
        assert_eq!(second.work_type, WorkType::TechArticle);
        assert!(second.image.is_none());
    }

    #[test]
    fn parse_kitchen_fixture() {
        let works = parse_str(&load_fixture("kitchen.json"), "Kitchen").unwrap();
        assert_eq!(works.len(), 2);
        assert_eq!(works[0].name, "Caf\u{e9} Brownies");
        assert_eq!(works[1].url.as_deref(), Some("https://kitchen.example/dal"));
        assert!(works[1].date.is_none());
        assert!(works.iter().all(|w| w.site == "Kitchen"));
    }

    #[test]
    fn parse_str_rejects_non_json() {
        let err = parse_str("<html>not json</html>", "broken").unwrap_err();
        assert!(matches!(err, WorkfindError::Parse { ref site, .. } if site == "broken"));
        assert!(err.to_string().starts_with("broken: invalid document"));
    }

    #[test]
    fn parse_slice_reads_raw_bytes() {
        let body = load_fixture("gallery.json").into_bytes();
        let works = parse_slice(&body, "Gallery").unwrap();
        assert_eq!(works.len(), 1);
        assert_eq!(works[0].work_type, WorkType::ImageGallery);

        let err = parse_slice(b"\xff\xfe", "binary").unwrap_err();
        assert_eq!(err.site(), Some("binary"));
    }
}
