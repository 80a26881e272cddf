//! Classification of a single Schema.org JSON node.

use serde_json::{Map, Value};
use workfind_shared::{WorkRecord, WorkType};

use crate::entities::decode_entities;

// ---------------------------------------------------------------------------
// SchemaNode
// ---------------------------------------------------------------------------

/// A JSON object seen through its `@type` tag.
#[derive(Debug)]
pub(crate) enum SchemaNode<'a> {
    /// `ItemList`: recurse into `itemListElement`.
    ItemList { elements: Option<&'a Value> },
    /// `ListItem`: recurse into `item`.
    ListItem { item: Option<&'a Value> },
    /// A content type that becomes one work record.
    Work(WorkNode<'a>),
    /// Anything else, including `WebSite` and untagged values.
    Unrecognized { tag: Option<&'a str> },
}

impl<'a> SchemaNode<'a> {
    /// Dispatch on the node's `@type`. Non-objects are always unrecognized.
    pub(crate) fn classify(value: &'a Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::Unrecognized { tag: None };
        };
        let tag = fields.get("@type").and_then(Value::as_str);

        match tag {
            Some("ItemList") => Self::ItemList {
                elements: fields.get("itemListElement"),
            },
            Some("ListItem") => Self::ListItem {
                item: fields.get("item"),
            },
            Some(t) => match t.parse::<WorkType>() {
                Ok(work_type) => Self::Work(WorkNode { work_type, fields }),
                Err(_) => Self::Unrecognized { tag },
            },
            None => Self::Unrecognized { tag: None },
        }
    }
}

// ---------------------------------------------------------------------------
// WorkNode
// ---------------------------------------------------------------------------

/// A recognized leaf node. Fields are read lazily and leniently: a missing
/// or non-string field is simply absent in the resulting record.
#[derive(Debug)]
pub(crate) struct WorkNode<'a> {
    work_type: WorkType,
    fields: &'a Map<String, Value>,
}

impl WorkNode<'_> {
    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// `url`, else `mainEntityOfPage.@id`, else `mainEntityOfPage` as a string.
    fn url(&self) -> Option<String> {
        if let Some(url) = self.text("url") {
            return Some(url.to_string());
        }
        match self.fields.get("mainEntityOfPage")? {
            Value::String(id) => Some(id.clone()),
            Value::Object(page) => page.get("@id").and_then(Value::as_str).map(String::from),
            _ => None,
        }
    }

    pub(crate) fn into_record(self, site: &str) -> WorkRecord {
        let name = self.text("headline").or_else(|| self.text("name"));

        WorkRecord {
            name: name.map(decode_entities).unwrap_or_default(),
            description: self.text("description").map(decode_entities).unwrap_or_default(),
            date: self.text("datePublished").map(String::from),
            image: self.text("image").map(String::from),
            url: self.url(),
            work_type: self.work_type,
            site: site.to_string(),
        }
    }
}
