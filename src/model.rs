//! Domain records returned by the Java2UML server.
//!
//! Every resource arrives wrapped in an [`EntityModel`], which pairs the
//! payload with the hypermedia links the server attached to it. The links
//! are how follow-up requests discover the ids they need.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::LinkError;

/// Relation name to URI.
pub type Links = BTreeMap<String, String>;

/// A collection response: the items plus the collection's own links.
pub type CollectionModel<T> = EntityModel<Vec<EntityModel<T>>>;

/// A resource together with its navigable links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityModel<T> {
    pub content: T,
    #[serde(default)]
    pub links: Links,
}

impl<T> EntityModel<T> {
    pub fn new(content: T, links: Links) -> Self {
        Self { content, links }
    }

    /// Href of the named link.
    pub fn link(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }

    /// Id at the end of the named link, e.g. `42` for `.../method/by-parent/42`.
    pub fn link_id(&self, rel: &str) -> Result<i64, LinkError> {
        match self.link(rel) {
            Some(href) => id_from_href(rel, href),
            None => Err(LinkError::Missing {
                rel: rel.to_string(),
            }),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> EntityModel<U> {
        EntityModel {
            content: f(self.content),
            links: self.links,
        }
    }
}

impl<T> EntityModel<Vec<EntityModel<T>>> {
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Iterate over the bare payloads, dropping per-item links.
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.content.iter().map(|e| &e.content)
    }
}

/// Parse the trailing path segment of `href` as an id.
///
/// Query strings, fragments and a trailing slash are ignored.
pub fn id_from_href(rel: &str, href: &str) -> Result<i64, LinkError> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse::<i64>().ok())
        .ok_or_else(|| LinkError::InvalidId {
            rel: rel.to_string(),
            href: href.to_string(),
        })
}

/// An uploaded archive as the server sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub id: i64,
    pub project_name: String,
    pub size: u64,
    /// Media type of the archive, e.g. `application/zip`
    pub file_type: String,
    pub messages: Vec<String>,
    pub is_bad_request: bool,
    pub is_parsed: bool,
}

/// Root of the parsed code base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub id: i64,
}

/// Generated PlantUML source for the class diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UmlBody {
    pub content: String,
}

/// Common shape of every structural element of the analyzed code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightWeight {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<LightWeight>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassOrInterface {
    #[serde(flatten)]
    pub base: LightWeight,
    pub package_name: String,
    pub is_class: bool,
    pub is_external: bool,
    pub is_generic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enum {
    #[serde(flatten)]
    pub base: LightWeight,
    pub package_name: String,
}

/// Directed edge between two classes, interfaces or enums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRelation {
    pub id: i64,
    /// Kind of relation, e.g. `GENERALIZATION` or `REALIZATION`
    pub relation: String,
    pub from_id: i64,
    pub to_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    #[serde(flatten)]
    pub base: LightWeight,
    pub package_name: String,
    pub return_type: String,
    pub signature: String,
    pub visibility: String,
    pub is_static: bool,
    pub parameters: Vec<Param>,
    pub type_parameters: Vec<String>,
    pub specified_exceptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constructor {
    #[serde(flatten)]
    pub base: LightWeight,
    pub signature: String,
    pub visibility: String,
    pub is_compiler_generated: bool,
    pub parameters: Vec<Param>,
    pub type_parameters: Vec<String>,
    pub specified_exceptions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(flatten)]
    pub base: LightWeight,
    pub type_name: String,
    pub visibility: String,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumConstant {
    #[serde(flatten)]
    pub base: LightWeight,
}

/// Parameter of a method or constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    #[serde(flatten)]
    pub base: LightWeight,
    pub type_name: String,
}

/// Source text of a class, method, constructor or enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: i64,
    pub content: String,
}

/// Caller to callee edge, both sides named by method signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallGraphRelation {
    pub from: String,
    pub to: String,
}

/// Error body the server sends with 4xx/5xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub timestamp: String,
    /// Status label, e.g. `UNSUPPORTED_MEDIA_TYPE`
    #[serde(default)]
    pub http_status: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub errors: Vec<String>,
}
