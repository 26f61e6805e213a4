//! Mapping from raw server JSON to the typed records in [`crate::model`].
//!
//! The server speaks HAL: every resource carries a `_links` object of
//! `{rel: {href}}` entries and collections nest their items under
//! `_embedded.<kind>List`. Java bean booleans also lose their `is` prefix on
//! the wire (`class`, `static`, `parsed`, ...). This module is the only
//! place that knows about any of that. Wire structs are private and every
//! required key is checked by serde, so a response either maps to a complete
//! record or fails with [`ClientError::Malformed`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::model::{
    id_from_href, Body, CallGraphRelation, ClassOrInterface, ClassRelation, CollectionModel,
    Constructor, EntityModel, Enum, EnumConstant, Field, LightWeight, Links, Method, Param,
    ProjectInfo, Source, UmlBody,
};

const LINKS_KEY: &str = "_links";
const EMBEDDED_KEY: &str = "_embedded";

/// A server resource that can be decoded from its wire form.
pub trait Resource: Sized {
    /// Resource name used in error messages.
    const KIND: &'static str;
    /// Key under `_embedded` that holds a list of this resource.
    const EMBEDDED_KEY: &'static str;

    /// Decode the payload. `links` holds the already-flattened `_links`.
    fn from_wire(data: Value, links: &Links) -> Result<Self, ClientError>;
}

/// Normalize a single resource response.
pub fn normalize_entity<T: Resource>(raw: Value) -> Result<EntityModel<T>, ClientError> {
    let mut object = into_object(raw, T::KIND)?;
    let links = take_links(&mut object, T::KIND)?;
    let content = T::from_wire(Value::Object(object), &links)?;
    Ok(EntityModel::new(content, links))
}

/// Normalize a collection response, mapping each embedded item through
/// [`normalize_entity`].
///
/// The server leaves `_embedded` out entirely when a collection is empty,
/// so a missing `_embedded` yields an empty list. An `_embedded` object
/// holding some other key is a contract mismatch and fails.
pub fn normalize_collection<T: Resource>(raw: Value) -> Result<CollectionModel<T>, ClientError> {
    let mut object = into_object(raw, T::KIND)?;
    let links = take_links(&mut object, T::KIND)?;

    let items = match object.remove(EMBEDDED_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(mut embedded)) => match embedded.remove(T::EMBEDDED_KEY) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ClientError::malformed(
                    T::KIND,
                    format!(
                        "_embedded.{} should be an array, found {}",
                        T::EMBEDDED_KEY,
                        type_name(&other)
                    ),
                ))
            }
            None if embedded.is_empty() => Vec::new(),
            None => {
                let found: Vec<&str> = embedded.keys().map(String::as_str).collect();
                return Err(ClientError::malformed(
                    T::KIND,
                    format!(
                        "expected _embedded.{}, found {}",
                        T::EMBEDDED_KEY,
                        found.join(", ")
                    ),
                ));
            }
        },
        Some(other) => {
            return Err(ClientError::malformed(
                T::KIND,
                format!("_embedded should be an object, found {}", type_name(&other)),
            ))
        }
    };

    let content = items
        .into_iter()
        .map(normalize_entity::<T>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(EntityModel::new(content, links))
}

/// Flatten a HAL `_links` object into `rel -> href`.
///
/// When a relation holds an array of links the first href wins.
pub fn flatten_links(raw: Value) -> Result<Links, String> {
    let object = match raw {
        Value::Object(object) => object,
        Value::Null => return Ok(Links::new()),
        other => return Err(format!("_links should be an object, found {}", type_name(&other))),
    };

    let mut links = Links::new();
    for (rel, value) in object {
        let link = match value {
            Value::Array(mut entries) if !entries.is_empty() => entries.swap_remove(0),
            Value::Array(_) => continue,
            other => other,
        };
        match link.get("href").and_then(Value::as_str) {
            Some(href) => {
                links.insert(rel, href.to_string());
            }
            None => return Err(format!("link {:?} has no href", rel)),
        }
    }
    Ok(links)
}

fn take_links(object: &mut Map<String, Value>, kind: &'static str) -> Result<Links, ClientError> {
    match object.remove(LINKS_KEY) {
        Some(raw) => flatten_links(raw).map_err(|e| ClientError::malformed(kind, e)),
        None => Ok(Links::new()),
    }
}

fn into_object(raw: Value, kind: &'static str) -> Result<Map<String, Value>, ClientError> {
    match raw {
        Value::Object(object) => Ok(object),
        other => Err(ClientError::malformed(
            kind,
            format!("expected a JSON object, found {}", type_name(&other)),
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn decode<W: DeserializeOwned>(kind: &'static str, data: Value) -> Result<W, ClientError> {
    serde_json::from_value(data).map_err(|e| ClientError::malformed(kind, e))
}

/// Id taken from the trailing segment of a required link.
fn required_link_id(links: &Links, rel: &str) -> Result<i64, ClientError> {
    let href = links.get(rel).ok_or_else(|| crate::error::LinkError::Missing {
        rel: rel.to_string(),
    })?;
    Ok(id_from_href(rel, href)?)
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Deserialize)]
struct WireLightWeight {
    id: i64,
    name: String,
    #[serde(default)]
    parent: Option<Box<WireLightWeight>>,
}

impl From<WireLightWeight> for LightWeight {
    fn from(w: WireLightWeight) -> Self {
        LightWeight {
            id: w.id,
            name: w.name,
            parent: w.parent.map(|p| Box::new(LightWeight::from(*p))),
        }
    }
}

/// Type parameters and thrown exceptions come either as plain names or as
/// entities carrying a name.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireNamed {
    Plain(String),
    Entity { name: String },
}

impl WireNamed {
    fn into_name(self) -> String {
        match self {
            WireNamed::Plain(name) | WireNamed::Entity { name } => name,
        }
    }
}

fn names(raw: Vec<WireNamed>) -> Vec<String> {
    raw.into_iter().map(WireNamed::into_name).collect()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireProjectInfo {
    id: i64,
    project_name: String,
    size: u64,
    file_type: String,
    #[serde(default)]
    messages: Vec<String>,
    bad_request: bool,
    parsed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireClassOrInterface {
    #[serde(flatten)]
    base: WireLightWeight,
    package_name: String,
    class: bool,
    external: bool,
    generic: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEnum {
    #[serde(flatten)]
    base: WireLightWeight,
    package_name: String,
}

#[derive(Deserialize)]
struct WireClassRelation {
    id: i64,
    relation: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireParam {
    #[serde(flatten)]
    base: WireLightWeight,
    type_name: String,
}

impl From<WireParam> for Param {
    fn from(w: WireParam) -> Self {
        Param {
            base: w.base.into(),
            type_name: w.type_name,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireMethod {
    #[serde(flatten)]
    base: WireLightWeight,
    package_name: String,
    return_type: String,
    signature: String,
    visibility: String,
    #[serde(rename = "static")]
    is_static: bool,
    #[serde(default)]
    parameters: Vec<WireParam>,
    #[serde(default)]
    type_parameters: Vec<WireNamed>,
    #[serde(default)]
    specified_exceptions: Vec<WireNamed>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireConstructor {
    #[serde(flatten)]
    base: WireLightWeight,
    signature: String,
    visibility: String,
    compiler_generated: bool,
    #[serde(default)]
    parameters: Vec<WireParam>,
    #[serde(default)]
    type_parameters: Vec<WireNamed>,
    #[serde(default)]
    specified_exceptions: Vec<WireNamed>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireField {
    #[serde(flatten)]
    base: WireLightWeight,
    type_name: String,
    visibility: String,
    #[serde(rename = "static")]
    is_static: bool,
}

// =============================================================================
// Resource impls
// =============================================================================

impl Resource for ProjectInfo {
    const KIND: &'static str = "projectInfo";
    const EMBEDDED_KEY: &'static str = "projectInfoList";

    fn from_wire(data: Value, _links: &Links) -> Result<Self, ClientError> {
        let w: WireProjectInfo = decode(Self::KIND, data)?;
        Ok(ProjectInfo {
            id: w.id,
            project_name: w.project_name,
            size: w.size,
            file_type: w.file_type,
            messages: w.messages,
            is_bad_request: w.bad_request,
            is_parsed: w.parsed,
        })
    }
}

impl Resource for Source {
    const KIND: &'static str = "source";
    const EMBEDDED_KEY: &'static str = "sourceList";

    fn from_wire(data: Value, _links: &Links) -> Result<Self, ClientError> {
        decode(Self::KIND, data)
    }
}

impl Resource for UmlBody {
    const KIND: &'static str = "umlBody";
    const EMBEDDED_KEY: &'static str = "umlBodyList";

    fn from_wire(data: Value, _links: &Links) -> Result<Self, ClientError> {
        decode(Self::KIND, data)
    }
}

impl Resource for ClassOrInterface {
    const KIND: &'static str = "classOrInterface";
    const EMBEDDED_KEY: &'static str = "classOrInterfaceList";

    fn from_wire(data: Value, _links: &Links) -> Result<Self, ClientError> {
        let w: WireClassOrInterface = decode(Self::KIND, data)?;
        Ok(ClassOrInterface {
            base: w.base.into(),
            package_name: w.package_name,
            is_class: w.class,
            is_external: w.external,
            is_generic: w.generic,
        })
    }
}

impl Resource for Enum {
    const KIND: &'static str = "enum";
    const EMBEDDED_KEY: &'static str = "enumList";

    fn from_wire(data: Value, _links: &Links) -> Result<Self, ClientError> {
        let w: WireEnum = decode(Self::KIND, data)?;
        Ok(Enum {
            base: w.base.into(),
            package_name: w.package_name,
        })
    }
}

impl Resource for ClassRelation {
    const KIND: &'static str = "classRelation";
    const EMBEDDED_KEY: &'static str = "classRelationList";

    /// The endpoints of a relation only exist as `from`/`to` links.
    fn from_wire(data: Value, links: &Links) -> Result<Self, ClientError> {
        let w: WireClassRelation = decode(Self::KIND, data)?;
        Ok(ClassRelation {
            id: w.id,
            relation: w.relation,
            from_id: required_link_id(links, "from")?,
            to_id: required_link_id(links, "to")?,
        })
    }
}

impl Resource for Method {
    const KIND: &'static str = "method";
    const EMBEDDED_KEY: &'static str = "methodList";

    fn from_wire(data: Value, _links: &Links) -> Result<Self, ClientError> {
        let w: WireMethod = decode(Self::KIND, data)?;
        Ok(Method {
            base: w.base.into(),
            package_name: w.package_name,
            return_type: w.return_type,
            signature: w.signature,
            visibility: w.visibility,
            is_static: w.is_static,
            parameters: w.parameters.into_iter().map(Param::from).collect(),
            type_parameters: names(w.type_parameters),
            specified_exceptions: names(w.specified_exceptions),
        })
    }
}

impl Resource for Constructor {
    const KIND: &'static str = "constructor";
    const EMBEDDED_KEY: &'static str = "constructorList";

    fn from_wire(data: Value, _links: &Links) -> Result<Self, ClientError> {
        let w: WireConstructor = decode(Self::KIND, data)?;
        Ok(Constructor {
            base: w.base.into(),
            signature: w.signature,
            visibility: w.visibility,
            is_compiler_generated: w.compiler_generated,
            parameters: w.parameters.into_iter().map(Param::from).collect(),
            type_parameters: names(w.type_parameters),
            specified_exceptions: names(w.specified_exceptions),
        })
    }
}

impl Resource for Field {
    const KIND: &'static str = "field";
    const EMBEDDED_KEY: &'static str = "fieldList";

    fn from_wire(data: Value, _links: &Links) -> Result<Self, ClientError> {
        let w: WireField = decode(Self::KIND, data)?;
        Ok(Field {
            base: w.base.into(),
            type_name: w.type_name,
            visibility: w.visibility,
            is_static: w.is_static,
        })
    }
}

impl Resource for EnumConstant {
    const KIND: &'static str = "enumConstant";
    const EMBEDDED_KEY: &'static str = "enumConstantList";

    fn from_wire(data: Value, _links: &Links) -> Result<Self, ClientError> {
        let w: WireLightWeight = decode(Self::KIND, data)?;
        Ok(EnumConstant { base: w.into() })
    }
}

impl Resource for Body {
    const KIND: &'static str = "body";
    const EMBEDDED_KEY: &'static str = "bodyList";

    fn from_wire(data: Value, _links: &Links) -> Result<Self, ClientError> {
        decode(Self::KIND, data)
    }
}

impl Resource for CallGraphRelation {
    const KIND: &'static str = "callGraphRelation";
    const EMBEDDED_KEY: &'static str = "callGraphRelationList";

    fn from_wire(data: Value, _links: &Links) -> Result<Self, ClientError> {
        decode(Self::KIND, data)
    }
}
