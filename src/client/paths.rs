//! Resource paths, relative to the configured base URL.

pub const FILE_UPLOAD: &str = "/files";
pub const PROJECT_INFO: &str = "/project-info";

pub const SOURCE: &str = "/source";
pub const SOURCE_BY_PROJECT_INFO: &str = "/source/by-project-info";

pub const PLANT_UML_CODE: &str = "/uml/plant-uml-code";
pub const UML_SVG: &str = "/uml/svg";

pub const CLASS_OR_INTERFACE: &str = "/class-or-interface";
pub const CLASS_OR_INTERFACE_BY_SOURCE: &str = "/class-or-interface/by-source";
pub const ENUM: &str = "/enum";
pub const ENUM_BY_SOURCE: &str = "/enum/by-source";
pub const CLASS_RELATION: &str = "/class-relation";
pub const CLASS_RELATION_BY_SOURCE: &str = "/class-relation/by-source";

pub const METHOD: &str = "/method";
pub const METHOD_BY_PARENT: &str = "/method/by-parent";
pub const CALL_GRAPH: &str = "/method/call-graph";
pub const CONSTRUCTOR: &str = "/constructor";
pub const CONSTRUCTOR_BY_PARENT: &str = "/constructor/by-parent";
pub const FIELD: &str = "/field";
pub const FIELD_BY_PARENT: &str = "/field/by-parent";
pub const ENUM_CONSTANT: &str = "/enum-constant";
pub const ENUM_CONSTANT_BY_ENUM: &str = "/enum-constant/by-enum";
pub const BODY: &str = "/body";
pub const BODY_BY_PARENT: &str = "/body/by-parent";

/// `{base}/{id}`
pub fn with_id(base: &str, id: i64) -> String {
    format!("{}/{}", base, id)
}
