//! java2uml - typed async client for the Java2UML analysis service.
//!
//! The Java2UML server parses a zipped Java code base and serves what it
//! found (classes, enums, relations, members, bodies, call graphs and class
//! diagrams) over a HAL-flavoured REST API. This crate uploads the archive,
//! waits for the asynchronous parts of the analysis, and maps every response
//! onto plain Rust types.
//!
//! # Architecture
//!
//! - `client`: [`Java2Uml`], one method per server resource
//! - `session`: the configured HTTP client and status classification
//! - `normalize`: raw JSON to typed records, link flattening
//! - `retry`: bounded retry used while the server answers 202
//! - `model`: the typed records
//! - `config`: client configuration, loadable from YAML
//! - `upload`: multipart archive upload with progress reporting
//!
//! # Logging
//!
//! The crate emits `tracing` events and never installs a subscriber. Failed
//! requests are reported once at `error`, polling attempts at `info` and
//! response statuses at `debug`.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod retry;
pub mod session;
pub mod upload;

pub use client::Java2Uml;
pub use config::ClientConfig;
pub use error::{ClientError, LinkError};
pub use model::{
    Body, CallGraphRelation, ClassOrInterface, ClassRelation, CollectionModel, Constructor,
    EntityModel, Enum, EnumConstant, ErrorResponse, Field, LightWeight, Links, Method, Param,
    ProjectInfo, Source, UmlBody,
};
pub use retry::RetryPolicy;
pub use upload::{UploadArchive, UploadProgress};
