//! Members of a class, interface or enum, their bodies, and call graphs.
//!
//! Lists are looked up by the id of the owning type. That id is not known
//! up front; read it from the owner's links, e.g.
//! `class.link_id("methods")`.

use super::{paths, Java2Uml};
use crate::error::ClientError;
use crate::model::{
    Body, CallGraphRelation, CollectionModel, Constructor, EntityModel, EnumConstant, Field,
    Method,
};

impl Java2Uml {
    /// Methods declared by the class, interface or enum with id `parent_id`.
    pub async fn get_methods(
        &self,
        parent_id: i64,
    ) -> Result<CollectionModel<Method>, ClientError> {
        self.fetch_collection(&paths::with_id(paths::METHOD_BY_PARENT, parent_id))
            .await
    }

    pub async fn get_method(&self, id: i64) -> Result<EntityModel<Method>, ClientError> {
        self.fetch(&paths::with_id(paths::METHOD, id)).await
    }

    /// Call graph rooted at the method with id `method_id`.
    pub async fn get_call_graph(
        &self,
        method_id: i64,
    ) -> Result<CollectionModel<CallGraphRelation>, ClientError> {
        self.fetch_collection(&paths::with_id(paths::CALL_GRAPH, method_id))
            .await
    }

    pub async fn get_constructors(
        &self,
        parent_id: i64,
    ) -> Result<CollectionModel<Constructor>, ClientError> {
        self.fetch_collection(&paths::with_id(paths::CONSTRUCTOR_BY_PARENT, parent_id))
            .await
    }

    pub async fn get_constructor(&self, id: i64) -> Result<EntityModel<Constructor>, ClientError> {
        self.fetch(&paths::with_id(paths::CONSTRUCTOR, id)).await
    }

    pub async fn get_fields(&self, parent_id: i64) -> Result<CollectionModel<Field>, ClientError> {
        self.fetch_collection(&paths::with_id(paths::FIELD_BY_PARENT, parent_id))
            .await
    }

    pub async fn get_field(&self, id: i64) -> Result<EntityModel<Field>, ClientError> {
        self.fetch(&paths::with_id(paths::FIELD, id)).await
    }

    /// Constants of the enum with id `enum_id`.
    pub async fn get_enum_constants(
        &self,
        enum_id: i64,
    ) -> Result<CollectionModel<EnumConstant>, ClientError> {
        self.fetch_collection(&paths::with_id(paths::ENUM_CONSTANT_BY_ENUM, enum_id))
            .await
    }

    pub async fn get_enum_constant(
        &self,
        id: i64,
    ) -> Result<EntityModel<EnumConstant>, ClientError> {
        self.fetch(&paths::with_id(paths::ENUM_CONSTANT, id)).await
    }

    /// Source text of the element with id `parent_id`.
    pub async fn get_body(&self, parent_id: i64) -> Result<EntityModel<Body>, ClientError> {
        self.fetch(&paths::with_id(paths::BODY_BY_PARENT, parent_id))
            .await
    }

    /// A body by its own id.
    pub async fn get_body_by_id(&self, id: i64) -> Result<EntityModel<Body>, ClientError> {
        self.fetch(&paths::with_id(paths::BODY, id)).await
    }
}
