//! Types declared in the parsed code base and the relations between them.

use super::{paths, Java2Uml};
use crate::error::ClientError;
use crate::model::{ClassOrInterface, ClassRelation, CollectionModel, EntityModel, Enum};

impl Java2Uml {
    /// Every class and interface of the parsed source, external ones included.
    pub async fn get_class_or_interfaces(
        &mut self,
    ) -> Result<CollectionModel<ClassOrInterface>, ClientError> {
        let source_id = self.require_source("get_class_or_interfaces").await?;
        self.fetch_collection(&paths::with_id(paths::CLASS_OR_INTERFACE_BY_SOURCE, source_id))
            .await
    }

    pub async fn get_class_or_interface(
        &self,
        id: i64,
    ) -> Result<EntityModel<ClassOrInterface>, ClientError> {
        self.fetch(&paths::with_id(paths::CLASS_OR_INTERFACE, id))
            .await
    }

    /// Every enum of the parsed source.
    pub async fn get_enums(&mut self) -> Result<CollectionModel<Enum>, ClientError> {
        let source_id = self.require_source("get_enums").await?;
        self.fetch_collection(&paths::with_id(paths::ENUM_BY_SOURCE, source_id))
            .await
    }

    pub async fn get_enum(&self, id: i64) -> Result<EntityModel<Enum>, ClientError> {
        self.fetch(&paths::with_id(paths::ENUM, id)).await
    }

    /// Every relation between the types of the parsed source.
    pub async fn get_class_relations(
        &mut self,
    ) -> Result<CollectionModel<ClassRelation>, ClientError> {
        let source_id = self.require_source("get_class_relations").await?;
        self.fetch_collection(&paths::with_id(paths::CLASS_RELATION_BY_SOURCE, source_id))
            .await
    }

    pub async fn get_class_relation(
        &self,
        id: i64,
    ) -> Result<EntityModel<ClassRelation>, ClientError> {
        self.fetch(&paths::with_id(paths::CLASS_RELATION, id))
            .await
    }
}
