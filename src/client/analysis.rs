//! Results the server computes after the upload: the parsed source and the
//! class diagram. All of these may answer 202 and are polled.

use super::{paths, Java2Uml};
use crate::error::ClientError;
use crate::model::{EntityModel, Source, UmlBody};

impl Java2Uml {
    /// The parsed source of the bound project, polling while parsing runs.
    ///
    /// The source id is cached until the next upload; later calls fetch the
    /// source by that id.
    pub async fn get_source(&mut self) -> Result<EntityModel<Source>, ClientError> {
        let limit = self.config.retry_limit();
        self.get_source_with_retries(limit).await
    }

    /// [`get_source`](Self::get_source) with an explicit attempt budget.
    pub async fn get_source_with_retries(
        &mut self,
        retry_limit: u32,
    ) -> Result<EntityModel<Source>, ClientError> {
        let project_id = self.require_project("get_source")?;
        let path = match self.source_id {
            Some(source_id) => paths::with_id(paths::SOURCE, source_id),
            None => paths::with_id(paths::SOURCE_BY_PROJECT_INFO, project_id),
        };

        let this: &Self = self;
        let path = path.as_str();
        let source = this
            .poll(retry_limit, move || this.fetch::<Source>(path))
            .await?;

        self.source_id = Some(source.content.id);
        Ok(source)
    }

    /// PlantUML code of the class diagram.
    pub async fn get_plant_uml_code(&self) -> Result<EntityModel<UmlBody>, ClientError> {
        self.get_plant_uml_code_with_retries(self.config.retry_limit())
            .await
    }

    pub async fn get_plant_uml_code_with_retries(
        &self,
        retry_limit: u32,
    ) -> Result<EntityModel<UmlBody>, ClientError> {
        let project_id = self.require_project("get_plant_uml_code")?;
        let path = paths::with_id(paths::PLANT_UML_CODE, project_id);
        let path = path.as_str();
        self.poll(retry_limit, move || self.fetch::<UmlBody>(path))
            .await
    }

    /// The class diagram as an SVG document.
    pub async fn get_uml_svg(&self) -> Result<String, ClientError> {
        self.get_uml_svg_with_retries(self.config.retry_limit())
            .await
    }

    pub async fn get_uml_svg_with_retries(&self, retry_limit: u32) -> Result<String, ClientError> {
        let project_id = self.require_project("get_uml_svg")?;
        let path = paths::with_id(paths::UML_SVG, project_id);
        let path = path.as_str();
        self.poll(retry_limit, move || self.session.get_text(path))
            .await
    }
}
