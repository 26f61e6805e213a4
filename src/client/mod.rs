//! The Java2UML client.
//!
//! A [`Java2Uml`] is bound to at most one uploaded project at a time. The
//! upload returns the project id, and everything else hangs off it: the
//! parsed source, the diagrams, and through the source the classes, enums
//! and relations. Members and bodies are addressed by the id of their
//! owner, which callers read from the links of earlier responses.
//!
//! # Concurrency
//!
//! Operations that may rebind the project or cache the source id take
//! `&mut self`, so one client serves one caller at a time. Wrap it in a
//! `tokio::sync::Mutex` to share it between tasks.
//!
//! # Polling
//!
//! The source, the PlantUML code and the SVG diagram are computed after the
//! upload. Until they are ready the server answers 202 and the client asks
//! again, [`ClientConfig::retry_limit`] times in total with
//! [`ClientConfig::poll_delay`] in between. A polling call can therefore
//! take up to `timeout × limit + delay × (limit − 1)`; see
//! [`ClientConfig::worst_case_poll_latency`].

mod analysis;
mod members;
pub mod paths;
mod types;

use std::future::Future;
use std::path::Path;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::model::{CollectionModel, EntityModel, ProjectInfo};
use crate::normalize::{normalize_collection, normalize_entity, Resource};
use crate::retry::retry_if;
use crate::session::HttpSession;
use crate::upload::{UploadArchive, UploadProgress};

/// Typed client for one Java2UML server.
///
/// # Example
///
/// ```rust,no_run
/// use java2uml::{ClientConfig, Java2Uml};
///
/// # async fn run() -> Result<(), java2uml::ClientError> {
/// let mut client = Java2Uml::new(ClientConfig::new("http://localhost:8090/api"))?;
/// client.upload_file("shapes.zip").await?;
///
/// for class in client.get_class_or_interfaces().await?.content {
///     let methods = client.get_methods(class.link_id("methods")?).await?;
///     println!("{}: {} methods", class.content.base.name, methods.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Java2Uml {
    config: ClientConfig,
    session: HttpSession,
    project_id: Option<i64>,
    source_id: Option<i64>,
}

impl Java2Uml {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let session = HttpSession::new(&config)?;
        Ok(Self {
            config,
            session,
            project_id: None,
            source_id: None,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Id of the project this client is bound to, if any.
    pub fn project_id(&self) -> Option<i64> {
        self.project_id
    }

    /// Id of the parsed source, once it has been resolved.
    pub fn source_id(&self) -> Option<i64> {
        self.source_id
    }

    /// Upload a code archive and bind the client to the new project.
    ///
    /// Any previous binding is replaced and the cached source id dropped.
    /// On failure the previous binding is left untouched.
    pub async fn upload(
        &mut self,
        archive: UploadArchive,
    ) -> Result<EntityModel<ProjectInfo>, ClientError> {
        self.upload_with_progress(archive, |_| {}).await
    }

    /// [`upload`](Self::upload), reporting progress as the archive is sent.
    pub async fn upload_with_progress<F>(
        &mut self,
        archive: UploadArchive,
        on_progress: F,
    ) -> Result<EntityModel<ProjectInfo>, ClientError>
    where
        F: FnMut(UploadProgress) + Send + Sync + 'static,
    {
        tracing::info!(
            file = %archive.file_name,
            bytes = archive.len(),
            "uploading archive"
        );
        let form = archive.into_form(on_progress)?;
        let raw = self.session.post_multipart(paths::FILE_UPLOAD, form).await?;
        let project = normalize_entity::<ProjectInfo>(raw)?;

        self.project_id = Some(project.content.id);
        self.source_id = None;
        tracing::info!(project_id = project.content.id, "bound to project");
        Ok(project)
    }

    /// Read an archive from disk and [`upload`](Self::upload) it.
    pub async fn upload_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<EntityModel<ProjectInfo>, ClientError> {
        let archive = UploadArchive::from_path(path).await?;
        self.upload(archive).await
    }

    /// Information about the uploaded project.
    pub async fn get_project_info(&self) -> Result<EntityModel<ProjectInfo>, ClientError> {
        let project_id = self.require_project("get_project_info")?;
        self.fetch(&paths::with_id(paths::PROJECT_INFO, project_id))
            .await
    }

    /// Remove the project and everything parsed from it on the server, then
    /// unbind the client.
    pub async fn delete(&mut self) -> Result<(), ClientError> {
        let project_id = self.require_project("delete")?;
        self.session
            .delete(&paths::with_id(paths::PROJECT_INFO, project_id))
            .await?;

        tracing::info!(project_id, "deleted project");
        self.project_id = None;
        self.source_id = None;
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn require_project(&self, operation: &'static str) -> Result<i64, ClientError> {
        self.project_id
            .ok_or(ClientError::NoProject { operation })
    }

    /// Source id, resolving (and polling for) it on first use.
    async fn require_source(&mut self, operation: &'static str) -> Result<i64, ClientError> {
        self.require_project(operation)?;
        if let Some(source_id) = self.source_id {
            return Ok(source_id);
        }
        let source = self.get_source().await?;
        Ok(source.content.id)
    }

    async fn fetch<T: Resource>(&self, path: &str) -> Result<EntityModel<T>, ClientError> {
        let raw = self.session.get_json(path).await?;
        normalize_entity(raw)
    }

    async fn fetch_collection<T: Resource>(
        &self,
        path: &str,
    ) -> Result<CollectionModel<T>, ClientError> {
        let raw = self.session.get_json(path).await?;
        normalize_collection(raw)
    }

    /// Repeat `op` while the server answers 202, up to `retry_limit` attempts.
    async fn poll<T, F, Fut>(&self, retry_limit: u32, op: F) -> Result<T, ClientError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        retry_if(
            self.config.retry_policy(retry_limit),
            op,
            ClientError::is_not_ready,
        )
        .await
    }
}
