use async_trait::async_trait;
use chrono::Utc;
use domain::{Document, DocumentId, SearchRequest};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

// --- Application Errors ---
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Infrastructure error: {0}")]
    InfrastructureError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

// --- Infrastructure Interfaces (Traits) ---

/// Interface for storing and retrieving documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Inserts or replaces the document stored under `document.id`.
    /// The document must already carry an id.
    async fn save(&self, document: &Document) -> Result<(), ApplicationError>;
    /// Retrieves a document by exact id.
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError>;
    /// Returns every stored document matching all criteria of the request.
    /// Result order is unspecified.
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError>;
    /// Returns the number of stored documents.
    async fn count(&self) -> Result<usize, ApplicationError>;
}

// --- Application Services (Use Cases) ---

/// Service implementing upsert and search over a document repository.
pub struct DocumentService {
    doc_repo: Arc<dyn DocumentRepository>,
}

impl DocumentService {
    pub fn new(doc_repo: Arc<dyn DocumentRepository>) -> Self {
        Self { doc_repo }
    }

    /// Upserts the document, assigning an id and creation time when missing.
    /// The returned document is the stored value.
    #[instrument(skip(self, document), fields(has_id = document.id.is_some()))]
    pub async fn save(&self, mut document: Document) -> Result<Document, ApplicationError> {
        let doc_id = document.stamp(Utc::now());
        debug!(doc_id = %doc_id, created = ?document.created, "Document stamped for storage");

        if let Err(e) = self.doc_repo.save(&document).await {
            error!(doc_id = %doc_id, "Failed to save document to repository: {}", e);
            return Err(ApplicationError::InfrastructureError(format!(
                "Repository save failed: {}",
                e
            )));
        }
        info!(doc_id = %doc_id, "Document saved successfully");
        Ok(document)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Document>, ApplicationError> {
        debug!("Looking up document by id");
        self.doc_repo.get(&DocumentId::from(id)).await
    }

    /// Like [`DocumentService::find_by_id`] but treats a miss as an error.
    pub async fn get_by_id(&self, id: &str) -> Result<Document, ApplicationError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, request), fields(unconstrained = request.is_unconstrained()))]
    pub async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError> {
        let documents = self.doc_repo.search(request).await?;
        info!(hits = documents.len(), "Search finished");
        Ok(documents)
    }

    pub async fn count(&self) -> Result<usize, ApplicationError> {
        self.doc_repo.count().await
    }
}
