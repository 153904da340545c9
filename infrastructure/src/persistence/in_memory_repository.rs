// ./infrastructure/src/persistence/in_memory_repository.rs
use crate::search::check_doc_matches_request;
use application::{ApplicationError, DocumentRepository};
use async_trait::async_trait;
use dashmap::DashMap;
use domain::{Document, DocumentId, SearchRequest};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Document repository backed by a concurrent map. Search is a linear scan.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentRepository {
    // Document ID -> Document
    store: Arc<DashMap<DocumentId, Arc<Document>>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    #[instrument(skip(self, document))]
    async fn save(&self, document: &Document) -> Result<(), ApplicationError> {
        let Some(id) = document.id.clone() else {
            warn!("Refusing to store a document without an id");
            return Err(ApplicationError::InvalidInput(
                "Document must have an id before it is stored".to_string(),
            ));
        };
        debug!(doc_id = %id, "Saving document to in-memory store");
        // Insert or replace; the store keeps its own copy
        self.store.insert(id, Arc::new(document.clone()));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &DocumentId) -> Result<Option<Document>, ApplicationError> {
        debug!(doc_id = %id, "Getting document from in-memory store");
        let doc = self.store.get(id).map(|doc_ref| (**doc_ref).clone());
        Ok(doc)
    }

    #[instrument(skip(self, request))]
    async fn search(&self, request: &SearchRequest) -> Result<Vec<Document>, ApplicationError> {
        debug!(
            stored = self.store.len(),
            unconstrained = request.is_unconstrained(),
            "Scanning in-memory store"
        );
        let hits: Vec<Document> = self
            .store
            .iter()
            .filter(|entry| check_doc_matches_request(entry.value(), request))
            .map(|entry| (**entry.value()).clone())
            .collect();
        debug!(hits = hits.len(), "In-memory search finished.");
        Ok(hits)
    }

    async fn count(&self) -> Result<usize, ApplicationError> {
        Ok(self.store.len())
    }
}
