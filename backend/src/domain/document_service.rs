//! Travel document registry: passports, visas, tickets and reservations
//! attached to a trip by reference.

use anyhow::{anyhow, Result};
use chrono::Utc;
use log::{error, info, warn};
use shared::{CreateDocumentRequest, TravelDocument};
use std::sync::{Arc, Mutex};

use crate::storage::{load_collection, save_collection, StorageBackend, DOCUMENTS_KEY};

/// Bookkeeping only: the service stores metadata and an opaque `file_ref`,
/// never file contents.
#[derive(Clone)]
pub struct DocumentService<S: StorageBackend> {
    backend: Arc<S>,
    documents: Arc<Mutex<Vec<TravelDocument>>>,
}

impl<S: StorageBackend> DocumentService<S> {
    pub fn new(backend: Arc<S>) -> Self {
        let documents: Vec<TravelDocument> = match load_collection(backend.as_ref(), DOCUMENTS_KEY)
        {
            Ok(documents) => documents,
            Err(e) => {
                error!(
                    "Failed to load documents, starting with an empty list: {}",
                    e
                );
                Vec::new()
            }
        };
        info!("Loaded {} documents", documents.len());

        Self {
            backend,
            documents: Arc::new(Mutex::new(documents)),
        }
    }

    pub fn add_document(
        &self,
        trip_id: &str,
        request: CreateDocumentRequest,
    ) -> Result<TravelDocument> {
        if request.name.trim().is_empty() {
            return Err(anyhow!("Document name must not be empty"));
        }
        if request.file_ref.trim().is_empty() {
            return Err(anyhow!("Document file reference must not be empty"));
        }

        let document = TravelDocument {
            id: TravelDocument::generate_id(),
            trip_id: trip_id.to_string(),
            name: request.name,
            kind: request.kind,
            file_ref: request.file_ref,
            uploaded_at: Utc::now().to_rfc3339(),
        };

        let mut documents = self.documents.lock().unwrap();
        documents.push(document.clone());
        self.persist(&documents);

        info!("Registered document {} for trip {}", document.id, trip_id);
        Ok(document)
    }

    pub fn delete_document(&self, document_id: &str) -> Result<bool> {
        let mut documents = self.documents.lock().unwrap();

        let initial_len = documents.len();
        documents.retain(|d| d.id != document_id);
        let removed = documents.len() < initial_len;

        if removed {
            self.persist(&documents);
            info!("Deleted document {}", document_id);
        } else {
            warn!("Document {} not found, nothing to delete", document_id);
        }

        Ok(removed)
    }

    /// Documents for one trip in the order they were registered
    pub fn list_documents(&self, trip_id: &str) -> Vec<TravelDocument> {
        let documents = self.documents.lock().unwrap();
        documents
            .iter()
            .filter(|d| d.trip_id == trip_id)
            .cloned()
            .collect()
    }

    pub fn get_document(&self, document_id: &str) -> Option<TravelDocument> {
        let documents = self.documents.lock().unwrap();
        documents.iter().find(|d| d.id == document_id).cloned()
    }

    pub fn document_count(&self) -> usize {
        let documents = self.documents.lock().unwrap();
        documents.len()
    }

    fn persist(&self, documents: &[TravelDocument]) {
        if let Err(e) = save_collection(self.backend.as_ref(), DOCUMENTS_KEY, documents) {
            warn!("Failed to persist documents, in-memory state kept: {}", e);
        }
    }
}
