//! Results management: listing, export and cleanup of completed logs
//!
//! Every name coming from a client goes through `store::resolve_target`
//! before the filesystem is touched.

use annemo_common::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::store::AppendLogStore;

pub struct ResultsManager {
    store: Arc<AppendLogStore>,
}

impl ResultsManager {
    pub fn new(store: Arc<AppendLogStore>) -> Self {
        Self { store }
    }

    pub async fn directory_writable(&self) -> bool {
        self.store.is_writable().await
    }

    pub async fn list(&self) -> Result<Vec<String>> {
        self.store.list().await
    }

    /// Resolved file name and its contents
    pub async fn export(&self, name: &str) -> Result<(String, Vec<u8>)> {
        self.store.read(name).await
    }

    pub async fn delete(&self, name: &str) -> Result<String> {
        match self.store.delete(name).await {
            Ok(removed) => {
                info!("Deleted results file {}", removed);
                Ok(removed)
            }
            Err(e) => {
                warn!("Refused to delete {:?}: {}", name, e);
                Err(e)
            }
        }
    }
}
