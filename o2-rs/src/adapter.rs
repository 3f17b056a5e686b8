//! Hand-off of promoted documents to a static-site generator.

use crate::document::Document;
use crate::error::Result;
use tracing::info;

/// Receives the finalized documents of a promotion run.
///
/// Format translation (front matter, permalinks) belongs to the adapter. An
/// error is returned from the promotion unchanged, as
/// [`crate::error::O2Error::AdapterError`].
pub trait SiteAdapter: Send + Sync {
    fn publish(&self, documents: &[Document]) -> Result<()>;
}

/// Adapter that accepts every batch and only logs it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAdapter;

impl SiteAdapter for NoopAdapter {
    fn publish(&self, documents: &[Document]) -> Result<()> {
        info!(count = documents.len(), "site adapter received batch");
        for doc in documents {
            info!(path = %doc.path.display(), "ready for site generator");
        }
        Ok(())
    }
}
