use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use tracing::debug;

use super::{Dataset, geojson::read_boundaries, wards::read_wards};

/// Session cache for the loaded dataset pair.
///
/// Both sources are loaded together and kept until the source identity (the
/// path pair) changes or the cache is disposed. A failed load clears any
/// previously cached pair so a stale boundary set can never be served next to
/// a newer record set.
#[derive(Debug, Default)]
pub struct DatasetCache {
    source: Option<(PathBuf, PathBuf)>,
    dataset: Option<Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load (or reuse) the dataset identified by the two source paths.
    pub fn load(&mut self, boundaries: &Path, wards: &Path) -> Result<Arc<Dataset>> {
        let identity = (boundaries.to_path_buf(), wards.to_path_buf());
        if self.source.as_ref() == Some(&identity) {
            if let Some(dataset) = &self.dataset {
                debug!(?identity, "dataset cache hit");
                return Ok(Arc::clone(dataset));
            }
        }

        // Drop the old pair before touching disk; on failure the cache stays empty.
        self.source = None;
        self.dataset = None;

        let features = read_boundaries(boundaries)?;
        let records = read_wards(wards)?;
        debug!(features = features.len(), records = records.len(), "dataset loaded");

        let dataset = Arc::new(Dataset::new(features, records));
        self.source = Some(identity);
        self.dataset = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Explicit teardown; the next `load` re-reads both sources.
    pub fn dispose(&mut self) {
        self.source = None;
        self.dataset = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }
}
