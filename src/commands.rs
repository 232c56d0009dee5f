use std::{path::Path, sync::Arc};

use anyhow::Result;

use crate::data::{Dataset, DatasetCache};

pub mod render;
pub mod report;

fn load_dataset(boundaries: &Path, wards: &Path) -> Result<Arc<Dataset>> {
    let mut cache = DatasetCache::new();
    let dataset = cache.load(boundaries, wards)?;
    println!(
        "[load] {} boundary features, {} ward records",
        dataset.features.len(),
        dataset.records.len()
    );
    Ok(dataset)
}
