use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::{
    data::Dataset,
    matching::{MatchIndex, MatchMethod},
};

/// Coordinate-sum fingerprint of a feature's exterior ring, kept as running
/// sums so two exports of the same geometry compare field-for-field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
    pub count: usize,
}

/// One row of the mapping report: how a boundary feature was (or wasn't)
/// paired with a ward record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingEntry {
    #[serde(rename = "featureIndex")]
    pub feature_index: usize,
    #[serde(rename = "KGISWardNo")]
    pub ward_no: String,
    #[serde(rename = "KGISWardName")]
    pub ward_name: String,
    #[serde(rename = "matchedWardId")]
    pub matched_ward_id: Option<String>,
    #[serde(rename = "matchedWardName")]
    pub matched_ward_name: Option<String>,
    #[serde(rename = "matchMethod")]
    pub match_method: MatchMethod,
    #[serde(rename = "matchScore")]
    pub match_score: f64,
    pub centroid: Centroid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MethodCounts {
    pub exact: usize,
    pub contains: usize,
    pub id: usize,
    pub fuzzy: usize,
    pub none: usize,
    /// Only present when the token fallback tier was enabled and fired.
    #[serde(skip_serializing_if = "is_zero")]
    pub token: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MatchStats {
    #[serde(rename = "totalFeatures")]
    pub total_features: usize,
    #[serde(rename = "matchedFeatures")]
    pub matched_features: usize,
    #[serde(rename = "byMatchMethod")]
    pub by_match_method: MethodCounts,
    #[serde(rename = "uniqueWardsMapped")]
    pub unique_wards_mapped: usize,
    #[serde(rename = "totalWardData")]
    pub total_ward_data: usize,
}

/// The full mapping diagnostic: aggregate statistics followed by one entry
/// per feature, in feature order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub stats: MatchStats,
    pub mappings: Vec<MappingEntry>,
}

impl MatchReport {
    pub fn build(dataset: &Dataset, matches: &MatchIndex) -> Self {
        let mut counts = MethodCounts::default();
        let mappings: Vec<MappingEntry> = dataset
            .features
            .iter()
            .enumerate()
            .map(|(index, feature)| {
                let outcome = matches.outcome(index).copied().unwrap_or_else(|| {
                    // Index built from a different feature list; treat as unmatched.
                    crate::matching::MatchOutcome {
                        method: MatchMethod::None,
                        score: 0.0,
                        record: None,
                    }
                });
                match outcome.method {
                    MatchMethod::Exact => counts.exact += 1,
                    MatchMethod::Contains => counts.contains += 1,
                    MatchMethod::Id => counts.id += 1,
                    MatchMethod::Fuzzy => counts.fuzzy += 1,
                    MatchMethod::Token => counts.token += 1,
                    MatchMethod::None => counts.none += 1,
                }
                let record = outcome.record.map(|r| &dataset.records[r]);
                MappingEntry {
                    feature_index: index,
                    ward_no: feature.ward_no.clone(),
                    ward_name: feature.ward_name.clone(),
                    matched_ward_id: record.map(|r| r.id.clone()),
                    matched_ward_name: record.map(|r| r.name.clone()),
                    match_method: outcome.method,
                    match_score: outcome.score,
                    centroid: exterior_sums(feature),
                }
            })
            .collect();

        let stats = MatchStats {
            total_features: mappings.len(),
            matched_features: matches.matched_count(),
            by_match_method: counts,
            unique_wards_mapped: matches.unique_records(),
            total_ward_data: dataset.records.len(),
        };

        info!(
            total = stats.total_features,
            matched = stats.matched_features,
            unique = stats.unique_wards_mapped,
            "mapping report built"
        );

        Self { stats, mappings }
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("[report] Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("[report] Failed to write {}", path.display()))?;
        Ok(())
    }
}

fn exterior_sums(feature: &crate::data::BoundaryFeature) -> Centroid {
    let mut centroid = Centroid::default();
    if let Some(polygon) = feature.shape.0.first() {
        for coord in &polygon.exterior().0 {
            centroid.x += coord.x;
            centroid.y += coord.y;
            centroid.count += 1;
        }
    }
    centroid
}
