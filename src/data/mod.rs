mod cache;
mod geojson;
mod wards;

pub use cache::DatasetCache;
pub use geojson::read_boundaries;
pub use wards::read_wards;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

/// Six-field metric snapshot for one ward, either before or after optimization.
///
/// Well-formed input satisfies `shortage == max(0, demand - supply)` and
/// `shortage_pct == shortage / demand * 100`, but nothing here assumes it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricBundle {
    pub pressure: f64,
    pub demand: f64,
    pub supply: f64,
    pub shortage: f64,
    pub shortage_pct: f64,
    pub leakage: f64,
}

impl MetricBundle {
    /// Shortage implied by demand and supply, floored at zero.
    pub fn expected_shortage(&self) -> f64 {
        (self.demand - self.supply).max(0.0)
    }

    /// Supply as a percentage of demand. Not finite when demand is zero.
    pub fn supply_demand_ratio(&self) -> f64 {
        self.supply / self.demand * 100.0
    }
}

/// One ward's performance record: a before/after metric pair plus a free-text
/// explanation of the optimization outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardRecord {
    pub id: String,
    pub name: String,
    pub before: MetricBundle,
    pub after: MetricBundle,
    #[serde(default)]
    pub explanation: String,
}

impl WardRecord {
    /// Drop in shortage percentage (positive is better).
    pub fn shortage_improvement(&self) -> f64 {
        self.before.shortage_pct - self.after.shortage_pct
    }

    /// Gain in pressure head, in meters.
    pub fn pressure_improvement(&self) -> f64 {
        self.after.pressure - self.before.pressure
    }

    /// Drop in leakage rate (positive is better).
    pub fn leakage_reduction(&self) -> f64 {
        self.before.leakage - self.after.leakage
    }

    /// Composite score used for ranking and the efficiency color view.
    pub fn efficiency_score(&self) -> f64 {
        self.shortage_improvement() * 10.0 + self.pressure_improvement() * 2.0 - self.after.leakage
    }

    pub fn is_critical(&self) -> bool {
        self.after.shortage_pct > 10.0
    }

    pub fn is_improved(&self) -> bool {
        self.shortage_improvement() > 0.0
    }

    pub fn is_top_performer(&self) -> bool {
        self.shortage_improvement() > 5.0
    }

    /// Zeroed stand-in for a boundary feature with no matching record, so
    /// hover and tooltip surfaces never have to branch on missing ward data.
    pub fn placeholder(feature: &BoundaryFeature) -> Self {
        let name = if feature.ward_name.is_empty() {
            if feature.ward_no.is_empty() { "Unknown Ward".to_string() } else { feature.ward_no.clone() }
        } else {
            feature.ward_name.clone()
        };
        let id = if feature.ward_no.is_empty() { name.to_lowercase() } else { feature.ward_no.to_lowercase() };
        Self {
            id,
            name,
            before: MetricBundle::default(),
            after: MetricBundle::default(),
            explanation: "No metrics available".to_string(),
        }
    }
}

/// One administrative boundary polygon from the GeoJSON source.
///
/// Derived data (bounds, simplified variants) lives in `SpatialIndex`, keyed
/// by position in the loaded feature list; the feature itself stays immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    /// Free-text ward label (`KGISWardName`). May be empty.
    pub ward_name: String,
    /// Ward number or identifier (`KGISWardNo` / `KGISWardID`), kept as text.
    pub ward_no: String,
    /// Full-resolution geometry. Empty when the source geometry was malformed.
    pub shape: MultiPolygon<f64>,
}

impl BoundaryFeature {
    pub fn has_geometry(&self) -> bool {
        !self.shape.0.is_empty()
    }
}

/// The pair of input collections the whole pipeline is computed from.
/// Loaded once per session and read-only afterwards.
#[derive(Debug, Default)]
pub struct Dataset {
    pub features: Vec<BoundaryFeature>,
    pub records: Vec<WardRecord>,
}

impl Dataset {
    pub fn new(features: Vec<BoundaryFeature>, records: Vec<WardRecord>) -> Self {
        Self { features, records }
    }
}
