//! Ward boundary matching and incremental map rendering for
//! water-distribution analytics.
//!
//! The pipeline: load a boundary GeoJSON and a ward-metrics JSON into a
//! [`Dataset`], pair the two collections by name with [`Matcher`], derive a
//! [`SpatialIndex`] over the boundaries, then paint with [`Renderer`] (chunked
//! and cancelable) and answer hover queries with [`HitTester`]. [`MatchReport`]
//! exports the pairing for offline auditing.

pub mod cli;
pub mod commands;
mod data;
mod hit;
mod matching;
mod render;
mod report;
mod spatial;

#[doc(inline)]
pub use data::{BoundaryFeature, Dataset, DatasetCache, MetricBundle, WardRecord};

#[doc(inline)]
pub use matching::{
    MatchIndex, MatchMethod, MatchOutcome, MatchRun, Matcher, MatcherConfig, distance, normalize,
    similarity,
};

#[doc(inline)]
pub use spatial::{DETAIL_TOLERANCE, PREVIEW_TOLERANCE, SpatialIndex};

#[doc(inline)]
pub use render::{
    CacheKey, FillStyle, MAX_ZOOM, MIN_ZOOM, MapTransform, MetricView, PassState, RenderProgress,
    Renderer, Rgb, Surface, ViewState, metric_style,
};

#[doc(inline)]
pub use hit::{Hit, HitTester};

#[doc(inline)]
pub use report::MatchReport;
