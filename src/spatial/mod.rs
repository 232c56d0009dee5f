//! Derived per-feature geometry: bounding boxes, thinned coordinate variants,
//! and an R-tree over feature bounds. Kept as a parallel index so the loaded
//! features themselves stay untouched; invalidation is "drop the index".

mod bounds;
mod index;
mod simplify;

pub use bounds::{collection_bounds, shape_bounds};
pub use index::SpatialIndex;
pub use simplify::{DETAIL_TOLERANCE, PREVIEW_TOLERANCE, thin_multipolygon};
