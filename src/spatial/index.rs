use geo::{MultiPolygon, Rect};
use rstar::{AABB, RTree, RTreeObject};
use tracing::warn;

use crate::data::BoundaryFeature;

use super::{
    bounds::{collection_bounds, shape_bounds},
    simplify::{DETAIL_TOLERANCE, PREVIEW_TOLERANCE, thin_multipolygon},
};

/// Feature bounding box stored in the R-tree, tagged with its feature index.
#[derive(Debug, Clone)]
struct BoundingBox {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl BoundingBox {
    fn new(index: usize, rect: &Rect<f64>) -> Self {
        Self {
            index,
            envelope: AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
        }
    }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Render-ready derived geometry for one loaded feature collection:
/// per-feature bounds, preview/detail thinned variants, and an R-tree for
/// envelope queries. Indices align with the source feature list.
#[derive(Debug)]
pub struct SpatialIndex {
    bounds: Vec<Option<Rect<f64>>>,
    preview: Vec<MultiPolygon<f64>>,
    detail: Vec<MultiPolygon<f64>>,
    overall: Option<Rect<f64>>,
    rtree: RTree<BoundingBox>,
}

impl SpatialIndex {
    /// Precompute bounds and both simplification tiers for every feature.
    /// Features without usable geometry get empty variants and no R-tree
    /// entry; they are skipped by rendering and hit testing.
    pub fn build(features: &[BoundaryFeature]) -> Self {
        let mut bounds = Vec::with_capacity(features.len());
        let mut preview = Vec::with_capacity(features.len());
        let mut detail = Vec::with_capacity(features.len());
        let mut boxes = Vec::new();

        for (idx, feature) in features.iter().enumerate() {
            match shape_bounds(&feature.shape) {
                Some(rect) => {
                    boxes.push(BoundingBox::new(idx, &rect));
                    bounds.push(Some(rect));
                    preview.push(thin_multipolygon(&feature.shape, PREVIEW_TOLERANCE));
                    detail.push(thin_multipolygon(&feature.shape, DETAIL_TOLERANCE));
                }
                None => {
                    warn!(feature = idx, name = %feature.ward_name, "feature has no usable geometry");
                    bounds.push(None);
                    preview.push(MultiPolygon(vec![]));
                    detail.push(MultiPolygon(vec![]));
                }
            }
        }

        let overall = collection_bounds(bounds.iter().flatten());
        Self { bounds, preview, detail, overall, rtree: RTree::bulk_load(boxes) }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    /// Bounding box of one feature, if it has usable geometry.
    #[inline]
    pub fn bounds(&self, feature: usize) -> Option<&Rect<f64>> {
        self.bounds.get(feature).and_then(|b| b.as_ref())
    }

    /// Union bounds of the whole collection.
    #[inline]
    pub fn overall(&self) -> Option<&Rect<f64>> {
        self.overall.as_ref()
    }

    /// Coarse geometry for the first-paint pass.
    #[inline]
    pub fn preview(&self, feature: usize) -> &MultiPolygon<f64> {
        &self.preview[feature]
    }

    /// Fine geometry for detail rendering.
    #[inline]
    pub fn detail(&self, feature: usize) -> &MultiPolygon<f64> {
        &self.detail[feature]
    }

    /// Feature indices whose bounds contain the given point, in ascending
    /// feature order so downstream "first containing feature" scans are
    /// deterministic.
    pub fn candidates_at(&self, lng: f64, lat: f64) -> Vec<usize> {
        let mut hits: Vec<usize> = self
            .rtree
            .locate_in_envelope_intersecting(&AABB::from_point([lng, lat]))
            .map(|b| b.index)
            .collect();
        hits.sort_unstable();
        hits
    }
}
