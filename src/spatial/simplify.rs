use geo::{LineString, MultiPolygon, Polygon};

/// Coarse tolerance (degrees) for the instant first-paint pass.
pub const PREVIEW_TOLERANCE: f64 = 0.005;
/// Fine tolerance (degrees) for interactive detail rendering.
pub const DETAIL_TOLERANCE: f64 = 0.0005;

/// Proximity thinning: keep a point if it is the first, the last, or further
/// than `tolerance` from the last kept point.
///
/// This is a lossy preview aid, not a topology-preserving simplification;
/// hit-testing always uses the full-resolution geometry.
pub fn thin_ring(ring: &LineString<f64>, tolerance: f64) -> LineString<f64> {
    if ring.0.len() <= 2 {
        return ring.clone();
    }
    let last_idx = ring.0.len() - 1;
    let mut kept = Vec::with_capacity(ring.0.len());
    kept.push(ring.0[0]);
    for (i, coord) in ring.0.iter().enumerate().skip(1) {
        if i == last_idx {
            kept.push(*coord);
            continue;
        }
        let anchor = kept[kept.len() - 1];
        let dx = coord.x - anchor.x;
        let dy = coord.y - anchor.y;
        if (dx * dx + dy * dy).sqrt() > tolerance {
            kept.push(*coord);
        }
    }
    LineString(kept)
}

pub fn thin_polygon(polygon: &Polygon<f64>, tolerance: f64) -> Polygon<f64> {
    Polygon::new(
        thin_ring(polygon.exterior(), tolerance),
        polygon.interiors().iter().map(|ring| thin_ring(ring, tolerance)).collect(),
    )
}

pub fn thin_multipolygon(shape: &MultiPolygon<f64>, tolerance: f64) -> MultiPolygon<f64> {
    MultiPolygon(shape.0.iter().map(|p| thin_polygon(p, tolerance)).collect())
}
