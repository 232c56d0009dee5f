use std::sync::Arc;

use geo::{LineString, MultiPolygon};

use crate::{
    data::{Dataset, WardRecord},
    matching::MatchIndex,
    render::{MapTransform, ViewState},
    spatial::SpatialIndex,
};

/// Outcome of a screen-space probe: the feature under the cursor plus the
/// ward record to present for it. `matched` distinguishes real records from
/// placeholders synthesized for unmapped boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub feature: usize,
    pub record: WardRecord,
    pub matched: bool,
}

/// Resolves screen coordinates to ward features.
///
/// Inverts the same view transform the renderer paints with, narrows with the
/// spatial index, then ray-casts against full-resolution geometry so a pixel
/// that was painted as ward X also hit-tests as ward X.
pub struct HitTester {
    dataset: Arc<Dataset>,
    index: Arc<SpatialIndex>,
    matches: Arc<MatchIndex>,
}

impl HitTester {
    pub fn new(dataset: Arc<Dataset>, index: Arc<SpatialIndex>, matches: Arc<MatchIndex>) -> Self {
        Self { dataset, index, matches }
    }

    /// Probe a pixel position on a surface of the given size under the given
    /// view. Returns `None` when the cursor is over open background, outside
    /// every boundary, or the view has no drawable transform.
    pub fn locate(
        &self,
        x: f64,
        y: f64,
        width: u32,
        height: u32,
        view: &ViewState,
    ) -> Option<Hit> {
        let overall = self.index.overall()?;
        let transform = MapTransform::fit(overall, width, height, view)?;
        let (lng, lat) = transform.invert(x, y);

        // Bbox candidates come back in ascending feature order, so ties on
        // overlapping geometry resolve to the lowest feature index.
        for feature in self.index.candidates_at(lng, lat) {
            if contains_point(&self.dataset.features[feature].shape, lng, lat) {
                return Some(self.hit_for(feature));
            }
        }
        None
    }

    fn hit_for(&self, feature: usize) -> Hit {
        match self.matches.record_for(feature) {
            Some(record) => Hit {
                feature,
                record: self.dataset.records[record].clone(),
                matched: true,
            },
            None => Hit {
                feature,
                record: WardRecord::placeholder(&self.dataset.features[feature]),
                matched: false,
            },
        }
    }
}

/// Even-odd membership test: a point is inside when a ray to the east
/// crosses the polygon's edges an odd number of times. Holes flip the
/// parity back out naturally.
fn contains_point(shape: &MultiPolygon<f64>, lng: f64, lat: f64) -> bool {
    let mut inside = false;
    for polygon in &shape.0 {
        if ring_crossings(polygon.exterior(), lng, lat) % 2 == 1 {
            inside = !inside;
        }
        for interior in polygon.interiors() {
            if ring_crossings(interior, lng, lat) % 2 == 1 {
                inside = !inside;
            }
        }
    }
    inside
}

fn ring_crossings(ring: &LineString<f64>, lng: f64, lat: f64) -> usize {
    let coords = &ring.0;
    if coords.len() < 3 {
        return 0;
    }
    let mut crossings = 0;
    let mut j = coords.len() - 1;
    for i in 0..coords.len() {
        let (a, b) = (coords[i], coords[j]);
        if (a.y > lat) != (b.y > lat) {
            let x_at = (b.x - a.x) * (lat - a.y) / (b.y - a.y) + a.x;
            if lng < x_at {
                crossings += 1;
            }
        }
        j = i;
    }
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{BoundaryFeature, MetricBundle},
        matching::Matcher,
    };
    use geo::{Coord, Polygon};

    fn square(name: &str, x0: f64, y0: f64, size: f64) -> BoundaryFeature {
        BoundaryFeature {
            ward_name: name.into(),
            ward_no: "7".into(),
            shape: MultiPolygon(vec![Polygon::new(
                LineString(vec![
                    Coord { x: x0, y: y0 },
                    Coord { x: x0 + size, y: y0 },
                    Coord { x: x0 + size, y: y0 + size },
                    Coord { x: x0, y: y0 + size },
                    Coord { x: x0, y: y0 },
                ]),
                vec![],
            )]),
        }
    }

    fn record(name: &str) -> WardRecord {
        WardRecord {
            id: name.to_lowercase(),
            name: name.into(),
            before: MetricBundle::default(),
            after: MetricBundle::default(),
            explanation: String::new(),
        }
    }

    fn tester(
        features: Vec<BoundaryFeature>,
        records: Vec<WardRecord>,
    ) -> (HitTester, Arc<SpatialIndex>) {
        let matches = Matcher::default().run(&features, &records);
        let index = Arc::new(SpatialIndex::build(&features));
        let tester = HitTester::new(
            Arc::new(Dataset::new(features, records)),
            Arc::clone(&index),
            Arc::new(matches),
        );
        (tester, index)
    }

    #[test]
    fn point_in_polygon_with_hole() {
        let shape = MultiPolygon(vec![Polygon::new(
            LineString(vec![
                Coord { x: 0.0, y: 0.0 },
                Coord { x: 10.0, y: 0.0 },
                Coord { x: 10.0, y: 10.0 },
                Coord { x: 0.0, y: 10.0 },
                Coord { x: 0.0, y: 0.0 },
            ]),
            vec![LineString(vec![
                Coord { x: 4.0, y: 4.0 },
                Coord { x: 6.0, y: 4.0 },
                Coord { x: 6.0, y: 6.0 },
                Coord { x: 4.0, y: 6.0 },
                Coord { x: 4.0, y: 4.0 },
            ])],
        )]);
        assert!(contains_point(&shape, 2.0, 2.0));
        assert!(!contains_point(&shape, 5.0, 5.0)); // inside the hole
        assert!(!contains_point(&shape, 11.0, 5.0));
    }

    #[test]
    fn locate_round_trips_through_the_render_transform() {
        let features = vec![square("Agaram", 0.0, 0.0, 1.0), square("Hoodi", 2.0, 0.0, 1.0)];
        let records = vec![record("Agaram"), record("Hoodi")];
        let (tester, index) = tester(features, records);
        let view = ViewState::default();

        let transform = MapTransform::fit(index.overall().unwrap(), 400, 300, &view).unwrap();
        let (x, y) = transform.apply(2.5, 0.5);
        let hit = tester.locate(x, y, 400, 300, &view).unwrap();
        assert_eq!(hit.feature, 1);
        assert!(hit.matched);
        assert_eq!(hit.record.name, "Hoodi");
    }

    #[test]
    fn unmatched_feature_yields_a_placeholder() {
        let features = vec![square("Unmapped Zone 99", 0.0, 0.0, 1.0)];
        let (tester, index) = tester(features, vec![]);
        let view = ViewState::default();

        let transform = MapTransform::fit(index.overall().unwrap(), 400, 300, &view).unwrap();
        let (x, y) = transform.apply(0.5, 0.5);
        let hit = tester.locate(x, y, 400, 300, &view).unwrap();
        assert!(!hit.matched);
        assert_eq!(hit.record.name, "Unmapped Zone 99");
        assert_eq!(hit.record.explanation, "No metrics available");
        assert_eq!(hit.record.after, MetricBundle::default());
    }

    #[test]
    fn background_misses() {
        let features = vec![square("a", 0.0, 0.0, 1.0)];
        let (tester, _index) = tester(features, vec![]);
        // Top-left corner sits in the fit margin outside the geometry.
        assert!(tester.locate(0.0, 0.0, 400, 300, &ViewState::default()).is_none());
    }

    #[test]
    fn panned_view_moves_the_hit_with_the_paint() {
        let features = vec![square("a", 0.0, 0.0, 1.0)];
        let (tester, index) = tester(features, vec![]);
        let mut view = ViewState::default();
        view.drag(40.0, -25.0);

        let transform = MapTransform::fit(index.overall().unwrap(), 400, 300, &view).unwrap();
        let (x, y) = transform.apply(0.5, 0.5);
        let hit = tester.locate(x, y, 400, 300, &view).unwrap();
        assert_eq!(hit.feature, 0);
    }
}
