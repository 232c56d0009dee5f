use geo::{Coord, MultiPolygon, Rect};

/// Accumulate min/max lng/lat over every ring of a multipolygon.
/// Returns `None` for empty geometry.
pub fn shape_bounds(shape: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    let mut acc: Option<(Coord<f64>, Coord<f64>)> = None;
    for polygon in &shape.0 {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            for coord in &ring.0 {
                acc = Some(match acc {
                    None => (*coord, *coord),
                    Some((min, max)) => (
                        Coord { x: min.x.min(coord.x), y: min.y.min(coord.y) },
                        Coord { x: max.x.max(coord.x), y: max.y.max(coord.y) },
                    ),
                });
            }
        }
    }
    acc.map(|(min, max)| Rect::new(min, max))
}

/// Union of a set of per-feature bounds.
pub fn collection_bounds<'a, I>(bounds: I) -> Option<Rect<f64>>
where
    I: IntoIterator<Item = &'a Rect<f64>>,
{
    let mut acc: Option<Rect<f64>> = None;
    for rect in bounds {
        acc = Some(match acc {
            None => *rect,
            Some(existing) => Rect::new(
                Coord {
                    x: existing.min().x.min(rect.min().x),
                    y: existing.min().y.min(rect.min().y),
                },
                Coord {
                    x: existing.max().x.max(rect.max().x),
                    y: existing.max().y.max(rect.max().y),
                },
            ),
        });
    }
    acc
}
