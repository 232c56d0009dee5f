use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, anyhow};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::Value;
use tracing::warn;

use super::BoundaryFeature;

/// Read boundary features from a GeoJSON FeatureCollection file.
///
/// Features with malformed or missing geometry are kept with an empty shape
/// (so indices stay aligned with the source file) and logged as warnings;
/// they are later skipped by spatial indexing and rendering.
pub fn read_boundaries(path: &Path) -> Result<Vec<BoundaryFeature>> {
    let file = File::open(path)
        .with_context(|| format!("[data::geojson] Failed to open {}", path.display()))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("[data::geojson] Failed to parse {}", path.display()))?;
    parse_feature_collection(&value)
}

/// Parse an already-loaded GeoJSON value into boundary features.
pub fn parse_feature_collection(value: &Value) -> Result<Vec<BoundaryFeature>> {
    let features = value
        .get("features")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("[data::geojson] Not a FeatureCollection: no features array"))?;

    let mut out = Vec::with_capacity(features.len());
    for (idx, feature) in features.iter().enumerate() {
        let props = feature.get("properties");
        let ward_name = prop_string(props, "KGISWardName");
        let ward_no = {
            let no = prop_string(props, "KGISWardNo");
            if no.is_empty() { prop_string(props, "KGISWardID") } else { no }
        };

        let shape = match feature.get("geometry").map(parse_geometry) {
            Some(Ok(shape)) => shape,
            Some(Err(err)) => {
                warn!(feature = idx, %err, "skipping malformed geometry");
                MultiPolygon(vec![])
            }
            None => {
                warn!(feature = idx, "feature has no geometry");
                MultiPolygon(vec![])
            }
        };

        out.push(BoundaryFeature { ward_name, ward_no, shape });
    }
    Ok(out)
}

/// Read a property as text, accepting either string or numeric JSON values
/// (ward numbers appear as both in the wild).
fn prop_string(props: Option<&Value>, key: &str) -> String {
    match props.and_then(|p| p.get(key)) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn parse_geometry(geometry: &Value) -> Result<MultiPolygon<f64>> {
    let ty = geometry
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("geometry without a type"))?;
    let coords = geometry
        .get("coordinates")
        .ok_or_else(|| anyhow!("geometry without coordinates"))?;

    match ty {
        "Polygon" => Ok(MultiPolygon(vec![parse_polygon(coords)?])),
        "MultiPolygon" => {
            let polys = coords
                .as_array()
                .ok_or_else(|| anyhow!("MultiPolygon coordinates not an array"))?;
            let polygons = polys.iter().map(parse_polygon).collect::<Result<Vec<_>>>()?;
            Ok(MultiPolygon(polygons))
        }
        other => Err(anyhow!("unsupported geometry type {other:?}")),
    }
}

fn parse_polygon(rings: &Value) -> Result<Polygon<f64>> {
    let rings = rings.as_array().ok_or_else(|| anyhow!("Polygon coordinates not an array"))?;
    if rings.is_empty() {
        return Err(anyhow!("Polygon with no rings"));
    }
    let mut parsed = rings.iter().map(parse_ring).collect::<Result<Vec<_>>>()?;
    let exterior = parsed.remove(0);
    Ok(Polygon::new(exterior, parsed))
}

fn parse_ring(ring: &Value) -> Result<LineString<f64>> {
    let points = ring.as_array().ok_or_else(|| anyhow!("ring is not an array"))?;
    let mut coords = Vec::with_capacity(points.len());
    for point in points {
        let pair = point.as_array().ok_or_else(|| anyhow!("coordinate is not a pair"))?;
        let (lng, lat) = match (pair.first().and_then(Value::as_f64), pair.get(1).and_then(Value::as_f64)) {
            (Some(lng), Some(lat)) if lng.is_finite() && lat.is_finite() => (lng, lat),
            _ => return Err(anyhow!("non-numeric coordinate")),
        };
        coords.push(Coord { x: lng, y: lat });
    }
    if coords.len() < 3 {
        return Err(anyhow!("ring with fewer than 3 points"));
    }
    Ok(LineString(coords))
}
