use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{anyhow, Context, Result};
use geo::{LineString, MultiPolygon};

use crate::{data::Dataset, matching::MatchIndex, spatial::SpatialIndex};

use super::{
    color::{self, metric_style},
    proj::MapTransform,
    view::ViewState,
};

fn write_svg_header(writer: &mut impl Write, width: u32, height: u32) -> Result<()> {
    writeln!(writer, r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"##)?;
    writeln!(
        writer,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"##
    )?;
    writeln!(
        writer,
        r##"<rect width="100%" height="100%" fill="{}"/>"##,
        color::BACKGROUND.hex()
    )?;
    Ok(())
}

fn write_svg_footer(writer: &mut impl Write) -> Result<()> {
    writeln!(writer, "</svg>")?;
    Ok(())
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
fn multipolygon_to_path(shape: &MultiPolygon<f64>, transform: &MapTransform) -> String {
    let mut out = String::new();

    let mut ring_to_path = |ring: &LineString<f64>| {
        for (i, coord) in ring.0.iter().enumerate() {
            let (x, y) = transform.apply(coord.x, coord.y);
            if i == 0 {
                out.push_str(&format!(" M{x:.3},{y:.3}"));
            } else {
                out.push_str(&format!(" L{x:.3},{y:.3}"));
            }
        }
        out.push('Z');
    };

    for polygon in &shape.0 {
        ring_to_path(polygon.exterior());
        for interior in polygon.interiors() {
            ring_to_path(interior);
        }
    }

    out
}

/// Write a static SVG snapshot of the map: every boundary at full detail,
/// colored by the view's active metric, unmatched features in the neutral
/// no-data style. Same transform as the raster renderer and hit tester.
pub(crate) fn write_snapshot(
    path: &Path,
    dataset: &Dataset,
    index: &SpatialIndex,
    matches: &MatchIndex,
    view: &ViewState,
    width: u32,
    height: u32,
) -> Result<()> {
    let overall = index
        .overall()
        .ok_or_else(|| anyhow!("[svg] No drawable geometry in the boundary collection."))?;
    let transform = MapTransform::fit(overall, width, height, view)
        .ok_or_else(|| anyhow!("[svg] Degenerate surface or bounds; nothing to draw."))?;

    let file = File::create(path)
        .with_context(|| format!("[svg] Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    write_svg_header(&mut writer, width, height)?;

    for feature in 0..index.len() {
        if index.bounds(feature).is_none() {
            continue;
        }
        let record = matches.record_for(feature).map(|r| &dataset.records[r]);
        let style = metric_style(record, view.metric);
        let name = &dataset.features[feature].ward_name;
        writeln!(
            writer,
            r#"<path fill="{}" stroke="{}" stroke-width="0.5" data-ward="{}" d="{}"/>"#,
            style.fill.hex(),
            style.stroke.hex(),
            escape_attr(name),
            multipolygon_to_path(index.detail(feature), &transform)
        )?;
    }

    write_svg_footer(&mut writer)?;
    writer.flush()?;
    Ok(())
}

fn escape_attr(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('<', "&lt;").replace('"', "&quot;")
}
