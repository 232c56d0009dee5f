use std::sync::Arc;

use anyhow::Result;

use crate::{
    cli::{Cli, RenderArgs},
    matching::Matcher,
    render::{svg, Renderer, ViewState},
    spatial::SpatialIndex,
};

pub fn run(cli: &Cli, args: &RenderArgs) -> Result<()> {
    let out_path = args.output.clone().unwrap_or("./wardmap.svg".into());

    let dataset = super::load_dataset(&args.boundaries, &args.wards)?;

    let matches = Arc::new(Matcher::default().run(&dataset.features, &dataset.records));
    let index = Arc::new(SpatialIndex::build(&dataset.features));

    let mut view = ViewState::new(args.metric);
    if let Some(zoom) = args.zoom {
        view.zoom = zoom.clamp(crate::render::MIN_ZOOM, crate::render::MAX_ZOOM);
    }

    // Drive a full raster pass so the offline path exercises the same
    // pipeline the interactive host does, then snapshot as SVG.
    let mut renderer = Renderer::new(
        Arc::clone(&dataset),
        Arc::clone(&index),
        Arc::clone(&matches),
        args.width,
        args.height,
        view,
    );
    let progress = renderer.run_to_completion();
    println!("[render] painted {} of {} features", progress.painted, progress.total);
    if cli.verbose > 0 {
        eprintln!("[render] view zoom={} metric={:?}", view.zoom, view.metric);
    }

    println!("[render] writing snapshot to {}", out_path.display());
    svg::write_snapshot(&out_path, &dataset, &index, &matches, &view, args.width, args.height)?;

    Ok(())
}
