use std::sync::Arc;

use ahash::AHashMap;
use geo::MultiPolygon;
use tracing::{debug, trace};

use crate::{data::Dataset, matching::MatchIndex, spatial::SpatialIndex};

use super::{
    color::{self, metric_style},
    proj::MapTransform,
    scheduler::{CancelSource, CancelToken},
    surface::Surface,
    view::{CacheKey, ViewState},
};

/// Features painted at full detail per tick.
pub const RENDER_CHUNK: usize = 120;

/// Render pass state machine. A pass walks Preview -> Detail -> Cached;
/// any view change restarts it (or restores a cached layer directly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassState {
    /// No pass possible (zero surface, no usable bounds) or nothing started.
    Idle,
    /// Next tick paints every feature coarsely in one flat-colored pass.
    Preview,
    /// Chunked full-resolution painting; `next` is the first unpainted feature.
    Detail { next: usize },
    /// Pass complete and stored in the layer cache.
    Cached,
}

/// Snapshot of pass progress returned by [`Renderer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProgress {
    pub done: bool,
    /// Features processed at full detail so far this pass.
    pub painted: usize,
    pub total: usize,
}

/// Chunked, cancelable map renderer.
///
/// Owns the off-screen and front surfaces and the rendered-layer cache; the
/// host drives it by calling [`tick`](Self::tick) once per scheduling slot
/// (animation frame, idle callback) until the pass reports done. The front
/// surface is flushed after every chunk so visible progress is monotonic.
pub struct Renderer {
    dataset: Arc<Dataset>,
    index: Arc<SpatialIndex>,
    matches: Arc<MatchIndex>,

    front: Surface,
    off: Surface,
    cache: AHashMap<CacheKey, Surface>,

    cancel: CancelSource,
    token: CancelToken,
    view: ViewState,
    transform: Option<MapTransform>,
    state: PassState,
    painted: usize,
}

impl Renderer {
    pub fn new(
        dataset: Arc<Dataset>,
        index: Arc<SpatialIndex>,
        matches: Arc<MatchIndex>,
        width: u32,
        height: u32,
        view: ViewState,
    ) -> Self {
        let cancel = CancelSource::new();
        let token = cancel.token();
        let mut renderer = Self {
            dataset,
            index,
            matches,
            front: Surface::new(width, height),
            off: Surface::new(width, height),
            cache: AHashMap::new(),
            cancel,
            token,
            view,
            transform: None,
            state: PassState::Idle,
            painted: 0,
        };
        renderer.begin();
        renderer
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn state(&self) -> PassState {
        self.state
    }

    /// The transform in effect for the current pass; identical parameters to
    /// what the hit tester derives for the same view and surface size.
    pub fn transform(&self) -> Option<&MapTransform> {
        self.transform.as_ref()
    }

    /// Latest flushed frame.
    pub fn front(&self) -> &Surface {
        &self.front
    }

    /// Apply a view change: cancel any in-flight pass, then either restore
    /// the cached layer for the new key or start a fresh pass.
    pub fn set_view(&mut self, view: ViewState) {
        if view == self.view && self.state != PassState::Idle {
            return;
        }
        self.view = view;
        self.token = self.cancel.cancel();
        if let Some(cached) = self.cache.get(&view.cache_key()) {
            trace!(?view, "render cache hit");
            self.front.blit_from(cached);
            self.transform = self.fit_transform();
            self.state = PassState::Cached;
            self.painted = self.index.len();
            return;
        }
        self.begin();
    }

    /// Resize the surfaces. Cached layers are for the old dimensions, so the
    /// cache is dropped and the current pass restarted.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.token = self.cancel.cancel();
        self.front = Surface::new(width, height);
        self.off = Surface::new(width, height);
        self.cache.clear();
        self.begin();
    }

    /// Perform one bounded unit of work. Safe to call when idle or cached.
    pub fn tick(&mut self) -> RenderProgress {
        match self.state {
            PassState::Idle | PassState::Cached => self.progress(),
            PassState::Preview => {
                let token = self.token.clone();
                self.paint_preview(&token);
                self.progress()
            }
            PassState::Detail { next } => {
                let token = self.token.clone();
                self.paint_detail_chunk(next, &token);
                self.progress()
            }
        }
    }

    /// Drive the current pass to completion synchronously (offline use).
    pub fn run_to_completion(&mut self) -> RenderProgress {
        loop {
            let progress = self.tick();
            if progress.done {
                return progress;
            }
        }
    }

    fn progress(&self) -> RenderProgress {
        RenderProgress {
            done: matches!(self.state, PassState::Idle | PassState::Cached),
            painted: self.painted,
            total: self.index.len(),
        }
    }

    fn fit_transform(&self) -> Option<MapTransform> {
        let overall = self.index.overall()?;
        MapTransform::fit(overall, self.front.width(), self.front.height(), &self.view)
    }

    fn begin(&mut self) {
        self.painted = 0;
        self.transform = self.fit_transform();
        if self.front.is_zero_sized() || self.transform.is_none() || self.index.is_empty() {
            // Nothing to paint; degenerate passes are a no-op, not an error.
            self.state = PassState::Idle;
            return;
        }
        self.state = PassState::Preview;
    }

    fn paint_preview(&mut self, token: &CancelToken) {
        if token.is_canceled() {
            return;
        }
        let Some(transform) = self.transform else {
            self.state = PassState::Idle;
            return;
        };
        self.off.clear(color::BACKGROUND);
        let index = Arc::clone(&self.index);
        for feature in 0..index.len() {
            if index.bounds(feature).is_none() {
                continue;
            }
            fill_shape(&mut self.off, index.preview(feature), &transform, color::PREVIEW.fill, None);
        }
        self.front.blit_from(&self.off);
        self.state = PassState::Detail { next: 0 };
        trace!("preview pass painted");
    }

    fn paint_detail_chunk(&mut self, next: usize, token: &CancelToken) {
        if token.is_canceled() {
            return;
        }
        let Some(transform) = self.transform else {
            self.state = PassState::Idle;
            return;
        };
        let end = (next + RENDER_CHUNK).min(self.index.len());

        let index = Arc::clone(&self.index);
        let dataset = Arc::clone(&self.dataset);
        for feature in next..end {
            if index.bounds(feature).is_none() {
                continue;
            }
            let record = self.matches.record_for(feature).map(|r| &dataset.records[r]);
            let style = metric_style(record, self.view.metric);
            fill_shape(&mut self.off, index.detail(feature), &transform, style.fill, Some(style.stroke));
        }

        self.painted = end;
        // Flush after every chunk so progress is visible between yields.
        self.front.blit_from(&self.off);

        if end >= self.index.len() {
            self.cache.insert(self.view.cache_key(), self.front.clone());
            self.state = PassState::Cached;
            debug!(features = self.painted, "render pass complete");
        } else {
            self.state = PassState::Detail { next: end };
        }
    }
}

/// Project and paint one multipolygon: even-odd fill over each polygon's
/// rings, with an optional exterior outline.
fn fill_shape(
    surface: &mut Surface,
    shape: &MultiPolygon<f64>,
    transform: &MapTransform,
    fill: color::Rgb,
    stroke: Option<color::Rgb>,
) {
    for polygon in &shape.0 {
        let mut rings: Vec<Vec<(f64, f64)>> = Vec::with_capacity(1 + polygon.interiors().len());
        rings.push(project_ring(polygon.exterior(), transform));
        for interior in polygon.interiors() {
            rings.push(project_ring(interior, transform));
        }
        surface.fill_polygon(&rings, fill);
        if let Some(stroke) = stroke {
            surface.stroke_ring(&rings[0], stroke);
        }
    }
}

fn project_ring(ring: &geo::LineString<f64>, transform: &MapTransform) -> Vec<(f64, f64)> {
    ring.0.iter().map(|c| transform.apply(c.x, c.y)).collect()
}
