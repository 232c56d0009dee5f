use serde::Serialize;

/// Zoom clamp range for the interactive view.
pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 5.0;

/// Zoom step for the +/- buttons.
const BUTTON_ZOOM_STEP: f64 = 1.3;
/// Zoom step per wheel notch.
const WHEEL_ZOOM_STEP: f64 = 1.1;

/// Which metric drives polygon coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum MetricView {
    #[default]
    Shortage,
    Pressure,
    Efficiency,
    Leakage,
    SupplyDemand,
}

impl MetricView {
    pub const ALL: [MetricView; 5] = [
        MetricView::Shortage,
        MetricView::Pressure,
        MetricView::Efficiency,
        MetricView::Leakage,
        MetricView::SupplyDemand,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MetricView::Shortage => "Water Shortage",
            MetricView::Pressure => "Pressure",
            MetricView::Efficiency => "Efficiency Score",
            MetricView::Leakage => "Leakage Rate",
            MetricView::SupplyDemand => "Supply vs Demand",
        }
    }
}

/// Transient view parameters: zoom, screen-space pan, and the active metric.
/// Any change invalidates the in-flight render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub metric: MetricView,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { zoom: 1.0, pan_x: 0.0, pan_y: 0.0, metric: MetricView::default() }
    }
}

impl ViewState {
    pub fn new(metric: MetricView) -> Self {
        Self { metric, ..Self::default() }
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * BUTTON_ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / BUTTON_ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Wheel zoom: positive delta zooms out, negative zooms in.
    pub fn wheel(&mut self, delta: f64) {
        let factor = if delta > 0.0 { 1.0 / WHEEL_ZOOM_STEP } else { WHEEL_ZOOM_STEP };
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Pan by a screen-space drag delta.
    pub fn drag(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Quantized key for the rendered-layer cache: zoom to two decimals, pan
    /// to whole pixels, plus the metric selector.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            zoom_centi: (self.zoom * 100.0).round() as i64,
            pan_x: self.pan_x.round() as i64,
            pan_y: self.pan_y.round() as i64,
            metric: self.metric,
        }
    }
}

/// Key for cached rasterized layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    zoom_centi: i64,
    pan_x: i64,
    pan_y: i64,
    metric: MetricView,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_stays_clamped() {
        let mut view = ViewState::default();
        for _ in 0..20 {
            view.zoom_in();
        }
        assert_eq!(view.zoom, MAX_ZOOM);
        for _ in 0..40 {
            view.wheel(1.0);
        }
        assert_eq!(view.zoom, MIN_ZOOM);
    }

    #[test]
    fn cache_key_quantizes() {
        let a = ViewState { zoom: 1.001, pan_x: 10.2, pan_y: -3.4, metric: MetricView::Shortage };
        let b = ViewState { zoom: 1.004, pan_x: 10.4, pan_y: -3.0, metric: MetricView::Shortage };
        assert_eq!(a.cache_key(), b.cache_key());

        let c = ViewState { metric: MetricView::Leakage, ..a };
        assert_ne!(a.cache_key(), c.cache_key());

        let d = ViewState { zoom: 1.01, ..a };
        assert_ne!(a.cache_key(), d.cache_key());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut view = ViewState::new(MetricView::Pressure);
        view.zoom_in();
        view.drag(5.0, 7.0);
        view.reset();
        assert_eq!(view.zoom, 1.0);
        assert_eq!((view.pan_x, view.pan_y), (0.0, 0.0));
        // Metric selection survives a view reset.
        assert_eq!(view.metric, MetricView::Pressure);
    }
}
