//! Incremental map rendering: view state, metric color bands, the shared
//! map projection, a raster surface, and the chunked renderer itself.

mod color;
mod proj;
mod renderer;
mod scheduler;
mod surface;
pub(crate) mod svg;
mod view;

pub use color::{FillStyle, Rgb, metric_style};
pub use proj::MapTransform;
pub use renderer::{PassState, RenderProgress, Renderer};
pub use scheduler::{CancelSource, CancelToken};
pub use surface::Surface;
pub use view::{CacheKey, MAX_ZOOM, MIN_ZOOM, MetricView, ViewState};
