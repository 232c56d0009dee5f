use geo::Rect;

use super::view::ViewState;

/// Padding (degrees) added around the collection bounds.
const PADDING: f64 = 0.02;
/// Fit factor leaving a small margin inside the surface.
const FIT: f64 = 0.98;

/// Affine lng/lat -> pixel transform shared by the renderer and hit tester.
///
/// Both directions must be derived from the same parameters for the same
/// view, or hover position and painted position disagree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapTransform {
    min_lng: f64,
    min_lat: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    height: f64,
}

impl MapTransform {
    /// Fit the padded collection bounds into a surface of the given size
    /// under the view's zoom and pan. `None` when the surface has no area or
    /// the bounds are degenerate.
    pub fn fit(overall: &Rect<f64>, width: u32, height: u32, view: &ViewState) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let min_lng = overall.min().x - PADDING;
        let max_lng = overall.max().x + PADDING;
        let min_lat = overall.min().y - PADDING;
        let max_lat = overall.max().y + PADDING;

        let lng_range = max_lng - min_lng;
        let lat_range = max_lat - min_lat;
        if !(lng_range > 0.0) || !(lat_range > 0.0) {
            return None;
        }

        let width = width as f64;
        let height = height as f64;
        let base_scale = (width / lng_range).min(height / lat_range) * FIT;
        let scale = base_scale * view.zoom;

        Some(Self {
            min_lng,
            min_lat,
            scale,
            offset_x: (width - lng_range * scale) / 2.0 + view.pan_x,
            offset_y: (height - lat_range * scale) / 2.0 + view.pan_y,
            height,
        })
    }

    /// Geographic coordinate to pixel position. Latitude grows upward,
    /// pixel y grows downward.
    #[inline]
    pub fn apply(&self, lng: f64, lat: f64) -> (f64, f64) {
        let x = (lng - self.min_lng) * self.scale + self.offset_x;
        let y = self.height - (lat - self.min_lat) * self.scale - self.offset_y;
        (x, y)
    }

    /// Pixel position back to geographic coordinate.
    #[inline]
    pub fn invert(&self, x: f64, y: f64) -> (f64, f64) {
        let lng = (x - self.offset_x) / self.scale + self.min_lng;
        let lat = (self.height - y - self.offset_y) / self.scale + self.min_lat;
        (lng, lat)
    }
}
