use super::color::Rgb;

/// In-memory RGB raster surface. The renderer keeps two: an off-screen
/// surface it paints into and a front surface flushed after every chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>, // RGB, row-major
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, pixels: vec![0; width as usize * height as usize * 3] }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_zero_sized(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some(Rgb::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    #[inline]
    fn put(&mut self, x: i64, y: i64, color: Rgb) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        self.pixels[i] = color.r;
        self.pixels[i + 1] = color.g;
        self.pixels[i + 2] = color.b;
    }

    pub fn clear(&mut self, color: Rgb) {
        for chunk in self.pixels.chunks_exact_mut(3) {
            chunk[0] = color.r;
            chunk[1] = color.g;
            chunk[2] = color.b;
        }
    }

    /// Even-odd scanline fill over a polygon given as projected rings
    /// (exterior plus holes); crossings from hole rings un-fill them.
    pub fn fill_polygon(&mut self, rings: &[Vec<(f64, f64)>], color: Rgb) {
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;
        for ring in rings {
            for &(_, y) in ring {
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
        if !min_y.is_finite() || !max_y.is_finite() {
            return;
        }
        let y_start = (min_y.floor().max(0.0)) as i64;
        let y_end = (max_y.ceil().min(self.height as f64 - 1.0)) as i64;

        let mut crossings: Vec<f64> = Vec::new();
        for y in y_start..=y_end {
            let scan = y as f64 + 0.5;
            crossings.clear();
            for ring in rings {
                if ring.len() < 2 {
                    continue;
                }
                let mut j = ring.len() - 1;
                for i in 0..ring.len() {
                    let (xi, yi) = ring[i];
                    let (xj, yj) = ring[j];
                    if (yi > scan) != (yj > scan) {
                        crossings.push(xi + (scan - yi) / (yj - yi) * (xj - xi));
                    }
                    j = i;
                }
            }
            crossings.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            for pair in crossings.chunks_exact(2) {
                let x0 = pair[0].round().max(0.0) as i64;
                let x1 = pair[1].round().min(self.width as f64 - 1.0) as i64;
                for x in x0..=x1 {
                    self.put(x, y, color);
                }
            }
        }
    }

    /// Stroke a projected ring as a closed outline.
    pub fn stroke_ring(&mut self, ring: &[(f64, f64)], color: Rgb) {
        if ring.len() < 2 {
            return;
        }
        for i in 0..ring.len() {
            let (x0, y0) = ring[i];
            let (x1, y1) = ring[(i + 1) % ring.len()];
            self.line(x0, y0, x1, y1, color);
        }
    }

    fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgb) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0);
        let n = steps as usize;
        for s in 0..=n {
            let t = s as f64 / steps;
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            self.put(x.round() as i64, y.round() as i64, color);
        }
    }

    /// Copy another surface of identical dimensions over this one.
    pub fn blit_from(&mut self, src: &Surface) {
        debug_assert_eq!((self.width, self.height), (src.width, src.height));
        if (self.width, self.height) == (src.width, src.height) {
            self.pixels.copy_from_slice(&src.pixels);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const WHITE: Rgb = Rgb::new(255, 255, 255);

    fn square_ring(x0: f64, y0: f64, size: f64) -> Vec<(f64, f64)> {
        vec![(x0, y0), (x0 + size, y0), (x0 + size, y0 + size), (x0, y0 + size)]
    }

    #[test]
    fn fill_covers_interior_not_exterior() {
        let mut surface = Surface::new(40, 40);
        surface.clear(WHITE);
        surface.fill_polygon(&[square_ring(10.0, 10.0, 20.0)], RED);

        assert_eq!(surface.pixel(20, 20), Some(RED));
        assert_eq!(surface.pixel(5, 5), Some(WHITE));
        assert_eq!(surface.pixel(35, 20), Some(WHITE));
    }

    #[test]
    fn holes_stay_unfilled() {
        let mut surface = Surface::new(40, 40);
        surface.clear(WHITE);
        let rings = vec![square_ring(5.0, 5.0, 30.0), square_ring(15.0, 15.0, 10.0)];
        surface.fill_polygon(&rings, RED);

        assert_eq!(surface.pixel(8, 8), Some(RED));
        assert_eq!(surface.pixel(20, 20), Some(WHITE));
    }

    #[test]
    fn fill_clips_to_surface() {
        let mut surface = Surface::new(10, 10);
        surface.clear(WHITE);
        surface.fill_polygon(&[square_ring(-5.0, -5.0, 100.0)], RED);
        assert_eq!(surface.pixel(0, 0), Some(RED));
        assert_eq!(surface.pixel(9, 9), Some(RED));
    }

    #[test]
    fn stroke_draws_outline() {
        let mut surface = Surface::new(20, 20);
        surface.clear(WHITE);
        surface.stroke_ring(&square_ring(2.0, 2.0, 10.0), RED);
        assert_eq!(surface.pixel(2, 2), Some(RED));
        assert_eq!(surface.pixel(7, 2), Some(RED));
        assert_eq!(surface.pixel(7, 7), Some(WHITE));
    }

    #[test]
    fn blit_copies_pixels() {
        let mut a = Surface::new(8, 8);
        let mut b = Surface::new(8, 8);
        b.clear(RED);
        a.blit_from(&b);
        assert_eq!(a.pixel(4, 4), Some(RED));
    }

    #[test]
    fn zero_sized_surface_is_inert() {
        let mut surface = Surface::new(0, 0);
        assert!(surface.is_zero_sized());
        surface.fill_polygon(&[square_ring(0.0, 0.0, 5.0)], RED);
        assert_eq!(surface.pixel(0, 0), None);
    }
}
