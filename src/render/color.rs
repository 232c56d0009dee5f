//! Metric-to-color banding for map fills.

use std::fmt;

use crate::data::WardRecord;

use super::view::MetricView;

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex form, e.g. "#10b981".
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS: rgb(r,g,b)
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Fill plus outline color for one polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FillStyle {
    pub fill: Rgb,
    pub stroke: Rgb,
}

const fn style(fill: u32, stroke: u32) -> FillStyle {
    FillStyle {
        fill: Rgb::new((fill >> 16) as u8, (fill >> 8) as u8, fill as u8),
        stroke: Rgb::new((stroke >> 16) as u8, (stroke >> 8) as u8, stroke as u8),
    }
}

const EXCELLENT: FillStyle = style(0x10b981, 0x059669);
const GOOD: FillStyle = style(0x22c55e, 0x16a34a);
const MODERATE: FillStyle = style(0xf59e0b, 0xd97706);
const POOR: FillStyle = style(0xfb923c, 0xea580c);
const CRITICAL: FillStyle = style(0xef4444, 0xdc2626);

/// Neutral style for features with no matched record or undefined metrics.
pub const NO_DATA: FillStyle = style(0x94a3b8, 0x64748b);

/// Preview-pass fill (flat, strokeless first paint).
pub const PREVIEW: FillStyle = style(0x94a3b8, 0xcbd5e1);

/// Raster background.
pub const BACKGROUND: Rgb = Rgb::new(0xf8, 0xfa, 0xfc);

/// Discrete severity band for a ward under the active metric.
///
/// Total over the selector enum: unmatched features and non-finite derived
/// values fall back to the neutral no-data style rather than erroring.
pub fn metric_style(record: Option<&WardRecord>, metric: MetricView) -> FillStyle {
    let Some(ward) = record else { return NO_DATA };
    match metric {
        MetricView::Shortage => {
            let pct = ward.after.shortage_pct;
            if pct < 2.0 {
                EXCELLENT
            } else if pct < 5.0 {
                GOOD
            } else if pct < 10.0 {
                MODERATE
            } else {
                CRITICAL
            }
        }
        MetricView::Pressure => {
            let gain = ward.pressure_improvement();
            if gain > 2.0 {
                EXCELLENT
            } else if gain > 0.0 {
                GOOD
            } else if gain > -1.0 {
                MODERATE
            } else {
                CRITICAL
            }
        }
        MetricView::Efficiency => {
            let gain = ward.shortage_improvement();
            if gain > 5.0 {
                EXCELLENT
            } else if gain > 2.0 {
                GOOD
            } else if gain > 0.0 {
                MODERATE
            } else {
                CRITICAL
            }
        }
        MetricView::Leakage => {
            let leakage = ward.after.leakage;
            if leakage < 0.9 {
                EXCELLENT
            } else if leakage < 0.95 {
                GOOD
            } else if leakage < 1.0 {
                MODERATE
            } else {
                CRITICAL
            }
        }
        MetricView::SupplyDemand => {
            let ratio = ward.after.supply_demand_ratio();
            if !ratio.is_finite() {
                NO_DATA
            } else if ratio >= 98.0 {
                EXCELLENT
            } else if ratio >= 95.0 {
                GOOD
            } else if ratio >= 90.0 {
                MODERATE
            } else if ratio >= 85.0 {
                POOR
            } else {
                CRITICAL
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MetricBundle;

    fn ward(after: MetricBundle, before: MetricBundle) -> WardRecord {
        WardRecord {
            id: "w".into(),
            name: "W".into(),
            before,
            after,
            explanation: String::new(),
        }
    }

    #[test]
    fn unmatched_is_neutral_for_every_metric() {
        for metric in MetricView::ALL {
            assert_eq!(metric_style(None, metric), NO_DATA);
        }
    }

    #[test]
    fn shortage_bands() {
        let mk = |pct| ward(MetricBundle { shortage_pct: pct, ..Default::default() }, MetricBundle::default());
        assert_eq!(metric_style(Some(&mk(1.0)), MetricView::Shortage), EXCELLENT);
        assert_eq!(metric_style(Some(&mk(3.0)), MetricView::Shortage), GOOD);
        assert_eq!(metric_style(Some(&mk(7.0)), MetricView::Shortage), MODERATE);
        assert_eq!(metric_style(Some(&mk(15.0)), MetricView::Shortage), CRITICAL);
    }

    #[test]
    fn supply_demand_bands_and_degenerate_demand() {
        let mk = |supply, demand| {
            ward(MetricBundle { supply, demand, ..Default::default() }, MetricBundle::default())
        };
        assert_eq!(metric_style(Some(&mk(99.0, 100.0)), MetricView::SupplyDemand), EXCELLENT);
        assert_eq!(metric_style(Some(&mk(91.0, 100.0)), MetricView::SupplyDemand), MODERATE);
        assert_eq!(metric_style(Some(&mk(86.0, 100.0)), MetricView::SupplyDemand), POOR);
        assert_eq!(metric_style(Some(&mk(50.0, 100.0)), MetricView::SupplyDemand), CRITICAL);
        // Zero demand never panics or paints a severity band.
        assert_eq!(metric_style(Some(&mk(50.0, 0.0)), MetricView::SupplyDemand), NO_DATA);
    }

    #[test]
    fn total_over_all_metrics() {
        let w = ward(
            MetricBundle { pressure: 40.0, demand: 100.0, supply: 97.0, shortage: 3.0, shortage_pct: 3.0, leakage: 0.92 },
            MetricBundle { pressure: 35.0, demand: 100.0, supply: 90.0, shortage: 10.0, shortage_pct: 10.0, leakage: 1.2 },
        );
        for metric in MetricView::ALL {
            // All bands carry a visible fill and stroke.
            let s = metric_style(Some(&w), metric);
            assert_ne!(s.fill, s.stroke);
        }
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(EXCELLENT.fill.hex(), "#10b981");
        assert_eq!(format!("{}", NO_DATA.stroke), "rgb(100,116,139)");
    }
}
