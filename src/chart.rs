//! Bar chart layout
//!
//! Pure geometry for a vertical bar chart: one bar per point, x and y read
//! from the `x` and `y` keys. Rendering backends only draw what this computes.

use crate::table::ChartPoint;

/// Key read for bar positions
pub const X_KEY: &str = "x";
/// Key read for bar heights
pub const Y_KEY: &str = "y";

/// Fraction of a slot a bar fills
pub const BAR_WIDTH: f64 = 0.7;

/// Number of horizontal gridline intervals
const Y_TICKS: usize = 5;

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
        }
    }
}

/// Plot area inside the axes margins
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// One bar in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub x: f64,
    pub y: f64,
}

/// An axis tick: canvas position and label
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

/// A gridline segment in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub from: (f64, f64),
    pub to: (f64, f64),
}

/// Everything needed to draw the chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub size: ChartSize,
    pub plot: PlotArea,
    pub bars: Vec<Bar>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    /// Points dropped for lacking a numeric `x` or `y`
    pub skipped: usize,
}

impl ChartLayout {
    pub fn compute(points: &[ChartPoint], size: ChartSize) -> Self {
        // Margins leave room for tick labels
        let plot = PlotArea {
            left: 40.0,
            top: 10.0,
            width: (size.width - 50.0).max(0.0),
            height: (size.height - 40.0).max(0.0),
        };

        let values: Vec<(f64, f64)> = points
            .iter()
            .filter_map(|p| Some((p.get(X_KEY)?, p.get(Y_KEY)?)))
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        let skipped = points.len() - values.len();

        if values.is_empty() {
            return Self {
                size,
                plot,
                bars: Vec::new(),
                x_ticks: Vec::new(),
                y_ticks: Vec::new(),
                skipped,
            };
        }

        let x_scale = XScale::fit(&values, &plot);
        let y_scale = YScale::fit(&values, &plot);

        let bar_width = x_scale.slot * BAR_WIDTH;
        let baseline = y_scale.position(0.0);

        let bars = values
            .iter()
            .map(|&(x, y)| {
                let center = x_scale.position(x);
                let top = y_scale.position(y);
                Bar {
                    left: center - bar_width / 2.0,
                    top: top.min(baseline),
                    width: bar_width,
                    height: (baseline - top).abs(),
                    x,
                    y,
                }
            })
            .collect();

        let mut x_values: Vec<f64> = values.iter().map(|(x, _)| *x).collect();
        x_values.sort_by(f64::total_cmp);
        x_values.dedup();
        let x_ticks = x_values
            .into_iter()
            .map(|x| Tick {
                position: x_scale.position(x),
                label: format_tick(x),
            })
            .collect();

        let y_ticks = (0..=Y_TICKS)
            .map(|i| {
                let value = y_scale.min + (y_scale.max - y_scale.min) * i as f64 / Y_TICKS as f64;
                Tick {
                    position: y_scale.position(value),
                    label: format_tick(value),
                }
            })
            .collect();

        Self {
            size,
            plot,
            bars,
            x_ticks,
            y_ticks,
            skipped,
        }
    }

    /// Horizontal lines at the y ticks, then vertical lines at the x ticks
    pub fn gridlines(&self) -> Vec<GridLine> {
        let plot = &self.plot;
        let horizontal = self.y_ticks.iter().map(|t| GridLine {
            from: (plot.left, t.position),
            to: (plot.right(), t.position),
        });
        let vertical = self.x_ticks.iter().map(|t| GridLine {
            from: (t.position, plot.top),
            to: (t.position, plot.bottom()),
        });
        horizontal.chain(vertical).collect()
    }
}

/// Linear x scale padded by half a slot on each side
struct XScale {
    min: f64,
    span: f64,
    slot: f64,
    plot_left: f64,
    plot_width: f64,
}

impl XScale {
    fn fit(values: &[(f64, f64)], plot: &PlotArea) -> Self {
        let min = values.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
        let max = values.iter().map(|(x, _)| *x).fold(f64::NEG_INFINITY, f64::max);

        // Smallest gap between neighbouring x values sets the slot size
        let mut xs: Vec<f64> = values.iter().map(|(x, _)| *x).collect();
        xs.sort_by(f64::total_cmp);
        let step = xs
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|d| *d > 0.0)
            .fold(f64::INFINITY, f64::min);
        let step = if step.is_finite() { step } else { 1.0 };

        let padded_min = min - step / 2.0;
        let span = (max - min) + step;
        let slot = plot.width * step / span;

        Self {
            min: padded_min,
            span,
            slot,
            plot_left: plot.left,
            plot_width: plot.width,
        }
    }

    fn position(&self, x: f64) -> f64 {
        self.plot_left + (x - self.min) / self.span * self.plot_width
    }
}

/// Linear y scale whose domain always includes zero
struct YScale {
    min: f64,
    max: f64,
    plot_top: f64,
    plot_height: f64,
}

impl YScale {
    fn fit(values: &[(f64, f64)], plot: &PlotArea) -> Self {
        let mut min = values.iter().map(|(_, y)| *y).fold(0.0, f64::min);
        let mut max = values.iter().map(|(_, y)| *y).fold(0.0, f64::max);
        if min == max {
            min -= 1.0;
            max += 1.0;
        }
        Self {
            min,
            max,
            plot_top: plot.top,
            plot_height: plot.height,
        }
    }

    /// Canvas y grows downward
    fn position(&self, y: f64) -> f64 {
        self.plot_top + (self.max - y) / (self.max - self.min) * self.plot_height
    }
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squares(n: usize) -> Vec<ChartPoint> {
        (0..n)
            .map(|i| ChartPoint::new().with("x", i as f64).with("y", (i * i) as f64))
            .collect()
    }

    const EPS: f64 = 1e-9;

    #[test]
    fn test_one_bar_per_point() {
        let layout = ChartLayout::compute(&squares(10), ChartSize::default());
        assert_eq!(layout.bars.len(), 10);
        assert_eq!(layout.x_ticks.len(), 10);
        assert_eq!(layout.y_ticks.len(), 6);
        assert_eq!(layout.skipped, 0);
    }

    #[test]
    fn test_bars_inside_plot() {
        let layout = ChartLayout::compute(&squares(10), ChartSize::default());
        for bar in &layout.bars {
            assert!(bar.left >= layout.plot.left - EPS);
            assert!(bar.left + bar.width <= layout.plot.right() + EPS);
            assert!(bar.top >= layout.plot.top - EPS);
            assert!(bar.top + bar.height <= layout.plot.bottom() + EPS);
        }
    }

    #[test]
    fn test_bar_width_fraction() {
        let layout = ChartLayout::compute(&squares(10), ChartSize::default());
        let slot = layout.plot.width / 10.0;
        assert!((layout.bars[0].width - slot * BAR_WIDTH).abs() < EPS);
    }

    #[test]
    fn test_tallest_bar_reaches_top() {
        let layout = ChartLayout::compute(&squares(10), ChartSize::default());
        let last = layout.bars.last().unwrap();
        assert!((last.top - layout.plot.top).abs() < EPS);
        assert!((last.top + last.height - layout.plot.bottom()).abs() < EPS);
        assert_eq!(layout.bars[0].height, 0.0);
    }

    #[test]
    fn test_negative_values_hang_below_zero() {
        let points = vec![
            ChartPoint::new().with("x", 0.0).with("y", -2.0),
            ChartPoint::new().with("x", 1.0).with("y", 2.0),
        ];
        let layout = ChartLayout::compute(&points, ChartSize::default());
        let zero = layout.plot.top + layout.plot.height / 2.0;

        assert!((layout.bars[0].top - zero).abs() < EPS);
        assert!((layout.bars[1].top + layout.bars[1].height - zero).abs() < EPS);
    }

    #[test]
    fn test_points_without_xy_are_skipped() {
        let points = vec![
            ChartPoint::new().with("a", 1.0),
            ChartPoint::new().with("x", 1.0).with("y", 3.0),
        ];
        let layout = ChartLayout::compute(&points, ChartSize::default());
        assert_eq!(layout.bars.len(), 1);
        assert_eq!(layout.skipped, 1);
    }

    #[test]
    fn test_text_or_null_xy_is_skipped() {
        let points = vec![
            ChartPoint::new().with("x", "a").with("y", 1.0),
            ChartPoint::new().with("x", 2.0).with("y", None::<f64>),
            ChartPoint::new().with("Sym", "AAPL").with("x", 3.0).with("y", 9.0),
        ];
        let layout = ChartLayout::compute(&points, ChartSize::default());
        assert_eq!(layout.bars.len(), 1);
        assert_eq!(layout.bars[0].x, 3.0);
        assert_eq!(layout.skipped, 2);
    }

    #[test]
    fn test_gridlines_both_directions() {
        let layout = ChartLayout::compute(&squares(4), ChartSize::default());
        let lines = layout.gridlines();
        assert_eq!(lines.len(), layout.y_ticks.len() + layout.x_ticks.len());

        let vertical: Vec<_> = lines.iter().filter(|l| l.from.0 == l.to.0).collect();
        assert_eq!(vertical.len(), 4);
        for (line, tick) in vertical.iter().zip(&layout.x_ticks) {
            assert_eq!(line.from, (tick.position, layout.plot.top));
            assert_eq!(line.to, (tick.position, layout.plot.bottom()));
        }

        let horizontal = lines.iter().filter(|l| l.from.1 == l.to.1).count();
        assert_eq!(horizontal, layout.y_ticks.len());
    }

    #[test]
    fn test_empty_layout() {
        let layout = ChartLayout::compute(&[], ChartSize::default());
        assert!(layout.bars.is_empty());
        assert!(layout.y_ticks.is_empty());
        assert!(layout.gridlines().is_empty());
    }

    #[test]
    fn test_tick_labels() {
        assert_eq!(format_tick(4.0), "4");
        assert_eq!(format_tick(7.5), "7.5");
    }
}
