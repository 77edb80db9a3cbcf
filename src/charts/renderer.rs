//! Static Chart Renderer
//! Writes the dashboard views to files for headless export.
//!
//! Layout of `trends.png`:
//! 1. One chart per panel, stacked vertically
//! 2. Per-site line with circle markers, legend in the upper right
//! 3. Date axis formatted as YYYY-MM-DD, light gridlines
//! 4. Empty panels carry only the "No <name> data available" caption
//!
//! The station view is written as a Leaflet page, `stations.html`.

use crate::charts::{date_to_x, x_to_label, LeafletMap, RenderError, Renderer};
use crate::data::{Trend, TrendSet};
use crate::pipeline::{StationMap, TrendDashboard, TrendPanel};
use plotters::prelude::*;
use std::error::Error;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::info;

const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

pub const TRENDS_FILE: &str = "trends.png";
pub const STATIONS_FILE: &str = "stations.html";

type DrawResult = Result<(), Box<dyn Error>>;

/// Axis ranges for one panel: days on x, padded values on y. Fails when the
/// padded span does not fit in an `f64`.
fn panel_bounds(set: &TrendSet) -> Result<(Range<f64>, Range<f64>), RenderError> {
    let (x_min, x_max) = set
        .date_range()
        .map(|(a, b)| (date_to_x(a), date_to_x(b)))
        .unwrap_or((0.0, 1.0));
    let (x_min, x_max) = if x_min == x_max {
        (x_min - 1.0, x_max + 1.0)
    } else {
        (x_min, x_max)
    };

    let (y_min, y_max) = set.value_range().unwrap_or((0.0, 1.0));
    let pad = if y_max > y_min {
        (y_max - y_min) * 0.1
    } else {
        y_min.abs().max(1.0) * 0.1
    };
    let (low, high) = (y_min - pad, y_max + pad);

    if [pad, low, high, high - low].iter().all(|v| v.is_finite()) {
        Ok((x_min..x_max, low..high))
    } else {
        Err(RenderError::OutOfRange(format!(
            "{} values span {y_min:e} to {y_max:e}",
            set.characteristic
        )))
    }
}

/// Renders into files under an output directory.
pub struct StaticChartRenderer {
    out_dir: PathBuf,
    width: u32,
    panel_height: u32,
    written: Vec<PathBuf>,
}

impl StaticChartRenderer {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            width: 1200,
            panel_height: 500,
            written: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: u32, panel_height: u32) -> Self {
        self.width = width;
        self.panel_height = panel_height;
        self
    }

    /// Files produced so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn prepare(&self) -> Result<(), RenderError> {
        std::fs::create_dir_all(&self.out_dir)?;
        Ok(())
    }

    fn draw_trends(path: &Path, dashboard: &TrendDashboard, width: u32, panel_height: u32) -> DrawResult {
        let rows = dashboard.panels.len().max(1);
        let root = BitMapBackend::new(path, (width, panel_height * rows as u32)).into_drawing_area();
        root.fill(&WHITE)?;

        let areas = root.split_evenly((rows, 1));
        for (area, panel) in areas.iter().zip(&dashboard.panels) {
            match &panel.trend {
                Trend::Empty { .. } => {
                    area.titled(&panel.title(), ("sans-serif", 22))?;
                }
                Trend::Data(set) => Self::draw_panel(area, panel, set)?,
            }
        }

        root.present()?;
        Ok(())
    }

    fn draw_panel<DB: DrawingBackend>(
        area: &DrawingArea<DB, plotters::coord::Shift>,
        panel: &TrendPanel,
        set: &TrendSet,
    ) -> DrawResult
    where
        DB::ErrorType: 'static,
    {
        let (x_range, y_range) = panel_bounds(set)?;

        let mut chart = ChartBuilder::on(area)
            .caption(panel.title(), ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .right_y_label_area_size(10)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .light_line_style(BLACK.mix(0.05))
            .bold_line_style(BLACK.mix(0.3))
            .x_labels(8)
            .x_label_formatter(&|x| x_to_label(*x))
            .y_desc(panel.y_label())
            .x_desc("Date")
            .draw()?;

        for (i, (site, points)) in set.sites.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            let xy: Vec<(f64, f64)> = points.iter().map(|p| (date_to_x(p.date), p.value)).collect();

            chart
                .draw_series(LineSeries::new(xy.iter().copied(), color.stroke_width(2)))?
                .label(site.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

            chart.draw_series(
                xy.iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, color.filled())),
            )?;
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        Ok(())
    }
}

impl Renderer for StaticChartRenderer {
    fn render_trends(&mut self, dashboard: &TrendDashboard) -> Result<(), RenderError> {
        for panel in &dashboard.panels {
            if let Trend::Data(set) = &panel.trend {
                panel_bounds(set)?;
            }
        }
        self.prepare()?;
        let path = self.out_dir.join(TRENDS_FILE);
        Self::draw_trends(&path, dashboard, self.width, self.panel_height)
            .map_err(|e| RenderError::Draw(e.to_string()))?;
        info!(path = %path.display(), "wrote trend charts");
        self.written.push(path);
        Ok(())
    }

    fn render_stations(&mut self, map: &StationMap) -> Result<(), RenderError> {
        let page = LeafletMap::build(map, "Water Quality Monitoring Locations")?;
        self.prepare()?;
        let path = self.out_dir.join(STATIONS_FILE);
        page.write_to(&path)?;
        info!(path = %path.display(), stations = map.stations.len(), "wrote station map");
        self.written.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TrendPoint;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn set_with(values: &[f64]) -> TrendSet {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &value)| TrendPoint {
                date: start + chrono::Days::new(i as u64),
                value,
            })
            .collect();
        TrendSet {
            characteristic: "Aluminum".into(),
            unit: None,
            sites: BTreeMap::from([("A".to_string(), points)]),
        }
    }

    #[test]
    fn single_value_gets_padded_axes() {
        let (x, y) = panel_bounds(&set_with(&[5.0])).unwrap();
        assert_eq!(x.end - x.start, 2.0);
        assert!(y.start < 5.0 && y.end > 5.0);
    }

    #[test]
    fn span_wider_than_f64_is_rejected() {
        assert!(matches!(
            panel_bounds(&set_with(&[1e308, -1e308])),
            Err(RenderError::OutOfRange(_))
        ));
        assert!(matches!(
            panel_bounds(&set_with(&[f64::MAX])),
            Err(RenderError::OutOfRange(_))
        ));
    }

    #[test]
    fn out_of_range_dashboard_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let dashboard = TrendDashboard {
            panels: vec![TrendPanel {
                trend: Trend::Data(set_with(&[1e308, -1e308])),
            }],
        };
        let mut renderer = StaticChartRenderer::new(dir.path().join("out"));

        assert!(renderer.render_trends(&dashboard).is_err());
        assert!(renderer.written().is_empty());
        assert!(!dir.path().join("out").join(TRENDS_FILE).exists());
    }
}
