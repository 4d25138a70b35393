use std::fmt::Display;
use std::ops::Range;
use std::path::Path;

use log::{info, warn};
use plotters::prelude::*;

use crate::aggregator::SpeedupReport;
use crate::error::{Error, Result};

pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 700;

const LEGEND_X: i32 = 20;
const LEGEND_Y: i32 = 36;

/// Draws one line per size (threads on x, speedup on y) and saves it as a PNG.
pub fn render(report: &SpeedupReport, path: &Path) -> Result<()> {
    if report.is_empty() {
        warn!("no speedups to plot, writing an empty chart to {}", path.display());
    }

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let (x_range, y_range) = axis_ranges(report);
    let mut chart = ChartBuilder::on(&root)
        .caption("Speedup Graph", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_desc("Threads")
        .y_desc("Speedup")
        .draw()
        .map_err(chart_err)?;

    for (idx, entry) in report.sizes().iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        let points: Vec<(u32, f64)> = entry
            .points
            .iter()
            .map(|p| (p.threads, p.speedup))
            .collect();

        chart
            .draw_series(LineSeries::new(points.clone(), color.stroke_width(2)))
            .map_err(chart_err)?
            .label(entry.size.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart
            .draw_series(points.into_iter().map(|p| Circle::new(p, 4, color.filled())))
            .map_err(chart_err)?;
    }

    if !report.is_empty() {
        chart
            .plotting_area()
            .strip_coord_spec()
            .draw(&Text::new(
                "File Size",
                (LEGEND_X + 4, LEGEND_Y - 20),
                ("sans-serif", 16).into_font(),
            ))
            .map_err(chart_err)?;
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::Coordinate(LEGEND_X, LEGEND_Y))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_err)?;
    }

    root.present().map_err(chart_err)?;
    info!("wrote speedup chart to {}", path.display());
    Ok(())
}

/// Axis ranges covering every point with some headroom. Both start at zero.
fn axis_ranges(report: &SpeedupReport) -> (Range<u32>, Range<f64>) {
    let points = report.sizes().iter().flat_map(|s| s.points.iter());
    let (max_threads, max_speedup) = points.fold((1_u32, 1.0_f64), |(t, s), p| {
        (t.max(p.threads), s.max(p.speedup))
    });
    (0..max_threads.saturating_add(1), 0.0..max_speedup * 1.1)
}

fn chart_err<E: Display>(err: E) -> Error {
    Error::Chart(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::SpeedupAggregator;

    #[test]
    fn test_axis_ranges_empty() {
        let report = SpeedupReport::default();
        let (x, y) = axis_ranges(&report);
        assert_eq!(x, 0..2);
        assert_eq!(y.start, 0.0);
        assert!((y.end - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_axis_ranges_cover_points() {
        let mut aggregator = SpeedupAggregator::new();
        let mut input = String::new();
        for _ in 0..5 {
            input.push_str("s,100,12.0\np,100,16,2.0\np,100,4,4.0\n");
        }
        aggregator.process(input.as_bytes()).unwrap();
        let report = aggregator.compute_speedups();

        let (x, y) = axis_ranges(&report);
        assert_eq!(x, 0..17);
        assert!(y.end > 6.0);
    }

    #[test]
    fn test_axis_ranges_max_threads() {
        let mut aggregator = SpeedupAggregator::new();
        let mut input = String::new();
        for _ in 0..5 {
            input.push_str("s,100,4.0\np,100,4294967295,2.0\n");
        }
        aggregator.process(input.as_bytes()).unwrap();
        let report = aggregator.compute_speedups();
        assert_eq!(report.speedup("100", u32::MAX), Some(2.0));

        let (x, _) = axis_ranges(&report);
        assert_eq!(x, 0..u32::MAX);
    }
}
