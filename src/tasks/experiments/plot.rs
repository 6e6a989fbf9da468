use crate::tasks::experiments::{
    color::{
        CHART_SIZE, FONT_FAMILY, FONT_SIZE, MARKER_SIZE, STROKE_WIDTH, TITLE_FONT_SIZE,
        WIDE_CHART_SIZE, get_color_from_label, get_series_color,
    },
    stats::{BoxStats, Histogram, gaussian_kde},
};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use log::{error, info, warn};
use plotters::{coord::Shift, prelude::*};
use std::{ops::Range, path::Path};

/// Half the width of a box, in category units.
const BOX_HALF_WIDTH: f64 = 0.3;
/// Half the width of a whisker cap, in category units.
const CAP_HALF_WIDTH: f64 = 0.15;
/// Points used to draw a density curve.
const KDE_POINTS: usize = 200;

pub struct ChartLabels<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
}

/// A named line of `(x, y)` points.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// A named line over wall-clock time.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeries {
    pub label: String,
    pub points: Vec<(DateTime<Utc>, f64)>,
}

/// Range spanning every finite value in `values`, padded by 5% on each side.
pub fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if lo > hi {
        return 0.0..1.0;
    }
    if lo == hi {
        return (lo - 1.0)..(hi + 1.0);
    }

    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

/// Label for a tick at `x` on a categorical axis where category `i` sits at
/// `x == i`. Ticks between categories get no label.
pub fn category_label(categories: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    categories
        .get(idx as usize)
        .cloned()
        .unwrap_or_default()
}

fn drop_non_finite(label: &str, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let finite: Vec<(f64, f64)> = points
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    if finite.len() != points.len() {
        warn!(
            "dropping {} non-finite point(s) from series '{label}'",
            points.len() - finite.len()
        );
    }
    finite
}

fn draw_box_plot(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    labels: &ChartLabels,
    groups: &[(String, Vec<f64>)],
) -> Result<()> {
    let categories: Vec<String> = groups.iter().map(|(label, _)| label.clone()).collect();
    let y_range = padded_range(groups.iter().flat_map(|(_, values)| values.iter().copied()));
    let x_max = groups.len() as f64 - 0.5;

    let mut chart = ChartBuilder::on(area)
        .caption(labels.title, (FONT_FAMILY, TITLE_FONT_SIZE).into_font())
        .margin(10)
        .margin_right(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(-0.5..x_max, y_range)?;

    let x_label_formatter = |x: &f64| category_label(&categories, *x);
    chart
        .configure_mesh()
        .light_line_style(WHITE)
        .bold_line_style(BLACK.mix(0.1))
        .disable_x_mesh()
        .x_labels(categories.len())
        .x_label_formatter(&x_label_formatter)
        .y_label_formatter(&|y| format!("{:.1}", y))
        .label_style((FONT_FAMILY, FONT_SIZE).into_font())
        .x_desc(labels.x_desc)
        .y_desc(labels.y_desc)
        .axis_desc_style((FONT_FAMILY, FONT_SIZE).into_font())
        .draw()?;

    let fill = get_color_from_label("box-fill")?;
    for (idx, (label, values)) in groups.iter().enumerate() {
        let Some(stats) = BoxStats::from_values(values) else {
            warn!("no observations for '{label}', skipping box");
            continue;
        };
        let x = idx as f64;
        let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);

        // Box and frame
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, stats.q1), (right, stats.q3)],
            fill.filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(left, stats.q1), (right, stats.q3)],
            BLACK.stroke_width(1),
        )))?;

        // Median, whiskers and caps
        chart.draw_series(
            [
                vec![(left, stats.median), (right, stats.median)],
                vec![(x, stats.q3), (x, stats.upper_whisker)],
                vec![(x, stats.q1), (x, stats.lower_whisker)],
                vec![
                    (x - CAP_HALF_WIDTH, stats.upper_whisker),
                    (x + CAP_HALF_WIDTH, stats.upper_whisker),
                ],
                vec![
                    (x - CAP_HALF_WIDTH, stats.lower_whisker),
                    (x + CAP_HALF_WIDTH, stats.lower_whisker),
                ],
            ]
            .into_iter()
            .map(|path| PathElement::new(path, BLACK.stroke_width(2))),
        )?;

        chart.draw_series(
            stats
                .outliers
                .iter()
                .map(|y| Circle::new((x, *y), MARKER_SIZE - 1, BLACK.stroke_width(1))),
        )?;
    }

    Ok(())
}

/// One box per group, groups laid out left to right in the given order.
pub fn plot_box(path: &Path, labels: &ChartLabels, groups: &[(String, Vec<f64>)]) -> Result<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    draw_box_plot(&root, labels, groups)?;

    root.present()?;
    info!("generated plot at: {}", path.display());
    Ok(())
}

/// Two box plots side by side on the same canvas.
pub fn plot_box_pair(
    path: &Path,
    left: (&ChartLabels, &[(String, Vec<f64>)]),
    right: (&ChartLabels, &[(String, Vec<f64>)]),
) -> Result<()> {
    let root = SVGBackend::new(path, WIDE_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((1, 2));
    draw_box_plot(&panels[0], left.0, left.1)?;
    draw_box_plot(&panels[1], right.0, right.1)?;

    root.present()?;
    info!("generated plot at: {}", path.display());
    Ok(())
}

/// Histogram of `values` with a Gaussian density estimate scaled to counts.
pub fn plot_histogram(path: &Path, labels: &ChartLabels, values: &[f64], num_bins: usize) -> Result<()> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let Some(hist) = Histogram::from_values(&values, num_bins) else {
        let reason = format!(
            "cannot plot a histogram without observations (path={})",
            path.display()
        );
        error!("{reason}");
        anyhow::bail!(reason);
    };

    let x_range = hist.edges[0]..hist.edges[hist.edges.len() - 1];
    let scale = values.len() as f64 * hist.bin_width();
    let kde: Option<Vec<(f64, f64)>> =
        gaussian_kde(&values, x_range.start, x_range.end, KDE_POINTS)
            .map(|curve| curve.into_iter().map(|(x, d)| (x, d * scale)).collect());
    let kde_max = kde
        .as_ref()
        .map(|curve| curve.iter().map(|(_, y)| *y).fold(0.0, f64::max))
        .unwrap_or(0.0);
    let y_max = (hist.max_count() as f64).max(kde_max) * 1.1;

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, (FONT_FAMILY, TITLE_FONT_SIZE).into_font())
        .margin(10)
        .margin_right(30)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, 0f64..y_max)?;

    chart
        .configure_mesh()
        .light_line_style(WHITE)
        .bold_line_style(BLACK.mix(0.1))
        .x_labels(6)
        .x_label_formatter(&|x| format!("{:.0}", x))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .label_style((FONT_FAMILY, FONT_SIZE).into_font())
        .x_desc(labels.x_desc)
        .y_desc(labels.y_desc)
        .axis_desc_style((FONT_FAMILY, FONT_SIZE).into_font())
        .draw()?;

    let fill = get_color_from_label("histogram")?;
    let bars = || hist.edges.windows(2).zip(hist.counts.iter());
    chart.draw_series(
        bars().map(|(edge, count)| {
            Rectangle::new([(edge[0], 0.0), (edge[1], *count as f64)], fill.filled())
        }),
    )?;
    chart.draw_series(bars().map(|(edge, count)| {
        Rectangle::new(
            [(edge[0], 0.0), (edge[1], *count as f64)],
            BLACK.stroke_width(1),
        )
    }))?;

    if let Some(curve) = kde {
        chart.draw_series(LineSeries::new(
            curve,
            get_color_from_label("dark-blue")?.stroke_width(STROKE_WIDTH),
        ))?;
    }

    root.present()?;
    info!("generated plot at: {}", path.display());
    Ok(())
}

/// One line (with markers) per series. With `legend` set, a legend names
/// each series.
pub fn plot_series(
    path: &Path,
    labels: &ChartLabels,
    series: &[Series],
    legend: bool,
) -> Result<()> {
    let series: Vec<Series> = series
        .iter()
        .map(|s| Series {
            label: s.label.clone(),
            points: drop_non_finite(&s.label, &s.points),
        })
        .collect();
    let x_range = padded_range(series.iter().flat_map(|s| s.points.iter().map(|(x, _)| *x)));
    let y_range = padded_range(series.iter().flat_map(|s| s.points.iter().map(|(_, y)| *y)));

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, (FONT_FAMILY, TITLE_FONT_SIZE).into_font())
        .margin(10)
        .margin_right(30)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .light_line_style(WHITE)
        .bold_line_style(BLACK.mix(0.3))
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&|x| format!("{}", x))
        .y_label_formatter(&|y| format!("{:.1}", y))
        .label_style((FONT_FAMILY, FONT_SIZE).into_font())
        .x_desc(labels.x_desc)
        .y_desc(labels.y_desc)
        .axis_desc_style((FONT_FAMILY, FONT_SIZE).into_font())
        .draw()?;

    for (idx, s) in series.iter().enumerate() {
        let color = get_series_color(idx)?;
        chart
            .draw_series(LineSeries::new(
                s.points.iter().copied(),
                color.stroke_width(STROKE_WIDTH),
            ))?
            .label(s.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(STROKE_WIDTH))
            });

        chart.draw_series(
            s.points
                .iter()
                .map(|point| Circle::new(*point, MARKER_SIZE, color.filled())),
        )?;
    }

    if legend {
        chart
            .configure_series_labels()
            .label_font((FONT_FAMILY, FONT_SIZE).into_font())
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    info!("generated plot at: {}", path.display());
    Ok(())
}

/// Lines over wall-clock time, with a legend naming each series.
pub fn plot_time_series(path: &Path, labels: &ChartLabels, series: &[TimeSeries]) -> Result<()> {
    let timestamps = || series.iter().flat_map(|s| s.points.iter().map(|(t, _)| *t));
    let (Some(t_min), Some(mut t_max)) = (timestamps().min(), timestamps().max()) else {
        let reason = format!(
            "cannot plot a time series without observations (path={})",
            path.display()
        );
        error!("{reason}");
        anyhow::bail!(reason);
    };
    if t_min == t_max {
        t_max = t_min + Duration::seconds(1);
    }

    let y_max = series
        .iter()
        .flat_map(|s| s.points.iter().map(|(_, y)| *y))
        .filter(|y| y.is_finite())
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, (FONT_FAMILY, TITLE_FONT_SIZE).into_font())
        .margin(10)
        .margin_right(40)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(t_min..t_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .light_line_style(WHITE)
        .bold_line_style(BLACK.mix(0.3))
        .x_labels(5)
        .x_label_formatter(&|t: &DateTime<Utc>| t.format("%H:%M:%S").to_string())
        .y_label_formatter(&|y| format!("{:.0}", y))
        .label_style((FONT_FAMILY, FONT_SIZE).into_font())
        .x_desc(labels.x_desc)
        .y_desc(labels.y_desc)
        .axis_desc_style((FONT_FAMILY, FONT_SIZE).into_font())
        .draw()?;

    for (idx, s) in series.iter().enumerate() {
        let color = get_series_color(idx)?;
        chart
            .draw_series(LineSeries::new(
                s.points.iter().copied().filter(|(_, y)| y.is_finite()),
                color.stroke_width(STROKE_WIDTH),
            ))?
            .label(s.label.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(STROKE_WIDTH))
            });
    }

    chart
        .configure_series_labels()
        .label_font((FONT_FAMILY, FONT_SIZE).into_font())
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    info!("generated plot at: {}", path.display());
    Ok(())
}
