//! Pure SVG chart for the training metric
//!
//! Rendering is a pure function from a point sequence to SVG elements; the
//! data comes fully prepared (ascending by round) from the engine snapshot.

use dioxus::prelude::*;
use fedsim_sync_engine::ChartPoint;

/// A point in chart space: round on x, metric value on y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

/// Pick the series to plot: live loss when any point carries it, otherwise
/// the accuracy series the history fallback provides.
pub fn chart_series(points: &[ChartPoint]) -> (Vec<DataPoint>, &'static str) {
    let loss: Vec<DataPoint> = points
        .iter()
        .filter_map(|p| p.loss.map(|y| DataPoint { x: p.round as f64, y }))
        .collect();
    if !loss.is_empty() {
        return (loss, "Global Model Loss");
    }

    let accuracy: Vec<DataPoint> = points
        .iter()
        .filter_map(|p| p.accuracy.map(|y| DataPoint { x: p.round as f64, y }))
        .collect();
    (accuracy, "Validation Accuracy (persisted rounds)")
}

/// Line chart over training rounds, with an area fill under the line.
#[component]
pub fn MetricChart(
    /// Data points to render, ascending by round
    data: Vec<DataPoint>,
    /// Chart width in pixels
    #[props(default = 640)]
    width: u32,
    /// Chart height in pixels
    #[props(default = 260)]
    height: u32,
    /// CSS color for the line
    #[props(default = "var(--accent-primary)".to_string())]
    color: String,
) -> Element {
    if data.is_empty() {
        return rsx! {
            div {
                class: "chart-container chart-empty",
                style: "width: {width}px; height: {height}px;",
                "No metric data yet"
            }
        };
    }

    let x_min = data.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let x_max = data.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let y_lo = data.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let y_hi = data.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let y_min = y_lo.min(0.0);
    let y_max = (y_hi * 1.1).max(y_min + 0.001);
    let x_range = (x_max - x_min).max(1.0);
    let y_range = y_max - y_min;

    let padding_left = 50.0;
    let padding_right = 12.0;
    let padding_top = 12.0;
    let padding_bottom = 26.0;

    let plot_width = width as f64 - padding_left - padding_right;
    let plot_height = height as f64 - padding_top - padding_bottom;

    let scale_x = |x: f64| padding_left + ((x - x_min) / x_range) * plot_width;
    let scale_y = |y: f64| padding_top + (1.0 - (y - y_min) / y_range) * plot_height;

    let mut line_d = String::new();
    let mut area_d = String::new();
    for (i, point) in data.iter().enumerate() {
        let x = scale_x(point.x);
        let y = scale_y(point.y);
        if i == 0 {
            line_d.push_str(&format!("M {x:.1} {y:.1}"));
            area_d.push_str(&format!("M {x:.1} {:.1} L {x:.1} {y:.1}", scale_y(y_min)));
        } else {
            line_d.push_str(&format!(" L {x:.1} {y:.1}"));
            area_d.push_str(&format!(" L {x:.1} {y:.1}"));
        }
    }
    if let Some(last) = data.last() {
        area_d.push_str(&format!(
            " L {:.1} {:.1} Z",
            scale_x(last.x),
            scale_y(y_min)
        ));
    }

    let grid_lines = 4;
    let y_step = y_range / grid_lines as f64;

    rsx! {
        div {
            class: "chart-container",
            style: "width: {width}px; height: {height}px;",

            svg {
                width: "{width}",
                height: "{height}",
                view_box: "0 0 {width} {height}",

                // Horizontal grid with value labels
                for i in 0..=grid_lines {
                    {
                        let y_val = y_min + (i as f64) * y_step;
                        let y_pos = scale_y(y_val);
                        rsx! {
                            line {
                                x1: "{padding_left}",
                                y1: "{y_pos:.1}",
                                x2: "{width as f64 - padding_right}",
                                y2: "{y_pos:.1}",
                                stroke: "var(--border-color)",
                                stroke_dasharray: "3,3",
                                stroke_width: "1",
                            }
                            text {
                                x: "{padding_left - 6.0}",
                                y: "{y_pos:.1}",
                                text_anchor: "end",
                                dominant_baseline: "middle",
                                font_size: "10",
                                fill: "var(--text-muted)",
                                "{y_val:.2}"
                            }
                        }
                    }
                }

                path {
                    d: "{area_d}",
                    fill: "{color}",
                    fill_opacity: "0.12",
                }

                path {
                    d: "{line_d}",
                    fill: "none",
                    stroke: "{color}",
                    stroke_width: "2",
                    stroke_linecap: "round",
                    stroke_linejoin: "round",
                }

                // First and last round on the x axis
                text {
                    x: "{scale_x(x_min):.1}",
                    y: "{height as f64 - 6.0}",
                    text_anchor: "start",
                    font_size: "10",
                    fill: "var(--text-muted)",
                    "round {x_min:.0}"
                }
                if data.len() >= 2 {
                    text {
                        x: "{scale_x(x_max):.1}",
                        y: "{height as f64 - 6.0}",
                        text_anchor: "end",
                        font_size: "10",
                        fill: "var(--text-muted)",
                        "round {x_max:.0}"
                    }
                }
            }
        }
    }
}
