//! Bar chart of the four sensor inputs, rendered to an inline SVG string.

use hydrosense_core::{CompleteReadings, Field};
use plotters::prelude::*;
use thiserror::Error;

const CHART_SIZE: (u32, u32) = (640, 400);
const TEAL: RGBColor = RGBColor(0, 128, 128);

#[derive(Debug, Error)]
#[error("Chart rendering failed: {0}")]
pub struct ChartError(String);

fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError(e.to_string())
}

/// Y axis span covering every bar and zero, with a little headroom.
fn value_range(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(0.0f64, f64::min);
    let hi = values.iter().copied().fold(0.0f64, f64::max);
    if hi - lo <= f64::EPSILON {
        return (lo, lo + 1.0);
    }
    let pad = (hi - lo) * 0.1;
    (if lo < 0.0 { lo - pad } else { lo }, hi + pad)
}

fn segment_label(v: &SegmentValue<u32>) -> String {
    match v {
        SegmentValue::CenterOf(i) => Field::ALL
            .get(*i as usize)
            .map(|f| f.chart_label().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

pub fn sensor_bar_chart(readings: &CompleteReadings) -> Result<String, ChartError> {
    let values = readings.values();
    let (y_min, y_max) = value_range(&values);
    let last = Field::ALL.len() as u32 - 1;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Sensor Inputs", ("sans-serif", 22))
            .margin(16)
            .x_label_area_size(40)
            .y_label_area_size(56)
            .build_cartesian_2d((0u32..last).into_segmented(), y_min..y_max)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(Field::ALL.len())
            .x_label_formatter(&segment_label)
            .y_desc("Values")
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(values.iter().enumerate().map(|(i, v)| {
                let i = i as u32;
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *v)],
                    TEAL.filled(),
                );
                bar.set_margin(0, 0, 12, 12);
                bar
            }))
            .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
    }
    Ok(svg)
}
