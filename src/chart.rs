//! Bar chart rendering for a grouped series.
//!
//! The chart is a PNG drawn with Plotters' bitmap backend. Text uses a
//! TrueType font compiled into the binary, so the host needs no font
//! libraries.

use anyhow::{Context, Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::analysis::types::GroupTotal;

/// Where the revenue chart is written, relative to the working directory.
pub const REVENUE_CHART_PATH: &str = "receita_por_categoria.png";

const FONT_FAMILY: &str = "sans-serif";
const CHART_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

/// Gap between the x axis and the end of a category label, in pixels.
const LABEL_GAP: i32 = 8;

/// Presentation options for [`render_bar_chart`].
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Counter-clockwise rotation of the category labels, in degrees.
    pub label_rotation: f64,
    pub size: (u32, u32),
    pub output_path: PathBuf,
}

impl ChartOptions {
    /// Fixed layout of the revenue-by-category chart.
    pub fn revenue_by_category() -> Self {
        Self {
            title: "Receita Total por Categoria de Produto".to_string(),
            x_label: "Categoria".to_string(),
            y_label: "Receita (R$)".to_string(),
            label_rotation: 45.0,
            size: (1000, 600),
            output_path: PathBuf::from(REVENUE_CHART_PATH),
        }
    }
}

/// Makes the embedded font available to Plotters under [`FONT_FAMILY`].
fn register_chart_font() -> Result<()> {
    register_font(FONT_FAMILY, FontStyle::Normal, CHART_FONT)
        .map_err(|_| anyhow!("embedded chart font is not a valid TrueType file"))
}

/// Rotates a pixel offset counter-clockwise on screen, where y grows downward.
fn rotate_offset((x, y): (f64, f64), degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (x * cos + y * sin, y * cos - x * sin)
}

/// Draws `text` rotated by `degrees` so that its right end sits on `anchor`.
///
/// Plotters only rotates text by quarter turns, so the label is rendered
/// flat into a scratch buffer and resampled onto `area` pixel by pixel.
fn draw_rotated_label(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    text: &str,
    style: &TextStyle<'_>,
    anchor: (i32, i32),
    degrees: f64,
) -> Result<()> {
    let (w, h) = area.estimate_text_size(text, style)?;
    if w == 0 || h == 0 {
        return Ok(());
    }
    let pad = h / 2 + 2;
    let (bw, bh) = (w + 2 * pad, h + 2 * pad);

    let mut scratch = vec![255u8; (bw * bh * 3) as usize];
    {
        let flat = BitMapBackend::with_buffer(&mut scratch, (bw, bh)).into_drawing_area();
        flat.draw_text(text, style, (pad as i32, pad as i32))?;
        flat.present()?;
    }

    // right end of the text, halfway down
    let pivot = (f64::from(pad + w), f64::from(bh) / 2.0);
    let corners = [(0.0, 0.0), (f64::from(bw), 0.0), (0.0, f64::from(bh)), (f64::from(bw), f64::from(bh))]
        .map(|(x, y)| rotate_offset((x - pivot.0, y - pivot.1), degrees));
    let (min_x, max_x) = corners
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &(x, _)| (lo.min(x), hi.max(x)));
    let (min_y, max_y) = corners
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));

    for dy in min_y.floor() as i32..=max_y.ceil() as i32 {
        for dx in min_x.floor() as i32..=max_x.ceil() as i32 {
            let (sx, sy) = rotate_offset((f64::from(dx), f64::from(dy)), -degrees);
            let (sx, sy) = ((sx + pivot.0).round(), (sy + pivot.1).round());
            if sx < 0.0 || sy < 0.0 || sx >= f64::from(bw) || sy >= f64::from(bh) {
                continue;
            }
            let offset = ((sy as u32 * bw + sx as u32) * 3) as usize;
            let lightest = scratch[offset..offset + 3].iter().copied().min().unwrap_or(255);
            let ink = 255 - lightest;
            if ink == 0 {
                continue;
            }
            area.draw_pixel(
                (anchor.0 + dx, anchor.1 + dy),
                &BLACK.mix(f64::from(ink) / 255.0),
            )?;
        }
    }
    Ok(())
}

/// Draws `series` as one bar per group, in order, and writes it to
/// `options.output_path` as a PNG, replacing any existing file.
#[tracing::instrument(skip(series), fields(bars = series.len(), path = %options.output_path.display()))]
pub fn render_bar_chart(series: &[GroupTotal], options: &ChartOptions) -> Result<()> {
    register_chart_font()?;

    let n = series.len().max(1);
    let max_total = series
        .iter()
        .map(|g| g.total)
        .filter(|t| t.is_finite())
        .fold(0.0, f64::max);
    let y_max = if max_total > 0.0 { max_total * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(&options.output_path, options.size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&options.title, (FONT_FAMILY, 24))
        .margin(20)
        .x_label_area_size(140)
        .y_label_area_size(80)
        .build_cartesian_2d((0..n).into_segmented(), 0f64..y_max)?;

    // category names are drawn below, rotated
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(options.x_label.as_str())
        .y_desc(options.y_label.as_str())
        .x_labels(n)
        .x_label_formatter(&|_: &SegmentValue<usize>| String::new())
        .label_style((FONT_FAMILY, 14))
        .axis_desc_style((FONT_FAMILY, 16))
        .draw()?;

    chart.draw_series(series.iter().enumerate().map(|(i, group)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(i), 0.0),
                (SegmentValue::Exact(i + 1), group.total),
            ],
            BLUE.mix(0.8).filled(),
        )
    }))?;

    let label_style = (FONT_FAMILY, 14).into_font().color(&BLACK);
    for (i, group) in series.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(SegmentValue::CenterOf(i), 0.0));
        debug!(label = %group.key, x, y, "Drawing category label");
        draw_rotated_label(
            &root,
            &group.key,
            &label_style,
            (x, y + LABEL_GAP),
            options.label_rotation,
        )?;
    }

    root.present()
        .with_context(|| format!("failed to write chart {}", options.output_path.display()))?;
    info!(path = %options.output_path.display(), "Chart saved");
    Ok(())
}
