//! Value histograms rendered as PNG images.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use tracing::{debug, warn};

use labs_model::{ColumnMapping, LabTable, Role};

const WIDTH: u32 = 980;
const HEIGHT: u32 = 560;
const BINS: usize = 15;

const MARGIN_LEFT: u32 = 80;
const MARGIN_RIGHT: u32 = 40;
const MARGIN_TOP: u32 = 40;
const MARGIN_BOTTOM: u32 = 70;
const TICK: f32 = 6.0;
const GRID_LINES: u32 = 5;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const AXIS: Rgba<u8> = Rgba([51, 51, 51, 255]);
const GRID: Rgba<u8> = Rgba([226, 226, 226, 255]);
const BAR: Rgba<u8> = Rgba([31, 119, 180, 255]);
const BAR_EDGE: Rgba<u8> = Rgba([22, 84, 128, 255]);

/// Equal-width binning of a set of values.
///
/// The last bin is closed on both ends so the maximum lands inside it. When
/// every value is the same the range is widened by 0.5 on each side.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub lower: f64,
    pub upper: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins finite values; `None` when there are none or `bins` is zero.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return None;
        }
        let mut lower = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut upper = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lower == upper {
            lower -= 0.5;
            upper += 0.5;
        }
        let width = (upper - lower) / bins as f64;
        let mut counts = vec![0usize; bins];
        for value in finite {
            let index = (((value - lower) / width) as usize).min(bins - 1);
            counts[index] += 1;
        }
        Some(Self {
            lower,
            upper,
            counts,
        })
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}

/// Draw a bar chart of the histogram with axes, gridlines and tick marks.
pub fn render_histogram(histogram: &Histogram) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(WIDTH, HEIGHT, BACKGROUND);

    let plot_left = MARGIN_LEFT as f32;
    let plot_right = (WIDTH - MARGIN_RIGHT) as f32;
    let plot_top = MARGIN_TOP as f32;
    let plot_bottom = (HEIGHT - MARGIN_BOTTOM) as f32;
    let plot_width = plot_right - plot_left;
    let plot_height = plot_bottom - plot_top;

    for step in 1..=GRID_LINES {
        let y = plot_bottom - plot_height * step as f32 / GRID_LINES as f32;
        draw_line_segment_mut(&mut img, (plot_left, y), (plot_right, y), GRID);
        draw_line_segment_mut(&mut img, (plot_left - TICK, y), (plot_left, y), AXIS);
    }

    let max_count = histogram.max_count().max(1) as f32;
    let bar_width = plot_width / histogram.bins() as f32;
    for (index, &count) in histogram.counts.iter().enumerate() {
        let x0 = plot_left + bar_width * index as f32;
        draw_line_segment_mut(&mut img, (x0, plot_bottom), (x0, plot_bottom + TICK), AXIS);
        if count == 0 {
            continue;
        }
        let bar_height = (plot_height * count as f32 / max_count).round().max(1.0);
        let left = x0.round() as i32;
        let right = (x0 + bar_width).round() as i32;
        let top = (plot_bottom - bar_height).round() as i32;
        let width = (right - left).max(1) as u32;
        let rect = Rect::at(left, top).of_size(width, bar_height as u32);
        draw_filled_rect_mut(&mut img, rect, BAR);
        draw_hollow_rect_mut(&mut img, rect, BAR_EDGE);
    }
    draw_line_segment_mut(
        &mut img,
        (plot_right, plot_bottom),
        (plot_right, plot_bottom + TICK),
        AXIS,
    );

    draw_line_segment_mut(&mut img, (plot_left, plot_bottom), (plot_right, plot_bottom), AXIS);
    draw_line_segment_mut(&mut img, (plot_left, plot_top), (plot_left, plot_bottom), AXIS);

    img
}

/// Write one histogram per distinct test value to `out_dir`.
///
/// Returns the written paths in test order. Nothing is written when the test
/// name or value column is unresolved, and tests without any numeric value are
/// skipped. When two test names sanitize to the same file name the first one
/// keeps it. A chart that fails to save is logged and skipped; only failing to
/// create `out_dir` is an error.
pub fn write_histograms(
    table: &LabTable,
    mapping: &ColumnMapping,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let test_index = mapping
        .get(Role::TestName)
        .and_then(|name| table.column_index(name));
    let value_index = mapping.get(Role::Value).and_then(|name| table.column_index(name));
    let (Some(test_index), Some(value_index)) = (test_index, value_index) else {
        debug!("charts skipped: test name or value column unresolved");
        return Ok(Vec::new());
    };

    let mut values_by_test: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in &table.rows {
        let Some(test) = row[test_index].as_text() else {
            continue;
        };
        let values = values_by_test.entry(test).or_default();
        if let Some(value) = row[value_index].as_f64() {
            values.push(value);
        }
    }

    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;

    let mut written = Vec::new();
    for (test, values) in values_by_test {
        let Some(histogram) = Histogram::from_values(&values, BINS) else {
            debug!(test = %test, "no numeric values; chart skipped");
            continue;
        };
        let path = out_dir.join(format!("{}_hist.png", sanitize_file_stem(&test)));
        if written.contains(&path) {
            warn!(test = %test, path = %path.display(), "chart file name already used; chart skipped");
            continue;
        }
        match render_histogram(&histogram).save(&path) {
            Ok(()) => {
                debug!(
                    test = %test,
                    path = %path.display(),
                    values = histogram.total(),
                    "chart written"
                );
                written.push(path);
            }
            Err(error) => {
                warn!(test = %test, path = %path.display(), %error, "chart failed; continuing");
            }
        }
    }
    Ok(written)
}
