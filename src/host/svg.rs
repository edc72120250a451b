use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::MemorySurface;
use crate::domain::Color;
use crate::geometry::{Bounds, BoundsAccumulator, Scaler};
use crate::layers::LegendEntry;

const MARGIN_PX: f64 = 24.0;
const LINE_HEIGHT_PX: f64 = 16.0;
const CHAR_WIDTH_PX: f64 = 7.5;

/// Write the scene of `surface` as an SVG document
///
/// Shapes become `<path>` elements with their current style, visible
/// overlays a text box at their position, and `legend` a key in the
/// top-left corner. The fitted viewport is used when the host has one,
/// otherwise the extent of every shape.
pub fn write_svg(
    path: &Path,
    surface: &MemorySurface,
    legend: &[LegendEntry],
    size: (u32, u32),
) -> Result<()> {
    let document = render_svg(surface, legend, size);

    let file = File::create(path)
        .with_context(|| format!("Failed to create SVG file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(document.as_bytes())?;
    writer.flush()?;

    Ok(())
}

/// SVG document text for the scene
pub fn render_svg(surface: &MemorySurface, legend: &[LegendEntry], size: (u32, u32)) -> String {
    let (width, height) = (size.0 as f64, size.1 as f64);
    let scaler = scene_bounds(surface)
        .map(|bounds| Scaler::from_bounds_with_margin(&bounds, width, height, MARGIN_PX));

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = size.0,
        h = size.1
    );
    let _ = writeln!(
        out,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        Color::WHITE
    );

    if let Some(scaler) = &scaler {
        for (_, shape) in surface.shapes() {
            let mut data = String::new();
            for ring in &shape.rings {
                for (i, point) in ring.iter().enumerate() {
                    let (x, y) = scaler.scale(*point);
                    let command = if i == 0 { 'M' } else { 'L' };
                    let _ = write!(data, "{}{:.2},{:.2} ", command, x, y);
                }
                if !ring.is_empty() {
                    data.push_str("Z ");
                }
            }
            let style = &shape.style;
            let _ = writeln!(
                out,
                r#"  <path d="{}" fill="{}" fill-opacity="{:.2}" stroke="{}" stroke-opacity="{:.2}" stroke-width="{:.1}" fill-rule="evenodd"/>"#,
                data.trim_end(),
                style.fill_color,
                style.fill_opacity,
                style.stroke_color,
                style.stroke_opacity,
                style.stroke_weight
            );
        }

        for overlay in surface.visible_overlays() {
            let Some(position) = overlay.position else {
                continue;
            };
            let (px, py) = scaler.scale(position);
            let lines = overlay.content.lines();
            let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
            let box_w = longest as f64 * CHAR_WIDTH_PX + 16.0;
            let box_h = lines.len() as f64 * LINE_HEIGHT_PX + 10.0;
            let x = px - box_w * overlay.anchor.x;
            let y = py - box_h * overlay.anchor.y;

            let _ = writeln!(
                out,
                r##"  <rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="4" fill="#FFFFFF" stroke="#333333"/>"##,
                x, y, box_w, box_h
            );
            if let Some(badge) = &overlay.content.badge {
                let _ = writeln!(
                    out,
                    r#"  <rect x="{:.1}" y="{:.1}" width="4" height="{:.1}" fill="{}"/>"#,
                    x, y, box_h, badge.color
                );
            }
            write_text_lines(&mut out, x + 8.0, y + LINE_HEIGHT_PX, &lines);
        }
    }

    write_legend(&mut out, legend);
    out.push_str("</svg>\n");
    out
}

fn scene_bounds(surface: &MemorySurface) -> Option<Bounds> {
    if let Some(viewport) = surface.viewport() {
        return Some(viewport);
    }
    let mut acc = BoundsAccumulator::new();
    for (_, shape) in surface.shapes() {
        for ring in &shape.rings {
            acc.extend_all(ring.iter().copied());
        }
    }
    acc.current()
}

fn write_legend(out: &mut String, legend: &[LegendEntry]) {
    if legend.is_empty() {
        return;
    }
    let longest = legend.iter().map(|e| e.label.chars().count()).max().unwrap_or(0);
    let box_w = longest as f64 * CHAR_WIDTH_PX + 40.0;
    let box_h = legend.len() as f64 * LINE_HEIGHT_PX + 12.0;

    let _ = writeln!(
        out,
        r##"  <rect x="8" y="8" width="{:.1}" height="{:.1}" fill="#FFFFFF" fill-opacity="0.85" stroke="#333333"/>"##,
        box_w, box_h
    );
    for (i, entry) in legend.iter().enumerate() {
        let y = 14.0 + i as f64 * LINE_HEIGHT_PX;
        let _ = writeln!(
            out,
            r#"  <rect x="16" y="{:.1}" width="12" height="12" fill="{}"/>"#,
            y, entry.color
        );
        let _ = writeln!(
            out,
            r#"  <text x="34" y="{:.1}" font-family="sans-serif" font-size="12">{}</text>"#,
            y + 10.0,
            escape(&entry.label)
        );
    }
}

fn write_text_lines(out: &mut String, x: f64, y: f64, lines: &[String]) {
    for (i, line) in lines.iter().enumerate() {
        let weight = if i == 0 { "bold" } else { "normal" };
        let _ = writeln!(
            out,
            r#"  <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="12" font-weight="{}">{}</text>"#,
            x,
            y + i as f64 * LINE_HEIGHT_PX,
            weight,
            escape(line)
        );
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
