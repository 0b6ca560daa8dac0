// Chart files: standalone HTML pages with inline SVG.
//
// Each writer takes label counts (or a confusion matrix) and produces one
// self-contained file that opens in any browser, no scripts or CDNs.

use std::f64::consts::PI;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::evaluation::ConfusionMatrix;

pub const BAR_CHART_FILE: &str = "hazard_bar.html";
pub const PIE_CHART_FILE: &str = "hazard_pie.html";
pub const CONFUSION_MATRIX_FILE: &str = "confusion_matrix.html";
pub const IMPROVED_CONFUSION_MATRIX_FILE: &str = "confusion_matrix_improved.html";

const PALETTE: &[&str] = &[
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a", "#19d3f3", "#ff6692", "#b6e880",
];

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn page(title: &str, svg: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>body {{ font-family: sans-serif; margin: 2em; }} text {{ font-size: 12px; }}</style>\n\
         </head>\n<body>\n<h2>{title}</h2>\n{svg}\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn write_page(path: &Path, title: &str, svg: &str) -> Result<()> {
    fs::write(path, page(title, svg)).with_context(|| format!("Failed to write {}", path.display()))
}

/// Vertical bar chart of counts per label, in the given order.
pub fn bar_chart_svg(counts: &[(String, u64)]) -> String {
    let bar_width = 60.0;
    let gap = 20.0;
    let plot_height = 300.0;
    let top = 20.0;
    let left = 50.0;
    let width = left + counts.len() as f64 * (bar_width + gap) + gap;
    let height = top + plot_height + 60.0;
    let max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1) as f64;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\">\n"
    );
    let axis_y = top + plot_height;
    let _ = writeln!(
        svg,
        "<line x1=\"{left}\" y1=\"{top}\" x2=\"{left}\" y2=\"{axis_y}\" stroke=\"#444\"/>\
         <line x1=\"{left}\" y1=\"{axis_y}\" x2=\"{width}\" y2=\"{axis_y}\" stroke=\"#444\"/>"
    );

    for (i, (label, count)) in counts.iter().enumerate() {
        let h = *count as f64 / max * plot_height;
        let x = left + gap + i as f64 * (bar_width + gap);
        let y = axis_y - h;
        let color = PALETTE[i % PALETTE.len()];
        let cx = x + bar_width / 2.0;
        let _ = writeln!(
            svg,
            "<rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{bar_width}\" height=\"{h:.1}\" fill=\"{color}\">\
             <title>{label}: {count}</title></rect>\
             <text x=\"{cx:.1}\" y=\"{ty:.1}\" text-anchor=\"middle\">{count}</text>\
             <text x=\"{cx:.1}\" y=\"{ly:.1}\" text-anchor=\"middle\">{label}</text>",
            label = escape(label),
            ty = y - 4.0,
            ly = axis_y + 18.0,
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Pie chart of label shares with a legend.
pub fn pie_chart_svg(counts: &[(String, u64)]) -> String {
    let total: u64 = counts.iter().map(|(_, c)| c).sum();
    let (cx, cy, r) = (160.0, 160.0, 140.0);
    let legend_x = 340.0;
    let height = (counts.len() as f64 * 22.0 + 40.0).max(320.0);

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"560\" height=\"{height}\">\n"
    );

    let mut angle = -PI / 2.0;
    for (i, (label, count)) in counts.iter().enumerate() {
        if total == 0 {
            break;
        }
        let share = *count as f64 / total as f64;
        let color = PALETTE[i % PALETTE.len()];
        let label = escape(label);
        let pct = share * 100.0;

        if *count == total {
            let _ = writeln!(
                svg,
                "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"{color}\"><title>{label}: {pct:.1}%</title></circle>"
            );
        } else if *count > 0 {
            let sweep = share * 2.0 * PI;
            let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
            let large_arc = if sweep > PI { 1 } else { 0 };
            let _ = writeln!(
                svg,
                "<path d=\"M{cx},{cy} L{x1:.2},{y1:.2} A{r},{r} 0 {large_arc} 1 {x2:.2},{y2:.2} Z\" fill=\"{color}\">\
                 <title>{label}: {pct:.1}%</title></path>"
            );
            angle = end;
        }

        let ly = 30.0 + i as f64 * 22.0;
        let _ = writeln!(
            svg,
            "<rect x=\"{legend_x}\" y=\"{ry}\" width=\"14\" height=\"14\" fill=\"{color}\"/>\
             <text x=\"{tx}\" y=\"{ly}\">{label} ({count}, {pct:.1}%)</text>",
            ry = ly - 11.0,
            tx = legend_x + 20.0,
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Heatmap of a confusion matrix, true labels down, predictions across.
pub fn confusion_matrix_svg(matrix: &ConfusionMatrix) -> String {
    let n = matrix.labels.len();
    let cell = 56.0;
    let left = 110.0;
    let top = 110.0;
    let size = left + n as f64 * cell + 20.0;
    let max = matrix
        .counts
        .iter()
        .flatten()
        .copied()
        .max()
        .unwrap_or(0)
        .max(1) as f64;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{size}\" height=\"{size}\">\n"
    );
    for (i, label) in matrix.labels.iter().enumerate() {
        let label = escape(label);
        let offset = i as f64 * cell + cell / 2.0;
        let _ = writeln!(
            svg,
            "<text x=\"{tx}\" y=\"{ty}\" text-anchor=\"end\">{label}</text>\
             <text transform=\"translate({cx},{cy}) rotate(-45)\">{label}</text>",
            tx = left - 6.0,
            ty = top + offset + 4.0,
            cx = left + offset,
            cy = top - 6.0,
        );
    }
    for (t, row) in matrix.counts.iter().enumerate() {
        for (p, &count) in row.iter().enumerate() {
            let x = left + p as f64 * cell;
            let y = top + t as f64 * cell;
            let opacity = 0.08 + 0.92 * (count as f64 / max);
            let fill = if count as f64 > max / 2.0 { "#fff" } else { "#000" };
            let _ = writeln!(
                svg,
                "<rect x=\"{x}\" y=\"{y}\" width=\"{cell}\" height=\"{cell}\" fill=\"#08519c\" fill-opacity=\"{opacity:.2}\" stroke=\"#fff\"/>\
                 <text x=\"{tx}\" y=\"{ty}\" text-anchor=\"middle\" fill=\"{fill}\">{count}</text>",
                tx = x + cell / 2.0,
                ty = y + cell / 2.0 + 4.0,
            );
        }
    }
    svg.push_str("</svg>");
    svg
}

pub fn write_bar_chart(counts: &[(String, u64)], path: &Path) -> Result<()> {
    write_page(path, "Hazard Type Distribution", &bar_chart_svg(counts))
}

pub fn write_pie_chart(counts: &[(String, u64)], path: &Path) -> Result<()> {
    write_page(path, "Hazard Type Share", &pie_chart_svg(counts))
}

pub fn write_confusion_matrix(matrix: &ConfusionMatrix, path: &Path) -> Result<()> {
    write_page(path, "Confusion Matrix", &confusion_matrix_svg(matrix))
}
