// Markdown hazard report: a shareable summary of the latest analytics run.

use std::path::Path;

use chrono::{DateTime, Utc};

pub const REPORT_FILE: &str = "hazard_report.md";

/// Build the report body.
///
/// `charts` lists chart file names that exist alongside the report; each is
/// linked so the Markdown renders with clickable charts next to the table.
pub fn generate_report(counts: &[(String, u64)], charts: &[&str], generated_at: DateTime<Utc>) -> String {
    let total: u64 = counts.iter().map(|(_, c)| c).sum();
    let mut md = String::new();

    md.push_str("# Hazard Analytics Report\n\n");
    md.push_str(&format!(
        "**Generated:** {}\n\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("**Total requests analyzed:** {total}\n\n"));

    md.push_str("## Hazard Counts\n\n");
    md.push_str("| Hazard | Count | Share |\n");
    md.push_str("|--------|------:|------:|\n");
    for (hazard, count) in counts {
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64 * 100.0
        };
        md.push_str(&format!("| {} | {} | {:.1}% |\n", hazard.replace('|', "\\|"), count, share));
    }
    md.push('\n');

    if !charts.is_empty() {
        md.push_str("## Charts\n\n");
        for &chart in charts {
            let title = Path::new(chart)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(chart)
                .replace('_', " ");
            md.push_str(&format!("- [{title}]({chart})\n"));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 14, 8, 30, 0).unwrap()
    }

    #[test]
    fn test_report_contains_totals_and_rows() {
        let md = generate_report(
            &[("flood".to_string(), 3), ("fire".to_string(), 1)],
            &["hazard_bar.html"],
            at(),
        );
        assert!(md.contains("**Generated:** 2025-09-14 08:30:00 UTC"));
        assert!(md.contains("**Total requests analyzed:** 4"));
        assert!(md.contains("| flood | 3 | 75.0% |"));
        assert!(md.contains("- [hazard bar](hazard_bar.html)"));
    }

    #[test]
    fn test_report_without_charts_has_no_chart_section() {
        let md = generate_report(&[("fire".to_string(), 2)], &[], at());
        assert!(!md.contains("## Charts"));
    }
}
