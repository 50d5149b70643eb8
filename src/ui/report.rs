//! Terminal rendering of demo reports
//!
//! The harness works in nanoseconds; conversion to larger units happens only here.

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Table};

use crate::core::demos::DemoReport;
use crate::stats::statistics::{Statistics, Variability};

/// Render a nanosecond figure in the largest unit that keeps it above 1.
pub fn format_nanos(nanos: f64) -> String {
    if nanos >= 1e9 {
        format!("{:.3} s", nanos / 1e9)
    } else if nanos >= 1e6 {
        format!("{:.3} ms", nanos / 1e6)
    } else if nanos >= 1e3 {
        format!("{:.3} µs", nanos / 1e3)
    } else {
        format!("{:.0} ns", nanos)
    }
}

pub fn statistics_table(label: &str, stats: &Statistics) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![Cell::new(label), Cell::new("Value")]);

    let rows: [(&str, String); 11] = [
        ("Samples", stats.count.to_string()),
        ("Mean", format_nanos(stats.mean)),
        ("Median", format_nanos(stats.median as f64)),
        ("Min", format_nanos(stats.min as f64)),
        ("Max", format_nanos(stats.max as f64)),
        ("Q1", format_nanos(stats.q1 as f64)),
        ("Q3", format_nanos(stats.q3 as f64)),
        ("Std dev", format_nanos(stats.std_dev)),
        ("CV", format!("{:.1}%", stats.coefficient_of_variation * 100.0)),
        ("Outliers", format!("{} ({:.1}%)", stats.outlier_count, stats.outlier_ratio() * 100.0)),
        ("Fences", format!("[{}, {}]", format_nanos(stats.lower_fence().max(0.0)), format_nanos(stats.upper_fence()))),
    ];
    for (name, value) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    table
}

fn verdict(stats: &Statistics) -> ColoredString {
    if let Some(degeneracy) = stats.degeneracy() {
        return format!("⚠️  {degeneracy}").yellow();
    }
    match stats.variability() {
        Variability::Stable => "✅ stable".green(),
        Variability::High => "⚠️  high variability".red(),
    }
}

/// Title line, the one-line description under it, then a rule
fn heading(report: &DemoReport) -> String {
    format!(
        "{}\n{}\n{}",
        report.title.bold().yellow(),
        report.description.italic(),
        "━".repeat(60)
    )
}

pub fn print_report(report: &DemoReport) {
    println!("\n{}", heading(report));
    for m in &report.measurements {
        println!("{}", statistics_table(&m.label, &m.statistics));
        println!("   {}", verdict(&m.statistics));
    }
    for note in &report.notes {
        println!("   • {}", note);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::sample::SampleSet;
    use crate::stats::statistics::summarize;

    #[test]
    fn picks_readable_units() {
        assert_eq!(format_nanos(0.0), "0 ns");
        assert_eq!(format_nanos(999.0), "999 ns");
        assert_eq!(format_nanos(1_500.0), "1.500 µs");
        assert_eq!(format_nanos(2_250_000.0), "2.250 ms");
        assert_eq!(format_nanos(3e9), "3.000 s");
    }

    #[test]
    fn table_lists_every_figure() {
        let stats = summarize(&SampleSet::from_nanos(vec![1, 2, 3, 4, 5, 100]).unwrap());
        let rendered = statistics_table("spike", &stats).to_string();
        for name in ["Samples", "Mean", "Median", "Q1", "Q3", "Std dev", "CV", "Outliers"] {
            assert!(rendered.contains(name), "missing {name}");
        }
        assert!(rendered.contains("1 (16.7%)"));
    }

    #[test]
    fn heading_shows_description_under_title() {
        let report = DemoReport {
            name: "spike",
            title: "Spike",
            description: "one slow sample among fast ones",
            measurements: Vec::new(),
            notes: Vec::new(),
        };
        let rendered = heading(&report);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Spike"));
        assert!(lines[1].contains("one slow sample among fast ones"));
    }
}
