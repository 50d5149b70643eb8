//! Export of raw samples (CSV) and statistics (JSON)

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::core::error::Result;
use crate::stats::sample::SampleSet;
use crate::stats::statistics::Statistics;

#[derive(Serialize)]
struct SampleRow {
    index: usize,
    nanos: u64,
    is_outlier: bool,
}

#[derive(Serialize)]
struct LabelledStatistics<'a> {
    label: &'a str,
    #[serde(flatten)]
    statistics: &'a Statistics,
}

/// One row per sample in execution order: `index,nanos,is_outlier`.
pub fn export_samples_csv(samples: &SampleSet, stats: &Statistics, path: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for (index, sample) in samples.iter().enumerate() {
        writer.serialize(SampleRow {
            index,
            nanos: sample.as_nanos(),
            is_outlier: stats.outlier_indices.binary_search(&index).is_ok(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_statistics_json(entries: &[(&str, &Statistics)], path: impl AsRef<Path>) -> Result<()> {
    let rows: Vec<LabelledStatistics<'_>> = entries
        .iter()
        .map(|&(label, statistics)| LabelledStatistics { label, statistics })
        .collect();
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &rows)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::statistics::summarize;
    use tempfile::TempDir;

    #[test]
    fn csv_marks_outliers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("samples.csv");
        let samples = SampleSet::from_nanos(vec![1, 2, 3, 4, 5, 100]).unwrap();
        export_samples_csv(&samples, &summarize(&samples), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "index,nanos,is_outlier");
        assert_eq!(lines[1], "0,1,false");
        assert_eq!(lines[6], "5,100,true");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn json_keeps_labels_and_figures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.json");
        let stats = summarize(&SampleSet::from_nanos(vec![10, 20, 30, 40, 50, 60, 70, 80]).unwrap());
        export_statistics_json(&[("octet", &stats)], &path).unwrap();

        let value: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value[0]["label"], "octet");
        assert_eq!(value[0]["median"], 50);
        assert_eq!(value[0]["q1"], 30);
        assert_eq!(value[0]["q3"], 70);
    }
}
