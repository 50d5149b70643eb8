//! Timing pitfall demonstrations
//!
//! Each demo measures one payload (or a pair of payloads) through the harness
//! and explains what the numbers show. Payloads consume their own results:
//! an unused value is free for the optimizer to delete, and then the sample
//! measures nothing.

use std::convert::Infallible;
use std::hint::black_box;

use crate::core::clock::{estimate_resolution, Clock, WallClock, COARSE_RESOLUTION_NANOS};
use crate::core::config::HarnessConfig;
use crate::core::error::Result;
use crate::core::harness::Harness;
use crate::stats::measurement::Measurement;
use crate::stats::statistics::Variability;

const COLD_RUNS: usize = 5;
const RESOLUTION_READS: usize = 1_000;
const SEARCH_ITEMS: usize = 10_000;
const JSON_RECORDS: usize = 100;

pub type DemoFn = fn(&Harness, &HarnessConfig, &mut DemoReport) -> Result<()>;

/// A registered demonstration
#[derive(Clone, Copy)]
pub struct Demo {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub run: DemoFn,
}

/// What a demo measured, plus the conclusions drawn from it
#[derive(Debug, Clone)]
pub struct DemoReport {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub measurements: Vec<Measurement>,
    pub notes: Vec<String>,
}

impl Demo {
    pub fn execute(&self, harness: &Harness, config: &HarnessConfig) -> Result<DemoReport> {
        let mut report = DemoReport {
            name: self.name,
            title: self.title,
            description: self.description,
            measurements: Vec::new(),
            notes: Vec::new(),
        };
        (self.run)(harness, config, &mut report)?;
        Ok(report)
    }
}

impl DemoReport {
    fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    fn median_of(&self, index: usize) -> f64 {
        self.measurements[index].statistics.median as f64
    }
}

pub fn all() -> Vec<Demo> {
    vec![
        Demo {
            name: "clock_resolution",
            title: "Clock resolution",
            description: "Smallest step the monotonic clock can resolve, and the cost of reading it.",
            run: clock_resolution,
        },
        Demo {
            name: "wall_clock_vs_monotonic",
            title: "Wall clock vs monotonic clock",
            description: "The same workload timed with SystemTime, millisecond ticks and Instant.",
            run: wall_clock_vs_monotonic,
        },
        Demo {
            name: "warmup_effect",
            title: "Warmup effect",
            description: "Cold first calls against the same payload after warmup.",
            run: warmup_effect,
        },
        Demo {
            name: "allocation_pressure",
            title: "Allocation pressure",
            description: "Allocation-heavy payload; outlier positions show where the allocator stalls.",
            run: allocation_pressure,
        },
        Demo {
            name: "statistical_approach",
            title: "Statistical approach",
            description: "Why one number is not enough: spread, CV and outliers of a varying workload.",
            run: statistical_approach,
        },
        Demo {
            name: "dead_code_elimination",
            title: "Dead code elimination",
            description: "Unused results let the optimizer delete the work being timed.",
            run: dead_code_elimination,
        },
        Demo {
            name: "constant_folding",
            title: "Constant folding",
            description: "A literal input can be computed at compile time; an opaque one cannot.",
            run: constant_folding,
        },
        Demo {
            name: "real_world_scenarios",
            title: "Real-world scenarios",
            description: "JSON parsing, sorting, and linear against binary search over 10k items.",
            run: real_world_scenarios,
        },
    ]
}

pub fn find(name: &str) -> Option<Demo> {
    all().into_iter().find(|d| d.name == name)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 { 0.0 } else { numerator / denominator }
}

// ============================================================================
// PAYLOADS
// ============================================================================

fn sqrt_churn() -> usize {
    let mut list = Vec::new();
    for i in 0..10_000u32 {
        list.push(f64::from(i).sqrt());
        if i % 1_000 == 0 {
            list.clear();
            list.push(f64::from(i).sin());
        }
    }
    list.len()
}

fn string_churn(count: usize) -> usize {
    let mut strings = Vec::with_capacity(count);
    let mut total = 0;
    for i in 0..count {
        strings.push(format!("string number {i} with extra text to allocate"));
        if i % 10_000 == 0 {
            total += strings.iter().map(|s| s.to_uppercase().len()).sum::<usize>();
        }
    }
    total + strings.len()
}

fn variable_work(length: u32) -> f64 {
    let mut sum = 0.0;
    for i in 0..length {
        let x = f64::from(i);
        sum += x.sqrt() + (x * 0.37).sin();
    }
    sum
}

fn triangular(limit: u64) -> u64 {
    (1..=limit).sum()
}

/// `0..len` permuted by a stride coprime with `len`
fn shuffled(len: usize) -> Vec<usize> {
    (0..len).map(|i| i * 7_919 % len).collect()
}

fn json_document(records: usize) -> String {
    let items: Vec<String> = (0..records)
        .map(|i| format!(r#"{{"id":{i},"name":"item {i}","tags":["a","b"],"score":{}.5}}"#, i % 17))
        .collect();
    format!("[{}]", items.join(","))
}

// ============================================================================
// DEMOS
// ============================================================================

fn clock_resolution(harness: &Harness, config: &HarnessConfig, report: &mut DemoReport) -> Result<()> {
    let clock = harness.clock();

    match estimate_resolution(clock, RESOLUTION_READS) {
        Some(step) if step > COARSE_RESOLUTION_NANOS => {
            report.note(format!("smallest clock step {step} ns: coarser than 1 µs, short operations will read as 0"));
        }
        Some(step) => report.note(format!("smallest clock step {step} ns: fine enough for microbenchmarks")),
        None => report.note(format!("clock never advanced across {RESOLUTION_READS} reads")),
    }

    let samples = harness.measure(|| Ok::<_, Infallible>(clock.now()), config.measured_iterations())?;
    report.measurements.push(Measurement::new("back-to-back clock reads", samples));
    report.note("durations come from a monotonic clock; wall-clock time can be stepped backward by NTP");
    Ok(())
}

fn wall_clock_vs_monotonic(harness: &Harness, config: &HarnessConfig, report: &mut DemoReport) -> Result<()> {
    let op = || Ok::<_, Infallible>(variable_work(10_000));
    let iterations = config.measured_iterations();
    harness.warmup(op, config.warmup_iterations())?;

    let wall = Harness::with_clock(WallClock::new());
    let wall_samples = wall.measure(op, iterations)?;
    report.measurements.push(Measurement::new("wall clock (SystemTime)", wall_samples));

    let millis = Harness::with_clock(WallClock::millis());
    let millis_samples = millis.measure(op, iterations)?;
    let zero_reads = millis_samples.iter().filter(|s| s.as_nanos() == 0).count();
    report.measurements.push(Measurement::new("wall clock, millisecond ticks", millis_samples));

    let monotonic = harness.measure(op, iterations)?;
    report.measurements.push(Measurement::new("monotonic clock (Instant)", monotonic));

    report.note(format!(
        "{zero_reads} of {iterations} millisecond readings were 0 ms; work shorter than one tick reads as nothing"
    ));
    let backward = wall.clock().backward_steps() + millis.clock().backward_steps();
    if backward > 0 {
        report.note(format!("wall clock stepped backward {backward} times during the run; those intervals read as 0"));
    } else {
        report.note("wall clock did not step backward this time, but NTP or a manual change can move it at any moment");
    }
    report.note(format!(
        "wall/monotonic median ratio {:.2}; only the monotonic reading is safe for intervals",
        ratio(report.median_of(0), report.median_of(2)),
    ));
    Ok(())
}

fn warmup_effect(harness: &Harness, config: &HarnessConfig, report: &mut DemoReport) -> Result<()> {
    let op = || Ok::<_, Infallible>(sqrt_churn());

    let cold = harness.measure(op, COLD_RUNS)?;
    report.measurements.push(Measurement::new("cold start", cold));

    harness.warmup(op, config.warmup_iterations())?;
    let warm = harness.measure(op, config.measured_iterations())?;
    report.measurements.push(Measurement::new("after warmup", warm));

    let first_cold = report.measurements[0].raw_samples.as_slice()[0].as_nanos() as f64;
    let warm_median = report.median_of(1);
    report.note(format!(
        "first cold call took {:.1}x the warm median; cold median is {:.1}x",
        ratio(first_cold, warm_median),
        ratio(report.median_of(0), warm_median),
    ));
    Ok(())
}

fn allocation_pressure(harness: &Harness, config: &HarnessConfig, report: &mut DemoReport) -> Result<()> {
    let (samples, stats) = harness.run(config, || Ok::<_, Infallible>(string_churn(20_000)))?;

    if stats.outlier_count == 0 {
        report.note("no outliers: allocator behaved evenly across the run");
    } else {
        report.note(format!(
            "{} outliers at positions {:?}: spikes cluster where the allocator grows or returns memory",
            stats.outlier_count, stats.outlier_indices
        ));
    }
    report.measurements.push(Measurement::new("20k string allocations", samples));
    Ok(())
}

fn statistical_approach(harness: &Harness, config: &HarnessConfig, report: &mut DemoReport) -> Result<()> {
    let mut call: u32 = 0;
    let (samples, stats) = harness.run(config, || {
        call = call.wrapping_add(1);
        let length = 5_000 + call.wrapping_mul(7_919) % 10_000;
        Ok::<_, Infallible>(variable_work(length))
    })?;

    report.note(format!(
        "coefficient of variation {:.1}%, outliers {} ({:.1}%)",
        stats.coefficient_of_variation * 100.0,
        stats.outlier_count,
        stats.outlier_ratio() * 100.0
    ));
    match stats.variability() {
        Variability::High => report.note("high variability: interference likely, do not trust the mean"),
        Variability::Stable => report.note("acceptable stability"),
    }
    if let Some(degeneracy) = stats.degeneracy() {
        report.note(format!("warning: {degeneracy}"));
    }
    report.measurements.push(Measurement::new("variable workload", samples));
    Ok(())
}

fn dead_code_elimination(harness: &Harness, config: &HarnessConfig, report: &mut DemoReport) -> Result<()> {
    let (discarded, _) = harness.run(config, || {
        let _ = 42.0f64.ln();
        Ok::<_, Infallible>(())
    })?;
    report.measurements.push(Measurement::new("result discarded", discarded));

    let (consumed, _) = harness.run(config, || Ok::<_, Infallible>(black_box(42.0f64).ln()))?;
    report.measurements.push(Measurement::new("result consumed", consumed));

    let (empty_loop, _) = harness.run(config, || {
        for _ in 0..1_000 {}
        Ok::<_, Infallible>(())
    })?;
    report.measurements.push(Measurement::new("empty loop", empty_loop));

    let (consumed_loop, _) = harness.run(config, || {
        for i in 0..1_000u32 {
            black_box(i);
        }
        Ok::<_, Infallible>(())
    })?;
    report.measurements.push(Measurement::new("loop with consumed values", consumed_loop));

    report.note(format!(
        "discarded/consumed median ratio {:.2}, empty/consumed loop ratio {:.2}",
        ratio(report.median_of(0), report.median_of(1)),
        ratio(report.median_of(2), report.median_of(3)),
    ));
    report.note("a discarded result lets the optimizer delete the work; the sample then times only the clock");
    Ok(())
}

fn constant_folding(harness: &Harness, config: &HarnessConfig, report: &mut DemoReport) -> Result<()> {
    let (folded, _) = harness.run(config, || Ok::<_, Infallible>(triangular(10_000)))?;
    report.measurements.push(Measurement::new("constant input", folded));

    let (opaque, _) = harness.run(config, || Ok::<_, Infallible>(triangular(black_box(10_000))))?;
    report.measurements.push(Measurement::new("opaque input", opaque));

    report.note(format!(
        "constant/opaque median ratio {:.2}; with a literal input the sum can be computed at compile time",
        ratio(report.median_of(0), report.median_of(1)),
    ));
    Ok(())
}

fn real_world_scenarios(harness: &Harness, config: &HarnessConfig, report: &mut DemoReport) -> Result<()> {
    let document = json_document(JSON_RECORDS);
    let (parsed, _) = harness.run(config, || serde_json::from_str::<serde_json::Value>(&document))?;
    report.measurements.push(Measurement::new("parse 100-record JSON document", parsed));

    let data = shuffled(SEARCH_ITEMS);
    let (sorting, _) = harness.run(config, || {
        let mut copy = data.clone();
        copy.sort_unstable();
        Ok::<_, Infallible>(copy)
    })?;
    report.measurements.push(Measurement::new("sort 10k shuffled items", sorting));

    let mut sorted = data;
    sorted.sort_unstable();
    let target = SEARCH_ITEMS * 3 / 4;

    let (linear, _) = harness.run(config, || {
        Ok::<_, Infallible>(sorted.iter().position(|&x| x == black_box(target)))
    })?;
    report.measurements.push(Measurement::new("linear search", linear));

    let (binary, _) = harness.run(config, || Ok::<_, Infallible>(sorted.binary_search(&black_box(target)).ok()))?;
    report.measurements.push(Measurement::new("binary search", binary));

    report.note(format!(
        "binary search is {:.1}x faster than a linear scan for item {target} of {SEARCH_ITEMS}",
        ratio(report.median_of(2), report.median_of(3)),
    ));
    report.note("sorting once pays off after a handful of lookups; measure the whole workflow, not one call");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> HarnessConfig {
        HarnessConfig::new(2, 8).unwrap()
    }

    #[test]
    fn names_are_unique() {
        let demos = all();
        for (i, a) in demos.iter().enumerate() {
            assert!(demos[i + 1..].iter().all(|b| b.name != a.name), "duplicate {}", a.name);
        }
        assert!(find("warmup_effect").is_some());
        assert!(find("nope").is_none());
    }

    #[test]
    fn every_demo_produces_measurements() {
        let harness = Harness::new();
        for demo in all() {
            let report = demo.execute(&harness, &small()).unwrap();
            assert_eq!(report.name, demo.name);
            assert!(!report.description.is_empty(), "{} has no description", demo.name);
            assert!(!report.measurements.is_empty(), "{} measured nothing", demo.name);
            assert!(!report.notes.is_empty());
        }
    }

    #[test]
    fn warmup_effect_measures_cold_and_warm() {
        let report = find("warmup_effect").unwrap().execute(&Harness::new(), &small()).unwrap();
        assert_eq!(report.measurements[0].raw_samples.len(), COLD_RUNS);
        assert_eq!(report.measurements[1].raw_samples.len(), 8);
    }

    #[test]
    fn wall_clock_demo_measures_both_clocks() {
        let report = find("wall_clock_vs_monotonic").unwrap().execute(&Harness::new(), &small()).unwrap();
        let labels: Vec<&str> = report.measurements.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(
            labels,
            ["wall clock (SystemTime)", "wall clock, millisecond ticks", "monotonic clock (Instant)"]
        );
        assert!(report.measurements.iter().all(|m| m.raw_samples.len() == 8));
        assert!(report.notes.iter().any(|n| n.contains("millisecond readings")));
    }

    #[test]
    fn real_world_scenarios_compares_search_strategies() {
        let report = find("real_world_scenarios").unwrap().execute(&Harness::new(), &small()).unwrap();
        assert_eq!(report.measurements.len(), 4);
        assert_eq!(report.measurements[2].label, "linear search");
        assert_eq!(report.measurements[3].label, "binary search");
        assert!(report.notes[0].contains("faster than a linear scan"));
    }

    #[test]
    fn payloads_compute_expected_values() {
        assert_eq!(triangular(100), 5_050);
        assert_eq!(sqrt_churn(), 1 + 999);
        assert_eq!(string_churn(0), 0);

        let mut items = shuffled(SEARCH_ITEMS);
        assert_eq!(&items[..3], &[0, 7_919, 5_838]);
        items.sort_unstable();
        assert!(items.iter().enumerate().all(|(i, &x)| i == x));

        let parsed: serde_json::Value = serde_json::from_str(&json_document(3)).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 3);
        assert_eq!(parsed[2]["name"], "item 2");
    }
}
