// Benchmark result aggregation and chat-text rendering

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::time::Duration;

use crate::workload::Checksum;

/// Outcome of one timed workload execution.
///
/// Results are consumed immediately by the formatter and never persisted;
/// the timestamp records when the measurement was captured.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub keyword: &'static str,
    pub title: &'static str,
    pub detail: &'static str,
    pub summary_label: &'static str,
    pub checksum: Checksum,
    pub duration: Duration,
    pub timestamp: DateTime<Utc>,
}

impl BenchmarkResult {
    /// JSON view of the result for structured debug logging.
    pub fn to_json(&self) -> Value {
        json!({
            "workload": self.keyword,
            "checksum": self.checksum,
            "duration_ms": self.duration.as_secs_f64() * 1000.0,
            "timestamp": self.timestamp.to_rfc3339(),
        })
    }
}

/// Format a duration as whole seconds plus the millisecond remainder,
/// e.g. `3s 420ms`.
pub fn format_duration(duration: Duration) -> String {
    format!("{}s {}ms", duration.as_secs(), duration.subsec_millis())
}

/// Format a duration as fractional milliseconds with two decimals,
/// e.g. `1234.56ms`.
pub fn format_duration_millis(duration: Duration) -> String {
    format!("{:.2}ms", duration.as_secs_f64() * 1000.0)
}

/// Render one benchmark result as a chat message section.
///
/// Count-based workloads report elapsed time in the seconds+millis style;
/// the float-checksum workload keeps its native two-decimal milliseconds
/// style.
pub fn format_one(result: &BenchmarkResult) -> String {
    let elapsed = match result.checksum {
        Checksum::Count(_) => format_duration(result.duration),
        Checksum::Value(_) => format_duration_millis(result.duration),
    };
    format!(
        "**{}**\n• Test: {}\n• {}: {}\n• Elapsed: {}",
        result.title, result.detail, result.summary_label, result.checksum, elapsed
    )
}

/// Render a full suite report: header, one section per result in
/// submission order, a total-time footer, and a usage hint listing the
/// individually selectable workloads.
///
/// The total is the arithmetic sum of the constituent durations, not an
/// outer measurement around the runs.
pub fn format_combined(results: &[BenchmarkResult], trigger: &str, keywords: &[&str]) -> String {
    let total: Duration = results.iter().map(|r| r.duration).sum();

    let mut out = String::from("# Benchmark results\n\n");
    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            out.push_str("\n\n");
        }
        out.push_str(&format_one(result));
    }
    out.push_str(&format!("\n\n**Total time: {}**\n", format_duration(total)));
    out.push_str(&usage_hint(trigger, keywords));
    out
}

/// Build the `Use \`?benchmark cpu\`, ... to run a single workload.` line.
fn usage_hint(trigger: &str, keywords: &[&str]) -> String {
    let quoted: Vec<String> = keywords
        .iter()
        .map(|k| format!("`{} {}`", trigger, k))
        .collect();
    let options = match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => return String::new(),
    };
    format!("Use {} to run a single workload.", options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count_result(keyword: &'static str, millis: u64) -> BenchmarkResult {
        BenchmarkResult {
            keyword,
            title: "CPU Benchmark",
            detail: "Prime count up to 100000",
            summary_label: "Primes found",
            checksum: Checksum::Count(9592),
            duration: Duration::from_millis(millis),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_format_duration_splits_seconds_and_millis() {
        assert_eq!(format_duration(Duration::ZERO), "0s 0ms");
        assert_eq!(format_duration(Duration::from_millis(3420)), "3s 420ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "0s 999ms");
        assert_eq!(format_duration(Duration::from_secs(61)), "61s 0ms");
    }

    #[test]
    fn test_format_duration_millis_two_decimals() {
        assert_eq!(format_duration_millis(Duration::from_micros(1_234_560)), "1234.56ms");
        assert_eq!(format_duration_millis(Duration::from_millis(5)), "5.00ms");
        assert_eq!(format_duration_millis(Duration::ZERO), "0.00ms");
    }

    #[test]
    fn test_format_one_count_section() {
        let rendered = format_one(&count_result("cpu", 3420));
        assert!(rendered.starts_with("**CPU Benchmark**\n"));
        assert!(rendered.contains("• Test: Prime count up to 100000"));
        assert!(rendered.contains("• Primes found: 9592"));
        assert!(rendered.contains("• Elapsed: 3s 420ms"));
    }

    #[test]
    fn test_format_one_value_uses_millis_style() {
        let result = BenchmarkResult {
            keyword: "math",
            title: "Math Benchmark",
            detail: "1000000 iterations of mixed math operations",
            summary_label: "Result",
            checksum: Checksum::Value(942_668_437.5),
            duration: Duration::from_micros(12_340),
            timestamp: Utc::now(),
        };
        let rendered = format_one(&result);
        assert!(rendered.contains("• Result: 942668437.500000"));
        assert!(rendered.contains("• Elapsed: 12.34ms"));
        assert!(!rendered.contains("s 12ms"));
    }

    #[test]
    fn test_format_combined_totals_and_order() {
        let results = vec![count_result("cpu", 1000), count_result("memory", 500)];
        let rendered = format_combined(&results, "?benchmark", &["cpu", "memory", "io"]);

        assert!(rendered.starts_with("# Benchmark results\n\n"));
        assert!(rendered.contains("**Total time: 1s 500ms**"));

        let first = rendered.find("Elapsed: 1s 0ms").unwrap();
        let second = rendered.find("Elapsed: 0s 500ms").unwrap();
        assert!(first < second, "sections must keep submission order");
    }

    #[test]
    fn test_format_combined_hint_lists_keywords() {
        let rendered = format_combined(&[count_result("cpu", 1)], "?benchmark", &["cpu", "memory", "io", "math"]);
        assert!(rendered.ends_with(
            "Use `?benchmark cpu`, `?benchmark memory`, `?benchmark io` \
             or `?benchmark math` to run a single workload."
        ));
    }

    #[test]
    fn test_usage_hint_single_keyword() {
        assert_eq!(
            usage_hint("?bench", &["cpu"]),
            "Use `?bench cpu` to run a single workload."
        );
    }

    #[test]
    fn test_result_json_view() {
        let result = count_result("cpu", 1500);
        let value = result.to_json();
        assert_eq!(value["workload"], "cpu");
        assert_eq!(value["checksum"], 9592);
        assert_eq!(value["duration_ms"], 1500.0);
        assert!(value["timestamp"].is_string());
    }
}
