// Workload registry and benchmark dispatch

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info};

use crate::error::{BotError, Result};
use crate::report::{self, BenchmarkResult};
use crate::timer;
use crate::workload::{self, Workload};

/// Keyword that selects the whole suite.
pub const SUITE_KEYWORD: &str = "all";

/// Fixed, ordered table of the workloads known to the bot.
///
/// Built once at startup; keywords are unique and never collide with the
/// suite sentinel.
pub struct BenchmarkRegistry {
    workloads: Vec<Workload>,
}

impl BenchmarkRegistry {
    /// The built-in workload table.
    ///
    /// `cpu`, `memory` and `io` form the `all` suite; `math` is
    /// selectable on its own only, so the suite report keeps its
    /// three-section shape.
    pub fn builtin() -> Self {
        Self {
            workloads: vec![
                Workload {
                    keyword: "cpu",
                    title: "CPU Benchmark",
                    detail: "Prime count up to 100000",
                    summary_label: "Primes found",
                    in_suite: true,
                    run: workload::count_primes,
                },
                Workload {
                    keyword: "memory",
                    title: "Memory Benchmark",
                    detail: "Build and probe a map of 1000000 entries",
                    summary_label: "Checksum",
                    in_suite: true,
                    run: workload::index_decimal_strings,
                },
                Workload {
                    keyword: "io",
                    title: "IO Benchmark",
                    detail: "Create and process 100 buffers of 10000 elements",
                    summary_label: "Total sum",
                    in_suite: true,
                    run: workload::fill_and_sum_buffers,
                },
                Workload {
                    keyword: "math",
                    title: "Math Benchmark",
                    detail: "1000000 iterations of mixed math operations",
                    summary_label: "Result",
                    in_suite: false,
                    run: workload::accumulate_math_series,
                },
            ],
        }
    }

    /// Registry over an arbitrary workload table.
    #[cfg(test)]
    pub(crate) fn with_workloads(workloads: Vec<Workload>) -> Self {
        Self { workloads }
    }

    /// Look up a workload by its exact keyword.
    pub fn get(&self, keyword: &str) -> Option<&Workload> {
        self.workloads.iter().find(|w| w.keyword == keyword)
    }

    /// Workloads belonging to the `all` suite, in registry order.
    pub fn suite(&self) -> impl Iterator<Item = &Workload> {
        self.workloads.iter().filter(|w| w.in_suite)
    }

    /// Every selection keyword, in registry order.
    pub fn keywords(&self) -> Vec<&'static str> {
        self.workloads.iter().map(|w| w.keyword).collect()
    }
}

/// Resolves a selection keyword to workloads, runs them under the timer
/// and renders the reply text.
pub struct Dispatcher {
    registry: BenchmarkRegistry,

    /// Command trigger echoed in the suite report's usage hint,
    /// e.g. `?benchmark`.
    trigger: String,
}

impl Dispatcher {
    /// Create a dispatcher over a registry.
    pub fn new(registry: BenchmarkRegistry, trigger: impl Into<String>) -> Self {
        Self {
            registry,
            trigger: trigger.into(),
        }
    }

    /// Run the workload(s) selected by `keyword` and render the reply.
    ///
    /// Resolution:
    /// 1. Exact keyword match - run that single workload
    /// 2. Anything else (`all`, empty, unknown) - run the full suite
    ///
    /// Unknown keywords deliberately fall back to the suite instead of an
    /// error; `?benchmark typo` has always produced the full report and
    /// callers depend on it.
    pub fn dispatch(&self, keyword: &str) -> Result<String> {
        if let Some(selected) = self.registry.get(keyword) {
            info!("Running single benchmark '{}'", keyword);
            let result = self.run_one(selected)?;
            return Ok(report::format_one(&result));
        }

        if keyword != SUITE_KEYWORD && !keyword.is_empty() {
            debug!(
                "Keyword '{}' not in registry, falling back to the full suite",
                keyword
            );
        }

        info!("Running benchmark suite");
        let mut results = Vec::new();
        for selected in self.registry.suite() {
            results.push(self.run_one(selected)?);
        }
        Ok(report::format_combined(
            &results,
            &self.trigger,
            &self.registry.keywords(),
        ))
    }

    /// Time one workload, containing any panic it raises.
    fn run_one(&self, selected: &Workload) -> Result<BenchmarkResult> {
        match panic::catch_unwind(AssertUnwindSafe(|| timer::time_workload(selected))) {
            Ok(result) => {
                debug!("Benchmark result: {}", result.to_json());
                Ok(result)
            }
            Err(payload) => {
                let message = panic_message(payload);
                error!("Benchmark '{}' panicked: {}", selected.keyword, message);
                Err(BotError::Workload {
                    keyword: selected.keyword.to_string(),
                    message,
                })
            }
        }
    }
}

/// Best-effort extraction of a panic payload's message.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workload::Checksum;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(BenchmarkRegistry::builtin(), "?benchmark")
    }

    #[test]
    fn test_builtin_registry_shape() {
        let registry = BenchmarkRegistry::builtin();

        // Full keyword set, in order
        assert_eq!(registry.keywords(), vec!["cpu", "memory", "io", "math"]);

        // The suite is cpu/memory/io; math runs on its own only
        let suite: Vec<&str> = registry.suite().map(|w| w.keyword).collect();
        assert_eq!(suite, vec!["cpu", "memory", "io"]);

        // The suite sentinel is not a workload
        assert!(registry.get(SUITE_KEYWORD).is_none());
    }

    #[test]
    fn test_registry_lookup_is_exact() {
        let registry = BenchmarkRegistry::builtin();
        assert_eq!(registry.get("cpu").map(|w| w.title), Some("CPU Benchmark"));
        assert!(registry.get("CPU").is_none());
        assert!(registry.get("bogus").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_dispatch_single_workload() {
        let rendered = dispatcher().dispatch("cpu").unwrap();
        assert!(rendered.contains("CPU Benchmark"));
        assert!(rendered.contains("Primes found: 9592"));
        assert!(!rendered.contains("# Benchmark results"));
        assert!(!rendered.contains("Memory Benchmark"));
    }

    #[test]
    fn test_dispatch_suite() {
        let rendered = dispatcher().dispatch("all").unwrap();
        assert!(rendered.starts_with("# Benchmark results"));
        assert!(rendered.contains("CPU Benchmark"));
        assert!(rendered.contains("Memory Benchmark"));
        assert!(rendered.contains("IO Benchmark"));
        assert!(!rendered.contains("Math Benchmark"));
        assert!(rendered.contains("**Total time: "));
    }

    #[test]
    fn test_dispatch_unknown_keyword_falls_back_to_suite() {
        let rendered = dispatcher().dispatch("bogus").unwrap();
        assert!(rendered.contains("CPU Benchmark"));
        assert!(rendered.contains("Memory Benchmark"));
        assert!(rendered.contains("IO Benchmark"));
    }

    #[test]
    fn test_dispatch_math_keeps_millis_style() {
        let rendered = dispatcher().dispatch("math").unwrap();
        assert!(rendered.contains("Math Benchmark"));
        assert!(rendered.contains("• Result: "));

        // Elapsed line uses fractional milliseconds, not seconds+millis
        let elapsed = rendered
            .lines()
            .find(|line| line.starts_with("• Elapsed: "))
            .unwrap();
        assert!(elapsed.ends_with("ms"));
        assert!(elapsed.contains('.'));
    }

    #[test]
    fn test_dispatch_contains_workload_panic() {
        fn exploding() -> Checksum {
            panic!("buffer underflow");
        }
        let registry = BenchmarkRegistry::with_workloads(vec![Workload {
            keyword: "boom",
            title: "Boom",
            detail: "always panics",
            summary_label: "Checksum",
            in_suite: false,
            run: exploding,
        }]);
        let dispatcher = Dispatcher::new(registry, "?benchmark");

        let err = dispatcher.dispatch("boom").unwrap_err();
        match err {
            BotError::Workload { keyword, message } => {
                assert_eq!(keyword, "boom");
                assert!(message.contains("buffer underflow"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(Box::new("static str")), "static str");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(42u32)), "unknown panic payload");
    }
}
