// Synthetic benchmark workloads
//
// Each workload performs a fixed, non-configurable amount of computation
// and returns a checksum derived from the computed data, so the optimizer
// cannot elide the work being measured. The set covers the classic suite
// (prime counting, map churn, buffer churn) plus the composite
// floating-point variant.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Upper bound (exclusive) for the prime-counting workload.
const PRIME_LIMIT: u64 = 100_000;

/// Entries inserted into the string index by the memory workload.
const INDEX_ENTRIES: usize = 1_000_000;

/// Keys probed back out of the string index.
const INDEX_PROBES: usize = 10_000;

/// Number of buffers built by the simulated-I/O workload.
const BUFFER_COUNT: usize = 100;

/// Elements per buffer in the simulated-I/O workload.
const BUFFER_LEN: usize = 10_000;

/// Element values cycle modulo this.
const BUFFER_MODULUS: usize = 255;

/// Iterations of the composite-math accumulation loop.
const MATH_ITERATIONS: u64 = 1_000_000;

/// Proof-of-work value returned by a workload.
///
/// Count-based workloads return an exact integer with a known expected
/// value; the composite-math workload returns its floating-point
/// accumulator, which is deterministic in shape but not guaranteed
/// bit-identical across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Checksum {
    Count(u64),
    Value(f64),
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Checksum::Count(n) => write!(f, "{}", n),
            Checksum::Value(v) => write!(f, "{:.6}", v),
        }
    }
}

/// A registered benchmark workload.
///
/// Workloads are immutable and defined once at startup; the registry owns
/// the full table for the lifetime of the process.
#[derive(Debug, Clone, Copy)]
pub struct Workload {
    /// Selection keyword, unique within the registry (never `"all"`).
    pub keyword: &'static str,

    /// Display title used in reports.
    pub title: &'static str,

    /// One-line description of what the workload computes.
    pub detail: &'static str,

    /// Label for the checksum line of the report.
    pub summary_label: &'static str,

    /// Whether the workload is part of the `all` suite.
    pub in_suite: bool,

    /// The computation itself.
    pub run: fn() -> Checksum,
}

impl Workload {
    /// Execute the workload to completion and return its checksum.
    pub fn execute(&self) -> Checksum {
        (self.run)()
    }
}

/// 6k±1 trial-division primality test.
fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    let mut i = 5u64;
    while i * i <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// CPU workload: count the primes in `2..100_000`.
///
/// Exercises integer arithmetic and branching. The checksum is the prime
/// count, which doubles as a correctness check (the range has exactly
/// 9592 primes).
pub fn count_primes() -> Checksum {
    let mut count = 0u64;
    for n in 2..PRIME_LIMIT {
        if is_prime(n) {
            count += 1;
        }
    }
    Checksum::Count(count)
}

/// Memory workload: build a map of one million decimal strings, then
/// probe the first ten thousand keys and accumulate the string lengths.
///
/// Exercises allocator throughput and hash-map access. The checksum is
/// the accumulated length total, independent of map size.
pub fn index_decimal_strings() -> Checksum {
    let mut index: HashMap<usize, String> = HashMap::with_capacity(INDEX_ENTRIES);
    for i in 0..INDEX_ENTRIES {
        index.insert(i, i.to_string());
    }

    let mut total = 0u64;
    for i in 0..INDEX_PROBES {
        if let Some(value) = index.get(&i) {
            total += value.len() as u64;
        }
    }
    Checksum::Count(total)
}

/// Simulated-I/O workload: build 100 buffers of 10_000 elements with
/// value `i % 255`, then sum every element.
///
/// Exercises repeated allocation and sequential traversal in the shape of
/// a batched read-process pipeline, without touching real I/O.
pub fn fill_and_sum_buffers() -> Checksum {
    let mut buffers: Vec<Vec<u32>> = Vec::with_capacity(BUFFER_COUNT);
    for _ in 0..BUFFER_COUNT {
        let mut inner = Vec::with_capacity(BUFFER_LEN);
        for i in 0..BUFFER_LEN {
            inner.push((i % BUFFER_MODULUS) as u32);
        }
        buffers.push(inner);
    }

    let mut total = 0u64;
    for buffer in &buffers {
        total += buffer.iter().map(|&v| u64::from(v)).sum::<u64>();
    }
    Checksum::Count(total)
}

/// Composite-math workload: accumulate a mix of trigonometric and square
/// root operations over one million iterations.
///
/// The constants are the literal approximations of the source
/// implementation, kept for result compatibility; do not "fix" them to
/// `std::f64::consts`.
pub fn accumulate_math_series() -> Checksum {
    let mut acc = 0.0f64;
    for i in 0..MATH_ITERATIONS {
        let x = i as f64;
        acc += (x * 3.14159).sin() + (x / 2.71828).cos() + x.sqrt() * 1.414;
    }
    Checksum::Value(acc)
}
