//! Call profiling for the evolution loop.
//!
//! Per-name invocation counts and cumulative wall time, owned by the
//! caller (no global state). The loop records each agent application
//! and objective evaluation; the report is a plain table sorted by
//! cumulative time.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Accumulated timing for one profiled name.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallStats {
    /// Number of recorded invocations.
    pub calls: u64,
    /// Total wall time across invocations.
    pub elapsed: Duration,
}

impl CallStats {
    /// Mean time per invocation.
    pub fn mean(&self) -> Duration {
        if self.calls == 0 {
            Duration::ZERO
        } else {
            self.elapsed / self.calls as u32
        }
    }
}

/// Invocation-count and wall-time accumulator.
#[derive(Debug, Clone, Default)]
pub struct Profiler {
    stats: HashMap<&'static str, CallStats>,
}

impl Profiler {
    /// Creates an empty profiler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one invocation of `name` taking `elapsed`.
    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        let entry = self.stats.entry(name).or_default();
        entry.calls += 1;
        entry.elapsed += elapsed;
    }

    /// Stats for one profiled name, if recorded.
    pub fn stats(&self, name: &str) -> Option<CallStats> {
        self.stats.get(name).copied()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Entries sorted by cumulative time, longest first.
    pub fn sorted(&self) -> Vec<(&'static str, CallStats)> {
        let mut entries: Vec<_> = self.stats.iter().map(|(&n, &s)| (n, s)).collect();
        entries.sort_by(|a, b| b.1.elapsed.cmp(&a.1.elapsed));
        entries
    }
}

impl fmt::Display for Profiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<28} {:>10} {:>12} {:>12}", "name", "calls", "total", "mean")?;
        for (name, stats) in self.sorted() {
            writeln!(
                f,
                "{:<28} {:>10} {:>10.3}ms {:>10.4}ms",
                name,
                stats.calls,
                stats.elapsed.as_secs_f64() * 1e3,
                stats.mean().as_secs_f64() * 1e3,
            )?;
        }
        Ok(())
    }
}
