//! Cached natural logarithms of visit counts.
//!
//! `ln(N_parent)` is needed on every selection step of every simulation.
//! The table grows in chunks as visit counts grow and never beyond the
//! configured simulation ceiling; larger arguments fall back to `f64::ln`.

const GROWTH: usize = 1024;

/// Lazily grown `ln(n)` cache.
#[derive(Clone, Debug)]
pub struct LogTable {
    values: Vec<f64>,
    ceiling: usize,
}

impl LogTable {
    /// Create a table that caches `ln(n)` for `n < ceiling`.
    #[must_use]
    pub fn new(ceiling: usize) -> Self {
        Self {
            values: Vec::new(),
            ceiling,
        }
    }

    /// `ln(n)`, with `ln(0)` defined as 0.
    #[inline]
    pub fn ln(&mut self, n: u32) -> f64 {
        let n = n as usize;
        if let Some(&value) = self.values.get(n) {
            return value;
        }
        if n < self.ceiling {
            self.grow_to(n + 1);
            return self.values[n];
        }
        natural_log(n)
    }

    /// Make sure `ln(n)` is cached for `n < len` (bounded by the ceiling).
    pub fn grow_to(&mut self, len: usize) {
        let target = len
            .max(self.values.len() + GROWTH)
            .min(self.ceiling);
        let start = self.values.len();
        if target > start {
            self.values.extend((start..target).map(natural_log));
        }
    }

    /// Number of cached values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Is nothing cached yet?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest cacheable argument plus one.
    #[must_use]
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }
}

fn natural_log(n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        (n as f64).ln()
    }
}
