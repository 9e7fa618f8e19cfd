use std::time::{Duration, Instant};

/// Run a function and measure its execution time.
///
/// # Returns
///
/// A tuple of (result, elapsed_time)
pub fn time_fn<F, R>(f: F) -> (R, Duration)
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Statistics over repeated timings.
#[derive(Debug, Clone)]
pub struct BenchmarkStats {
    pub runs: usize,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub median_ms: f64,
}

impl BenchmarkStats {
    /// Time `runs` calls of `f`.
    pub fn measure<F, R>(runs: usize, mut f: F) -> Self
    where
        F: FnMut() -> R,
    {
        let times = (0..runs)
            .map(|_| {
                let (result, elapsed) = time_fn(&mut f);
                std::hint::black_box(result);
                elapsed.as_secs_f64() * 1000.0
            })
            .collect();
        Self::from_times(times)
    }

    /// Calculate statistics from a list of times in milliseconds.
    pub fn from_times(mut times: Vec<f64>) -> Self {
        times.sort_by(|a, b| a.total_cmp(b));
        let n = times.len();
        if n == 0 {
            return Self {
                runs: 0,
                mean_ms: 0.0,
                min_ms: 0.0,
                max_ms: 0.0,
                median_ms: 0.0,
            };
        }
        let median = if n % 2 == 0 {
            (times[n / 2 - 1] + times[n / 2]) / 2.0
        } else {
            times[n / 2]
        };
        Self {
            runs: n,
            mean_ms: times.iter().sum::<f64>() / n as f64,
            min_ms: times[0],
            max_ms: times[n - 1],
            median_ms: median,
        }
    }
}

impl std::fmt::Display for BenchmarkStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} runs: mean {:.3} ms, median {:.3} ms, min {:.3} ms, max {:.3} ms",
            self.runs, self.mean_ms, self.median_ms, self.min_ms, self.max_ms
        )
    }
}
