//! Per-stage wall clock accounting for a sequencer run.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::info;

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
    pub calls: usize,
}

/// Accumulates durations per stage name, keeping first-seen order.
#[derive(Debug, Default, Clone)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
    step_map: HashMap<String, usize>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: impl Into<String>, duration: Duration) {
        let name = name.into();
        match self.step_map.get(&name) {
            Some(&slot) => {
                let step = &mut self.steps[slot];
                step.duration += duration;
                step.calls += 1;
            }
            None => {
                self.step_map.insert(name.clone(), self.steps.len());
                self.steps.push(StepTiming {
                    name,
                    duration,
                    calls: 1,
                });
            }
        }
    }

    /// Runs `f`, charging its elapsed time to `name`.
    pub fn measure<T>(&mut self, name: &str, f: impl FnOnce() -> T) -> T {
        let timer = Timer::start(name);
        let out = f();
        let (name, duration) = timer.stop();
        self.add_step(name, duration);
        out
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.step_map.get(name).map(|&slot| self.steps[slot].duration)
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn log_summary(&self) {
        let total = self.total_duration();
        for step in &self.steps {
            let percentage = if total.as_secs_f64() > 0.0 {
                (step.duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            info!(
                step = %step.name,
                calls = step.calls,
                ms = format!("{:.3}", step.duration.as_secs_f64() * 1000.0),
                share = format!("{percentage:.1}%"),
                "stage timing"
            );
        }
        info!(
            ms = format!("{:.3}", total.as_secs_f64() * 1000.0),
            "total pipeline time"
        );
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    pub fn stop(self) -> (String, Duration) {
        (self.name, self.start.elapsed())
    }
}
