use crate::config::Config;
use crate::model::MetricsRow;
use crate::stats::Accumulator;
use anyhow::{Context, Result};
use rmp_serde::decode;
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// Observable computed over a stream of metric rows.
pub trait Obs {
    fn update(&mut self, row: &MetricsRow);
    fn report(&self) -> serde_json::Value;
}

/// Summary statistics of a single reporter over the whole run.
pub struct MetricSummary {
    name: &'static str,
    extract: fn(&MetricsRow) -> f64,
    acc: Accumulator,
}

impl MetricSummary {
    pub fn new(name: &'static str, extract: fn(&MetricsRow) -> f64) -> Self {
        Self {
            name,
            extract,
            acc: Accumulator::new(),
        }
    }
}

impl Obs for MetricSummary {
    fn update(&mut self, row: &MetricsRow) {
        self.acc.add((self.extract)(row));
    }

    fn report(&self) -> serde_json::Value {
        serde_json::json!({ self.name: self.acc.report() })
    }
}

/// First steps at which the population reaches half and full adoption.
pub struct AdoptionMilestones {
    step: usize,
    half_adoption_step: Option<usize>,
    full_adoption_step: Option<usize>,
}

impl AdoptionMilestones {
    pub fn new() -> Self {
        Self {
            step: 0,
            half_adoption_step: None,
            full_adoption_step: None,
        }
    }
}

impl Obs for AdoptionMilestones {
    fn update(&mut self, row: &MetricsRow) {
        if self.half_adoption_step.is_none() && row.ai_adoption_rate >= 0.5 {
            self.half_adoption_step = Some(self.step);
        }
        if self.full_adoption_step.is_none() && row.ai_adoption_rate >= 1.0 {
            self.full_adoption_step = Some(self.step);
        }
        self.step += 1;
    }

    fn report(&self) -> serde_json::Value {
        serde_json::json!({
            "adoption_milestones": {
                "half_adoption_step": self.half_adoption_step,
                "full_adoption_step": self.full_adoption_step,
            }
        })
    }
}

/// Highest average stress level observed and the step it occurred at.
pub struct PeakStress {
    step: usize,
    peak: f64,
    peak_step: usize,
}

impl PeakStress {
    pub fn new() -> Self {
        Self {
            step: 0,
            peak: f64::NEG_INFINITY,
            peak_step: 0,
        }
    }
}

impl Obs for PeakStress {
    fn update(&mut self, row: &MetricsRow) {
        if row.avg_stress_level > self.peak {
            self.peak = row.avg_stress_level;
            self.peak_step = self.step;
        }
        self.step += 1;
    }

    fn report(&self) -> serde_json::Value {
        serde_json::json!({
            "peak_stress": { "value": self.peak, "step": self.peak_step }
        })
    }
}

pub struct Analyzer {
    cfg: Config,
    obs_ptr_vec: Vec<Box<dyn Obs>>,
}

impl Analyzer {
    pub fn new(cfg: Config) -> Self {
        let mut obs_ptr_vec: Vec<Box<dyn Obs>> = Vec::new();
        obs_ptr_vec.push(Box::new(MetricSummary::new("ai_adoption_rate", |row| {
            row.ai_adoption_rate
        })));
        obs_ptr_vec.push(Box::new(MetricSummary::new("avg_skill_level", |row| {
            row.avg_skill_level
        })));
        obs_ptr_vec.push(Box::new(MetricSummary::new("avg_efficiency", |row| {
            row.avg_efficiency
        })));
        obs_ptr_vec.push(Box::new(MetricSummary::new("avg_stress_level", |row| {
            row.avg_stress_level
        })));
        obs_ptr_vec.push(Box::new(MetricSummary::new("avg_job_satisfaction", |row| {
            row.avg_job_satisfaction
        })));
        obs_ptr_vec.push(Box::new(AdoptionMilestones::new()));
        obs_ptr_vec.push(Box::new(PeakStress::new()));
        Self { cfg, obs_ptr_vec }
    }

    /// Fold one run's saved metric history through every observable.
    pub fn add_file<P: AsRef<Path>>(&mut self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
        let mut reader = BufReader::new(file);

        for _ in 0..self.cfg.output.n_steps {
            let row = decode::from_read(&mut reader).context("failed to read metric row")?;
            for obs in &mut self.obs_ptr_vec {
                obs.update(&row);
            }
        }
        Ok(())
    }

    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let writer = BufWriter::new(file);

        let reports: Vec<_> = self.obs_ptr_vec.iter().map(|obs| obs.report()).collect();
        serde_json::to_writer_pretty(writer, &reports)?;
        Ok(())
    }
}
