//! Simulation data types: the worker agent, the population state, and the
//! aggregate metric row collected once per step.

use anyhow::Result;
use rand::prelude::*;
use rand_distr::Uniform;
use serde::{Deserialize, Serialize};

/// One simulated healthcare worker.
///
/// All behavioral state lives here; the shared environment (population size
/// and global AI adoption rate) is read-only from the worker's perspective
/// and is passed in by the engine at construction and at each step.
#[derive(Clone, Serialize, Deserialize)]
pub struct Worker {
    id: usize,

    tech_savviness: f64,
    experience_years: u32,
    resistance_to_change: f64,
    ai_efficacy: f64,

    skill_level: f64,
    efficiency: f64,
    stress_level: f64,
    job_satisfaction: f64,

    using_ai: bool,

    /// Construction-time copy of the global adoption rate. The adopter-branch
    /// bonus reads this copy, while the non-adopter branch reads the live
    /// model rate; the reference model never updates the live rate, so the
    /// two values coincide. Kept separate on purpose.
    initial_ai_adoption_rate: f64,

    /// Countdown until an adopter receives the full productivity benefits.
    /// Goes negative for workers that never adopt.
    training_delay: i32,
}

impl Worker {
    /// Create a worker with randomized initial state.
    ///
    /// `experience_years` is the raw draw in `[1, 20]`; the stored value is
    /// shifted by the population-size scaling factor. `training_delay` is
    /// left at zero for the engine to set after construction.
    pub fn new<R: Rng>(
        id: usize,
        experience_years: u32,
        num_agents: usize,
        ai_adoption_rate: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let scaling_factor = num_agents as f64 / 200.0;

        let tech_dist = Uniform::new(0.5 * scaling_factor, 1.5 * scaling_factor)?;
        let tech_savviness = tech_dist.sample(rng);

        let experience_years = experience_years + (5.0 * scaling_factor) as u32;
        let skill_level = (experience_years as f64 / 25.0).min(1.0);

        let stress_level = 0.5 + ai_adoption_rate * (0.5 - tech_savviness) * scaling_factor;
        let job_satisfaction = 0.50 - ai_adoption_rate * (0.25 * tech_savviness) * scaling_factor;

        let res_dist = Uniform::new(0.1, 0.5)?;
        let resistance_to_change = res_dist.sample(rng);

        Ok(Self {
            id,
            tech_savviness,
            experience_years,
            resistance_to_change,
            ai_efficacy: 1.0,
            skill_level,
            efficiency: 0.5,
            stress_level,
            job_satisfaction,
            using_ai: false,
            initial_ai_adoption_rate: ai_adoption_rate,
            training_delay: 0,
        })
    }

    pub fn set_training_delay(&mut self, training_delay: i32) {
        self.training_delay = training_delay;
    }

    /// Advance this worker by one time step.
    ///
    /// `ai_adoption_rate` is the model-level rate, read but never written.
    pub fn step<R: Rng>(&mut self, ai_adoption_rate: f64, rng: &mut R) {
        if !self.using_ai {
            // One-shot irreversible Bernoulli trial, retried every step.
            let adoption_chance =
                self.tech_savviness * ai_adoption_rate * (1.0 - self.resistance_to_change);
            self.using_ai = rng.random::<f64>() < adoption_chance;
        }

        if self.using_ai && self.training_delay <= 0 {
            let bonus = self.initial_ai_adoption_rate / 10.0;
            self.skill_level =
                (self.skill_level + 0.02 * self.ai_efficacy * (1.0 - self.skill_level) + bonus)
                    .min(1.0);
            self.efficiency =
                (self.efficiency + 0.005 * self.ai_efficacy * (1.0 - self.efficiency) + bonus)
                    .min(1.0);
            // Ceiling of 0.1 reproduces the reference model as published.
            self.stress_level = ((self.stress_level - 0.005).max(0.1) + bonus).min(0.1);
            self.job_satisfaction =
                (self.job_satisfaction + 0.01 * (1.0 - self.job_satisfaction) + bonus).min(1.0);
        } else {
            self.training_delay -= 1;
            self.stress_level = (self.stress_level + 0.005 + ai_adoption_rate * 0.5).min(1.0);
            self.job_satisfaction =
                (self.job_satisfaction - 0.02 - ai_adoption_rate * 0.75).max(0.1);
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn using_ai(&self) -> bool {
        self.using_ai
    }

    pub fn skill_level(&self) -> f64 {
        self.skill_level
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    pub fn stress_level(&self) -> f64 {
        self.stress_level
    }

    pub fn job_satisfaction(&self) -> f64 {
        self.job_satisfaction
    }
}

/// State of the simulation at a given step.
#[derive(Clone, Serialize, Deserialize)]
pub struct State {
    /// All workers in the population. Exclusively owned by the engine.
    pub workers: Vec<Worker>,
}

/// Aggregate reporter values over the full population at one point in time.
///
/// Serialized field names match the reporter names exposed to drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    #[serde(rename = "AI Adoption Rate")]
    pub ai_adoption_rate: f64,

    #[serde(rename = "Workforce Average Skill Level")]
    pub avg_skill_level: f64,

    #[serde(rename = "Workplace Average Efficiency")]
    pub avg_efficiency: f64,

    #[serde(rename = "Workforce Average Stress Level")]
    pub avg_stress_level: f64,

    #[serde(rename = "Average Job Satisfaction")]
    pub avg_job_satisfaction: f64,
}

impl MetricsRow {
    /// Compute all reporters over the live population.
    ///
    /// The population is never empty for a validated configuration.
    pub fn collect(workers: &[Worker]) -> Self {
        let n = workers.len() as f64;

        let mut adopters = 0.0;
        let mut skill_sum = 0.0;
        let mut efficiency_sum = 0.0;
        let mut stress_sum = 0.0;
        let mut satisfaction_sum = 0.0;

        for worker in workers {
            if worker.using_ai {
                adopters += 1.0;
            }
            skill_sum += worker.skill_level;
            efficiency_sum += worker.efficiency;
            stress_sum += worker.stress_level;
            satisfaction_sum += worker.job_satisfaction;
        }

        Self {
            ai_adoption_rate: adopters / n,
            avg_skill_level: skill_sum / n,
            avg_efficiency: efficiency_sum / n,
            avg_stress_level: stress_sum / n,
            avg_job_satisfaction: satisfaction_sum / n,
        }
    }
}
