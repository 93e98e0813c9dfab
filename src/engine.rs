use crate::config::Config;
use crate::model::{MetricsRow, State, Worker};
use anyhow::{Context, Result};
use rand::prelude::*;
use rand_chacha::ChaCha12Rng;
use rand_distr::Uniform;
use rmp_serde::encode;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Simulation engine.
///
/// Holds the configuration, current population state, random number
/// generator, and the accumulated history of aggregate metric rows,
/// and provides methods to initialize, step, and run simulations.
pub struct Engine {
    cfg: Config,
    state: State,
    rng: ChaCha12Rng,
    history: Vec<MetricsRow>,
}

impl Engine {
    /// Create a new `Engine` with the given configuration and a fully
    /// initialized random population.
    ///
    /// # Errors
    /// Fails fast on an invalid configuration; no workers are created.
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.validate().context("failed to validate config")?;

        let mut rng = match cfg.init.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::try_from_os_rng()?,
        };

        let num_agents = cfg.init.num_agents;
        let rate = cfg.model.ai_adoption_rate;

        // Identical for every worker in a given run.
        let training_delay_base = (10.0 * rate * num_agents as f64 / 100.0) as i32;

        let exp_dist = Uniform::new_inclusive(1u32, 20)?;
        let mut workers = Vec::with_capacity(num_agents);
        for id in 0..num_agents {
            let experience_years = exp_dist.sample(&mut rng);
            let mut worker = Worker::new(id, experience_years, num_agents, rate, &mut rng)
                .context("failed to create worker")?;
            worker.set_training_delay(training_delay_base);
            workers.push(worker);
        }

        let state = State { workers };

        Ok(Self {
            cfg,
            state,
            rng,
            history: Vec::new(),
        })
    }

    /// Advance the simulation by one time unit.
    ///
    /// Records the aggregate metric row over the pre-step population state,
    /// then steps every worker exactly once in a fresh uniform random
    /// permutation of the population. The model-level adoption rate is
    /// static; workers read it but never write it.
    pub fn step(&mut self) {
        self.history.push(MetricsRow::collect(&self.state.workers));

        let mut order: Vec<usize> = (0..self.state.workers.len()).collect();
        order.shuffle(&mut self.rng);

        let rate = self.cfg.model.ai_adoption_rate;
        for i_worker in order {
            self.state.workers[i_worker].step(rate, &mut self.rng);
        }
    }

    /// Run the configured number of steps and save the metric history to a
    /// binary file, one MessagePack frame per row.
    pub fn perform_simulation<P: AsRef<Path>>(&mut self, file: P) -> Result<()> {
        let n_steps = self.cfg.output.n_steps;
        for i_step in 0..n_steps {
            self.step();

            if (i_step + 1) % self.cfg.output.steps_per_log == 0 {
                let progress = 100.0 * (i_step + 1) as f64 / n_steps as f64;
                log::info!("completed {progress:06.2}%");
            }
        }

        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);

        for row in &self.history {
            encode::write(&mut writer, row).context("failed to serialize metric row")?;
        }

        writer.flush().context("failed to flush writer stream")?;

        Ok(())
    }

    pub fn cfg(&self) -> &Config {
        &self.cfg
    }

    /// Current population state, aggregated reporters aside.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Metric rows recorded so far, one per completed [`Engine::step`] call,
    /// in call order starting at step 0.
    pub fn history(&self) -> &[MetricsRow] {
        &self.history
    }
}
