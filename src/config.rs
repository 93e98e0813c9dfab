use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

/// Simulation configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    pub init: InitConfig,
    pub output: OutputConfig,
}

/// Behavioral model parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Global AI adoption rate. Static over a run.
    pub ai_adoption_rate: f64,
}

/// Initial condition parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InitConfig {
    /// Number of healthcare workers in the population.
    pub num_agents: usize,

    /// RNG seed. Drawn from OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Output parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Number of simulation steps per run.
    pub n_steps: usize,
    /// Number of steps between progress log messages.
    pub steps_per_log: usize,
}

impl Config {
    /// Create a [`Config`] with the reference output settings.
    ///
    /// The returned configuration is not yet validated; validation happens
    /// when an engine is constructed from it (or via [`Config::validate`]).
    pub fn new(num_agents: usize, ai_adoption_rate: f64) -> Self {
        Self {
            model: ModelConfig { ai_adoption_rate },
            init: InitConfig {
                num_agents,
                seed: None,
            },
            output: OutputConfig {
                n_steps: 500,
                steps_per_log: 50,
            },
        }
    }

    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded and contain a serialized [`Config`].
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_num(self.init.num_agents, 1..=500).context("invalid number of agents")?;
        check_num(self.model.ai_adoption_rate, 0.0..=1.0).context("invalid AI adoption rate")?;

        check_num(self.output.n_steps, 1..100_000).context("invalid number of steps")?;
        check_num(self.output.steps_per_log, 1..=self.output.n_steps)
            .context("invalid number of steps per log message")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}
