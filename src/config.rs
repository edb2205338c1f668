use crate::core::{get_config_dir, ThroughputModel};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub throughput: ThroughputConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ThroughputConfig {
    /// CPU hours to process 1 GB on `reference_parallelism` cores
    #[serde(default = "default_hours_per_gb")]
    pub hours_per_gb: f64,
    /// Cores the rate was measured on; also the ppn requested per node
    #[serde(default = "default_reference_parallelism")]
    pub reference_parallelism: u32,
    /// Target wall-clock hours per group
    #[serde(default = "default_target_walltime_hours")]
    pub target_walltime_hours: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct JobsConfig {
    /// Number of scheduler jobs to spread the groups over
    #[serde(default = "default_job_count")]
    pub count: usize,
    /// Requested walltime is the target multiplied by this buffer
    #[serde(default = "default_walltime_factor")]
    pub walltime_factor: f64,
    /// Mail events passed to `#PBS -m`
    #[serde(default = "default_mail_events")]
    pub mail_events: String,
    #[serde(default = "default_job_name_prefix")]
    pub job_name_prefix: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ProcessingConfig {
    #[serde(default = "default_program")]
    pub program: String,
    /// Environment modules loaded before the program runs
    #[serde(default = "default_modules")]
    pub modules: Vec<String>,
    /// Module providing GNU parallel for multi-node jobs
    #[serde(default = "default_parallel_module")]
    pub parallel_module: String,
    /// Profile parameter file (exclusive with flowcell and kit)
    #[serde(default)]
    pub config: Option<PathBuf>,
    #[serde(default)]
    pub flowcell: Option<String>,
    #[serde(default)]
    pub kit: Option<String>,
}

fn default_hours_per_gb() -> f64 {
    20.0
}

fn default_reference_parallelism() -> u32 {
    24
}

fn default_target_walltime_hours() -> f64 {
    48.0
}

fn default_job_count() -> usize {
    1
}

fn default_walltime_factor() -> f64 {
    2.0
}

fn default_mail_events() -> String {
    "abe".to_string()
}

fn default_job_name_prefix() -> String {
    "guppy".to_string()
}

fn default_program() -> String {
    "guppy_basecaller".to_string()
}

fn default_modules() -> Vec<String> {
    vec!["guppy".to_string()]
}

fn default_parallel_module() -> String {
    "parallel".to_string()
}

impl Default for ThroughputConfig {
    fn default() -> Self {
        Self {
            hours_per_gb: default_hours_per_gb(),
            reference_parallelism: default_reference_parallelism(),
            target_walltime_hours: default_target_walltime_hours(),
        }
    }
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            count: default_job_count(),
            walltime_factor: default_walltime_factor(),
            mail_events: default_mail_events(),
            job_name_prefix: default_job_name_prefix(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            modules: default_modules(),
            parallel_module: default_parallel_module(),
            config: None,
            flowcell: None,
            kit: None,
        }
    }
}

impl ThroughputConfig {
    pub fn model(&self) -> ThroughputModel {
        ThroughputModel {
            hours_per_gb: self.hours_per_gb,
            reference_parallelism: self.reference_parallelism,
            target_walltime_hours: self.target_walltime_hours,
        }
    }
}

/// Loads configuration from, in increasing precedence: the user config
/// directory's `gsplit.toml`, an explicit `config_path`, and `GSPLIT_*`
/// environment variables (`GSPLIT_THROUGHPUT__HOURS_PER_GB=30`).
pub fn load_config(config_path: Option<&PathBuf>) -> Result<Config, config::ConfigError> {
    let mut config_vec = vec![];

    // Default config file
    if let Ok(default_config_path) = get_config_dir().map(|d| d.join("gsplit.toml")) {
        if default_config_path.exists() {
            config_vec.push(default_config_path);
        }
    }

    // User-provided config file
    if let Some(config_path) = config_path {
        if config_path.exists() {
            config_vec.push(config_path.clone());
        } else {
            return Err(config::ConfigError::NotFound(format!(
                "Config file {config_path:?} does not exist",
            )));
        }
    }

    tracing::debug!(files = ?config_vec, "Loading configuration");

    let settings = config::Config::builder();
    let settings = config_vec.iter().fold(settings, |s, path| {
        s.add_source(config::File::from(path.as_path()))
    });

    settings
        .add_source(
            config::Environment::with_prefix("GSPLIT")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
