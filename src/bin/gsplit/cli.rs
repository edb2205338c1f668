use crate::help::COMPLETIONS_HELP;
use clap::{Args, Parser, ValueEnum};
use clap_complete::Shell as CompleteShell;
use gsplit::config::Config;
use gsplit::core::version;
use gsplit::utils::STYLES;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "gsplit",
    author,
    version = version(),
    about = "Splits a directory of files into size-balanced PBS jobs.",
    styles = STYLES
)]
pub struct GSplit {
    /// Sub Commands
    #[command(subcommand)]
    pub commands: Commands,

    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// gsplit settings file (TOML), layered over the default one
    #[arg(long, global = true, value_name = "PATH")]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub enum Commands {
    /// Show how the input would be split, without writing anything
    #[command(alias = "dry-run")]
    Plan(PlanArgs),
    /// Stage the groups and write PBS job files plus a submit script
    #[command(alias = "submit")]
    Prepare(PrepareArgs),
    /// Generate tab-completion scripts for your shell
    #[command(
        after_help = COMPLETIONS_HELP,
        arg_required_else_help = true
    )]
    Completions(CompletionsArgs),
}

/// Flags shared by every command that builds a plan.
#[derive(Debug, Args, Clone)]
pub struct SizingArgs {
    /// Directory containing the files to process
    #[arg(short, long)]
    pub input: PathBuf,

    /// Break the input into this many groups (default: derive from file sizes)
    #[arg(long, visible_alias = "nsets")]
    pub groups: Option<usize>,

    /// Spread the groups over this many PBS jobs (default: 1)
    #[arg(short, long, visible_alias = "njobs")]
    pub jobs: Option<usize>,

    /// Processors per node; also the core count the rate was measured on (default: 24)
    #[arg(long)]
    pub ppn: Option<u32>,

    /// CPU hours needed to process 1 GB on `ppn` cores (default: 20)
    #[arg(long)]
    pub pergb: Option<f64>,

    /// Target hours each group should run; jobs request a buffer on top (default: 48)
    #[arg(long)]
    pub walltime: Option<f64>,
}

impl SizingArgs {
    /// Folds command-line overrides into the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ppn) = self.ppn {
            config.throughput.reference_parallelism = ppn;
        }
        if let Some(pergb) = self.pergb {
            config.throughput.hours_per_gb = pergb;
        }
        if let Some(walltime) = self.walltime {
            config.throughput.target_walltime_hours = walltime;
        }
        if let Some(jobs) = self.jobs {
            config.jobs.count = jobs;
        }
    }
}

#[derive(Debug, Parser, Clone)]
pub struct PlanArgs {
    #[command(flatten)]
    pub sizing: SizingArgs,

    /// Print the full plan as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser, Clone)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub sizing: SizingArgs,

    /// Directory the processing program writes its output to
    #[arg(short, long)]
    pub save: PathBuf,

    /// Directory for subset links, job files and the submit script
    #[arg(long)]
    pub stage: PathBuf,

    /// Parameter file passed to the processing program
    #[arg(long, visible_alias = "config", conflicts_with_all = ["flowcell", "kit"])]
    pub profile_config: Option<PathBuf>,

    /// Flowcell version (requires --kit)
    #[arg(long)]
    pub flowcell: Option<String>,

    /// Sequencing kit version (requires --flowcell)
    #[arg(long)]
    pub kit: Option<String>,
}

impl PrepareArgs {
    /// Whether any profile option was given on the command line.
    pub fn has_profile_override(&self) -> bool {
        self.profile_config.is_some() || self.flowcell.is_some() || self.kit.is_some()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
    Elvish,
}

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// The shell to generate the completions for
    pub shell: Shell,
}

impl From<Shell> for CompleteShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompleteShell::Bash,
            Shell::Elvish => CompleteShell::Elvish,
            Shell::Fish => CompleteShell::Fish,
            Shell::Powershell => CompleteShell::PowerShell,
            Shell::Zsh => CompleteShell::Zsh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        GSplit::command().debug_assert();
    }

    #[test]
    fn parses_legacy_flag_names() {
        let args = GSplit::try_parse_from([
            "gsplit", "plan", "--input", "/data", "--nsets", "6", "--njobs", "2", "--pergb", "30",
        ])
        .unwrap();
        let Commands::Plan(plan) = args.commands else {
            panic!("expected plan command");
        };
        assert_eq!(plan.sizing.groups, Some(6));
        assert_eq!(plan.sizing.jobs, Some(2));

        let mut config = Config::default();
        plan.sizing.apply(&mut config);
        assert_eq!(config.jobs.count, 2);
        assert_eq!(config.throughput.hours_per_gb, 30.0);
        assert_eq!(config.throughput.reference_parallelism, 24);
    }

    #[test]
    fn rejects_profile_config_with_flowcell() {
        let result = GSplit::try_parse_from([
            "gsplit",
            "prepare",
            "--input",
            "/data",
            "--save",
            "/out",
            "--stage",
            "/stage",
            "--profile-config",
            "x.cfg",
            "--flowcell",
            "FLO-MIN106",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn separates_settings_file_from_profile_config() {
        let args = GSplit::try_parse_from([
            "gsplit",
            "prepare",
            "--config-file",
            "gsplit.toml",
            "--input",
            "/data",
            "--save",
            "/out",
            "--stage",
            "/stage",
            "--config",
            "dna_r9.4.1_450bps_hac.cfg",
        ])
        .unwrap();
        assert_eq!(args.config_file, Some(PathBuf::from("gsplit.toml")));
        let Commands::Prepare(prepare) = args.commands else {
            panic!("expected prepare command");
        };
        assert_eq!(
            prepare.profile_config,
            Some(PathBuf::from("dna_r9.4.1_450bps_hac.cfg"))
        );
    }
}
