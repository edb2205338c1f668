use super::error::PlanError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the processing program is told what chemistry it is looking at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingProfile {
    /// A single parameter file
    ConfigFile(PathBuf),
    /// A flowcell and kit pair
    FlowcellKit { flowcell: String, kit: String },
}

impl ProcessingProfile {
    /// Picks the profile from user input, requiring either a config file or
    /// both a flowcell and a kit, never both forms at once.
    pub fn resolve(
        config: Option<PathBuf>,
        flowcell: Option<String>,
        kit: Option<String>,
    ) -> Result<Self, PlanError> {
        match (config, flowcell, kit) {
            (Some(config), None, None) => Ok(Self::ConfigFile(config)),
            (None, Some(flowcell), Some(kit)) => Ok(Self::FlowcellKit { flowcell, kit }),
            (Some(_), _, _) => Err(PlanError::ConfigurationConflict(
                "specify either a profile config file or --flowcell and --kit, not both"
                    .to_string(),
            )),
            (None, _, _) => Err(PlanError::ConfigurationConflict(
                "specify --flowcell and --kit together, or a profile config file".to_string(),
            )),
        }
    }

    /// Arguments appended to every processing command.
    pub fn command_args(&self) -> Vec<String> {
        match self {
            Self::ConfigFile(path) => vec!["--config".to_string(), path.display().to_string()],
            Self::FlowcellKit { flowcell, kit } => vec![
                "--flowcell".to_string(),
                flowcell.clone(),
                "--kit".to_string(),
                kit.clone(),
            ],
        }
    }
}
