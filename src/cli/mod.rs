//! Command-line interface for ecdeps

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{Config, SearchOverrides};
use crate::easyconfig::EasyConfig;
use crate::package::DependencyType;

mod info;
mod search;

const EXAMPLES: &str = "Example usage with EasyBuild:
  ecdeps -i GROMACS-2023.3-foss-2023a.eb
  ecdeps -i GROMACS-2023.3-foss-2023a.eb --builddependencies";

/// Find candidate EasyBuild modules for the dependencies of an EasyConfig
#[derive(Parser, Debug)]
#[command(name = "ecdeps", version, about, after_help = EXAMPLES)]
pub struct Cli {
    /// EasyConfig file path
    #[arg(short = 'i', long, value_name = "/path/to/easyconfig.eb")]
    pub input_file: PathBuf,

    /// Search for builddependencies instead of dependencies
    #[arg(short = 'b', long)]
    pub builddependencies: bool,

    /// Search by name only, without the version
    #[arg(long)]
    pub name_only: bool,

    /// Don't run the searches, just show the commands
    #[arg(long)]
    pub dry_run: bool,

    /// Print the parsed toolchain and dependencies as JSON and exit
    #[arg(long)]
    pub json: bool,

    /// Search executable
    #[arg(long, env = "ECDEPS_EB", value_name = "CMD")]
    pub eb: Option<String>,

    /// EasyConfig directories passed to the search as --robot-paths
    #[arg(long, env = "EASYBUILD_ROBOT_PATHS", value_delimiter = ':', value_name = "PATHS")]
    pub robot_paths: Vec<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn dep_type(&self) -> DependencyType {
        if self.builddependencies {
            DependencyType::Build
        } else {
            DependencyType::Runtime
        }
    }

    fn overrides(&self) -> SearchOverrides {
        SearchOverrides {
            command: self.eb.clone().filter(|c| !c.is_empty()),
            robot_paths: self
                .robot_paths
                .iter()
                .filter(|p| !p.as_os_str().is_empty())
                .cloned()
                .collect(),
            name_only: self.name_only,
        }
    }
}

/// Execute the command line
pub fn execute(cli: &Cli, config: Config) -> Result<()> {
    let config = config.with_overrides(cli.overrides());
    tracing::debug!("Search config: {:?}", config.search);

    let easyconfig = EasyConfig::from_file(&cli.input_file, cli.dep_type())?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&easyconfig)?);
        return Ok(());
    }

    info::run(&easyconfig);
    search::run(&easyconfig, &config, cli.dry_run)
}
