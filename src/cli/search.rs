//! Search command implementation

use anyhow::{bail, Result};
use colored::Colorize;

use crate::config::Config;
use crate::easyconfig::EasyConfig;
use crate::error::EcdepsError;
use crate::search::{EbSearcher, SearchDispatcher};

pub fn run(easyconfig: &EasyConfig, config: &Config, dry_run: bool) -> Result<()> {
    if dry_run {
        println!();
        println!("{}", "Dry run mode - searches will not be run".yellow());
    }

    let searcher = EbSearcher::new(config.search.clone()).dry_run(dry_run);
    let mut dispatcher = SearchDispatcher::new(searcher, config.search.name_only);

    if dispatcher.queries(easyconfig).is_empty() {
        println!();
        println!("  Nothing to search.");
        return Ok(());
    }

    let report = match dispatcher.dispatch(easyconfig) {
        Ok(report) => report,
        Err(EcdepsError::ExecutableNotFound(command)) => {
            eprintln!();
            eprintln!("{}", format!("Search executable '{}' not found.", command).red().bold());
            eprintln!();
            eprintln!("Load EasyBuild first, or point ecdeps at it:");
            eprintln!("  {}", "module load EasyBuild".cyan());
            eprintln!("  {}", "ecdeps --eb /path/to/eb -i <easyconfig>".cyan());
            eprintln!();
            bail!(EcdepsError::ExecutableNotFound(command));
        }
        Err(e) => return Err(e.into()),
    };

    println!();
    if report.all_success() {
        println!(
            "{} {} search(es) completed",
            "✓".green().bold(),
            report.total()
        );
    } else {
        println!(
            "{} {} of {} search(es) failed",
            "!".yellow().bold(),
            report.failed.len(),
            report.total()
        );
        for (query, reason) in &report.failed {
            println!("  {} {} - {}", "✗".red(), query.to_string().bold(), reason.red());
        }
    }

    Ok(())
}
