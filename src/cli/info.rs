//! EasyConfig summary

use colored::Colorize;

use crate::easyconfig::EasyConfig;

pub fn run(easyconfig: &EasyConfig) {
    println!("{}: {}", "EasyConfig".bold(), easyconfig.file_name().cyan());

    match &easyconfig.toolchain {
        Some(toolchain) => match toolchain.equivalent_version() {
            Some(equivalent) => println!(
                "{}: {} {}",
                "Toolchain".bold(),
                toolchain,
                format!("(~ {})", equivalent).dimmed()
            ),
            None => println!("{}: {}", "Toolchain".bold(), toolchain),
        },
        None => println!("{}: {}", "Toolchain".bold(), "(none)".dimmed()),
    }

    println!(
        "{}: {}",
        easyconfig.dep_type.key().bold(),
        easyconfig.dependencies.len()
    );
    for dep in &easyconfig.dependencies {
        if dep.version.is_empty() {
            println!("  {}", dep.name);
        } else {
            println!("  {} {}", dep.name, dep.full_version().dimmed());
        }
    }
}
