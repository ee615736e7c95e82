//! Init command implementation

use std::path::Path;

use colored::Colorize;
use coord_builder::{ComponentRegistry, initialize};
use coord_space::resolve_view;

use crate::context::{ConfigFile, read_json};
use crate::error::Result;

/// Run the init command
pub fn run_init(file: &ConfigFile, registry_path: &Path, write: bool) -> Result<()> {
    let config = file.load()?;
    let registry: ComponentRegistry = read_json(registry_path)?;
    let next = initialize(&config, &registry)?;

    let mut changed = 0;
    for (before, after) in config.layout.iter().zip(&next.layout) {
        let old = resolve_view(&config.coordination_space, before).scopes;
        let new = resolve_view(&next.coordination_space, after).scopes;
        let added: Vec<&String> = new
            .iter()
            .map(|(coordination_type, _)| coordination_type)
            .filter(|coordination_type| !old.contains(coordination_type))
            .collect();
        if !added.is_empty() {
            changed += 1;
            let names: Vec<&str> = added.iter().map(|t| t.as_str()).collect();
            println!("  {} {}: {}", "+".green(), after.uid.cyan(), names.join(", "));
        }
    }

    if changed == 0 {
        println!("{} Every view already has its coordination types", "OK".green().bold());
        return Ok(());
    }
    println!("{} {} view(s)", "Initialized".green().bold(), changed);

    if write {
        file.save(&next)?;
        println!("{} {}", "Wrote".green(), file.path().display());
    } else {
        println!("{}", "Dry run: use --write to save".dimmed());
    }
    Ok(())
}
