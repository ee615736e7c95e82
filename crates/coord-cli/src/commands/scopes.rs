//! Scopes command implementation

use colored::Colorize;
use coord_space::resolve_view;
use serde_json::json;

use crate::context::ConfigFile;
use crate::error::Result;

/// Run the scopes command
pub fn run_scopes(file: &ConfigFile, uid: &str, json: bool) -> Result<()> {
    let config = file.load()?;
    let view = config.require_view(uid)?;
    let effective = resolve_view(&config.coordination_space, view);

    if json {
        let output = json!({
            "view": uid,
            "coordinationScopes": effective.scopes.to_value(),
            "coordinationScopesBy": effective.scopes_by.to_value(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} {} ({})", "View".bold(), uid.cyan(), view.component.dimmed());
    println!();
    println!("{}:", "Scopes".bold());
    if effective.scopes.is_empty() {
        println!("  {}", "None".dimmed());
    }
    for (coordination_type, scope) in effective.scopes.iter() {
        println!("  {} -> {}", coordination_type, scope.to_value());
    }
    if !effective.scopes_by.is_empty() {
        println!();
        println!("{}:", "Scopes by instance".bold());
        for (by_type, coordination_type, by_scope, scope) in effective.scopes_by.entries() {
            println!(
                "  {}[{}].{} -> {}",
                by_type,
                by_scope.cyan(),
                coordination_type,
                scope.to_value()
            );
        }
    }
    Ok(())
}
