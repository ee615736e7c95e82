//! Check command implementation

use colored::Colorize;
use coord_space::{DanglingReference, dangling_references};
use serde_json::json;

use crate::context::ConfigFile;
use crate::error::{CliError, Result};

/// Run the check command
///
/// Fails when any scope reference is dangling, after printing all of them.
pub fn run_check(file: &ConfigFile, json: bool) -> Result<()> {
    let config = file.load()?;
    let dangling = dangling_references(&config);

    if json {
        let output = json!({
            "path": file.path().display().to_string(),
            "views": config.layout.len(),
            "types": config.coordination_space.types().count(),
            "dangling": dangling.iter().map(DanglingReference::to_string).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!(
            "{} {} ({} views, {} coordination types)",
            "Checked".bold(),
            file.path().display(),
            config.layout.len(),
            config.coordination_space.types().count()
        );
        if dangling.is_empty() {
            println!("{} All scope references resolve", "OK".green().bold());
        } else {
            for reference in &dangling {
                println!("  {} {}", "x".red(), reference);
            }
        }
    }

    if dangling.is_empty() {
        Ok(())
    } else {
        Err(CliError::user(format!(
            "{} dangling scope reference(s)",
            dangling.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coord_test_utils::{fixtures, workspace::TestWorkspace};
    use serde_json::json;

    #[test]
    fn test_check_clean_config() {
        let ws = TestWorkspace::with_config(&fixtures::layered_spatial_json());
        assert!(run_check(&ConfigFile::new(ws.config_path()), false).is_ok());
    }

    #[test]
    fn test_check_reports_dangling() {
        let mut config = fixtures::two_sliders_json();
        config["layout"][1]["coordinationScopes"]["value"] = json!("Z");
        let ws = TestWorkspace::with_config(&config);

        let err = run_check(&ConfigFile::new(ws.config_path()), true).unwrap_err();
        assert_eq!(err.to_string(), "1 dangling scope reference(s)");
    }
}
