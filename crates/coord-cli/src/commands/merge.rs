//! Merge command implementation

use std::path::Path;

use colored::Colorize;
use coord_space::{Action, CoordinationSpace, reduce};

use crate::context::{ConfigFile, read_json};
use crate::error::Result;

/// Run the merge command
pub fn run_merge(
    file: &ConfigFile,
    uid: &str,
    fragment_path: &Path,
    scope_prefix: Option<String>,
    write: bool,
) -> Result<()> {
    let config = file.load()?;
    let fragment: CoordinationSpace = read_json(fragment_path)?;
    let fragment_types = fragment.types().count();

    let next = reduce(
        &config,
        Action::MergeCoordination {
            fragment,
            scope_prefix,
            view_uid: uid.to_string(),
        },
    )?;

    let added: usize = next
        .coordination_space
        .iter()
        .map(|(coordination_type, table)| {
            let before = config.coordination_space.scope_names(coordination_type);
            table.keys().filter(|scope| !before.contains(*scope)).count()
        })
        .sum();
    println!(
        "{} {} type(s) into {}: {} new scope(s)",
        "Merged".green().bold(),
        fragment_types,
        uid.cyan(),
        added
    );

    if write {
        file.save(&next)?;
        println!("{} {}", "Wrote".green(), file.path().display());
    } else {
        println!("{}", "Dry run: use --write to save".dimmed());
    }
    Ok(())
}
