//! Set command implementation

use colored::Colorize;
use coord_space::{Action, CoordinationStore, ScopeRef, ViewConfig, parameter_scope_by, resolve_view};
use serde_json::Value;

use crate::context::ConfigFile;
use crate::error::Result;

/// Parse a command-line value as JSON, falling back to a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Apply one value change through the store and return the new config.
pub fn apply_set(
    config: ViewConfig,
    uid: &str,
    coordination_type: &str,
    value: Value,
    by: Option<(String, String)>,
) -> Result<ViewConfig> {
    let store = CoordinationStore::new(config);
    store.subscribe(|state| {
        tracing::debug!(types = state.coordination_space.types().count(), "Coordination state replaced");
    });
    store.dispatch(Action::SetCoordinationValue {
        view_uid: uid.to_string(),
        coordination_type: coordination_type.to_string(),
        value,
        by,
    })?;
    Ok(store.get_state())
}

/// Run the set command
pub fn run_set(
    file: &ConfigFile,
    uid: &str,
    coordination_type: &str,
    raw_value: &str,
    by: Option<(String, String)>,
    write: bool,
) -> Result<()> {
    let config = file.load()?;
    let value = parse_value(raw_value);
    let before = read_value(&config, uid, coordination_type, by.as_ref())?;
    let next = apply_set(config, uid, coordination_type, value.clone(), by.clone())?;

    let target = match &by {
        Some((by_type, by_scope)) => format!("{}[{}].{}", by_type, by_scope, coordination_type),
        None => coordination_type.to_string(),
    };
    println!(
        "{} {} {}: {} -> {}",
        "Set".green().bold(),
        uid.cyan(),
        target,
        before.map(|v| v.to_string()).unwrap_or_else(|| "unresolved".to_string()),
        value
    );

    if write {
        file.save(&next)?;
        println!("{} {}", "Wrote".green(), file.path().display());
    } else {
        println!("{}", "Dry run: use --write to save".dimmed());
    }
    Ok(())
}

/// The value the view currently sees at the target, if resolvable.
fn read_value(
    config: &ViewConfig,
    uid: &str,
    coordination_type: &str,
    by: Option<&(String, String)>,
) -> Result<Option<Value>> {
    let view = config.require_view(uid)?;
    match by {
        None => Ok(config
            .coordination(uid, &[coordination_type])?
            .values
            .remove(coordination_type)
            .flatten()),
        Some((by_type, by_scope)) => {
            let effective = resolve_view(&config.coordination_space, view);
            let scope = parameter_scope_by(&effective.scopes, &effective.scopes_by, by_type, by_scope, coordination_type);
            Ok(match scope {
                Some(ScopeRef::One(scope)) => config.coordination_space.value(coordination_type, scope).cloned(),
                _ => None,
            })
        }
    }
}
