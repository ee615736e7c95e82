//! Resolve command implementation

use colored::Colorize;
use coord_space::ViewConfig;
use serde_json::{Value, json};

use crate::context::ConfigFile;
use crate::error::Result;

/// Granularity of a resolve request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveShape {
    Flat,
    ByType { by_type: String },
    L2 { primary: String, secondary: String },
}

impl ResolveShape {
    pub fn from_flags(by: Option<String>, secondary: Option<String>) -> Self {
        match (by, secondary) {
            (Some(primary), Some(secondary)) => ResolveShape::L2 { primary, secondary },
            (Some(by_type), None) => ResolveShape::ByType { by_type },
            _ => ResolveShape::Flat,
        }
    }

    /// Scope levels above the per-type values.
    fn nesting(&self) -> usize {
        match self {
            ResolveShape::Flat => 0,
            ResolveShape::ByType { .. } => 1,
            ResolveShape::L2 { .. } => 2,
        }
    }
}

/// Values and setter names for one request, as JSON.
pub fn resolve_json(config: &ViewConfig, uid: &str, types: &[&str], shape: &ResolveShape) -> Result<Value> {
    let output = match shape {
        ResolveShape::Flat => {
            let resolved = config.coordination(uid, types)?;
            json!({
                "values": resolved.values,
                "setters": resolved.setters.keys().collect::<Vec<_>>(),
            })
        }
        ResolveShape::ByType { by_type } => {
            let resolved = config.coordination_by_type(uid, by_type, types)?;
            let setters: serde_json::Map<String, Value> = resolved
                .setters
                .iter()
                .map(|(scope, setters)| (scope.clone(), json!(setters.keys().collect::<Vec<_>>())))
                .collect();
            json!({"values": resolved.values, "setters": setters})
        }
        ResolveShape::L2 { primary, secondary } => {
            let resolved = config.coordination_l2(uid, primary, secondary, types)?;
            let setters: serde_json::Map<String, Value> = resolved
                .setters
                .iter()
                .map(|(primary_scope, inner)| {
                    let inner: serde_json::Map<String, Value> = inner
                        .iter()
                        .map(|(scope, setters)| (scope.clone(), json!(setters.keys().collect::<Vec<_>>())))
                        .collect();
                    (primary_scope.clone(), Value::Object(inner))
                })
                .collect();
            json!({"values": resolved.values, "setters": setters})
        }
    };
    Ok(output)
}

/// Run the resolve command
pub fn run_resolve(file: &ConfigFile, uid: &str, types: &[String], shape: &ResolveShape, json: bool) -> Result<()> {
    let config = file.load()?;
    let types: Vec<&str> = types.iter().map(String::as_str).collect();
    let output = resolve_json(&config, uid, &types, shape)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{} {}", "Values for".bold(), uid.cyan());
    print_values(&output["values"], shape.nesting(), 1);
    Ok(())
}

/// Print `values` with `nesting` levels of scope headers above the types.
fn print_values(values: &Value, nesting: usize, indent: usize) {
    let pad = "  ".repeat(indent);
    let Some(map) = values.as_object().filter(|map| !map.is_empty()) else {
        println!("{pad}{}", "None".dimmed());
        return;
    };
    for (key, inner) in map {
        if nesting > 0 {
            println!("{pad}{}:", key.cyan());
            print_values(inner, nesting - 1, indent + 1);
        } else if inner.is_null() {
            println!("{pad}{}: {}", key, "unresolved".dimmed());
        } else {
            println!("{pad}{}: {}", key, inner);
        }
    }
}
