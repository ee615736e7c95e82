//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Coordination config tool - inspect, resolve and edit coordinated view configs
#[derive(Parser, Debug)]
#[command(name = "coord")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// View config file to operate on
    #[arg(short, long, global = true, env = "COORD_CONFIG", default_value = "config.json")]
    pub config: PathBuf,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Parse the config and report scope references missing from the space
    Check {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show a view's effective scope mappings after meta resolution
    Scopes {
        /// View uid
        view: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Resolve coordination values for a view
    ///
    /// Examples:
    ///   coord resolve v1 spatialZoom spatialTargetX
    ///   coord resolve v1 spatialLayerOpacity --by spatialImageLayer
    ///   coord resolve v1 spatialTargetC --by spatialImageLayer --secondary spatialImageChannel
    Resolve {
        /// View uid
        view: String,

        /// Coordination types to resolve
        #[arg(required = true)]
        types: Vec<String>,

        /// Resolve once per scope of this type
        #[arg(long)]
        by: Option<String>,

        /// With --by, resolve once per scope of this type within each scope of --by
        #[arg(long, requires = "by")]
        secondary: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Set the value a view sees for a coordination type
    Set {
        /// View uid
        view: String,

        /// Coordination type
        coordination_type: String,

        /// New value, as JSON (bare words are taken as strings)
        value: String,

        /// Target the scope used within one instance of this type
        #[arg(long, requires = "by_scope")]
        by_type: Option<String>,

        /// Instance (scope of --by-type) to target
        #[arg(long, requires = "by_type")]
        by_scope: Option<String>,

        /// Save the result back to the config file
        #[arg(long)]
        write: bool,
    },

    /// Merge a coordination fragment into the config on behalf of a view
    Merge {
        /// View uid
        view: String,

        /// JSON file holding a coordination space fragment
        fragment: PathBuf,

        /// Only meta scopes starting with this prefix are attached to the view
        #[arg(long)]
        scope_prefix: Option<String>,

        /// Save the result back to the config file
        #[arg(long)]
        write: bool,
    },

    /// Give every view a scope for each coordination type its component uses
    Init {
        /// JSON file holding a component registry
        registry: PathBuf,

        /// Save the result back to the config file
        #[arg(long)]
        write: bool,
    },
}
