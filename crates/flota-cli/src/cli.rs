//! Command-line interface parsing for the flota client.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flota_core::{Filters, Record, ResourceKind};
use serde_json::Value;

/// Flota - query and edit the fleet database from the terminal
#[derive(Parser, Debug)]
#[command(name = "flota")]
#[command(about = "Fleet console data client")]
#[command(version)]
pub struct Cli {
    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List records of a resource
    ///
    /// Examples:
    ///   flota list vehicles --search ABC
    ///   flota list models --filter marca_id=4
    ///   flota list tasks --filter estado=pendiente --limit 20
    List {
        resource: ResourceKind,
        /// Free-text search over the resource's searchable columns
        #[arg(long, short)]
        search: Option<String>,
        /// Maximum number of records
        #[arg(long, short)]
        limit: Option<u32>,
        /// Equality filter, repeatable
        #[arg(long = "filter", short = 'f', value_name = "KEY=VALUE", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
        /// One line per record instead of JSON
        #[arg(long)]
        brief: bool,
    },
    /// Fetch one record by id
    Get { resource: ResourceKind, id: i64 },
    /// Create a record from a JSON object
    Create {
        resource: ResourceKind,
        #[arg(value_parser = parse_record)]
        record: Record,
    },
    /// Apply a partial update from a JSON object
    Update {
        resource: ResourceKind,
        id: i64,
        #[arg(value_parser = parse_record)]
        changes: Record,
    },
    /// Delete a record by id
    Delete { resource: ResourceKind, id: i64 },
    /// Dashboard counters
    Stats,
}

/// Build the layer's filter set from the `list` arguments.
pub fn build_filters(search: Option<&str>, limit: Option<u32>, pairs: &[(String, String)]) -> Filters {
    let mut filters = Filters::new();
    if let Some(term) = search {
        filters = filters.search(term);
    }
    if let Some(n) = limit {
        filters = filters.limit(n);
    }
    for (key, value) in pairs {
        filters = filters.eq(key, value);
    }
    filters
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("filter '{}' has an empty key", s));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn parse_record(s: &str) -> Result<Record, String> {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(_) => Err("expected a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {}", e)),
    }
}
