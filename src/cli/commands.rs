//! CLI command implementations
//!
//! Every command follows the same sequence:
//!
//! 1. Load configuration (or defaults) and apply the log level
//! 2. Read one JSON request from stdin
//! 3. Resolve the column model (inline `columns`, else `columns_path`)
//! 4. Build a session from the request's selection, rules, sort and aggregates
//! 5. Answer with an `ok` or `error` envelope on stdout
//!
//! Request content problems become error envelopes. Configuration, column
//! definition and I/O problems abort the command.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::columns::{Column, ColumnLoader, ColumnModel};
use crate::config::EngineConfig;
use crate::export::{ExportError, TableExport};
use crate::filter::RuleSpec;
use crate::observability::MetricsSnapshot;
use crate::record::{from_value, Record};
use crate::session::{SessionError, TableSession};
use crate::sort::SortKey;
use crate::stats::AggregateKind;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response, write_text};

/// Request body shared by every table command
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableRequest {
    /// Inline column definitions; override `columns_path`
    #[serde(default)]
    pub columns: Option<Vec<Column>>,
    /// Record snapshot, one JSON object per row
    #[serde(default)]
    pub records: Vec<Value>,
    /// Directly selected column ids; every column when omitted
    #[serde(default)]
    pub selection: Option<Vec<String>>,
    /// Filter rules
    #[serde(default)]
    pub rules: Vec<RuleSpec>,
    /// Sort keys, primary first
    #[serde(default)]
    pub sort: Vec<SortKey>,
    /// Footer aggregate per column id
    #[serde(default)]
    pub aggregates: BTreeMap<String, AggregateKind>,
}

/// A problem with the request's content, answered with an error envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    pub code: &'static str,
    pub message: String,
}

impl RequestError {
    fn invalid(message: impl Into<String>) -> Self {
        Self {
            code: "TABLEDECK_INVALID_REQUEST",
            message: message.into(),
        }
    }
}

impl From<SessionError> for RequestError {
    fn from(e: SessionError) -> Self {
        Self {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

impl From<ExportError> for RequestError {
    fn from(e: ExportError) -> Self {
        Self {
            code: e.code(),
            message: e.to_string(),
        }
    }
}

/// Result type for request handling
pub type RequestResult<T> = Result<T, RequestError>;

/// Parse arguments and run the chosen command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Query { config } => query(config.as_deref()),
        Command::Describe { config, column } => describe(config.as_deref(), &column),
        Command::Compute {
            config,
            column,
            aggregate,
        } => compute(config.as_deref(), &column, &aggregate),
        Command::Export {
            config,
            no_footer,
            delimiter,
        } => export(config.as_deref(), !no_footer, delimiter),
        Command::Columns { config } => columns(config.as_deref()),
    }
}

/// Filter and sort records, printing the table view
pub fn query(config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let (request, model) = read_table_request(&config)?;

    respond(request.and_then(|request| query_response(&config, &model, &request)))
}

/// Describe one column over the filtered records
pub fn describe(config_path: Option<&Path>, column: &str) -> CliResult<()> {
    let config = load_config(config_path)?;
    let (request, model) = read_table_request(&config)?;

    respond(request.and_then(|request| describe_response(&config, &model, &request, column)))
}

/// Compute one aggregate of one column
pub fn compute(config_path: Option<&Path>, column: &str, aggregate: &str) -> CliResult<()> {
    let config = load_config(config_path)?;
    let (request, model) = read_table_request(&config)?;

    respond(request.and_then(|request| {
        let kind = aggregate.parse::<AggregateKind>().map_err(|message| RequestError {
            code: "TABLEDECK_UNKNOWN_AGGREGATE",
            message,
        })?;
        compute_response(&config, &model, &request, column, kind)
    }))
}

/// Export the table view as delimited text
pub fn export(
    config_path: Option<&Path>,
    include_footer: bool,
    delimiter: Option<char>,
) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(delimiter) = delimiter {
        config.export_delimiter = delimiter;
        config.validate()?;
    }
    let (request, model) = read_table_request(&config)?;

    match request.and_then(|request| export_text(&config, &model, &request, include_footer)) {
        Ok(text) => write_text(&text),
        Err(e) => write_error(e.code, &e.message),
    }
}

/// List column definitions grouped by category
pub fn columns(config_path: Option<&Path>) -> CliResult<()> {
    let config = load_config(config_path)?;
    let model = load_model(&config, None)?;
    write_response(columns_response(&model))
}

fn respond(result: RequestResult<Value>) -> CliResult<()> {
    match result {
        Ok(data) => write_response(data),
        Err(e) => write_error(e.code, &e.message),
    }
}

/// Loads configuration, or defaults when no path is given, and applies it
pub fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    config.apply();
    Ok(config)
}

/// Resolves the column model from inline definitions or the configured file
pub fn load_model(config: &EngineConfig, inline: Option<Vec<Column>>) -> CliResult<ColumnModel> {
    if let Some(columns) = inline {
        return Ok(ColumnModel::new(columns)?);
    }

    match &config.columns_path {
        Some(path) => Ok(ColumnLoader::load_file(path)?),
        None => Err(CliError::columns_error(
            "No column definitions: pass 'columns' in the request or set columns_path",
        )),
    }
}

fn read_table_request(
    config: &EngineConfig,
) -> CliResult<(RequestResult<TableRequest>, ColumnModel)> {
    let raw = read_request()?;
    match parse_request(raw) {
        Ok(mut request) => {
            let model = load_model(config, request.columns.take())?;
            Ok((Ok(request), model))
        }
        Err(e) => Ok((Err(e), ColumnModel::default())),
    }
}

/// Parses a request body
pub fn parse_request(raw: Value) -> RequestResult<TableRequest> {
    serde_json::from_value(raw).map_err(|e| RequestError::invalid(e.to_string()))
}

fn request_records(request: &TableRequest) -> RequestResult<Vec<Record>> {
    request
        .records
        .iter()
        .enumerate()
        .map(|(index, value)| {
            from_value(value.clone()).ok_or_else(|| {
                RequestError::invalid(format!("Record {} is not a JSON object", index))
            })
        })
        .collect()
}

/// Builds a session from a request
pub fn build_session<'c>(
    config: &EngineConfig,
    model: &'c ColumnModel,
    request: &TableRequest,
) -> RequestResult<TableSession<'c>> {
    let mut session = TableSession::with_config(model, config);

    let selection = match &request.selection {
        Some(selection) => selection.clone(),
        None => model.columns().iter().map(|c| c.id.clone()).collect(),
    };
    session.set_selection(selection);
    session.set_rules(&request.rules)?;
    session.set_sort_keys(request.sort.clone());

    for (column, kind) in &request.aggregates {
        session.select_aggregate(column, *kind)?;
    }

    Ok(session)
}

/// Table view, rule diagnostics and counters for a request
pub fn query_response(
    config: &EngineConfig,
    model: &ColumnModel,
    request: &TableRequest,
) -> RequestResult<Value> {
    let records = request_records(request)?;
    let mut session = build_session(config, model, request)?;
    let view = session.render(&records);

    Ok(json!({
        "view": view,
        "diagnostics": session.diagnostics(),
        "metrics": metrics_json(&session.metrics().snapshot()),
    }))
}

/// Description of one column for a request
pub fn describe_response(
    config: &EngineConfig,
    model: &ColumnModel,
    request: &TableRequest,
    column: &str,
) -> RequestResult<Value> {
    let records = request_records(request)?;
    let session = build_session(config, model, request)?;
    let description = session.describe(&records, column)?;

    let results: serde_json::Map<String, Value> = description
        .results
        .iter()
        .map(|entry| {
            (
                entry.label.to_string(),
                json!(entry.value.display_with(&config.not_available)),
            )
        })
        .collect();

    Ok(json!({
        "column": description.column,
        "type": description.kind,
        "results": results,
    }))
}

/// One aggregate of one column for a request
pub fn compute_response(
    config: &EngineConfig,
    model: &ColumnModel,
    request: &TableRequest,
    column: &str,
    kind: AggregateKind,
) -> RequestResult<Value> {
    let records = request_records(request)?;
    let session = build_session(config, model, request)?;
    let value = session.compute(&records, column, kind)?;

    Ok(json!({
        "column": column,
        "aggregate": kind,
        "label": kind.label(),
        "value": value,
        "text": value.display_with(&config.not_available),
    }))
}

/// Delimited export of the table view for a request
pub fn export_text(
    config: &EngineConfig,
    model: &ColumnModel,
    request: &TableRequest,
    include_footer: bool,
) -> RequestResult<String> {
    let records = request_records(request)?;
    let mut session = build_session(config, model, request)?;
    let view = session.render(&records);

    let text = TableExport::from_view(&view, include_footer).to_delimited(config.delimiter_byte())?;
    Ok(text)
}

/// Column definitions grouped by category
pub fn columns_response(model: &ColumnModel) -> Value {
    let categories: Vec<Value> = model
        .categories()
        .into_iter()
        .map(|(category, members)| {
            let columns: Vec<Value> = members
                .into_iter()
                .map(|column| {
                    let declared = column.classification().declared();
                    let kind = declared.map_or("deferred", |kind| kind.as_str());
                    let aggregates: &[AggregateKind] = declared
                        .map(AggregateKind::applicable_to)
                        .unwrap_or_default();
                    json!({
                        "id": column.id,
                        "label": column.label,
                        "type": kind,
                        "isParent": column.is_parent,
                        "isDependentOf": column.is_dependent_of,
                        "aggregates": aggregates,
                    })
                })
                .collect();
            json!({ "category": category, "columns": columns })
        })
        .collect();

    json!({ "categories": categories })
}

fn metrics_json(snapshot: &MetricsSnapshot) -> Value {
    json!({
        "rules_compiled": snapshot.rules_compiled,
        "unknown_operators": snapshot.unknown_operators,
        "records_scanned": snapshot.records_scanned,
        "records_matched": snapshot.records_matched,
        "sorts_performed": snapshot.sorts_performed,
        "stats_computed": snapshot.stats_computed,
        "cache_hits": snapshot.cache_hits,
        "cache_invalidations": snapshot.cache_invalidations,
    })
}
