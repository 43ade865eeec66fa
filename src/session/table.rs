//! Caller-owned table state
//!
//! Holds the current selection, rules, sort keys and aggregate choices, and
//! runs filter, sort and statistics over a record snapshot supplied per call.

use std::collections::BTreeMap;

use super::errors::SessionResult;
use super::fingerprint::snapshot_fingerprint;
use super::view::{format_cell, FooterCell, TableView, ViewColumn};
use crate::columns::{Column, ColumnModel};
use crate::config::EngineConfig;
use crate::filter::{
    FilterDiagnostic, FilterRule, FilterSet, PredicateFilter, RuleSpec, UnknownOperatorPolicy,
};
use crate::observability::{log_event_with_fields, Event, MetricsRegistry};
use crate::record::{field, Record};
use crate::sort::{ResultSorter, SortKey, SortSpec};
use crate::stats::{
    AggregateCache, AggregateKind, ColumnDescription, ComputedAggregate, StatValue,
    StatisticsEngine,
};

/// Table state for one consumer
pub struct TableSession<'c> {
    columns: &'c ColumnModel,
    policy: UnknownOperatorPolicy,
    not_available: String,
    selection: Vec<String>,
    filters: FilterSet,
    sort: SortSpec,
    aggregates: BTreeMap<String, AggregateKind>,
    cache: AggregateCache,
    metrics: MetricsRegistry,
}

impl<'c> TableSession<'c> {
    /// Create a session with default settings
    pub fn new(columns: &'c ColumnModel) -> Self {
        Self::with_config(columns, &EngineConfig::default())
    }

    /// Create a session using the policy and sentinel text from `config`
    pub fn with_config(columns: &'c ColumnModel, config: &EngineConfig) -> Self {
        Self {
            columns,
            policy: config.unknown_operator_policy,
            not_available: config.not_available.clone(),
            selection: Vec::new(),
            filters: FilterSet::default(),
            sort: SortSpec::new(),
            aggregates: BTreeMap::new(),
            cache: AggregateCache::new(),
            metrics: MetricsRegistry::new(),
        }
    }

    pub fn columns(&self) -> &'c ColumnModel {
        self.columns
    }

    /// Replaces the directly selected column ids
    pub fn set_selection(&mut self, selection: Vec<String>) {
        self.selection = selection;
    }

    pub fn selection(&self) -> &[String] {
        &self.selection
    }

    /// Selected columns expanded with their selected dependents
    pub fn visible_columns(&self) -> Vec<&'c Column> {
        self.columns.expand_visible(&self.selection)
    }

    /// Replaces the rule list with compiled wire rules.
    ///
    /// On error the previous rules stay in place.
    pub fn set_rules(&mut self, specs: &[RuleSpec]) -> SessionResult<&[FilterDiagnostic]> {
        let compiled = FilterSet::compile(specs, self.policy)?;

        let unknown = specs.len().saturating_sub(compiled.len());
        for _ in 0..unknown {
            self.metrics.increment_unknown_operators();
        }
        self.metrics.add_rules_compiled(compiled.len() as u64);

        self.filters = compiled;
        Ok(self.filters.diagnostics())
    }

    /// Replaces the rule list with typed rules
    pub fn set_typed_rules(&mut self, rules: Vec<FilterRule>) {
        self.metrics.add_rules_compiled(rules.len() as u64);
        self.filters = FilterSet::from_rules(rules);
    }

    pub fn clear_rules(&mut self) {
        self.filters = FilterSet::default();
    }

    pub fn rules(&self) -> &[FilterRule] {
        self.filters.rules()
    }

    /// Diagnostics from the last rule compilation
    pub fn diagnostics(&self) -> &[FilterDiagnostic] {
        self.filters.diagnostics()
    }

    /// Replaces the sort key list
    pub fn set_sort_keys(&mut self, keys: Vec<SortKey>) {
        self.sort = SortSpec::from_keys(keys);
    }

    /// Advances `field` through ascending, descending, unsorted
    pub fn toggle_sort(&mut self, field_id: &str) {
        self.sort.toggle(field_id);
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        self.sort.keys()
    }

    /// Chooses the footer aggregate for a column, replacing any earlier choice
    pub fn select_aggregate(&mut self, column_id: &str, kind: AggregateKind) -> SessionResult<()> {
        self.columns.resolve(column_id)?;
        self.aggregates.insert(column_id.to_string(), kind);
        self.cache.remove(column_id);
        Ok(())
    }

    pub fn clear_aggregate(&mut self, column_id: &str) {
        self.aggregates.remove(column_id);
        self.cache.remove(column_id);
    }

    /// Aggregate chosen for a column
    pub fn aggregate_for(&self, column_id: &str) -> Option<AggregateKind> {
        self.aggregates.get(column_id).copied()
    }

    /// Discards rules, sort keys and aggregates; the selection is kept
    pub fn reset(&mut self) {
        self.clear_rules();
        self.sort.clear();
        self.aggregates.clear();
        self.cache.clear();
    }

    pub fn cache(&self) -> &AggregateCache {
        &self.cache
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Filters then sorts `records` under the current rules and keys
    pub fn rows<'r>(&self, records: &'r [Record]) -> Vec<&'r Record> {
        let filter = PredicateFilter::new(self.columns);
        let filtered = filter.apply_all(records, self.filters.rules());
        self.metrics
            .record_filter_pass(records.len() as u64, filtered.len() as u64);

        if self.sort.is_empty() {
            return filtered;
        }
        self.metrics.increment_sorts();
        ResultSorter::order_by(filtered, self.sort.keys(), Some(self.columns))
    }

    /// Full statistics of one column over the current rows
    pub fn describe(&self, records: &[Record], column_id: &str) -> SessionResult<ColumnDescription> {
        self.columns.resolve(column_id)?;
        let rows = self.rows(records);
        self.metrics.increment_stats();
        Ok(StatisticsEngine::new(self.columns).describe(column_id, rows))
    }

    /// One aggregate of one column over the current rows, bypassing the cache
    pub fn compute(
        &self,
        records: &[Record],
        column_id: &str,
        kind: AggregateKind,
    ) -> SessionResult<StatValue> {
        self.columns.resolve(column_id)?;
        let rows = self.rows(records);
        self.metrics.increment_stats();
        Ok(StatisticsEngine::new(self.columns).compute_single(column_id, rows, kind))
    }

    /// Renders `records` into a table view.
    ///
    /// The aggregate cache is dropped first if the records, rules or sort
    /// keys differ from the previous render.
    pub fn render(&mut self, records: &[Record]) -> TableView {
        let fingerprint = snapshot_fingerprint(records, self.filters.rules(), self.sort.keys());
        if self.cache.validate(fingerprint) {
            self.metrics.increment_cache_invalidations();
            let hex = fingerprint.to_string();
            log_event_with_fields(
                Event::AggregateCacheInvalidated,
                &[("fingerprint", hex.as_str())],
            );
        }

        let rows = self.rows(records);
        let visible = self.visible_columns();

        let footer = visible
            .iter()
            .map(|column| self.footer_cell(&column.id, &rows))
            .collect();

        let cells = rows
            .iter()
            .map(|record| {
                visible
                    .iter()
                    .map(|column| format_cell(field(record, &column.id)))
                    .collect()
            })
            .collect();

        TableView {
            columns: visible.into_iter().map(ViewColumn::from).collect(),
            rows: cells,
            footer,
        }
    }

    fn footer_cell(&mut self, column_id: &str, rows: &[&Record]) -> Option<FooterCell> {
        let kind = self.aggregate_for(column_id)?;

        let value = match self.cache.lookup(column_id, kind) {
            Some(cached) => {
                self.metrics.increment_cache_hits();
                cached.value.clone()
            }
            None => {
                self.metrics.increment_stats();
                let value = StatisticsEngine::new(self.columns).compute_single(
                    column_id,
                    rows.iter().copied(),
                    kind,
                );
                self.cache.insert(ComputedAggregate {
                    field: column_id.to_string(),
                    value: value.clone(),
                    kind,
                });
                value
            }
        };

        Some(FooterCell {
            kind,
            text: value.display_with(&self.not_available),
            value,
        })
    }
}
