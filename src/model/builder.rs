//! Fold per-record query facts into per-query groups

use std::collections::BTreeSet;

use indexmap::IndexMap;

use super::quarantine::{quarantine_facts, QuarantinedFacts};
use crate::parser::QueryFacts;
use crate::util::round_to;

/// Decimal places kept for `percentage_of_execution`
pub const PERCENT_DECIMAL_PLACES: i32 = 3;

/// All records sharing one query name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryGroup {
    pub query_name: String,
    pub occurrence_count: usize,
    /// Clean tables across all members, duplicates kept
    pub table_occurrences: Vec<String>,
    /// Clean attributes across all members, duplicates kept
    pub attribute_occurrences: Vec<String>,
    pub unique_tables: BTreeSet<String>,
    pub unique_attributes: BTreeSet<String>,
    pub removed_table_tokens: Vec<String>,
    pub removed_attribute_tokens: Vec<String>,
    pub case_descriptions: BTreeSet<String>,
}

impl QueryGroup {
    fn new(query_name: &str) -> Self {
        Self {
            query_name: query_name.to_string(),
            ..Self::default()
        }
    }

    fn absorb(&mut self, facts: &QueryFacts, quarantined: &QuarantinedFacts) {
        self.occurrence_count += 1;
        self.table_occurrences
            .extend(quarantined.tables.kept.iter().cloned());
        self.attribute_occurrences
            .extend(quarantined.attributes.kept.iter().cloned());
        self.unique_tables
            .extend(quarantined.tables.kept.iter().cloned());
        self.unique_attributes
            .extend(quarantined.attributes.kept.iter().cloned());
        self.removed_table_tokens
            .extend(quarantined.tables.removed.iter().cloned());
        self.removed_attribute_tokens
            .extend(quarantined.attributes.removed.iter().cloned());
        self.case_descriptions
            .extend(facts.case_descriptions.iter().cloned());
    }

    /// Share of all records, 0-100, rounded to [`PERCENT_DECIMAL_PLACES`].
    pub fn percentage_of(&self, total_records: usize) -> f64 {
        if total_records == 0 {
            return 0.0;
        }
        round_to(
            self.occurrence_count as f64 / total_records as f64 * 100.0,
            PERCENT_DECIMAL_PLACES,
        )
    }
}

/// One record after quarantine, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSummary {
    pub query_name: String,
    pub tables: Vec<String>,
    pub unique_tables: Vec<String>,
    pub attributes: Vec<String>,
    pub unique_attributes: Vec<String>,
    pub removed_tables: Vec<String>,
    pub removed_attributes: Vec<String>,
}

fn sorted_unique(items: &[String]) -> Vec<String> {
    items
        .iter()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The aggregated query model
#[derive(Debug, Clone, Default)]
pub struct SummaryModel {
    pub total_records: usize,
    /// Groups keyed by query name, in first-encounter order
    pub groups: IndexMap<String, QueryGroup>,
    pub records: Vec<RecordSummary>,
}

impl SummaryModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record's facts into the model.
    pub fn add(&mut self, facts: &QueryFacts) {
        let quarantined = quarantine_facts(&facts.tables, &facts.attributes);

        self.total_records += 1;
        self.groups
            .entry(facts.query_name.clone())
            .or_insert_with(|| QueryGroup::new(&facts.query_name))
            .absorb(facts, &quarantined);

        self.records.push(RecordSummary {
            query_name: facts.query_name.clone(),
            unique_tables: sorted_unique(&quarantined.tables.kept),
            unique_attributes: sorted_unique(&quarantined.attributes.kept),
            tables: quarantined.tables.kept,
            attributes: quarantined.attributes.kept,
            removed_tables: quarantined.tables.removed,
            removed_attributes: quarantined.attributes.removed,
        });
    }

    pub fn group(&self, query_name: &str) -> Option<&QueryGroup> {
        self.groups.get(query_name)
    }

    /// Groups ordered by percentage descending; ties keep first-encounter
    /// order.
    pub fn groups_by_percentage(&self) -> Vec<(&QueryGroup, f64)> {
        let mut ranked: Vec<(&QueryGroup, f64)> = self
            .groups
            .values()
            .map(|g| (g, g.percentage_of(self.total_records)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Sorted union of every group's clean attributes.
    pub fn unique_attributes(&self) -> BTreeSet<String> {
        self.groups
            .values()
            .flat_map(|g| g.unique_attributes.iter().cloned())
            .collect()
    }

    /// Sorted union of every group's clean tables.
    pub fn unique_tables(&self) -> BTreeSet<String> {
        self.groups
            .values()
            .flat_map(|g| g.unique_tables.iter().cloned())
            .collect()
    }

    /// Sorted union of every quarantined attribute token.
    pub fn removed_attributes(&self) -> BTreeSet<String> {
        self.groups
            .values()
            .flat_map(|g| g.removed_attribute_tokens.iter().cloned())
            .collect()
    }
}

/// Build the summary model from facts in input order.
pub fn build_summary_model<'a>(facts: impl IntoIterator<Item = &'a QueryFacts>) -> SummaryModel {
    let mut model = SummaryModel::new();
    for f in facts {
        model.add(f);
    }
    model
}
