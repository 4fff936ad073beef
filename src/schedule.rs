//! Table scheduling under inter-table dependencies.
//!
//! [`DependencyScheduler`] yields table names one at a time. Each pick is the first unread table,
//! in source order, whose prerequisites have all been yielded already (or which has no entry in
//! the [`DependencyGraph`]). The scan restarts from the front after every pick, which is
//! quadratic in the table count; feeds have a dozen or so tables.
//!
//! A pass that finds nothing while tables remain is a deadlock: a cycle among the present tables,
//! or a prerequisite the source does not contain.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::error::{IngestionError, IngestionResult};

/// Static map from a table to the tables that must be fully decoded before it.
///
/// Table names are matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyGraph {
    /// A graph with no edges: every table is immediately ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard feed ordering constraints.
    pub fn gtfs() -> Self {
        Self::new()
            .with_dependency("routes", "agency")
            .with_dependency("trips", "routes")
            .with_dependency("stop_times", "trips")
            .with_dependency("frequencies", "trips")
            .with_dependency("fare_rules", "routes")
    }

    /// Declare that `table` requires `prerequisite` to be decoded first.
    pub fn with_dependency(mut self, table: &str, prerequisite: &str) -> Self {
        self.edges
            .entry(table.to_ascii_lowercase())
            .or_default()
            .insert(prerequisite.to_ascii_lowercase());
        self
    }

    /// Prerequisites of `table`, or `None` when the graph has no entry for it.
    pub fn prerequisites(&self, table: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(&table.to_ascii_lowercase())
    }
}

/// Greedy, restart-after-pick scheduler over the tables present in one source.
///
/// Yielding a name marks it as read; the caller must decode that table in full before asking for
/// the next one. After a deadlock error the iterator is exhausted.
#[derive(Debug)]
pub struct DependencyScheduler<'g> {
    graph: &'g DependencyGraph,
    pending: Vec<String>,
    read: HashSet<String>,
    passes: usize,
    failed: bool,
}

impl<'g> DependencyScheduler<'g> {
    /// Schedule `present` (in source order) against `graph`.
    pub fn new(graph: &'g DependencyGraph, present: impl IntoIterator<Item = String>) -> Self {
        Self {
            graph,
            pending: present.into_iter().collect(),
            read: HashSet::new(),
            passes: 0,
            failed: false,
        }
    }

    /// Number of scan passes performed so far.
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Tables not yet yielded, in source order.
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    fn is_ready(&self, table: &str) -> bool {
        match self.graph.prerequisites(table) {
            Some(prereqs) => prereqs.iter().all(|p| self.read.contains(p)),
            None => true,
        }
    }

    /// Pick the next table, or `Ok(None)` once every present table has been yielded.
    pub fn next_table(&mut self) -> IngestionResult<Option<String>> {
        if self.failed || self.pending.is_empty() {
            return Ok(None);
        }

        self.passes += 1;
        match self.pending.iter().position(|t| self.is_ready(t)) {
            Some(idx) => {
                let table = self.pending.remove(idx);
                self.read.insert(table.to_ascii_lowercase());
                debug!(table = %table, pass = self.passes, "scheduled table");
                Ok(Some(table))
            }
            None => {
                self.failed = true;
                Err(IngestionError::SchedulingDeadlock {
                    pending: self.pending.clone(),
                })
            }
        }
    }

    /// Drain the scheduler into a complete order.
    pub fn into_order(mut self) -> IngestionResult<Vec<String>> {
        let mut order = Vec::with_capacity(self.pending.len());
        while let Some(table) = self.next_table()? {
            order.push(table);
        }
        Ok(order)
    }
}

impl Iterator for DependencyScheduler<'_> {
    type Item = IngestionResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_table().transpose()
    }
}
