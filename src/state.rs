use crate::data::filter::{filter_matrix, operators_for, Filter, Operator};
use crate::data::model::{CorrelationSource, CorrelationTriple, DataType, Dataset, Matrix};
use crate::layout::heatmap::LayoutCache;
use crate::layout::hover::HoverChannel;

// ---------------------------------------------------------------------------
// Filter draft – the side panel's in-progress filter
// ---------------------------------------------------------------------------

/// What the user has picked in the "add filter" widgets so far.
#[derive(Debug, Clone)]
pub struct FilterDraft {
    pub column: String,
    pub operator: Operator,
    pub text: String,
    pub number: f64,
}

impl Default for FilterDraft {
    fn default() -> Self {
        FilterDraft {
            column: String::new(),
            operator: Operator::Equal,
            text: String::new(),
            number: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// The immutable source dataset.
    pub dataset: Dataset,

    /// Active typed filters, AND-combined.
    pub filters: Vec<Filter>,

    /// Rows surviving the current filters (cached snapshot).
    pub filtered: Matrix,

    /// Whether the last filtering pass reverted to the full matrix.
    pub fallback: bool,

    /// Upstream supplier of correlation triples for the filtered matrix.
    pub source: Box<dyn CorrelationSource>,

    /// Triples currently displayed by the heatmap.
    pub triples: Vec<CorrelationTriple>,

    /// Bumped whenever `triples` changes; keys the layout cache.
    pub revision: u64,

    /// Memoized heatmap layout.
    pub layout: LayoutCache,

    /// Hover interaction channel driving the tooltip.
    pub hover: HoverChannel,

    /// Status / notice message shown in the top bar.
    pub status_message: Option<String>,

    /// In-progress filter from the side panel.
    pub draft: FilterDraft,
}

impl AppState {
    /// Build the state around a dataset and its upstream correlation seam.
    pub fn new(dataset: Dataset, source: Box<dyn CorrelationSource>) -> Self {
        let filtered = dataset.rows.clone();
        let triples = source.correlate(&filtered, &dataset.schema);
        let mut draft = FilterDraft::default();
        if let Some(first) = dataset.columns_by_index().first() {
            draft.column = first.key.clone();
            draft.operator = operators_for(first.data_type)[0];
        }
        AppState {
            dataset,
            filters: Vec::new(),
            filtered,
            fallback: false,
            source,
            triples,
            revision: 0,
            layout: LayoutCache::new(),
            hover: HoverChannel::default(),
            status_message: None,
            draft,
        }
    }

    /// Re-run the filter pass and re-query the correlation source.
    pub fn refilter(&mut self) {
        let outcome = filter_matrix(&self.dataset.rows, &self.filters, &self.dataset.schema);
        self.fallback = outcome.fallback;
        self.status_message = self
            .fallback
            .then(|| "Filters matched no rows; showing the full dataset".to_string());
        self.filtered = outcome.matrix;
        log::info!(
            "{} of {} rows visible ({} filters)",
            self.filtered.len(),
            self.dataset.len(),
            self.filters.len()
        );

        self.triples = self.source.correlate(&self.filtered, &self.dataset.schema);
        self.revision += 1;
        self.hover.leave();
    }

    /// Add a filter and recompute.
    pub fn add_filter(&mut self, filter: Filter) {
        self.filters.push(filter);
        self.refilter();
    }

    /// Remove the filter at `index` and recompute.
    pub fn remove_filter(&mut self, index: usize) {
        if index < self.filters.len() {
            self.filters.remove(index);
            self.refilter();
        }
    }

    /// Drop every filter and recompute.
    pub fn clear_filters(&mut self) {
        if !self.filters.is_empty() {
            self.filters.clear();
            self.refilter();
        }
    }

    /// Point the draft at another column, resetting the operator when the
    /// column type no longer allows it.
    pub fn set_draft_column(&mut self, key: String) {
        if let Some(entry) = self.dataset.column(&key) {
            let allowed = operators_for(entry.data_type);
            if !allowed.contains(&self.draft.operator) {
                self.draft.operator = allowed[0];
            }
            self.draft.column = key;
        }
    }

    /// Materialize the draft into a typed filter against the drafted
    /// column's schema type, if the column still exists.
    pub fn draft_filter(&self) -> Option<Filter> {
        let entry = self.dataset.column(&self.draft.column)?;
        let filter = match entry.data_type {
            DataType::Categorical => Filter::Categorical {
                schema_key: entry.key.clone(),
                operator: self.draft.operator,
                value: self.draft.text.clone(),
            },
            DataType::Number => Filter::Number {
                schema_key: entry.key.clone(),
                operator: self.draft.operator,
                value: self.draft.number,
            },
        };
        operators_for(entry.data_type)
            .contains(&filter.operator())
            .then_some(filter)
    }
}
