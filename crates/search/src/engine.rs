//! Debounced filtering over the catalog.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::watch;

use storefront_catalog::{Catalog, Product};

use crate::criteria::{FilterCriteria, filter_products};
use crate::debounce::Debouncer;

/// Quiet interval applied to filter input changes.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// The last applied filter and the products it selected.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    /// Input revision the result was computed from.
    pub revision: u64,
    pub criteria: FilterCriteria,
    pub products: Vec<Product>,
}

#[derive(Debug, Default)]
struct InputState {
    criteria: FilterCriteria,
    revision: u64,
}

/// Holds the three filter inputs and publishes results once input settles.
///
/// Every input change bumps a revision and reschedules recomputation; a result is
/// published only if its revision is still the latest, so a superseded query is
/// never applied.
#[derive(Debug)]
pub struct FilterEngine {
    catalog: Arc<Catalog>,
    inputs: Arc<Mutex<InputState>>,
    results: Arc<watch::Sender<FilterResult>>,
    debouncer: Debouncer,
}

impl FilterEngine {
    /// Create an engine whose initial result is the whole catalog.
    pub fn new(catalog: Arc<Catalog>, quiet_interval: Duration) -> Self {
        let initial = FilterResult {
            revision: 0,
            criteria: FilterCriteria::default(),
            products: catalog.products().to_vec(),
        };
        let (results, _) = watch::channel(initial);

        Self {
            catalog,
            inputs: Arc::new(Mutex::new(InputState::default())),
            results: Arc::new(results),
            debouncer: Debouncer::new(quiet_interval),
        }
    }

    /// Receiver that observes every applied result.
    pub fn subscribe(&self) -> watch::Receiver<FilterResult> {
        self.results.subscribe()
    }

    /// Latest applied result.
    pub fn current(&self) -> FilterResult {
        self.results.borrow().clone()
    }

    /// Criteria as typed so far (possibly not applied yet).
    pub fn criteria(&self) -> FilterCriteria {
        self.lock_inputs().criteria.clone()
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        let query = query.into();
        self.update(|criteria| criteria.with_query(query));
    }

    /// Empty string clears the terms filter.
    pub fn set_terms(&self, terms: impl Into<String>) {
        let terms = terms.into();
        self.update(|criteria| criteria.with_terms(terms));
    }

    /// Empty string clears the section filter.
    pub fn set_section(&self, section: impl Into<String>) {
        let section = section.into();
        self.update(|criteria| criteria.with_section(section));
    }

    /// Drop the terms and section filters, keeping the query.
    pub fn clear_filters(&self) {
        self.update(|criteria| criteria.with_terms("").with_section(""));
    }

    /// Skip the quiet interval and apply the current criteria now.
    pub fn apply_now(&self) -> FilterResult {
        self.debouncer.cancel();
        let (criteria, revision) = {
            let inputs = self.lock_inputs();
            (inputs.criteria.clone(), inputs.revision)
        };
        publish(&self.catalog, &self.inputs, &self.results, criteria, revision);
        self.current()
    }

    fn update(&self, change: impl FnOnce(FilterCriteria) -> FilterCriteria) {
        let (criteria, revision) = {
            let mut inputs = self.lock_inputs();
            inputs.criteria = change(inputs.criteria.clone());
            inputs.revision += 1;
            (inputs.criteria.clone(), inputs.revision)
        };

        let catalog = Arc::clone(&self.catalog);
        let inputs = Arc::clone(&self.inputs);
        let results = Arc::clone(&self.results);
        self.debouncer.schedule(move || {
            publish(&catalog, &inputs, &results, criteria, revision);
        });
    }

    fn lock_inputs(&self) -> std::sync::MutexGuard<'_, InputState> {
        self.inputs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn publish(
    catalog: &Catalog,
    inputs: &Mutex<InputState>,
    results: &watch::Sender<FilterResult>,
    criteria: FilterCriteria,
    revision: u64,
) {
    let products = filter_products(catalog.products(), &criteria);

    let inputs = inputs.lock().unwrap_or_else(PoisonError::into_inner);
    if inputs.revision != revision {
        tracing::debug!(revision, latest = inputs.revision, "discarding superseded filter result");
        return;
    }

    tracing::debug!(
        revision,
        query = criteria.query(),
        terms = ?criteria.terms(),
        section = ?criteria.section(),
        matches = products.len(),
        "filter applied"
    );
    results.send_replace(FilterResult {
        revision,
        criteria,
        products,
    });
}
