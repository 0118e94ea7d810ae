use serde::{Deserialize, Serialize};

use storefront_catalog::Product;

/// What the shopper is currently looking for.
///
/// Empty strings mean "no constraint": they are normalized to `None` for the
/// categorical filters, and an empty query matches every product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    query: String,
    terms: Option<String>,
    section: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_terms(mut self, terms: impl Into<String>) -> Self {
        self.terms = non_empty(terms.into());
        self
    }

    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = non_empty(section.into());
        self
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn terms(&self) -> Option<&str> {
        self.terms.as_deref()
    }

    pub fn section(&self) -> Option<&str> {
        self.section.as_deref()
    }

    /// True when no input constrains the result.
    pub fn is_unconstrained(&self) -> bool {
        self.query.is_empty() && self.terms.is_none() && self.section.is_none()
    }

    /// Does `product` satisfy every active criterion?
    pub fn matches(&self, product: &Product) -> bool {
        Matcher::new(self).matches(product)
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// Criteria with the query lowercased once, for filtering many products.
struct Matcher<'a> {
    query: String,
    terms: Option<&'a str>,
    section: Option<&'a str>,
}

impl<'a> Matcher<'a> {
    fn new(criteria: &'a FilterCriteria) -> Self {
        Self {
            query: criteria.query.to_lowercase(),
            terms: criteria.terms(),
            section: criteria.section(),
        }
    }

    fn matches(&self, product: &Product) -> bool {
        let text_match = self.query.is_empty()
            || [product.name(), product.description(), product.terms()]
                .iter()
                .any(|field| field.to_lowercase().contains(&self.query));

        text_match
            && self.terms.is_none_or(|terms| product.terms() == terms)
            && self.section.is_none_or(|section| product.section() == section)
    }
}

/// Products matching `criteria`, in catalog order.
pub fn filter_products(products: &[Product], criteria: &FilterCriteria) -> Vec<Product> {
    if criteria.is_unconstrained() {
        return products.to_vec();
    }
    let matcher = Matcher::new(criteria);
    products
        .iter()
        .filter(|product| matcher.matches(product))
        .cloned()
        .collect()
}
