use thiserror::Error;

use storefront_core::DomainError;

use crate::validation::ValidationReport;

/// Why an order could not be placed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("checkout form has invalid fields: {0}")]
    Invalid(ValidationReport),

    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CheckoutError {
    /// Field errors, when the failure came from validation.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            CheckoutError::Invalid(report) => Some(report),
            _ => None,
        }
    }
}
