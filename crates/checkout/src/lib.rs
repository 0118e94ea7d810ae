//! Checkout form: field rules, input formatting, best-effort address autofill and
//! the confirmation produced once every rule passes. No payment is processed.

pub mod autofill;
pub mod confirmation;
pub mod error;
pub mod field;
pub mod form;
pub mod format;
pub mod postal;
pub mod validation;

pub use autofill::{AutofillOutcome, autofill_address};
pub use confirmation::OrderConfirmation;
pub use error::CheckoutError;
pub use field::Field;
pub use form::{CheckoutForm, CheckoutSubmission, LookupTicket, PaymentDetails, ShippingAddress};
pub use postal::{Address, LookupError, PostalLookup, ViaCepClient};
pub use validation::{FieldError, ValidationReport, validate_field};
