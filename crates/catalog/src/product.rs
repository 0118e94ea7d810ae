use serde::{Deserialize, Serialize};

use storefront_core::{Entity, Sku, ValueObject};

use crate::catalog::CatalogError;

/// Product record as it appears in the catalog data file (price still text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProductRecord {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub currency: String,
    pub section: String,
    pub terms: String,
    pub image_downloads: String,
}

/// Unit price parsed from the catalog's decimal text.
///
/// Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Price(f64);

impl ValueObject for Price {}

impl Price {
    /// Parse a decimal amount such as `"39.90"`.
    ///
    /// Text that is not a plain finite, non-negative decimal is rejected rather
    /// than coerced to zero.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let trimmed = text.trim();
        let malformed = || CatalogError::MalformedPrice(text.to_string());

        if trimmed.is_empty()
            || !trimmed
                .chars()
                .all(|c| c.is_ascii_digit() || c == '.' || c == '-' || c == '+')
        {
            return Err(malformed());
        }

        let value: f64 = trimmed.parse().map_err(|_| malformed())?;
        Self::new(value).ok_or_else(malformed)
    }

    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value >= 0.0).then_some(Self(value))
    }

    pub fn amount(&self) -> f64 {
        self.0
    }

    /// Price of `quantity` units.
    pub fn times(&self, quantity: u32) -> f64 {
        self.0 * f64::from(quantity)
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A catalog product (read-only once loaded). Only built through
/// [`Product::from_raw`], so its price has always been through [`Price::parse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    sku: Sku,
    name: String,
    description: String,
    price: Price,
    currency: String,
    section: String,
    terms: String,
    image_downloads: String,
}

impl Product {
    /// Normalize a raw record: trim the sku and parse the price.
    pub fn from_raw(raw: RawProductRecord) -> Result<Self, CatalogError> {
        let sku = Sku::new(&raw.sku);
        if sku.is_empty() {
            return Err(CatalogError::EmptySku);
        }
        let price = Price::parse(&raw.price)?;

        Ok(Self {
            sku,
            name: raw.name,
            description: raw.description,
            price,
            currency: raw.currency,
            section: raw.section,
            terms: raw.terms,
            image_downloads: raw.image_downloads,
        })
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn terms(&self) -> &str {
        &self.terms
    }

    pub fn image_downloads(&self) -> &str {
        &self.image_downloads
    }

    /// Image location under `base`, e.g. `/imgs/linen-shirt.jpg`.
    pub fn image_path(&self, base: &str) -> String {
        format!("{}/{}.jpg", base.trim_end_matches('/'), self.image_downloads)
    }

    /// Price with its currency label, e.g. `39.90 USD`.
    pub fn display_price(&self) -> String {
        format!("{} {}", self.price, self.currency)
    }
}

impl Entity for Product {
    type Id = Sku;

    fn id(&self) -> &Self::Id {
        &self.sku
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn raw(sku: &str, name: &str, price: &str, terms: &str, section: &str) -> RawProductRecord {
        RawProductRecord {
            sku: sku.to_string(),
            name: name.to_string(),
            description: format!("{name} description"),
            price: price.to_string(),
            currency: "USD".to_string(),
            section: section.to_string(),
            terms: terms.to_string(),
            image_downloads: sku.to_lowercase(),
        }
    }

    #[test]
    fn price_parses_decimal_text() {
        assert_eq!(Price::parse("39.90").unwrap().amount(), 39.90);
        assert_eq!(Price::parse(" 15 ").unwrap().amount(), 15.0);
    }

    #[test]
    fn price_rejects_non_numeric_text() {
        for text in ["", "abc", "12abc", "12,90", "$10"] {
            let err = Price::parse(text).unwrap_err();
            assert!(
                matches!(err, CatalogError::MalformedPrice(_)),
                "expected MalformedPrice for {text:?}"
            );
        }
    }

    #[test]
    fn price_rejects_negative_amounts() {
        assert!(Price::parse("-1.00").is_err());
        assert!(Price::new(-0.01).is_none());
    }

    #[test]
    fn price_displays_two_decimals() {
        assert_eq!(Price::parse("5").unwrap().to_string(), "5.00");
        assert_eq!(Price::parse("45.9").unwrap().to_string(), "45.90");
    }

    #[test]
    fn from_raw_normalizes_price_and_sku() {
        let product = Product::from_raw(raw(" A ", "Red Shirt", "19.99", "casual", "men")).unwrap();
        assert_eq!(product.sku().as_str(), "A");
        assert_eq!(product.price().amount(), 19.99);
        assert_eq!(product.display_price(), "19.99 USD");
    }

    #[test]
    fn from_raw_rejects_blank_sku() {
        let err = Product::from_raw(raw("  ", "Red Shirt", "19.99", "casual", "men")).unwrap_err();
        assert_eq!(err, CatalogError::EmptySku);
    }

    #[test]
    fn products_are_read_back_only_through_raw_records() {
        let product = Product::from_raw(raw("A", "Red Shirt", "19.99", "casual", "men")).unwrap();
        let mut json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["price"], serde_json::json!(19.99));

        json["price"] = serde_json::json!("-5");
        let record: RawProductRecord = serde_json::from_value(json).unwrap();
        assert!(matches!(
            Product::from_raw(record),
            Err(CatalogError::MalformedPrice(_))
        ));
    }

    #[test]
    fn image_path_uses_base_directory() {
        let product = Product::from_raw(raw("ZL-1", "Shirt", "1", "t", "s")).unwrap();
        assert_eq!(product.image_path("/imgs"), "/imgs/zl-1.jpg");
        assert_eq!(product.image_path("/imgs/"), "/imgs/zl-1.jpg");
    }
}
