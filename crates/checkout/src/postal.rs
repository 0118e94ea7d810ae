//! Postal code to address resolution.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_core::ValueObject;

use crate::format::postal_code_digits;

/// Address parts a postal code resolves to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

impl ValueObject for Address {}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("postal code must have 8 digits: {0:?}")]
    InvalidPostalCode(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0})")]
    Api(u16),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Resolves an 8-digit postal code. `Ok(None)` means the service does not know it.
#[async_trait]
pub trait PostalLookup: Send + Sync {
    async fn lookup(&self, postal_code: &str) -> Result<Option<Address>, LookupError>;
}

/// HTTP client for a ViaCEP-compatible service (`GET {base}/ws/{digits}/json/`).
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    base_url: String,
    http: reqwest::Client,
}

impl ViaCepClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, digits: &str) -> String {
        format!("{}/ws/{}/json/", self.base_url.trim_end_matches('/'), digits)
    }
}

#[async_trait]
impl PostalLookup for ViaCepClient {
    async fn lookup(&self, postal_code: &str) -> Result<Option<Address>, LookupError> {
        let digits = postal_code_digits(postal_code);
        if digits.len() != 8 {
            return Err(LookupError::InvalidPostalCode(postal_code.to_string()));
        }

        let url = self.endpoint(&digits);
        tracing::debug!(%url, "looking up postal code");

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(LookupError::Api(resp.status().as_u16()));
        }

        let body: ViaCepResponse = resp.json().await.map_err(|e| LookupError::Parse(e.to_string()))?;
        Ok(body.into_address())
    }
}

/// Wire shape of a ViaCEP reply. Unknown codes come back as `{"erro": true}`
/// (older deployments send the string `"true"`).
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn into_address(self) -> Option<Address> {
        let not_found = match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        };
        if not_found {
            return None;
        }
        Some(Address {
            street: self.logradouro,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Option<Address> {
        serde_json::from_str::<ViaCepResponse>(json).unwrap().into_address()
    }

    #[test]
    fn known_code_maps_to_address() {
        let address = parse(
            r#"{"cep":"01310-100","logradouro":"Avenida Paulista","complemento":"de 612 a 1510 - lado par",
                "bairro":"Bela Vista","localidade":"São Paulo","uf":"SP","ibge":"3550308"}"#,
        )
        .unwrap();
        assert_eq!(address.street, "Avenida Paulista");
        assert_eq!(address.neighborhood, "Bela Vista");
        assert_eq!(address.city, "São Paulo");
        assert_eq!(address.state, "SP");
    }

    #[test]
    fn erro_flag_means_not_found() {
        assert_eq!(parse(r#"{"erro": true}"#), None);
        assert_eq!(parse(r#"{"erro": "true"}"#), None);
    }

    #[test]
    fn missing_parts_default_to_empty() {
        let address = parse(r#"{"localidade":"Brasília","uf":"DF"}"#).unwrap();
        assert_eq!(address.street, "");
        assert_eq!(address.city, "Brasília");
    }

    #[test]
    fn endpoint_uses_digits_and_trims_base() {
        let client = ViaCepClient::new("https://viacep.com.br/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.endpoint("01310100"), "https://viacep.com.br/ws/01310100/json/");
    }

    #[tokio::test]
    async fn incomplete_code_is_rejected_without_a_request() {
        let client = ViaCepClient::new("http://127.0.0.1:9", Duration::from_millis(10)).unwrap();
        let err = client.lookup("01310-1").await.unwrap_err();
        assert!(matches!(err, LookupError::InvalidPostalCode(_)));
    }
}
