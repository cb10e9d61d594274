//! HTTP client for the TipoCambio SOAP service.

use std::time::Duration;

use reqwest::Client;

use crate::banguat::envelope::{self, NormalizedFeed};
use crate::banguat::SOAP_ACTION;
use crate::error::{AppError, Result};

/// Fixed request body for the TipoCambioDia operation. The operation takes
/// no parameters; the service always answers with the current day.
const TIPO_CAMBIO_DIA_BODY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
               xmlns:xsd="http://www.w3.org/2001/XMLSchema"
               xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">
  <soap:Body>
    <TipoCambioDia xmlns="http://www.banguat.gob.gt/variables/ws/" />
  </soap:Body>
</soap:Envelope>"#;

const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct BanguatClient {
    client: Client,
    url: String,
}

impl BanguatClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POSTs the fixed TipoCambioDia request and normalizes the response.
    ///
    /// No retries: one failed attempt surfaces to the caller, who decides
    /// whether to try again.
    pub async fn fetch_day(&self) -> Result<NormalizedFeed> {
        tracing::info!("Requesting TipoCambioDia from {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", SOAP_ACTION)
            .body(TIPO_CAMBIO_DIA_BODY)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::RemoteUnavailable(format!(
                "Banguat returned HTTP {}",
                status
            )));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(AppError::MalformedResponse("empty SOAP response".into()));
        }

        envelope::normalize(&body)
    }

    /// Reachability probe for the connectivity test endpoint. Sends the
    /// same request with a shorter ceiling and reports the HTTP status and
    /// body size, skipping normalization.
    pub async fn probe(&self) -> Result<(u16, usize)> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", SOAP_ACTION)
            .body(TIPO_CAMBIO_DIA_BODY)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banguat::SOAP_ENDPOINT;

    #[test]
    fn test_request_body_targets_the_operation() {
        assert!(TIPO_CAMBIO_DIA_BODY.contains("<TipoCambioDia xmlns=\"http://www.banguat.gob.gt/variables/ws/\" />"));
        assert!(TIPO_CAMBIO_DIA_BODY.starts_with("<?xml"));
        assert!(SOAP_ACTION.ends_with("TipoCambioDia"));
    }

    #[test]
    fn test_client_construction() {
        let client = BanguatClient::new(SOAP_ENDPOINT, Duration::from_secs(30));
        assert_eq!(client.url(), SOAP_ENDPOINT);
    }
}
