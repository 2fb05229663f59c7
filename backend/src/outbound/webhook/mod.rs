//! Reqwest-backed term notifier posting JSON to the signature webhook.

mod dto;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::domain::ports::{TermNotification, TermNotifier, TermNotifierError};

use dto::TermPayload;

/// Posts each term to one webhook endpoint.
pub struct WebhookTermNotifier {
    client: Client,
    endpoint: Url,
}

impl WebhookTermNotifier {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

fn map_transport_error(error: reqwest::Error) -> TermNotifierError {
    let kind = if error.is_timeout() {
        "timed out"
    } else if error.is_connect() {
        "connection failed"
    } else {
        "request failed"
    };
    TermNotifierError::transport(format!("{kind}: {error}"))
}

fn check_status(status: StatusCode) -> Result<(), TermNotifierError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(TermNotifierError::rejected(status.as_u16()))
    }
}

#[async_trait]
impl TermNotifier for WebhookTermNotifier {
    fn is_configured(&self) -> bool {
        true
    }

    async fn notify(&self, notification: &TermNotification) -> Result<(), TermNotifierError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&TermPayload::from(notification))
            .send()
            .await
            .map_err(map_transport_error)?;
        let status = response.status();
        debug!(%status, endpoint = %self.endpoint, "term webhook answered");
        check_status(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssetType, Custody, Employee, EmployeeId, Product, ProductId};
    use chrono::{DateTime, Utc};
    use rstest::{fixture, rstest};
    use rust_decimal::Decimal;

    #[fixture]
    fn notification() -> TermNotification {
        TermNotification {
            employee: Employee {
                id: EmployeeId::random(),
                name: "Ana".to_owned(),
                cpf: "123".to_owned(),
                sector: "Ops".to_owned(),
                email: Some("ana@example.com".to_owned()),
                phone: None,
            },
            product: Product {
                id: ProductId::random(),
                title: "Laptop".to_owned(),
                description: String::new(),
                category: "IT".to_owned(),
                quantity: 1,
                value: Decimal::new(350000, 2),
                asset_type: AssetType::Permanent,
                serial_number: Some("SN-9".to_owned()),
                image_url: None,
                custody: Custody::InStock,
            },
            admin_name: "Admin".to_owned(),
            pdf_base64: "JVBERi0=".to_owned(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    #[rstest]
    fn payload_uses_camel_case_fields(notification: TermNotification) {
        let value = serde_json::to_value(TermPayload::from(&notification)).expect("serialise");

        assert_eq!(value["adminName"], "Admin");
        assert_eq!(value["pdfBase64"], "JVBERi0=");
        assert_eq!(value["employee"]["name"], "Ana");
        assert_eq!(value["product"]["assetType"], "PERMANENT");
        assert_eq!(value["product"]["serialNumber"], "SN-9");
        assert!(value["timestamp"].as_str().is_some());
    }

    #[rstest]
    #[case(StatusCode::OK, true)]
    #[case(StatusCode::ACCEPTED, true)]
    #[case(StatusCode::BAD_GATEWAY, false)]
    #[case(StatusCode::NOT_FOUND, false)]
    fn only_success_statuses_are_accepted(#[case] status: StatusCode, #[case] accepted: bool) {
        assert_eq!(check_status(status).is_ok(), accepted);
    }

    #[rstest]
    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_failure(notification: TermNotification) {
        let endpoint = Url::parse("http://127.0.0.1:9/terms").expect("url");
        let notifier =
            WebhookTermNotifier::new(endpoint, Duration::from_secs(2)).expect("client");

        let err = notifier
            .notify(&notification)
            .await
            .expect_err("nothing listens on the discard port");

        assert!(matches!(err, TermNotifierError::Transport { .. }));
    }
}
