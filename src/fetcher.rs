use crate::error::{AuditError, Result};
use crate::gateway::HttpGateway;
use crate::registry::ApplicationSchema;
use crate::types::ConfigRecord;
use tracing::{debug, instrument};

/// Fetch every per-domain configuration record for one application.
///
/// Retrieves the union of the schema's dataset keys and domain key in a
/// single lookup call. Records missing some of those keys are returned
/// as-is; absence surfaces during extraction, not here.
#[instrument(skip(gateway, schema))]
pub async fn fetch_configurations(
    gateway: &dyn HttpGateway,
    base_url: &str,
    application: &str,
    schema: &ApplicationSchema,
) -> Result<Vec<ConfigRecord>> {
    let url = lookup_url(base_url, application, schema);
    debug!("Requesting configurations from {}", url);

    let response = gateway.get(&url).await?;
    if !response.is_success() {
        return Err(AuditError::LookupFailed {
            url,
            status: response.status,
            body: response.body,
        });
    }

    let records: Vec<ConfigRecord> = serde_json::from_str(&response.body)?;
    debug!("Fetched {} configuration records", records.len());
    Ok(records)
}

fn lookup_url(base_url: &str, application: &str, schema: &ApplicationSchema) -> String {
    let mut keys: Vec<&str> = schema.dataset_keys().to_vec();
    if let Some(domain_key) = schema.domain_key() {
        if !keys.contains(&domain_key) {
            keys.push(domain_key);
        }
    }
    format!(
        "http://{}/{}/app_configurations/list.json?keys={}",
        base_url,
        application,
        keys.join(",")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::GatewayResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedGateway {
        response: GatewayResponse,
        requested: Mutex<Vec<String>>,
    }

    impl CannedGateway {
        fn new(status: u16, body: &str) -> Self {
            Self {
                response: GatewayResponse {
                    status,
                    body: body.to_string(),
                },
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpGateway for CannedGateway {
        async fn get(&self, url: &str) -> Result<GatewayResponse> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(self.response.clone())
        }
    }

    #[tokio::test]
    async fn test_lookup_url_includes_dataset_and_domain_keys() {
        let gateway = CannedGateway::new(200, "[]");
        let schema = ApplicationSchema::Flat {
            domain_key: "dataset_domain",
            dataset_keys: &["vendor_dataset_id", "ledger_dataset_id"],
        };

        let records = fetch_configurations(&gateway, "config.example.com", "ngSpending", &schema)
            .await
            .unwrap();

        assert!(records.is_empty());
        let requested = gateway.requested.lock().unwrap();
        assert_eq!(
            requested.as_slice(),
            &["http://config.example.com/ngSpending/app_configurations/list.json?keys=vendor_dataset_id,ledger_dataset_id,dataset_domain"]
        );
    }

    #[tokio::test]
    async fn test_nested_schema_omits_domain_key() {
        let gateway = CannedGateway::new(200, "[]");
        let schema = ApplicationSchema::NestedJson {
            dataset_keys: &["shape_datasets", "tickets_datasets"],
        };

        fetch_configurations(&gateway, "config.example.com", "citizenConnect", &schema)
            .await
            .unwrap();

        let requested = gateway.requested.lock().unwrap();
        assert_eq!(
            requested.as_slice(),
            &["http://config.example.com/citizenConnect/app_configurations/list.json?keys=shape_datasets,tickets_datasets"]
        );
    }

    #[tokio::test]
    async fn test_non_success_status_fails_with_url_and_body() {
        let gateway = CannedGateway::new(503, "upstream down");
        let schema = ApplicationSchema::Flat {
            domain_key: "dataset_domain",
            dataset_keys: &["dataset_id"],
        };

        let result =
            fetch_configurations(&gateway, "config.example.com", "payroll", &schema).await;

        match result {
            Err(AuditError::LookupFailed { url, status, body }) => {
                assert!(url.contains("/payroll/app_configurations/list.json"));
                assert_eq!(status, 503);
                assert_eq!(body, "upstream down");
            }
            other => panic!("expected LookupFailed, got {:?}", other.map(|r| r.len())),
        }
    }

    #[tokio::test]
    async fn test_records_with_missing_keys_are_returned_as_is() {
        let gateway = CannedGateway::new(200, r#"[{"dataset_domain": "d1.example.com"}, {}]"#);
        let schema = ApplicationSchema::Flat {
            domain_key: "dataset_domain",
            dataset_keys: &["dataset_id"],
        };

        let records = fetch_configurations(&gateway, "config.example.com", "payroll", &schema)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[1].is_empty());
    }
}
