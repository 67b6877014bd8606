use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// The part of an HTTP response the audit cares about.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub status: u16,
    pub body: String,
}

impl GatewayResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// HTTP seam for the lookup API and reachability probes. Production code
/// goes through [`ReqwestGateway`]; tests substitute stub implementations.
#[async_trait]
pub trait HttpGateway: Send + Sync {
    async fn get(&self, url: &str) -> Result<GatewayResponse>;
}

pub struct ReqwestGateway {
    client: reqwest::Client,
}

impl ReqwestGateway {
    /// Every request issued through this gateway carries `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpGateway for ReqwestGateway {
    async fn get(&self, url: &str) -> Result<GatewayResponse> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(GatewayResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_statuses() {
        for status in [200, 204, 299] {
            let response = GatewayResponse {
                status,
                body: String::new(),
            };
            assert!(response.is_success());
        }
        for status in [199, 301, 404, 500] {
            let response = GatewayResponse {
                status,
                body: String::new(),
            };
            assert!(!response.is_success());
        }
    }
}
