use crate::gateway::HttpGateway;
use tracing::debug;

/// Outcome of a best-effort reachability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Reachable,
    Unreachable,
}

/// Check whether an application URL answers with a success status.
///
/// Unreachability and "does not exist" are indistinguishable to callers:
/// every transport failure (timeout, DNS failure, refused connection,
/// malformed host) maps to `Unreachable` here and is never propagated.
pub async fn probe(gateway: &dyn HttpGateway, url: &str) -> Reachability {
    match gateway.get(&format!("http://{}", url)).await {
        Ok(response) if response.is_success() => Reachability::Reachable,
        Ok(response) => {
            debug!("{} answered with status {}", url, response.status);
            Reachability::Unreachable
        }
        Err(e) => {
            debug!("{} unreachable: {}", url, e);
            Reachability::Unreachable
        }
    }
}
