use crate::error::{AuditError, Result};
use crate::extractor::{candidate_app_urls, extract_references};
use crate::fetcher::fetch_configurations;
use crate::gateway::HttpGateway;
use crate::probe::{probe, Reachability};
use crate::registry::{schema_for, APPLICATIONS};
use crate::types::{DatasetReference, ReportRow};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tracing::{error, info, instrument, warn};

/// Orchestrates the audit across all known applications: fetch each
/// application's configurations, extract dataset references, probe the
/// candidate URLs, and accumulate report rows.
pub struct ResolutionPipeline {
    gateway: Arc<dyn HttpGateway>,
    base_url: String,
    probe_workers: usize,
}

impl ResolutionPipeline {
    pub fn new(
        gateway: Arc<dyn HttpGateway>,
        base_url: impl Into<String>,
        probe_workers: usize,
    ) -> Self {
        Self {
            gateway,
            base_url: base_url.into(),
            probe_workers,
        }
    }

    /// Run the audit for every known application, sequentially. A failure
    /// while fetching one application's configurations is logged and yields
    /// zero rows for that application; the run carries on with the rest.
    /// Only a registry misconfiguration aborts the whole run.
    pub async fn run(&self) -> Result<Vec<ReportRow>> {
        let rows = Mutex::new(Vec::new());
        for application in APPLICATIONS {
            match self.run_application(application, &rows).await {
                Ok(emitted) => {
                    info!("Emitted {} report rows for {}", emitted, application);
                }
                Err(e @ AuditError::UnknownApplication(_)) => return Err(e),
                Err(AuditError::LookupFailed { url, status, body }) => {
                    error!(
                        url = %url,
                        status,
                        body = %body,
                        "Configuration lookup failed, skipping {}",
                        application
                    );
                }
                Err(e) => {
                    error!("Processing failed for {}: {}", application, e);
                }
            }
        }
        Ok(rows.into_inner().unwrap())
    }

    #[instrument(skip(self, rows))]
    async fn run_application(
        &self,
        application: &str,
        rows: &Mutex<Vec<ReportRow>>,
    ) -> Result<usize> {
        let schema = schema_for(application)?;
        let records =
            fetch_configurations(self.gateway.as_ref(), &self.base_url, application, schema)
                .await?;

        let mut references = Vec::new();
        for record in &records {
            let app_urls = candidate_app_urls(record);
            match extract_references(record, schema, &app_urls) {
                Ok(extracted) => references.extend(extracted),
                Err(e @ AuditError::MalformedNestedConfig { .. }) => {
                    warn!("Dropping one record for {}: {}", application, e);
                }
                Err(e) => return Err(e),
            }
        }

        // A reference without a domain or dataset id cannot be resolved.
        references.retain(|r| !r.domain.is_empty() && !r.dataset_id.is_empty());
        info!("{} datasets found for {}", references.len(), application);

        let resolving = self.probe_references(&references).await;

        let emitted = references.len();
        let mut rows = rows.lock().unwrap();
        for (reference, resolving_apps) in references.into_iter().zip(resolving) {
            rows.push(ReportRow {
                dataset_id: reference.dataset_id,
                domain: reference.domain,
                application: application.to_string(),
                resolving_apps,
            });
        }
        Ok(emitted)
    }

    /// Probe every candidate URL of every reference with at most
    /// `probe_workers` requests in flight, and join the results back to the
    /// comma-joined resolving-app string per reference. Results are indexed
    /// by input position, so candidate order is preserved regardless of
    /// completion order.
    async fn probe_references(&self, references: &[DatasetReference]) -> Vec<String> {
        let semaphore = Arc::new(Semaphore::new(self.probe_workers));

        let per_reference: Vec<(Vec<String>, Vec<tokio::task::JoinHandle<Reachability>>)> =
            references
                .iter()
                .map(|reference| {
                    let urls = distinct_urls(&reference.candidate_app_urls);
                    let handles = urls
                        .iter()
                        .map(|url| {
                            let gateway = Arc::clone(&self.gateway);
                            let semaphore = Arc::clone(&semaphore);
                            let url = url.clone();
                            tokio::spawn(async move {
                                let _permit =
                                    semaphore.acquire_owned().await.expect("semaphore closed");
                                probe(gateway.as_ref(), &url).await
                            })
                        })
                        .collect();
                    (urls, handles)
                })
                .collect();

        let mut results = Vec::with_capacity(references.len());
        for (urls, handles) in per_reference {
            let mut reachable = Vec::new();
            let mut failed = false;
            for (url, handle) in urls.iter().zip(handles) {
                match handle.await {
                    Ok(Reachability::Reachable) => reachable.push(url.as_str()),
                    Ok(Reachability::Unreachable) => {}
                    Err(e) => {
                        // An unexpected task failure invalidates resolution
                        // for this reference only.
                        warn!("Probe task for {} failed: {}", url, e);
                        failed = true;
                    }
                }
            }
            if failed {
                results.push(String::new());
            } else {
                results.push(reachable.join(","));
            }
        }
        results
    }
}

fn distinct_urls(urls: &[String]) -> Vec<String> {
    let mut distinct: Vec<String> = Vec::with_capacity(urls.len());
    for url in urls {
        if !distinct.contains(url) {
            distinct.push(url.clone());
        }
    }
    distinct
}
