use serde_json::Value;

/// One domain's configuration snapshot as returned by the lookup API.
pub type ConfigRecord = serde_json::Map<String, Value>;

/// A dataset identifier paired with its owning domain and the application
/// URLs that might be serving it.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetReference {
    pub domain: String,
    pub dataset_id: String,
    pub candidate_app_urls: Vec<String>,
}

/// One line of the final report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub dataset_id: String,
    pub domain: String,
    pub application: String,
    /// Comma-joined candidate URLs confirmed reachable, in the order the
    /// candidates first appeared.
    pub resolving_apps: String,
}
