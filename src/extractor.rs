use crate::error::{AuditError, Result};
use crate::registry::ApplicationSchema;
use crate::types::{ConfigRecord, DatasetReference};
use serde_json::Value;

/// Distinct, non-empty values of all keys starting with `customer_domain`,
/// first-seen order preserved. These are the candidate application URLs a
/// record's datasets might be served from; the derivation is the same for
/// both schema variants.
pub fn candidate_app_urls(record: &ConfigRecord) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for (key, value) in record {
        if !key.starts_with("customer_domain") {
            continue;
        }
        if let Some(url) = value.as_str() {
            if !url.is_empty() && !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        }
    }
    urls
}

/// Produce the dataset references held by one configuration record.
///
/// Keys absent from the record are silently skipped in both modes; that is
/// simply missing configuration for an optional dataset. A nested key whose
/// value cannot be parsed fails the whole record with
/// [`AuditError::MalformedNestedConfig`], which callers contain at record
/// granularity.
pub fn extract_references(
    record: &ConfigRecord,
    schema: &ApplicationSchema,
    app_urls: &[String],
) -> Result<Vec<DatasetReference>> {
    match schema {
        ApplicationSchema::Flat {
            domain_key,
            dataset_keys,
        } => Ok(extract_flat(record, domain_key, dataset_keys, app_urls)),
        ApplicationSchema::NestedJson { dataset_keys } => {
            extract_nested(record, dataset_keys, app_urls)
        }
    }
}

fn extract_flat(
    record: &ConfigRecord,
    domain_key: &str,
    dataset_keys: &[&str],
    app_urls: &[String],
) -> Vec<DatasetReference> {
    let domain = record
        .get(domain_key)
        .and_then(Value::as_str)
        .unwrap_or_default();

    dataset_keys
        .iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .map(|dataset_id| DatasetReference {
            domain: domain.to_string(),
            dataset_id: dataset_id.to_string(),
            candidate_app_urls: app_urls.to_vec(),
        })
        .collect()
}

fn extract_nested(
    record: &ConfigRecord,
    dataset_keys: &[&str],
    app_urls: &[String],
) -> Result<Vec<DatasetReference>> {
    let mut references = Vec::new();
    for key in dataset_keys {
        let Some(value) = record.get(*key) else {
            continue;
        };
        let raw = value
            .as_str()
            .ok_or_else(|| malformed(key, "value is not a JSON string"))?;
        let sub_configs: Vec<Value> =
            serde_json::from_str(raw).map_err(|e| malformed(key, &e.to_string()))?;

        for sub_config in &sub_configs {
            let sub_config = sub_config
                .as_object()
                .ok_or_else(|| malformed(key, "list element is not an object"))?;
            references.push(DatasetReference {
                domain: single_suffix_value(sub_config, "_dataset_domain", key)?,
                dataset_id: single_suffix_value(sub_config, "_dataset_id", key)?,
                candidate_app_urls: app_urls.to_vec(),
            });
        }
    }
    Ok(references)
}

/// Value of the single sub-key ending in `suffix`. Zero matches yield an
/// empty string, which the pipeline filters out; more than one match means
/// the sub-configuration is ambiguous and the record is rejected.
fn single_suffix_value(sub_config: &ConfigRecord, suffix: &str, key: &str) -> Result<String> {
    let mut matches = sub_config.iter().filter(|(k, _)| k.ends_with(suffix));
    let first = matches.next();
    if matches.next().is_some() {
        return Err(malformed(
            key,
            &format!("multiple sub-keys end in '{}'", suffix),
        ));
    }
    Ok(first
        .and_then(|(_, v)| v.as_str())
        .map(str::to_string)
        .unwrap_or_default())
}

fn malformed(key: &str, reason: &str) -> AuditError {
    AuditError::MalformedNestedConfig {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
