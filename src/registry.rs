use crate::error::{AuditError, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Per-application description of where dataset identifiers live inside a
/// configuration record.
#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationSchema {
    /// Dataset identifiers sit directly under `dataset_keys`, the owning
    /// domain under `domain_key`.
    Flat {
        domain_key: &'static str,
        dataset_keys: &'static [&'static str],
    },
    /// Each dataset key holds a JSON-encoded list of sub-configurations.
    NestedJson {
        dataset_keys: &'static [&'static str],
    },
}

impl ApplicationSchema {
    pub fn dataset_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Flat { dataset_keys, .. } => dataset_keys,
            Self::NestedJson { dataset_keys } => dataset_keys,
        }
    }

    pub fn domain_key(&self) -> Option<&'static str> {
        match self {
            Self::Flat { domain_key, .. } => Some(domain_key),
            Self::NestedJson { .. } => None,
        }
    }
}

/// Known applications in processing order. Names are external API
/// identifiers and must match the lookup service verbatim.
pub const APPLICATIONS: [&str; 9] = [
    "ngBudget",
    "spending",
    "payroll",
    "budget",
    "ngSpending",
    "insightDashboard",
    "capitalProjectsExplorer",
    "ngPayroll",
    "citizenConnect",
];

static SCHEMAS: Lazy<HashMap<&'static str, ApplicationSchema>> = Lazy::new(|| {
    HashMap::from([
        (
            "ngBudget",
            ApplicationSchema::Flat {
                domain_key: "dataset_domain",
                dataset_keys: &[
                    "operating_budget_dataset_id",
                    "revenue_budget_dataset_id",
                    "capital_budget_dataset_id",
                    "capital_projects_dataset_id",
                    "phase_dataset_id",
                ],
            },
        ),
        (
            "spending",
            ApplicationSchema::Flat {
                domain_key: "dataset_domain",
                dataset_keys: &[
                    "vendor_dataset_id",
                    "ledger_dataset_id",
                    "glossary_dataset_id",
                ],
            },
        ),
        (
            "payroll",
            ApplicationSchema::Flat {
                domain_key: "dataset_domain",
                dataset_keys: &["dataset_id"],
            },
        ),
        (
            "budget",
            ApplicationSchema::Flat {
                domain_key: "dataset_domain",
                dataset_keys: &[
                    "operating_budget_dataset_id",
                    "capital_budget_dataset_id",
                    "capital_projects_dataset_id",
                    "phase_dataset_id",
                ],
            },
        ),
        (
            "ngSpending",
            ApplicationSchema::Flat {
                domain_key: "dataset_domain",
                dataset_keys: &["vendor_dataset_id", "ledger_dataset_id"],
            },
        ),
        (
            "insightDashboard",
            ApplicationSchema::Flat {
                domain_key: "dataset_domain",
                dataset_keys: &["dataset_id"],
            },
        ),
        (
            "capitalProjectsExplorer",
            ApplicationSchema::Flat {
                domain_key: "dataset_domain",
                dataset_keys: &[
                    "dataset_id",
                    "shape_dataset_id",
                    "financial_dataset_id",
                    "stages_dataset_id",
                    "district_shape_dataset_id",
                ],
            },
        ),
        (
            "ngPayroll",
            ApplicationSchema::Flat {
                domain_key: "dataset_domain",
                dataset_keys: &["payroll_dataset_id"],
            },
        ),
        (
            "citizenConnect",
            ApplicationSchema::NestedJson {
                dataset_keys: &["shape_datasets", "tickets_datasets", "places_datasets"],
            },
        ),
    ])
});

/// Look up the configuration schema for an application.
pub fn schema_for(application: &str) -> Result<&'static ApplicationSchema> {
    SCHEMAS
        .get(application)
        .ok_or_else(|| AuditError::UnknownApplication(application.to_string()))
}
