use crate::error::{AuditError, Result};
use crate::types::ReportRow;
use std::fs;
use std::path::Path;
use tracing::info;

/// Serialize report rows as tab-separated values, one row per line, fields
/// in order dataset id, domain, application, resolving apps. No header row.
///
/// Dataset ids and domains are constrained identifier strings, so no
/// delimiter escaping is performed.
pub fn write_report(path: &Path, rows: &[ReportRow]) -> Result<()> {
    let mut out = String::new();
    for row in rows {
        out.push_str(&row.dataset_id);
        out.push('\t');
        out.push_str(&row.domain);
        out.push('\t');
        out.push_str(&row.application);
        out.push('\t');
        out.push_str(&row.resolving_apps);
        out.push('\n');
    }

    fs::write(path, out).map_err(|source| AuditError::WriteFailed {
        path: path.display().to_string(),
        source,
    })?;

    info!("Wrote {} report rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn row(dataset_id: &str, resolving_apps: &str) -> ReportRow {
        ReportRow {
            dataset_id: dataset_id.to_string(),
            domain: "d1.example.com".to_string(),
            application: "payroll".to_string(),
            resolving_apps: resolving_apps.to_string(),
        }
    }

    #[test]
    fn test_rows_round_trip_as_tsv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.tsv");

        write_report(&path, &[row("x1", "u1.com,u2.com"), row("x2", "")]).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "x1\td1.example.com\tpayroll\tu1.com,u2.com\nx2\td1.example.com\tpayroll\t\n"
        );
    }

    #[test]
    fn test_empty_run_produces_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.tsv");

        write_report(&path, &[]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_unwritable_destination_fails_with_path() {
        let dir = tempdir().unwrap();

        // The directory itself cannot be opened as a file.
        let result = write_report(dir.path(), &[row("x1", "")]);

        match result {
            Err(AuditError::WriteFailed { path, .. }) => {
                assert_eq!(path, dir.path().display().to_string());
            }
            other => panic!("expected WriteFailed, got {:?}", other),
        }
    }
}
