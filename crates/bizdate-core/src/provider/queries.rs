//! Compilation of provider settings into SQL statements

use crate::errors::{DateError, Result};
use crate::provider::config::ProviderConfig;
use crate::row_store::DateQueries;

/// Compile the three statements the provider needs
///
/// # Errors
///
/// Returns `InvalidConfiguration` when a table or column name is missing or
/// is not a plain SQL identifier, or when the transaction name is empty.
pub fn compile(config: &ProviderConfig) -> Result<DateQueries> {
    let table = required_identifier("table_name", config.table_name.as_deref())?;
    let segment_col =
        required_identifier("segment_column_name", config.segment_column_name.as_deref())?;
    let date_col = required_identifier("date_column_name", config.date_column_name.as_deref())?;

    if config.transaction_name.is_empty() {
        return Err(DateError::InvalidConfiguration {
            reason: "transaction_name must not be empty".to_string(),
        });
    }

    Ok(DateQueries {
        select_by_segment: format!(
            "SELECT {date_col} FROM {table} WHERE {segment_col} = ?1"
        ),
        select_all: format!("SELECT {segment_col}, {date_col} FROM {table}"),
        update_by_segment: format!(
            "UPDATE {table} SET {date_col} = ?1 WHERE {segment_col} = ?2"
        ),
        table_name: table.to_string(),
        segment_column: segment_col.to_string(),
        date_column: date_col.to_string(),
        transaction_name: config.transaction_name.clone(),
    })
}

/// Require `value` to be a non-empty plain SQL identifier
///
/// Table and column names are interpolated into statement text, so anything
/// else is refused.
///
/// # Errors
///
/// Returns `InvalidConfiguration` naming `setting` when the value is missing
/// or is not an identifier.
pub fn required_identifier<'a>(setting: &str, value: Option<&'a str>) -> Result<&'a str> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DateError::InvalidConfiguration {
            reason: format!("{} is required", setting),
        })?;
    if !is_identifier(value) {
        return Err(DateError::InvalidConfiguration {
            reason: format!("{} is not a valid identifier: {}", setting, value),
        });
    }
    Ok(value)
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProviderConfig {
        ProviderConfig {
            table_name: Some("BUSINESS_DATE".to_string()),
            segment_column_name: Some("SEGMENT".to_string()),
            date_column_name: Some("BIZ_DATE".to_string()),
            ..ProviderConfig::default()
        }
    }

    #[test]
    fn test_compile_statements() {
        let queries = compile(&config()).unwrap();
        assert_eq!(
            queries.select_by_segment,
            "SELECT BIZ_DATE FROM BUSINESS_DATE WHERE SEGMENT = ?1"
        );
        assert_eq!(queries.select_all, "SELECT SEGMENT, BIZ_DATE FROM BUSINESS_DATE");
        assert_eq!(
            queries.update_by_segment,
            "UPDATE BUSINESS_DATE SET BIZ_DATE = ?1 WHERE SEGMENT = ?2"
        );
        assert_eq!(queries.transaction_name, "transaction");
    }

    #[test]
    fn test_missing_table_rejected() {
        let mut cfg = config();
        cfg.table_name = None;
        let err = compile(&cfg).unwrap_err();
        assert!(err.to_string().contains("table_name is required"));
    }

    #[test]
    fn test_injection_like_identifier_rejected() {
        let mut cfg = config();
        cfg.date_column_name = Some("BIZ_DATE; DROP TABLE x".to_string());
        assert!(matches!(
            compile(&cfg),
            Err(DateError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_identifier_rules() {
        assert!(is_identifier("_a1"));
        assert!(is_identifier("BUSINESS_DATE"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }
}
