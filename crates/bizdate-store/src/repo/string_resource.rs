//! Localized string resources stored one row per id and language
//!
//! Rows are read ordered by id then language and folded into one
//! [`StringResource`] per id, holding every language found for it.
//!
//! `get_value` joins the scope's connection for the configured transaction
//! name when the unit of work opened one and otherwise runs in a short-lived
//! transaction. `load_all` always uses a short-lived transaction of its own.

use std::collections::BTreeMap;
use std::sync::Arc;

use bizdate_core::provider::queries::required_identifier;
use bizdate_core::provider::DEFAULT_TRANSACTION_NAME;
use bizdate_core::{ArgumentField, DateError, Scope};
use rusqlite::{Connection, Params};
use serde::{Deserialize, Serialize};

use crate::connection::ConnectionFactory;
use crate::errors::{persistence, Result};
use crate::transaction::SimpleTransactionExecutor;

/// Values of one resource id, keyed by language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringResource {
    id: String,
    values: BTreeMap<String, String>,
}

impl StringResource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, lang: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(lang.into(), value.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Value for `lang`, if the resource has one
    pub fn value(&self, lang: &str) -> Option<&str> {
        self.values.get(lang).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

/// Table layout of the string resource table
///
/// Like `ProviderConfig`, the names have no defaults here; the engine's
/// settings supply the migrated layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringResourceConfig {
    pub table_name: Option<String>,
    pub id_column_name: Option<String>,
    pub lang_column_name: Option<String>,
    pub value_column_name: Option<String>,
    /// Name of the scope connection `get_value` joins
    pub transaction_name: String,
}

impl Default for StringResourceConfig {
    fn default() -> Self {
        Self {
            table_name: None,
            id_column_name: None,
            lang_column_name: None,
            value_column_name: None,
            transaction_name: DEFAULT_TRANSACTION_NAME.to_string(),
        }
    }
}

/// Statements compiled from a `StringResourceConfig`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringResourceQueries {
    pub select_by_id: String,
    pub select_all: String,
    pub insert: String,
    pub id_column: String,
    pub lang_column: String,
    pub value_column: String,
    pub transaction_name: String,
}

impl StringResourceQueries {
    /// Compile the statements for `config`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` when a table or column name is missing
    /// or is not a plain SQL identifier, or the transaction name is empty.
    pub fn compile(config: &StringResourceConfig) -> Result<Self> {
        let table = required_identifier("table_name", config.table_name.as_deref())?;
        let id = required_identifier("id_column_name", config.id_column_name.as_deref())?;
        let lang = required_identifier("lang_column_name", config.lang_column_name.as_deref())?;
        let value =
            required_identifier("value_column_name", config.value_column_name.as_deref())?;
        if config.transaction_name.is_empty() {
            return Err(DateError::InvalidConfiguration {
                reason: "transaction_name must not be empty".to_string(),
            });
        }

        Ok(Self {
            select_by_id: format!(
                "SELECT {id}, {lang}, {value} FROM {table} WHERE {id} = ?1 ORDER BY {id}, {lang}"
            ),
            select_all: format!("SELECT {id}, {lang}, {value} FROM {table} ORDER BY {id}, {lang}"),
            insert: format!("INSERT INTO {table} ({id}, {lang}, {value}) VALUES (?1, ?2, ?3)"),
            id_column: id.to_string(),
            lang_column: lang.to_string(),
            value_column: value.to_string(),
            transaction_name: config.transaction_name.clone(),
        })
    }
}

/// Reads string resources from their table
#[derive(Debug, Clone)]
pub struct StringResourceLoader {
    config: StringResourceConfig,
    queries: Option<StringResourceQueries>,
    executor: SimpleTransactionExecutor,
}

impl StringResourceLoader {
    /// Create an uninitialized loader with default settings
    pub fn new(factory: Arc<dyn ConnectionFactory>) -> Self {
        Self {
            config: StringResourceConfig::default(),
            queries: None,
            executor: SimpleTransactionExecutor::new(factory),
        }
    }

    pub fn with_config(mut self, config: StringResourceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &StringResourceConfig {
        &self.config
    }

    pub fn set_table_name(&mut self, table_name: impl Into<String>) {
        self.config.table_name = Some(table_name.into());
    }

    pub fn set_id_column_name(&mut self, column: impl Into<String>) {
        self.config.id_column_name = Some(column.into());
    }

    pub fn set_lang_column_name(&mut self, column: impl Into<String>) {
        self.config.lang_column_name = Some(column.into());
    }

    pub fn set_value_column_name(&mut self, column: impl Into<String>) {
        self.config.value_column_name = Some(column.into());
    }

    pub fn set_transaction_name(&mut self, name: impl Into<String>) {
        self.config.transaction_name = name.into();
    }

    /// Compile the statements from the current settings
    ///
    /// # Errors
    ///
    /// See [`StringResourceQueries::compile`].
    pub fn initialize(&mut self) -> Result<()> {
        let compiled = StringResourceQueries::compile(&self.config)?;
        tracing::debug!(
            transaction_name = %compiled.transaction_name,
            "string resource loader initialized"
        );
        self.queries = Some(compiled);
        Ok(())
    }

    /// Statements compiled by the last `initialize`
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` before the first successful `initialize`.
    pub fn queries(&self) -> Result<&StringResourceQueries> {
        self.queries.as_ref().ok_or(DateError::NotInitialized)
    }

    /// Resource `id`, or `None` when no row has that id
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` before `initialize`, or a persistence error.
    pub fn get_value(&self, scope: &Scope, id: &str) -> Result<Option<StringResource>> {
        let queries = self.queries()?;
        let rows = self
            .executor
            .execute_in(scope, &queries.transaction_name, |conn| {
                select_rows(conn, queries, &queries.select_by_id, [id], "select_resource")
            })?;
        Ok(group_by_id(rows).into_iter().next())
    }

    /// Every resource in the table, ordered by id
    ///
    /// # Errors
    ///
    /// Returns `NotInitialized` before `initialize`, or a persistence error.
    pub fn load_all(&self) -> Result<Vec<StringResource>> {
        let queries = self.queries()?;
        let rows = self.executor.execute(|conn| {
            select_rows(conn, queries, &queries.select_all, [], "load_all_resources")
        })?;
        let resources = group_by_id(rows);
        tracing::debug!(resource_count = resources.len(), "string resources loaded");
        Ok(resources)
    }

    /// Insert one language value of a resource
    ///
    /// # Errors
    ///
    /// Returns `EmptyArgument` for an empty id or language, and a
    /// persistence error when the id and language already exist.
    pub fn insert_value(&self, scope: &Scope, id: &str, lang: &str, value: &str) -> Result<()> {
        if id.is_empty() {
            return Err(DateError::EmptyArgument {
                field: ArgumentField::ResourceId,
            });
        }
        if lang.is_empty() {
            return Err(DateError::EmptyArgument {
                field: ArgumentField::Lang,
            });
        }
        let queries = self.queries()?;
        self.executor
            .execute_in(scope, &queries.transaction_name, |conn| {
                conn.execute(&queries.insert, [id, lang, value])
                    .map_err(|e| persistence("insert_resource", e))
            })?;
        tracing::debug!(id, lang, "string resource value inserted");
        Ok(())
    }
}

/// `(id, lang, value)` rows of `sql`, read by column name
fn select_rows<P: Params>(
    conn: &Connection,
    queries: &StringResourceQueries,
    sql: &str,
    params: P,
    op: &str,
) -> Result<Vec<(String, String, String)>> {
    let mut stmt = conn.prepare(sql).map_err(|e| persistence(op, e))?;
    let rows = stmt
        .query_map(params, |row| {
            Ok((
                row.get::<_, String>(queries.id_column.as_str())?,
                row.get::<_, String>(queries.lang_column.as_str())?,
                row.get::<_, String>(queries.value_column.as_str())?,
            ))
        })
        .map_err(|e| persistence(op, e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| persistence(op, e))?;
    Ok(rows)
}

/// Fold rows sorted by id into one resource per id
fn group_by_id(rows: impl IntoIterator<Item = (String, String, String)>) -> Vec<StringResource> {
    let mut resources: Vec<StringResource> = Vec::new();
    for (id, lang, value) in rows {
        match resources.last_mut() {
            Some(last) if last.id == id => {
                last.values.insert(lang, value);
            }
            _ => resources.push(StringResource::new(id).with_value(lang, value)),
        }
    }
    resources
}
