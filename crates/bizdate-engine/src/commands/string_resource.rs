//! String resource command handlers with boundary logging.
//!
//! Same logging ownership as the business date commands: the store logs only
//! at debug level, these functions emit the start/end events.

use bizdate_core::{log_op_end, log_op_error, log_op_start, Result, Scope};
use bizdate_store::{StringResource, StringResourceLoader};

/// Get one string resource with all of its languages
///
/// `None` when no row has the id.
///
/// ## Errors
///
/// - `NotInitialized`: Loader was never initialized
/// - `Persistence`: Database error
pub fn get_string_resource(
    loader: &StringResourceLoader,
    scope: &Scope,
    id: &str,
) -> Result<Option<StringResource>> {
    log_op_start!("get_string_resource", scope_id = %scope.id(), id = id);
    let start = std::time::Instant::now();

    let resource = loader.get_value(scope, id).map_err(|e| {
        log_op_error!(
            "get_string_resource",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "get_string_resource",
        duration_ms = start.elapsed().as_millis() as u64,
        found = resource.is_some()
    );

    Ok(resource)
}

/// Load every string resource
///
/// ## Errors
///
/// - `NotInitialized`: Loader was never initialized
/// - `Persistence`: Database error
pub fn load_string_resources(loader: &StringResourceLoader) -> Result<Vec<StringResource>> {
    log_op_start!("load_string_resources");
    let start = std::time::Instant::now();

    let resources = loader.load_all().map_err(|e| {
        log_op_error!(
            "load_string_resources",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "load_string_resources",
        duration_ms = start.elapsed().as_millis() as u64,
        resource_count = resources.len()
    );

    Ok(resources)
}

/// Add one language value of a string resource
///
/// ## Errors
///
/// - `EmptyArgument`: Empty id or language
/// - `Persistence`: Value already exists or database error
pub fn register_string_resource(
    loader: &StringResourceLoader,
    scope: &Scope,
    id: &str,
    lang: &str,
    value: &str,
) -> Result<()> {
    log_op_start!("register_string_resource", scope_id = %scope.id(), id = id, lang = lang);
    let start = std::time::Instant::now();

    loader.insert_value(scope, id, lang, value).map_err(|e| {
        log_op_error!(
            "register_string_resource",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "register_string_resource",
        duration_ms = start.elapsed().as_millis() as u64
    );

    Ok(())
}
