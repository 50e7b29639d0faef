//! Business date commands
//!
//! Usage:
//!   bizdate register <SEGMENT> <DATE>
//!   bizdate get [SEGMENT]
//!   bizdate all
//!   bizdate set <SEGMENT> <DATE>

use bizdate_engine::commands::business_date::{get_all_date, get_date, register_segment, set_date};
use bizdate_engine::Runtime;
use clap::Args;

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Segment code
    pub segment: String,
    /// Initial date (yyyyMMdd)
    pub date: String,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Segment code; the configured default segment if omitted
    pub segment: Option<String>,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Segment code
    pub segment: String,
    /// New date (yyyyMMdd)
    pub date: String,
}

/// Execute register command
pub fn execute_register(
    runtime: &Runtime,
    args: RegisterArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let queries = runtime.queries()?;
    runtime.run_unit_of_work(|_, scope| {
        register_segment(runtime.row_store(), queries, scope, &args.segment, &args.date)
    })?;
    println!("✓ Registered {} = {}", args.segment, args.date);
    Ok(())
}

/// Execute get command
pub fn execute_get(runtime: &Runtime, args: GetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let date = runtime
        .run_unit_of_work(|provider, scope| get_date(provider, scope, args.segment.as_deref()))?;
    println!("{}", date);
    Ok(())
}

/// Execute all command
pub fn execute_all(runtime: &Runtime) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = runtime.run_unit_of_work(|provider, scope| get_all_date(provider, scope))?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

/// Execute set command
pub fn execute_set(runtime: &Runtime, args: SetArgs) -> Result<(), Box<dyn std::error::Error>> {
    runtime.run_unit_of_work(|provider, scope| {
        set_date(
            provider,
            scope,
            Some(args.segment.as_str()),
            Some(args.date.as_str()),
        )
    })?;
    println!("✓ Set {} = {}", args.segment, args.date);
    Ok(())
}
