//! String resource commands
//!
//! Usage:
//!   bizdate add-resource <ID> <LANG> <VALUE>
//!   bizdate resource [ID]

use bizdate_engine::commands::string_resource::{
    get_string_resource, load_string_resources, register_string_resource,
};
use bizdate_engine::Runtime;
use clap::Args;

#[derive(Debug, Args)]
pub struct AddResourceArgs {
    /// Resource id
    pub id: String,
    /// Language of the value, e.g. "en"
    pub lang: String,
    /// Text for that language
    pub value: String,
}

#[derive(Debug, Args)]
pub struct ResourceArgs {
    /// Resource id; every resource if omitted
    pub id: Option<String>,
}

/// Execute add-resource command
pub fn execute_add(
    runtime: &Runtime,
    args: AddResourceArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let loader = runtime.string_resources();
    runtime.run_unit_of_work(|_, scope| {
        register_string_resource(loader, scope, &args.id, &args.lang, &args.value)
    })?;
    println!("✓ Added {} [{}]", args.id, args.lang);
    Ok(())
}

/// Execute resource command
pub fn execute_show(
    runtime: &Runtime,
    args: ResourceArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let loader = runtime.string_resources();
    match args.id {
        Some(id) => {
            let resource = runtime
                .run_unit_of_work(|_, scope| get_string_resource(loader, scope, &id))?
                .ok_or_else(|| format!("string resource was not found. id:{}.", id))?;
            println!("{}", serde_json::to_string_pretty(resource.values())?);
        }
        None => {
            let resources = load_string_resources(loader)?;
            println!("{}", serde_json::to_string_pretty(&resources)?);
        }
    }
    Ok(())
}
