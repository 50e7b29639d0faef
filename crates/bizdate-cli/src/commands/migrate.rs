//! Migrate command
//!
//! Usage: bizdate migrate

use bizdate_engine::Runtime;

/// Execute migrate command
pub fn execute(runtime: &Runtime) -> Result<(), Box<dyn std::error::Error>> {
    for migration_id in runtime.migrate()? {
        println!("✓ {}", migration_id);
    }
    Ok(())
}
