pub mod dates;
pub mod migrate;
pub mod resources;
