pub mod defaults;
pub mod edit;
pub mod errors;
pub mod loader;
pub mod spacecraft;
