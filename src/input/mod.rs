pub mod bindings;
pub mod keys;
pub mod state;
