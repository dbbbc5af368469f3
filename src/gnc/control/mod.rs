pub mod allocation;
pub mod desaturation;
