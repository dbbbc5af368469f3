pub mod cmg;
pub mod reaction_wheel;
