pub mod interview;
pub mod roster;
