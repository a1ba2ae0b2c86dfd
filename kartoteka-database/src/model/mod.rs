pub mod actions;
pub mod members;
pub mod warnings;
