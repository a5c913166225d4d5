pub mod application;
pub mod generation;
pub mod style;
