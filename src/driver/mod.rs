//! Drivers: the two top-level entry points that turn a [`crate::problem::Problem`]
//! and a [`crate::settings::Settings`] snapshot into a finished [`crate::run::Run`].

pub mod dynamic;
pub mod standard;

pub use dynamic::DynamicDriver;
pub use standard::StandardDriver;
