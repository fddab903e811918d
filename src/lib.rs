pub mod closure;
pub mod commands;
pub mod completions;
pub mod config;
pub mod document;
pub mod extract;
pub mod index;
pub mod prune;

#[cfg(test)]
pub(crate) mod testing;

pub use index::EntityKind;
