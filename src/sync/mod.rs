//! Optimistic mutation and persistence sync

mod hide;
mod maps;
mod mutator;

pub use hide::HideTimers;
pub use maps::FieldGroupMaps;
pub use mutator::MutationSync;
