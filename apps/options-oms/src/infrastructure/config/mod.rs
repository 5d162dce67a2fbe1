//! Composition root: wires adapters from configuration.

mod container;

pub use container::Container;
