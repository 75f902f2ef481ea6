// Adapters layer: concrete implementations for external systems.

pub mod clickup;

pub use clickup::ClickUpClient;
