pub mod pages;
pub mod server;

pub use server::{build_router, AppState};
