pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, SubmitArgs};

pub use adapters::ClickUpClient;
pub use app::{build_router, AppState};
pub use config::AppConfig;
pub use core::IntakeService;
pub use domain::cnpj::{strip_punctuation, validate_cnpj, Cnpj};
pub use domain::model::{Attachment, OnboardingForm, SubmissionReceipt};
pub use utils::error::{IntakeError, Result};
