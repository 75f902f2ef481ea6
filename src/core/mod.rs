pub mod intake;

pub use crate::domain::model::{Attachment, OnboardingForm, SubmissionReceipt};
pub use crate::domain::ports::{ConfigProvider, TaskTracker};
pub use crate::utils::error::Result;
pub use intake::IntakeService;
