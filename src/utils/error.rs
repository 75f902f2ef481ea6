use crate::domain::form::FormErrors;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid CNPJ: {value}")]
    InvalidCnpj { value: String },

    #[error("Form validation failed: {0}")]
    FormValidation(FormErrors),

    #[error("Invalid attachment: {reason}")]
    InvalidAttachment { reason: String },

    #[error("Task tracker returned {status}: {message}")]
    TrackerError {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Task {task_id} was created but the attachment upload failed: {source}")]
    AttachmentFailed {
        task_id: String,
        #[source]
        source: Box<IntakeError>,
    },
}

pub type Result<T> = std::result::Result<T, IntakeError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Validation,
    Upstream,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IntakeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IntakeError::ApiError(_) => ErrorCategory::Network,
            IntakeError::IoError(_) | IntakeError::SerializationError(_) => ErrorCategory::System,
            IntakeError::ConfigError { .. }
            | IntakeError::MissingConfigError { .. }
            | IntakeError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            IntakeError::InvalidCnpj { .. }
            | IntakeError::FormValidation(_)
            | IntakeError::InvalidAttachment { .. } => ErrorCategory::Validation,
            IntakeError::TrackerError { .. } | IntakeError::AttachmentFailed { .. } => {
                ErrorCategory::Upstream
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            IntakeError::ApiError(_) => {
                "Could not reach the task-tracking service.".to_string()
            }
            IntakeError::IoError(e) => format!("File access failed: {}", e),
            IntakeError::SerializationError(_) => "Received malformed data.".to_string(),
            IntakeError::ConfigError { message } => format!("Configuration problem: {}", message),
            IntakeError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required.", field)
            }
            IntakeError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            IntakeError::InvalidCnpj { .. } => "The CNPJ informed is not valid.".to_string(),
            IntakeError::FormValidation(errors) => {
                format!("Please review the form: {}", errors)
            }
            IntakeError::InvalidAttachment { reason } => {
                format!("The attached file was rejected: {}", reason)
            }
            IntakeError::TrackerError { status, .. } => format!(
                "The task-tracking service rejected the request (HTTP {}).",
                status
            ),
            IntakeError::AttachmentFailed { task_id, .. } => format!(
                "Your submission was registered as task {}, but the attachment could not be uploaded.",
                task_id
            ),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            IntakeError::ApiError(_) => "Check network connectivity and the ClickUp base URL.",
            IntakeError::IoError(_) => "Check that the file exists and is readable.",
            IntakeError::SerializationError(_) => "Check the request payload format.",
            IntakeError::ConfigError { .. }
            | IntakeError::MissingConfigError { .. }
            | IntakeError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or environment variables and restart."
            }
            IntakeError::InvalidCnpj { .. } | IntakeError::FormValidation(_) => {
                "Correct the highlighted fields and submit again."
            }
            IntakeError::InvalidAttachment { .. } => {
                "Attach a non-empty file within the upload size limit."
            }
            IntakeError::TrackerError { status: 401, .. } => {
                "Check CLICKUP_API_TOKEN: the token was rejected."
            }
            IntakeError::TrackerError { status: 404, .. } => {
                "Check CLICKUP_LIST_ID: the list was not found."
            }
            IntakeError::TrackerError { .. } => "Retry later; the service may be unavailable.",
            IntakeError::AttachmentFailed { .. } => {
                "Upload the attachment to the existing task manually."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_low_severity() {
        let err = IntakeError::InvalidCnpj {
            value: "123".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_tracker_suggestion_depends_on_status() {
        let unauthorized = IntakeError::TrackerError {
            status: 401,
            code: Some("OAUTH_025".to_string()),
            message: "Oauth token not found".to_string(),
        };
        assert!(unauthorized.recovery_suggestion().contains("CLICKUP_API_TOKEN"));
        assert_eq!(unauthorized.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_attachment_failure_keeps_task_id() {
        let err = IntakeError::AttachmentFailed {
            task_id: "86abc".to_string(),
            source: Box::new(IntakeError::InvalidAttachment {
                reason: "empty".to_string(),
            }),
        };
        assert!(err.to_string().contains("86abc"));
        assert!(err.user_friendly_message().contains("86abc"));
    }
}
