use crate::utils::error::{IntakeError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(IntakeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" if url.host_str().is_some() => Ok(()),
            "http" | "https" => Err(IntakeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: "URL has no host".to_string(),
            }),
            scheme => Err(IntakeError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(IntakeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// 附件路徑必須指向一個存在的一般檔案
pub fn validate_attachment_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(IntakeError::InvalidAttachment {
            reason: "attachment path is empty".to_string(),
        });
    }

    if !path.is_file() {
        return Err(IntakeError::InvalidAttachment {
            reason: format!("{} is not a readable file", path.display()),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(IntakeError::InvalidConfigValueError {
            field: field_name.to_string(),
            // 不回顯原始值，避免把 token 之類的內容寫進日誌
            value: String::new(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(IntakeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("clickup.base_url", "https://api.clickup.com/api/v2").is_ok());
        assert!(validate_url("clickup.base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("clickup.base_url", "").is_err());
        assert!(validate_url("clickup.base_url", "invalid-url").is_err());
        assert!(validate_url("clickup.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("task.priority", 2u8, 1, 4).is_ok());
        assert!(validate_range("task.priority", 0u8, 1, 4).is_err());
        assert!(validate_range("task.priority", 5u8, 1, 4).is_err());
    }

    #[test]
    fn test_validate_non_empty_string_hides_value() {
        let err = validate_non_empty_string("clickup.api_token", "   ").unwrap_err();
        match err {
            IntakeError::InvalidConfigValueError { value, .. } => assert!(value.is_empty()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_attachment_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(validate_attachment_path(file.path()).is_ok());

        let dir = tempfile::TempDir::new().unwrap();
        let err = validate_attachment_path(dir.path()).unwrap_err();
        assert!(matches!(err, IntakeError::InvalidAttachment { .. }));
        assert!(validate_attachment_path(&dir.path().join("contrato.pdf")).is_err());
        assert!(validate_attachment_path(Path::new("")).is_err());
    }
}
