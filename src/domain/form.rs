use crate::domain::cnpj::{validate_cnpj, Cnpj};
use crate::domain::model::{Attachment, NewTask, OnboardingForm, TaskDefaults};
use crate::utils::error::{IntakeError, Result};
use crate::utils::validation::validate_url;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// 表單上所有欄位錯誤，一次回傳給前端顯示
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// 沒有 scheme 的網址補上 https://
fn website_url(website: &str) -> String {
    if website.contains("://") {
        website.to_string()
    } else {
        format!("https://{}", website)
    }
}

impl OnboardingForm {
    pub fn normalized(&self) -> OnboardingForm {
        OnboardingForm {
            company_name: self.company_name.trim().to_string(),
            cnpj: self.cnpj.trim().to_string(),
            website: self.website.trim().to_string(),
            sector: self.sector.trim().to_string(),
            employees: self.employees.trim().to_string(),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), FormErrors> {
        let mut errors = FormErrors::default();

        if self.company_name.trim().is_empty() {
            errors.push("company_name", "Company name is required");
        }

        let cnpj = self.cnpj.trim();
        if cnpj.is_empty() {
            errors.push("cnpj", "CNPJ is required");
        } else if !validate_cnpj(cnpj) {
            errors.push("cnpj", "CNPJ is not valid");
        }

        let website = self.website.trim();
        if !website.is_empty() && validate_url("website", &website_url(website)).is_err() {
            errors.push("website", "Web site must be a valid http(s) address");
        }

        let employees = self.employees.trim();
        if !employees.is_empty() && employees.parse::<u32>().is_err() {
            errors.push("employees", "Number of employees must be a non-negative whole number");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// 任務描述：每行一個欄位，CNPJ 有效時以標準遮罩顯示
    pub fn task_description(&self) -> String {
        let cnpj = Cnpj::parse(&self.cnpj)
            .map(|c| c.to_string())
            .unwrap_or_else(|_| self.cnpj.clone());
        format!(
            "Company Name: {}\nCNPJ: {}\nWeb Site: {}\nSector: {}\nEmployees: {}",
            self.company_name, cnpj, self.website, self.sector, self.employees
        )
    }

    pub fn to_new_task(&self, defaults: &TaskDefaults) -> NewTask {
        NewTask {
            name: self.company_name.clone(),
            description: self.task_description(),
            status: defaults.status.clone(),
            priority: defaults.priority,
            notify_all: defaults.notify_all,
        }
    }
}

pub fn validate_attachment(attachment: &Attachment, max_bytes: usize) -> Result<()> {
    if attachment.file_name.trim().is_empty() {
        return Err(IntakeError::InvalidAttachment {
            reason: "file name is empty".to_string(),
        });
    }

    if attachment.is_empty() {
        return Err(IntakeError::InvalidAttachment {
            reason: format!("{} is empty", attachment.file_name),
        });
    }

    if attachment.len() > max_bytes {
        return Err(IntakeError::InvalidAttachment {
            reason: format!(
                "{} is {} bytes, limit is {} bytes",
                attachment.file_name,
                attachment.len(),
                max_bytes
            ),
        });
    }

    Ok(())
}
