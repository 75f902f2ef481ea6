use crate::domain::cnpj::Cnpj;
use crate::domain::form::validate_attachment;
use crate::domain::model::{Attachment, CnpjCheck, OnboardingForm, SubmissionReceipt, TaskDefaults};
use crate::domain::ports::{ConfigProvider, TaskTracker};
use crate::utils::error::{IntakeError, Result};
use chrono::Utc;

/// 表單 → ClickUp 任務的轉送服務
pub struct IntakeService<T: TaskTracker> {
    tracker: T,
    list_id: String,
    defaults: TaskDefaults,
    max_upload_bytes: usize,
}

impl<T: TaskTracker> IntakeService<T> {
    pub fn new(tracker: T, list_id: impl Into<String>, defaults: TaskDefaults, max_upload_bytes: usize) -> Self {
        Self {
            tracker,
            list_id: list_id.into(),
            defaults,
            max_upload_bytes,
        }
    }

    pub fn from_config<C: ConfigProvider>(tracker: T, config: &C) -> Self {
        Self::new(
            tracker,
            config.list_id(),
            config.task_defaults(),
            config.max_upload_bytes(),
        )
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn check_identifier(&self, cnpj: &str) -> CnpjCheck {
        match Cnpj::parse(cnpj) {
            Ok(parsed) => CnpjCheck {
                valid: true,
                formatted: Some(parsed.to_string()),
            },
            Err(_) => CnpjCheck {
                valid: false,
                formatted: None,
            },
        }
    }

    pub async fn submit(
        &self,
        form: &OnboardingForm,
        attachment: Option<Attachment>,
    ) -> Result<SubmissionReceipt> {
        let form = form.normalized();

        // 驗證失敗時不呼叫外部服務
        form.validate().map_err(IntakeError::FormValidation)?;
        if let Some(attachment) = &attachment {
            validate_attachment(attachment, self.max_upload_bytes)?;
        }

        let new_task = form.to_new_task(&self.defaults);
        tracing::info!(
            list_id = %self.list_id,
            company = %form.company_name,
            has_attachment = attachment.is_some(),
            "📨 Forwarding onboarding submission"
        );

        let task = self.tracker.create_task(&self.list_id, &new_task).await?;
        tracing::info!(task_id = %task.id, "✅ Task created");

        let attachment_id = match attachment {
            Some(attachment) => {
                let size = attachment.len();
                let uploaded = self
                    .tracker
                    .create_task_attachment(&task.id, attachment)
                    .await
                    .map_err(|e| {
                        tracing::error!(task_id = %task.id, "❌ Attachment upload failed: {}", e);
                        IntakeError::AttachmentFailed {
                            task_id: task.id.clone(),
                            source: Box::new(e),
                        }
                    })?;
                tracing::info!(task_id = %task.id, attachment_id = %uploaded.id, size, "📎 Attachment uploaded");
                Some(uploaded.id)
            }
            None => None,
        };

        Ok(SubmissionReceipt {
            task_id: task.id,
            task_url: task.url,
            attachment_id,
            submitted_at: Utc::now(),
        })
    }
}
