use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 前端表單送出的公司資料，欄位名稱與 HTML 表單一致
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingForm {
    #[serde(alias = "companyName")]
    pub company_name: String,
    pub cnpj: String,
    #[serde(alias = "webSite")]
    pub website: String,
    pub sector: String,
    pub employees: String,
}

/// 使用者上傳的附件
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// 建立任務時套用的預設值
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDefaults {
    pub status: String,
    pub priority: u8,
    pub notify_all: bool,
}

impl Default for TaskDefaults {
    fn default() -> Self {
        Self {
            status: "to do".to_string(),
            priority: 2,
            notify_all: true,
        }
    }
}

/// `POST /list/{list_id}/task` 的請求內容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub name: String,
    pub description: String,
    pub status: String,
    pub priority: u8,
    pub notify_all: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub status: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAttachment {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerUser {
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// `GET /user` 回應外層
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedUser {
    pub user: TrackerUser,
}

/// 一次成功送出的結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub task_id: String,
    pub task_url: Option<String>,
    pub attachment_id: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnpjCheck {
    pub valid: bool,
    pub formatted: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_accepts_browser_field_names() {
        let form: OnboardingForm = serde_json::from_value(serde_json::json!({
            "companyName": "Padaria Central",
            "cnpj": "11.222.333/0001-81",
            "webSite": "padariacentral.com.br"
        }))
        .unwrap();
        assert_eq!(form.company_name, "Padaria Central");
        assert_eq!(form.website, "padariacentral.com.br");
        assert!(form.sector.is_empty());
    }

    #[test]
    fn test_task_deserializes_clickup_shape() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": "86a1b2c3",
            "name": "Padaria Central",
            "url": "https://app.clickup.com/t/86a1b2c3",
            "status": {"status": "to do", "color": "#d3d3d3", "type": "open"},
            "priority": {"id": "2", "priority": "high"}
        }))
        .unwrap();
        assert_eq!(task.id, "86a1b2c3");
        assert_eq!(task.status.unwrap().status, "to do");
    }

    #[test]
    fn test_attachment_debug_omits_bytes() {
        let attachment = Attachment::new("anexo.txt", "text/plain", b"Ola Mundo".to_vec());
        let debug = format!("{:?}", attachment);
        assert!(debug.contains("size: 9"));
        assert!(!debug.contains("Ola"));
    }
}
