use crate::domain::model::{
    Attachment, AuthorizedUser, NewTask, Task, TaskAttachment,
};
use crate::domain::ports::{ConfigProvider, TaskTracker};
use crate::utils::error::{IntakeError, Result};
use async_trait::async_trait;
use reqwest::{header, multipart, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.clickup.com/api/v2";

/// ClickUp 失敗時的回應格式 `{"err": "...", "ECODE": "..."}`
#[derive(Debug, Deserialize)]
struct ClickUpErrorBody {
    err: String,
    #[serde(rename = "ECODE")]
    ecode: Option<String>,
}

#[derive(Clone)]
pub struct ClickUpClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl std::fmt::Debug for ClickUpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickUpClient")
            .field("base_url", &self.base_url)
            .field("api_token", &"***")
            .finish()
    }
}

impl ClickUpClient {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.api_base_url(),
            config.api_token(),
            Duration::from_secs(config.request_timeout_seconds()),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, &self.api_token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.authorized(request).send().await?;
        tracing::debug!("ClickUp response status: {}", response.status());
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            let body = response.bytes().await?;
            return Ok(serde_json::from_slice(&body)?);
        }

        let text = response.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ClickUpErrorBody>(&text) {
            Ok(body) => (body.ecode, body.err),
            Err(_) if text.trim().is_empty() => (
                None,
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            ),
            Err(_) => (None, text),
        };

        tracing::warn!(
            status = status.as_u16(),
            code = code.as_deref().unwrap_or("-"),
            "ClickUp request failed: {}",
            message
        );

        Err(IntakeError::TrackerError {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

#[async_trait]
impl TaskTracker for ClickUpClient {
    async fn create_task(&self, list_id: &str, task: &NewTask) -> Result<Task> {
        let url = self.url(&format!("/list/{}/task", list_id));
        tracing::debug!(list_id, "Creating ClickUp task");
        self.send(self.client.post(url).json(task)).await
    }

    async fn create_task_attachment(
        &self,
        task_id: &str,
        attachment: Attachment,
    ) -> Result<TaskAttachment> {
        let url = self.url(&format!("/task/{}/attachment", task_id));
        tracing::debug!(
            task_id,
            file_name = %attachment.file_name,
            size = attachment.len(),
            "Uploading ClickUp task attachment"
        );

        let part = multipart::Part::bytes(attachment.bytes)
            .file_name(attachment.file_name)
            .mime_str(&attachment.content_type)?;
        let form = multipart::Form::new().part("attachment", part);

        self.send(self.client.post(url).multipart(form)).await
    }

    async fn get_task(&self, task_id: &str) -> Result<Task> {
        let url = self.url(&format!("/task/{}", task_id));
        self.send(self.client.get(url)).await
    }

    async fn get_authorized_user(&self) -> Result<AuthorizedUser> {
        self.send(self.client.get(self.url("/user"))).await
    }
}
