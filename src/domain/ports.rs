use crate::domain::model::{
    Attachment, AuthorizedUser, NewTask, Task, TaskAttachment, TaskDefaults,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 外部任務追蹤服務（ClickUp）的介面
#[async_trait]
pub trait TaskTracker: Send + Sync {
    async fn create_task(&self, list_id: &str, task: &NewTask) -> Result<Task>;
    async fn create_task_attachment(
        &self,
        task_id: &str,
        attachment: Attachment,
    ) -> Result<TaskAttachment>;
    async fn get_task(&self, task_id: &str) -> Result<Task>;
    async fn get_authorized_user(&self) -> Result<AuthorizedUser>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn api_token(&self) -> &str;
    fn list_id(&self) -> &str;
    fn request_timeout_seconds(&self) -> u64;
    fn max_upload_bytes(&self) -> usize;
    fn task_defaults(&self) -> TaskDefaults;
}
