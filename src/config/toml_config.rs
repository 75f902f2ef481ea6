use crate::adapters::clickup::DEFAULT_BASE_URL;
use crate::domain::model::TaskDefaults;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{IntakeError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
/// ClickUp 單一附件的上限
pub const MAX_UPLOAD_CEILING: usize = 1024 * 1024 * 1024;
const MAX_TIMEOUT_SECONDS: u64 = 300;
const ENV_PLACEHOLDER: &str = r"\$\{([^}]+)\}";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub clickup: ClickUpConfig,
    pub task: TaskConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickUpConfig {
    pub base_url: String,
    pub api_token: String,
    pub list_id: String,
    pub timeout_seconds: u64,
}

impl Default for ClickUpConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: String::new(),
            list_id: String::new(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl std::fmt::Debug for ClickUpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickUpConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &if self.api_token.is_empty() { "" } else { "***" })
            .field("list_id", &self.list_id)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub status: String,
    pub priority: u8,
    pub notify_all: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        let defaults = TaskDefaults::default();
        Self {
            status: defaults.status,
            priority: defaults.priority,
            notify_all: defaults.notify_all,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub json: bool,
}

fn placeholder_regex() -> Result<Regex> {
    Regex::new(ENV_PLACEHOLDER).map_err(|e| IntakeError::ConfigError {
        message: format!("invalid substitution pattern: {}", e),
    })
}

/// 必填欄位；仍留著 ${VAR} 代表環境變數沒有設定，回報變數名稱
fn require(field: &str, value: &str) -> Result<()> {
    if let Some(caps) = placeholder_regex()?.captures(value) {
        return Err(IntakeError::MissingConfigError {
            field: caps[1].to_string(),
        });
    }
    if value.trim().is_empty() {
        return Err(IntakeError::MissingConfigError {
            field: field.to_string(),
        });
    }
    Ok(())
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(IntakeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| IntakeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 只用預設值與環境變數
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// 有設定檔就讀檔，再讓環境變數覆寫
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::from_env());
        };
        let mut config = Self::from_file(path)?;
        config.apply_env();
        Ok(config)
    }

    /// 替換環境變數 (例如 ${CLICKUP_API_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = placeholder_regex()?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("CLICKUP_API_TOKEN") {
            self.clickup.api_token = token;
        }
        if let Ok(list_id) = std::env::var("CLICKUP_LIST_ID") {
            self.clickup.list_id = list_id;
        }
        if let Ok(base_url) = std::env::var("CLICKUP_BASE_URL") {
            self.clickup.base_url = base_url;
        }
        if let Ok(bind) = std::env::var("BOOSTFY_BIND") {
            self.server.bind = bind;
        }
        if let Some(limit) = std::env::var("BOOSTFY_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.server.max_upload_bytes = limit;
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .map_err(|e| IntakeError::InvalidConfigValueError {
                field: "server.bind".to_string(),
                value: self.server.bind.clone(),
                reason: format!("Invalid socket address: {}", e),
            })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        require("clickup.base_url", &self.clickup.base_url)?;
        validate_url("clickup.base_url", &self.clickup.base_url)?;
        require("clickup.api_token", &self.clickup.api_token)?;
        require("clickup.list_id", &self.clickup.list_id)?;
        validate_range(
            "clickup.timeout_seconds",
            self.clickup.timeout_seconds,
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        validate_range("task.priority", self.task.priority, 1, 4)?;
        validate_non_empty_string("task.status", &self.task.status)?;
        validate_range(
            "server.max_upload_bytes",
            self.server.max_upload_bytes,
            1,
            MAX_UPLOAD_CEILING,
        )?;
        self.bind_addr()?;

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn api_base_url(&self) -> &str {
        &self.clickup.base_url
    }

    fn api_token(&self) -> &str {
        &self.clickup.api_token
    }

    fn list_id(&self) -> &str {
        &self.clickup.list_id
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.clickup.timeout_seconds
    }

    fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_bytes
    }

    fn task_defaults(&self) -> TaskDefaults {
        TaskDefaults {
            status: self.task.status.clone(),
            priority: self.task.priority,
            notify_all: self.task.notify_all,
        }
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
