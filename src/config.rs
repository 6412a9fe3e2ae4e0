use crate::error::{AppError, AppResult, ConfigError, FileError};
use serde::Deserialize;
use std::path::Path;

/// 模型提供方
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Google Gemini 原生 generateContent 接口
    Gemini,
    /// 兼容 OpenAI Chat Completions 的服务
    #[serde(alias = "openai-compatible")]
    OpenAi,
}

impl LlmProvider {
    pub fn name(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "Gemini",
            LlmProvider::OpenAi => "OpenAI-compatible API",
        }
    }

    /// 未显式配置时使用的接口地址
    pub fn default_base_url(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "https://generativelanguage.googleapis.com",
            LlmProvider::OpenAi => "https://api.openai.com/v1",
        }
    }

    /// 未显式配置时使用的模型
    pub fn default_model(self) -> &'static str {
        match self {
            LlmProvider::Gemini => "gemini-2.5-flash",
            LlmProvider::OpenAi => "gpt-4o-mini",
        }
    }

    /// 读取 API Key 的环境变量，按优先级排列
    fn api_key_vars(self) -> [&'static str; 2] {
        match self {
            LlmProvider::Gemini => ["GEMINI_API_KEY", "LLM_API_KEY"],
            LlmProvider::OpenAi => ["LLM_API_KEY", "GEMINI_API_KEY"],
        }
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(LlmProvider::Gemini),
            "openai" | "openai-compatible" => Ok(LlmProvider::OpenAi),
            other => Err(ConfigError::InvalidValue {
                key: "llm_provider".to_string(),
                value: other.to_string(),
                expected: "gemini | openai".to_string(),
            }),
        }
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_provider: LlmProvider,
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- 本地后端配置 ---
    /// 本地模拟服务地址（`POST {backend_url}/api/simulate`）
    pub backend_url: String,
    /// 是否优先尝试本地后端
    pub use_local_backend: bool,
    // --- 服务端配置 ---
    pub server_host: String,
    pub server_port: u16,
    /// 报告导出目录
    pub output_dir: String,
    /// 单次 HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::for_provider(LlmProvider::Gemini)
    }
}

/// TOML 配置文件（所有字段可选）
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    llm_provider: Option<LlmProvider>,
    llm_api_key: Option<String>,
    llm_api_base_url: Option<String>,
    llm_model_name: Option<String>,
    backend_url: Option<String>,
    use_local_backend: Option<bool>,
    server_host: Option<String>,
    server_port: Option<u16>,
    output_dir: Option<String>,
    request_timeout_secs: Option<u64>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 指定提供方的默认配置（接口地址与模型随提供方变化）
    pub fn for_provider(provider: LlmProvider) -> Self {
        Self {
            llm_provider: provider,
            llm_api_key: String::new(),
            llm_api_base_url: provider.default_base_url().to_string(),
            llm_model_name: provider.default_model().to_string(),
            backend_url: "http://localhost:8000".to_string(),
            use_local_backend: true,
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            output_dir: "reports".to_string(),
            request_timeout_secs: 120,
            verbose_logging: false,
        }
    }

    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 读取可选的 TOML 配置文件，再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound {
                        path: path.display().to_string(),
                    }
                    .into());
                }
                let content = std::fs::read_to_string(path)
                    .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
                Self::from_toml_str(&content).map_err(|source| FileError::TomlParseFailed {
                    path: path.display().to_string(),
                    source,
                })?
            }
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文本构建配置（未出现的字段取所选提供方的默认值）
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;
        let default = Self::for_provider(file.llm_provider.unwrap_or(LlmProvider::Gemini));
        Ok(Self {
            llm_provider: default.llm_provider,
            llm_api_key: file.llm_api_key.unwrap_or(default.llm_api_key),
            llm_api_base_url: file.llm_api_base_url.unwrap_or(default.llm_api_base_url),
            llm_model_name: file.llm_model_name.unwrap_or(default.llm_model_name),
            backend_url: file.backend_url.unwrap_or(default.backend_url),
            use_local_backend: file.use_local_backend.unwrap_or(default.use_local_backend),
            server_host: file.server_host.unwrap_or(default.server_host),
            server_port: file.server_port.unwrap_or(default.server_port),
            output_dir: file.output_dir.unwrap_or(default.output_dir),
            request_timeout_secs: file
                .request_timeout_secs
                .unwrap_or(default.request_timeout_secs),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
        })
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// 用外部键值覆盖配置（空值视为未设置）
    ///
    /// 切换提供方时，仍是旧提供方默认值的接口地址与模型会一并切换
    fn with_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = env("LLM_PROVIDER")
            .and_then(|v| v.parse().ok())
            .unwrap_or(self.llm_provider);
        let [primary_key, fallback_key] = provider.api_key_vars();

        let base_url = if self.llm_api_base_url == self.llm_provider.default_base_url() {
            provider.default_base_url().to_string()
        } else {
            self.llm_api_base_url
        };
        let model = if self.llm_model_name == self.llm_provider.default_model() {
            provider.default_model().to_string()
        } else {
            self.llm_model_name
        };

        Self {
            llm_provider: provider,
            llm_api_key: env(primary_key).or_else(|| env(fallback_key)).unwrap_or(self.llm_api_key),
            llm_api_base_url: env("LLM_API_BASE_URL").unwrap_or(base_url),
            llm_model_name: env("LLM_MODEL_NAME").unwrap_or(model),
            backend_url: env("BACKEND_URL").unwrap_or(self.backend_url),
            use_local_backend: env("USE_LOCAL_BACKEND").and_then(|v| v.parse().ok()).unwrap_or(self.use_local_backend),
            server_host: env("SERVER_HOST").unwrap_or(self.server_host),
            server_port: env("SERVER_PORT").and_then(|v| v.parse().ok()).unwrap_or(self.server_port),
            output_dir: env("OUTPUT_DIR").unwrap_or(self.output_dir),
            request_timeout_secs: env("REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            verbose_logging: env("VERBOSE_LOGGING").and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
        }
    }

    /// 直接调用模型前检查 API Key
    pub fn require_api_key(&self) -> AppResult<&str> {
        if self.llm_api_key.trim().is_empty() {
            return Err(crate::error::LlmError::MissingApiKey {
                provider: self.llm_provider.name().to_string(),
            }
            .into());
        }
        Ok(&self.llm_api_key)
    }
}
