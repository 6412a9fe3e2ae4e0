use thiserror::Error;

/// 应用程序错误类型
///
/// 所有错误最终都会以 `to_string()` 的形式呈现给用户（CLI 输出或 HTTP `detail` 字段）
#[derive(Debug, Error)]
pub enum AppError {
    /// API 调用错误
    #[error(transparent)]
    Api(#[from] ApiError),
    /// LLM 服务错误
    #[error(transparent)]
    Llm(#[from] LlmError),
    /// 文件操作错误
    #[error(transparent)]
    File(#[from] FileError),
    /// 人设数据错误
    #[error(transparent)]
    Persona(#[from] PersonaError),
    /// 用户输入错误
    #[error(transparent)]
    Input(#[from] InputError),
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// 报告导出错误
    #[error("Failed to export report: {0}")]
    Export(String),
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("Request to {endpoint} failed: {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    /// API 返回非 2xx 状态码
    #[error("{endpoint} responded with status {status}: {body}")]
    BadStatus {
        endpoint: String,
        status: u16,
        body: String,
    },
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("Model call failed ({model}): {message}")]
    ApiCallFailed { model: String, message: String },
    /// 返回内容为空
    #[error("No response from {provider}")]
    EmptyContent { provider: String },
    /// 返回内容不是合法 JSON
    #[error("Model returned invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
    /// 返回的 JSON 不符合响应 schema
    #[error("Model response does not match the report schema: {}", .violations.join("; "))]
    SchemaViolation { violations: Vec<String> },
    /// 缺少 API Key
    #[error("No API key configured for {provider}; set GEMINI_API_KEY or LLM_API_KEY")]
    MissingApiKey { provider: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("Failed to parse TOML file {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 不支持的文件类型
    #[error("Unsupported file type: {path}")]
    UnsupportedType { path: String },
}

/// 人设导入 / 创建错误
///
/// 文案与界面提示保持一致
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PersonaError {
    #[error("Failed to parse JSON file.")]
    MalformedJson,
    #[error("Failed to parse TOML file.")]
    MalformedToml,
    #[error("Invalid persona JSON format.")]
    InvalidFormat,
    #[error("Name and Occupation are required to create a persona.")]
    MissingRequired,
    #[error("No persona at position {index} (roster has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// 运行前的输入校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Campaign pitch must not be empty.")]
    EmptyPitch,
    #[error("At least one persona is required to run a simulation.")]
    NoPersonas,
    #[error("Both Creative A and Creative B images are required.")]
    MissingCreative,
    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件不存在
    #[error("Config file not found: {path}")]
    NotFound { path: String },
    /// 配置值非法
    #[error("Invalid value '{value}' for {key}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(model: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            message: message.to_string(),
        })
    }

    /// 是否属于用户输入类错误（HTTP 层映射为 400）
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Input(_) | AppError::Persona(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
