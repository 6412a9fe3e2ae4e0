use crate::error::{AppError, AppResult, InputError};
use base64::Engine;
use std::path::Path;

/// 待对比的广告创意图片（内联 base64）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreativeImage {
    /// "Creative A" / "Creative B"
    pub label: String,
    pub mime_type: String,
    pub data_base64: String,
}

impl CreativeImage {
    pub fn new(label: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            label: label.into(),
            mime_type: mime_type.into(),
            data_base64: base64::prelude::BASE64_STANDARD.encode(bytes),
        }
    }

    /// 从本地文件读取图片，按扩展名判断 MIME 类型
    pub async fn from_file(label: impl Into<String>, path: &Path) -> AppResult<Self> {
        let mime_type = mime_from_extension(path).ok_or_else(|| {
            InputError::InvalidImage(format!(
                "{} (expected .png, .jpg, .jpeg, .webp or .gif)",
                path.display()
            ))
        })?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        if bytes.is_empty() {
            return Err(InputError::InvalidImage(format!("{} is empty", path.display())).into());
        }

        Ok(Self::new(label, mime_type, &bytes))
    }

    /// 解析 `data:<mime>;base64,<data>` 形式的 data URL
    pub fn from_data_url(label: impl Into<String>, url: &str) -> Result<Self, InputError> {
        let rest = url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| InputError::InvalidImage("expected a data: URL".to_string()))?;
        let (meta, data) = rest
            .split_once(',')
            .ok_or_else(|| InputError::InvalidImage("data URL has no payload".to_string()))?;
        let mime_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| InputError::InvalidImage("data URL must be base64 encoded".to_string()))?;

        if !mime_type.starts_with("image/") {
            return Err(InputError::InvalidImage(format!("unsupported type {mime_type}")));
        }
        base64::prelude::BASE64_STANDARD
            .decode(data)
            .map_err(|e| InputError::InvalidImage(e.to_string()))?;

        Ok(Self {
            label: label.into(),
            mime_type: mime_type.to_string(),
            data_base64: data.to_string(),
        })
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data_base64)
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
