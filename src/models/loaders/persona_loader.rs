use crate::error::{AppError, AppResult, FileError, PersonaError};
use crate::models::persona::PersonaDefinition;
use anyhow::Context;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

/// 解析人设 JSON 文本
///
/// 单个对象得到一个人设；数组中的每个元素都必须是对象
pub fn parse_persona_json(text: &str) -> Result<Vec<PersonaDefinition>, PersonaError> {
    let json: Value = serde_json::from_str(text).map_err(|_| PersonaError::MalformedJson)?;
    personas_from_value(&json)
}

/// 解析人设 TOML 文本
///
/// 支持 `[[personas]]` 表数组，或整个文件就是一个人设
pub fn parse_persona_toml(text: &str) -> Result<Vec<PersonaDefinition>, PersonaError> {
    let table: toml::Table = toml::from_str(text).map_err(|_| PersonaError::MalformedToml)?;
    let json = serde_json::to_value(&table).map_err(|_| PersonaError::InvalidFormat)?;

    match json.get("personas") {
        Some(list @ Value::Array(_)) => personas_from_value(list),
        _ => personas_from_value(&json),
    }
}

fn personas_from_value(json: &Value) -> Result<Vec<PersonaDefinition>, PersonaError> {
    match json {
        Value::Object(_) => Ok(vec![PersonaDefinition::from_loose_json(json)?]),
        Value::Array(items) if !items.is_empty() => items
            .iter()
            .map(PersonaDefinition::from_loose_json)
            .collect(),
        _ => Err(PersonaError::InvalidFormat),
    }
}

/// 小写的文件扩展名
fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

/// 从文件加载人设（.json / .toml，扩展名不区分大小写）
pub async fn load_persona_file(path: &Path) -> AppResult<Vec<PersonaDefinition>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

    let personas = match extension(path).as_deref() {
        Some("json") => parse_persona_json(&content)?,
        Some("toml") => parse_persona_toml(&content)?,
        _ => {
            return Err(FileError::UnsupportedType {
                path: path.display().to_string(),
            }
            .into())
        }
    };

    tracing::debug!("从 {} 读取到 {} 个人设", path.display(), personas.len());
    Ok(personas)
}

/// 从文件夹中加载所有人设文件，单个文件失败只记录警告
pub async fn load_persona_dir(folder_path: &Path) -> anyhow::Result<Vec<PersonaDefinition>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path.display());
    }

    let mut files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path.display()))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if matches!(extension(&path).as_deref(), Some("json") | Some("toml")) {
            files.push(path);
        }
    }
    // 保证导入顺序稳定
    files.sort();

    let mut personas = Vec::new();
    for path in files {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_persona_file(&path).await {
            Ok(loaded) => {
                tracing::info!("成功加载 {} 个人设", loaded.len());
                personas.extend(loaded);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(personas)
}
