use crate::error::PersonaError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 缺省字段的占位值
pub const UNKNOWN: &str = "Unknown";
/// 缺省年龄
pub const DEFAULT_AGE: u32 = 30;

/// 合成消费者人设，作为 prompt 上下文发送给模型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaDefinition {
    pub name: String,
    pub age: u32,
    pub occupation: String,
    pub location: String,
    pub income: String,
    pub personality: String,
    pub spending_habits: String,
}

impl PersonaDefinition {
    /// 按宽松规则把任意 JSON 对象映射为人设
    ///
    /// 每个字段依次尝试若干别名，空字符串视为缺失，最终回落到 `"Unknown"`
    pub fn from_loose_json(value: &Value) -> Result<Self, PersonaError> {
        let obj = value.as_object().ok_or(PersonaError::InvalidFormat)?;

        let pick = |keys: &[&str]| -> String {
            keys.iter()
                .filter_map(|k| obj.get(*k))
                .find_map(loose_string)
                .unwrap_or_else(|| UNKNOWN.to_string())
        };

        Ok(Self {
            name: pick(&["name", "fullName"]),
            age: obj.get("age").and_then(loose_age).unwrap_or(DEFAULT_AGE),
            occupation: pick(&["occupation", "job", "role", "title"]),
            location: pick(&["location", "city", "address"]),
            income: pick(&["income", "salary", "revenue"]),
            personality: pick(&["personality", "traits", "character"]),
            spending_habits: pick(&["spending_habits", "spendingHabits", "habits"]),
        })
    }
}

/// 字符串 / 数字 / 布尔值转成非空文本，其余类型视为缺失
fn loose_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// 年龄接受数字或数字字符串，0 视为缺失
fn loose_age(value: &Value) -> Option<u32> {
    let age = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    u32::try_from(age).ok().filter(|age| *age > 0)
}

/// 手动创建人设时的表单草稿
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonaDraft {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub income: Option<String>,
    pub personality: Option<String>,
    pub spending_habits: Option<String>,
}

impl PersonaDraft {
    /// 校验并补全为完整人设
    ///
    /// 名称与职业必填，其余字段缺省为 `"Unknown"`，年龄缺省为 30
    pub fn into_persona(self) -> Result<PersonaDefinition, PersonaError> {
        let filled = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let name = filled(self.name).ok_or(PersonaError::MissingRequired)?;
        let occupation = filled(self.occupation).ok_or(PersonaError::MissingRequired)?;
        let or_unknown = |v: Option<String>| filled(v).unwrap_or_else(|| UNKNOWN.to_string());

        Ok(PersonaDefinition {
            name,
            age: self.age.filter(|a| *a > 0).unwrap_or(DEFAULT_AGE),
            occupation,
            location: or_unknown(self.location),
            income: or_unknown(self.income),
            personality: or_unknown(self.personality),
            spending_habits: or_unknown(self.spending_habits),
        })
    }
}

/// 会话内的人设列表（仅存在于内存）
#[derive(Debug, Clone, Default)]
pub struct PersonaRoster {
    personas: Vec<PersonaDefinition>,
}

impl PersonaRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// 内置的八位加州消费者人设
    pub fn with_defaults() -> Self {
        Self {
            personas: crate::models::defaults::default_personas(),
        }
    }

    pub fn add(&mut self, persona: PersonaDefinition) {
        self.personas.push(persona);
    }

    pub fn extend(&mut self, personas: impl IntoIterator<Item = PersonaDefinition>) {
        self.personas.extend(personas);
    }

    /// 从表单草稿创建并加入列表
    pub fn create(&mut self, draft: PersonaDraft) -> Result<&PersonaDefinition, PersonaError> {
        let persona = draft.into_persona()?;
        self.personas.push(persona);
        Ok(&self.personas[self.personas.len() - 1])
    }

    /// 按位置删除
    pub fn remove(&mut self, index: usize) -> Result<PersonaDefinition, PersonaError> {
        if index >= self.personas.len() {
            return Err(PersonaError::IndexOutOfRange {
                index,
                len: self.personas.len(),
            });
        }
        Ok(self.personas.remove(index))
    }

    /// 导入一段 JSON 文本，返回新增数量
    pub fn import_str(&mut self, text: &str) -> Result<usize, PersonaError> {
        let imported = crate::models::loaders::parse_persona_json(text)?;
        let count = imported.len();
        self.personas.extend(imported);
        Ok(count)
    }

    pub fn get(&self, index: usize) -> Option<&PersonaDefinition> {
        self.personas.get(index)
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersonaDefinition> {
        self.personas.iter()
    }

    pub fn as_slice(&self) -> &[PersonaDefinition] {
        &self.personas
    }
}
