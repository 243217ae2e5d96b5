//! 宽松的反序列化辅助函数
//!
//! 后端的不同接口对同一字段的编码并不一致：
//! - 主键可能是数字，也可能是字符串
//! - 金额字段来自 decimal 列时会以字符串形式返回
//! - 列表与计数器偶尔会返回 `null`
//!
//! 这里统一在反序列化阶段抹平这些差异，视图层只看到一种形态。

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Text(String),
    Int(i64),
    Uint(u64),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Float(f64),
    Text(String),
}

impl NumberRepr {
    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            NumberRepr::Float(v) => Ok(v),
            NumberRepr::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("expected a number, got {:?}", s))),
        }
    }
}

/// 数字或字符串主键，统一为 `String`
pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match IdRepr::deserialize(deserializer)? {
        IdRepr::Text(s) => s,
        IdRepr::Int(v) => v.to_string(),
        IdRepr::Uint(v) => v.to_string(),
    })
}

/// 可选主键
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<IdRepr>::deserialize(deserializer)? {
        None => None,
        Some(IdRepr::Text(s)) => Some(s),
        Some(IdRepr::Int(v)) => Some(v.to_string()),
        Some(IdRepr::Uint(v)) => Some(v.to_string()),
    })
}

/// 数字或数字字符串，`null` 视为 0
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberRepr>::deserialize(deserializer)? {
        Some(repr) => repr.into_f64(),
        None => Ok(0.0),
    }
}

/// 可选数字，空字符串视为缺失
pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberRepr>::deserialize(deserializer)? {
        Some(NumberRepr::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(repr) => repr.into_f64().map(Some),
        None => Ok(None),
    }
}

/// 可选的非负整数（里程等），兼容字符串与浮点
pub fn opt_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_number(deserializer)?.map(|v| v.max(0.0).round() as u64))
}

/// 计数器，`null` 视为 0
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?.max(0.0).round() as u32)
}

/// 字符串或数字（如 "3 days" 或 3），统一为可选字符串
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextRepr {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<TextRepr>::deserialize(deserializer)? {
        Some(TextRepr::Text(s)) if s.trim().is_empty() => None,
        Some(TextRepr::Text(s)) => Some(s),
        Some(TextRepr::Number(n)) => Some(n.to_string()),
        None => None,
    })
}

/// `null` 视为默认值
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 将任意可序列化对象转为 JSON 值，失败时返回 `None`
pub fn to_value<T: Serialize>(value: &T) -> Option<serde_json::Value> {
    serde_json::to_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "id")]
        id: String,
        #[serde(deserialize_with = "number")]
        cost: f64,
        #[serde(default, deserialize_with = "opt_count")]
        mileage: Option<u64>,
        #[serde(default, deserialize_with = "null_as_default")]
        parts: Vec<String>,
    }

    #[test]
    fn test_accepts_mixed_encodings() {
        let row: Row = serde_json::from_value(json!({
            "id": 42,
            "cost": "129.50",
            "mileage": "45000",
            "parts": null
        }))
        .unwrap();

        assert_eq!(row.id, "42");
        assert_eq!(row.cost, 129.5);
        assert_eq!(row.mileage, Some(45000));
        assert!(row.parts.is_empty());
    }

    #[test]
    fn test_rejects_non_numeric_cost() {
        let res: Result<Row, _> = serde_json::from_value(json!({ "id": "a", "cost": "cheap" }));
        assert!(res.is_err());
    }
}
