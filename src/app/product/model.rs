//! 产品数据模型
//!
//! 目录页和表单页共享的集合结构。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// 存储中未知的字段，原样写回
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    /// 名称是否包含 `filter`（不区分大小写）
    pub fn matches(&self, filter: &str) -> bool {
        self.name.to_lowercase().contains(&filter.to_lowercase())
    }
}

/// 按名称过滤，保持原有顺序；空过滤条件返回全部
pub fn filter_products<'a>(products: &'a [Product], filter: Option<&str>) -> Vec<&'a Product> {
    match filter {
        Some(filter) if !filter.is_empty() => products
            .iter()
            .filter(|product| product.matches(filter))
            .collect(),
        _ => products.iter().collect(),
    }
}

/// 表单提交的产品内容，构造时去掉首尾空白
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct ProductDraft {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

impl ProductDraft {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            description: description.trim().to_string(),
        }
    }

    pub fn validated(self) -> Result<Self, CoreError> {
        self.validate()?;
        Ok(self)
    }
}

/// 生成产品 id：36 进制毫秒时间戳 + 36 进制随机数
pub fn generate_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis().max(0) as u128;
    let random = Uuid::new_v4().as_u128() as u64 as u128;
    format!("{}{}", to_base36(millis), to_base36(random))
}

/// 生成在 `existing` 中不重复的 id
pub fn generate_unique_id(now: DateTime<Utc>, existing: &[Product]) -> String {
    loop {
        let id = generate_id(now);
        if !existing.iter().any(|product| product.id == id) {
            return id;
        }
    }
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// 待确认的删除
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteState {
    #[default]
    Idle,
    PendingConfirmation(String),
}

impl DeleteState {
    pub fn pending_id(&self) -> Option<&str> {
        match self {
            DeleteState::Idle => None,
            DeleteState::PendingConfirmation(id) => Some(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn named(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: "d".to_string(),
            created_at: String::new(),
            updated_at: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_filter_is_case_insensitive_and_ordered() {
        let products = vec![
            named("1", "Blue Widget"),
            named("2", "Gadget"),
            named("3", "widget stand"),
        ];

        let ids: Vec<&str> = filter_products(&products, Some("WIDGET"))
            .iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let products = vec![named("1", "A"), named("2", "B")];
        assert_eq!(filter_products(&products, Some("")).len(), 2);
        assert_eq!(filter_products(&products, None).len(), 2);
        assert!(filter_products(&products, Some("zzz")).is_empty());
    }

    #[test]
    fn test_draft_trims_and_validates() {
        let draft = ProductDraft::new("  Widget ", "\tA small widget\n");
        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.description, "A small widget");
        assert!(draft.validated().is_ok());

        let blank = ProductDraft::new("   ", "desc");
        assert!(matches!(blank.validated(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn test_generated_id_starts_with_time_component() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let id = generate_id(now);
        assert!(id.starts_with(&to_base36(1_700_000_000_000)));
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(generate_id(now), id);
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = r#"{"id":"x","name":"Foo","description":"d","createdAt":"t","sku":"F-1"}"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.extra.get("sku"), Some(&Value::from("F-1")));

        let back: Value = serde_json::to_value(&product).unwrap();
        assert_eq!(back["sku"], "F-1");
        assert!(back.get("updatedAt").is_none());
    }
}
