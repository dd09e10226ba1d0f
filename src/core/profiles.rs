//! 把兩兩比較資料整理成去重後的單一項目資料
//!
//! 同一個 id 以第一次出現的資料為準，之後重複的直接略過，不做合併。

use crate::core::spec::{clean, Category};
use crate::domain::model::{ComparisonRecord, Profile, ProfileImages, ProfileKind};
use crate::utils::error::{EtlError, Result};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};

const BUILTIN_SPEC_KEYS: &[(&str, Category)] = &[
    ("ram", Category::Ram),
    ("ram-size", Category::Ram),
    ("memory-size", Category::Ram),
    ("storage", Category::Storage),
    ("storage-capacity", Category::Storage),
    ("display", Category::Display),
    ("resolution", Category::Display),
    ("display-resolution", Category::Display),
    ("screen-resolution", Category::Display),
    ("cpu", Category::Cpu),
    ("processor", Category::Cpu),
    ("gpu", Category::Gpu),
    ("graphics", Category::Gpu),
    ("graphics-card", Category::Gpu),
    ("video-card", Category::Gpu),
    ("dimensions", Category::Dimensions),
    ("size", Category::Dimensions),
    ("memory-type", Category::MemoryType),
    ("ram-type", Category::MemoryType),
];

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace(['_', ' '], "-")
}

/// 資料集中的規格鍵 -> 切分類別
#[derive(Debug, Clone)]
pub struct SpecKeyMap {
    keys: HashMap<String, Category>,
}

impl Default for SpecKeyMap {
    fn default() -> Self {
        let keys = BUILTIN_SPEC_KEYS
            .iter()
            .map(|(key, category)| (key.to_string(), *category))
            .collect();
        Self { keys }
    }
}

impl SpecKeyMap {
    /// 在內建對應上加入設定檔的對應；類別名稱無法辨識時回傳錯誤
    pub fn with_overrides<I, K, V>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut map = Self::default();
        for (key, category) in overrides {
            let parsed = category
                .as_ref()
                .parse::<Category>()
                .map_err(|_| EtlError::InvalidConfigValueError {
                    field: format!("specs.categories.{}", key.as_ref()),
                    value: category.as_ref().to_string(),
                    reason: format!(
                        "Unknown spec category. Valid categories: {}",
                        Category::ALL.map(|c| c.as_str()).join(", ")
                    ),
                })?;
            map.keys.insert(normalize_key(key.as_ref()), parsed);
        }
        Ok(map)
    }

    pub fn resolve(&self, key: &str) -> Option<Category> {
        self.keys.get(&normalize_key(key)).copied()
    }
}

/// 依第一次出現為準，組出某一種類的所有項目資料
pub fn assemble_profiles(
    records: &[ComparisonRecord],
    kind: ProfileKind,
    spec_keys: &SpecKeyMap,
) -> Vec<Profile> {
    let mut seen = HashSet::new();
    let mut profiles = Vec::new();
    let mut skipped_records = 0usize;

    for record in records {
        let Some(metadata) = record.metadata.as_ref().filter(|m| m.ids.len() >= 2) else {
            skipped_records += 1;
            continue;
        };

        for index in 0..2 {
            let Some(id) = metadata.id_at(index) else {
                continue;
            };
            if seen.contains(&id) {
                continue;
            }

            let name = metadata.name_at(index).unwrap_or_default();
            let profile = Profile {
                slug: metadata.slug_at(index).map(str::to_string),
                kind,
                images: item_images(record, name),
                price: item_price(record, name),
                scores: item_scores(record, name),
                specs: item_specs(record, name, spec_keys),
                name: name.to_string(),
                id: id.clone(),
            };
            seen.insert(id);
            profiles.push(profile);
        }
    }

    if skipped_records > 0 {
        tracing::debug!(
            "Skipped {} {} records without a complete id pair",
            skipped_records,
            kind
        );
    }
    tracing::info!("Extracted {} unique {} profiles", profiles.len(), kind);
    profiles
}

/// 名稱為空時不做任何查找，避免子字串比對命中所有鍵
fn lookup<'a>(section: Option<&'a Map<String, Value>>, name: &str) -> Option<&'a Value> {
    if name.is_empty() {
        return None;
    }
    section?.get(name)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn item_images(record: &ComparisonRecord, name: &str) -> ProfileImages {
    let main = lookup(record.images.as_ref(), name)
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string);
    ProfileImages { main }
}

fn item_price(record: &ComparisonRecord, name: &str) -> Option<Value> {
    lookup(record.prices.as_ref(), name)
        .filter(|v| is_truthy(v))
        .cloned()
}

/// 評分鍵有時是簡稱，完全比對不到時退回子字串比對 (任一方向)
fn item_scores(record: &ComparisonRecord, name: &str) -> BTreeMap<String, Value> {
    let mut scores = BTreeMap::new();
    if name.is_empty() {
        return scores;
    }
    let Some(review_scores) = record.review_scores.as_ref() else {
        return scores;
    };

    for (category, values) in review_scores {
        let Some(values) = values.as_object() else {
            continue;
        };
        let score = values.get(name).or_else(|| {
            values
                .iter()
                .find(|(key, _)| name.contains(key.as_str()) || key.contains(name))
                .map(|(_, value)| value)
        });
        if let Some(score) = score {
            scores.insert(category.clone(), score.clone());
        }
    }
    scores
}

fn item_specs(
    record: &ComparisonRecord,
    name: &str,
    spec_keys: &SpecKeyMap,
) -> BTreeMap<String, Vec<String>> {
    let mut specs = BTreeMap::new();
    if name.is_empty() {
        return specs;
    }
    let Some(sections) = record.specs.as_ref() else {
        return specs;
    };

    for (key, values) in sections {
        let Some(raw) = values.as_object().and_then(|v| v.get(name)) else {
            continue;
        };
        specs.insert(key.clone(), normalize_spec_value(key, raw, spec_keys));
    }
    specs
}

fn normalize_spec_value(key: &str, raw: &Value, spec_keys: &SpecKeyMap) -> Vec<String> {
    let segment = |text: &str| match spec_keys.resolve(key) {
        Some(category) => category.segment(text),
        None => {
            let cleaned = clean(text);
            if cleaned.is_empty() {
                Vec::new()
            } else {
                vec![cleaned]
            }
        }
    };

    match raw {
        Value::String(s) => segment(s),
        Value::Number(n) => segment(&n.to_string()),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(|s| segment(s))
            .collect(),
        _ => Vec::new(),
    }
}
