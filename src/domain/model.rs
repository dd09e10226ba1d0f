use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// 比較資料的硬體種類，每種對應一份資料集與一份輸出檔
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Laptop,
    Cpu,
    Gpu,
}

impl ProfileKind {
    pub const ALL: [ProfileKind; 3] = [ProfileKind::Laptop, ProfileKind::Cpu, ProfileKind::Gpu];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Laptop => "laptop",
            ProfileKind::Cpu => "cpu",
            ProfileKind::Gpu => "gpu",
        }
    }

    pub fn default_dataset_file(&self) -> &'static str {
        match self {
            ProfileKind::Laptop => "scraped_data_chunk_final.json",
            ProfileKind::Cpu => "cpu_scraped_data_chunk_final.json",
            ProfileKind::Gpu => "gpu_scraped_data_chunk_final.json",
        }
    }

    pub fn output_file(&self) -> &'static str {
        match self {
            ProfileKind::Laptop => "laptops.json",
            ProfileKind::Cpu => "cpus.json",
            ProfileKind::Gpu => "gpus.json",
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 爬蟲輸出的一筆兩兩比較資料
///
/// 除了 metadata 以外的欄位都是「類別 -> 項目名稱 -> 值」或「項目名稱 -> 值」
/// 的結構，資料未經整理，所以保留為 JSON 值。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonRecord {
    #[serde(default)]
    pub metadata: Option<ComparisonMetadata>,
    #[serde(default)]
    pub images: Option<Map<String, Value>>,
    #[serde(default)]
    pub prices: Option<Map<String, Value>>,
    #[serde(default)]
    pub review_scores: Option<Map<String, Value>>,
    #[serde(default)]
    pub specs: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComparisonMetadata {
    #[serde(default)]
    pub ids: Vec<Value>,
    #[serde(default)]
    pub names: Vec<Value>,
    #[serde(default)]
    pub slugs: Option<Vec<Value>>,
}

impl ComparisonMetadata {
    /// 資料集中的 id 可能是字串或數字，統一成字串；空值視為缺少
    pub fn id_at(&self, index: usize) -> Option<String> {
        match self.ids.get(index)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).and_then(Value::as_str)
    }

    pub fn slug_at(&self, index: usize) -> Option<&str> {
        self.slugs.as_ref()?.get(index).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileImages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
}

/// 去重後的單一項目資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub kind: ProfileKind,
    pub images: ProfileImages,
    pub price: Option<Value>,
    pub scores: BTreeMap<String, Value>,
    /// 規格鍵 -> 依原順序切分後的值
    pub specs: BTreeMap<String, Vec<String>>,
}

/// 某一種類的資料集內容
#[derive(Debug, Clone)]
pub struct SourceBatch {
    pub kind: ProfileKind,
    pub records: Vec<ComparisonRecord>,
}

#[derive(Debug, Clone)]
pub struct ProfileSet {
    pub kind: ProfileKind,
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadSummary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub profile_sets: Vec<ProfileSet>,
    pub images: Option<DownloadSummary>,
}

impl TransformResult {
    pub fn total_profiles(&self) -> usize {
        self.profile_sets.iter().map(|set| set.profiles.len()).sum()
    }
}

/// 每次執行輸出的摘要 (`manifest.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub generated_at: DateTime<Utc>,
    pub profiles: BTreeMap<String, usize>,
    pub images: Option<DownloadSummary>,
    pub output_files: Vec<String>,
}
