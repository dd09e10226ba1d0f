//! 規格字串正規化：清理 + 依類別切分
//!
//! 爬下來的規格欄位常把多個設定選項黏在一起 (例如 "16GB8GB")，
//! 這裡把它們拆回有序的值清單，順序即設定選項的順序。

pub mod clean;
pub mod segment;

pub use clean::{clean, clean_opt};
pub use segment::{
    split_cpu, split_dimensions, split_display, split_gpu, split_memory_types, split_ram,
    split_storage,
};

use crate::utils::error::EtlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 規格類別，決定套用哪一種切分規則
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Ram,
    Storage,
    Display,
    Cpu,
    Gpu,
    Dimensions,
    MemoryType,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Ram,
        Category::Storage,
        Category::Display,
        Category::Cpu,
        Category::Gpu,
        Category::Dimensions,
        Category::MemoryType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ram => "ram",
            Category::Storage => "storage",
            Category::Display => "display",
            Category::Cpu => "cpu",
            Category::Gpu => "gpu",
            Category::Dimensions => "dimensions",
            Category::MemoryType => "memory-type",
        }
    }

    /// 清理並切分原始規格字串
    pub fn segment(&self, raw: &str) -> Vec<String> {
        match self {
            Category::Ram => split_ram(raw),
            Category::Storage => split_storage(raw),
            Category::Display => split_display(raw),
            Category::Cpu => split_cpu(raw),
            Category::Gpu => split_gpu(raw),
            Category::Dimensions => split_dimensions(raw),
            Category::MemoryType => split_memory_types(raw),
        }
    }

    pub fn segment_opt(&self, raw: Option<&str>) -> Vec<String> {
        raw.map(|s| self.segment(s)).unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = EtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == key)
            .ok_or_else(|| EtlError::ValidationError {
                message: format!("Unknown spec category: {}", s),
            })
    }
}
