use crate::core::images::{collect_image_urls, rewrite_image_paths, ImageResolver};
use crate::core::pairs::comparison_pairs;
use crate::core::profiles::{assemble_profiles, SpecKeyMap};
use crate::core::{ConfigProvider, Pipeline, Storage, TransformResult};
use crate::domain::model::{ComparisonRecord, ProfileSet, RunManifest, SourceBatch};
use crate::utils::error::{EtlError, Result};
use std::collections::BTreeMap;

const CSV_FILE: &str = "profiles.csv";
const COMPARISONS_FILE: &str = "comparisons.json";
const MANIFEST_FILE: &str = "manifest.json";

struct ImageStage<S: Storage> {
    resolver: ImageResolver<S>,
    host_filter: String,
}

/// 讀取爬蟲資料集 -> 去重並正規化規格 -> 寫出各種類的 JSON
pub struct ProfilePipeline<S: Storage, C: ConfigProvider> {
    source: S,
    sink: S,
    config: C,
    images: Option<ImageStage<S>>,
    featured_pairs: usize,
}

impl<S: Storage + Clone + 'static, C: ConfigProvider> ProfilePipeline<S, C> {
    pub fn new(source: S, sink: S, config: C) -> Self {
        Self {
            source,
            sink,
            config,
            images: None,
            featured_pairs: 0,
        }
    }

    /// 啟用圖片下載；只處理網址含 `host_filter` 的主圖
    pub fn with_images(
        mut self,
        resolver: ImageResolver<S>,
        host_filter: impl Into<String>,
    ) -> Self {
        self.images = Some(ImageStage {
            resolver,
            host_filter: host_filter.into(),
        });
        self
    }

    /// 每種類額外輸出的循環比較配對數量，0 表示不輸出
    pub fn with_featured_pairs(mut self, count: usize) -> Self {
        self.featured_pairs = count;
        self
    }

    /// 逐筆解析資料集；單筆格式不符只略過該筆
    async fn read_dataset(&self, file: &str) -> Result<Vec<ComparisonRecord>> {
        let bytes = self.source.read_file(file).await?;
        let raw: Vec<serde_json::Value> = serde_json::from_slice(&bytes)?;

        let total = raw.len();
        let records: Vec<ComparisonRecord> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("⚠️ Skipping malformed record #{} in {}: {}", index, file, e);
                    None
                }
            })
            .collect();

        tracing::debug!("Parsed {}/{} records from {}", records.len(), total, file);
        Ok(records)
    }

    fn profiles_csv(profile_sets: &[ProfileSet]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["id", "name", "slug", "type", "price", "image"])?;

        for profile in profile_sets.iter().flat_map(|set| &set.profiles) {
            let price = match &profile.price {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            writer.write_record([
                profile.id.as_str(),
                profile.name.as_str(),
                profile.slug.as_deref().unwrap_or(""),
                profile.kind.as_str(),
                price.as_str(),
                profile.images.main.as_deref().unwrap_or(""),
            ])?;
        }

        writer.into_inner().map_err(|e| EtlError::ProcessingError {
            message: format!("Failed to flush CSV output: {}", e),
        })
    }

    fn featured_comparisons(
        &self,
        profile_sets: &[ProfileSet],
    ) -> BTreeMap<String, Vec<(String, String)>> {
        profile_sets
            .iter()
            .map(|set| {
                let ids: Vec<String> = set.profiles.iter().map(|p| p.id.clone()).collect();
                (
                    set.kind.as_str().to_string(),
                    comparison_pairs(&ids, self.featured_pairs),
                )
            })
            .collect()
    }

    fn wants_format(&self, format: &str) -> bool {
        self.config.output_formats().iter().any(|f| f == format)
    }
}

#[async_trait::async_trait]
impl<S: Storage + Clone + 'static, C: ConfigProvider> Pipeline for ProfilePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<SourceBatch>> {
        let mut batches = Vec::new();

        for (kind, file) in self.config.dataset_files() {
            tracing::info!("📂 Processing {} from {}...", kind, file);
            // 單一資料集失敗不影響其他種類
            let records = match self.read_dataset(&file).await {
                Ok(records) => records,
                Err(e) => {
                    tracing::error!("❌ Error processing {}: {}", file, e);
                    Vec::new()
                }
            };
            batches.push(SourceBatch { kind, records });
        }

        Ok(batches)
    }

    async fn transform(&self, data: Vec<SourceBatch>) -> Result<TransformResult> {
        let spec_keys = SpecKeyMap::with_overrides(self.config.spec_key_overrides())?;

        let mut profile_sets: Vec<ProfileSet> = data
            .into_iter()
            .map(|batch| ProfileSet {
                kind: batch.kind,
                profiles: assemble_profiles(&batch.records, batch.kind, &spec_keys),
            })
            .collect();

        let images = match &self.images {
            Some(stage) => {
                let urls = collect_image_urls(
                    profile_sets.iter().flat_map(|set| &set.profiles),
                    &stage.host_filter,
                );
                tracing::info!("🔍 Found {} unique image URLs", urls.len());

                let (summary, resolved) = stage.resolver.download_all(&urls).await;
                let rewritten = rewrite_image_paths(
                    profile_sets.iter_mut().flat_map(|set| set.profiles.iter_mut()),
                    &resolved,
                );
                tracing::info!("📝 Rewrote {} image references to local paths", rewritten);
                Some(summary)
            }
            None => None,
        };

        Ok(TransformResult {
            profile_sets,
            images,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let mut output_files = Vec::new();

        if self.wants_format("json") {
            for set in &result.profile_sets {
                let json = serde_json::to_vec_pretty(&set.profiles)?;
                self.sink.write_file(set.kind.output_file(), &json).await?;
                tracing::info!(
                    "✓ Wrote {} {} profiles to {}",
                    set.profiles.len(),
                    set.kind,
                    set.kind.output_file()
                );
                output_files.push(set.kind.output_file().to_string());
            }
        }

        if self.wants_format("csv") {
            let data = Self::profiles_csv(&result.profile_sets)?;
            self.sink.write_file(CSV_FILE, &data).await?;
            output_files.push(CSV_FILE.to_string());
        }

        if self.featured_pairs > 0 {
            let comparisons = self.featured_comparisons(&result.profile_sets);
            let json = serde_json::to_vec_pretty(&comparisons)?;
            self.sink.write_file(COMPARISONS_FILE, &json).await?;
            output_files.push(COMPARISONS_FILE.to_string());
        }

        let manifest = RunManifest {
            generated_at: chrono::Utc::now(),
            profiles: result
                .profile_sets
                .iter()
                .map(|set| (set.kind.as_str().to_string(), set.profiles.len()))
                .collect(),
            images: result.images,
            output_files,
        };
        self.sink
            .write_file(MANIFEST_FILE, &serde_json::to_vec_pretty(&manifest)?)
            .await?;

        tracing::debug!("Manifest written with {} output files", manifest.output_files.len());
        Ok(self.config.output_path().to_string())
    }
}
