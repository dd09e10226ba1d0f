//! 遠端圖片下載與路徑改寫
//!
//! 本地檔名取網址路徑最後兩段組成 `{category}-{basename}`，
//! 例如 `/common/images/laptop/xxx.jpeg` -> `laptop-xxx.jpeg`。
//! 檔案已存在就不重抓；單張失敗只記錄與計數，不中斷整批。

use crate::domain::model::{DownloadSummary, Profile};
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};
use reqwest::{Client, StatusCode};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

pub const DEFAULT_HOST_FILTER: &str = "nanoreview.net";
const LOCAL_URL_PREFIX: &str = "/images";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Downloaded,
    AlreadyPresent,
}

pub fn local_image_name(image_url: &str) -> Result<String> {
    let url = Url::parse(image_url)?;
    let parts: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    match parts.as_slice() {
        [.., category, basename] => Ok(format!("{}-{}", category, basename)),
        _ => Err(EtlError::ImageError {
            url: image_url.to_string(),
            reason: "URL path needs at least two segments".to_string(),
        }),
    }
}

pub fn local_image_url(file_name: &str) -> String {
    format!("{}/{}", LOCAL_URL_PREFIX, file_name)
}

/// 收集含有指定主機字串的主圖網址，去重並保留第一次出現的順序
pub fn collect_image_urls<'a, I>(profiles: I, host_filter: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a Profile>,
{
    let mut seen = HashSet::new();
    profiles
        .into_iter()
        .filter_map(|p| p.images.main.as_deref())
        .filter(|url| url.contains(host_filter))
        .filter(|url| seen.insert(url.to_string()))
        .map(str::to_string)
        .collect()
}

/// 把已取得本地檔案的主圖網址改寫為本地路徑，回傳改寫數量
pub fn rewrite_image_paths<'a, I>(profiles: I, resolved: &HashMap<String, String>) -> usize
where
    I: IntoIterator<Item = &'a mut Profile>,
{
    let mut rewritten = 0;
    for profile in profiles {
        let Some(main) = profile.images.main.as_mut() else {
            continue;
        };
        if let Some(local) = resolved.get(main.as_str()) {
            *main = local.clone();
            rewritten += 1;
        }
    }
    rewritten
}

async fn fetch_one<S: Storage>(
    client: &Client,
    storage: &S,
    image_url: &str,
    file_name: &str,
) -> Result<FetchOutcome> {
    if storage.exists(file_name).await? {
        return Ok(FetchOutcome::AlreadyPresent);
    }

    let response = client.get(image_url).send().await?;
    if response.status() != StatusCode::OK {
        return Err(EtlError::ImageError {
            url: image_url.to_string(),
            reason: format!("HTTP {}", response.status().as_u16()),
        });
    }

    let bytes = response.bytes().await?;
    storage.write_file(file_name, &bytes).await?;
    Ok(FetchOutcome::Downloaded)
}

/// 下載圖片到儲存位置 (通常是 `public/images`)
pub struct ImageResolver<S: Storage> {
    storage: S,
    client: Client,
    concurrency: usize,
}

impl<S: Storage + Clone + 'static> ImageResolver<S> {
    pub fn new(storage: S, concurrency: usize) -> Self {
        Self {
            storage,
            client: Client::new(),
            concurrency: concurrency.max(1),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// 下載所有網址，回傳統計與「原網址 -> 本地路徑」對應 (只含本地已有檔案者)。
    ///
    /// 對應到同一個本地檔名的網址只抓第一個，其餘共用同一結果。
    pub async fn download_all(
        &self,
        urls: &[String],
    ) -> (DownloadSummary, HashMap<String, String>) {
        let mut summary = DownloadSummary::default();
        let mut resolved = HashMap::new();
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::new();

        for image_url in urls {
            let file_name = match local_image_name(image_url) {
                Ok(name) => name,
                Err(e) => {
                    tracing::error!("✗ Failed: {} ({})", image_url, e);
                    summary.failed += 1;
                    continue;
                }
            };

            match group_index.get(&file_name) {
                Some(&index) => {
                    tracing::debug!("🔁 Shares local file {}: {}", file_name, image_url);
                    groups[index].1.push(image_url.clone());
                }
                None => {
                    group_index.insert(file_name.clone(), groups.len());
                    groups.push((file_name, vec![image_url.clone()]));
                }
            }
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (file_name, group_urls) in groups {
            let client = self.client.clone();
            let storage = self.storage.clone();
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let outcome = fetch_one(&client, &storage, &group_urls[0], &file_name).await;
                (group_urls, file_name, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (group_urls, file_name, outcome) = match joined {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("✗ Download task aborted: {}", e);
                    summary.failed += 1;
                    continue;
                }
            };

            match outcome {
                Ok(FetchOutcome::Downloaded) => {
                    tracing::info!("✓ Downloaded: {}", file_name);
                    summary.downloaded += 1;
                }
                Ok(FetchOutcome::AlreadyPresent) => {
                    tracing::debug!("✓ Already exists: {}", file_name);
                    summary.skipped += 1;
                }
                Err(e) => {
                    tracing::error!("✗ Failed: {} ({})", group_urls[0], e);
                    summary.failed += 1;
                    continue;
                }
            }

            let local = local_image_url(&file_name);
            for image_url in group_urls {
                resolved.insert(image_url, local.clone());
            }
        }

        tracing::info!(
            "📥 Images: {} downloaded, {} already present, {} failed",
            summary.downloaded,
            summary.skipped,
            summary.failed
        );
        (summary, resolved)
    }
}
