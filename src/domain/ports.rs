use crate::domain::model::{ProfileKind, SourceBatch, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    /// 要讀取的資料集檔案 (相對於來源儲存)
    fn dataset_files(&self) -> Vec<(ProfileKind, String)>;
    fn output_formats(&self) -> &[String];
    /// 額外的規格鍵對應，(來源鍵, 類別名稱)
    fn spec_key_overrides(&self) -> Vec<(String, String)>;
    fn concurrent_requests(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceBatch>>;
    async fn transform(&self, data: Vec<SourceBatch>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
