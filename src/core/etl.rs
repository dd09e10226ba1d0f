use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting ETL process...");
        self.monitor.log_stats("Start");

        // Extract
        let batches = self.pipeline.extract().await?;
        let record_count: usize = batches.iter().map(|b| b.records.len()).sum();
        tracing::info!(
            "📥 Extracted {} comparison records from {} datasets",
            record_count,
            batches.len()
        );
        self.monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(batches).await?;
        tracing::info!("🔧 Assembled {} unique profiles", result.total_profiles());
        self.monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("💾 Output saved to: {}", output_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
