use clap::Parser;
use hwspec_etl::utils::error::ErrorSeverity;
use hwspec_etl::utils::{logger, validation::Validate};
use hwspec_etl::{CliConfig, EtlEngine, ImageResolver, LocalStorage, ProfilePipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting hwspec-etl CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 建立儲存與管道
    let source = LocalStorage::new(config.dataset_dir.clone());
    let sink = LocalStorage::new(config.output_path.clone());
    let download_images = config.download_images;
    let images_dir = config.images_dir.clone();
    let image_host = config.image_host.clone();
    let concurrent_requests = config.concurrent_requests;
    let featured_pairs = config.featured_pairs;

    let mut pipeline =
        ProfilePipeline::new(source, sink, config).with_featured_pairs(featured_pairs);
    if download_images {
        tracing::info!("🖼️ Image download enabled -> {}", images_dir);
        let resolver = ImageResolver::new(LocalStorage::new(images_dir), concurrent_requests);
        pipeline = pipeline.with_images(resolver, image_host);
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
