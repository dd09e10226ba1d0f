use clap::Parser;
use hwspec_etl::core::ConfigProvider;
use hwspec_etl::utils::error::ErrorSeverity;
use hwspec_etl::utils::{logger, validation::Validate};
use hwspec_etl::{EtlEngine, ImageResolver, LocalStorage, ProfilePipeline, TomlConfig};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Hardware profile ETL with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "etl-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override image download setting from config
    #[arg(long)]
    images: Option<bool>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 載入 TOML 配置 (日誌格式由配置決定，所以先載入)
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(config.log_format(), args.verbose);
    tracing::info!("🚀 Starting TOML-based ETL tool");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(enabled) = args.images {
        if let Some(images) = config.images.as_mut() {
            images.enabled = enabled;
        } else if enabled {
            config.images = Some(hwspec_etl::config::toml_config::ImagesConfig {
                enabled,
                output_dir: None,
                host_filter: None,
                concurrent_requests: None,
                timeout_seconds: None,
            });
        }
        tracing::info!("🔧 Image download overridden to: {}", enabled);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let source = LocalStorage::new(config.source.dataset_dir.clone());
    let sink = LocalStorage::new(config.output_path().to_string());
    let images = config.images_enabled().then(|| {
        (
            config.images_dir().to_string(),
            config.image_host_filter().to_string(),
            config.image_timeout_seconds(),
            config.concurrent_requests(),
        )
    });
    let featured_pairs = config.featured_pairs();

    let mut pipeline =
        ProfilePipeline::new(source, sink, config).with_featured_pairs(featured_pairs);
    if let Some((dir, host, timeout, concurrency)) = images {
        let mut client = reqwest::Client::builder();
        if let Some(seconds) = timeout {
            client = client.timeout(Duration::from_secs(seconds));
        }
        let resolver =
            ImageResolver::new(LocalStorage::new(dir), concurrency).with_client(client.build()?);
        pipeline = pipeline.with_images(resolver, host);
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name,
        config.pipeline.version.as_deref().unwrap_or("-")
    );
    println!("  Datasets: {}", config.source.dataset_dir);
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    println!("  Images: {}", if config.images_enabled() { "download" } else { "skip" });

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Datasets:");
    for (kind, file) in config.dataset_files() {
        println!("  {} <- {}/{}", kind, config.source.dataset_dir, file);
    }

    let overrides = config.spec_key_overrides();
    if !overrides.is_empty() {
        println!();
        println!("🔄 Spec Key Mapping:");
        for (from, to) in overrides {
            println!("  {} -> {}", from, to);
        }
    }

    if config.images_enabled() {
        println!();
        println!("🖼️ Images:");
        println!("  Directory: {}", config.images_dir());
        println!("  Host filter: {}", config.image_host_filter());
        println!("  Concurrent requests: {}", config.concurrent_requests());
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
