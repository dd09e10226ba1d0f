pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, ProfileKind};
#[cfg(feature = "cli")]
use crate::utils::error::{EtlError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

/// 把 "來源鍵=類別" 拆開，例如 "Screen=display"
pub fn parse_spec_key(entry: &str) -> Option<(String, String)> {
    let (key, category) = entry.split_once('=')?;
    let (key, category) = (key.trim(), category.trim());
    if key.is_empty() || category.is_empty() {
        return None;
    }
    Some((key.to_string(), category.to_string()))
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "hwspec-etl")]
#[command(about = "Normalize scraped hardware comparison data into per-item profiles")]
pub struct CliConfig {
    /// Directory holding the scraped comparison datasets
    #[arg(long, default_value = "../whole-dataset")]
    pub dataset_dir: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "scraped_data_chunk_final.json")]
    pub laptop_file: String,

    #[arg(long, default_value = "cpu_scraped_data_chunk_final.json")]
    pub cpu_file: String,

    #[arg(long, default_value = "gpu_scraped_data_chunk_final.json")]
    pub gpu_file: String,

    #[arg(long, value_delimiter = ',', default_value = "json")]
    pub output_formats: Vec<String>,

    /// Extra spec key mappings, e.g. "Screen=display,Chip=cpu"
    #[arg(long, value_delimiter = ',')]
    pub spec_keys: Vec<String>,

    #[arg(long, help = "Download remote images and rewrite references to local paths")]
    pub download_images: bool,

    #[arg(long, default_value = "./public/images")]
    pub images_dir: String,

    #[arg(long, default_value = crate::core::images::DEFAULT_HOST_FILTER)]
    pub image_host: String,

    #[arg(long, default_value = "5")]
    pub concurrent_requests: usize,

    /// Number of cyclic comparison pairs to emit per kind (0 disables)
    #[arg(long, default_value = "0")]
    pub featured_pairs: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log per-phase CPU and memory usage")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn dataset_files(&self) -> Vec<(ProfileKind, String)> {
        vec![
            (ProfileKind::Laptop, self.laptop_file.clone()),
            (ProfileKind::Cpu, self.cpu_file.clone()),
            (ProfileKind::Gpu, self.gpu_file.clone()),
        ]
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn spec_key_overrides(&self) -> Vec<(String, String)> {
        self.spec_keys
            .iter()
            .filter_map(|entry| parse_spec_key(entry))
            .collect()
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("dataset_dir", &self.dataset_dir)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;
        validation::validate_positive_number("concurrent_requests", self.concurrent_requests, 1)?;

        for entry in &self.spec_keys {
            if parse_spec_key(entry).is_none() {
                return Err(EtlError::InvalidConfigValueError {
                    field: "spec_keys".to_string(),
                    value: entry.clone(),
                    reason: "Expected KEY=CATEGORY".to_string(),
                });
            }
        }
        crate::core::profiles::SpecKeyMap::with_overrides(self.spec_key_overrides())?;

        if self.download_images {
            validation::validate_path("images_dir", &self.images_dir)?;
            validation::validate_host_filter("image_host", &self.image_host)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["hwspec-etl"]);
        assert_eq!(config.output_formats, vec!["json"]);
        assert_eq!(config.image_host, "nanoreview.net");
        assert!(!config.download_images);
        assert_eq!(config.dataset_files().len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_spec_keys_and_formats() {
        let config = CliConfig::parse_from([
            "hwspec-etl",
            "--output-formats",
            "json,csv",
            "--spec-keys",
            "Screen=display,Chip=cpu",
        ]);
        assert_eq!(config.output_formats, vec!["json", "csv"]);
        assert_eq!(
            config.spec_key_overrides(),
            vec![
                ("Screen".to_string(), "display".to_string()),
                ("Chip".to_string(), "cpu".to_string()),
            ]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_validation_failures() {
        let bad_entry = CliConfig::parse_from(["hwspec-etl", "--spec-keys", "Screen"]);
        assert!(bad_entry.validate().is_err());

        let bad_category = CliConfig::parse_from(["hwspec-etl", "--spec-keys", "Screen=panel"]);
        assert!(bad_category.validate().is_err());

        let bad_format = CliConfig::parse_from(["hwspec-etl", "--output-formats", "xml"]);
        assert!(bad_format.validate().is_err());

        let no_workers = CliConfig::parse_from(["hwspec-etl", "--concurrent-requests", "0"]);
        assert!(no_workers.validate().is_err());
    }

    #[test]
    fn test_parse_spec_key() {
        assert_eq!(
            parse_spec_key(" Memory type = memory-type "),
            Some(("Memory type".to_string(), "memory-type".to_string()))
        );
        assert_eq!(parse_spec_key("=gpu"), None);
        assert_eq!(parse_spec_key("gpu"), None);
    }
}
