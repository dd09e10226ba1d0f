use crate::core::images::DEFAULT_HOST_FILTER;
use crate::core::profiles::SpecKeyMap;
use crate::core::{ConfigProvider, ProfileKind};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

// ${VAR_NAME}
static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex must compile"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub specs: Option<SpecsConfig>,
    pub images: Option<ImagesConfig>,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub dataset_dir: String,
    pub laptop_file: Option<String>,
    pub cpu_file: Option<String>,
    pub gpu_file: Option<String>,
    /// 只處理這些種類；未設定則三種都處理
    pub kinds: Option<Vec<ProfileKind>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecsConfig {
    /// 資料集規格鍵 -> 類別名稱
    pub categories: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    pub enabled: bool,
    pub output_dir: Option<String>,
    pub host_filter: Option<String>,
    pub concurrent_requests: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub featured_pairs: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數；未定義的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("pipeline.name", &self.pipeline.name)?;
        validation::validate_path("source.dataset_dir", &self.source.dataset_dir)?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if self.source.kinds.as_ref().is_some_and(|kinds| kinds.is_empty()) {
            return Err(EtlError::InvalidConfigValueError {
                field: "source.kinds".to_string(),
                value: "[]".to_string(),
                reason: "At least one kind must be selected".to_string(),
            });
        }

        SpecKeyMap::with_overrides(self.spec_key_overrides())?;

        if let Some(images) = self.images.as_ref().filter(|i| i.enabled) {
            if let Some(dir) = &images.output_dir {
                validation::validate_path("images.output_dir", dir)?;
            }
            if let Some(host) = &images.host_filter {
                validation::validate_host_filter("images.host_filter", host)?;
            }
            if let Some(concurrent) = images.concurrent_requests {
                validation::validate_positive_number("images.concurrent_requests", concurrent, 1)?;
            }
        }

        Ok(())
    }

    pub fn dataset_file(&self, kind: ProfileKind) -> String {
        let configured = match kind {
            ProfileKind::Laptop => &self.source.laptop_file,
            ProfileKind::Cpu => &self.source.cpu_file,
            ProfileKind::Gpu => &self.source.gpu_file,
        };
        configured
            .clone()
            .unwrap_or_else(|| kind.default_dataset_file().to_string())
    }

    pub fn images_enabled(&self) -> bool {
        self.images.as_ref().map(|i| i.enabled).unwrap_or(false)
    }

    pub fn images_dir(&self) -> &str {
        self.images
            .as_ref()
            .and_then(|i| i.output_dir.as_deref())
            .unwrap_or("./public/images")
    }

    pub fn image_host_filter(&self) -> &str {
        self.images
            .as_ref()
            .and_then(|i| i.host_filter.as_deref())
            .unwrap_or(DEFAULT_HOST_FILTER)
    }

    pub fn image_timeout_seconds(&self) -> Option<u64> {
        self.images.as_ref().and_then(|i| i.timeout_seconds)
    }

    pub fn featured_pairs(&self) -> usize {
        self.load.featured_pairs.unwrap_or(0)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_format(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_format.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn dataset_files(&self) -> Vec<(ProfileKind, String)> {
        let kinds = self
            .source
            .kinds
            .clone()
            .unwrap_or_else(|| ProfileKind::ALL.to_vec());
        kinds
            .into_iter()
            .map(|kind| (kind, self.dataset_file(kind)))
            .collect()
    }

    fn output_formats(&self) -> &[String] {
        &self.load.output_formats
    }

    fn spec_key_overrides(&self) -> Vec<(String, String)> {
        self.specs
            .as_ref()
            .and_then(|s| s.categories.as_ref())
            .map(|categories| {
                categories
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn concurrent_requests(&self) -> usize {
        self.images
            .as_ref()
            .and_then(|i| i.concurrent_requests)
            .unwrap_or(5)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[pipeline]
name = "hardware-profiles"
description = "Laptop / CPU / GPU profiles"
version = "1.0.0"

[source]
dataset_dir = "../whole-dataset"
laptop_file = "laptops-2024.json"

[load]
output_path = "./src/data"
output_formats = ["json"]
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.pipeline.name, "hardware-profiles");
        assert_eq!(config.output_path(), "./src/data");
        assert_eq!(
            config.dataset_files(),
            vec![
                (ProfileKind::Laptop, "laptops-2024.json".to_string()),
                (ProfileKind::Cpu, "cpu_scraped_data_chunk_final.json".to_string()),
                (ProfileKind::Gpu, "gpu_scraped_data_chunk_final.json".to_string()),
            ]
        );
        assert!(!config.images_enabled());
        assert_eq!(config.image_host_filter(), "nanoreview.net");
        assert_eq!(config.concurrent_requests(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_toml_config() {
        let toml_content = r#"
[pipeline]
name = "gpus-only"

[source]
dataset_dir = "./data"
kinds = ["gpu"]

[specs.categories]
"Graphics Processor" = "gpu"
"Screen" = "display"

[images]
enabled = true
output_dir = "./public/images"
host_filter = "nanoreview.net"
concurrent_requests = 8
timeout_seconds = 30

[load]
output_path = "./out"
output_formats = ["json", "csv"]
featured_pairs = 10

[monitoring]
enabled = true
log_format = "json"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(
            config.dataset_files(),
            vec![(ProfileKind::Gpu, "gpu_scraped_data_chunk_final.json".to_string())]
        );
        assert_eq!(config.spec_key_overrides().len(), 2);
        assert!(config.images_enabled());
        assert_eq!(config.concurrent_requests(), 8);
        assert_eq!(config.image_timeout_seconds(), Some(30));
        assert_eq!(config.featured_pairs(), 10);
        assert!(config.monitoring_enabled());
        assert_eq!(config.log_format(), Some("json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HWSPEC_TEST_DATASET_DIR", "/srv/scrapes");

        let toml_content = r#"
[pipeline]
name = "env"

[source]
dataset_dir = "${HWSPEC_TEST_DATASET_DIR}"

[load]
output_path = "${HWSPEC_TEST_UNSET_VAR}"
output_formats = ["json"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.dataset_dir, "/srv/scrapes");
        assert_eq!(config.load.output_path, "${HWSPEC_TEST_UNSET_VAR}");

        std::env::remove_var("HWSPEC_TEST_DATASET_DIR");
    }

    #[test]
    fn test_config_validation() {
        let bad_format = BASIC.replace(r#"["json"]"#, r#"["xml"]"#);
        let config = TomlConfig::from_toml_str(&bad_format).unwrap();
        assert!(config.validate().is_err());

        let bad_category = format!("{}\n[specs.categories]\nWeight = \"mass\"\n", BASIC);
        let config = TomlConfig::from_toml_str(&bad_category).unwrap();
        assert!(config.validate().is_err());

        let bad_host = format!(
            "{}\n[images]\nenabled = true\nhost_filter = \"ftp://nanoreview.net\"\n",
            BASIC
        );
        let config = TomlConfig::from_toml_str(&bad_host).unwrap();
        assert!(config.validate().is_err());

        let no_kinds = BASIC.replace(
            r#"laptop_file = "laptops-2024.json""#,
            "kinds = []",
        );
        let config = TomlConfig::from_toml_str(&no_kinds).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[pipeline\nname = ").unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "hardware-profiles");
    }
}
