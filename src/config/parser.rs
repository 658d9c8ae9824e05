use crate::config::types::HarvestConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(HarvestConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<HarvestConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: HarvestConfig = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[course]
api-url = "https://courses.example.edu"
api-key = "secret-token"
course-id = 1234

[harvest]
index-external-urls = true
load-media-captions = true

[embeds]
ui-hostname = "courses.example.edu"
caption-hostname = "media.example.edu"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.course.api_url, "https://courses.example.edu");
        assert_eq!(config.course.course_id, 1234);
        assert!(config.harvest.index_external_urls);
        assert!(config.harvest.load_media_captions);
        assert_eq!(config.embeds.caption_hostname, "media.example.edu");
    }

    #[test]
    fn test_flags_default_to_off() {
        let config_content = r#"
[course]
api-url = "https://courses.example.edu"
api-key = "secret-token"
course-id = 1234
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert!(!config.harvest.index_external_urls);
        assert!(!config.harvest.load_media_captions);
        assert!(config.embeds.ui_hostname.is_empty());
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[course]
api-url = "https://courses.example.edu"
api-key = ""
course-id = 1234
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
