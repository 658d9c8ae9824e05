use crate::config::types::HarvestConfig;
use crate::ConfigError;
use url::Url;

/// Validates a parsed configuration
///
/// Checks that the API endpoint is a well-formed http(s) URL, that
/// credentials are present, and that the course id is usable.
pub fn validate(config: &HarvestConfig) -> Result<(), ConfigError> {
    let api_url = Url::parse(&config.course.api_url)
        .map_err(|_| ConfigError::InvalidUrl(config.course.api_url.clone()))?;

    if api_url.scheme() != "http" && api_url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} (scheme must be http or https)",
            config.course.api_url
        )));
    }

    if api_url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} (missing host)",
            config.course.api_url
        )));
    }

    if config.course.api_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "api-key must not be empty".to_string(),
        ));
    }

    if config.course.course_id <= 0 {
        return Err(ConfigError::Validation(format!(
            "course-id must be positive, got {}",
            config.course.course_id
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> HarvestConfig {
        HarvestConfig::new("https://courses.example.edu", "token", 42, false, false)
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_rejects_malformed_url() {
        let mut config = valid_config();
        config.course.api_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let mut config = valid_config();
        config.course.api_url = "ftp://courses.example.edu".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_empty_api_key() {
        let mut config = valid_config();
        config.course.api_key = "  ".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_nonpositive_course_id() {
        let mut config = valid_config();
        config.course.course_id = 0;
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
