use crate::config::types::{Config, EndpointConfig, OutputConfig, PacingConfig, SearchConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound for a single pacing wait
const MAX_DELAY_CEILING_MS: u64 = 60_000;

/// Largest page size the search API accepts
const MAX_PAGE_SIZE: u32 = 100;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_endpoint_config(&config.endpoint)?;
    validate_search_config(&config.search)?;
    validate_pacing_config(&config.pacing)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates endpoint configuration
fn validate_endpoint_config(config: &EndpointConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid endpoint url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "Endpoint url '{}' must use http or https",
            config.url
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates search filter and page bounds
fn validate_search_config(config: &SearchConfig) -> Result<(), ConfigError> {
    validate_category_slug(&config.category_slug)?;

    if config.page_size < 1 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.page_size
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.media_size.is_empty() {
        return Err(ConfigError::Validation(
            "media_size cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates pacing bounds
fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    if config.min_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "min_delay_ms ({}) cannot exceed max_delay_ms ({})",
            config.min_delay_ms, config.max_delay_ms
        )));
    }

    if config.max_delay_ms > MAX_DELAY_CEILING_MS {
        return Err(ConfigError::Validation(format!(
            "max_delay_ms must be <= {}ms, got {}ms",
            MAX_DELAY_CEILING_MS, config.max_delay_ms
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if matches!(config.jsonl_path.as_deref(), Some(p) if p.is_empty()) {
        return Err(ConfigError::Validation(
            "jsonl_path cannot be empty".to_string(),
        ));
    }

    if matches!(config.database_path.as_deref(), Some(p) if p.is_empty()) {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a category slug: lowercase ASCII letters, digits, `_` and `-`
fn validate_category_slug(slug: &str) -> Result<(), ConfigError> {
    if slug.is_empty() {
        return Err(ConfigError::Validation(
            "category_slug cannot be empty".to_string(),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "category_slug must contain only lowercase letters, digits, '_' and '-', got '{}'",
            slug
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_category_slug() {
        assert!(validate_category_slug("automobiles_vehicules").is_ok());
        assert!(validate_category_slug("pieces-detachees").is_ok());
        assert!(validate_category_slug("motos2").is_ok());

        assert!(validate_category_slug("").is_err());
        assert!(validate_category_slug("Automobiles").is_err());
        assert!(validate_category_slug("cars trucks").is_err());
    }

    #[test]
    fn test_validate_endpoint() {
        let mut config = EndpointConfig::default();
        assert!(validate_endpoint_config(&config).is_ok());

        config.url = "ftp://api.example.com/graphql".to_string();
        assert!(matches!(
            validate_endpoint_config(&config),
            Err(ConfigError::InvalidUrl(_))
        ));

        config.url = "not a url".to_string();
        assert!(validate_endpoint_config(&config).is_err());

        let config = EndpointConfig {
            user_agent: "   ".to_string(),
            ..EndpointConfig::default()
        };
        assert!(validate_endpoint_config(&config).is_err());
    }

    #[test]
    fn test_validate_search_bounds() {
        let mut config = SearchConfig::default();

        config.page_size = 0;
        assert!(validate_search_config(&config).is_err());

        config.page_size = 101;
        assert!(validate_search_config(&config).is_err());

        config.page_size = 48;
        config.max_pages = 0;
        assert!(validate_search_config(&config).is_err());

        config.max_pages = 1;
        assert!(validate_search_config(&config).is_ok());
    }

    #[test]
    fn test_validate_pacing() {
        assert!(validate_pacing_config(&PacingConfig {
            min_delay_ms: 0,
            max_delay_ms: 0,
        })
        .is_ok());

        assert!(validate_pacing_config(&PacingConfig {
            min_delay_ms: 3000,
            max_delay_ms: 1000,
        })
        .is_err());

        assert!(validate_pacing_config(&PacingConfig {
            min_delay_ms: 0,
            max_delay_ms: 120_000,
        })
        .is_err());
    }

    #[test]
    fn test_validate_output_paths() {
        let config = OutputConfig {
            jsonl_path: Some(String::new()),
            database_path: None,
        };
        assert!(validate_output_config(&config).is_err());

        let config = OutputConfig {
            jsonl_path: None,
            database_path: Some("listings.db".to_string()),
        };
        assert!(validate_output_config(&config).is_ok());
    }
}
