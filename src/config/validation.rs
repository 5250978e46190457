//! Configuration validation logic.

use regex::Regex;
use url::Url;

use crate::config::loader::Config;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_root(&config.site.root)?;
    validate_delays(config.options.delay_min_ms, config.options.delay_max_ms)?;

    if config.targets.is_empty() {
        return Err(Error::MissingConfig(
            "targets (at least one URL, user or hashtag required)".to_string(),
        ));
    }

    for handle in &config.targets.users {
        validate_handle(handle)?;
    }
    for tag in &config.targets.hashtags {
        validate_hashtag(tag)?;
    }

    Ok(())
}

/// Validate the site root URL.
pub fn validate_root(root: &str) -> Result<()> {
    let url = Url::parse(root)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: "site.root".to_string(),
            message: format!("Unsupported URL scheme '{}'", url.scheme()),
        });
    }
    Ok(())
}

/// Validate the politeness delay range.
pub fn validate_delays(min_ms: u64, max_ms: u64) -> Result<()> {
    if min_ms > max_ms {
        return Err(Error::ConfigValidation {
            field: "delay_min_ms".to_string(),
            message: format!("Minimum delay {}ms exceeds maximum {}ms", min_ms, max_ms),
        });
    }
    Ok(())
}

/// Validate a user handle: 1-30 chars, alphanumeric plus underscore and
/// hyphen, leading `@` tolerated.
pub fn validate_handle(handle: &str) -> Result<()> {
    let pattern = Regex::new(r"^[A-Za-z0-9_-]{1,30}$").unwrap();

    let clean = handle.trim_start_matches('@');
    if !pattern.is_match(clean) {
        return Err(Error::ConfigValidation {
            field: "users".to_string(),
            message: format!("Invalid handle '{}'", handle),
        });
    }
    Ok(())
}

/// Validate a hashtag: non-empty, leading `#` tolerated, no path characters.
pub fn validate_hashtag(tag: &str) -> Result<()> {
    let clean = tag.trim_start_matches('#');
    if clean.is_empty() || clean.contains(['/', '?', '#', ' ']) {
        return Err(Error::ConfigValidation {
            field: "hashtags".to_string(),
            message: format!("Invalid hashtag '{}'", tag),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_handle() {
        assert!(validate_handle("alice").is_ok());
        assert!(validate_handle("@alice_01").is_ok());
        assert!(validate_handle("").is_err());
        assert!(validate_handle("has space").is_err());
        assert!(validate_handle("way_too_long_for_a_screen_name_here").is_err());
    }

    #[test]
    fn test_validate_hashtag() {
        assert!(validate_hashtag("cats").is_ok());
        assert!(validate_hashtag("#cats").is_ok());
        assert!(validate_hashtag("#").is_err());
        assert!(validate_hashtag("a/b").is_err());
    }

    #[test]
    fn test_validate_root() {
        assert!(validate_root("https://www.uraaka-joshi.com").is_ok());
        assert!(validate_root("ftp://example.com").is_err());
        assert!(validate_root("not a url").is_err());
    }

    #[test]
    fn test_validate_delays() {
        assert!(validate_delays(500, 1500).is_ok());
        assert!(validate_delays(500, 500).is_ok());
        assert!(validate_delays(1500, 500).is_err());
    }

    #[test]
    fn test_empty_targets_rejected() {
        let config = Config::default();
        assert!(validate_config(&config).is_err());
    }
}
