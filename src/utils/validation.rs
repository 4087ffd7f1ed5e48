use crate::utils::error::{Result, TutorgenError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: &str, reason: &str) -> TutorgenError {
    TutorgenError::config(format!("{} = '{}': {}", field, value, reason))
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                &format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            &format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            &value.to_string(),
            &format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            &format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
        Ok(())
    } else {
        Err(invalid(
            field_name,
            value,
            &format!("Supported values: {}", allowed.join(", ")),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("ollama_base_url", "http://localhost:11434").is_ok());
        assert!(validate_url("openai_base_url", "https://api.openai.com").is_ok());
        assert!(validate_url("ollama_base_url", "").is_err());
        assert!(validate_url("ollama_base_url", "not-a-url").is_err());
        assert!(validate_url("ollama_base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("samples", 5, 1).is_ok());
        assert!(validate_positive_number("samples", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("samples", 10, 1, 1000).is_ok());
        assert!(validate_range("samples", 1001, 1, 1000).is_err());
    }

    #[test]
    fn test_validate_one_of_is_case_insensitive() {
        assert!(validate_one_of("format", "JSON", &["json", "csv", "parquet"]).is_ok());
        assert!(validate_one_of("format", "xml", &["json", "csv", "parquet"]).is_err());
    }
}
