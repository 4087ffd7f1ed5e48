use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range, Validate,
};

pub const DEFAULT_SAMPLES: usize = 10;
pub const MAX_SAMPLES: usize = 1000;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_FILENAME_PREFIX: &str = "synthetic";

/// Resolved generation settings, after layering file config and CLI
/// overrides over the defaults.
#[derive(Debug, Clone)]
pub struct DatagenSettings {
    pub samples: usize,
    pub max_tokens: u32,
    pub batch_size: usize,
    pub output_path: String,
    pub filename_prefix: String,
}

impl Default for DatagenSettings {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            max_tokens: DEFAULT_MAX_TOKENS,
            batch_size: DEFAULT_BATCH_SIZE,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
        }
    }
}

impl ConfigProvider for DatagenSettings {
    fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    fn batch_size(&self) -> usize {
        self.batch_size
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn filename_prefix(&self) -> &str {
        &self.filename_prefix
    }
}

impl Validate for DatagenSettings {
    fn validate(&self) -> Result<()> {
        validate_range("samples", self.samples, 1, MAX_SAMPLES)?;
        validate_positive_number("max_tokens", self.max_tokens as usize, 1)?;
        validate_positive_number("batch_size", self.batch_size, 1)?;
        validate_non_empty_string("output_path", &self.output_path)?;
        validate_non_empty_string("filename_prefix", &self.filename_prefix)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(DatagenSettings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_samples_rejected() {
        let settings = DatagenSettings {
            samples: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_samples_above_ceiling_rejected() {
        let settings = DatagenSettings {
            samples: MAX_SAMPLES + 1,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
