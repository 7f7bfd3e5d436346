//! Loading settings from YAML or JSON.

use std::path::Path;

use l1track_errors::{ConfigurationError, L1TrackError, Result};
use tracing::debug;

use crate::types::Settings;
use crate::validation::SettingsValidator;

impl Settings {
    /// Parse and validate settings from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns `L1TrackError::Load` if the document does not parse, and
    /// `L1TrackError::Validation` if the parsed settings are inconsistent.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: Settings =
            serde_yaml::from_str(yaml).map_err(|e| L1TrackError::load(e.to_string()))?;
        settings.validated()
    }

    /// Parse and validate settings from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `L1TrackError::Load` if the document does not parse, and
    /// `L1TrackError::Validation` if the parsed settings are inconsistent.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| L1TrackError::load(e.to_string()))?;
        settings.validated()
    }

    /// Read settings from a `.yaml`, `.yml` or `.json` file.
    ///
    /// # Errors
    ///
    /// Returns `L1TrackError::Load` if the file cannot be read or parsed,
    /// `L1TrackError::Configuration` for an unsupported extension, and
    /// `L1TrackError::Validation` if the settings are inconsistent.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| L1TrackError::load(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "Loading settings");

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(ConfigurationError::invalid_setting(
                "path",
                format!("unsupported settings extension {other:?}"),
            )
            .into()),
        }
    }

    /// Validate these settings, returning them unchanged on success.
    ///
    /// # Errors
    ///
    /// Returns `L1TrackError::Validation` describing the first inconsistency.
    pub fn validated(self) -> Result<Self> {
        SettingsValidator::new().validate(&self)?;
        debug!(
            nbins_pt = self.hough.nbins_pt,
            min_pt = self.hough.min_pt,
            firmware = %self.hough.firmware_type,
            digitize = self.digitization.enable,
            "Settings validated"
        );
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FirmwareType;
    use l1track_errors::ErrorCategory;

    #[test]
    fn test_empty_yaml_gives_defaults() -> Result<()> {
        let s = Settings::from_yaml_str("{}")?;
        assert_eq!(s, Settings::default());
        Ok(())
    }

    #[test]
    fn test_partial_yaml_overrides() -> Result<()> {
        let s = Settings::from_yaml_str(
            "stub_cuts:\n  kill_low_pt_stubs: false\nhough:\n  firmware_type: 1\n",
        )?;
        assert!(!s.stub_cuts.kill_low_pt_stubs);
        assert_eq!(s.hough.firmware_type, FirmwareType::DaisyChain);
        assert_eq!(s.hough.nbins_pt, 32);
        Ok(())
    }

    #[test]
    fn test_unknown_field_is_load_error() {
        let err = Settings::from_yaml_str("hough:\n  nbins_phi: 64\n");
        assert!(matches!(err, Err(ref e) if e.category() == ErrorCategory::Load));
    }

    #[test]
    fn test_invalid_values_are_validation_errors() {
        let err = Settings::from_json_str(r#"{"hough": {"min_pt": -1.0}}"#);
        assert!(matches!(err, Err(ref e) if e.category() == ErrorCategory::Validation));
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = Settings::from_path("/nonexistent/l1track/settings.yaml");
        assert!(matches!(err, Err(L1TrackError::Load(_))));
    }
}
