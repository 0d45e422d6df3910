//! Configuration validation
//!
//! Range and consistency checks for every section of the document. All
//! violations surface as [`ConfigurationError`] at load time; `warnings`
//! collects non-fatal issues for the CLI to display.

use crate::config::types::{BniConfig, DatasetConfig, NetConfig, ReconConfig, TensorInput};
use crate::error::{ConfigurationError, ReconError};

/// Common configuration validation trait
pub trait ConfigValidation {
    type Error: ReconError;

    /// Validate the configuration
    fn validate(&self) -> Result<(), Self::Error>;

    /// Get configuration warnings (non-fatal issues)
    fn warnings(&self) -> Vec<String> {
        Vec::new()
    }
}

fn check_unit_range(field: &str, value: f64) -> Result<(), ConfigurationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigurationError::unit_range(field, value));
    }
    Ok(())
}

fn check_positive(field: &str, value: u32) -> Result<(), ConfigurationError> {
    if value == 0 {
        return Err(ConfigurationError::invalid_value(
            field,
            value.to_string(),
            "must be greater than 0",
        ));
    }
    Ok(())
}

fn check_non_negative(field: &str, value: f64) -> Result<(), ConfigurationError> {
    if value < 0.0 || !value.is_finite() {
        return Err(ConfigurationError::invalid_value(
            field,
            value.to_string(),
            "must be a finite non-negative number",
        ));
    }
    Ok(())
}

fn check_inputs(field: &str, inputs: &[TensorInput]) -> Result<(), ConfigurationError> {
    if inputs.is_empty() {
        return Err(ConfigurationError::invalid_value(
            field,
            "[]",
            "at least one input tensor is required",
        ));
    }

    for input in inputs {
        if input.name().is_empty() {
            return Err(ConfigurationError::invalid_value(
                field,
                "\"\"",
                "tensor names cannot be empty",
            ));
        }
        if input.channels() == 0 {
            return Err(ConfigurationError::invalid_value(
                format!("{field}.{}", input.name()),
                "0",
                "channel count must be greater than 0",
            ));
        }
    }

    Ok(())
}

impl ConfigValidation for NetConfig {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        check_inputs("net.in_nml", &self.in_nml)?;
        check_inputs("net.in_geo", &self.in_geo)?;
        Ok(())
    }
}

impl ConfigValidation for DatasetConfig {
    type Error = ConfigurationError;

    // Enum membership is already enforced during deserialization
    fn validate(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl ConfigValidation for BniConfig {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        check_positive("bni.k", self.k)?;
        check_positive("bni.poisson_depth", self.poisson_depth)?;
        check_non_negative("bni.lambda1", self.lambda1)?;
        check_non_negative("bni.boundary_consist", self.boundary_consist)?;
        check_non_negative("bni.thickness", self.thickness)?;
        check_unit_range("bni.hand_thres", self.hand_thres)?;
        check_unit_range("bni.face_thres", self.face_thres)?;
        Ok(())
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.poisson_depth > 12 {
            warnings.push(format!(
                "bni.poisson_depth of {} produces very large octrees and slow reconstruction",
                self.poisson_depth
            ));
        }

        if self.use_smpl.is_empty() {
            warnings.push(
                "bni.use_smpl is empty - hands and face will come from the predicted surface"
                    .to_string(),
            );
        }

        warnings
    }
}

impl ConfigValidation for ReconConfig {
    type Error = ConfigurationError;

    fn validate(&self) -> Result<(), Self::Error> {
        if self.name.is_empty() {
            return Err(ConfigurationError::invalid_value(
                "name",
                "\"\"",
                "run identifier cannot be empty",
            ));
        }

        for (key, path) in [
            ("ckpt_dir", &self.ckpt_dir),
            ("normal_path", &self.normal_path),
            ("ifnet_path", &self.ifnet_path),
            ("results_path", &self.results_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigurationError::invalid_value(
                    key,
                    "\"\"",
                    "path cannot be empty",
                ));
            }
        }

        check_positive("batch_size", self.batch_size)?;
        check_positive("vol_res", self.vol_res)?;
        check_positive("mcube_res", self.mcube_res)?;
        check_unit_range("cloth_overlap_thres", self.cloth_overlap_thres)?;
        check_unit_range("body_overlap_thres", self.body_overlap_thres)?;

        self.net.validate()?;
        self.dataset.validate()?;
        self.bni.validate()?;

        Ok(())
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.mcube_res > self.vol_res {
            warnings.push(format!(
                "mcube_res ({}) exceeds vol_res ({}) - extraction cannot add detail beyond the volume",
                self.mcube_res, self.vol_res
            ));
        }

        if self.bni.use_ifnet && self.ifnet_path.as_os_str().is_empty() {
            warnings.push("bni.use_ifnet is enabled but ifnet_path is empty".to_string());
        }

        warnings.extend(self.bni.warnings());

        warnings
    }
}
