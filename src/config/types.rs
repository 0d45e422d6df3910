//! Configuration types for the reconstruction pipeline
//!
//! All values are parsed once at load time and held immutably for the run.
//! Compiled defaults reproduce the reference document in `config/recon.yaml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::loader::{self, LoadOptions};
use crate::error::ConfigurationError;

/// Source of the parametric body shape prior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorType {
    /// SMPL body model
    #[serde(alias = "SMPL")]
    Smpl,
    /// SMPL-X body model (adds articulated hands and face)
    #[serde(alias = "SMPLX", alias = "SMPL-X")]
    Smplx,
}

/// Human pose and shape estimator backing the prior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HpsType {
    /// PIXIE whole-body regressor
    Pixie,
    /// PyMAF-X regressor
    #[serde(alias = "pymaf-x", alias = "pymafx")]
    Pymafx,
}

/// Where the final texture is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureSrc {
    /// Project the input image onto the mesh
    Image,
    /// Diffusion-generated texture
    #[serde(alias = "SD")]
    Sd,
}

/// Body part that can be sourced from the shape prior instead of the
/// predicted surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyPart {
    Hand,
    Face,
}

impl BodyPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyPart::Hand => "hand",
            BodyPart::Face => "face",
        }
    }
}

/// One network input: tensor name and channel count
///
/// Serializes as a two-element sequence, matching the `[name, channels]`
/// pairs in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorInput(pub String, pub u32);

impl TensorInput {
    pub fn new(name: impl Into<String>, channels: u32) -> Self {
        Self(name.into(), channels)
    }

    /// Tensor name
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Channel count
    pub fn channels(&self) -> u32 {
        self.1
    }
}

/// Input tensor specifications for the prediction networks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetConfig {
    /// Ordered inputs of the normal-prediction network
    pub in_nml: Vec<TensorInput>,

    /// Ordered inputs of the geometry network
    pub in_geo: Vec<TensorInput>,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            in_nml: vec![
                TensorInput::new("image", 3),
                TensorInput::new("T_normal_F", 3),
                TensorInput::new("T_normal_B", 3),
            ],
            in_geo: vec![
                TensorInput::new("normal_F", 3),
                TensorInput::new("normal_B", 3),
            ],
        }
    }
}

impl NetConfig {
    /// Total channel count of the normal network inputs
    pub fn nml_channels(&self) -> u32 {
        self.in_nml.iter().map(TensorInput::channels).sum()
    }

    /// Total channel count of the geometry network inputs
    pub fn geo_channels(&self) -> u32 {
        self.in_geo.iter().map(TensorInput::channels).sum()
    }
}

/// Dataset configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Shape-prior source
    pub prior_type: PriorType,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            prior_type: PriorType::Smpl,
        }
    }
}

/// Bilateral normal integration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BniConfig {
    /// Neighborhood size for the integration stencil
    pub k: u32,

    /// Regularization weight
    pub lambda1: f64,

    /// Front/back boundary-consistency weight
    pub boundary_consist: f64,

    /// Octree depth for Poisson surface reconstruction
    pub poisson_depth: u32,

    /// Body parts taken from the shape prior instead of the predicted surface
    pub use_smpl: BTreeSet<BodyPart>,

    /// Refine side regions with the implicit-function network
    pub use_ifnet: bool,

    /// Fuse the final mesh with Poisson surface reconstruction
    pub use_poisson: bool,

    /// Confidence threshold for replacing hands with the prior, in [0, 1]
    pub hand_thres: f64,

    /// Confidence threshold for replacing the face with the prior, in [0, 1]
    pub face_thres: f64,

    /// Assumed surface thickness when completing the back side
    pub thickness: f64,

    /// Pose-and-shape estimator choice
    pub hps_type: HpsType,

    /// Texture source selection
    pub texture_src: TextureSrc,

    /// Cut self-intersections between body and cloth surfaces
    pub cut_intersection: bool,
}

impl Default for BniConfig {
    fn default() -> Self {
        Self {
            k: 4,
            lambda1: 1e-4,
            boundary_consist: 1e-6,
            poisson_depth: 10,
            use_smpl: BTreeSet::from([BodyPart::Hand, BodyPart::Face]),
            use_ifnet: true,
            use_poisson: true,
            hand_thres: 0.08,
            face_thres: 0.06,
            thickness: 0.02,
            hps_type: HpsType::Pixie,
            texture_src: TextureSrc::Image,
            cut_intersection: true,
        }
    }
}

impl BniConfig {
    /// Whether a given part is sourced from the shape prior
    pub fn uses_prior_for(&self, part: BodyPart) -> bool {
        self.use_smpl.contains(&part)
    }
}

/// Main pipeline configuration
///
/// Aggregates all configuration sections. Load with [`ReconConfig::load`] or
/// [`ReconConfig::load_from_file`]; both validate the document and resolve
/// relative paths before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconConfig {
    /// Run identifier, used to name result directories
    pub name: String,

    /// Directory containing model checkpoints
    pub ckpt_dir: PathBuf,

    /// Checkpoint of the normal-prediction model
    pub normal_path: PathBuf,

    /// Checkpoint of the implicit-function network
    pub ifnet_path: PathBuf,

    /// Output directory
    pub results_path: PathBuf,

    /// Network input specifications
    pub net: NetConfig,

    /// Inference-only behavior toggle
    pub test_mode: bool,

    /// Inference batch size
    pub batch_size: u32,

    /// Dataset configuration
    pub dataset: DatasetConfig,

    /// Volumetric grid resolution
    pub vol_res: u32,

    /// Marching-cubes extraction resolution
    pub mcube_res: u32,

    /// Run mesh cleanup after extraction
    pub clean_mesh: bool,

    /// Overlap threshold for cloth segmentation, in [0, 1]
    pub cloth_overlap_thres: f64,

    /// Overlap threshold for body segmentation, in [0, 1]
    pub body_overlap_thres: f64,

    /// Bilateral normal integration parameters
    pub bni: BniConfig,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: "recon".to_string(),
            ckpt_dir: PathBuf::from("./data/ckpt/"),
            normal_path: PathBuf::from("./data/ckpt/normal.ckpt"),
            ifnet_path: PathBuf::from("./data/ckpt/ifnet.ckpt"),
            results_path: PathBuf::from("./results"),
            net: NetConfig::default(),
            test_mode: true,
            batch_size: 1,
            dataset: DatasetConfig::default(),
            vol_res: 256,
            mcube_res: 256,
            clean_mesh: true,
            cloth_overlap_thres: 0.50,
            body_overlap_thres: 0.00,
            bni: BniConfig::default(),
        }
    }
}

impl ReconConfig {
    /// Load configuration using the layered loader
    ///
    /// Defaults, then the discovered configuration file, then `RECON_*`
    /// environment overrides. Validates the result and resolves relative
    /// paths against the current working directory.
    pub fn load() -> Result<Self, ConfigurationError> {
        let config: Self = loader::load_config()?;
        config.finalize(None)
    }

    /// Load configuration from a specific file
    ///
    /// Relative paths inside the document are anchored to the file's own
    /// directory rather than the current working directory.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let config: Self = loader::load_from_file(path)?;
        let root = path.parent().filter(|p| !p.as_os_str().is_empty());
        config.finalize(root)
    }

    /// Parse a YAML document without the defaults layer
    ///
    /// Every field must be present; absent keys surface as
    /// [`ConfigurationError::MissingField`]. Paths are left as written since
    /// a string has no directory to anchor them to.
    pub fn from_yaml_str(document: &str) -> Result<Self, ConfigurationError> {
        let config: Self = loader::from_yaml_str(document)?;
        crate::config::ConfigValidation::validate(&config)?;
        Ok(config)
    }

    /// Load with explicit options, then validate and resolve paths
    pub fn load_with_options(options: LoadOptions) -> Result<Self, ConfigurationError> {
        let root = options.path_root.clone();
        let config: Self = loader::load_config_with_options(options)?;
        config.finalize(root.as_deref())
    }

    /// Serialize back to a YAML document
    pub fn to_yaml(&self) -> Result<String, ConfigurationError> {
        serde_yaml::to_string(self).map_err(|e| ConfigurationError::SerializeError {
            details: e.to_string(),
        })
    }

    /// Resolve relative paths against `root`
    ///
    /// Absolute paths are left untouched.
    pub fn resolve_paths(&mut self, root: &Path) {
        for path in [
            &mut self.ckpt_dir,
            &mut self.normal_path,
            &mut self.ifnet_path,
            &mut self.results_path,
        ] {
            if path.is_relative() {
                *path = root.join(&path);
            }
        }
    }

    fn finalize(self, root: Option<&Path>) -> Result<Self, ConfigurationError> {
        crate::config::ConfigValidation::validate(&self)?;

        let mut config = self;
        match root {
            Some(root) => config.resolve_paths(root),
            None => {
                let cwd = std::env::current_dir().map_err(|e| {
                    ConfigurationError::EnvironmentError {
                        var: "current_dir".to_string(),
                        details: e.to_string(),
                    }
                })?;
                config.resolve_paths(&cwd);
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_document() {
        let config = ReconConfig::default();

        assert_eq!(config.batch_size, 1);
        assert_eq!(config.vol_res, 256);
        assert_eq!(config.mcube_res, 256);
        assert!(config.test_mode);
        assert!(config.clean_mesh);
        assert_eq!(config.cloth_overlap_thres, 0.50);
        assert_eq!(config.body_overlap_thres, 0.00);
        assert_eq!(config.dataset.prior_type, PriorType::Smpl);

        assert_eq!(config.bni.k, 4);
        assert_eq!(config.bni.poisson_depth, 10);
        assert!(config.bni.use_ifnet);
        assert!(config.bni.use_poisson);
        assert_eq!(config.bni.hand_thres, 0.08);
        assert_eq!(config.bni.face_thres, 0.06);
        assert_eq!(config.bni.hps_type, HpsType::Pixie);
        assert_eq!(config.bni.texture_src, TextureSrc::Image);
        assert!(config.bni.uses_prior_for(BodyPart::Hand));
        assert!(config.bni.uses_prior_for(BodyPart::Face));
    }

    #[test]
    fn test_net_channel_totals() {
        let net = NetConfig::default();
        assert_eq!(net.nml_channels(), 9);
        assert_eq!(net.geo_channels(), 6);
    }

    #[test]
    fn test_resolve_paths_leaves_absolute_untouched() {
        let mut config = ReconConfig {
            ckpt_dir: PathBuf::from("/srv/ckpt"),
            ..Default::default()
        };
        config.resolve_paths(Path::new("/work"));

        assert_eq!(config.ckpt_dir, PathBuf::from("/srv/ckpt"));
        assert_eq!(
            config.normal_path,
            PathBuf::from("/work/./data/ckpt/normal.ckpt")
        );
        assert!(config.results_path.is_absolute());
    }

    #[test]
    fn test_body_part_set_is_order_insensitive() {
        let forward: BTreeSet<BodyPart> = BTreeSet::from([BodyPart::Hand, BodyPart::Face]);
        let reversed: BTreeSet<BodyPart> = BTreeSet::from([BodyPart::Face, BodyPart::Hand]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_enum_aliases_deserialize() {
        let prior: PriorType = serde_yaml::from_str("SMPL").unwrap();
        assert_eq!(prior, PriorType::Smpl);

        let texture: TextureSrc = serde_yaml::from_str("SD").unwrap();
        assert_eq!(texture, TextureSrc::Sd);
    }
}
