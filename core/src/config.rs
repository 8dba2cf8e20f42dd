//! Configuration types for the vectorization pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{VectorizeError, VectorizeResult};
use crate::random::PipelineSeed;

/// Path-extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    ColorRegions,
    Centerline,
    Hatching,
}

/// Hatching fill pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HatchingStyle {
    Parallel,
    Contour,
    Cross,
    Stippling,
}

impl Default for HatchingStyle {
    fn default() -> Self {
        Self::Parallel
    }
}

/// Variable line-weight simulation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightStyle {
    Parallel,
    Outline,
    Scribble,
    Zigzag,
}

impl Default for WeightStyle {
    fn default() -> Self {
        Self::Parallel
    }
}

/// Options shared by every extraction mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Number of color clusters for the color-region extractor (2..=32).
    pub num_colors: u32,
    /// Grayscale threshold for the centerline extractor (0..=255).
    pub threshold: u8,
    /// Row-run stitching proximity for the centerline extractor (0..=50).
    pub proximity: f64,
    /// Base hatch line spacing in pixels (1..=20).
    pub hatch_spacing: f64,
    /// Hatch angle in degrees (0..=180).
    pub hatch_angle: f64,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            num_colors: 8,
            threshold: 128,
            proximity: 5.0,
            hatch_spacing: 4.0,
            hatch_angle: 45.0,
        }
    }
}

impl Options {
    pub fn validate(&self) -> VectorizeResult<()> {
        if !(2..=32).contains(&self.num_colors) {
            return Err(VectorizeError::invalid_input(format!(
                "num_colors must be in [2, 32], got {}",
                self.num_colors
            )));
        }
        if !(0.0..=50.0).contains(&self.proximity) {
            return Err(VectorizeError::invalid_input(format!(
                "proximity must be in [0, 50], got {}",
                self.proximity
            )));
        }
        if !(1.0..=20.0).contains(&self.hatch_spacing) {
            return Err(VectorizeError::invalid_input(format!(
                "hatch_spacing must be in [1, 20], got {}",
                self.hatch_spacing
            )));
        }
        if !(0.0..=180.0).contains(&self.hatch_angle) {
            return Err(VectorizeError::invalid_input(format!(
                "hatch_angle must be in [0, 180], got {}",
                self.hatch_angle
            )));
        }
        Ok(())
    }
}

/// Opt-in behavior for curve fitting, hatching style, line-weight
/// simulation, and path optimization. All flags default to off, matching
/// spec.md §6.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedOptions {
    pub enable_curve_fitting: bool,
    pub curve_tolerance: f64,
    pub enable_arc_conversion: bool,
    pub hatching_style: HatchingStyle,
    /// Ignored in `Mode::Hatching` (spec.md §6).
    pub enable_variable_weight: bool,
    pub line_weight_style: WeightStyle,
    pub enable_path_optimization: bool,
    pub enable_path_merging: bool,
    pub enable_2opt: bool,
    /// Seed for k-means initialization and Poisson-disk sampling.
    pub seed: PipelineSeed,
}

impl Default for AdvancedOptions {
    fn default() -> Self {
        Self {
            enable_curve_fitting: false,
            curve_tolerance: 2.0,
            enable_arc_conversion: false,
            hatching_style: HatchingStyle::default(),
            enable_variable_weight: false,
            line_weight_style: WeightStyle::default(),
            enable_path_optimization: false,
            enable_path_merging: true,
            enable_2opt: true,
            seed: PipelineSeed::default(),
        }
    }
}

/// Merge threshold fixed at the top-level entry point (spec.md §6).
pub const MERGE_THRESHOLD: f64 = 5.0;
/// Maximum 2-opt iterations fixed at the top-level entry point (spec.md §6).
pub const MAX_2OPT_ITERATIONS: usize = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_valid() {
        assert!(Options::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_num_colors() {
        let mut opts = Options::default();
        opts.num_colors = 1;
        assert!(opts.validate().is_err());
        opts.num_colors = 33;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn advanced_defaults_match_spec() {
        let adv = AdvancedOptions::default();
        assert!(!adv.enable_curve_fitting);
        assert!(!adv.enable_arc_conversion);
        assert!(!adv.enable_variable_weight);
        assert!(!adv.enable_path_optimization);
        assert!(adv.enable_path_merging);
        assert!(adv.enable_2opt);
        assert_eq!(adv.hatching_style, HatchingStyle::Parallel);
        assert_eq!(adv.line_weight_style, WeightStyle::Parallel);
    }
}
