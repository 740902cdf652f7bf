/// Processing parameters forwarded to the comparison program
///
/// These values only pre-fill the form and are the shape of the
/// `defaults` section of the config file. What the user types is
/// forwarded as text, so nothing here constrains a run.

use serde::{Deserialize, Serialize};

/// Numeric parameters and option flags for one comparison run
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ProcessingParams {
    // ========== Numeric ==========

    /// `-n`: number of PCA samples per window
    pub n: u32,

    /// `-window_size`: side length of the comparison window in pixels
    pub window_size: u32,

    /// `-pca_dim_gray`: PCA dimensions kept for the grayscale pass
    pub pca_dim_gray: u32,

    /// `-pca_dim_rgb`: PCA dimensions kept for the colour pass
    pub pca_dim_rgb: u32,

    /// `-resize_factor`: downscale applied before comparison (0.0, ∞)
    pub resize_factor: f64,

    // ========== Options ==========

    /// `-lighting_fix`
    pub lighting_fix: bool,

    /// `-use_homography`
    pub use_homography: bool,

    /// `-save_extra_stuff`: keep intermediate outputs
    pub save_extra_stuff: bool,
}

impl Default for ProcessingParams {
    fn default() -> Self {
        Self {
            n: 16,
            window_size: 5,
            pca_dim_gray: 3,
            pca_dim_rgb: 9,
            resize_factor: 0.2,
            lighting_fix: false,
            use_homography: false,
            save_extra_stuff: false,
        }
    }
}
