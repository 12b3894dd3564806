use burn::prelude::*;

/// Feature maps are 1/32 of the input image side after the
/// external ResNet feature extractor.
pub const FEATURE_STRIDE: usize = 32;

/// Architecture hyperparameters for `VqaNet`.
///
/// `embedding_tokens` is the size of the question vocabulary
/// (including the padding id 0); everything else defaults to the
/// published setup.
// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct VqaConfig {
    pub embedding_tokens: usize,

    /// Size of the answer vocabulary (output width)
    #[config(default = 3000)]
    pub max_answers: usize,

    #[config(default = 300)]
    pub embedding_features: usize,

    /// LSTM hidden size, also the CNN kernel depth
    #[config(default = 1024)]
    pub question_features: usize,

    /// Channels of the pre-extracted image feature grid
    #[config(default = 2048)]
    pub vision_features: usize,

    /// Side of the (centre-cropped) input image
    #[config(default = 448)]
    pub image_size: usize,

    #[config(default = 512)]
    pub mid_features: usize,

    #[config(default = 1024)]
    pub classifier_features: usize,

    #[config(default = 2)]
    pub glimpses: usize,

    #[config(default = 0.5)]
    pub dropout: f64,

    /// Width of the text convolution along the sequence axis
    #[config(default = 3)]
    pub kernel_width: usize,

    /// Three stacked convolution blocks instead of one
    #[config(default = true)]
    pub multilayer_cnn: bool,
}

impl VqaConfig {
    /// Spatial side of the feature grid (14 for 448px images).
    pub fn output_size(&self) -> usize {
        self.image_size / FEATURE_STRIDE
    }

    /// Number of floats in one flattened feature grid.
    pub fn feature_len(&self) -> usize {
        self.vision_features * self.output_size() * self.output_size()
    }

    /// Width of the classifier input: pooled glimpses + question vector.
    pub fn combined_features(&self) -> usize {
        self.glimpses * self.vision_features + self.question_features
    }
}
