//! Parameter payloads exchanged with the pipeline and transport.

use serde::{Deserialize, Serialize};

/// Weight given to the single prompt of a blend.
pub const MAX_PROMPT_WEIGHT: f32 = 100.0;

/// How multiple prompts are blended in conditioning space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Linear interpolation
    Linear,
    /// Spherical linear interpolation
    #[default]
    Slerp,
}

/// A prompt and its blend weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedPrompt {
    /// Prompt text
    pub text: String,
    /// Blend weight
    pub weight: f32,
}

/// Parameters sent when opening a stream or updating one in place.
///
/// # Examples
///
/// ```
/// use cable_core::{InterpolationMethod, PromptParams, MAX_PROMPT_WEIGHT};
///
/// let update = PromptParams::blend("sky city");
/// assert_eq!(update.prompts.len(), 1);
/// assert_eq!(update.prompts[0].weight, MAX_PROMPT_WEIGHT);
/// assert_eq!(update.prompt_interpolation_method, InterpolationMethod::Slerp);
/// assert!(update.denoising_step_list.is_none());
///
/// let open = PromptParams::blend("neon city").with_activation(vec![1000, 750], true);
/// assert_eq!(open.manage_cache, Some(true));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptParams {
    /// Prompts to blend
    pub prompts: Vec<WeightedPrompt>,
    /// Blend method
    pub prompt_interpolation_method: InterpolationMethod,
    /// Denoising timesteps, only sent on open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denoising_step_list: Option<Vec<u32>>,
    /// Cache management flag, only sent on open
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manage_cache: Option<bool>,
}

impl PromptParams {
    /// Single-prompt slerp blend at full weight.
    pub fn blend(prompt: impl Into<String>) -> Self {
        Self {
            prompts: vec![WeightedPrompt {
                text: prompt.into(),
                weight: MAX_PROMPT_WEIGHT,
            }],
            prompt_interpolation_method: InterpolationMethod::Slerp,
            denoising_step_list: None,
            manage_cache: None,
        }
    }

    /// Adds the fields only sent when a stream is first opened.
    pub fn with_activation(mut self, denoising_steps: Vec<u32>, manage_cache: bool) -> Self {
        self.denoising_step_list = Some(denoising_steps);
        self.manage_cache = Some(manage_cache);
        self
    }

    /// Text of the first prompt.
    pub fn primary_text(&self) -> Option<&str> {
        self.prompts.first().map(|prompt| prompt.text.as_str())
    }
}

/// Parameters for a pipeline load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadParams {
    /// Frame height
    pub height: u32,
    /// Frame width
    pub width: u32,
    /// Sampling seed
    pub seed: u64,
}

/// Whether a pipeline's model assets are present locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ModelStatus {
    /// Assets downloaded
    pub downloaded: bool,
}

/// Reactive signals exposed by the media transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TransportStatus {
    /// A remote media stream is attached
    pub remote_stream_attached: bool,
    /// Connection negotiation is in progress
    pub is_negotiating: bool,
}

impl TransportStatus {
    /// True when a stream exists in any form, including one still negotiating.
    pub fn is_present(&self) -> bool {
        self.remote_stream_attached || self.is_negotiating
    }
}
