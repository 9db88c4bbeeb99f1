//! Built-in channel catalog.

use cable_core::{Theme, ThemeBuilder};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Cues offered when the model does not supply enough of its own.
pub const DEFAULT_CUES: [&str; 4] = [
    "Introduce a new character",
    "Switch camera angle",
    "Trigger a cosmic glitch",
    "Reveal a hidden motive",
];

/// A channel plus the visual DNA every one of its frames inherits.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct StoryTheme {
    /// Public channel description
    #[serde(flatten)]
    theme: Theme,
    /// Style prompt blended into every visual directive
    base_prompt: String,
}

impl StoryTheme {
    /// Pairs a channel with its base prompt.
    pub fn new(theme: Theme, base_prompt: impl Into<String>) -> Self {
        Self {
            theme,
            base_prompt: base_prompt.into(),
        }
    }
}

fn channel(
    id: &str,
    label: &str,
    description: &str,
    icon: &str,
    accent_color: &str,
    base_prompt: &str,
) -> Option<StoryTheme> {
    let theme = ThemeBuilder::default()
        .id(id.to_string())
        .label(label.to_string())
        .description(description.to_string())
        .icon(icon.to_string())
        .accent_color(accent_color.to_string())
        .build()
        .ok()?;
    Some(StoryTheme::new(theme, base_prompt))
}

/// Channels shipped with the engine, in display order.
///
/// # Examples
///
/// ```
/// let themes = cable_story::builtin_themes();
/// assert_eq!(themes[0].theme().id(), "pixar_portal");
/// ```
pub fn builtin_themes() -> Vec<StoryTheme> {
    [
        channel(
            "pixar_portal",
            "Pixar Portal",
            "Wholesome, cinematic adventures with plush lighting and sweeping camera moves.",
            "🎬",
            "#f4b860",
            "Pixar style cinematic frame, global illumination, volumetric god rays, soft depth of field, playful energy.",
        ),
        channel(
            "lego_flux",
            "Lego Flux",
            "Stop-motion brick worlds where everything clicks, pops, and snaps into place.",
            "🧱",
            "#ff4d6d",
            "LEGO brick universe, macro cinematography, vibrant plastic sheen, dynamic dioramas, tilt shift focus.",
        ),
        channel(
            "minecraft_echo",
            "Minecraft Echo",
            "Voxel folk tales, shader-lit landscapes, and redstone-powered drama.",
            "⛏️",
            "#7ae582",
            "Minecraft voxel scene, path-traced lighting, saturated pixel shaders, cinematic camera, volumetric fog.",
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
