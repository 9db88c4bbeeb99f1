//! Channel (theme) types.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A selectable narrative starting point with its own visual identity.
///
/// Themes are immutable once fetched and are identified by `id`.
///
/// # Examples
///
/// ```
/// use cable_core::ThemeBuilder;
///
/// let theme = ThemeBuilder::default()
///     .id("lego_flux".to_string())
///     .label("Lego Flux".to_string())
///     .build()
///     .unwrap();
///
/// assert_eq!(theme.id(), "lego_flux");
/// assert!(theme.icon().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Serialize, Deserialize, derive_builder::Builder)]
pub struct Theme {
    /// Stable identifier
    id: String,

    /// Display name
    label: String,

    /// One-line pitch for the channel
    #[builder(default)]
    #[serde(default)]
    description: String,

    /// Emoji or icon name
    #[builder(default)]
    #[serde(default)]
    icon: String,

    /// CSS-style accent color
    #[builder(default)]
    #[serde(default)]
    accent_color: String,
}
