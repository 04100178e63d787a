//! Shared domain enumerations and the publish-state model.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Publication state of a post, resolved once at the store boundary.
///
/// Legacy rows may omit the `published` flag entirely; absence has always
/// meant "visible", so only an explicit `false` resolves to a draft. A draft
/// keeps the timestamp of its most recent publish cycle: unpublishing never
/// clears it, and re-publishing stamps a fresh one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PublishState {
    Published {
        at: OffsetDateTime,
    },
    Draft {
        last_published_at: Option<OffsetDateTime>,
    },
}

impl PublishState {
    /// Resolve the stored representation into the tagged one.
    pub fn resolve(
        published: Option<bool>,
        published_at: Option<OffsetDateTime>,
        created_at: OffsetDateTime,
    ) -> Self {
        match published {
            Some(false) => PublishState::Draft {
                last_published_at: published_at,
            },
            _ => PublishState::Published {
                at: published_at.unwrap_or(created_at),
            },
        }
    }

    pub fn is_published(self) -> bool {
        matches!(self, PublishState::Published { .. })
    }

    /// Timestamp of the most recent publish, if the post has ever been
    /// published. Meaningful for display even on drafts.
    pub fn published_at(self) -> Option<OffsetDateTime> {
        match self {
            PublishState::Published { at } => Some(at),
            PublishState::Draft { last_published_at } => last_published_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    Generated,
    Uploaded,
}

impl ImageSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSource::Generated => "generated",
            ImageSource::Uploaded => "uploaded",
        }
    }
}

impl TryFrom<&str> for ImageSource {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "generated" => Ok(ImageSource::Generated),
            "uploaded" => Ok(ImageSource::Uploaded),
            _ => Err(()),
        }
    }
}

/// Selectable external image-generation models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageModel {
    FluxSchnell,
    FluxDev,
    Sdxl,
}

impl ImageModel {
    pub const ALL: [ImageModel; 3] = [
        ImageModel::FluxSchnell,
        ImageModel::FluxDev,
        ImageModel::Sdxl,
    ];

    /// Identifier sent to the external API.
    pub fn identifier(self) -> &'static str {
        match self {
            ImageModel::FluxSchnell => "flux-schnell",
            ImageModel::FluxDev => "flux-dev",
            ImageModel::Sdxl => "sdxl",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ImageModel::FluxSchnell => "Flux Schnell",
            ImageModel::FluxDev => "Flux Dev",
            ImageModel::Sdxl => "Stable Diffusion XL",
        }
    }
}

/// Size presets accepted by the external image-generation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "landscape_16_9")]
    Landscape169,
    #[serde(rename = "square")]
    Square,
    #[serde(rename = "portrait_4_3")]
    Portrait43,
}

impl ImageSize {
    /// Pixel dimensions in the `WxH` form the API expects.
    pub fn dimensions(self) -> &'static str {
        match self {
            ImageSize::Landscape169 => "1344x768",
            ImageSize::Square => "1024x1024",
            ImageSize::Portrait43 => "768x1024",
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn absent_published_flag_resolves_to_published() {
        let created = datetime!(2026-01-10 08:00 UTC);
        let state = PublishState::resolve(None, Some(datetime!(2026-01-12 09:30 UTC)), created);
        assert_eq!(
            state,
            PublishState::Published {
                at: datetime!(2026-01-12 09:30 UTC)
            }
        );
    }

    #[test]
    fn published_without_timestamp_falls_back_to_creation_time() {
        let created = datetime!(2026-01-10 08:00 UTC);
        let state = PublishState::resolve(Some(true), None, created);
        assert_eq!(state.published_at(), Some(created));
    }

    #[test]
    fn explicit_false_resolves_to_draft_and_keeps_stale_timestamp() {
        let created = datetime!(2026-01-10 08:00 UTC);
        let stale = datetime!(2026-01-11 12:00 UTC);
        let state = PublishState::resolve(Some(false), Some(stale), created);
        assert!(!state.is_published());
        assert_eq!(state.published_at(), Some(stale));
    }
}
