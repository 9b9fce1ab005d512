use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

macro_rules! labelled_enum {
    ($name:ident { $($variant:ident => $label:expr),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_label(value: &str) -> Option<Self> {
                let value = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.label().eq_ignore_ascii_case(value))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

/// Decor style the generated room should be furnished in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StagingStyle {
    #[default]
    #[serde(rename = "Modern")]
    Modern,
    #[serde(rename = "Scandinavian")]
    Scandinavian,
    #[serde(rename = "Industrial")]
    Industrial,
    #[serde(rename = "Bohemian")]
    Bohemian,
    #[serde(rename = "Minimalist")]
    Minimalist,
    #[serde(rename = "Mid-Century Modern")]
    MidCenturyModern,
    #[serde(rename = "Coastal")]
    Coastal,
    #[serde(rename = "Farmhouse")]
    Farmhouse,
    #[serde(rename = "Traditional")]
    Traditional,
    #[serde(rename = "Japandi")]
    Japandi,
}

labelled_enum!(StagingStyle {
    Modern => "Modern",
    Scandinavian => "Scandinavian",
    Industrial => "Industrial",
    Bohemian => "Bohemian",
    Minimalist => "Minimalist",
    MidCenturyModern => "Mid-Century Modern",
    Coastal => "Coastal",
    Farmhouse => "Farmhouse",
    Traditional => "Traditional",
    Japandi => "Japandi",
});

/// Image encodings accepted as staging input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageMimeType {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/webp")]
    Webp,
}

labelled_enum!(ImageMimeType {
    Png => "image/png",
    Jpeg => "image/jpeg",
    Webp => "image/webp",
});

impl ImageMimeType {
    pub fn as_str(self) -> &'static str {
        self.label()
    }

    pub fn parse(value: &str) -> Result<Self, DomainError> {
        // "image/jpg" shows up from some pickers and is not a registered type.
        let normalized = match value.trim().to_ascii_lowercase().as_str() {
            "image/jpg" | "image/pjpeg" => "image/jpeg".to_string(),
            other => other.to_string(),
        };
        Self::from_label(&normalized)
            .ok_or_else(|| DomainError::UnsupportedMimeType(value.to_string()))
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageMimeType::Png => "png",
            ImageMimeType::Jpeg => "jpg",
            ImageMimeType::Webp => "webp",
        }
    }

    /// File-picker extensions covering every accepted type.
    pub fn picker_extensions() -> &'static [&'static str] {
        &["png", "jpg", "jpeg", "webp"]
    }
}
