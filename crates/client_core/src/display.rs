//! Before/after view model rendered by the result panel.

use crate::captured::PreviewHandle;

pub const ORIGINAL_TITLE: &str = "Before";
pub const STAGED_TITLE: &str = "After";
pub const ORIGINAL_PLACEHOLDER: &str = "Upload an image to see the original.";
pub const STAGED_PLACEHOLDER: &str = "Your staged room will appear here.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Preview(PreviewHandle),
    Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCard {
    pub title: &'static str,
    pub source: Option<ImageSource>,
    pub placeholder: &'static str,
}

impl ImageCard {
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultDisplay {
    pub original: ImageCard,
    pub staged: ImageCard,
}

impl ResultDisplay {
    pub fn new(original: Option<PreviewHandle>, staged_url: Option<&str>) -> Self {
        Self {
            original: ImageCard {
                title: ORIGINAL_TITLE,
                source: original.map(ImageSource::Preview),
                placeholder: ORIGINAL_PLACEHOLDER,
            },
            staged: ImageCard {
                title: STAGED_TITLE,
                source: staged_url.map(|url| ImageSource::Url(url.to_string())),
                placeholder: STAGED_PLACEHOLDER,
            },
        }
    }

    pub fn staged_url(&self) -> Option<&str> {
        match &self.staged.source {
            Some(ImageSource::Url(url)) => Some(url),
            _ => None,
        }
    }

    pub fn cards(&self) -> [&ImageCard; 2] {
        [&self.original, &self.staged]
    }
}
