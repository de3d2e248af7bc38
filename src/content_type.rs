//! Mapping from image `Content-Type` headers to artifact file extensions

use std::fmt;

/// File extension an artifact is persisted with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageExtension {
    /// `image/png`
    Png,
    /// `image/jpeg` and the non-standard `image/jpg`
    Jpg,
}

impl ImageExtension {
    /// Resolve a `Content-Type` header value to an extension
    ///
    /// Parameters such as `; charset=binary` and ASCII case are ignored.
    /// Returns `None` for any MIME type outside the supported set.
    ///
    /// # Examples
    ///
    /// ```
    /// use nft_art_dl::content_type::ImageExtension;
    ///
    /// assert_eq!(ImageExtension::from_content_type("image/png"), Some(ImageExtension::Png));
    /// assert_eq!(ImageExtension::from_content_type("image/gif"), None);
    /// ```
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "image/png" => Some(ImageExtension::Png),
            "image/jpeg" | "image/jpg" => Some(ImageExtension::Jpg),
            _ => None,
        }
    }

    /// Extension without the leading dot
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageExtension::Png => "png",
            ImageExtension::Jpg => "jpg",
        }
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
