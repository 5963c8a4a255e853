use std::fmt;

/// Top-level MIME category.
///
/// The wire format only ever carries these three categories; anything a
/// client declares outside of them is normalized to `Application`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Text,
    Image,
    Application,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Text => "text",
            Category::Image => "image",
            Category::Application => "application",
        }
    }
}

/// How file content moves between the store and the wire.
///
/// Derived once from the category and threaded through storage and
/// response handling; `Text` payloads must be valid UTF-8, `Binary`
/// payloads are opaque bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Text,
    Binary,
}

/// A `category/subtype` content type, e.g. `text/html` or `image/png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    pub category: Category,
    pub subtype: String,
}

const TEXT_SUBTYPES: [&str; 3] = ["html", "css", "plain"];
const IMAGE_SUBTYPES: [&str; 6] = ["png", "jpg", "jpeg", "gif", "svg+xml", "webp"];

impl ContentType {
    /// Resolves a content type from a file extension (no leading dot).
    ///
    /// `txt` maps to the `plain` subtype; unknown extensions fall through
    /// to `application/{extension}` rather than erroring.
    ///
    /// # Example
    ///
    /// ```
    /// # use thunder::http::mime::ContentType;
    /// assert_eq!(ContentType::from_extension("html").to_string(), "text/html");
    /// assert_eq!(ContentType::from_extension("txt").to_string(), "text/plain");
    /// assert_eq!(ContentType::from_extension("zip").to_string(), "application/zip");
    /// ```
    pub fn from_extension(extension: &str) -> Self {
        let subtype = if extension == "txt" { "plain" } else { extension };

        let category = if TEXT_SUBTYPES.contains(&subtype) {
            Category::Text
        } else if IMAGE_SUBTYPES.contains(&subtype) {
            Category::Image
        } else {
            Category::Application
        };

        Self {
            category,
            subtype: subtype.to_string(),
        }
    }

    /// Parses a client-declared `category/subtype` value.
    ///
    /// Returns `None` if the value has no `/` separator. Categories other
    /// than `text` and `image` collapse to `Application`.
    pub fn parse(value: &str) -> Option<Self> {
        let (category, subtype) = value.trim().split_once('/')?;

        let category = match category {
            "text" => Category::Text,
            "image" => Category::Image,
            _ => Category::Application,
        };

        Some(Self {
            category,
            subtype: subtype.to_string(),
        })
    }

    /// Whether payloads of this type move as raw bytes or UTF-8 text.
    pub fn transfer_mode(&self) -> TransferMode {
        match self.category {
            Category::Image => TransferMode::Binary,
            _ => TransferMode::Text,
        }
    }

    /// File extension used when storing an uploaded body of this type.
    ///
    /// Inverse of the `txt` -> `plain` mapping in [`from_extension`];
    /// other subtypes pass through unchanged.
    ///
    /// [`from_extension`]: ContentType::from_extension
    pub fn storage_extension(&self) -> &str {
        if self.subtype == "plain" {
            "txt"
        } else {
            &self.subtype
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category.as_str(), self.subtype)
    }
}
