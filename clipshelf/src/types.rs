/// A persisted catalog row describing one acquired artifact.
#[derive(Debug, Clone)]
pub struct CatalogRecord {
    pub id: i64,
    pub title: String,
    pub media_path: Option<String>,
    pub transcript_path: Option<String>,
    pub transcript: Option<String>,
    pub platform: String,
    pub category: String,
}

/// Insert payload for the catalog — everything but the store-assigned id.
#[derive(Debug, Clone)]
pub struct NewClip {
    pub title: String,
    pub media_path: Option<String>,
    pub transcript_path: Option<String>,
    pub transcript: Option<String>,
    pub platform: String,
    pub category: String,
}

/// Source platform for an acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Youtube,
    Instagram,
}

impl Platform {
    /// Parse a platform selector from a form value.
    ///
    /// Unrecognized values fall back to `Youtube` (the audio branch) rather
    /// than failing — a documented edge case, not a validation error.
    pub fn parse(s: &str) -> Self {
        match s {
            "instagram" => Platform::Instagram,
            _ => Platform::Youtube,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Youtube => "youtube",
            Platform::Instagram => "instagram",
        }
    }

    /// Whether this platform takes the audio-extraction branch, which
    /// includes transcription. The alternative is video passthrough.
    pub fn supports_transcription(&self) -> bool {
        matches!(self, Platform::Youtube)
    }
}
