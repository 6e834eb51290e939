//! Presentation settings shared by every view in the frame flow.

/// Frame background: a solid fill or a hosted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Color(String),
    Image(String),
}

/// Styling applied uniformly across the flow.
///
/// Restyled variants of the checker differ only in these fields, so they are
/// configuration rather than separate handler sets.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: String,
    pub token_symbol: String,
    pub background: Background,
    pub text_color: String,
    pub accent_color: String,
    pub error_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: "Farcaster $GOLDIES Balance Checker".to_string(),
            token_symbol: "$GOLDIES".to_string(),
            background: Background::Color("#f0f0f0".to_string()),
            text_color: "#1a1a1a".to_string(),
            accent_color: "#7b3fe4".to_string(),
            error_color: "#cc0000".to_string(),
        }
    }
}
