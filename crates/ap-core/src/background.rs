use serde::{Deserialize, Serialize};

/// Backdrop the backend is asked to render behind the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundStyle {
    #[default]
    Default,
    WhiteStudio,
    GreenScreen,
    DarkStudio,
}

impl BackgroundStyle {
    /// Name for display in UI
    pub fn name(&self) -> &str {
        match self {
            Self::Default => "Default (AI Decision)",
            Self::WhiteStudio => "White Studio (Clean)",
            Self::GreenScreen => "Green Screen (Chroma)",
            Self::DarkStudio => "Dark Studio (Mood)",
        }
    }

    /// Identifier sent to the backend as `bg_style`
    pub fn id(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::WhiteStudio => "white_studio",
            Self::GreenScreen => "green_screen",
            Self::DarkStudio => "dark_studio",
        }
    }

    /// Suffix appended to the generation prompt
    pub fn prompt_suffix(&self) -> &'static str {
        match self {
            Self::Default => "",
            Self::WhiteStudio => {
                ", solid white background, clean studio backdrop, no background objects, infinite white environment"
            }
            Self::GreenScreen => {
                ", solid green chroma key background, hex code #00FF00, flat color background, no shadows on wall"
            }
            Self::DarkStudio => ", solid dark grey background, professional studio lighting, dark mood",
        }
    }

    /// Parses an identifier, falling back to [`BackgroundStyle::Default`] for anything unknown.
    pub fn from_id_lossy(id: &str) -> Self {
        Self::all()
            .into_iter()
            .find(|style| style.id() == id.trim())
            .unwrap_or_default()
    }

    pub fn all() -> [BackgroundStyle; 4] {
        [Self::Default, Self::WhiteStudio, Self::GreenScreen, Self::DarkStudio]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_ids() {
        assert_eq!(BackgroundStyle::WhiteStudio.id(), "white_studio");
        assert_eq!(BackgroundStyle::GreenScreen.id(), "green_screen");
    }

    #[test]
    fn test_serde_matches_id() {
        for style in BackgroundStyle::all() {
            let json = serde_json::to_string(&style).unwrap();
            assert_eq!(json, format!("\"{}\"", style.id()));
        }
    }

    #[test]
    fn test_unknown_falls_back_to_default() {
        assert_eq!(BackgroundStyle::from_id_lossy("dark_studio"), BackgroundStyle::DarkStudio);
        assert_eq!(BackgroundStyle::from_id_lossy("neon_city"), BackgroundStyle::Default);
        assert_eq!(BackgroundStyle::from_id_lossy(""), BackgroundStyle::Default);
    }

    #[test]
    fn test_default_has_no_suffix() {
        assert!(BackgroundStyle::Default.prompt_suffix().is_empty());
        assert!(BackgroundStyle::DarkStudio.prompt_suffix().starts_with(", "));
    }
}
