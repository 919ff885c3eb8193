//! Site icon style resolution

/// Image shown when the site has no custom icon
pub const DEFAULT_ICON_URL: &str = "https://static.ghost.org/v4.0.0/images/ghost-orb-1.png";

/// Class marking the default icon
pub const DEFAULT_ICON_CLASS: &str = "gh-nav-logo-default";

/// Resolved icon presentation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IconStyle {
    /// Custom icon URL, `None` when the default image is used
    pub icon_url: Option<String>,

    /// Inline style for the icon element
    pub style: String,

    /// Extra class for the icon element, empty for custom icons
    pub class: String,
}

impl IconStyle {
    fn custom(url: &str) -> Self {
        Self {
            icon_url: Some(url.to_string()),
            style: background_image(url),
            class: String::new(),
        }
    }

    fn default_icon() -> Self {
        Self {
            icon_url: None,
            style: background_image(DEFAULT_ICON_URL),
            class: DEFAULT_ICON_CLASS.to_string(),
        }
    }
}

fn background_image(url: &str) -> String {
    format!("background-image: url({})", url)
}

fn is_absolute_url(icon: &str) -> bool {
    let lower = icon.get(..8).unwrap_or(icon).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Remembers the last icon so unchanged attributes are not recomputed
#[derive(Debug, Default)]
pub struct IconResolver {
    last: Option<Option<String>>,
    current: IconStyle,
}

impl IconResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Style from the last resolution, empty before the first one
    pub fn current(&self) -> &IconStyle {
        &self.current
    }

    /// Resolve the style for `icon`, `None` when it did not change
    pub fn resolve(&mut self, icon: Option<&str>) -> Option<&IconStyle> {
        if let Some(last) = &self.last {
            if last.as_deref() == icon {
                return None;
            }
        }
        self.last = Some(icon.map(str::to_string));

        self.current = match icon {
            Some(url) if is_absolute_url(url) => IconStyle::custom(url),
            _ => IconStyle::default_icon(),
        };
        Some(&self.current)
    }
}
