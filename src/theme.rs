#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn toggle_label(self) -> String {
        let next = self.toggled().as_str();
        format!("Switch to {next} theme")
    }

    pub fn pressed(self) -> bool {
        matches!(self, Self::Dark)
    }
}

/// Stored preference wins, then the OS dark-mode signal, then light.
pub fn resolve_theme(stored: Option<Theme>, system_prefers_dark: bool) -> Theme {
    stored.unwrap_or(if system_prefers_dark {
        Theme::Dark
    } else {
        Theme::Light
    })
}

/// Theme to apply after an OS preference change, or `None` when an explicit
/// user choice is stored and must be left alone.
pub fn theme_for_system_change(stored: Option<Theme>, system_prefers_dark: bool) -> Option<Theme> {
    match stored {
        Some(_) => None,
        None => Some(resolve_theme(None, system_prefers_dark)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_dark_applies_without_stored_preference() {
        assert_eq!(resolve_theme(None, true), Theme::Dark);
        assert_eq!(resolve_theme(None, false), Theme::Light);
    }

    #[test]
    fn stored_preference_beats_system_signal() {
        assert_eq!(resolve_theme(Some(Theme::Light), true), Theme::Light);
        assert_eq!(theme_for_system_change(Some(Theme::Light), true), None);
        assert_eq!(theme_for_system_change(Some(Theme::Dark), false), None);
    }

    #[test]
    fn system_change_is_followed_until_user_chooses() {
        assert_eq!(theme_for_system_change(None, true), Some(Theme::Dark));
        assert_eq!(theme_for_system_change(None, false), Some(Theme::Light));
    }

    #[test]
    fn unknown_stored_value_is_rejected() {
        assert_eq!(Theme::from_str("sepia"), None);
        assert_eq!(Theme::from_str("dark"), Some(Theme::Dark));
    }

    #[test]
    fn toggle_flips_and_reports_pressed_state() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert!(Theme::Dark.pressed());
        assert!(!Theme::Light.pressed());
        assert_eq!(Theme::Dark.toggle_label(), "Switch to light theme");
    }
}
