use serde::{Deserialize, Serialize};

pub const DEFAULT_PRIMARY_COLOR: &str = "#3b82f6";
pub const MIN_TEXT_SCALE: f64 = 0.7;
pub const MAX_TEXT_SCALE: f64 = 1.5;
pub const TEXT_SCALE_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeTemplate {
    /// Single column, chronological.
    #[default]
    Modern,
    /// Centered, formal.
    Classic,
    /// Colored sidebar plus main column.
    Creative,
}

impl ResumeTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResumeTemplate::Modern => "modern",
            ResumeTemplate::Classic => "classic",
            ResumeTemplate::Creative => "creative",
        }
    }

    pub fn from_name(name: &str) -> Option<ResumeTemplate> {
        match name {
            "modern" => Some(ResumeTemplate::Modern),
            "classic" => Some(ResumeTemplate::Classic),
            "creative" => Some(ResumeTemplate::Creative),
            _ => None,
        }
    }
}

/// Display configuration, stored and defaulted independently of the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeSettings {
    pub template: ResumeTemplate,
    pub primary_color: String,
    pub show_contact_icons: bool,
    pub show_section_icons: bool,
    pub text_scale: f64,
}

impl Default for ResumeSettings {
    fn default() -> Self {
        Self {
            template: ResumeTemplate::Modern,
            primary_color: DEFAULT_PRIMARY_COLOR.to_string(),
            show_contact_icons: true,
            show_section_icons: true,
            text_scale: 1.0,
        }
    }
}

/// Shallow-merge input for [`ResumeSettings`]. `text_scale` is taken as given, unclamped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub template: Option<ResumeTemplate>,
    pub primary_color: Option<String>,
    pub show_contact_icons: Option<bool>,
    pub show_section_icons: Option<bool>,
    pub text_scale: Option<f64>,
}

impl ResumeSettings {
    pub fn merged(&self, patch: SettingsPatch) -> ResumeSettings {
        ResumeSettings {
            template: patch.template.unwrap_or(self.template),
            primary_color: patch
                .primary_color
                .unwrap_or_else(|| self.primary_color.clone()),
            show_contact_icons: patch.show_contact_icons.unwrap_or(self.show_contact_icons),
            show_section_icons: patch.show_section_icons.unwrap_or(self.show_section_icons),
            text_scale: patch.text_scale.unwrap_or(self.text_scale),
        }
    }

    pub fn with_larger_text(&self) -> ResumeSettings {
        self.with_text_scale(step_scale(self.text_scale, TEXT_SCALE_STEP))
    }

    pub fn with_smaller_text(&self) -> ResumeSettings {
        self.with_text_scale(step_scale(self.text_scale, -TEXT_SCALE_STEP))
    }

    pub fn with_default_text_size(&self) -> ResumeSettings {
        self.with_text_scale(1.0)
    }

    fn with_text_scale(&self, text_scale: f64) -> ResumeSettings {
        ResumeSettings {
            text_scale,
            ..self.clone()
        }
    }
}

/// Steps the scale and clamps it, rounding to one decimal so repeated steps don't drift.
fn step_scale(current: f64, delta: f64) -> f64 {
    let current = if current.is_finite() { current } else { 1.0 };
    let stepped = ((current + delta) * 10.0).round() / 10.0;
    stepped.clamp(MIN_TEXT_SCALE, MAX_TEXT_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_stops_at_max() {
        let mut settings = ResumeSettings::default();
        for _ in 0..20 {
            settings = settings.with_larger_text();
        }
        assert_eq!(settings.text_scale, MAX_TEXT_SCALE);
    }

    #[test]
    fn test_decrease_stops_at_min() {
        let mut settings = ResumeSettings::default();
        for _ in 0..20 {
            settings = settings.with_smaller_text();
        }
        assert_eq!(settings.text_scale, MIN_TEXT_SCALE);
    }

    #[test]
    fn test_steps_do_not_drift() {
        let settings = ResumeSettings::default()
            .with_larger_text()
            .with_larger_text()
            .with_larger_text();
        assert_eq!(settings.text_scale, 1.3);
        let settings = settings.with_smaller_text().with_smaller_text();
        assert_eq!(settings.text_scale, 1.1);
    }

    #[test]
    fn test_mixed_steps_stay_in_range() {
        let mut settings = ResumeSettings::default();
        let pattern = [true, true, false, true, true, true, true, true, false, false];
        for _ in 0..10 {
            for up in pattern {
                settings = if up {
                    settings.with_larger_text()
                } else {
                    settings.with_smaller_text()
                };
                assert!((MIN_TEXT_SCALE..=MAX_TEXT_SCALE).contains(&settings.text_scale));
            }
        }
    }

    #[test]
    fn test_direct_update_is_not_clamped() {
        let settings = ResumeSettings::default().merged(SettingsPatch {
            text_scale: Some(3.0),
            ..Default::default()
        });
        assert_eq!(settings.text_scale, 3.0);
        // the next step pulls it back into range
        assert_eq!(settings.with_smaller_text().text_scale, MAX_TEXT_SCALE);
    }

    #[test]
    fn test_reset_text_size() {
        let settings = ResumeSettings::default().with_larger_text().with_default_text_size();
        assert_eq!(settings.text_scale, 1.0);
    }

    #[test]
    fn test_merge_keeps_unspecified_fields() {
        let settings = ResumeSettings::default().merged(SettingsPatch {
            template: Some(ResumeTemplate::Creative),
            show_contact_icons: Some(false),
            ..Default::default()
        });
        assert_eq!(settings.template, ResumeTemplate::Creative);
        assert!(!settings.show_contact_icons);
        assert!(settings.show_section_icons);
        assert_eq!(settings.primary_color, DEFAULT_PRIMARY_COLOR);
    }

    #[test]
    fn test_template_names() {
        for template in [
            ResumeTemplate::Modern,
            ResumeTemplate::Classic,
            ResumeTemplate::Creative,
        ] {
            assert_eq!(ResumeTemplate::from_name(template.as_str()), Some(template));
        }
        assert_eq!(ResumeTemplate::from_name("executive"), None);
    }
}
