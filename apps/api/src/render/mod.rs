//! Resume templates.
//!
//! Each template is a pure mapping from (document, settings) to a [`Node`] tree. All of them
//! render the same fields and omit sections that have nothing to show; they differ only in
//! arrangement, iconography and where the primary color is applied.

pub mod classic;
pub mod creative;
pub mod modern;
pub mod node;

use crate::models::resume::{PersonalInfo, ResumeData};
use crate::models::settings::{ResumeSettings, ResumeTemplate};

pub use classic::ClassicTemplate;
pub use creative::CreativeTemplate;
pub use modern::ModernTemplate;
pub use node::{el, text, Element, Node};

/// Element id of the preview surface handed to the exporter.
pub const PREVIEW_ELEMENT_ID: &str = "resume-preview";

pub trait TemplateRenderer: Send + Sync {
    fn render(&self, resume: &ResumeData, settings: &ResumeSettings) -> Node;
}

pub fn renderer_for(template: ResumeTemplate) -> &'static dyn TemplateRenderer {
    match template {
        ResumeTemplate::Modern => &ModernTemplate,
        ResumeTemplate::Classic => &ClassicTemplate,
        ResumeTemplate::Creative => &CreativeTemplate,
    }
}

/// The uniquely identifiable preview surface wrapping the selected template.
pub fn render_preview(resume: &ResumeData, settings: &ResumeSettings) -> Node {
    let body = renderer_for(settings.template).render(resume, settings);
    el("div")
        .attr("id", PREVIEW_ELEMENT_ID)
        .class("resume-container")
        .class(&format!("template-{}", settings.template.as_str()))
        .attr(
            "style",
            format!(
                "--resume-primary: {}; --resume-text-scale: {};",
                settings.primary_color, settings.text_scale
            ),
        )
        .child(body)
        .into()
}

/// A standalone HTML page containing only the preview, sized for a letter page.
pub fn render_document(resume: &ResumeData, settings: &ResumeSettings) -> String {
    let title = if resume.personal.name.is_empty() {
        "Resume".to_string()
    } else {
        format!("{} - Resume", resume.personal.name)
    };
    let head = el("head")
        .child(el("meta").attr("charset", "utf-8"))
        .child(el("title").text(title))
        .child(el("style").text(BASE_STYLE));
    let page: Node = el("html")
        .attr("lang", "en")
        .child(head)
        .child(el("body").child(render_preview(resume, settings)))
        .into();
    format!("<!DOCTYPE html>\n{}", page.to_html())
}

const BASE_STYLE: &str = "\
@page { size: letter portrait; margin: 0; }
body { margin: 0; font-family: Inter, Helvetica, Arial, sans-serif; color: #1f2937; }
.resume-container { width: 8.5in; min-height: 11in; background: #ffffff; font-size: calc(11pt * var(--resume-text-scale)); }
.text-primary { color: var(--resume-primary); }
.bg-primary { background-color: var(--resume-primary); color: #ffffff; }
.border-primary { border-color: var(--resume-primary); }
.icon { display: inline-block; width: 1em; height: 1em; margin-right: 0.25em; }
";

// ────────────────────────────────────────────────────────────────────────────
// Shared pieces
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn display_name(personal: &PersonalInfo) -> &str {
    if personal.name.is_empty() {
        "Your Name"
    } else {
        &personal.name
    }
}

pub(crate) fn date_range(start: &str, end: &str) -> String {
    format!("{start} - {end}")
}

pub(crate) fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

pub(crate) fn has_skills(resume: &ResumeData) -> bool {
    resume.skills.iter().any(|c| !c.skills.is_empty())
}

/// Decorative icon placeholder; the stylesheet supplies the glyph.
pub(crate) fn icon(name: &str) -> Element {
    el("span")
        .class("icon")
        .class(&format!("icon-{name}"))
        .attr("aria-hidden", "true")
}

pub(crate) fn external_link(href: &str, label: impl Into<String>) -> Element {
    el("a")
        .attr("href", href)
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
        .text(label)
}

pub(crate) fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::resume::*;
    use crate::resume::mutations::Mutation;

    pub fn full_resume() -> ResumeData {
        let mutations = vec![
            Mutation::UpdatePersonal {
                personal: PersonalInfoPatch {
                    name: Some("Ada Lovelace".to_string()),
                    email: Some("ada@example.com".to_string()),
                    phone: Some("+44 20 0000".to_string()),
                    location: Some("London".to_string()),
                    website: Some("https://ada.dev".to_string()),
                    github: Some("https://github.com/ada".to_string()),
                    linkedin: Some("https://linkedin.com/in/ada".to_string()),
                    profile_image: None,
                },
            },
            Mutation::UpdateObjective {
                objective: "Analytical engine enthusiast.".to_string(),
            },
            Mutation::AddEducation {
                education: EducationDraft {
                    degree: "B.Sc Mathematics".to_string(),
                    institution: "University of London".to_string(),
                    location: "London".to_string(),
                    start_date: "1830".to_string(),
                    end_date: "1834".to_string(),
                    grade: "First".to_string(),
                    description: None,
                },
            },
            Mutation::AddExperience {
                experience: ExperienceDraft {
                    title: "Research Intern".to_string(),
                    company: "Babbage & Co".to_string(),
                    location: "London".to_string(),
                    start_date: "1842".to_string(),
                    end_date: "1843".to_string(),
                    description: "Translated and annotated the engine memoir.".to_string(),
                    achievements: vec!["Published Note G".to_string()],
                    is_internship: true,
                },
            },
            Mutation::UpdateSkills {
                category_index: 0,
                skills: vec!["Rust".to_string(), "Ada".to_string()],
            },
            Mutation::AddProject {
                project: ProjectDraft {
                    title: "Bernoulli numbers".to_string(),
                    description: "First published algorithm.".to_string(),
                    technologies: vec!["Punch cards".to_string()],
                    start_date: "1842".to_string(),
                    end_date: "1843".to_string(),
                    link: Some("https://example.com/note-g".to_string()),
                },
            },
            Mutation::AddCertification {
                certification: CertificationDraft {
                    title: "Certified Engine Operator".to_string(),
                    issuer: "Royal Society".to_string(),
                    date: "1844".to_string(),
                    link: None,
                },
            },
            Mutation::AddAchievement {
                achievement: AchievementDraft {
                    title: "First programmer".to_string(),
                    date: "1843".to_string(),
                    description: "Recognised posthumously.".to_string(),
                },
            },
        ];
        mutations
            .into_iter()
            .try_fold(ResumeData::default(), |resume, m| resume.apply(m))
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::full_resume;
    use super::*;
    use crate::models::settings::SettingsPatch;

    const ALL_TEMPLATES: [ResumeTemplate; 3] = [
        ResumeTemplate::Modern,
        ResumeTemplate::Classic,
        ResumeTemplate::Creative,
    ];

    fn settings_for(template: ResumeTemplate) -> ResumeSettings {
        ResumeSettings::default().merged(SettingsPatch {
            template: Some(template),
            ..Default::default()
        })
    }

    #[test]
    fn test_every_template_renders_every_field() {
        let resume = full_resume();
        for template in ALL_TEMPLATES {
            let content = render_preview(&resume, &settings_for(template)).text_content();
            for expected in [
                "Ada Lovelace",
                "ada@example.com",
                "+44 20 0000",
                "Analytical engine enthusiast.",
                "B.Sc Mathematics",
                "Research Intern",
                "Published Note G",
                "Rust",
                "Bernoulli numbers",
                "Punch cards",
                "Certified Engine Operator",
                "First programmer",
            ] {
                assert!(
                    content.contains(expected),
                    "{} template is missing '{expected}'",
                    template.as_str()
                );
            }
        }
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let resume = ResumeData::default();
        for template in ALL_TEMPLATES {
            let preview = render_preview(&resume, &settings_for(template));
            let content = preview.text_content();
            assert!(content.contains("Your Name"));
            for heading in ["Education", "Experience", "Projects", "Skills", "Certifications"] {
                assert!(
                    !content.contains(heading),
                    "{} template rendered empty '{heading}'",
                    template.as_str()
                );
            }
            assert!(preview.find(&|e| e.tag == "section").is_none());
        }
    }

    #[test]
    fn test_preview_surface_is_identifiable() {
        let preview = render_preview(&full_resume(), &ResumeSettings::default());
        let root = preview
            .find(&|e| e.get_attr("id") == Some(PREVIEW_ELEMENT_ID))
            .unwrap();
        let style = root.get_attr("style").unwrap();
        assert!(style.contains("--resume-primary: #3b82f6"));
        assert!(style.contains("--resume-text-scale: 1"));
    }

    #[test]
    fn test_document_is_standalone_html() {
        let html = render_document(&full_resume(), &ResumeSettings::default());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Ada Lovelace - Resume</title>"));
        assert!(html.contains("id=\"resume-preview\""));
        assert!(html.contains("size: letter portrait"));
    }

    #[test]
    fn test_strip_scheme() {
        assert_eq!(strip_scheme("https://ada.dev"), "ada.dev");
        assert_eq!(strip_scheme("http://ada.dev"), "ada.dev");
        assert_eq!(strip_scheme("ada.dev"), "ada.dev");
    }
}
