use crate::models::resume::ResumeData;
use crate::models::settings::ResumeSettings;
use crate::render::node::{el, Element, Node};
use crate::render::{
    date_range, display_name, external_link, has_skills, icon, non_empty, strip_scheme,
    TemplateRenderer,
};

/// Single-column chronological layout with an accent-colored header.
pub struct ModernTemplate;

impl TemplateRenderer for ModernTemplate {
    fn render(&self, resume: &ResumeData, settings: &ResumeSettings) -> Node {
        let ctx = Ctx { settings };
        el("div")
            .class("modern")
            .child(ctx.header(resume))
            .child(
                el("div")
                    .class("modern-body")
                    .maybe(ctx.education(resume))
                    .maybe(ctx.experience(resume))
                    .maybe(ctx.skills(resume))
                    .maybe(ctx.projects(resume))
                    .maybe(ctx.credentials(resume)),
            )
            .into()
    }
}

struct Ctx<'a> {
    settings: &'a ResumeSettings,
}

impl Ctx<'_> {
    fn header(&self, resume: &ResumeData) -> Element {
        let personal = &resume.personal;

        let contacts = [
            ("mail", personal.email.as_str()),
            ("phone", personal.phone.as_str()),
            ("map-pin", personal.location.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| self.contact_item(name, el("span").text(value)));

        let links = [
            ("globe", personal.website.as_str()),
            ("github", personal.github.as_str()),
            ("linkedin", personal.linkedin.as_str()),
        ]
        .into_iter()
        .filter(|(_, url)| !url.is_empty())
        .map(|(name, url)| self.contact_item(name, external_link(url, strip_scheme(url))));

        el("header")
            .class("modern-header")
            .maybe(non_empty(&personal.profile_image).map(|src| {
                el("img")
                    .class("profile-image")
                    .class("border-primary")
                    .attr("src", src)
                    .attr("alt", "Profile")
            }))
            .child(
                el("div")
                    .child(el("h1").class("text-primary").text(display_name(personal)))
                    .maybe(non_empty(&resume.objective).map(|o| el("p").class("objective").text(o)))
                    .child(el("div").class("contact-row").children(contacts))
                    .child(el("div").class("contact-row").children(links)),
            )
    }

    fn contact_item(&self, icon_name: &str, content: Element) -> Element {
        let item = el("div").class("contact-item");
        let item = if self.settings.show_contact_icons {
            item.child(icon(icon_name).class("text-primary"))
        } else {
            item
        };
        item.child(content)
    }

    fn section(&self, title: &str, icon_name: &str) -> Element {
        let heading = el("h2").class("border-primary");
        let heading = if self.settings.show_section_icons {
            heading.child(icon(icon_name).class("text-primary"))
        } else {
            heading
        };
        el("section").child(heading.text(title))
    }

    fn dated(&self, start: &str, end: &str) -> Element {
        let span = el("span").class("dates");
        let span = if self.settings.show_section_icons {
            span.child(icon("calendar"))
        } else {
            span
        };
        span.text(date_range(start, end))
    }

    fn education(&self, resume: &ResumeData) -> Option<Element> {
        if resume.education.is_empty() {
            return None;
        }
        let entries = resume.education.iter().map(|edu| {
            el("div")
                .class("entry")
                .child(
                    el("div")
                        .class("entry-head")
                        .child(
                            el("div")
                                .child(el("h3").text(&edu.degree))
                                .child(el("p").text(format!("{}, {}", edu.institution, edu.location))),
                        )
                        .child(self.dated(&edu.start_date, &edu.end_date)),
                )
                .maybe(non_empty(&edu.grade).map(|g| el("p").text(format!("Grade: {g}"))))
                .maybe(
                    edu.description
                        .as_deref()
                        .and_then(non_empty)
                        .map(|d| el("p").class("muted").text(d)),
                )
        });
        Some(self.section("Education", "book-open").children(entries))
    }

    fn experience(&self, resume: &ResumeData) -> Option<Element> {
        if resume.experience.is_empty() {
            return None;
        }
        let entries = resume.experience.iter().map(|exp| {
            let title = el("div").class("title-row").child(el("h3").text(&exp.title));
            let title = if exp.is_internship {
                title.child(el("span").class("badge").class("text-primary").text("Internship"))
            } else {
                title
            };
            let achievements = (!exp.achievements.is_empty()).then(|| {
                el("ul").children(exp.achievements.iter().map(|a| el("li").text(a)))
            });
            el("div")
                .class("entry")
                .child(
                    el("div")
                        .class("entry-head")
                        .child(
                            el("div")
                                .child(title)
                                .child(el("p").text(format!("{}, {}", exp.company, exp.location))),
                        )
                        .child(self.dated(&exp.start_date, &exp.end_date)),
                )
                .child(el("p").class("muted").text(&exp.description))
                .maybe(achievements)
        });
        Some(self.section("Experience", "briefcase").children(entries))
    }

    fn skills(&self, resume: &ResumeData) -> Option<Element> {
        if !has_skills(resume) {
            return None;
        }
        let groups = resume
            .skills
            .iter()
            .filter(|c| !c.skills.is_empty())
            .map(|c| {
                el("div")
                    .child(el("h3").text(&c.category))
                    .child(el("p").class("muted").text(c.skills.join(", ")))
            });
        Some(
            self.section("Skills", "code")
                .child(el("div").class("grid-2").children(groups)),
        )
    }

    fn projects(&self, resume: &ResumeData) -> Option<Element> {
        if resume.projects.is_empty() {
            return None;
        }
        let entries = resume.projects.iter().map(|project| {
            let title = el("h3").text(&project.title).maybe(
                project
                    .link
                    .as_deref()
                    .and_then(non_empty)
                    .map(|href| external_link(href, "View Project").class("text-primary")),
            );
            el("div")
                .class("entry")
                .child(
                    el("div")
                        .class("entry-head")
                        .child(
                            el("div").child(title).child(
                                el("p")
                                    .class("muted")
                                    .text(format!("Technologies: {}", project.technologies.join(", "))),
                            ),
                        )
                        .child(self.dated(&project.start_date, &project.end_date)),
                )
                .child(el("p").class("muted").text(&project.description))
        });
        Some(self.section("Projects", "code").children(entries))
    }

    /// Certifications and achievements share a two-column row.
    fn credentials(&self, resume: &ResumeData) -> Option<Element> {
        let certifications = (!resume.certifications.is_empty()).then(|| {
            self.section("Certifications", "award")
                .children(resume.certifications.iter().map(|cert| {
                    let title = el("h3").text(&cert.title).maybe(
                        cert.link
                            .as_deref()
                            .and_then(non_empty)
                            .map(|href| external_link(href, "Verify").class("text-primary")),
                    );
                    el("div")
                        .class("entry")
                        .child(
                            el("div")
                                .class("entry-head")
                                .child(title)
                                .child(el("span").class("dates").text(&cert.date)),
                        )
                        .child(el("p").text(&cert.issuer))
                }))
        });
        let achievements = (!resume.achievements.is_empty()).then(|| {
            self.section("Achievements", "award")
                .children(resume.achievements.iter().map(|achievement| {
                    el("div")
                        .class("entry")
                        .child(
                            el("div")
                                .class("entry-head")
                                .child(el("h3").text(&achievement.title))
                                .child(el("span").class("dates").text(&achievement.date)),
                        )
                        .child(el("p").class("muted").text(&achievement.description))
                }))
        });
        if certifications.is_none() && achievements.is_none() {
            return None;
        }
        Some(
            el("div")
                .class("grid-2")
                .maybe(certifications)
                .maybe(achievements),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::SettingsPatch;
    use crate::render::fixtures::full_resume;

    #[test]
    fn test_links_drop_scheme() {
        let html = ModernTemplate
            .render(&full_resume(), &ResumeSettings::default())
            .to_html();
        assert!(html.contains(">github.com/ada</a>"));
        assert!(html.contains("href=\"https://github.com/ada\""));
    }

    #[test]
    fn test_internship_badge() {
        let html = ModernTemplate
            .render(&full_resume(), &ResumeSettings::default())
            .to_html();
        assert!(html.contains(">Internship</span>"));
    }

    #[test]
    fn test_icon_toggles() {
        let resume = full_resume();
        let with_icons = ModernTemplate
            .render(&resume, &ResumeSettings::default())
            .to_html();
        assert!(with_icons.contains("icon-mail"));
        assert!(with_icons.contains("icon-briefcase"));

        let settings = ResumeSettings::default().merged(SettingsPatch {
            show_contact_icons: Some(false),
            show_section_icons: Some(false),
            ..Default::default()
        });
        let without = ModernTemplate.render(&resume, &settings).to_html();
        assert!(!without.contains("icon-"));
    }

    #[test]
    fn test_profile_image_only_when_present() {
        let mut resume = full_resume();
        let html = ModernTemplate
            .render(&resume, &ResumeSettings::default())
            .to_html();
        assert!(!html.contains("<img"));

        resume.personal.profile_image = "data:image/png;base64,AAAA".to_string();
        let html = ModernTemplate
            .render(&resume, &ResumeSettings::default())
            .to_html();
        assert!(html.contains("<img class=\"profile-image border-primary\" src=\"data:image/png;base64,AAAA\""));
    }
}
