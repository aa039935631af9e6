use crate::models::resume::{PersonalInfo, ResumeData};
use crate::models::settings::ResumeSettings;
use crate::render::node::{el, Element, Node};
use crate::render::{date_range, display_name, external_link, has_skills, icon, non_empty, TemplateRenderer};

/// Two columns: a primary-colored sidebar (photo, contact, skills, education,
/// certifications) next to the main column (summary, experience, projects, achievements).
pub struct CreativeTemplate;

impl TemplateRenderer for CreativeTemplate {
    fn render(&self, resume: &ResumeData, settings: &ResumeSettings) -> Node {
        let sidebar = el("aside")
            .class("creative-sidebar")
            .class("bg-primary")
            .child(
                el("div")
                    .class("identity")
                    .child(avatar(&resume.personal))
                    .child(el("h1").text(display_name(&resume.personal))),
            )
            .maybe(contact(&resume.personal, settings))
            .maybe(skills(resume))
            .maybe(education(resume))
            .maybe(certifications(resume));

        let main = el("main")
            .class("creative-main")
            .maybe(about(resume, settings))
            .maybe(experience(resume, settings))
            .maybe(projects(resume, settings))
            .maybe(achievements(resume, settings));

        el("div").class("creative").child(sidebar).child(main).into()
    }
}

/// Photo, or the first letter of the name when there is none.
fn avatar(personal: &PersonalInfo) -> Element {
    let frame = el("div").class("avatar");
    match non_empty(&personal.profile_image) {
        Some(src) => frame.child(
            el("img")
                .attr("src", src)
                .attr("alt", non_empty(&personal.name).unwrap_or("Profile")),
        ),
        None => {
            let initial = personal
                .name
                .chars()
                .next()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "?".to_string());
            frame.child(el("span").class("initial").text(initial))
        }
    }
}

fn sidebar_section(title: &str) -> Element {
    el("section").child(el("h2").class("sidebar-heading").text(title))
}

/// Main-column heading; the accent bar is drawn only when section icons are on.
fn main_section(title: &str, icon_name: &str, settings: &ResumeSettings) -> Element {
    let heading = el("h2").class("text-primary");
    let heading = if settings.show_section_icons {
        heading.child(icon(icon_name))
    } else {
        heading
    };
    el("section").child(heading.text(title))
}

fn contact(personal: &PersonalInfo, settings: &ResumeSettings) -> Option<Element> {
    let plain = [
        ("mail", personal.email.as_str()),
        ("phone", personal.phone.as_str()),
        ("map-pin", personal.location.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(name, value)| (name, el("span").text(value)));

    let linked = [
        ("globe", personal.website.as_str(), "Website"),
        ("github", personal.github.as_str(), "GitHub"),
        ("linkedin", personal.linkedin.as_str(), "LinkedIn"),
    ]
    .into_iter()
    .filter(|(_, url, _)| !url.is_empty())
    .map(|(name, url, label)| (name, external_link(url, label)));

    let items: Vec<Element> = plain
        .chain(linked)
        .map(|(name, content)| {
            let item = el("div").class("contact-item");
            let item = if settings.show_contact_icons {
                item.child(icon(name))
            } else {
                item
            };
            item.child(content)
        })
        .collect();

    if items.is_empty() {
        return None;
    }
    Some(sidebar_section("Contact").children(items))
}

fn skills(resume: &ResumeData) -> Option<Element> {
    if !has_skills(resume) {
        return None;
    }
    Some(
        sidebar_section("Skills").children(
            resume
                .skills
                .iter()
                .filter(|c| !c.skills.is_empty())
                .map(|c| {
                    el("div").child(el("h3").text(&c.category)).child(
                        el("div")
                            .class("chips")
                            .children(c.skills.iter().map(|s| el("span").class("chip").text(s))),
                    )
                }),
        ),
    )
}

fn education(resume: &ResumeData) -> Option<Element> {
    if resume.education.is_empty() {
        return None;
    }
    Some(sidebar_section("Education").children(resume.education.iter().map(|edu| {
        el("div")
            .class("entry")
            .child(el("p").class("strong").text(&edu.degree))
            .child(el("p").text(&edu.institution))
            .child(el("p").class("small").text(date_range(&edu.start_date, &edu.end_date)))
            .maybe(non_empty(&edu.grade).map(|g| el("p").class("small").text(format!("Grade: {g}"))))
            .maybe(
                edu.description
                    .as_deref()
                    .and_then(non_empty)
                    .map(|d| el("p").class("small").text(d)),
            )
    })))
}

fn certifications(resume: &ResumeData) -> Option<Element> {
    if resume.certifications.is_empty() {
        return None;
    }
    Some(sidebar_section("Certifications").children(resume.certifications.iter().map(|cert| {
        let title = el("p").class("strong").text(&cert.title);
        let title = match cert.link.as_deref().and_then(non_empty) {
            Some(href) => title.child(external_link(href, " (Verify)")),
            None => title,
        };
        el("div")
            .class("entry")
            .child(title)
            .child(el("p").class("small").text(format!("{} \u{2022} {}", cert.issuer, cert.date)))
    })))
}

fn about(resume: &ResumeData, settings: &ResumeSettings) -> Option<Element> {
    non_empty(&resume.objective)
        .map(|objective| main_section("About Me", "user", settings).child(el("p").text(objective)))
}

fn experience(resume: &ResumeData, settings: &ResumeSettings) -> Option<Element> {
    if resume.experience.is_empty() {
        return None;
    }
    Some(
        main_section("Experience", "briefcase", settings).children(resume.experience.iter().map(
            |exp| {
                let title = el("div").class("title-row").child(el("h3").text(&exp.title));
                let title = if exp.is_internship {
                    title.child(el("span").class("badge").class("bg-primary").text("Internship"))
                } else {
                    title
                };
                el("div")
                    .class("entry")
                    .class("border-primary")
                    .child(title)
                    .child(el("p").text(format!("{} \u{2022} {}", exp.company, exp.location)))
                    .child(el("p").class("dates").text(date_range(&exp.start_date, &exp.end_date)))
                    .child(el("p").text(&exp.description))
                    .maybe((!exp.achievements.is_empty()).then(|| {
                        el("ul").children(exp.achievements.iter().map(|a| el("li").text(a)))
                    }))
            },
        )),
    )
}

fn projects(resume: &ResumeData, settings: &ResumeSettings) -> Option<Element> {
    if resume.projects.is_empty() {
        return None;
    }
    Some(
        main_section("Projects", "code", settings).children(resume.projects.iter().map(|project| {
            let title = el("h3").text(&project.title);
            let title = match project.link.as_deref().and_then(non_empty) {
                Some(href) => title.child(external_link(href, " View").class("text-primary")),
                None => title,
            };
            el("div")
                .class("entry")
                .child(title)
                .child(
                    el("p")
                        .class("dates")
                        .text(date_range(&project.start_date, &project.end_date)),
                )
                .child(
                    el("div")
                        .class("chips")
                        .children(project.technologies.iter().map(|t| el("span").class("chip").text(t))),
                )
                .child(el("p").text(&project.description))
        })),
    )
}

fn achievements(resume: &ResumeData, settings: &ResumeSettings) -> Option<Element> {
    if resume.achievements.is_empty() {
        return None;
    }
    Some(
        main_section("Achievements", "award", settings).children(resume.achievements.iter().map(
            |achievement| {
                el("div")
                    .class("entry")
                    .child(
                        el("div")
                            .class("entry-head")
                            .child(el("h3").text(&achievement.title))
                            .child(el("span").class("dates").text(&achievement.date)),
                    )
                    .child(el("p").text(&achievement.description))
            },
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::fixtures::full_resume;

    #[test]
    fn test_initial_without_photo() {
        let html = CreativeTemplate
            .render(&full_resume(), &ResumeSettings::default())
            .to_html();
        assert!(html.contains("<span class=\"initial\">A</span>"));
    }

    #[test]
    fn test_question_mark_without_name() {
        let html = CreativeTemplate
            .render(&ResumeData::default(), &ResumeSettings::default())
            .to_html();
        assert!(html.contains("<span class=\"initial\">?</span>"));
    }

    #[test]
    fn test_sidebar_and_main_split() {
        let node = CreativeTemplate.render(&full_resume(), &ResumeSettings::default());
        let sidebar = node.find(&|e| e.tag == "aside").unwrap();
        let main = node.find(&|e| e.tag == "main").unwrap();
        let sidebar_text = Node::from(sidebar.clone()).text_content();
        let main_text = Node::from(main.clone()).text_content();

        assert!(sidebar_text.contains("B.Sc Mathematics"));
        assert!(sidebar_text.contains("Certified Engine Operator"));
        assert!(!sidebar_text.contains("Research Intern"));
        assert!(main_text.contains("Research Intern"));
        assert!(main_text.contains("About Me"));
    }
}
