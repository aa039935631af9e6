use crate::models::resume::ResumeData;
use crate::models::settings::ResumeSettings;
use crate::render::node::{el, Element, Node};
use crate::render::{
    date_range, display_name, external_link, has_skills, icon, non_empty, strip_scheme,
    TemplateRenderer,
};

/// Centered, formal layout. Uppercase headings, italics for organisations, color only on rules.
pub struct ClassicTemplate;

impl TemplateRenderer for ClassicTemplate {
    fn render(&self, resume: &ResumeData, settings: &ResumeSettings) -> Node {
        el("div")
            .class("classic")
            .child(header(resume, settings))
            .maybe(summary(resume))
            .maybe(education(resume))
            .maybe(experience(resume))
            .maybe(projects(resume))
            .maybe(skills(resume))
            .maybe(certifications(resume))
            .maybe(achievements(resume))
            .into()
    }
}

fn header(resume: &ResumeData, settings: &ResumeSettings) -> Element {
    let personal = &resume.personal;
    let contact = |name: &str, value: &str| {
        let item = el("span");
        let item = if settings.show_contact_icons {
            item.child(icon(name))
        } else {
            item
        };
        item.text(value)
    };

    let details = [
        ("mail", personal.email.as_str()),
        ("phone", personal.phone.as_str()),
        ("map-pin", personal.location.as_str()),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(name, value)| contact(name, value));

    let links = [
        non_empty(&personal.website).map(|url| external_link(url, strip_scheme(url))),
        non_empty(&personal.github).map(|url| external_link(url, "GitHub")),
        non_empty(&personal.linkedin).map(|url| external_link(url, "LinkedIn")),
    ]
    .into_iter()
    .flatten();

    el("header")
        .class("classic-header")
        .class("border-primary")
        .child(el("h1").text(display_name(personal)))
        .child(el("div").class("centered-row").children(details))
        .child(el("div").class("centered-row").children(links))
}

fn section(title: &str) -> Element {
    el("section").child(el("h2").class("uppercase").text(title))
}

fn summary(resume: &ResumeData) -> Option<Element> {
    non_empty(&resume.objective)
        .map(|objective| section("Professional Summary").child(el("p").text(objective)))
}

fn education(resume: &ResumeData) -> Option<Element> {
    if resume.education.is_empty() {
        return None;
    }
    Some(section("Education").children(resume.education.iter().map(|edu| {
        el("div")
            .class("entry")
            .child(
                el("div")
                    .class("entry-head")
                    .child(el("h3").text(&edu.degree))
                    .child(el("span").class("dates").text(date_range(&edu.start_date, &edu.end_date))),
            )
            .child(el("p").text(format!("{}, {}", edu.institution, edu.location)))
            .maybe(non_empty(&edu.grade).map(|g| el("p").text(format!("Grade: {g}"))))
            .maybe(
                edu.description
                    .as_deref()
                    .and_then(non_empty)
                    .map(|d| el("p").class("muted").text(d)),
            )
    })))
}

fn experience(resume: &ResumeData) -> Option<Element> {
    if resume.experience.is_empty() {
        return None;
    }
    Some(section("Experience").children(resume.experience.iter().map(|exp| {
        let title = el("h3").text(&exp.title);
        let title = if exp.is_internship {
            title.child(el("span").class("italic").text(" (Internship)"))
        } else {
            title
        };
        el("div")
            .class("entry")
            .child(
                el("div")
                    .class("entry-head")
                    .child(title)
                    .child(el("span").class("dates").text(date_range(&exp.start_date, &exp.end_date))),
            )
            .child(el("p").class("italic").text(format!("{}, {}", exp.company, exp.location)))
            .child(el("p").text(&exp.description))
            .maybe((!exp.achievements.is_empty()).then(|| {
                el("ul").children(exp.achievements.iter().map(|a| el("li").text(a)))
            }))
    })))
}

fn projects(resume: &ResumeData) -> Option<Element> {
    if resume.projects.is_empty() {
        return None;
    }
    Some(section("Projects").children(resume.projects.iter().map(|project| {
        el("div")
            .class("entry")
            .child(
                el("div")
                    .class("entry-head")
                    .child(
                        el("h3").text(&project.title).maybe(
                            project
                                .link
                                .as_deref()
                                .and_then(non_empty)
                                .map(|href| external_link(href, " (Link)")),
                        ),
                    )
                    .child(
                        el("span")
                            .class("dates")
                            .text(date_range(&project.start_date, &project.end_date)),
                    ),
            )
            .child(
                el("p")
                    .class("italic")
                    .text(format!("Technologies: {}", project.technologies.join(", "))),
            )
            .child(el("p").text(&project.description))
    })))
}

fn skills(resume: &ResumeData) -> Option<Element> {
    if !has_skills(resume) {
        return None;
    }
    Some(
        section("Skills").children(
            resume
                .skills
                .iter()
                .filter(|c| !c.skills.is_empty())
                .map(|c| {
                    el("div")
                        .child(el("h3").text(&c.category))
                        .child(el("p").text(c.skills.join(", ")))
                }),
        ),
    )
}

fn certifications(resume: &ResumeData) -> Option<Element> {
    if resume.certifications.is_empty() {
        return None;
    }
    Some(section("Certifications").children(resume.certifications.iter().map(|cert| {
        el("div")
            .class("entry-head")
            .child(
                el("div")
                    .child(el("strong").text(&cert.title))
                    .maybe(
                        cert.link
                            .as_deref()
                            .and_then(non_empty)
                            .map(|href| external_link(href, " (Verify)")),
                    )
                    .child(el("span").text(format!(" - {}", cert.issuer))),
            )
            .child(el("span").class("dates").text(&cert.date))
    })))
}

fn achievements(resume: &ResumeData) -> Option<Element> {
    if resume.achievements.is_empty() {
        return None;
    }
    Some(section("Achievements").children(resume.achievements.iter().map(|achievement| {
        el("div")
            .class("entry-head")
            .child(
                el("div")
                    .child(el("strong").text(&achievement.title))
                    .child(el("p").text(&achievement.description)),
            )
            .child(el("span").class("dates").text(&achievement.date))
    })))
}
