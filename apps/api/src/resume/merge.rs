//! Load-time merging of persisted records onto defaults.
//!
//! Saved data may come from an older build that lacked some fields, so every structure is
//! read as a partial record and merged field by field. Keys this build does not know are
//! reported through `notes` and dropped.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::resume::{
    Achievement, Certification, Education, Experience, PersonalInfo, Project, ResumeData,
    SkillCategory, DEFAULT_SKILL_CATEGORIES,
};
use crate::models::settings::{ResumeSettings, ResumeTemplate};

/// Top-level record. Sections stay raw so one unreadable section or entry cannot take the
/// rest of the document down with it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialResume {
    personal: Option<Value>,
    objective: Option<Value>,
    education: Option<Value>,
    skills: Option<Value>,
    experience: Option<Value>,
    projects: Option<Value>,
    certifications: Option<Value>,
    achievements: Option<Value>,
    #[serde(flatten)]
    unknown: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialPersonal {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    location: Option<String>,
    website: Option<String>,
    github: Option<String>,
    linkedin: Option<String>,
    profile_image: Option<String>,
    #[serde(flatten)]
    unknown: BTreeMap<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSkillCategory {
    id: Option<Uuid>,
    category: Option<String>,
    skills: Option<Vec<String>>,
    protected: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialSettings {
    template: Option<String>,
    primary_color: Option<String>,
    show_contact_icons: Option<bool>,
    show_section_icons: Option<bool>,
    text_scale: Option<f64>,
    #[serde(flatten)]
    unknown: BTreeMap<String, Value>,
}

/// Merges a stored resume of any shape onto defaults.
pub fn resume_from_value(value: Value, notes: &mut Vec<String>) -> ResumeData {
    decode::<PartialResume>("resume", value, notes)
        .map(|partial| merge_resume(partial, notes))
        .unwrap_or_default()
}

/// Merges stored settings of any shape onto defaults.
pub fn settings_from_value(value: Value, notes: &mut Vec<String>) -> ResumeSettings {
    decode::<PartialSettings>("settings", value, notes)
        .map(|partial| merge_settings(partial, notes))
        .unwrap_or_default()
}

pub fn merge_resume(partial: PartialResume, notes: &mut Vec<String>) -> ResumeData {
    let defaults = ResumeData::default();
    note_unknown("resume", &partial.unknown, notes);

    let objective = match partial.objective {
        None => defaults.objective,
        Some(Value::String(objective)) => objective,
        Some(_) => {
            notes.push("reset unreadable objective".to_string());
            defaults.objective
        }
    };

    ResumeData {
        personal: partial
            .personal
            .and_then(|value| decode::<PartialPersonal>("personal", value, notes))
            .map(|personal| merge_personal(personal, notes))
            .unwrap_or(defaults.personal),
        objective,
        education: with_ids(decode_list("education", partial.education, notes).unwrap_or_default()),
        skills: decode_list("skills", partial.skills, notes)
            .map(merge_skills)
            .unwrap_or(defaults.skills),
        experience: with_ids(decode_list("experience", partial.experience, notes).unwrap_or_default()),
        projects: with_ids(decode_list("projects", partial.projects, notes).unwrap_or_default()),
        certifications: with_ids(
            decode_list("certifications", partial.certifications, notes).unwrap_or_default(),
        ),
        achievements: with_ids(
            decode_list("achievements", partial.achievements, notes).unwrap_or_default(),
        ),
    }
}

pub fn merge_personal(partial: PartialPersonal, notes: &mut Vec<String>) -> PersonalInfo {
    note_unknown("personal", &partial.unknown, notes);
    let defaults = PersonalInfo::default();
    PersonalInfo {
        name: partial.name.unwrap_or(defaults.name),
        email: partial.email.unwrap_or(defaults.email),
        phone: partial.phone.unwrap_or(defaults.phone),
        location: partial.location.unwrap_or(defaults.location),
        website: partial.website.unwrap_or(defaults.website),
        github: partial.github.unwrap_or(defaults.github),
        linkedin: partial.linkedin.unwrap_or(defaults.linkedin),
        profile_image: partial.profile_image.unwrap_or(defaults.profile_image),
    }
}

/// Categories saved before ids existed get a fresh id; those saved before the
/// `protected` flag existed are protected when they occupy one of the built-in slots.
pub fn merge_skills(partial: Vec<PartialSkillCategory>) -> Vec<SkillCategory> {
    let mut merged: Vec<SkillCategory> = Vec::with_capacity(partial.len());
    for (index, category) in partial.into_iter().enumerate() {
        let id = match category.id {
            Some(id) if !id.is_nil() && !merged.iter().any(|c| c.id == id) => id,
            _ => Uuid::new_v4(),
        };
        merged.push(SkillCategory {
            id,
            category: category.category.unwrap_or_default(),
            skills: category.skills.unwrap_or_default(),
            protected: category
                .protected
                .unwrap_or(index < DEFAULT_SKILL_CATEGORIES.len()),
        });
    }
    merged
}

pub fn merge_settings(partial: PartialSettings, notes: &mut Vec<String>) -> ResumeSettings {
    note_unknown("settings", &partial.unknown, notes);
    let defaults = ResumeSettings::default();

    let template = match partial.template.as_deref() {
        None => defaults.template,
        Some(name) => ResumeTemplate::from_name(name).unwrap_or_else(|| {
            notes.push(format!(
                "template '{name}' is not available, using '{}'",
                defaults.template.as_str()
            ));
            defaults.template
        }),
    };

    ResumeSettings {
        template,
        primary_color: partial.primary_color.unwrap_or(defaults.primary_color),
        show_contact_icons: partial
            .show_contact_icons
            .unwrap_or(defaults.show_contact_icons),
        show_section_icons: partial
            .show_section_icons
            .unwrap_or(defaults.show_section_icons),
        text_scale: partial.text_scale.unwrap_or(defaults.text_scale),
    }
}

/// Decodes `value` as `T`. If that fails on an object, each field that cannot be decoded on
/// its own is dropped so it takes its default, and the remaining fields are kept.
fn decode<T: DeserializeOwned>(scope: &str, value: Value, notes: &mut Vec<String>) -> Option<T> {
    let error = match T::deserialize(&value) {
        Ok(decoded) => return Some(decoded),
        Err(e) => e,
    };
    let Value::Object(fields) = value else {
        notes.push(format!("dropped {scope}: {error}"));
        return None;
    };

    let mut kept = Map::new();
    let mut reset = Vec::new();
    for (key, field) in fields {
        let single = Value::Object(Map::from_iter([(key.clone(), field.clone())]));
        if T::deserialize(&single).is_ok() {
            kept.insert(key, field);
        } else {
            reset.push(key);
        }
    }
    match T::deserialize(&Value::Object(kept)) {
        Ok(decoded) => {
            notes.push(format!("reset unreadable {scope} fields: {}", reset.join(", ")));
            Some(decoded)
        }
        Err(e) => {
            notes.push(format!("dropped {scope}: {e}"));
            None
        }
    }
}

/// Decodes a stored list entry by entry; entries that cannot be repaired are dropped.
fn decode_list<T: DeserializeOwned>(
    scope: &str,
    value: Option<Value>,
    notes: &mut Vec<String>,
) -> Option<Vec<T>> {
    match value? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .enumerate()
                .filter_map(|(i, item)| decode(&format!("{scope}[{i}]"), item, notes))
                .collect(),
        ),
        _ => {
            notes.push(format!("dropped {scope}: not a list"));
            None
        }
    }
}

trait Identified {
    fn id_mut(&mut self) -> &mut Uuid;
}

macro_rules! identified {
    ($($ty:ty),*) => {
        $(impl Identified for $ty {
            fn id_mut(&mut self) -> &mut Uuid {
                &mut self.id
            }
        })*
    };
}

identified!(Education, Experience, Project, Certification, Achievement);

/// Replaces missing or duplicated ids so list addressing stays unambiguous.
fn with_ids<T: Identified>(mut entries: Vec<T>) -> Vec<T> {
    let mut seen: Vec<Uuid> = Vec::with_capacity(entries.len());
    for entry in entries.iter_mut() {
        let id = entry.id_mut();
        if id.is_nil() || seen.contains(id) {
            *id = Uuid::new_v4();
        }
        seen.push(*id);
    }
    entries
}

fn note_unknown(scope: &str, unknown: &BTreeMap<String, Value>, notes: &mut Vec<String>) {
    if !unknown.is_empty() {
        let keys: Vec<&str> = unknown.keys().map(String::as_str).collect();
        notes.push(format!("ignored unknown {scope} fields: {}", keys.join(", ")));
    }
}
