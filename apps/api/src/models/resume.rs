use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Labels of the skill categories every fresh resume starts with.
pub const DEFAULT_SKILL_CATEGORIES: [&str; 5] = [
    "Programming Languages",
    "Web Technologies",
    "Databases",
    "Tools",
    "Soft Skills",
];

/// The full resume document the user edits.
///
/// Pure data: every change goes through [`ResumeData::apply`](crate::resume::mutations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    pub personal: PersonalInfo,
    pub objective: String,
    pub education: Vec<Education>,
    pub skills: Vec<SkillCategory>,
    pub experience: Vec<Experience>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub achievements: Vec<Achievement>,
}

impl Default for ResumeData {
    fn default() -> Self {
        Self {
            personal: PersonalInfo::default(),
            objective: String::new(),
            education: Vec::new(),
            skills: DEFAULT_SKILL_CATEGORIES
                .iter()
                .map(|label| SkillCategory::protected(*label))
                .collect(),
            experience: Vec::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
            achievements: Vec::new(),
        }
    }
}

/// Contact block. Optional links and the profile image are empty strings when unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub website: String,
    pub github: String,
    pub linkedin: String,
    /// `data:` URI of the uploaded picture, or empty.
    pub profile_image: String,
}

/// Shallow-merge input for [`PersonalInfo`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfoPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub profile_image: Option<String>,
}

impl PersonalInfo {
    pub fn merged(&self, patch: PersonalInfoPatch) -> PersonalInfo {
        PersonalInfo {
            name: patch.name.unwrap_or_else(|| self.name.clone()),
            email: patch.email.unwrap_or_else(|| self.email.clone()),
            phone: patch.phone.unwrap_or_else(|| self.phone.clone()),
            location: patch.location.unwrap_or_else(|| self.location.clone()),
            website: patch.website.unwrap_or_else(|| self.website.clone()),
            github: patch.github.unwrap_or_else(|| self.github.clone()),
            linkedin: patch.linkedin.unwrap_or_else(|| self.linkedin.clone()),
            profile_image: patch
                .profile_image
                .unwrap_or_else(|| self.profile_image.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCategory {
    pub id: Uuid,
    pub category: String,
    pub skills: Vec<String>,
    /// Set on the built-in categories; they cannot be removed by id.
    #[serde(default)]
    pub protected: bool,
}

impl SkillCategory {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: category.into(),
            skills: Vec::new(),
            protected: false,
        }
    }

    pub fn protected(category: impl Into<String>) -> Self {
        Self {
            protected: true,
            ..Self::new(category)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// List sections
// ────────────────────────────────────────────────────────────────────────────

/// A list entry addressed by a stable identifier.
pub trait Entry {
    fn id(&self) -> Uuid;
}

/// An entry as submitted by a form, before it has an identifier.
pub trait Draft {
    type Entry: Entry;

    fn with_id(self, id: Uuid) -> Self::Entry;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: Uuid,
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub grade: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationDraft {
    pub degree: String,
    pub institution: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub grade: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub achievements: Vec<String>,
    pub is_internship: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceDraft {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    pub achievements: Vec<String>,
    pub is_internship: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub id: Uuid,
    pub title: String,
    pub issuer: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificationDraft {
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Achievement {
    pub id: Uuid,
    pub title: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AchievementDraft {
    pub title: String,
    pub date: String,
    pub description: String,
}

impl Entry for Education {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entry for Experience {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entry for Project {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entry for Certification {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entry for Achievement {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entry for SkillCategory {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Draft for EducationDraft {
    type Entry = Education;

    fn with_id(self, id: Uuid) -> Education {
        Education {
            id,
            degree: self.degree,
            institution: self.institution,
            location: self.location,
            start_date: self.start_date,
            end_date: self.end_date,
            grade: self.grade,
            description: self.description,
        }
    }
}

impl Draft for ExperienceDraft {
    type Entry = Experience;

    fn with_id(self, id: Uuid) -> Experience {
        Experience {
            id,
            title: self.title,
            company: self.company,
            location: self.location,
            start_date: self.start_date,
            end_date: self.end_date,
            description: self.description,
            achievements: self.achievements,
            is_internship: self.is_internship,
        }
    }
}

impl Draft for ProjectDraft {
    type Entry = Project;

    fn with_id(self, id: Uuid) -> Project {
        Project {
            id,
            title: self.title,
            description: self.description,
            technologies: self.technologies,
            start_date: self.start_date,
            end_date: self.end_date,
            link: self.link,
        }
    }
}

impl Draft for CertificationDraft {
    type Entry = Certification;

    fn with_id(self, id: Uuid) -> Certification {
        Certification {
            id,
            title: self.title,
            issuer: self.issuer,
            date: self.date,
            link: self.link,
        }
    }
}

impl Draft for AchievementDraft {
    type Entry = Achievement;

    fn with_id(self, id: Uuid) -> Achievement {
        Achievement {
            id,
            title: self.title,
            date: self.date,
            description: self.description,
        }
    }
}
