//! State transitions over [`ResumeData`].
//!
//! Every operation takes the current document by reference and returns the next one;
//! the input is never modified. Add operations accept incomplete entries: required-field
//! checks belong to whoever builds the draft.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::models::resume::{
    Achievement, AchievementDraft, Certification, CertificationDraft, Draft, Education,
    EducationDraft, Entry, Experience, ExperienceDraft, PersonalInfoPatch, Project, ProjectDraft,
    ResumeData, SkillCategory,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MutationError {
    #[error("skill category index {index} is out of range ({len} categories)")]
    CategoryOutOfRange { index: usize, len: usize },

    #[error("skill category {0} not found")]
    UnknownCategory(Uuid),

    #[error("skill category {0} is built in and cannot be removed")]
    ProtectedCategory(Uuid),
}

/// The closed set of document edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "op",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Mutation {
    UpdatePersonal { personal: PersonalInfoPatch },
    UpdateObjective { objective: String },

    AddEducation { education: EducationDraft },
    UpdateEducation { education: Education },
    RemoveEducation { id: Uuid },

    AddExperience { experience: ExperienceDraft },
    UpdateExperience { experience: Experience },
    RemoveExperience { id: Uuid },

    AddProject { project: ProjectDraft },
    UpdateProject { project: Project },
    RemoveProject { id: Uuid },

    AddCertification { certification: CertificationDraft },
    UpdateCertification { certification: Certification },
    RemoveCertification { id: Uuid },

    AddAchievement { achievement: AchievementDraft },
    UpdateAchievement { achievement: Achievement },
    RemoveAchievement { id: Uuid },

    UpdateSkills { category_index: usize, skills: Vec<String> },
    UpdateSkillsById { id: Uuid, skills: Vec<String> },
    AddSkillCategory { category: String },
    RenameSkillCategory { id: Uuid, category: String },
    /// Positional removal. Does not check `protected`; callers must.
    RemoveSkillCategory { index: usize },
    RemoveSkillCategoryById { id: Uuid },
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::UpdatePersonal { .. } => "update_personal",
            Mutation::UpdateObjective { .. } => "update_objective",
            Mutation::AddEducation { .. } => "add_education",
            Mutation::UpdateEducation { .. } => "update_education",
            Mutation::RemoveEducation { .. } => "remove_education",
            Mutation::AddExperience { .. } => "add_experience",
            Mutation::UpdateExperience { .. } => "update_experience",
            Mutation::RemoveExperience { .. } => "remove_experience",
            Mutation::AddProject { .. } => "add_project",
            Mutation::UpdateProject { .. } => "update_project",
            Mutation::RemoveProject { .. } => "remove_project",
            Mutation::AddCertification { .. } => "add_certification",
            Mutation::UpdateCertification { .. } => "update_certification",
            Mutation::RemoveCertification { .. } => "remove_certification",
            Mutation::AddAchievement { .. } => "add_achievement",
            Mutation::UpdateAchievement { .. } => "update_achievement",
            Mutation::RemoveAchievement { .. } => "remove_achievement",
            Mutation::UpdateSkills { .. } => "update_skills",
            Mutation::UpdateSkillsById { .. } => "update_skills_by_id",
            Mutation::AddSkillCategory { .. } => "add_skill_category",
            Mutation::RenameSkillCategory { .. } => "rename_skill_category",
            Mutation::RemoveSkillCategory { .. } => "remove_skill_category",
            Mutation::RemoveSkillCategoryById { .. } => "remove_skill_category_by_id",
        }
    }
}

impl ResumeData {
    /// Returns the document that results from applying `mutation`.
    ///
    /// Updates and removals addressed to an unknown id leave the document unchanged.
    /// Only skill-category addressing can fail.
    pub fn apply(&self, mutation: Mutation) -> Result<ResumeData, MutationError> {
        debug!("Applying mutation {}", mutation.name());
        let mut next = self.clone();
        match mutation {
            Mutation::UpdatePersonal { personal } => {
                next.personal = self.personal.merged(personal);
            }
            Mutation::UpdateObjective { objective } => next.objective = objective,

            Mutation::AddEducation { education } => add_entry(&mut next.education, education),
            Mutation::UpdateEducation { education } => update_entry(&mut next.education, education),
            Mutation::RemoveEducation { id } => remove_entry(&mut next.education, id),

            Mutation::AddExperience { experience } => add_entry(&mut next.experience, experience),
            Mutation::UpdateExperience { experience } => {
                update_entry(&mut next.experience, experience)
            }
            Mutation::RemoveExperience { id } => remove_entry(&mut next.experience, id),

            Mutation::AddProject { project } => add_entry(&mut next.projects, project),
            Mutation::UpdateProject { project } => update_entry(&mut next.projects, project),
            Mutation::RemoveProject { id } => remove_entry(&mut next.projects, id),

            Mutation::AddCertification { certification } => {
                add_entry(&mut next.certifications, certification)
            }
            Mutation::UpdateCertification { certification } => {
                update_entry(&mut next.certifications, certification)
            }
            Mutation::RemoveCertification { id } => remove_entry(&mut next.certifications, id),

            Mutation::AddAchievement { achievement } => {
                add_entry(&mut next.achievements, achievement)
            }
            Mutation::UpdateAchievement { achievement } => {
                update_entry(&mut next.achievements, achievement)
            }
            Mutation::RemoveAchievement { id } => remove_entry(&mut next.achievements, id),

            Mutation::UpdateSkills {
                category_index,
                skills,
            } => {
                let len = next.skills.len();
                let category = next.skills.get_mut(category_index).ok_or(
                    MutationError::CategoryOutOfRange {
                        index: category_index,
                        len,
                    },
                )?;
                category.skills = skills;
            }
            Mutation::UpdateSkillsById { id, skills } => {
                category_mut(&mut next.skills, id)?.skills = skills;
            }
            Mutation::AddSkillCategory { category } => {
                let id = fresh_id(&next.skills);
                next.skills.push(SkillCategory {
                    id,
                    ..SkillCategory::new(category)
                });
            }
            Mutation::RenameSkillCategory { id, category } => {
                category_mut(&mut next.skills, id)?.category = category;
            }
            Mutation::RemoveSkillCategory { index } => {
                if index >= next.skills.len() {
                    return Err(MutationError::CategoryOutOfRange {
                        index,
                        len: next.skills.len(),
                    });
                }
                next.skills.remove(index);
            }
            Mutation::RemoveSkillCategoryById { id } => {
                let category = next
                    .skills
                    .iter()
                    .find(|c| c.id == id)
                    .ok_or(MutationError::UnknownCategory(id))?;
                if category.protected {
                    return Err(MutationError::ProtectedCategory(id));
                }
                next.skills.retain(|c| c.id != id);
            }
        }
        Ok(next)
    }
}

/// Generates an id not held by any entry of `entries`.
pub fn fresh_id<T: Entry>(entries: &[T]) -> Uuid {
    loop {
        let id = Uuid::new_v4();
        if !entries.iter().any(|e| e.id() == id) {
            return id;
        }
    }
}

fn add_entry<D: Draft>(entries: &mut Vec<D::Entry>, draft: D) {
    let id = fresh_id(entries);
    entries.push(draft.with_id(id));
}

fn update_entry<T: Entry>(entries: &mut [T], updated: T) {
    if let Some(slot) = entries.iter_mut().find(|e| e.id() == updated.id()) {
        *slot = updated;
    }
}

fn remove_entry<T: Entry>(entries: &mut Vec<T>, id: Uuid) {
    entries.retain(|e| e.id() != id);
}

fn category_mut(skills: &mut [SkillCategory], id: Uuid) -> Result<&mut SkillCategory, MutationError> {
    skills
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(MutationError::UnknownCategory(id))
}
