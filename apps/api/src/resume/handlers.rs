use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{PersonalInfo, PersonalInfoPatch, ResumeData};
use crate::models::settings::{ResumeSettings, SettingsPatch};
use crate::resume::image::to_data_uri;
use crate::resume::mutations::Mutation;
use crate::resume::store::{Notices, ResumeState};
use crate::state::AppState;
use crate::storage::persistence::LoadWarning;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeResponse {
    #[serde(flatten)]
    pub state: ResumeState,
    pub autosave: bool,
    /// Load problems and autosave failures, surfaced to the client as notifications.
    #[serde(flatten)]
    pub notices: Notices,
}

#[derive(Deserialize)]
pub struct ObjectiveRequest {
    pub objective: String,
}

#[derive(Deserialize)]
pub struct CategoryRequest {
    pub category: String,
}

#[derive(Deserialize)]
pub struct AutosaveToggle {
    pub enabled: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub saved_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResponse {
    #[serde(flatten)]
    pub state: ResumeState,
    pub warnings: Vec<LoadWarning>,
}

/// GET /api/v1/resume
pub async fn handle_get_resume(State(state): State<AppState>) -> Json<ResumeResponse> {
    Json(ResumeResponse {
        state: state.store.snapshot().await,
        autosave: state.store.autosave_enabled(),
        notices: state.store.notices(),
    })
}

/// POST /api/v1/resume/mutations
pub async fn handle_mutation(
    State(state): State<AppState>,
    Json(mutation): Json<Mutation>,
) -> Result<Json<ResumeData>, AppError> {
    Ok(Json(state.store.apply(mutation).await?))
}

/// PATCH /api/v1/resume/personal
pub async fn handle_update_personal(
    State(state): State<AppState>,
    Json(personal): Json<PersonalInfoPatch>,
) -> Result<Json<PersonalInfo>, AppError> {
    let resume = state
        .store
        .apply(Mutation::UpdatePersonal { personal })
        .await?;
    Ok(Json(resume.personal))
}

/// PUT /api/v1/resume/objective
pub async fn handle_update_objective(
    State(state): State<AppState>,
    Json(req): Json<ObjectiveRequest>,
) -> Result<StatusCode, AppError> {
    state
        .store
        .apply(Mutation::UpdateObjective {
            objective: req.objective,
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/resume/skills/categories
pub async fn handle_add_skill_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<ResumeData>), AppError> {
    let category = req.category.trim().to_string();
    if category.is_empty() {
        return Err(AppError::Validation("Category name is required".to_string()));
    }
    let resume = state
        .store
        .apply(Mutation::AddSkillCategory { category })
        .await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// DELETE /api/v1/resume/skills/categories/:id
///
/// Built-in categories are refused here even though the positional mutation would allow it.
pub async fn handle_remove_skill_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeData>, AppError> {
    let resume = state
        .store
        .apply(Mutation::RemoveSkillCategoryById { id })
        .await?;
    Ok(Json(resume))
}

/// PATCH /api/v1/settings
pub async fn handle_update_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> Json<ResumeSettings> {
    Json(state.store.update_settings(|s| s.merged(patch)).await)
}

/// POST /api/v1/settings/text-size/increase
pub async fn handle_increase_text_size(State(state): State<AppState>) -> Json<ResumeSettings> {
    Json(state.store.update_settings(ResumeSettings::with_larger_text).await)
}

/// POST /api/v1/settings/text-size/decrease
pub async fn handle_decrease_text_size(State(state): State<AppState>) -> Json<ResumeSettings> {
    Json(state.store.update_settings(ResumeSettings::with_smaller_text).await)
}

/// POST /api/v1/settings/text-size/reset
pub async fn handle_reset_text_size(State(state): State<AppState>) -> Json<ResumeSettings> {
    Json(
        state
            .store
            .update_settings(ResumeSettings::with_default_text_size)
            .await,
    )
}

/// POST /api/v1/resume/save
pub async fn handle_save(State(state): State<AppState>) -> Result<Json<SaveResponse>, AppError> {
    let saved_at = state.store.save().await?;
    Ok(Json(SaveResponse { saved_at }))
}

/// POST /api/v1/resume/load
pub async fn handle_load(State(state): State<AppState>) -> Json<LoadResponse> {
    let outcome = state.store.reload().await;
    Json(LoadResponse {
        state: ResumeState {
            resume: outcome.resume,
            settings: outcome.settings,
            last_saved: outcome.last_saved,
        },
        warnings: outcome.warnings,
    })
}

/// POST /api/v1/resume/reset
pub async fn handle_reset(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.store.reset().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/resume/autosave
pub async fn handle_toggle_autosave(
    State(state): State<AppState>,
    Json(req): Json<AutosaveToggle>,
) -> StatusCode {
    state.store.set_autosave(req.enabled);
    StatusCode::NO_CONTENT
}

/// POST /api/v1/resume/personal/image (multipart, field `image`)
pub async fn handle_upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PersonalInfo>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        let data_uri = to_data_uri(&content_type, &bytes, state.config.max_profile_image_bytes)?;

        let resume = state
            .store
            .apply(Mutation::UpdatePersonal {
                personal: PersonalInfoPatch {
                    profile_image: Some(data_uri),
                    ..Default::default()
                },
            })
            .await?;
        info!("Profile picture updated ({} bytes)", bytes.len());
        return Ok(Json(resume.personal));
    }
    Err(AppError::Validation("Missing 'image' field".to_string()))
}

/// DELETE /api/v1/resume/personal/image
pub async fn handle_remove_image(
    State(state): State<AppState>,
) -> Result<Json<PersonalInfo>, AppError> {
    let resume = state
        .store
        .apply(Mutation::UpdatePersonal {
            personal: PersonalInfoPatch {
                profile_image: Some(String::new()),
                ..Default::default()
            },
        })
        .await?;
    Ok(Json(resume.personal))
}
