/// Profile endpoints
///
/// The signed-in user's own profile: preferences (themes, display name,
/// completed-tasks default) and uploaded profile pictures. Preference
/// patches go through the store's closed patch type, so role and email
/// are unreachable from here by construction.
///
/// # Endpoints
///
/// ```text
/// GET   /v1/me
/// PATCH /v1/me/preferences
/// POST  /v1/me/profile-pictures
/// GET   /v1/me/profile-pictures
/// ```

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{extract::State, http::StatusCode, Extension, Json};
use cadence_store::authz::Caller;
use cadence_store::models::profile_picture::ProfilePicture;
use cadence_store::models::user::{ColorTheme, LdTheme, PreferencesPatch, User};
use serde::Deserialize;
use validator::Validate;

/// Fetches the caller's own profile
pub async fn get_me(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<User>> {
    let user = state.store.current_user(&caller).await?;

    Ok(Json(user))
}

/// Preferences patch request
///
/// Mirrors the store's closed patch type field for field; anything else in
/// the body is rejected at deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdatePreferencesRequest {
    /// New display name
    pub name: Option<String>,

    /// New avatar URL (null clears it, absent leaves it alone)
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,

    /// New color theme
    pub color_theme: Option<ColorTheme>,

    /// New light/dark preference
    pub ld_theme: Option<LdTheme>,

    /// New default for the include-completed listing filter
    pub show_completed_tasks_default: Option<bool>,
}

/// Distinguishes an absent field (leave alone) from an explicit null (clear)
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(deserializer).map(Some)
}

/// Applies a preferences patch to the caller's account
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> ApiResult<Json<User>> {
    let user = state
        .store
        .update_user_preferences(
            &caller,
            PreferencesPatch {
                name: request.name,
                image: request.image,
                color_theme: request.color_theme,
                ld_theme: request.ld_theme,
                show_completed_tasks_default: request.show_completed_tasks_default,
            },
        )
        .await?;

    Ok(Json(user))
}

/// Upload profile picture request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddProfilePictureRequest {
    /// Picture URL
    #[validate(url)]
    pub url: String,
}

/// Records an uploaded avatar and makes it current
pub async fn add_profile_picture(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<AddProfilePictureRequest>,
) -> ApiResult<(StatusCode, Json<ProfilePicture>)> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let picture = state
        .store
        .add_profile_picture(&caller, &request.url)
        .await?;

    Ok((StatusCode::CREATED, Json(picture)))
}

/// Lists the caller's uploaded avatars, newest first
pub async fn list_profile_pictures(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<Vec<ProfilePicture>>> {
    let pictures = state
        .store
        .list_profile_pictures(&caller, &caller.user_id)
        .await?;

    Ok(Json(pictures))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_request_rejects_unknown_fields() {
        // The patch type is closed: role is not reachable
        let result =
            serde_json::from_str::<UpdatePreferencesRequest>(r#"{"role": "ADMIN"}"#);
        assert!(result.is_err());

        let result =
            serde_json::from_str::<UpdatePreferencesRequest>(r#"{"email": "x@y.z"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_preferences_request_accepts_settings_fields() {
        let request: UpdatePreferencesRequest = serde_json::from_str(
            r#"{"color_theme": "forest", "ld_theme": "light", "show_completed_tasks_default": true}"#,
        )
        .unwrap();
        assert_eq!(request.color_theme, Some(ColorTheme::Forest));
        assert_eq!(request.ld_theme, Some(LdTheme::Light));
        assert_eq!(request.show_completed_tasks_default, Some(true));
    }

    #[test]
    fn test_profile_picture_url_validation() {
        let valid = AddProfilePictureRequest {
            url: "https://cdn.example.com/avatars/abc.png".to_string(),
        };
        assert!(valid.validate().is_ok());

        let invalid = AddProfilePictureRequest {
            url: "not a url".to_string(),
        };
        assert!(invalid.validate().is_err());
    }
}
