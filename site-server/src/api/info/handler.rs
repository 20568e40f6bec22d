//! Business Info API Handlers

use axum::{Json, extract::State};
use serde_json::Value;

use crate::api::convert::to_document;
use crate::auth::AdminUser;
use crate::core::ServerState;
use crate::db::models::{BusinessInfo, BusinessInfoUpdate};
use crate::db::repository::BusinessInfoRepository;
use crate::images::descriptor;
use crate::utils::AppResult;
use crate::utils::validation::{validate_image_list, validate_image_ref};

/// GET /api/info - `{}` when nothing has been saved yet
pub async fn get(State(state): State<ServerState>) -> AppResult<Json<Value>> {
    let info = BusinessInfoRepository::new(state.db.clone()).get().await?;
    Ok(Json(match info {
        Some(info) => to_document(&info),
        None => Value::Object(Default::default()),
    }))
}

/// POST|PUT /api/info - upsert
///
/// About-page images replaced by the update are deleted from local storage.
pub async fn upsert(
    State(state): State<ServerState>,
    AdminUser(admin): AdminUser,
    Json(payload): Json<BusinessInfoUpdate>,
) -> AppResult<Json<BusinessInfo>> {
    if let Some(about) = &payload.about {
        for image in [&about.ceo_image, &about.story_image].into_iter().flatten() {
            validate_image_ref(image, "about")?;
        }
        validate_image_list(&about.shop_images, "about.shopImages")?;
    }

    let (previous, info) = BusinessInfoRepository::new(state.db.clone())
        .upsert(payload)
        .await?;

    let released = match &previous {
        Some(previous) => {
            state
                .release_images(
                    &descriptor::BUSINESS_INFO,
                    &to_document(previous),
                    &to_document(&info),
                )
                .await
        }
        None => 0,
    };

    tracing::info!(released, operator = %admin.username, "Business info updated");
    Ok(Json(info))
}
