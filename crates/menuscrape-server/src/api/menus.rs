use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use chrono::{DateTime, Utc};
use menuscrape_core::{CanonicalMenuItem, SiteProfile};
use menuscrape_scraper::{read_menu, StoredMenu};
use serde::Serialize;

use super::{attachment, file_timestamp, ApiError, AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MenuResponse {
    success: bool,
    data: Vec<CanonicalMenuItem>,
    last_updated: Option<DateTime<Utc>>,
    total_items: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct CombinedMenus {
    scraped_at: DateTime<Utc>,
    scrapers: BTreeMap<String, Vec<CanonicalMenuItem>>,
}

async fn load_stored(state: &AppState, profile: &SiteProfile) -> Result<Option<StoredMenu>, ApiError> {
    let path = state.menu_path(profile);
    read_menu(&path).await.map_err(|e| {
        tracing::error!(site = %profile.id, path = %path.display(), error = %e, "failed to read menu file");
        ApiError::new("internal_error", "Error reading menu data", e.to_string())
    })
}

fn menu_not_found() -> ApiError {
    ApiError::new(
        "not_found",
        "Menu data not found. Run the scraper first.",
        "no menu file has been written for this site yet",
    )
}

pub(super) async fn get_menu(
    State(state): State<AppState>,
    Path(site): Path<String>,
) -> Result<Json<MenuResponse>, ApiError> {
    let profile = state.profile(&site)?;
    let stored = load_stored(&state, profile).await?.ok_or_else(menu_not_found)?;

    Ok(Json(MenuResponse {
        success: true,
        total_items: stored.items.len(),
        last_updated: stored.modified.map(DateTime::<Utc>::from),
        data: stored.items,
    }))
}

pub(super) async fn download_menu(
    State(state): State<AppState>,
    Path(site): Path<String>,
) -> Result<Response, ApiError> {
    let profile = state.profile(&site)?;
    let stored = load_stored(&state, profile).await?.ok_or_else(menu_not_found)?;

    let filename = format!("{}-menu-{}.json", profile.id, file_timestamp(Utc::now()));
    Ok(attachment(&filename, &stored.items))
}

/// Every stored menu keyed by site id. Sites without a file are left out.
pub(super) async fn download_all(State(state): State<AppState>) -> Result<Response, ApiError> {
    let mut scrapers = BTreeMap::new();
    for profile in state.profiles.iter() {
        if let Some(stored) = load_stored(&state, profile).await? {
            scrapers.insert(profile.id.clone(), stored.items);
        }
    }

    let now = Utc::now();
    let filename = format!("all-menus-{}.json", file_timestamp(now));
    Ok(attachment(
        &filename,
        &CombinedMenus {
            scraped_at: now,
            scrapers,
        },
    ))
}
