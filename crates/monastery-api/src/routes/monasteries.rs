//! Monastery endpoints: paginated listing, lookup by id and slug, and the
//! featured shortlist.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use monastery_core::{MonasteryRecord, MonasteryStore};

use crate::error::{ApiError, ApiResult};
use crate::pagination::{DataEnvelope, ListEnvelope, PageParams, paginate};
use crate::state::SharedState;

/// Featured shortlist length.
const FEATURED_LIMIT: usize = 6;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub district: Option<String>,
    pub featured: Option<bool>,
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches(record: &MonasteryRecord, params: &ListParams) -> bool {
    if let Some(search) = params.search.as_deref() {
        let m = &record.monastery;
        let hit = contains_ci(&m.name, search)
            || contains_ci(&m.location, search)
            || contains_ci(&m.description, search);
        if !hit {
            return false;
        }
    }
    if let Some(district) = params.district.as_deref() {
        if !contains_ci(record.monastery.district.name(), district) {
            return false;
        }
    }
    if params.featured == Some(true) && !record.is_featured {
        return false;
    }
    true
}

pub async fn list(
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Json<ListEnvelope<MonasteryRecord>> {
    let store = state.monasteries.read().await;
    let matched: Vec<&MonasteryRecord> = store
        .list()
        .into_iter()
        .filter(|record| matches(record, &params))
        .collect();
    let page = PageParams {
        page: params.page,
        limit: params.limit,
    };
    Json(paginate(matched, page))
}

pub async fn by_id(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataEnvelope<MonasteryRecord>>> {
    let not_found = || ApiError::NotFound("Monastery not found".to_string());
    let id: u32 = id.parse().map_err(|_| not_found())?;

    let store = state.monasteries.read().await;
    let record = store.get(id).filter(|r| r.is_published).ok_or_else(not_found)?;
    Ok(Json(DataEnvelope::new(record.clone())))
}

pub async fn by_slug(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<DataEnvelope<MonasteryRecord>>> {
    let store = state.monasteries.read().await;
    let record = store
        .get_by_slug(&slug)
        .filter(|r| r.is_published)
        .ok_or_else(|| ApiError::NotFound("Monastery not found".to_string()))?;
    Ok(Json(DataEnvelope::new(record.clone())))
}

pub async fn featured(
    State(state): State<SharedState>,
) -> Json<DataEnvelope<Vec<MonasteryRecord>>> {
    let store = state.monasteries.read().await;
    let records: Vec<MonasteryRecord> = store
        .list()
        .into_iter()
        .filter(|r| r.is_featured)
        .take(FEATURED_LIMIT)
        .cloned()
        .collect();
    Json(DataEnvelope::new(records))
}
