//! Documentation endpoints: artifacts, rituals and historical records.
//!
//! All three collections share the pagination envelope and the filter set
//! (monastery, kind, search; historical records add a language filter).

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use monastery_core::{
    Artifact, ArtifactQuery, DocumentationStore, HistoricalRecord, Language, RecordQuery, Ritual,
    RitualQuery,
};

use crate::error::{ApiError, ApiResult};
use crate::pagination::{DataEnvelope, ListEnvelope, PageParams, paginate};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub monastery_id: Option<u32>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub language: Option<String>,
    pub search: Option<String>,
}

impl DocParams {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

pub async fn artifacts(
    State(state): State<SharedState>,
    Query(params): Query<DocParams>,
) -> Json<ListEnvelope<Artifact>> {
    let docs = state.docs.read().await;
    let matched = docs.artifacts(&ArtifactQuery {
        monastery_id: params.monastery_id,
        category: params.category.clone(),
        search: params.search.clone(),
    });
    Json(paginate(matched, params.page_params()))
}

pub async fn artifact_by_id(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<DataEnvelope<Artifact>>> {
    let docs = state.docs.read().await;
    let artifact = docs
        .artifact(id)
        .filter(|a| a.is_published)
        .ok_or_else(|| ApiError::NotFound("Artifact not found".to_string()))?;
    Ok(Json(DataEnvelope::new(artifact.clone())))
}

pub async fn rituals(
    State(state): State<SharedState>,
    Query(params): Query<DocParams>,
) -> Json<ListEnvelope<Ritual>> {
    let docs = state.docs.read().await;
    let matched = docs.rituals(&RitualQuery {
        monastery_id: params.monastery_id,
        ritual_type: params.kind.clone(),
        search: params.search.clone(),
    });
    Json(paginate(matched, params.page_params()))
}

pub async fn ritual_by_id(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<DataEnvelope<Ritual>>> {
    let docs = state.docs.read().await;
    let ritual = docs
        .ritual(id)
        .filter(|r| r.is_published)
        .ok_or_else(|| ApiError::NotFound("Ritual not found".to_string()))?;
    Ok(Json(DataEnvelope::new(ritual.clone())))
}

pub async fn historical_records(
    State(state): State<SharedState>,
    Query(params): Query<DocParams>,
) -> Json<ListEnvelope<HistoricalRecord>> {
    let docs = state.docs.read().await;
    let matched = docs.historical_records(&RecordQuery {
        monastery_id: params.monastery_id,
        record_type: params.kind.clone(),
        language: params.language.as_deref().and_then(Language::parse),
        search: params.search.clone(),
    });
    Json(paginate(matched, params.page_params()))
}

pub async fn historical_record_by_id(
    State(state): State<SharedState>,
    Path(id): Path<u32>,
) -> ApiResult<Json<DataEnvelope<HistoricalRecord>>> {
    let docs = state.docs.read().await;
    let record = docs
        .historical_record(id)
        .filter(|r| r.is_published)
        .ok_or_else(|| ApiError::NotFound("Historical record not found".to_string()))?;
    Ok(Json(DataEnvelope::new(record.clone())))
}
