//! Handlers for the `/api/clientes` client registry.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use dulpromax_core::error::CoreError;
use dulpromax_core::pricing::Segment;
use dulpromax_core::types::DbId;
use dulpromax_db::models::client::{Client, CreateClient, UpdateClient};

use crate::error::AppResult;
use crate::state::AppState;

fn not_found(id: DbId) -> CoreError {
    CoreError::not_found("Client", id)
}

/// GET /api/clientes
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Client>>> {
    Ok(Json(state.clients.list().await?))
}

/// GET /api/clientes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Client>> {
    let client = state
        .clients
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(client))
}

/// GET /api/clientes/tipo/{tipo}
pub async fn list_by_segment(
    State(state): State<AppState>,
    Path(tipo): Path<String>,
) -> AppResult<Json<Vec<Client>>> {
    let segment: Segment = tipo.parse()?;
    Ok(Json(state.clients.list_by_segment(segment).await?))
}

/// POST /api/clientes
///
/// The base discount comes from the client's segment.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateClient>,
) -> AppResult<(StatusCode, Json<Client>)> {
    input.ensure_valid()?;
    let client = state
        .clients
        .create(&input, input.segment.discount())
        .await?;
    tracing::info!(
        client_id = client.id,
        segment = %client.segment,
        base_discount = client.base_discount,
        "Client registered"
    );
    Ok((StatusCode::CREATED, Json(client)))
}

/// PUT /api/clientes/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateClient>,
) -> AppResult<Json<Client>> {
    input.ensure_valid()?;
    let client = state
        .clients
        .update(id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(client))
}

/// DELETE /api/clientes/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if state.clients.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id).into())
    }
}
