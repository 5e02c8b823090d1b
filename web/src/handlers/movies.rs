//! Movie catalog endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use cinebook_core::entities::Movie;
use cinebook_core::providers::EmailSender;
use cinebook_core::usecase::MovieList;
use cinebook_core::Repositories;

use super::PageQuery;
use crate::error::AppError;
use crate::state::AppState;

/// `GET /api/movies?page=&limit=`
pub async fn list_movies<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<MovieList>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let list = state.movies.list(query.request()).await?;
    Ok(Json(list))
}

/// `GET /api/movies/:id`
pub async fn get_movie<R, E>(
    State(state): State<Arc<AppState<R, E>>>,
    Path(id): Path<i64>,
) -> Result<Json<Movie>, AppError>
where
    R: Repositories,
    E: EmailSender + Clone + 'static,
{
    let movie = state.movies.by_id(id).await?;
    Ok(Json(movie))
}
