//! Search route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::db::catalog::CatalogRepository;
use crate::error::AppError;
use crate::filters;
use crate::models::Product;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search results template.
#[derive(Template, WebTemplate)]
#[template(path = "buscar_resultados.html")]
pub struct SearchResultsTemplate {
    pub termino: String,
    pub productos: Vec<Product>,
}

/// Display search results for a term matching product or brand names.
///
/// An empty or whitespace-only term performs no query; the shopper is sent
/// back to the storefront page with a prompt to enter a keyword.
#[instrument(skip(state))]
pub async fn search_products(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError> {
    let term = query.q.trim();

    if term.is_empty() {
        return Ok(Redirect::to("/?error=search_term_required").into_response());
    }

    let productos = CatalogRepository::new(state.pool())
        .search_products(term)
        .await?;

    Ok(SearchResultsTemplate {
        termino: term.to_string(),
        productos,
    }
    .into_response())
}
