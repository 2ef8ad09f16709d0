//! Catalog route handlers: categories, subcategories and their products.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use farmacia_core::{CategoryId, SubcategoryId};

use crate::db::catalog::CatalogRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::models::{Category, Product, Subcategory};
use crate::state::AppState;

/// Category listing template.
#[derive(Template, WebTemplate)]
#[template(path = "categorias.html")]
pub struct CategoriesTemplate {
    pub categorias: Vec<Category>,
}

/// Subcategory product listing template.
#[derive(Template, WebTemplate)]
#[template(path = "productos_subcategoria.html")]
pub struct SubcategoryProductsTemplate {
    pub subcategoria: String,
    pub productos: Vec<Product>,
}

/// Query parameters for the subcategory JSON endpoint.
#[derive(Debug, Deserialize)]
pub struct SubcategoryQuery {
    pub id_categoria: Option<String>,
}

/// Display the category listing page (visible categories only).
#[instrument(skip(state))]
pub async fn categories_page(State(state): State<AppState>) -> Result<CategoriesTemplate> {
    let categorias = CatalogRepository::new(state.pool())
        .active_categories()
        .await?;

    Ok(CategoriesTemplate { categorias })
}

/// List every category as JSON.
#[instrument(skip(state))]
pub async fn categories_json(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = CatalogRepository::new(state.pool()).all_categories().await?;

    Ok(Json(categories))
}

/// List the subcategories of one category as JSON.
///
/// A missing or non-numeric `id_categoria` yields an empty list, never an
/// error.
#[instrument(skip(state))]
pub async fn subcategories_json(
    State(state): State<AppState>,
    Query(query): Query<SubcategoryQuery>,
) -> Result<Json<Vec<Subcategory>>> {
    let Some(category_id) = query
        .id_categoria
        .as_deref()
        .and_then(|raw| raw.parse::<i32>().ok())
        .map(CategoryId::new)
    else {
        return Ok(Json(Vec::new()));
    };

    let subcategories = CatalogRepository::new(state.pool())
        .subcategories(category_id)
        .await?;

    Ok(Json(subcategories))
}

/// Display the products of one subcategory; 404 if it does not exist.
#[instrument(skip(state))]
pub async fn subcategory_page(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<SubcategoryProductsTemplate> {
    let subcategory_id = SubcategoryId::new(id);

    let (subcategoria, productos) = CatalogRepository::new(state.pool())
        .subcategory_products(subcategory_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Subcategoría no encontrada".to_string()))?;

    Ok(SubcategoryProductsTemplate {
        subcategoria,
        productos,
    })
}
