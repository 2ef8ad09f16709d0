//! Storefront page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use tracing::instrument;

use crate::db::catalog::CatalogRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::models::{Banner, BannerKind, Category, Product};
use crate::routes::MessageQuery;
use crate::state::AppState;

/// Storefront page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    /// First name of the logged-in customer, if any.
    pub customer_name: Option<String>,
    /// Visible categories for the navigation bar.
    pub categories: Vec<Category>,
    /// Active products with brand names.
    pub products: Vec<Product>,
    /// Rotating banners at the top of the page, in display order.
    pub carousel_banners: Vec<Banner>,
    /// Static banners interleaved between product rows.
    pub inline_banners: Vec<Banner>,
    /// Transient success notice.
    pub success: Option<&'static str>,
    /// Transient error notice.
    pub error: Option<&'static str>,
}

/// Display the storefront page.
#[instrument(skip(state, auth))]
pub async fn home(
    State(state): State<AppState>,
    OptionalAuth(auth): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> Result<HomeTemplate> {
    let catalog = CatalogRepository::new(state.pool());

    let categories = catalog.active_categories().await?;
    let products = catalog.active_products().await?;
    let carousel_banners = catalog.banners(BannerKind::Carousel).await?;
    let inline_banners = catalog.banners(BannerKind::Inline).await?;

    let (success, error) = query.resolve();

    Ok(HomeTemplate {
        customer_name: auth.map(|c| c.name),
        categories,
        products,
        carousel_banners,
        inline_banners,
        success,
        error,
    })
}
