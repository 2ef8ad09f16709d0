//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Storefront page
//! GET  /health                  - Health check (in main.rs)
//!
//! # Auth
//! POST /login                   - Login action (form: correo, password)
//! GET  /logout                  - Clear session
//! POST /registro                - Register + send verification email
//! GET  /confirmar/{token}       - Confirm email from the emailed link
//!
//! # Profile (requires session)
//! GET  /perfil                  - Profile page
//! POST /perfil                  - Update profile fields
//!
//! # Catalog
//! GET  /categorias              - Category listing (HTML)
//! GET  /categorias-json         - Category listing (JSON)
//! GET  /subcategorias           - Subcategories of ?id_categoria (JSON)
//! GET  /subcategoria/{id}       - Products of one subcategory (404 if unknown)
//! GET  /buscar_productos        - Search results for ?q
//!
//! # Checkout
//! GET  /carrito                 - Cart placeholder
//! GET  /checkout                - Demo cart summary
//! POST /procesar_compra         - Place the order (requires session)
//! ```
//!
//! Transient notices travel as `?notice=` / `?error=` codes; only known
//! codes are rendered, so nothing user-supplied is ever reflected.

pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod home;
pub mod profile;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for transient notice display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub notice: Option<String>,
    pub error: Option<String>,
}

impl MessageQuery {
    /// Resolve the query codes to display text, dropping unknown codes.
    #[must_use]
    pub fn resolve(&self) -> (Option<&'static str>, Option<&'static str>) {
        (
            self.notice.as_deref().and_then(notice_text),
            self.error.as_deref().and_then(error_text),
        )
    }
}

/// Map a success code to its display text.
fn notice_text(code: &str) -> Option<&'static str> {
    Some(match code {
        "logged_in" => "Inicio de sesión exitoso.",
        "logged_out" => "Sesión cerrada correctamente.",
        "registered" => "Registro exitoso. Revisa tu correo para verificar tu cuenta.",
        "email_confirmed" => "Tu correo ha sido verificado correctamente.",
        "order_placed" => "Compra finalizada correctamente.",
        "profile_updated" => "Perfil actualizado correctamente.",
        _ => return None,
    })
}

/// Map an error code to its display text.
fn error_text(code: &str) -> Option<&'static str> {
    Some(match code {
        "invalid_credentials" => "Correo o contraseña incorrectos.",
        "unverified_account" => "Debes verificar tu correo antes de iniciar sesión.",
        "email_taken" => "El correo ya está registrado. Intenta con otro o inicia sesión.",
        "invalid_email" => "El correo electrónico no es válido.",
        "password_too_short" => "La contraseña debe tener al menos 8 caracteres.",
        "register_failed" => "Ocurrió un error inesperado. Intenta nuevamente.",
        "login_failed" => "Ocurrió un error inesperado. Intenta nuevamente.",
        "login_required" => "Debes iniciar sesión para continuar.",
        "confirm_link_expired" => "El enlace de verificación ha expirado.",
        "confirm_link_invalid" => "Enlace inválido.",
        "confirm_failed" => "No se pudo verificar tu correo. Intenta nuevamente.",
        "search_term_required" => "Ingresa una palabra clave para buscar.",
        "cart_empty" => "Tu carrito está vacío.",
        _ => return None,
    })
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Storefront page
        .route("/", get(home::home))
        // Auth
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/registro", post(auth::register))
        .route("/confirmar/{token}", get(auth::confirm))
        // Profile
        .route("/perfil", get(profile::show).post(profile::update))
        // Catalog
        .route("/categorias", get(catalog::categories_page))
        .route("/categorias-json", get(catalog::categories_json))
        .route("/subcategorias", get(catalog::subcategories_json))
        .route("/subcategoria/{id}", get(catalog::subcategory_page))
        .route("/buscar_productos", get(search::search_products))
        // Checkout
        .route("/carrito", get(checkout::cart_page))
        .route("/checkout", get(checkout::checkout_page))
        .route("/procesar_compra", post(checkout::process_purchase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_resolve() {
        let query = MessageQuery {
            notice: Some("registered".to_string()),
            error: Some("cart_empty".to_string()),
        };
        let (notice, error) = query.resolve();
        assert!(notice.is_some());
        assert_eq!(error, Some("Tu carrito está vacío."));
    }

    #[test]
    fn test_unknown_codes_are_dropped() {
        let query = MessageQuery {
            notice: Some("<script>alert(1)</script>".to_string()),
            error: Some("nope".to_string()),
        };
        assert_eq!(query.resolve(), (None, None));
    }

    #[test]
    fn test_empty_query_resolves_to_nothing() {
        assert_eq!(MessageQuery::default().resolve(), (None, None));
    }
}
