//! Profile route handlers.
//!
//! View and update the logged-in customer's contact details.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireAuth, set_current_customer};
use crate::models::CurrentCustomer;
use crate::routes::MessageQuery;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Profile form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub nombre: String,
    pub apellido: String,
    pub telefono: String,
    pub direccion: String,
}

/// Profile view model with defaults for the optional presentation fields.
pub struct ProfileView {
    pub name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub bio: String,
    pub profile_image: Option<String>,
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "perfil.html")]
pub struct ProfileTemplate {
    pub data: ProfileView,
    pub success: Option<&'static str>,
    pub error: Option<&'static str>,
}

/// Display the profile page.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<ProfileTemplate> {
    let service = AuthService::new(state.pool(), state.tokens());
    let customer = service.get_customer(current.id).await?;

    let (success, error) = query.resolve();

    Ok(ProfileTemplate {
        data: ProfileView {
            name: customer.display_name(),
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email.to_string(),
            phone: customer.phone,
            address: customer.address,
            bio: "Aquí puedes escribir tu biografía.".to_string(),
            profile_image: None,
        },
        success,
        error,
    })
}

/// Handle profile form submission.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let service = AuthService::new(state.pool(), state.tokens());

    service
        .update_profile(
            current.id,
            &form.nombre,
            &form.apellido,
            &form.telefono,
            &form.direccion,
        )
        .await?;

    // Keep the session greeting in sync with the new first name
    let refreshed = CurrentCustomer {
        id: current.id,
        name: form.nombre,
    };
    if let Err(e) = set_current_customer(&session, &refreshed).await {
        tracing::warn!("Failed to refresh session name: {}", e);
    }

    Ok(Redirect::to("/perfil?notice=profile_updated").into_response())
}
