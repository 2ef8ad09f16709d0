//! Authentication route handlers.
//!
//! Handles login, logout, registration and email confirmation. Outcomes are
//! reported as notice codes on a redirect back to the storefront page,
//! where the login modal lives.

use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::middleware::{clear_current_customer, set_current_customer};
use crate::models::CurrentCustomer;
use crate::services::auth::{AuthError, AuthService, NewCustomer};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub correo: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub password: String,
    pub telefono: String,
    pub direccion: String,
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let service = AuthService::new(state.pool(), state.tokens());

    match service.login(&form.correo, &form.password).await {
        Ok(customer) => {
            let current = CurrentCustomer {
                id: customer.id,
                name: customer.first_name.clone(),
            };

            if let Err(e) = set_current_customer(&session, &current).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/?error=login_failed").into_response();
            }

            Redirect::to("/?notice=logged_in").into_response()
        }
        Err(AuthError::UnverifiedAccount) => {
            Redirect::to("/?error=unverified_account").into_response()
        }
        Err(AuthError::InvalidCredentials | AuthError::InvalidEmail(_)) => {
            Redirect::to("/?error=invalid_credentials").into_response()
        }
        Err(e) => {
            tracing::error!("Login failed: {}", e);
            Redirect::to("/?error=login_failed").into_response()
        }
    }
}

/// Handle logout.
///
/// Clears the session entirely and returns to the storefront page.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_customer(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/?notice=logged_out").into_response()
}

// =============================================================================
// Registration
// =============================================================================

/// Handle registration form submission.
///
/// On success the account row is committed before the verification email is
/// dispatched on a background task, so a failing mail relay can never leave
/// the response hanging.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    let service = AuthService::new(state.pool(), state.tokens());

    let new_customer = NewCustomer {
        first_name: &form.nombre,
        last_name: &form.apellido,
        email: &form.email,
        password: &form.password,
        phone: &form.telefono,
        address: &form.direccion,
    };

    match service.register(new_customer).await {
        Ok(customer) => {
            let token = service.issue_verification_token(&customer.email);
            let link = state.config().confirmation_url(&token);

            state.mailer().send_verification_email_background(
                customer.email.to_string(),
                customer.first_name.clone(),
                link,
            );

            Redirect::to("/?notice=registered").into_response()
        }
        Err(AuthError::DuplicateEmail) => Redirect::to("/?error=email_taken").into_response(),
        Err(AuthError::InvalidEmail(_)) => Redirect::to("/?error=invalid_email").into_response(),
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to("/?error=password_too_short").into_response()
        }
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            Redirect::to("/?error=register_failed").into_response()
        }
    }
}

// =============================================================================
// Email Confirmation
// =============================================================================

/// Handle the verification link from the registration email.
pub async fn confirm(State(state): State<AppState>, Path(token): Path<String>) -> Response {
    let service = AuthService::new(state.pool(), state.tokens());

    match service.confirm_email(&token).await {
        Ok(email) => {
            tracing::info!(email = %email, "email confirmed");
            Redirect::to("/?notice=email_confirmed").into_response()
        }
        Err(AuthError::TokenExpired) => {
            Redirect::to("/?error=confirm_link_expired").into_response()
        }
        Err(AuthError::TokenInvalid) => {
            Redirect::to("/?error=confirm_link_invalid").into_response()
        }
        Err(e) => {
            tracing::error!("Email confirmation failed: {}", e);
            Redirect::to("/?error=confirm_failed").into_response()
        }
    }
}
