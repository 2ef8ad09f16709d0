//! Business services: authentication, email delivery, token signing.

pub mod auth;
pub mod email;
pub mod token;
