//! Checkout route handlers.
//!
//! `/checkout` renders a demo cart summary with fixed lines; the real cart
//! lives in the `carrito` table and is consumed by `/procesar_compra`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use crate::db::orders::{CheckoutError, OrderRepository};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Free shipping threshold for the demo summary.
const FREE_SHIPPING_FROM: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Flat shipping cost below the threshold.
const SHIPPING_COST: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// A line in the demo cart summary.
pub struct DemoCartLine {
    pub name: &'static str,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl DemoCartLine {
    fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Demo cart contents shown on the checkout page.
fn demo_cart() -> Vec<DemoCartLine> {
    vec![
        DemoCartLine {
            name: "Paracetamol 500mg",
            quantity: 2,
            unit_price: Decimal::new(35, 1), // 3.50
        },
        DemoCartLine {
            name: "Alcohol en gel 250ml",
            quantity: 1,
            unit_price: Decimal::new(60, 1), // 6.00
        },
        DemoCartLine {
            name: "Mascarilla KN95",
            quantity: 3,
            unit_price: Decimal::new(25, 1), // 2.50
        },
    ]
}

/// Checkout summary template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub carrito: Vec<DemoCartLine>,
    pub subtotal: Decimal,
    pub envio: Decimal,
    pub total: Decimal,
}

/// Purchase form data.
#[derive(Debug, Deserialize)]
pub struct PurchaseForm {
    pub metodo_pago: String,
    #[serde(default)]
    pub comentarios: Option<String>,
}

/// Cart page placeholder.
pub async fn cart_page() -> &'static str {
    "Aquí va la página del carrito"
}

/// Display the demo checkout summary.
pub async fn checkout_page() -> CheckoutTemplate {
    let carrito = demo_cart();

    let subtotal: Decimal = carrito.iter().map(DemoCartLine::total).sum();
    let envio = if subtotal < FREE_SHIPPING_FROM {
        SHIPPING_COST
    } else {
        Decimal::ZERO
    };
    let total = subtotal + envio;

    CheckoutTemplate {
        carrito,
        subtotal,
        envio,
        total,
    }
}

/// Place an order from the logged-in customer's cart.
#[instrument(skip(state, form))]
pub async fn process_purchase(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Form(form): Form<PurchaseForm>,
) -> Result<Response, AppError> {
    let comentarios = form.comentarios.unwrap_or_default();

    let placed = OrderRepository::new(state.pool())
        .place_order(current.id, &form.metodo_pago, &comentarios)
        .await;

    match placed {
        Ok(order_id) => {
            tracing::info!(%order_id, customer_id = %current.id, "purchase completed");
            Ok(Redirect::to("/?notice=order_placed").into_response())
        }
        Err(CheckoutError::EmptyCart) => {
            Ok(Redirect::to("/carrito?error=cart_empty").into_response())
        }
        Err(e) => Err(AppError::from(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_cart_totals() {
        let template = checkout_page().await;
        // 2*3.50 + 1*6.00 + 3*2.50 = 20.50, below the free shipping threshold
        assert_eq!(template.subtotal, Decimal::new(2050, 2));
        assert_eq!(template.envio, SHIPPING_COST);
        assert_eq!(template.total, Decimal::new(2550, 2));
    }

    #[test]
    fn test_line_total() {
        let line = DemoCartLine {
            name: "Vitaminas",
            quantity: 10,
            unit_price: Decimal::new(500, 2), // 5.00
        };
        assert_eq!(line.total(), Decimal::new(5000, 2));
        assert!(line.total() >= FREE_SHIPPING_FROM);
    }
}
