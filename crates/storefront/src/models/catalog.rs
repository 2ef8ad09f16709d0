//! Catalog domain types.
//!
//! Rows are decoded straight into these types via `sqlx::FromRow`; queries
//! alias the storage column names (`id_categoria`, `product_name`, ...) to
//! the field names below.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use farmacia_core::{CategoryId, ProductId, SubcategoryId};

/// A top-level catalog category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    /// Unique category ID.
    #[serde(rename = "id_categoria")]
    pub id: CategoryId,
    /// Display name.
    #[serde(rename = "nombre")]
    pub name: String,
}

/// A subcategory within a category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subcategory {
    /// Unique subcategory ID.
    #[serde(rename = "id_subcategoria")]
    pub id: SubcategoryId,
    /// Display name.
    #[serde(rename = "nombre")]
    pub name: String,
}

/// A sellable product joined with its brand for display.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Image reference (path or URL).
    pub image: Option<String>,
    /// Brand name, joined from the brands table.
    pub brand_name: String,
    /// Display rate.
    pub rate: Decimal,
    /// List price; the price charged at checkout.
    pub mrp: Decimal,
}

/// A homepage banner image.
#[derive(Debug, Clone, FromRow)]
pub struct Banner {
    /// Image reference (path or URL).
    pub image: String,
}

/// Banner placement, stored as a type tag on each banner row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    /// Rotating carousel at the top of the page.
    Carousel,
    /// Static banner interleaved between product rows.
    Inline,
}

impl BannerKind {
    /// The tag value stored in the `tipo` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Carousel => "carrusel",
            Self::Inline => "banner",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_kind_tags() {
        assert_eq!(BannerKind::Carousel.as_str(), "carrusel");
        assert_eq!(BannerKind::Inline.as_str(), "banner");
    }

    #[test]
    fn test_category_json_uses_storage_names() {
        let category = Category {
            id: CategoryId::new(4),
            name: "Cuidado personal".to_string(),
        };
        let json = serde_json::to_string(&category).expect("serializable");
        assert_eq!(json, r#"{"id_categoria":4,"nombre":"Cuidado personal"}"#);
    }

    #[test]
    fn test_subcategory_json_uses_storage_names() {
        let subcategory = Subcategory {
            id: SubcategoryId::new(9),
            name: "Analgésicos".to_string(),
        };
        let json = serde_json::to_string(&subcategory).expect("serializable");
        assert_eq!(json, r#"{"id_subcategoria":9,"nombre":"Analgésicos"}"#);
    }
}
