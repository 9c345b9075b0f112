//! Product entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::catalog::CatalogProduct;
use stockroom_core::types::{DbId, Quantity, Timestamp};
use validator::Validate;

/// A row from the `products` table.
///
/// `price` is stored as `NUMERIC(10,2)` and read back as a float.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub title: String,
    pub sku: String,
    pub image: Option<String>,
    pub price: f64,
    pub description: Option<String>,
    pub stock: Quantity,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
}

/// The locked stock of an active product, read inside a ledger transaction.
#[derive(Debug, Clone, FromRow)]
pub struct ProductStock {
    pub id: DbId,
    pub sku: String,
    pub stock: Quantity,
}

/// DTO for creating a new product.
///
/// `stock` is the baseline quantity; afterwards only adjustments move it.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "sku must not be empty"))]
    pub sku: String,
    pub image: Option<String>,
    #[validate(range(min = 0.0, max = 99_999_999.99, message = "price must be between 0 and 99999999.99"))]
    pub price: f64,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "stock must be non-negative"))]
    pub stock: Option<Quantity>,
}

impl From<CatalogProduct> for CreateProduct {
    fn from(record: CatalogProduct) -> Self {
        Self {
            title: record.title,
            sku: record.sku,
            image: record.image,
            price: record.price,
            description: record.description,
            stock: None,
        }
    }
}

/// DTO for updating an existing product. Only supplied fields are applied.
///
/// Stock is not updatable here; it moves through adjustments.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "sku must not be empty"))]
    pub sku: Option<String>,
    pub image: Option<String>,
    #[validate(range(min = 0.0, max = 99_999_999.99, message = "price must be between 0 and 99999999.99"))]
    pub price: Option<f64>,
    pub description: Option<String>,
}

/// Body of `POST /products`: a create when `id` is absent, a partial update
/// otherwise.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertProduct {
    pub id: Option<DbId>,
    pub title: Option<String>,
    pub sku: Option<String>,
    pub image: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub stock: Option<Quantity>,
}

impl UpsertProduct {
    /// Build the create DTO, or name the first required field that is missing.
    pub fn into_create(self) -> Result<CreateProduct, &'static str> {
        Ok(CreateProduct {
            title: self.title.ok_or("title")?,
            sku: self.sku.ok_or("sku")?,
            image: self.image,
            price: self.price.unwrap_or(0.0),
            description: self.description,
            stock: self.stock,
        })
    }

    /// Build the update DTO. `id` and `stock` are not part of it.
    pub fn into_update(self) -> UpdateProduct {
        UpdateProduct {
            title: self.title,
            sku: self.sku,
            image: self.image,
            price: self.price,
            description: self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_title_and_sku() {
        let missing_title = UpsertProduct {
            sku: Some("SKU001".into()),
            ..Default::default()
        };
        assert_eq!(missing_title.into_create().unwrap_err(), "title");

        let missing_sku = UpsertProduct {
            title: Some("Lamp".into()),
            ..Default::default()
        };
        assert_eq!(missing_sku.into_create().unwrap_err(), "sku");
    }

    #[test]
    fn create_defaults_price_to_zero() {
        let input = UpsertProduct {
            title: Some("Lamp".into()),
            sku: Some("SKU001".into()),
            ..Default::default()
        };
        let create = input.into_create().unwrap();
        assert_eq!(create.price, 0.0);
        assert!(create.validate().is_ok());
    }

    #[test]
    fn negative_price_fails_validation() {
        let create = CreateProduct {
            title: "Lamp".into(),
            sku: "SKU001".into(),
            image: None,
            price: -1.0,
            description: None,
            stock: None,
        };
        assert!(create.validate().is_err());
    }

    #[test]
    fn price_beyond_column_range_fails_validation() {
        let mut create = CreateProduct {
            title: "Lamp".into(),
            sku: "SKU001".into(),
            image: None,
            price: 99_999_999.99,
            description: None,
            stock: None,
        };
        assert!(create.validate().is_ok());

        create.price = 1e9;
        assert!(create.validate().is_err());

        let update = UpdateProduct {
            price: Some(1e9),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn negative_baseline_stock_fails_validation() {
        let create = CreateProduct {
            title: "Lamp".into(),
            sku: "SKU001".into(),
            image: None,
            price: 1.0,
            description: None,
            stock: Some(-5),
        };
        assert!(create.validate().is_err());
    }

    #[test]
    fn empty_sku_on_update_fails_validation() {
        let update = UpdateProduct {
            sku: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn update_drops_stock() {
        let input = UpsertProduct {
            id: Some(1),
            stock: Some(500),
            price: Some(2.5),
            ..Default::default()
        };
        let update = input.into_update();
        assert_eq!(update.price, Some(2.5));
        assert!(update.title.is_none());
    }
}
