//! Catalog reference records.
//!
//! # Responsibility
//! - Define product, nutrition and category shapes shared by catalog, cart
//!   and analysis code.
//!
//! # Invariants
//! - Products are reference data; cart and analysis paths never mutate them.
//! - Prices are integer minor units and may be compared across products.
//!
//! # See also
//! - crate::catalog

use serde::{Deserialize, Serialize};

/// Stable catalog identifier of a product.
pub type ProductId = i64;

/// Stable catalog identifier of a category.
pub type CategoryId = i64;

/// Currency amount in minor units. Signed so discount sums can go negative.
pub type Money = i64;

/// Per-serving nutrition facts as printed on the product label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Nutrition {
    /// Raw material listing.
    pub rawmtrl: String,
    /// Allergen materials listing.
    pub allergymtrl: String,
    pub serving_size: f64,
    pub reference_intake: f64,
    pub food_weight: f64,
    pub calories_kcal: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub ash_g: f64,
    pub carbohydrate_g: f64,
    pub sugar_g: f64,
    pub sodium_mg: f64,
    pub cholesterol_mg: f64,
    pub saturated_fat_g: f64,
    pub trans_fat_g: f64,
    /// Glycemic index.
    pub gi: f64,
    /// Glycemic load.
    pub gl: f64,
}

/// Read-only product record owned by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub brand: String,
    pub category_id: CategoryId,
    pub image_url: String,
    pub is_active: bool,
    /// Stock on hand. Unrelated to cart quantity.
    pub quantity: i64,
    /// Selling price after discount.
    pub price: Money,
    /// Discount percentage shown on product cards.
    pub discount_rate: f64,
    /// List price before discount.
    pub original_price: Money,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
    pub nutrition: Nutrition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Product {
    /// Creates an active product with zeroed nutrition and timestamps.
    ///
    /// `discount_rate` is derived from the two prices and rounded to a whole
    /// percent; callers importing catalog data may overwrite it.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        brand: impl Into<String>,
        category_id: CategoryId,
        price: Money,
        original_price: Money,
    ) -> Self {
        let discount_rate = if original_price > 0 {
            ((original_price - price) as f64 * 100.0 / original_price as f64).round()
        } else {
            0.0
        };
        Self {
            product_id,
            name: name.into(),
            brand: brand.into(),
            category_id,
            image_url: String::new(),
            is_active: true,
            quantity: 0,
            price,
            discount_rate,
            original_price,
            created_at: 0,
            updated_at: 0,
            nutrition: Nutrition::default(),
            description: None,
        }
    }

    /// Per-unit discount. Negative when the selling price exceeds list price.
    pub fn unit_discount(&self) -> Money {
        self.original_price.saturating_sub(self.price)
    }
}

/// Product grouping shown in the category navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
    pub supercategory: String,
}

impl Category {
    pub fn new(
        category_id: CategoryId,
        name: impl Into<String>,
        supercategory: impl Into<String>,
    ) -> Self {
        Self {
            category_id,
            name: name.into(),
            supercategory: supercategory.into(),
        }
    }
}
