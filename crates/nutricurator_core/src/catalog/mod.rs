//! Read-only product catalog.
//!
//! # Responsibility
//! - Answer product/category lookups for detail pages and the cart.
//! - Provide the list views used by the home and detail pages.
//!
//! # Invariants
//! - Catalog contents never change after construction.
//! - List views preserve catalog order unless they sort explicitly.

use crate::model::product::{Category, CategoryId, Product, ProductId};
use std::cmp::Ordering;

mod seed;

pub use seed::demo_catalog;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<Category>,
}

impl Catalog {
    pub fn new(products: Vec<Product>, categories: Vec<Category>) -> Self {
        Self {
            products,
            categories,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get_product_by_id(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.product_id == id)
    }

    pub fn get_category_by_id(&self, id: CategoryId) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.category_id == id)
    }

    /// All products when `category` is `None`, otherwise that category's.
    pub fn products_in_category(&self, category: Option<CategoryId>) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| category.map_or(true, |id| product.category_id == id))
            .collect()
    }

    /// Highest discount rate first; ties keep catalog order.
    pub fn recommended(&self, limit: usize) -> Vec<&Product> {
        let mut ranked = self.products.iter().collect::<Vec<_>>();
        ranked.sort_by(|a, b| {
            b.discount_rate
                .partial_cmp(&a.discount_rate)
                .unwrap_or(Ordering::Equal)
        });
        ranked.truncate(limit);
        ranked
    }

    /// Other products in the same category. Empty for unknown ids.
    pub fn related(&self, product_id: ProductId, limit: usize) -> Vec<&Product> {
        let Some(product) = self.get_product_by_id(product_id) else {
            return Vec::new();
        };
        self.products
            .iter()
            .filter(|other| {
                other.category_id == product.category_id && other.product_id != product_id
            })
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Catalog;
    use crate::model::product::{Category, Product};

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                Product::new(1, "a", "x", 1, 9_000, 10_000),
                Product::new(2, "b", "x", 1, 5_000, 10_000),
                Product::new(3, "c", "x", 2, 7_000, 10_000),
                Product::new(4, "d", "x", 1, 5_000, 10_000),
            ],
            vec![Category::new(1, "snacks", "food")],
        )
    }

    #[test]
    fn recommended_sorts_by_discount_and_keeps_ties_stable() {
        let catalog = catalog();
        let ids = catalog
            .recommended(3)
            .into_iter()
            .map(|product| product.product_id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![2, 4, 3]);
    }

    #[test]
    fn related_excludes_self_and_other_categories() {
        let catalog = catalog();
        let ids = catalog
            .related(1, 4)
            .into_iter()
            .map(|product| product.product_id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![2, 4]);
        assert!(catalog.related(99, 4).is_empty());
    }

    #[test]
    fn category_filter_and_lookups() {
        let catalog = catalog();
        assert_eq!(catalog.products_in_category(None).len(), 4);
        assert_eq!(catalog.products_in_category(Some(2)).len(), 1);
        assert!(catalog.products_in_category(Some(9)).is_empty());
        assert_eq!(catalog.get_category_by_id(1).unwrap().name, "snacks");
        assert!(catalog.get_category_by_id(2).is_none());
        assert!(catalog.get_product_by_id(42).is_none());
    }
}
