//! Storefront use-cases spanning catalog, session and cart.
//!
//! # Responsibility
//! - Own one catalog, one session and one cart engine per storefront.
//! - Gate shopper actions (add to cart, analysis) on a logged-in session.
//!
//! # Invariants
//! - All cart mutation still goes through [`CartEngine`].
//! - Unknown product ids are reported, never panicked on.

use crate::catalog::Catalog;
use crate::model::cart::{AiDecision, CartEntryId};
use crate::model::product::{Product, ProductId};
use crate::repo::cart_repo::CartStore;
use crate::repo::slot_store::SlotStore;
use crate::service::analysis_service::{AnalysisError, AnalysisTask, Analyzer};
use crate::service::auth_service::AuthService;
use crate::service::cart_service::CartEngine;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorefrontError {
    LoginRequired,
    ProductNotFound(ProductId),
}

impl Display for StorefrontError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoginRequired => write!(f, "login is required"),
            Self::ProductNotFound(id) => write!(f, "product not found: {id}"),
        }
    }
}

impl Error for StorefrontError {}

impl From<AnalysisError> for StorefrontError {
    fn from(value: AnalysisError) -> Self {
        match value {
            AnalysisError::LoginRequired => Self::LoginRequired,
        }
    }
}

/// Shared state for every storefront surface.
pub struct Storefront<C: CartStore, S: SlotStore> {
    catalog: Catalog,
    cart: CartEngine<C>,
    auth: AuthService<S>,
}

impl<C: CartStore, S: SlotStore> Storefront<C, S> {
    /// Hydrates the cart and restores the session from their stores.
    pub fn open(catalog: Catalog, cart_store: C, session_slots: S) -> Self {
        Self {
            catalog,
            cart: CartEngine::hydrate(cart_store),
            auth: AuthService::restore(session_slots),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &CartEngine<C> {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartEngine<C> {
        &mut self.cart
    }

    pub fn auth(&self) -> &AuthService<S> {
        &self.auth
    }

    pub fn auth_mut(&mut self) -> &mut AuthService<S> {
        &mut self.auth
    }

    /// Adds a product from its detail page.
    ///
    /// # Contract
    /// - Requires a logged-in session.
    /// - Tags the entry with the "caution" verdict the detail page shows.
    pub fn add_to_cart(&mut self, product_id: ProductId) -> Result<CartEntryId, StorefrontError> {
        if !self.auth.is_logged_in() {
            return Err(StorefrontError::LoginRequired);
        }
        let product = self
            .catalog
            .get_product_by_id(product_id)
            .ok_or(StorefrontError::ProductNotFound(product_id))?;

        let reason = detail_page_reason(product);
        Ok(self
            .cart
            .add(product, Some(AiDecision::Caution), Some(reason)))
    }

    /// Starts analysis of a catalog product for the current shopper.
    pub fn start_analysis<A: Analyzer>(
        &self,
        task: &mut AnalysisTask<A>,
        product_id: ProductId,
        now: Instant,
    ) -> Result<(), StorefrontError> {
        let product = self
            .catalog
            .get_product_by_id(product_id)
            .ok_or(StorefrontError::ProductNotFound(product_id))?;
        task.start(product, self.auth.session(), now)?;
        Ok(())
    }
}

fn detail_page_reason(product: &Product) -> String {
    format!(
        "As a prehypertensive shopper, note that \"{}\" is high in sodium.",
        product.name
    )
}
