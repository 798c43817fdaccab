//! Flutter-facing bindings for the NutriCurator storefront core.

pub mod api;
