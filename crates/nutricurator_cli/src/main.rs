//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `nutricurator_core` linkage without the UI shell.
//! - Print a deterministic demo checkout against an in-memory store.

use nutricurator_core::db::open_db_in_memory;
use nutricurator_core::{demo_catalog, SlotCartStore, SqliteSlotStore, Storefront};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    println!("nutricurator_core ping={}", nutricurator_core::ping());
    println!("nutricurator_core version={}", nutricurator_core::core_version());

    let conn = open_db_in_memory()?;
    let slots = SqliteSlotStore::new(&conn);
    let mut storefront = Storefront::open(demo_catalog(), SlotCartStore::new(&slots), &slots);
    storefront.auth_mut().login("demo@example.com", "demo-password")?;

    for product_id in [10041, 10041, 10052] {
        storefront.add_to_cart(product_id)?;
    }

    let cart = storefront.cart();
    for entry in cart.entries() {
        println!(
            "cart entry={} product={} qty={} line_price={}",
            entry.entry_id,
            entry.product.name,
            entry.quantity,
            entry.line_price()
        );
    }

    let summary = cart.summary();
    println!(
        "checkout items={} product_total={} discount={} delivery_fee={} final_total={} remaining_for_free_delivery={}",
        cart.total_item_count(),
        summary.product_total,
        summary.discount_total,
        summary.delivery_fee,
        summary.final_total,
        summary.remaining_for_free_delivery
    );
    Ok(())
}
