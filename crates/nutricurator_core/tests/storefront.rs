use nutricurator_core::db::open_db_in_memory;
use nutricurator_core::{
    demo_catalog, AiDecision, AnalysisConfig, AnalysisStatus, AnalysisTask, MockAnalyzer,
    SlotCartStore, SqliteSlotStore, Storefront, StorefrontError,
};
use std::time::{Duration, Instant};

#[test]
fn add_to_cart_requires_login() {
    let conn = open_db_in_memory().unwrap();
    let slots = SqliteSlotStore::new(&conn);
    let mut storefront = Storefront::open(demo_catalog(), SlotCartStore::new(&slots), &slots);

    assert_eq!(
        storefront.add_to_cart(10041),
        Err(StorefrontError::LoginRequired)
    );
    assert!(storefront.cart().is_empty());
}

#[test]
fn add_to_cart_tags_caution_verdict_and_reports_unknown_products() {
    let conn = open_db_in_memory().unwrap();
    let slots = SqliteSlotStore::new(&conn);
    let mut storefront = Storefront::open(demo_catalog(), SlotCartStore::new(&slots), &slots);
    storefront
        .auth_mut()
        .login("shopper@example.com", "secret")
        .unwrap();

    let id = storefront.add_to_cart(10041).unwrap();
    storefront.add_to_cart(10041).unwrap();
    let entry = storefront.cart().get(id).unwrap();
    assert_eq!(entry.quantity, 2);
    assert_eq!(entry.ai_decision, Some(AiDecision::Caution));
    assert!(entry.ai_reason.as_deref().unwrap().contains("Kimchi stew"));

    assert_eq!(
        storefront.add_to_cart(1),
        Err(StorefrontError::ProductNotFound(1))
    );
}

#[test]
fn storefront_reopen_restores_cart_and_session() {
    let conn = open_db_in_memory().unwrap();
    let slots = SqliteSlotStore::new(&conn);

    {
        let mut storefront =
            Storefront::open(demo_catalog(), SlotCartStore::new(&slots), &slots);
        storefront
            .auth_mut()
            .login("shopper@example.com", "secret")
            .unwrap();
        storefront.add_to_cart(10050).unwrap();
        storefront.add_to_cart(10052).unwrap();
    }

    let storefront = Storefront::open(demo_catalog(), SlotCartStore::new(&slots), &slots);
    assert!(storefront.auth().is_logged_in());
    assert_eq!(storefront.cart().total_item_count(), 2);
    assert_eq!(storefront.cart().summary().subtotal, 11_600);
    assert_eq!(storefront.cart().summary().remaining_for_free_delivery, 8_400);
}

#[test]
fn start_analysis_uses_catalog_and_session() {
    let conn = open_db_in_memory().unwrap();
    let slots = SqliteSlotStore::new(&conn);
    let mut storefront = Storefront::open(demo_catalog(), SlotCartStore::new(&slots), &slots);
    let mut task = AnalysisTask::with_config(
        MockAnalyzer,
        AnalysisConfig {
            delay: Duration::from_millis(10),
        },
    );
    let now = Instant::now();

    assert_eq!(
        storefront.start_analysis(&mut task, 10041, now),
        Err(StorefrontError::LoginRequired)
    );

    storefront
        .auth_mut()
        .login("shopper@example.com", "secret")
        .unwrap();
    assert_eq!(
        storefront.start_analysis(&mut task, 404, now),
        Err(StorefrontError::ProductNotFound(404))
    );

    storefront.start_analysis(&mut task, 10041, now).unwrap();
    assert_eq!(
        task.poll(now + Duration::from_millis(10)),
        AnalysisStatus::Complete
    );
}
