//! Integration tests for the checkout hand-off.

#![allow(clippy::unwrap_used)]

use std::cell::RefCell;
use std::rc::Rc;

use streetstyle_core::{ProductId, Size};
use streetstyle_integration_tests::TestContext;
use streetstyle_storefront::AppState;
use streetstyle_storefront::StorefrontError;
use streetstyle_storefront::catalog::Catalog;
use streetstyle_storefront::checkout::{CheckoutError, CheckoutSettings};
use streetstyle_storefront::config::StorefrontConfig;

fn size(s: &str) -> Option<Size> {
    Some(Size::parse(s).unwrap())
}

fn settings() -> CheckoutSettings {
    CheckoutSettings::default().with_phone_number("5519994711585")
}

#[test]
fn test_checkout_clears_cart_and_storage() {
    let ctx = TestContext::new();
    let catalog = Catalog::builtin();
    let mut store = ctx.open_store();
    store
        .add_from_catalog(&catalog, &ProductId::new("1"), size("M"), 2)
        .unwrap();

    let counts = Rc::new(RefCell::new(Vec::new()));
    let seen = Rc::clone(&counts);
    store.subscribe(move |count| seen.borrow_mut().push(count));

    let handoff = store.checkout(&settings()).unwrap();
    assert_eq!(handoff.item_count, 2);
    assert!(
        handoff
            .message
            .contains("1. Camiseta Isolated (Tamanho: M) - Quantidade: 2 - R$ 179,80")
    );
    assert!(handoff.message.contains("Total: R$ 199,80"));

    assert_eq!(store.item_count(), 0);
    assert_eq!(*counts.borrow(), vec![0]);
    assert_eq!(ctx.raw("cart").as_deref(), Some("[]"));
    assert!(ctx.open_store().cart().is_empty());
}

#[test]
fn test_link_carries_whole_message() {
    let ctx = TestContext::new();
    let catalog = Catalog::builtin();
    let mut store = ctx.open_store();
    store
        .add_from_catalog(&catalog, &ProductId::new("5"), size("GG"), 1)
        .unwrap();
    store
        .add_from_catalog(&catalog, &ProductId::new("2"), size("P"), 3)
        .unwrap();

    let handoff = store.checkout(&settings()).unwrap();
    assert_eq!(handoff.url.host_str(), Some("wa.me"));
    assert_eq!(handoff.url.path(), "/5519994711585");

    let text = handoff
        .url
        .query_pairs()
        .find(|(k, _)| k == "text")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert_eq!(text, handoff.message);
    assert!(text.contains("2. Camiseta Beuty (Tamanho: P) - Quantidade: 3 - R$ 299,70"));
    assert!(text.contains("Frete: R$ 0,00"));
}

#[test]
fn test_failed_checkout_keeps_cart() {
    let ctx = TestContext::new();
    let catalog = Catalog::builtin();

    let mut store = ctx.open_store();
    assert!(matches!(
        store.checkout(&settings()),
        Err(CheckoutError::EmptyCart)
    ));
    assert!(ctx.raw("cart").is_none());

    store
        .add_from_catalog(&catalog, &ProductId::new("3"), size("G"), 1)
        .unwrap();
    let before = ctx.raw("cart").unwrap();
    assert!(matches!(
        store.checkout(&CheckoutSettings::default()),
        Err(CheckoutError::MissingDestination)
    ));
    assert_eq!(store.item_count(), 1);
    assert_eq!(ctx.raw("cart").unwrap(), before);
}

#[test]
fn test_app_state_from_config() {
    let ctx = TestContext::new();
    let data_dir = ctx.data_dir().display().to_string();
    let config = StorefrontConfig::from_lookup(|key| match key {
        "STOREFRONT_DATA_DIR" => Some(data_dir.clone()),
        "STOREFRONT_NAME" => Some("Loja Teste".to_string()),
        "CHECKOUT_PHONE_NUMBER" => Some("+55 11 5555-0000".to_string()),
        _ => None,
    })
    .unwrap();

    let mut state = AppState::from_config(config.clone()).unwrap();
    state.add_to_cart(&ProductId::new("4"), size("M"), 1).unwrap();
    assert!(ctx.raw("cart").is_some());

    let mut reopened = AppState::from_config(config).unwrap();
    assert_eq!(reopened.cart().item_count(), 1);
    let handoff = reopened.checkout().unwrap();
    assert!(handoff.message.starts_with("Olá! Gostaria de fazer um pedido na Loja Teste:"));
    assert_eq!(handoff.url.path(), "/551155550000");

    assert!(matches!(
        reopened.checkout(),
        Err(StorefrontError::Checkout(CheckoutError::EmptyCart))
    ));
}

#[test]
fn test_catalog_file_overrides_builtin() {
    let ctx = TestContext::new();
    let catalog_path = ctx.data_dir().join("catalog.json");
    std::fs::write(
        &catalog_path,
        r#"[{"id": "cap", "name": "Boné", "price": "59.90", "images": ["img/cap.jpg"]}]"#,
    )
    .unwrap();

    let data_dir = ctx.data_dir().display().to_string();
    let catalog = catalog_path.display().to_string();
    let config = StorefrontConfig::from_lookup(|key| match key {
        "STOREFRONT_DATA_DIR" => Some(data_dir.clone()),
        "STOREFRONT_CATALOG_PATH" => Some(catalog.clone()),
        "CHECKOUT_PHONE_NUMBER" => Some("5511".to_string()),
        _ => None,
    })
    .unwrap();

    let mut state = AppState::from_config(config).unwrap();
    assert_eq!(state.catalog().len(), 1);
    state.add_to_cart(&ProductId::new("cap"), None, 2).unwrap();
    let handoff = state.checkout().unwrap();
    assert!(handoff.message.contains("1. Boné - Quantidade: 2 - R$ 119,80"));
}
