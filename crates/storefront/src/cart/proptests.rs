//! Property-based tests for cart quantity rules and persistence.

use proptest::prelude::*;
use rust_decimal::Decimal;
use streetstyle_core::Size;

use super::{Cart, CartSettings, CartStore, KeyPolicy, LineItem, LineKey, ShippingPolicy, Totals};
use crate::storage::MemoryStorage;

#[derive(Debug, Clone)]
enum Op {
    Add { id: u8, size: Option<u8>, quantity: u32 },
    Change { id: u8, size: Option<u8>, delta: i64 },
    Set { id: u8, size: Option<u8>, quantity: i64 },
    Remove { id: u8, size: Option<u8> },
}

const SIZES: [&str; 4] = ["P", "M", "G", "GG"];

fn size(index: Option<u8>) -> Option<Size> {
    index
        .and_then(|i| SIZES.get(usize::from(i)))
        .and_then(|s| Size::parse(s).ok())
}

fn item(id: u8, size_index: Option<u8>, quantity: u32) -> LineItem {
    let item = LineItem::new(
        id.to_string(),
        format!("Camiseta {id}"),
        Decimal::new(1990 + i64::from(id) * 1000, 2),
        "",
    )
    .with_quantity(quantity);
    match size(size_index) {
        Some(size) => item.with_size(size),
        None => item,
    }
}

fn key(id: u8, size_index: Option<u8>) -> LineKey {
    LineKey {
        id: id.to_string().into(),
        size: size(size_index),
    }
}

fn policy() -> impl Strategy<Value = KeyPolicy> {
    prop_oneof![Just(KeyPolicy::ProductId), Just(KeyPolicy::ProductAndSize)]
}

fn op() -> impl Strategy<Value = Op> {
    let id = 0u8..4;
    let size = proptest::option::of(0u8..4);
    prop_oneof![
        (id.clone(), size.clone(), 0u32..5)
            .prop_map(|(id, size, quantity)| Op::Add { id, size, quantity }),
        (id.clone(), size.clone(), -5i64..5)
            .prop_map(|(id, size, delta)| Op::Change { id, size, delta }),
        (id.clone(), size.clone(), -2i64..6)
            .prop_map(|(id, size, quantity)| Op::Set { id, size, quantity }),
        (id, size).prop_map(|(id, size)| Op::Remove { id, size }),
    ]
}

fn apply(cart: &mut Cart, policy: KeyPolicy, op: &Op) {
    match *op {
        Op::Add { id, size, quantity } => {
            cart.add_item(policy, item(id, size, quantity));
        }
        Op::Change { id, size, delta } => {
            cart.change_quantity(policy, &key(id, size), delta);
        }
        Op::Set { id, size, quantity } => {
            cart.set_quantity(policy, &key(id, size), quantity);
        }
        Op::Remove { id, size } => {
            cart.remove_item(policy, &key(id, size));
        }
    }
}

proptest! {
    #[test]
    fn test_repeated_adds_sum_into_one_line(
        policy in policy(),
        quantities in proptest::collection::vec(1u32..10, 1..8),
    ) {
        let mut cart = Cart::new();
        for &quantity in &quantities {
            cart.add_item(policy, item(1, Some(1), quantity));
        }

        prop_assert_eq!(cart.len(), 1);
        prop_assert_eq!(cart.item_count(), quantities.iter().sum::<u32>());
    }

    #[test]
    fn test_non_positive_set_removes(policy in policy(), quantity in -10i64..=0) {
        let mut cart = Cart::new();
        cart.add_item(policy, item(1, Some(0), 3));
        cart.add_item(policy, item(2, None, 1));

        prop_assert!(cart.set_quantity(policy, &key(1, Some(0)), quantity));
        prop_assert!(cart.get(policy, &key(1, Some(0))).is_none());
        prop_assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_missing_key_leaves_cart_unchanged(
        policy in policy(),
        ops in proptest::collection::vec(op(), 0..20),
        delta in -5i64..5,
    ) {
        let mut cart = Cart::new();
        for op in &ops {
            apply(&mut cart, policy, op);
        }
        let before = cart.clone();
        let missing = LineKey::product("does-not-exist");

        prop_assert!(!cart.change_quantity(policy, &missing, delta));
        prop_assert!(!cart.set_quantity(policy, &missing, 3));
        prop_assert!(!cart.remove_item(policy, &missing));
        prop_assert_eq!(cart, before);
    }

    #[test]
    fn test_quantities_stay_positive_and_keys_unique(
        policy in policy(),
        ops in proptest::collection::vec(op(), 0..40),
    ) {
        let mut cart = Cart::new();
        for op in &ops {
            apply(&mut cart, policy, op);
        }

        for (i, line) in cart.lines().iter().enumerate() {
            prop_assert!(line.quantity >= 1);
            let key = LineKey::from(line);
            let duplicates = cart
                .lines()
                .iter()
                .skip(i + 1)
                .filter(|other| policy.matches(other, &key))
                .count();
            prop_assert_eq!(duplicates, 0);
        }
    }

    #[test]
    fn test_totals_follow_shipping_rule(ops in proptest::collection::vec(op(), 0..20)) {
        let mut cart = Cart::new();
        for op in &ops {
            apply(&mut cart, KeyPolicy::ProductAndSize, op);
        }
        let policy = ShippingPolicy::default();
        let totals = Totals::compute(&cart, &policy);

        prop_assert_eq!(totals.subtotal, cart.subtotal());
        prop_assert_eq!(totals.total, totals.subtotal + totals.shipping);
        if cart.is_empty() || totals.subtotal >= policy.threshold {
            prop_assert_eq!(totals.shipping, Decimal::ZERO);
        } else {
            prop_assert_eq!(totals.shipping, policy.flat_fee);
        }
    }

    #[test]
    fn test_reopened_store_matches_persisted_cart(
        policy in policy(),
        ops in proptest::collection::vec(op(), 0..20),
    ) {
        let settings = CartSettings { key_policy: policy, ..CartSettings::default() };
        let mut store = CartStore::open(MemoryStorage::new(), settings.clone());
        for op in &ops {
            match *op {
                Op::Add { id, size, quantity } => {
                    store.add_item(item(id, size, quantity));
                }
                Op::Change { id, size, delta } => {
                    store.change_quantity(&key(id, size), delta);
                }
                Op::Set { id, size, quantity } => {
                    store.set_quantity(&key(id, size), quantity);
                }
                Op::Remove { id, size } => {
                    store.remove_item(&key(id, size));
                }
            }
        }
        let expected = store.cart().clone();

        let reopened = CartStore::open(store.into_storage(), settings);
        prop_assert_eq!(reopened.cart(), &expected);
    }
}
