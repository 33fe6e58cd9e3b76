//! Cart and cart line types.
//!
//! The persisted layout is a JSON array of lines:
//!
//! ```json
//! [{"nombre": "Widget", "precio": 1000.0, "cantidad": 2, "imagen": "./img/widget.jpg"}]
//! ```
//!
//! The English field names (`name`, `unitPrice`, `quantity`, `imageRef`) are
//! accepted when reading.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{ItemName, Price, Quantity};

/// Image shown for items whose buy control carries no image reference.
pub const DEFAULT_IMAGE: &str = "./img/default.jpg";

fn default_image() -> String {
    DEFAULT_IMAGE.to_owned()
}

/// A single line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// De-duplication key.
    #[serde(rename = "nombre", alias = "name")]
    pub name: ItemName,
    /// Price of a single unit.
    #[serde(rename = "precio", alias = "unitPrice")]
    pub unit_price: Price,
    /// Units in the cart.
    #[serde(rename = "cantidad", alias = "quantity")]
    pub quantity: Quantity,
    /// Path or URL of the item image.
    #[serde(rename = "imagen", alias = "imageRef", default = "default_image")]
    pub image: String,
}

impl CartItem {
    /// Create a cart line.
    #[must_use]
    pub fn new(name: ItemName, unit_price: Price, quantity: Quantity, image: impl Into<String>) -> Self {
        Self {
            name,
            unit_price,
            quantity,
            image: image.into(),
        }
    }

    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Ordered, de-duplicated collection of cart lines.
///
/// No two lines share a name. Lines keep the order in which their names were
/// first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from lines, merging lines that share a name.
    ///
    /// The first occurrence of a name keeps its price and image; later
    /// occurrences only contribute their quantity.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            cart.add_item(item);
        }
        cart
    }

    /// Add `candidate` to the cart.
    ///
    /// If a line with the same name exists its quantity grows by
    /// `candidate.quantity` and its price and image are left untouched;
    /// otherwise `candidate` is appended. Returns the resulting quantity of
    /// the affected line.
    pub fn add_item(&mut self, candidate: CartItem) -> Quantity {
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.name == candidate.name)
        {
            existing.quantity = existing.quantity.saturating_add(candidate.quantity);
            return existing.quantity;
        }

        let quantity = candidate.quantity;
        self.items.push(candidate);
        quantity
    }

    /// Look up a line by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.name.as_str() == name)
    }

    /// The cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line quantities. 0 for an empty cart.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of `unit_price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items
            .iter()
            .fold(Price::ZERO, |total, item| total.saturating_add(item.line_total()))
    }

    /// Consume the cart and return its lines.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }
}

impl FromIterator<CartItem> for Cart {
    fn from_iter<I: IntoIterator<Item = CartItem>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<CartItem>::deserialize(deserializer).map(Self::from_items)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(name: &str, price: &str, quantity: u32) -> CartItem {
        CartItem::new(
            ItemName::parse(name).unwrap(),
            Price::parse(price).unwrap(),
            Quantity::new(quantity).unwrap(),
            DEFAULT_IMAGE,
        )
    }

    #[test]
    fn test_empty_cart_totals() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total_quantity(), 0);
        assert_eq!(cart.total_price(), Price::ZERO);
    }

    #[test]
    fn test_add_new_item_appends() {
        let mut cart = Cart::new();
        let quantity = cart.add_item(item("Widget", "1000", 2));
        assert_eq!(quantity.get(), 2);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.total_price(), Price::parse("2000").unwrap());
    }

    #[test]
    fn test_add_existing_item_increments_quantity() {
        let mut cart = Cart::new();
        cart.add_item(item("Widget", "1000", 1));
        let mut again = item("Widget", "5", 3);
        again.image = "./img/other.jpg".to_owned();
        cart.add_item(again);

        assert_eq!(cart.len(), 1);
        let line = cart.get("Widget").unwrap();
        assert_eq!(line.quantity.get(), 4);
        assert_eq!(line.unit_price, Price::parse("1000").unwrap());
        assert_eq!(line.image, DEFAULT_IMAGE);
        assert_eq!(cart.total_price(), Price::parse("4000").unwrap());
    }

    #[test]
    fn test_names_stay_unique_over_many_adds() {
        let mut cart = Cart::new();
        for round in 0..5 {
            for name in ["a", "b", "c", "a", "b"] {
                cart.add_item(item(name, "1", round + 1));
            }
        }
        let mut names: Vec<_> = cart.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        names.dedup();
        assert_eq!(names.len(), cart.len());
        assert_eq!(cart.total_quantity(), 2 * 15 + 2 * 15 + 15);
    }

    #[test]
    fn test_names_compare_exactly() {
        let mut cart = Cart::new();
        cart.add_item(item("Widget", "1", 1));
        cart.add_item(item("widget", "1", 1));
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_total_price_mixes_lines() {
        let cart: Cart = [item("a", "19.99", 2), item("b", "0.02", 1)]
            .into_iter()
            .collect();
        assert_eq!(cart.total_price(), Price::parse("40").unwrap());
    }

    #[test]
    fn test_serialize_uses_persisted_field_names() {
        let mut cart = Cart::new();
        cart.add_item(item("Widget", "1000", 2));
        let json = serde_json::to_value(&cart).unwrap();
        let line = &json[0];
        assert_eq!(line["nombre"], "Widget");
        assert_eq!(line["cantidad"], 2);
        assert_eq!(line["imagen"], DEFAULT_IMAGE);
        assert_eq!(line["precio"].as_f64(), Some(1000.0));
    }

    #[test]
    fn test_deserialize_accepts_aliases_and_default_image() {
        let json = r#"[{"name": "Widget", "unitPrice": 10, "quantity": 1}]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        let line = cart.get("Widget").unwrap();
        assert_eq!(line.image, DEFAULT_IMAGE);
        assert_eq!(line.unit_price, Price::parse("10").unwrap());
    }

    #[test]
    fn test_deserialize_merges_duplicate_names() {
        let json = r#"[
            {"nombre": "Widget", "precio": 10, "cantidad": 1, "imagen": "a.jpg"},
            {"nombre": "Widget", "precio": 99, "cantidad": 2, "imagen": "b.jpg"}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.len(), 1);
        let line = cart.get("Widget").unwrap();
        assert_eq!(line.quantity.get(), 3);
        assert_eq!(line.image, "a.jpg");
    }

    #[test]
    fn test_deserialize_rejects_invalid_lines() {
        assert!(serde_json::from_str::<Cart>(r#"{"nombre": "x"}"#).is_err());
        assert!(
            serde_json::from_str::<Cart>(r#"[{"nombre": "", "precio": 1, "cantidad": 1}]"#)
                .is_err()
        );
        assert!(
            serde_json::from_str::<Cart>(r#"[{"nombre": "x", "precio": -1, "cantidad": 1}]"#)
                .is_err()
        );
    }

    #[test]
    fn test_round_trip() {
        let cart = Cart::from_items([item("Widget", "1000", 2), item("Taza", "2500.5", 1)]);
        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }

    mod proptest_cart {
        use std::collections::{HashMap, HashSet};

        use proptest::prelude::*;
        use rust_decimal::Decimal;

        use super::*;

        /// A buy candidate drawn from a small pool of names, so sequences
        /// repeat names often.
        fn candidate() -> impl Strategy<Value = CartItem> {
            (
                prop::sample::select(vec!["Widget", "widget", "Taza", " Taza", "Lámpara"]),
                0_i64..10_000_000,
                0_u32..=4,
                1_u32..100,
            )
                .prop_map(|(name, mantissa, scale, quantity)| {
                    CartItem::new(
                        ItemName::parse(name).unwrap(),
                        Price::new(Decimal::new(mantissa, scale)).unwrap(),
                        Quantity::new(quantity).unwrap(),
                        DEFAULT_IMAGE,
                    )
                })
        }

        proptest! {
            /// No two lines share a name, whatever the order of adds.
            #[test]
            fn test_names_stay_unique_over_arbitrary_adds(
                adds in prop::collection::vec(candidate(), 0..40),
            ) {
                let mut cart = Cart::new();
                for add in &adds {
                    cart.add_item(add.clone());
                }

                let names: HashSet<&str> = cart.items().iter().map(|i| i.name.as_str()).collect();
                prop_assert_eq!(names.len(), cart.len());
                let added: HashSet<&str> = adds.iter().map(|i| i.name.as_str()).collect();
                prop_assert_eq!(names, added);

                let units: u64 = adds.iter().map(|i| u64::from(i.quantity.get())).sum();
                prop_assert_eq!(cart.total_quantity(), units);
            }

            /// The first add of a name fixes the line's unit price.
            #[test]
            fn test_first_add_fixes_unit_price(
                adds in prop::collection::vec(candidate(), 1..40),
            ) {
                let mut first: HashMap<&str, Price> = HashMap::new();
                let mut cart = Cart::new();
                for add in &adds {
                    first.entry(add.name.as_str()).or_insert(add.unit_price);
                    cart.add_item(add.clone());
                }
                for line in &cart {
                    prop_assert_eq!(Some(&line.unit_price), first.get(line.name.as_str()));
                }
            }
        }
    }
}
