use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shoplist_core::{Aggregate, AggregateId, AggregateRoot, Event};

use crate::product::{Product, ProductId, accepted_name};

/// Identifier of a product list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductListId(pub AggregateId);

impl ProductListId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductListId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Aggregate root: the ordered product list.
///
/// Items keep insertion order. Removal closes the gap and never reorders the
/// survivors. Lookups by id are linear scans; lists are expected to stay small.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductList {
    id: ProductListId,
    items: Vec<Product>,
    version: u64,
}

impl ProductList {
    /// Create an empty list.
    pub fn empty(id: ProductListId) -> Self {
        Self {
            id,
            items: Vec::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> ProductListId {
        self.id
    }

    /// Current items in display order.
    pub fn list(&self) -> &[Product] {
        &self.items
    }

    pub fn get(&self, product_id: ProductId) -> Option<&Product> {
        self.items.iter().find(|p| p.id_typed() == product_id)
    }

    pub fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|p| p.id_typed() == product_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // The operations below return the applied events; an empty vector means
    // the call was a no-op.

    /// Append a product named `raw_name` (trimmed). Blank names are ignored.
    pub fn add(&mut self, raw_name: &str) -> Vec<ProductListEvent> {
        self.execute(&ProductListCommand::AddProduct(AddProduct {
            product_id: ProductId::generate(),
            name: raw_name.to_string(),
            occurred_at: Utc::now(),
        }))
    }

    /// Remove the product with `product_id`, if it is still in the list.
    pub fn remove_by_identity(&mut self, product_id: ProductId) -> Vec<ProductListEvent> {
        self.execute(&ProductListCommand::RemoveProduct(RemoveProduct {
            product_id,
            occurred_at: Utc::now(),
        }))
    }

    /// Rename the product with `product_id` to `raw_new_name` (trimmed).
    ///
    /// Blank names and unknown ids leave the list untouched.
    pub fn update(&mut self, product_id: ProductId, raw_new_name: &str) -> Vec<ProductListEvent> {
        self.execute(&ProductListCommand::RenameProduct(RenameProduct {
            product_id,
            name: raw_new_name.to_string(),
            occurred_at: Utc::now(),
        }))
    }

    /// Remove every position in `indices`, all interpreted against the list as
    /// it is before the call.
    pub fn remove_by_indices(&mut self, indices: &BTreeSet<usize>) -> Vec<ProductListEvent> {
        self.execute(&ProductListCommand::RemoveProductsAt(RemoveProductsAt {
            indices: indices.clone(),
            occurred_at: Utc::now(),
        }))
    }

    /// Decide and apply a command, returning the events that were applied.
    ///
    /// An empty result means the command was a no-op.
    pub fn execute(&mut self, command: &ProductListCommand) -> Vec<ProductListEvent> {
        let events = self.handle(command).unwrap_or_else(|never| match never {});
        for event in &events {
            self.apply(event);
        }
        events
    }
}

impl Default for ProductList {
    fn default() -> Self {
        Self::empty(ProductListId::new(AggregateId::new()))
    }
}

impl AggregateRoot for ProductList {
    type Id = ProductListId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProduct {
    pub product_id: ProductId,
    /// Raw user input; trimmed before it is accepted.
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RenameProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameProduct {
    pub product_id: ProductId,
    /// Raw user input; trimmed before it is accepted.
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveProduct {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveProductsAt (positions in the current list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveProductsAt {
    pub indices: BTreeSet<usize>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductListCommand {
    AddProduct(AddProduct),
    RenameProduct(RenameProduct),
    RemoveProduct(RemoveProduct),
    RemoveProductsAt(RemoveProductsAt),
}

/// Event: ProductAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAdded {
    pub product_id: ProductId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductRenamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRenamed {
    pub product_id: ProductId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRemoved {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ProductsRemoved (one batch, resolved from positions to ids).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductsRemoved {
    pub product_ids: Vec<ProductId>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductListEvent {
    ProductAdded(ProductAdded),
    ProductRenamed(ProductRenamed),
    ProductRemoved(ProductRemoved),
    ProductsRemoved(ProductsRemoved),
}

impl Event for ProductListEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProductListEvent::ProductAdded(_) => "products.list.product_added",
            ProductListEvent::ProductRenamed(_) => "products.list.product_renamed",
            ProductListEvent::ProductRemoved(_) => "products.list.product_removed",
            ProductListEvent::ProductsRemoved(_) => "products.list.products_removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            ProductListEvent::ProductAdded(e) => e.occurred_at,
            ProductListEvent::ProductRenamed(e) => e.occurred_at,
            ProductListEvent::ProductRemoved(e) => e.occurred_at,
            ProductListEvent::ProductsRemoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for ProductList {
    type Command = ProductListCommand;
    type Event = ProductListEvent;
    type Error = core::convert::Infallible;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            ProductListEvent::ProductAdded(e) => {
                self.items.push(Product::new(e.product_id, e.name.clone()));
            }
            ProductListEvent::ProductRenamed(e) => {
                if let Some(product) = self.items.iter_mut().find(|p| p.id_typed() == e.product_id) {
                    product.rename(e.name.clone());
                }
            }
            ProductListEvent::ProductRemoved(e) => {
                if let Some(pos) = self.position(e.product_id) {
                    self.items.remove(pos);
                }
            }
            ProductListEvent::ProductsRemoved(e) => {
                let doomed: HashSet<ProductId> = e.product_ids.iter().copied().collect();
                self.items.retain(|p| !doomed.contains(&p.id_typed()));
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        Ok(match command {
            ProductListCommand::AddProduct(cmd) => self.handle_add(cmd),
            ProductListCommand::RenameProduct(cmd) => self.handle_rename(cmd),
            ProductListCommand::RemoveProduct(cmd) => self.handle_remove(cmd),
            ProductListCommand::RemoveProductsAt(cmd) => self.handle_remove_at(cmd),
        })
    }
}

impl ProductList {
    fn handle_add(&self, cmd: &AddProduct) -> Vec<ProductListEvent> {
        let Some(name) = accepted_name(&cmd.name) else {
            return Vec::new();
        };
        // Ids are never shared between live products.
        if self.position(cmd.product_id).is_some() {
            return Vec::new();
        }

        vec![ProductListEvent::ProductAdded(ProductAdded {
            product_id: cmd.product_id,
            name,
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_rename(&self, cmd: &RenameProduct) -> Vec<ProductListEvent> {
        let Some(name) = accepted_name(&cmd.name) else {
            return Vec::new();
        };
        if self.get(cmd.product_id).is_none() {
            return Vec::new();
        }

        vec![ProductListEvent::ProductRenamed(ProductRenamed {
            product_id: cmd.product_id,
            name,
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_remove(&self, cmd: &RemoveProduct) -> Vec<ProductListEvent> {
        if self.get(cmd.product_id).is_none() {
            return Vec::new();
        }

        vec![ProductListEvent::ProductRemoved(ProductRemoved {
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_remove_at(&self, cmd: &RemoveProductsAt) -> Vec<ProductListEvent> {
        // Positions are resolved against the current state up front, so the
        // batch is applied as one unit. Out-of-range positions are skipped.
        let product_ids: Vec<ProductId> = cmd
            .indices
            .iter()
            .filter_map(|&index| self.items.get(index))
            .map(Product::id_typed)
            .collect();

        if product_ids.is_empty() {
            return Vec::new();
        }

        vec![ProductListEvent::ProductsRemoved(ProductsRemoved {
            product_ids,
            occurred_at: cmd.occurred_at,
        })]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_list() -> ProductList {
        ProductList::empty(ProductListId::new(AggregateId::new()))
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn names(list: &ProductList) -> Vec<&str> {
        list.list().iter().map(Product::name).collect()
    }

    fn list_of(items: &[&str]) -> ProductList {
        let mut list = test_list();
        for item in items {
            list.add(item);
        }
        list
    }

    #[test]
    fn add_appends_trimmed_names_in_order() {
        let mut list = test_list();
        list.add("Milk");
        list.add("  Bread  ");

        assert_eq!(names(&list), vec!["Milk", "Bread"]);
        assert_eq!(list.version(), 2);
    }

    #[test]
    fn add_ignores_blank_names() {
        let mut list = test_list();
        list.add("   ");
        list.add("");
        list.add("\n\t");

        assert!(list.is_empty());
        assert_eq!(list.version(), 0);
    }

    #[test]
    fn add_assigns_distinct_ids() {
        let list = list_of(&["Milk", "Milk", "Milk"]);
        let ids: HashSet<ProductId> = list.list().iter().map(Product::id_typed).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn add_with_existing_id_is_a_no_op() {
        let mut list = list_of(&["Milk"]);
        let existing = list.list()[0].id_typed();

        let events = list.execute(&ProductListCommand::AddProduct(AddProduct {
            product_id: existing,
            name: "Bread".to_string(),
            occurred_at: test_time(),
        }));

        assert!(events.is_empty());
        assert_eq!(names(&list), vec!["Milk"]);
    }

    #[test]
    fn remove_by_identity_keeps_order_of_the_rest() {
        let mut list = list_of(&["A", "B", "C"]);
        let b = list.list()[1].id_typed();

        list.remove_by_identity(b);

        assert_eq!(names(&list), vec!["A", "C"]);
        assert!(list.get(b).is_none());
    }

    #[test]
    fn remove_by_identity_tolerates_unknown_and_repeated_ids() {
        let mut list = list_of(&["A", "B"]);
        let a = list.list()[0].id_typed();

        list.remove_by_identity(a);
        let before = list.clone();
        list.remove_by_identity(a);
        list.remove_by_identity(ProductId::generate());

        assert_eq!(list, before);
    }

    #[test]
    fn update_renames_in_place() {
        let mut list = list_of(&["A", "B", "C"]);
        let b = list.list()[1].id_typed();

        list.update(b, "  Butter ");

        assert_eq!(names(&list), vec!["A", "Butter", "C"]);
        assert_eq!(list.list()[1].id_typed(), b);
        assert_eq!(list.position(b), Some(1));
    }

    #[test]
    fn update_with_blank_name_keeps_old_name() {
        let mut list = list_of(&["A"]);
        let a = list.list()[0].id_typed();
        let before = list.clone();

        list.update(a, "");
        list.update(a, "   ");

        assert_eq!(list, before);
    }

    #[test]
    fn update_of_unknown_id_is_a_no_op() {
        let mut list = list_of(&["A"]);
        let before = list.clone();

        list.update(ProductId::generate(), "Z");

        assert_eq!(list, before);
    }

    #[test]
    fn remove_by_indices_uses_pre_removal_positions() {
        let mut list = list_of(&["A", "B", "C"]);

        list.remove_by_indices(&BTreeSet::from([0, 2]));

        assert_eq!(names(&list), vec!["B"]);
    }

    #[test]
    fn remove_by_indices_is_a_single_event() {
        let mut list = list_of(&["A", "B", "C", "D"]);
        let version_before = list.version();

        let events = list.execute(&ProductListCommand::RemoveProductsAt(RemoveProductsAt {
            indices: BTreeSet::from([1, 3]),
            occurred_at: test_time(),
        }));

        assert_eq!(events.len(), 1);
        assert_eq!(list.version(), version_before + 1);
        assert_eq!(names(&list), vec!["A", "C"]);
    }

    #[test]
    fn operations_report_what_they_applied() {
        let mut list = test_list();

        let added = list.add(" Milk ");
        assert!(matches!(added.as_slice(), [ProductListEvent::ProductAdded(e)] if e.name == "Milk"));
        assert!(list.add("   ").is_empty());

        let milk = list.list()[0].id_typed();
        let renamed = list.update(milk, "Oat milk");
        assert!(matches!(renamed.as_slice(), [ProductListEvent::ProductRenamed(e)] if e.product_id == milk));
        assert!(list.update(milk, "").is_empty());
        assert!(list.update(ProductId::generate(), "Tea").is_empty());

        list.add("Tea");
        let swiped = list.remove_by_indices(&BTreeSet::from([1, 5]));
        assert!(matches!(swiped.as_slice(), [ProductListEvent::ProductsRemoved(e)] if e.product_ids.len() == 1));
        assert!(list.remove_by_indices(&BTreeSet::from([4])).is_empty());

        let removed = list.remove_by_identity(milk);
        assert!(matches!(removed.as_slice(), [ProductListEvent::ProductRemoved(e)] if e.product_id == milk));
        assert!(list.remove_by_identity(milk).is_empty());
        assert!(list.is_empty());
    }

    #[test]
    fn remove_by_indices_with_empty_set_is_a_no_op() {
        let mut list = list_of(&["A", "B"]);
        let before = list.clone();

        list.remove_by_indices(&BTreeSet::new());

        assert_eq!(list, before);
    }

    #[test]
    fn remove_by_indices_skips_out_of_range_positions() {
        let mut list = list_of(&["A", "B"]);

        list.remove_by_indices(&BTreeSet::from([1, 7]));

        assert_eq!(names(&list), vec!["A"]);
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let list = list_of(&["A"]);
        let before = list.clone();

        let events = list
            .handle(&ProductListCommand::AddProduct(AddProduct {
                product_id: ProductId::generate(),
                name: "B".to_string(),
                occurred_at: test_time(),
            }))
            .unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(list, before);
    }

    #[test]
    fn events_carry_stable_types() {
        let mut list = test_list();
        let product_id = ProductId::generate();
        let events = list.execute(&ProductListCommand::AddProduct(AddProduct {
            product_id,
            name: " Tea ".to_string(),
            occurred_at: test_time(),
        }));

        match events.as_slice() {
            [ProductListEvent::ProductAdded(e)] => {
                assert_eq!(e.product_id, product_id);
                assert_eq!(e.name, "Tea");
            }
            other => panic!("Expected one ProductAdded event, got {other:?}"),
        }
        assert_eq!(events[0].event_type(), "products.list.product_added");
        assert_eq!(events[0].version(), 1);
    }

    #[test]
    fn apply_is_deterministic() {
        let a = ProductId::generate();
        let time = test_time();
        let events = vec![
            ProductListEvent::ProductAdded(ProductAdded {
                product_id: a,
                name: "A".to_string(),
                occurred_at: time,
            }),
            ProductListEvent::ProductRenamed(ProductRenamed {
                product_id: a,
                name: "Apples".to_string(),
                occurred_at: time,
            }),
            ProductListEvent::ProductRemoved(ProductRemoved {
                product_id: a,
                occurred_at: time,
            }),
        ];

        let id = ProductListId::new(AggregateId::new());
        let mut first = ProductList::empty(id);
        let mut second = ProductList::empty(id);
        for event in &events {
            first.apply(event);
            second.apply(event);
        }

        assert_eq!(first, second);
        assert!(first.is_empty());
        assert_eq!(first.version(), 3);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn name_strategy() -> impl Strategy<Value = String> {
            ("[ \t]{0,3}", "[A-Za-z][A-Za-z0-9 ]{0,20}", "[ \t\n]{0,3}")
                .prop_map(|(lead, body, tail)| format!("{lead}{body}{tail}"))
        }

        fn blank_strategy() -> impl Strategy<Value = String> {
            "[ \t\r\n]{0,6}"
        }

        fn list_and_indices() -> impl Strategy<Value = (Vec<String>, BTreeSet<usize>)> {
            prop::collection::vec(name_strategy(), 1..20).prop_flat_map(|items| {
                let len = items.len();
                (Just(items), prop::collection::btree_set(0..len, 0..=len))
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: a non-blank add grows the list by one, trimmed, at the end.
            #[test]
            fn add_appends_trimmed(existing in prop::collection::vec(name_strategy(), 0..10), raw in name_strategy()) {
                let mut list = test_list();
                for item in &existing {
                    list.add(item);
                }
                let before = list.len();

                list.add(&raw);

                prop_assert_eq!(list.len(), before + 1);
                prop_assert_eq!(list.list().last().map(Product::name), Some(raw.trim()));
            }

            /// Property: a blank add changes nothing.
            #[test]
            fn blank_add_is_a_no_op(existing in prop::collection::vec(name_strategy(), 0..10), raw in blank_strategy()) {
                let mut list = test_list();
                for item in &existing {
                    list.add(item);
                }
                let before = list.clone();

                list.add(&raw);

                prop_assert_eq!(&list, &before);
            }

            /// Property: unknown ids never change the list.
            #[test]
            fn unknown_id_is_ignored(existing in prop::collection::vec(name_strategy(), 0..10), raw in name_strategy()) {
                let mut list = test_list();
                for item in &existing {
                    list.add(item);
                }
                let before = list.clone();
                let stranger = ProductId::generate();

                list.update(stranger, &raw);
                list.remove_by_identity(stranger);

                prop_assert_eq!(&list, &before);
            }

            /// Property: renaming touches exactly one product.
            #[test]
            fn update_touches_only_target(
                existing in prop::collection::vec(name_strategy(), 1..10),
                pick in any::<prop::sample::Index>(),
                raw in name_strategy()
            ) {
                let mut list = test_list();
                for item in &existing {
                    list.add(item);
                }
                let before = list.clone();
                let target = pick.index(list.len());
                let target_id = list.list()[target].id_typed();

                list.update(target_id, &raw);

                prop_assert_eq!(list.len(), before.len());
                for (i, (after, prior)) in list.list().iter().zip(before.list()).enumerate() {
                    prop_assert_eq!(after.id_typed(), prior.id_typed());
                    if i == target {
                        prop_assert_eq!(after.name(), raw.trim());
                    } else {
                        prop_assert_eq!(after.name(), prior.name());
                    }
                }
            }

            /// Property: removal by identity drops exactly that product.
            #[test]
            fn remove_by_identity_drops_one(
                existing in prop::collection::vec(name_strategy(), 1..10),
                pick in any::<prop::sample::Index>()
            ) {
                let mut list = test_list();
                for item in &existing {
                    list.add(item);
                }
                let before = list.len();
                let target_id = list.list()[pick.index(before)].id_typed();

                list.remove_by_identity(target_id);

                prop_assert_eq!(list.len(), before - 1);
                prop_assert!(list.get(target_id).is_none());
            }

            /// Property: index removal keeps exactly the unselected items, in order.
            #[test]
            fn remove_by_indices_keeps_the_rest((items, indices) in list_and_indices()) {
                let mut list = test_list();
                for item in &items {
                    list.add(item);
                }
                let expected: Vec<ProductId> = list
                    .list()
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !indices.contains(i))
                    .map(|(_, p)| p.id_typed())
                    .collect();

                list.remove_by_indices(&indices);

                let actual: Vec<ProductId> = list.list().iter().map(Product::id_typed).collect();
                prop_assert_eq!(list.len(), items.len() - indices.len());
                prop_assert_eq!(actual, expected);
            }
        }
    }
}
