//! End-to-end tests of currency items changing hands.

use std::collections::HashMap;

use currency_worth::{
    CurrencyData, CurrencyItem, CurrencyRegistry, ItemExtractor, TransferOutcome, Worth,
    WorthHolder, get_currency_hook, give_currency_hook, has_currency_bit,
};

#[derive(Debug, Default)]
struct Character {
    currency: CurrencyData,
    inventory: Vec<Item>,
}

impl WorthHolder for Character {
    fn currency_data(&self) -> &CurrencyData { &self.currency }
    fn currency_data_mut(&mut self) -> &mut CurrencyData { &mut self.currency }
}

#[derive(Debug, PartialEq, Eq)]
struct Item {
    id: u32,
    bits: String,
    currency: CurrencyData,
}

impl WorthHolder for Item {
    fn currency_data(&self) -> &CurrencyData { &self.currency }
    fn currency_data_mut(&mut self) -> &mut CurrencyData { &mut self.currency }
}

impl CurrencyItem for Item {
    fn is_currency(&self) -> bool { has_currency_bit(&self.bits) }
}

/// A room full of items. Extracted items are gone for good.
#[derive(Default)]
struct World {
    floor: HashMap<u32, Item>,
    extracted: Vec<u32>,
}

impl World {
    fn drop_item(&mut self, item: Item) { self.floor.insert(item.id, item); }

    fn exists(&self, id: u32) -> bool {
        self.floor.contains_key(&id) || !self.extracted.contains(&id)
    }

    /// Moves an item from the floor to `actor`, running the get hook.
    fn pick_up(&mut self, actor: &mut Character, id: u32) -> bool {
        let Some(item) = self.floor.remove(&id) else {
            return false;
        };
        if let Some(item) = get_currency_hook(actor, item, self).into_item() {
            actor.inventory.push(item);
        }
        true
    }
}

impl ItemExtractor<Item> for World {
    fn extract(&mut self, item: Item) { self.extracted.push(item.id); }
}

fn item(registry: &CurrencyRegistry, id: u32, bits: &str, counts: &[(&str, i64)]) -> Item {
    Item {
        id,
        bits: bits.to_string(),
        currency: CurrencyData::new(Worth::from_counts(registry, counts.iter().copied())),
    }
}

#[test]
fn pickup_converts_currency_item() {
    let registry = CurrencyRegistry::standard();
    let mut world = World::default();
    let mut actor = Character::default();
    world.drop_item(item(&registry, 1, "currency", &[("gold", 3)]));

    assert!(world.pick_up(&mut actor, 1));

    assert_eq!(actor.worth(), &Worth::from_counts(&registry, [("gold", 3)]));
    assert!(actor.inventory.is_empty());
    assert!(!world.exists(1));
    assert_eq!(world.extracted, [1]);

    // Gone from the world, so it cannot be converted twice.
    assert!(!world.pick_up(&mut actor, 1));
    assert_eq!(actor.get_amount(&registry, "gold"), 3);
}

#[test]
fn pickup_ignores_ordinary_item() {
    let registry = CurrencyRegistry::standard();
    let mut world = World::default();
    let mut actor = Character::default();
    world.drop_item(item(&registry, 2, "magic", &[("gold", 3)]));

    assert!(world.pick_up(&mut actor, 2));

    assert!(actor.worth().is_empty());
    assert_eq!(actor.inventory.len(), 1);
    assert_eq!(actor.inventory[0].get_amount(&registry, "gold"), 3);
    assert!(world.extracted.is_empty());
    assert!(world.exists(2));
}

#[test]
fn pickup_adds_without_normalizing() {
    let registry = CurrencyRegistry::standard();
    let mut world = World::default();
    let mut actor = Character::default();
    actor.set_amount(&registry, "silver", 4);
    world.drop_item(item(&registry, 3, "cursed currency", &[("gold", 1), ("silver", 1)]));

    world.pick_up(&mut actor, 3);

    assert_eq!(
        actor.worth(),
        &Worth::from_counts(&registry, [("gold", 1), ("silver", 5)])
    );
    assert_eq!(actor.get_amount(&registry, "money"), 150);
}

#[test]
fn give_credits_recipient() {
    let registry = CurrencyRegistry::standard();
    let mut world = World::default();
    let mut recipient = Character::default();
    recipient.set_amount(&registry, "questpoints", 2);

    let token = item(&registry, 4, "currency", &[("questpoints", 5)]);
    let outcome = give_currency_hook(&mut recipient, token, &mut world);

    assert_eq!(
        outcome,
        TransferOutcome::Converted(Worth::from_counts(&registry, [("questpoints", 5)]))
    );
    assert_eq!(recipient.get_amount(&registry, "questpoints"), 7);
    assert_eq!(world.extracted, [4]);
}

#[test]
fn give_returns_ordinary_item() {
    let registry = CurrencyRegistry::standard();
    let mut world = World::default();
    let mut recipient = Character::default();

    let sword = item(&registry, 5, "", &[("gold", 10)]);
    let outcome = give_currency_hook(&mut recipient, sword, &mut world);

    assert!(!outcome.is_converted());
    let sword = outcome.into_item().unwrap();
    assert_eq!(sword.id, 5);
    assert!(recipient.worth().is_empty());
    assert!(world.extracted.is_empty());
}
