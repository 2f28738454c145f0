//! Turning currency items into worth when they change hands.
//!
//! An item carrying the [`CURRENCY_BIT`] is never kept in an inventory: when
//! someone picks it up or is given it, its worth is added to theirs and the
//! item is removed from the world.

use std::fmt;

use crate::{Worth, WorthHolder};

/// The item bit marking an item as currency.
pub const CURRENCY_BIT: &str = "currency";

/// Whether a bit list such as `"magic, currency"` contains the currency
/// bit. Matching is by whole keyword and ignores case.
pub fn has_currency_bit(bits: &str) -> bool {
    bits.split(|c: char| c == ',' || c.is_whitespace())
        .any(|bit| bit.eq_ignore_ascii_case(CURRENCY_BIT))
}

/// An item that may be currency.
pub trait CurrencyItem: WorthHolder {
    fn is_currency(&self) -> bool;
}

/// The collaborator that permanently removes a consumed item from the
/// world.
pub trait ItemExtractor<I> {
    fn extract(&mut self, item: I);
}

/// The hook events currency conversion listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// An actor picked an item up.
    Get,
    /// An actor was given an item by someone else.
    Give,
}

impl HookKind {
    pub fn name(self) -> &'static str {
        match self {
            HookKind::Get => "get",
            HookKind::Give => "give",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a hook did with the item it was handed.
#[derive(Debug, PartialEq, Eq)]
pub enum TransferOutcome<I> {
    /// The item was currency: this worth was credited and the item
    /// extracted.
    Converted(Worth),
    /// The item was not currency and is returned untouched.
    NotCurrency(I),
}

impl<I> TransferOutcome<I> {
    pub fn is_converted(&self) -> bool { matches!(self, TransferOutcome::Converted(_)) }

    /// The item, if the hook handed it back.
    pub fn into_item(self) -> Option<I> {
        match self {
            TransferOutcome::Converted(_) => None,
            TransferOutcome::NotCurrency(item) => Some(item),
        }
    }
}

/// Credits `actor` with a picked-up currency item.
pub fn get_currency_hook<A, I, X>(
    actor: &mut A,
    item: I,
    extractor: &mut X,
) -> TransferOutcome<I>
where
    A: WorthHolder + ?Sized,
    I: CurrencyItem,
    X: ItemExtractor<I> + ?Sized,
{
    convert(HookKind::Get, actor, item, extractor)
}

/// Credits `recipient` with a currency item it was given.
pub fn give_currency_hook<A, I, X>(
    recipient: &mut A,
    item: I,
    extractor: &mut X,
) -> TransferOutcome<I>
where
    A: WorthHolder + ?Sized,
    I: CurrencyItem,
    X: ItemExtractor<I> + ?Sized,
{
    convert(HookKind::Give, recipient, item, extractor)
}

fn convert<A, I, X>(
    kind: HookKind,
    holder: &mut A,
    item: I,
    extractor: &mut X,
) -> TransferOutcome<I>
where
    A: WorthHolder + ?Sized,
    I: CurrencyItem,
    X: ItemExtractor<I> + ?Sized,
{
    if !item.is_currency() {
        return TransferOutcome::NotCurrency(item);
    }
    let credited = item.worth().clone();
    let worth = holder.worth() + &credited;
    holder.set_worth(worth);
    tracing::debug!("Currency {} hook credited {}", kind, credited);
    // Extraction comes last so the credit is in place before the item goes.
    extractor.extract(item);
    TransferOutcome::Converted(credited)
}
