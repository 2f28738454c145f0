//! The builder-facing worth editor.
//!
//! This is the session-free half of an interactive menu: it renders the
//! numbered list of denominations, interprets the builder's choice and the
//! value typed for it, and writes prototype text. The surrounding line
//! editor owns the socket and re-prompts on any [`EditError`].

use crate::{CurrencyRegistry, Worth, WorthHolder, set_denomination};

/// A builder's input that the editor cannot act on. Never reaches a
/// [`Worth`]; the session reports it and prompts again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// The option is not the number of a listed denomination.
    #[error("invalid choice: {0}")]
    InvalidChoice(String),

    /// The amount is not a whole number, or is negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// The editor's view of one entity, borrowing the registry it edits
/// against.
pub struct WorthEditor<'a> {
    registry: &'a CurrencyRegistry,
}

impl<'a> WorthEditor<'a> {
    /// Creates an editor over the denominations of `registry`.
    pub fn new(registry: &'a CurrencyRegistry) -> Self { Self { registry } }

    /// One line per denomination, sorted by name and numbered from 1, with
    /// the holder's current count (`None` when it holds none).
    pub fn menu_lines<H: WorthHolder + ?Sized>(&self, holder: &H) -> Vec<String> {
        self.registry
            .sorted_denomination_names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let count = holder.worth().get(name);
                let shown = if count == 0 { "None".to_string() } else { count.to_string() };
                format!("{:2}) {:<12} : [{:>6}]", i + 1, name, shown)
            })
            .collect()
    }

    /// Resolves a menu option to the 1-based number of a denomination.
    pub fn choose(&self, option: &str) -> Result<usize, EditError> {
        let choice: usize = option
            .trim()
            .parse()
            .map_err(|_| EditError::InvalidChoice(option.to_string()))?;
        if choice == 0 || choice > self.registry.len() {
            return Err(EditError::InvalidChoice(option.to_string()));
        }
        Ok(choice)
    }

    /// Sets the chosen denomination on `holder` to the amount in `arg`.
    /// Negative amounts are refused.
    pub fn apply<H: WorthHolder + ?Sized>(
        &self,
        holder: &mut H,
        choice: usize,
        arg: &str,
    ) -> Result<(), EditError> {
        let names = self.registry.sorted_denomination_names();
        let name = choice
            .checked_sub(1)
            .and_then(|index| names.get(index))
            .ok_or_else(|| EditError::InvalidChoice(choice.to_string()))?;
        let amount: i64 = arg
            .trim()
            .parse()
            .map_err(|_| EditError::InvalidAmount(arg.to_string()))?;
        if amount < 0 {
            return Err(EditError::InvalidAmount(arg.to_string()));
        }
        set_denomination(holder, self.registry, name, i128::from(amount));
        Ok(())
    }

    /// The entry shown on the main mob/object editing screen.
    pub fn summary<H: WorthHolder + ?Sized>(&self, holder: &H) -> String {
        let worth = holder.worth();
        if worth.is_empty() {
            "Edit value".to_string()
        } else {
            format!("Edit value {}", worth.display_with(self.registry))
        }
    }
}

/// The prototype statement that recreates `worth`.
pub fn to_prototype(worth: &Worth) -> String {
    format!("me.worth = {}\n", worth.to_json())
}
