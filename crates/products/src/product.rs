use serde::{Deserialize, Serialize};

use shoplist_core::{AggregateId, DomainError, Entity};

/// Product identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub AggregateId);

impl ProductId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }

    /// Fresh, process-unique identifier.
    pub fn generate() -> Self {
        Self(AggregateId::new())
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<AggregateId>().map(Self)
    }
}

/// A named entry in the product list.
///
/// `name` is always trimmed and non-empty; the list enforces that before a
/// product is constructed or renamed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
}

impl Product {
    pub(crate) fn new(id: ProductId, name: String) -> Self {
        Self { id, name }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rename(&mut self, name: String) {
        self.name = name;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Trim a raw name, returning `None` when nothing is left.
pub(crate) fn accepted_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_name_trims_surrounding_whitespace() {
        assert_eq!(accepted_name("  Bread \n").as_deref(), Some("Bread"));
        assert_eq!(accepted_name("Green tea").as_deref(), Some("Green tea"));
    }

    #[test]
    fn accepted_name_rejects_blank_input() {
        assert_eq!(accepted_name(""), None);
        assert_eq!(accepted_name(" \t\r\n "), None);
        assert_eq!(accepted_name("\u{3000}"), None);
    }

    #[test]
    fn identity_survives_rename() {
        let id = ProductId::generate();
        let mut product = Product::new(id, "Milk".to_string());

        product.rename("Oat milk".to_string());

        assert_eq!(Entity::id(&product), &id);
        assert_eq!(product.name(), "Oat milk");
    }

    #[test]
    fn product_id_round_trips_through_text() {
        let id = ProductId::generate();
        let parsed: ProductId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
