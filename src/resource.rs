use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

use crate::forms::EntityForm;

/// A field a list view can be filtered by.
pub trait FilterField: Copy + Eq + Debug + Send + Sync + 'static {
    /// Allow-list, first entry is the default selection.
    const ALL: &'static [Self];

    /// Name as it appears on the wire and in query strings.
    fn name(self) -> &'static str;

    fn label(self) -> &'static str;

    fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }

    fn default_field() -> Self {
        Self::ALL[0]
    }

    /// Unknown names fall back to the default field.
    fn parse_or_default(name: Option<&str>) -> Self {
        name.and_then(Self::parse).unwrap_or_else(Self::default_field)
    }
}

/// Something the list-filter engine can match against.
pub trait Filterable {
    type Field: FilterField;

    /// String form of the value held in `field`.
    fn field_text(&self, field: Self::Field) -> String;
}

/// An entity managed through the console and stored behind the remote API.
pub trait Resource:
    Filterable + Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The entity without its server-assigned id.
    type Draft: Clone + Debug + PartialEq + Serialize + Send + Sync + 'static;

    type Form: EntityForm<Draft = Self::Draft>;

    /// Collection path on the remote API and in the console, e.g. `cars`.
    const PATH: &'static str;

    /// Human readable singular name used in page titles.
    const SINGULAR: &'static str;

    /// Human readable plural name used in page titles.
    const PLURAL: &'static str;

    fn id(&self) -> i64;

    fn to_draft(&self) -> Self::Draft;

    fn from_draft(id: i64, draft: Self::Draft) -> Self;
}
