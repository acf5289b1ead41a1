// Filter-row composition engine: a panel owns an ordered list of rows, each
// row composes one element per FilterKind. Rows and elements communicate
// through mpsc change signals; the panel aggregates and re-emits.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub mod date_range;
pub mod element;
pub mod multi_select;
pub mod panel;
pub mod row;

#[cfg(test)]
mod tests;

pub use panel::FilterPanel;
pub use row::{FilterRow, RowId};

/// Reserved key under which a row records its own position in `data()`.
pub const INDEX_KEY: &str = "index";

/// The fixed set of elements every row is composed of, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::Display)]
pub enum FilterKind {
    DateRange,
    Countries,
    Continents,
    PageNames,
}

impl FilterKind {
    /// Key used in the aggregate payload (matches the backend contract).
    pub fn key(&self) -> &'static str {
        match self {
            FilterKind::DateRange => "dateRange",
            FilterKind::Countries => "countries",
            FilterKind::Continents => "continents",
            FilterKind::PageNames => "pageNames",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterKind::DateRange => "Date Range",
            FilterKind::Countries => "Country",
            FilterKind::Continents => "Continent",
            FilterKind::PageNames => "Page Name",
        }
    }
}

/// Vocabulary template fetched once from the backend; every new row is
/// instantiated from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub countries: Vec<String>,
    pub continents: Vec<String>,
    pub page_names: Vec<String>,
}

/// One row's contribution to the aggregate payload: filter-kind key to the
/// element's current values, plus INDEX_KEY.
pub type RowData = BTreeMap<String, Vec<String>>;
