//! Filter Sets
//!
//! Normalized, comparable representation of the active query: free-text search plus
//! structured fields (owner, date range, resource-specific extras). Fields seeded from
//! the caller's role are locked: `reset` restores them and `update` refuses to touch them.

pub mod query;
pub mod role;

pub use query::PageQuery;
pub use role::{Capability, Role};

use crate::error::ApiError;
use crate::types::Identity;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::fmt;

/// Parameter names an extra field may not use, compared case-insensitively.
const RESERVED_PARAMS: &[&str] = &[
    "page",
    "limit",
    "search",
    "ownerId",
    "owner_id",
    "owner",
    "startDate",
    "start_date",
    "endDate",
    "end_date",
];

/// Structured filter field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterField {
    OwnerId,
    StartDate,
    EndDate,
    /// Resource-specific field passed through as a plain query parameter
    Other(String),
}

impl FilterField {
    /// Parse a field name as the rendering layer spells it.
    pub fn parse(name: &str) -> Self {
        match name.trim() {
            "ownerId" | "owner_id" | "owner" => FilterField::OwnerId,
            "startDate" | "start_date" => FilterField::StartDate,
            "endDate" | "end_date" => FilterField::EndDate,
            other => FilterField::Other(other.to_string()),
        }
    }

    /// Whether an `Other` name would collide with a parameter the controller sends
    /// itself (`page`, `limit`, `search`) or with a built-in field in another case.
    pub fn is_reserved(&self) -> bool {
        match self {
            FilterField::Other(name) => {
                let name = name.trim();
                name.is_empty()
                    || RESERVED_PARAMS
                        .iter()
                        .any(|reserved| reserved.eq_ignore_ascii_case(name))
            }
            _ => false,
        }
    }

    /// Query parameter name on the wire.
    pub fn name(&self) -> &str {
        match self {
            FilterField::OwnerId => "ownerId",
            FilterField::StartDate => "startDate",
            FilterField::EndDate => "endDate",
            FilterField::Other(name) => name,
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for FilterField {
    fn from(name: &str) -> Self {
        FilterField::parse(name)
    }
}

/// Value of a structured filter field
///
/// Dates are held as calendar days, so two values set from different times on the
/// same day compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Date(NaiveDate),
    Identity(Identity),
}

impl FilterValue {
    fn as_param(&self) -> String {
        match self {
            FilterValue::Text(text) => text.clone(),
            FilterValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            FilterValue::Identity(id) => id.to_string(),
        }
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(date: NaiveDate) -> Self {
        FilterValue::Date(date)
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(at: NaiveDateTime) -> Self {
        FilterValue::Date(at.date())
    }
}

impl From<Identity> for FilterValue {
    fn from(id: Identity) -> Self {
        FilterValue::Identity(id)
    }
}

impl From<&str> for FilterValue {
    fn from(text: &str) -> Self {
        FilterValue::Text(text.to_string())
    }
}

/// Active query of one collection view
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSet {
    search: String,
    fields: BTreeMap<FilterField, FilterValue>,
    /// Role-seeded values; always mirrored in `fields`
    locked: BTreeMap<FilterField, FilterValue>,
}

impl FilterSet {
    /// Build the initial filters for a caller.
    ///
    /// Privileged roles leave the owner unset (all owners). Restricted roles get
    /// `ownerId = identity`, locked.
    pub fn create_default(role: Role, identity: &Identity) -> Self {
        let mut filters = FilterSet::default();
        if !role.is_privileged() {
            let seeded = FilterValue::Identity(identity.clone());
            filters.fields.insert(FilterField::OwnerId, seeded.clone());
            filters.locked.insert(FilterField::OwnerId, seeded);
        }
        filters
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn get(&self, field: &FilterField) -> Option<&FilterValue> {
        self.fields.get(field)
    }

    pub fn owner_id(&self) -> Option<&Identity> {
        match self.fields.get(&FilterField::OwnerId) {
            Some(FilterValue::Identity(id)) => Some(id),
            _ => None,
        }
    }

    pub fn is_locked(&self, field: &FilterField) -> bool {
        self.locked.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&FilterField, &FilterValue)> {
        self.fields.iter()
    }

    /// Set a structured field.
    ///
    /// Fails with [`ApiError::InvalidField`] if the field is locked, names a reserved
    /// query parameter, or the value has the wrong shape for it; the filter set is
    /// unchanged on failure.
    pub fn update(&mut self, field: FilterField, value: FilterValue) -> Result<(), ApiError> {
        if field.is_reserved() {
            return Err(ApiError::invalid_field(field.name(), "reserved query parameter"));
        }
        self.ensure_unlocked(&field)?;
        let value = coerce(&field, value)?;
        self.fields.insert(field, value);
        Ok(())
    }

    /// Remove an unlocked structured field. Returns whether a value was present.
    pub fn clear(&mut self, field: &FilterField) -> Result<bool, ApiError> {
        self.ensure_unlocked(field)?;
        Ok(self.fields.remove(field).is_some())
    }

    /// Clear search and every unlocked field, restoring locked fields to their seed.
    pub fn reset(&mut self) {
        self.search.clear();
        self.fields = self.locked.clone();
    }

    /// Query for one page under these filters.
    pub fn to_query(&self, page: u32, limit: u32) -> PageQuery {
        let mut query = PageQuery::new(page, limit);
        query.search = Some(self.search.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        for (field, value) in &self.fields {
            match (field, value) {
                (FilterField::OwnerId, FilterValue::Identity(id)) => {
                    query.owner_id = Some(id.clone());
                }
                (FilterField::StartDate, FilterValue::Date(date)) => {
                    query.start_date = Some(query::start_of_day(*date));
                }
                (FilterField::EndDate, FilterValue::Date(date)) => {
                    query.end_date = Some(query::end_of_day(*date));
                }
                (FilterField::Other(name), value) => {
                    query.extra.insert(name.clone(), value.as_param());
                }
                _ => {}
            }
        }

        query
    }

    fn ensure_unlocked(&self, field: &FilterField) -> Result<(), ApiError> {
        if self.is_locked(field) {
            return Err(ApiError::invalid_field(
                field.name(),
                "field is locked by the caller's role",
            ));
        }
        Ok(())
    }
}

fn coerce(field: &FilterField, value: FilterValue) -> Result<FilterValue, ApiError> {
    match (field, value) {
        (FilterField::OwnerId, FilterValue::Identity(id)) => Ok(FilterValue::Identity(id)),
        (FilterField::OwnerId, FilterValue::Text(text)) if !text.trim().is_empty() => {
            Ok(FilterValue::Identity(Identity::new(text.trim())))
        }
        (FilterField::OwnerId, _) => Err(ApiError::invalid_field(
            field.name(),
            "expected an owner identity",
        )),
        (FilterField::StartDate | FilterField::EndDate, FilterValue::Date(date)) => {
            Ok(FilterValue::Date(date))
        }
        (FilterField::StartDate | FilterField::EndDate, FilterValue::Text(text)) => {
            NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .map(FilterValue::Date)
                .map_err(|e| ApiError::invalid_field(field.name(), format!("expected a date: {}", e)))
        }
        (FilterField::StartDate | FilterField::EndDate, FilterValue::Identity(_)) => Err(
            ApiError::invalid_field(field.name(), "expected a calendar date"),
        ),
        (FilterField::Other(_), value) => Ok(value),
    }
}
