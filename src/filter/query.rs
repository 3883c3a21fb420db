//! Page query sent to the fetch collaborator.

use crate::types::Identity;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::BTreeMap;

/// Wire format for date bounds (UTC, millisecond precision).
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Query for one page of a filtered collection
///
/// `search` is present only when non-empty after trimming, `owner_id` only when set.
/// Date bounds are already widened to whole days (inclusive range).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<Identity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            search: None,
            owner_id: None,
            start_date: None,
            end_date: None,
            extra: BTreeMap::new(),
        }
    }

    /// Query-string parameters in transmission order.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(search) = &self.search {
            params.push(("search".to_string(), search.clone()));
        }
        if let Some(owner) = &self.owner_id {
            params.push(("ownerId".to_string(), owner.to_string()));
        }
        if let Some(start) = self.start_date {
            params.push(("startDate".to_string(), start.format(DATE_TIME_FORMAT).to_string()));
        }
        if let Some(end) = self.end_date {
            params.push(("endDate".to_string(), end.format(DATE_TIME_FORMAT).to_string()));
        }
        for (name, value) in &self.extra {
            params.push((name.clone(), value.clone()));
        }
        params
    }
}

pub(crate) fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

pub(crate) fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| start_of_day(date))
}
