//! Sorting by named projections.
//!
//! A `SortMap` is built once at startup and shared read-only. Field names are
//! matched case-insensitively; an unknown or missing name falls back to the
//! default projection instead of failing.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

// == Sort Direction ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(AppError::InvalidArgument(format!(
                "unknown sort direction '{}'",
                other
            ))),
        }
    }
}

// == Sort Value ==
/// Value a projection extracts for ordering.
///
/// A projection always yields the same variant, so cross-variant ordering
/// never matters in practice.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    Int(i64),
    Text(String),
    Time(DateTime<Utc>),
    Id(Uuid),
}

impl SortValue {
    /// Text compared without regard to case.
    pub fn text(value: &str) -> Self {
        SortValue::Text(value.to_lowercase())
    }
}

/// Shared projection from a record to its sort value.
pub type Projection<T> = Arc<dyn Fn(&T) -> SortValue + Send + Sync>;

// == Sort Map ==
pub struct SortMap<T> {
    fields: HashMap<String, Projection<T>>,
    default_field: String,
    default: Projection<T>,
    tiebreak: Option<Projection<T>>,
}

impl<T> SortMap<T> {
    /// Creates a map whose fallback ordering is `default_field`.
    ///
    /// The default field is also registered under its own name.
    pub fn new(
        default_field: &str,
        default: impl Fn(&T) -> SortValue + Send + Sync + 'static,
    ) -> Self {
        let default: Projection<T> = Arc::new(default);
        let mut fields = HashMap::new();
        fields.insert(default_field.to_lowercase(), Arc::clone(&default));

        Self {
            fields,
            default_field: default_field.to_string(),
            default,
            tiebreak: None,
        }
    }

    /// Registers a named projection.
    pub fn field(
        mut self,
        name: &str,
        projection: impl Fn(&T) -> SortValue + Send + Sync + 'static,
    ) -> Self {
        self.fields.insert(name.to_lowercase(), Arc::new(projection));
        self
    }

    /// Secondary ascending ordering applied to records whose primary
    /// sort values are equal.
    pub fn tiebreak(mut self, projection: impl Fn(&T) -> SortValue + Send + Sync + 'static) -> Self {
        self.tiebreak = Some(Arc::new(projection));
        self
    }

    pub fn default_field(&self) -> &str {
        &self.default_field
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_lowercase())
    }

    /// Registered field names, sorted.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    // == Resolve ==
    /// Looks up `sort_by` case-insensitively, falling back to the default.
    pub fn resolve(&self, sort_by: Option<&str>) -> &Projection<T> {
        sort_by
            .and_then(|name| self.fields.get(&name.trim().to_lowercase()))
            .unwrap_or(&self.default)
    }
}

impl<T> fmt::Debug for SortMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortMap")
            .field("fields", &self.field_names())
            .field("default_field", &self.default_field)
            .field("tiebreak", &self.tiebreak.is_some())
            .finish()
    }
}

// == Sort Request ==
/// Requested field and direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortRequest {
    pub sort_by: Option<String>,
    pub direction: SortDirection,
}

impl SortRequest {
    pub fn new(sort_by: Option<String>, direction: Option<SortDirection>) -> Self {
        Self {
            sort_by,
            direction: direction.unwrap_or_default(),
        }
    }

    /// Field name as it should appear in a cache key.
    pub fn normalized_field(&self) -> Option<String> {
        self.sort_by.as_ref().map(|field| field.trim().to_lowercase())
    }
}

// == Apply Sorting ==
/// Orders `records` by the projection `request` resolves to in `map`.
pub fn apply_sorting<'r, T>(
    records: Vec<&'r T>,
    request: &SortRequest,
    map: &SortMap<T>,
) -> Vec<&'r T> {
    let projection = map.resolve(request.sort_by.as_deref());

    let mut keyed: Vec<(SortValue, Option<SortValue>, &'r T)> = records
        .into_iter()
        .map(|record| {
            let tie = map.tiebreak.as_ref().map(|tiebreak| tiebreak(record));
            (projection(record), tie, record)
        })
        .collect();

    keyed.sort_by(|(a, a_tie, _), (b, b_tie, _)| {
        request
            .direction
            .apply(a.cmp(b))
            .then_with(|| a_tie.cmp(b_tie))
    });

    keyed.into_iter().map(|(_, _, record)| record).collect()
}
