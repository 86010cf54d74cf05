//! Filter composition.
//!
//! A `FilterSpec` is a base predicate plus an ordered list of optional
//! predicates, all combined with AND. Optional predicates are only added
//! when their input value is present, so an unset filter never narrows
//! the result set.

use std::fmt;

/// Boxed predicate over a record.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

// == Filter Spec ==
pub struct FilterSpec<T> {
    base: Predicate<T>,
    optional: Vec<Predicate<T>>,
}

impl<T> FilterSpec<T> {
    /// Creates a spec with only the base predicate.
    pub fn new(base: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            base: Box::new(base),
            optional: Vec::new(),
        }
    }

    /// Spec that admits every record.
    pub fn all() -> Self {
        Self::new(|_| true)
    }

    // == Optional ==
    /// Adds `predicate` only when `value` is `Some`.
    ///
    /// The value is moved into the predicate, so callers can pass owned
    /// request fields straight through.
    pub fn optional<V>(
        mut self,
        value: Option<V>,
        predicate: impl Fn(&T, &V) -> bool + Send + Sync + 'static,
    ) -> Self
    where
        V: Send + Sync + 'static,
    {
        if let Some(value) = value {
            self.optional
                .push(Box::new(move |record| predicate(record, &value)));
        }
        self
    }

    /// Adds an unconditional predicate.
    pub fn always(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.optional.push(Box::new(predicate));
        self
    }

    /// Number of optional predicates that were actually applied.
    pub fn active_filters(&self) -> usize {
        self.optional.len()
    }

    // == Matches ==
    /// `base AND f1 AND f2 AND ...`
    pub fn matches(&self, record: &T) -> bool {
        (self.base)(record) && self.optional.iter().all(|predicate| predicate(record))
    }
}

impl<T> fmt::Debug for FilterSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSpec")
            .field("active_filters", &self.optional.len())
            .finish()
    }
}

// == Apply Filters ==
/// Narrows `records` to those matching `spec`, preserving input order.
pub fn apply_filters<'r, T: 'r>(
    records: impl IntoIterator<Item = &'r T>,
    spec: &FilterSpec<T>,
) -> Vec<&'r T> {
    records
        .into_iter()
        .filter(|record| spec.matches(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        name: &'static str,
        owner: &'static str,
        price: i64,
        deleted: bool,
    }

    fn items() -> Vec<Item> {
        vec![
            Item { name: "a", owner: "alice", price: 10, deleted: false },
            Item { name: "b", owner: "bob", price: 20, deleted: false },
            Item { name: "c", owner: "alice", price: 30, deleted: true },
            Item { name: "d", owner: "alice", price: 40, deleted: false },
        ]
    }

    fn live() -> FilterSpec<Item> {
        FilterSpec::new(|item: &Item| !item.deleted)
    }

    #[test]
    fn test_base_filter_excludes_deleted() {
        let data = items();
        let result = apply_filters(&data, &live());
        let names: Vec<_> = result.iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["a", "b", "d"]);
    }

    #[test]
    fn test_unset_optional_adds_no_predicate() {
        let spec = live()
            .optional(None::<String>, |item: &Item, owner| item.owner == owner)
            .optional(Some(15i64), |item: &Item, min| item.price >= *min);

        assert_eq!(spec.active_filters(), 1);
    }

    #[test]
    fn test_optional_filters_are_conjunctive() {
        let data = items();
        let spec = live()
            .optional(Some("alice".to_string()), |item: &Item, owner| item.owner == owner)
            .optional(Some(15i64), |item: &Item, min| item.price >= *min);

        let result = apply_filters(&data, &spec);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "d");
    }

    #[test]
    fn test_unset_filter_equals_removed_filter() {
        let data = items();
        let with_unset = live()
            .optional(None::<i64>, |item: &Item, min| item.price >= *min)
            .optional(Some("alice".to_string()), |item: &Item, owner| item.owner == owner);
        let without = live().optional(Some("alice".to_string()), |item: &Item, owner| {
            item.owner == owner
        });

        assert_eq!(apply_filters(&data, &with_unset), apply_filters(&data, &without));
    }

    #[test]
    fn test_always_predicate() {
        let data = items();
        let spec = FilterSpec::all().always(|item: &Item| item.price > 25);
        assert_eq!(apply_filters(&data, &spec).len(), 2);
    }
}
