//! Query plans: filters, ordering and paging composed into one pass.

use super::{
    apply_filters, apply_paging, apply_sorting, FilterSpec, PageRequest, Paginated, SortMap,
    SortRequest,
};

// == Query Plan ==
/// A filtered, sorted, paged read over a collection of `T`.
///
/// Plans are built per request and never mutate the sort map they borrow.
#[derive(Debug)]
pub struct QueryPlan<'m, T> {
    filter: FilterSpec<T>,
    sort: SortRequest,
    sort_map: &'m SortMap<T>,
    page: PageRequest,
}

impl<'m, T> QueryPlan<'m, T> {
    pub fn new(filter: FilterSpec<T>, sort_map: &'m SortMap<T>) -> Self {
        Self {
            filter,
            sort: SortRequest::default(),
            sort_map,
            page: PageRequest::default(),
        }
    }

    pub fn sorted(mut self, sort: SortRequest) -> Self {
        self.sort = sort;
        self
    }

    pub fn paged(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    pub fn filter(&self) -> &FilterSpec<T> {
        &self.filter
    }

    pub fn page(&self) -> PageRequest {
        self.page
    }

    // == Count ==
    /// Number of records matching the filters, ignoring paging.
    pub fn count<'r>(&self, records: impl IntoIterator<Item = &'r T>) -> u64
    where
        T: 'r,
    {
        records
            .into_iter()
            .filter(|record| self.filter.matches(record))
            .count() as u64
    }

    // == Execute ==
    /// Runs the plan and clones only the records on the requested page.
    ///
    /// `total_count` is taken after filtering and before paging.
    pub fn execute<'r>(&self, records: impl IntoIterator<Item = &'r T>) -> Paginated<T>
    where
        T: Clone + 'r,
    {
        let matching = apply_filters(records, &self.filter);
        let total_count = matching.len() as u64;

        let ordered = apply_sorting(matching, &self.sort, self.sort_map);
        let items = apply_paging(ordered, &self.page)
            .into_iter()
            .cloned()
            .collect();

        Paginated::new(items, total_count, self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{SortDirection, SortValue};

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        group: &'static str,
        deleted: bool,
    }

    fn rows(n: i64) -> Vec<Row> {
        (1..=n)
            .map(|id| Row {
                id,
                group: if id % 2 == 0 { "even" } else { "odd" },
                deleted: id % 10 == 0,
            })
            .collect()
    }

    fn sort_map() -> SortMap<Row> {
        SortMap::new("id", |row: &Row| SortValue::Int(row.id))
    }

    fn live() -> FilterSpec<Row> {
        FilterSpec::new(|row: &Row| !row.deleted)
    }

    #[test]
    fn test_count_precedes_paging() {
        let data: Vec<Row> = (1..=25)
            .map(|id| Row { id, group: "x", deleted: false })
            .collect();
        let map = sort_map();
        let plan = QueryPlan::new(live(), &map).paged(PageRequest::new(2, 10));

        let result = plan.execute(&data);
        assert_eq!(result.total_count, 25);
        assert_eq!(result.items.len(), 10);
    }

    #[test]
    fn test_page_beyond_end_keeps_total() {
        let data = rows(30);
        let map = sort_map();
        let plan = QueryPlan::new(live(), &map).paged(PageRequest::new(9, 10));

        let result = plan.execute(&data);
        assert!(result.items.is_empty());
        assert_eq!(result.total_count, 27);
    }

    #[test]
    fn test_filters_sort_and_page_compose() {
        let data = rows(30);
        let map = sort_map();
        let filter = live().optional(Some("even"), |row: &Row, group| row.group == *group);
        let plan = QueryPlan::new(filter, &map)
            .sorted(SortRequest::new(None, Some(SortDirection::Asc)))
            .paged(PageRequest::new(1, 5));

        let result = plan.execute(&data);
        let ids: Vec<i64> = result.items.iter().map(|row| row.id).collect();
        // 10, 20 and 30 are soft-deleted
        assert_eq!(ids, vec![2, 4, 6, 8, 12]);
        assert_eq!(result.total_count, 12);
        assert_eq!(plan.count(&data), 12);
    }
}
