//! Paging and ordering over in-memory sequences.
//!
//! Raw query parameters never fail: out-of-range numbers are clamped, unknown
//! columns fall back to the key's default, and anything other than `desc`
//! sorts ascending.

use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;
use strum::Display;
use utoipa::IntoParams;

pub const DEFAULT_PAGE_NUMBER: u64 = 1;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive `desc`; anything else, including absence, is ascending
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// A closed table of sortable columns for one record type.
pub trait SortKey: Copy + Send + Sync + 'static {
    type Record;

    /// Accepted `orderBy` values, matched case-insensitively
    const COLUMNS: &'static [(&'static str, Self)];

    /// Key used when `orderBy` is absent or unknown
    const DEFAULT: Self;

    fn compare(self, a: &Self::Record, b: &Self::Record) -> Ordering;

    /// Secondary ordering on the record id, keeps equal keys deterministic
    fn tie_breaker(a: &Self::Record, b: &Self::Record) -> Ordering;

    fn from_column(raw: Option<&str>) -> Self {
        raw.and_then(|raw| {
            Self::COLUMNS
                .iter()
                .find(|(column, _)| column.eq_ignore_ascii_case(raw))
                .map(|(_, key)| *key)
        })
        .unwrap_or(Self::DEFAULT)
    }

    fn column(self) -> &'static str
    where
        Self: PartialEq,
    {
        Self::COLUMNS
            .iter()
            .find(|(_, key)| *key == self)
            .map(|(column, _)| *column)
            .unwrap_or("")
    }
}

/// Resolved ordering: a key plus a direction applied to key and tie-breaker alike
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<K> {
    pub key: K,
    pub direction: SortDirection,
}

impl<K: SortKey> Sort<K> {
    pub fn new(key: K, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    pub fn parse(order_by: Option<&str>, order_direction: Option<&str>) -> Self {
        Self::new(K::from_column(order_by), SortDirection::parse(order_direction))
    }

    pub fn compare(&self, a: &K::Record, b: &K::Record) -> Ordering {
        self.direction.apply(
            self.key
                .compare(a, b)
                .then_with(|| K::tie_breaker(a, b)),
        )
    }
}

impl<K: SortKey> Default for Sort<K> {
    fn default() -> Self {
        Self::new(K::DEFAULT, SortDirection::Asc)
    }
}

/// Effective page after clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page_number: u64,
    pub page_size: u64,
}

impl PageWindow {
    /// `page_number < 1` becomes 1; `page_size` outside `[1, MAX_PAGE_SIZE]` becomes the default
    pub fn new(page_number: Option<i64>, page_size: Option<i64>) -> Self {
        let page_number = page_number
            .filter(|n| *n >= 1)
            .map_or(DEFAULT_PAGE_NUMBER, |n| n as u64);

        let page_size = page_size
            .filter(|n| (1..=MAX_PAGE_SIZE as i64).contains(n))
            .map_or(DEFAULT_PAGE_SIZE, |n| n as u64);

        Self {
            page_number,
            page_size,
        }
    }

    pub fn skip(&self) -> u64 {
        (self.page_number - 1).saturating_mul(self.page_size)
    }

    pub fn take(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Listing query string. Non-numeric page values are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    /// 1-based page number (default 1)
    #[serde(default, deserialize_with = "lenient_number")]
    #[param(value_type = Option<i64>)]
    pub page_number: Option<i64>,

    /// Items per page, 1 to 100 (default 10)
    #[serde(default, deserialize_with = "lenient_number")]
    #[param(value_type = Option<i64>)]
    pub page_size: Option<i64>,

    /// Column to sort by
    #[serde(default)]
    pub order_by: Option<String>,

    /// `asc` or `desc`
    #[serde(default)]
    pub order_direction: Option<String>,
}

impl PageRequest {
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.page_number, self.page_size)
    }

    pub fn sort<K: SortKey>(&self) -> Sort<K> {
        Sort::parse(self.order_by.as_deref(), self.order_direction.as_deref())
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse().ok()))
}

/// One page of results plus the metadata reported to the client
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Count of the whole source, before skip/take
    pub total_count: u64,
    pub page_number: u64,
    pub page_size: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, window: PageWindow) -> Self {
        Self {
            items,
            total_count,
            page_number: window.page_number,
            page_size: window.page_size,
        }
    }
}

/// Sort `records`, count them, then cut out `window`.
pub fn paginate<K: SortKey>(
    mut records: Vec<K::Record>,
    sort: Sort<K>,
    window: PageWindow,
) -> Page<K::Record> {
    let total_count = records.len() as u64;
    records.sort_by(|a, b| sort.compare(a, b));

    let skip = usize::try_from(window.skip()).unwrap_or(usize::MAX);
    let take = usize::try_from(window.take()).unwrap_or(usize::MAX);
    let items = records.into_iter().skip(skip).take(take).collect();

    Page::new(items, total_count, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i32,
        label: &'static str,
        weight: i32,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum RowKey {
        Id,
        Label,
        Weight,
    }

    impl SortKey for RowKey {
        type Record = Row;
        const COLUMNS: &'static [(&'static str, Self)] = &[
            ("id", RowKey::Id),
            ("label", RowKey::Label),
            ("weight", RowKey::Weight),
        ];
        const DEFAULT: Self = RowKey::Id;

        fn compare(self, a: &Row, b: &Row) -> Ordering {
            match self {
                RowKey::Id => a.id.cmp(&b.id),
                RowKey::Label => a.label.cmp(b.label),
                RowKey::Weight => a.weight.cmp(&b.weight),
            }
        }

        fn tie_breaker(a: &Row, b: &Row) -> Ordering {
            a.id.cmp(&b.id)
        }
    }

    fn row(id: i32, label: &'static str, weight: i32) -> Row {
        Row { id, label, weight }
    }

    fn rows() -> Vec<Row> {
        vec![
            row(3, "c", 5),
            row(1, "a", 5),
            row(2, "b", 1),
            row(5, "e", 9),
            row(4, "d", 5),
        ]
    }

    fn ids(page: &Page<Row>) -> Vec<i32> {
        page.items.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_page_number_below_one_is_clamped() {
        assert_eq!(PageWindow::new(Some(0), None).page_number, 1);
        assert_eq!(PageWindow::new(Some(-7), None).page_number, 1);
        assert_eq!(PageWindow::new(None, None).page_number, 1);
        assert_eq!(PageWindow::new(Some(3), None).page_number, 3);
    }

    #[test]
    fn test_page_size_out_of_range_falls_back_to_default() {
        assert_eq!(PageWindow::new(None, Some(0)).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(PageWindow::new(None, Some(101)).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(PageWindow::new(None, Some(-1)).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(PageWindow::new(None, Some(1)).page_size, 1);
        assert_eq!(PageWindow::new(None, Some(100)).page_size, 100);
    }

    #[test]
    fn test_huge_page_number_does_not_overflow() {
        let window = PageWindow::new(Some(i64::MAX), Some(100));
        assert_eq!(window.skip(), u64::MAX);

        let page = paginate(rows(), Sort::<RowKey>::default(), window);
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 5);
    }

    #[test]
    fn test_direction_parse_is_case_insensitive() {
        assert_eq!(SortDirection::parse(Some("DESC")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("Desc")), SortDirection::Desc);
        assert_eq!(SortDirection::parse(Some("descending")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(Some("")), SortDirection::Asc);
        assert_eq!(SortDirection::parse(None), SortDirection::Asc);
        assert_eq!(SortDirection::Desc.to_string(), "desc");
    }

    #[test]
    fn test_unknown_column_uses_default_key() {
        assert_eq!(RowKey::from_column(Some("WEIGHT")), RowKey::Weight);
        assert_eq!(RowKey::from_column(Some("bogus")), RowKey::Id);
        assert_eq!(RowKey::from_column(None), RowKey::Id);
        assert_eq!(RowKey::Label.column(), "label");
    }

    #[test]
    fn test_total_count_is_taken_before_window() {
        let page = paginate(
            rows(),
            Sort::<RowKey>::default(),
            PageWindow::new(Some(2), Some(2)),
        );
        assert_eq!(ids(&page), vec![3, 4]);
        assert_eq!(page.total_count, 5);
        assert_eq!(page.page_number, 2);
        assert_eq!(page.page_size, 2);
    }

    #[test]
    fn test_skipping_past_end_yields_empty_page() {
        let page = paginate(
            rows(),
            Sort::<RowKey>::default(),
            PageWindow::new(Some(4), Some(2)),
        );
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 5);
    }

    #[test]
    fn test_pages_reconstruct_sorted_sequence_once() {
        let sort = Sort::new(RowKey::Weight, SortDirection::Desc);
        let full = paginate(rows(), sort, PageWindow::new(Some(1), Some(100)));

        let mut stitched = Vec::new();
        for page_number in 1..=3 {
            let page = paginate(rows(), sort, PageWindow::new(Some(page_number), Some(2)));
            assert!(page.items.len() <= 2);
            stitched.extend(page.items);
        }

        assert_eq!(stitched, full.items);
    }

    #[test]
    fn test_descending_is_exact_reverse_with_ties() {
        let by_weight = |direction| {
            paginate(
                rows(),
                Sort::new(RowKey::Weight, direction),
                PageWindow::default(),
            )
        };
        let asc = by_weight(SortDirection::Asc);
        let desc = by_weight(SortDirection::Desc);

        // weights 5,5,5 tie and are ordered by id
        assert_eq!(ids(&asc), vec![2, 1, 3, 4, 5]);

        let mut reversed = ids(&asc);
        reversed.reverse();
        assert_eq!(ids(&desc), reversed);
    }

    #[test]
    fn test_page_request_parses_lenient_numbers() {
        let request: PageRequest = serde_json::from_value(serde_json::json!({
            "pageNumber": "2",
            "pageSize": "abc",
            "orderBy": "label",
        }))
        .unwrap();

        assert_eq!(request.page_number, Some(2));
        assert_eq!(request.page_size, None);
        assert_eq!(request.window(), PageWindow::new(Some(2), None));
        assert_eq!(request.sort::<RowKey>().key, RowKey::Label);
        assert_eq!(request.sort::<RowKey>().direction, SortDirection::Asc);
    }
}
