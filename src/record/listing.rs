//! Combines one page of records with the filtered grand total and the
//! echoed filter into the payload the list pages render.

use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    Error,
    pagination::PaginationConfig,
    record::{
        core::{Record, RecordKind},
        query::{RecordFilter, count_matching_records, get_record_page, sum_matching_amounts},
    },
};

/// A bounded, ordered slice of a filtered record collection, plus
/// navigation metadata. Derived per request, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPage {
    /// The records on this page, ordered by id ascending.
    pub items: Vec<Record>,
    /// The 1-based page number being displayed.
    pub current_page: u64,
    /// The fixed number of records per page.
    pub per_page: u64,
    /// The 1-based offset of the first item on this page, or `None`
    /// when the page is empty.
    pub from: Option<u64>,
    /// How many pages the filtered collection spans. At least 1 so an
    /// empty collection still renders a pagination control.
    pub page_count: u64,
}

/// Everything a list page needs: the page, the grand total over ALL
/// matching records, and the filter echoed exactly as supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordListing {
    /// The requested page of records.
    pub page: RecordPage,
    /// The sum of amounts over every record matching the filter,
    /// independent of pagination.
    pub total: i64,
    /// The filter as the caller supplied it, for pre-populating the
    /// search control and regenerating links.
    pub filter: RecordFilter,
}

/// The query parameters accepted by both list pages.
///
/// `page` arrives as a raw string so malformed values can degrade to
/// page 1 instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// The search term, kept exactly as supplied.
    pub search: Option<String>,
    /// The raw page number.
    pub page: Option<String>,
}

/// Parse the raw `page` query parameter. Malformed or non-positive
/// values degrade to page 1; they never fail the request.
pub fn parse_page_number(raw_page: Option<&str>) -> u64 {
    raw_page
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

/// Query one page of records and the filtered total in a single step.
///
/// The total is computed with the same filter as the page, applied
/// before pagination, so it covers every matching record and not just
/// the current page.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn list_records(
    kind: RecordKind,
    filter: &RecordFilter,
    page_number: u64,
    pagination_config: &PaginationConfig,
    connection: &Connection,
) -> Result<RecordListing, Error> {
    let per_page = pagination_config.default_page_size;

    let items = get_record_page(kind, filter, page_number, per_page, connection)?;
    let matching_count = count_matching_records(kind, filter, connection)?;
    let total = sum_matching_amounts(kind, filter, connection)?;

    let page_count = matching_count.div_ceil(per_page).max(1);
    let from = (!items.is_empty()).then(|| (page_number - 1) * per_page + 1);

    Ok(RecordListing {
        page: RecordPage {
            items,
            current_page: page_number,
            per_page,
            from,
            page_count,
        },
        total,
        filter: filter.clone(),
    })
}

#[cfg(test)]
mod parse_page_number_tests {
    use super::parse_page_number;

    #[test]
    fn parses_positive_page() {
        assert_eq!(parse_page_number(Some("3")), 3);
    }

    #[test]
    fn defaults_to_first_page_when_absent() {
        assert_eq!(parse_page_number(None), 1);
    }

    #[test]
    fn malformed_values_degrade_to_first_page() {
        for raw in ["abc", "", "-2", "1.5", "0"] {
            assert_eq!(parse_page_number(Some(raw)), 1, "raw page {raw:?}");
        }
    }
}

#[cfg(test)]
mod list_records_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
        pagination::PaginationConfig,
        record::core::{RecordDraft, RecordKind, create_record},
        record::query::RecordFilter,
    };

    use super::list_records;

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_user(PasswordHash::new_unchecked("hunter2"), &conn).unwrap();
        conn
    }

    fn seed(conn: &Connection, count: usize) {
        for i in 1..=count {
            create_record(
                RecordKind::Expense,
                RecordDraft {
                    description: format!("Belanja {i}"),
                    amount: 1_000,
                    date: date!(2024 - 03 - 01),
                },
                UserID::new(1),
                conn,
            )
            .unwrap();
        }
    }

    #[test]
    fn combines_page_total_and_filter() {
        let conn = get_test_connection();
        seed(&conn, 25);
        let filter = RecordFilter::new(Some("belanja".to_owned()));

        let listing = list_records(
            RecordKind::Expense,
            &filter,
            2,
            &PaginationConfig::default(),
            &conn,
        )
        .unwrap();

        assert_eq!(listing.page.items.len(), 10);
        assert_eq!(listing.page.current_page, 2);
        assert_eq!(listing.page.per_page, 10);
        assert_eq!(listing.page.from, Some(11));
        assert_eq!(listing.page.page_count, 3);
        // The total covers all 25 matching records, not only this page.
        assert_eq!(listing.total, 25_000);
        assert_eq!(listing.filter, filter);
    }

    #[test]
    fn page_past_the_end_is_empty_but_not_an_error() {
        let conn = get_test_connection();
        seed(&conn, 25);

        let listing = list_records(
            RecordKind::Expense,
            &RecordFilter::default(),
            4,
            &PaginationConfig::default(),
            &conn,
        )
        .unwrap();

        assert!(listing.page.items.is_empty());
        assert_eq!(listing.page.from, None);
        assert_eq!(listing.page.page_count, 3);
        assert_eq!(listing.total, 25_000);
    }

    #[test]
    fn empty_collection_yields_one_empty_page_and_zero_total() {
        let conn = get_test_connection();

        let listing = list_records(
            RecordKind::Income,
            &RecordFilter::default(),
            1,
            &PaginationConfig::default(),
            &conn,
        )
        .unwrap();

        assert!(listing.page.items.is_empty());
        assert_eq!(listing.page.page_count, 1);
        assert_eq!(listing.total, 0);
    }

    #[test]
    fn filter_is_echoed_even_when_absent() {
        let conn = get_test_connection();

        let listing = list_records(
            RecordKind::Expense,
            &RecordFilter::default(),
            1,
            &PaginationConfig::default(),
            &conn,
        )
        .unwrap();

        assert_eq!(listing.filter.search, None);
    }
}
