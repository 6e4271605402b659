//! The shared filter, paging, and aggregation path over a record table.
//!
//! Every read of a record collection goes through this module: the
//! list pages, the match count behind the pagination links, the grand
//! total, and the unpaginated fetch behind the PDF export. The search
//! predicate exists exactly once ([SEARCH_PREDICATE]) so the list and
//! the export can never disagree about which records match.
//!
//! Results are ordered by `id` ascending, i.e. insertion order. This
//! is the documented ordering contract; repeated identical queries
//! return identical results.

use rusqlite::{Connection, named_params};

use crate::{
    Error,
    record::core::{RECORD_COLUMNS, Record, RecordKind, map_record_row},
};

/// The search filter applied to a record collection before paging or
/// aggregation.
///
/// The search term is kept exactly as the client supplied it,
/// including absence, so pages can echo it back into the search input
/// and into pagination and export links.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// The search term, if the client supplied one.
    pub search: Option<String>,
}

impl RecordFilter {
    /// Create a filter from the raw `search` query parameter.
    pub fn new(search: Option<String>) -> Self {
        Self { search }
    }

    /// The value bound to `:search` in [SEARCH_PREDICATE]. An absent
    /// filter binds the empty string, which the predicate treats as
    /// match-all.
    fn search_param(&self) -> &str {
        self.search.as_deref().unwrap_or("")
    }
}

/// The one WHERE predicate for filtering records by description.
///
/// An empty term matches every record; otherwise the term must appear
/// in the description as a substring. SQLite's LIKE is
/// case-insensitive for ASCII, which gives the case-insensitive
/// matching the search box promises.
///
/// Every query over a record table must embed this fragment rather
/// than writing its own predicate, so that the list pages, the totals,
/// and the export stay consistent with each other.
const SEARCH_PREDICATE: &str = "(:search = '' OR description LIKE '%' || :search || '%')";

/// Retrieve one page of at most `page_size` matching records.
///
/// Pages are numbered from 1; a page past the end of the collection
/// yields an empty list, not an error.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_record_page(
    kind: RecordKind,
    filter: &RecordFilter,
    page_number: u64,
    page_size: u64,
    connection: &Connection,
) -> Result<Vec<Record>, Error> {
    let offset = page_number.saturating_sub(1).saturating_mul(page_size);

    connection
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM {} WHERE {SEARCH_PREDICATE}
             ORDER BY id ASC LIMIT :limit OFFSET :offset",
            kind.table()
        ))?
        .query_map(
            named_params! {
                ":search": filter.search_param(),
                ":limit": page_size,
                ":offset": offset,
            },
            map_record_row,
        )?
        .map(|record| record.map_err(Error::from))
        .collect()
}

/// Retrieve ALL matching records in the same order as
/// [get_record_page], without a pagination limit. This is the fetch
/// behind the PDF export.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn get_all_matching_records(
    kind: RecordKind,
    filter: &RecordFilter,
    connection: &Connection,
) -> Result<Vec<Record>, Error> {
    connection
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM {} WHERE {SEARCH_PREDICATE} ORDER BY id ASC",
            kind.table()
        ))?
        .query_map(
            named_params! {":search": filter.search_param()},
            map_record_row,
        )?
        .map(|record| record.map_err(Error::from))
        .collect()
}

/// Count the records matching `filter`, regardless of pagination.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn count_matching_records(
    kind: RecordKind,
    filter: &RecordFilter,
    connection: &Connection,
) -> Result<u64, Error> {
    connection
        .prepare(&format!(
            "SELECT COUNT(id) FROM {} WHERE {SEARCH_PREDICATE}",
            kind.table()
        ))?
        .query_row(named_params! {":search": filter.search_param()}, |row| {
            row.get(0)
        })
        .map_err(Error::from)
}

/// Sum the amounts of ALL records matching `filter`, regardless of
/// how many pages exist. Summing zero records returns zero.
///
/// Amounts are whole rupiah, so the sum is exact integer arithmetic.
/// The result is a raw number; currency formatting happens in the
/// presentation layer.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error.
pub fn sum_matching_amounts(
    kind: RecordKind,
    filter: &RecordFilter,
    connection: &Connection,
) -> Result<i64, Error> {
    connection
        .prepare(&format!(
            "SELECT COALESCE(SUM(amount), 0) FROM {} WHERE {SEARCH_PREDICATE}",
            kind.table()
        ))?
        .query_row(named_params! {":search": filter.search_param()}, |row| {
            row.get(0)
        })
        .map_err(Error::from)
}

// ============================================================================
// TESTS
// ============================================================================
