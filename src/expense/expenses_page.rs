//! Defines the route handler for the page that lists expenses.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    pagination::PaginationConfig,
    record::{
        ListQuery, ListingPageConfig, RecordFilter, RecordKind, list_records, parse_page_number,
        records_page_view,
    },
};

/// The state needed for the expenses page.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render the expenses list: a filtered, paginated table with the
/// grand total over every matching expense.
pub async fn get_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, Error> {
    let filter = RecordFilter::new(query.search);
    let page_number = parse_page_number(query.page.as_deref());

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let listing = list_records(
        RecordKind::Expense,
        &filter,
        page_number,
        &state.pagination_config,
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not list expenses: {error}"))?;

    let config = ListingPageConfig {
        title: "Expenses",
        list_url: endpoints::EXPENSES_VIEW,
        create_url: endpoints::NEW_EXPENSE_VIEW,
        export_url: Some(endpoints::EXPORT_EXPENSES_PDF),
        edit_endpoint: endpoints::EDIT_EXPENSE_VIEW,
        delete_endpoint: endpoints::DELETE_EXPENSE,
        show_total: true,
        max_pages: state.pagination_config.max_pages,
    };

    Ok(records_page_view(&config, &listing).into_response())
}
