//! Defines the route handler for the page that lists incomes.

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

/// The state needed for the incomes page.
#[derive(Debug, Clone)]
pub struct IncomesPageState {
    /// The database connection for reading incomes.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for IncomesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Render the incomes list: a filtered, paginated table. Unlike the
/// expenses page there is no grand total or export.
pub async fn get_incomes_page(
    State(state): State<IncomesPageState>,
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
        RecordKind::Income,
        &filter,
        page_number,
        &state.pagination_config,
        &connection,
    )
    .inspect_err(|error| tracing::error!("could not list incomes: {error}"))?;

    let config = ListingPageConfig {
        title: "Incomes",
        list_url: endpoints::INCOMES_VIEW,
        create_url: endpoints::NEW_INCOME_VIEW,
        export_url: None,
        edit_endpoint: endpoints::EDIT_INCOME_VIEW,
        delete_endpoint: endpoints::DELETE_INCOME,
        show_total: false,
        max_pages: state.pagination_config.max_pages,
    };

    Ok(records_page_view(&config, &listing).into_response())
}
