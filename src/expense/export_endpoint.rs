//! Defines the endpoint that streams the filtered expense list as a
//! PDF report.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    expense::report::render_expenses_pdf,
    record::{RecordFilter, RecordKind, get_all_matching_records, sum_matching_amounts},
    timezone::get_local_offset,
};

/// The filename suggested to the client for the streamed report.
const REPORT_FILENAME: &str = "expenses-report.pdf";

/// The query parameters accepted by the export endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    /// The search term, applied exactly as on the list page.
    pub search: Option<String>,
}

/// The state needed to export expenses.
#[derive(Debug, Clone)]
pub struct ExportExpensesState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, used for the
    /// report's generation date.
    pub local_timezone: String,
}

impl FromRef<AppState> for ExportExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Stream the expenses matching `search` as a PDF report.
///
/// The report re-runs the list page's filter without pagination and
/// recomputes the total with the same aggregation, so the exported
/// rows and total always match what the list pages show combined. The
/// document is streamed inline, not persisted.
pub async fn export_expenses_pdf(
    State(state): State<ExportExpensesState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, Error> {
    let filter = RecordFilter::new(query.search);

    let (records, total) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let records = get_all_matching_records(RecordKind::Expense, &filter, &connection)
            .inspect_err(|error| tracing::error!("could not fetch expenses: {error}"))?;
        let total = sum_matching_amounts(RecordKind::Expense, &filter, &connection)
            .inspect_err(|error| tracing::error!("could not sum expenses: {error}"))?;

        (records, total)
    };

    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let generated_on = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let pdf_bytes = render_expenses_pdf(&records, total, generated_on)
        .inspect_err(|error| tracing::error!("could not render expenses report: {error}"))?;

    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("inline; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        pdf_bytes,
    )
        .into_response())
}

#[cfg(test)]
mod export_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
        record::{
            RecordDraft, RecordFilter, RecordKind, create_record, sum_matching_amounts,
        },
        test_utils::{assert_content_type, get_header},
    };

    use super::{ExportExpensesState, ExportQuery, REPORT_FILENAME, export_expenses_pdf};

    fn get_test_state() -> ExportExpensesState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_user(PasswordHash::new_unchecked("hunter2"), &conn).unwrap();

        ExportExpensesState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    fn insert_expense(state: &ExportExpensesState, description: &str, amount: i64) {
        let connection = state.db_connection.lock().unwrap();
        create_record(
            RecordKind::Expense,
            RecordDraft {
                description: description.to_owned(),
                amount,
                date: date!(2024 - 01 - 10),
            },
            UserID::new(1),
            &connection,
        )
        .unwrap();
    }

    #[tokio::test]
    async fn streams_a_pdf_inline() {
        let state = get_test_state();
        insert_expense(&state, "Makan siang", 50_000);

        let response = export_expenses_pdf(State(state), Query(ExportQuery::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_content_type(&response, "application/pdf");
        assert_eq!(
            get_header(&response, "content-disposition"),
            format!("inline; filename=\"{REPORT_FILENAME}\"")
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn empty_collection_still_renders_a_report() {
        let state = get_test_state();

        let response = export_expenses_pdf(State(state), Query(ExportQuery::default()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn export_uses_the_same_filter_and_total_as_the_list() {
        let state = get_test_state();
        insert_expense(&state, "Kopi pagi", 25_000);
        insert_expense(&state, "Kopi sore", 20_000);
        insert_expense(&state, "Bensin", 30_000);

        // The export must see exactly the filtered set the list pages
        // sum: the "kopi" expenses but not the "bensin" one.
        let filter = RecordFilter::new(Some("kopi".to_owned()));
        let list_total = {
            let connection = state.db_connection.lock().unwrap();
            sum_matching_amounts(RecordKind::Expense, &filter, &connection).unwrap()
        };
        assert_eq!(list_total, 45_000);

        let filtered = export_expenses_pdf(
            State(state.clone()),
            Query(ExportQuery {
                search: Some("kopi".to_owned()),
            }),
        )
        .await
        .unwrap();
        let unfiltered = export_expenses_pdf(State(state), Query(ExportQuery::default()))
            .await
            .unwrap();

        let filtered_body = axum::body::to_bytes(filtered.into_body(), usize::MAX)
            .await
            .unwrap();
        let unfiltered_body = axum::body::to_bytes(unfiltered.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(filtered_body.starts_with(b"%PDF"));
        assert_ne!(
            filtered_body, unfiltered_body,
            "the filter must change the exported document"
        );
    }
}
