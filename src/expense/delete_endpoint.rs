//! Defines the endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, database_id::RecordId, endpoints,
    record::{RecordKind, delete_record},
};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting the expense with `expense_id`.
///
/// Deletion is immediate and permanent. The client is redirected back
/// to the expenses view so the table and the grand total re-render
/// from fresh reads. A missing expense reports not-found distinctly
/// from success.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Path(expense_id): Path<RecordId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = delete_record(RecordKind::Expense, expense_id, &connection) {
        tracing::error!("could not delete expense {expense_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
        endpoints,
        record::{RecordDraft, RecordKind, create_record, get_record},
        test_utils::assert_hx_redirect,
    };

    use super::{DeleteExpenseState, delete_expense_endpoint};

    fn get_test_state() -> DeleteExpenseState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_user(PasswordHash::new_unchecked("hunter2"), &conn).unwrap();

        DeleteExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn deletes_expense_and_redirects() {
        let state = get_test_state();
        let id = {
            let connection = state.db_connection.lock().unwrap();
            create_record(
                RecordKind::Expense,
                RecordDraft {
                    description: "Makan siang".to_owned(),
                    amount: 1_000,
                    date: date!(2024 - 01 - 10),
                },
                UserID::new(1),
                &connection,
            )
            .unwrap()
            .id
        };

        let response = delete_expense_endpoint(State(state.clone()), Path(id)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::EXPENSES_VIEW);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(
            get_record(RecordKind::Expense, id, &connection),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn missing_expense_returns_not_found_alert() {
        let state = get_test_state();

        let response = delete_expense_endpoint(State(state), Path(42)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
