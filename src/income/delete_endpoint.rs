//! Defines the endpoint for deleting an income.

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

/// The state needed to delete an income.
#[derive(Debug, Clone)]
pub struct DeleteIncomeState {
    /// The database connection for managing incomes.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting the income with `income_id`. Deletion
/// is immediate and permanent.
pub async fn delete_income_endpoint(
    State(state): State<DeleteIncomeState>,
    Path(income_id): Path<RecordId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = delete_record(RecordKind::Income, income_id, &connection) {
        tracing::error!("could not delete income {income_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::INCOMES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
