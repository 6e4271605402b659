//! Defines the endpoint for updating an existing income.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::RecordId,
    endpoints::{self, format_endpoint},
    record::{FormAction, RecordForm, RecordKind, update_record, record_form_view},
};

/// The state needed to update an income.
#[derive(Debug, Clone)]
pub struct EditIncomeState {
    /// The database connection for managing incomes.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for updating the income with `income_id`. The owner
/// is never changed by an update.
pub async fn edit_income_endpoint(
    State(state): State<EditIncomeState>,
    Path(income_id): Path<RecordId>,
    Form(form): Form<RecordForm>,
) -> Response {
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => {
            let action_url = format_endpoint(endpoints::PUT_INCOME, income_id);
            return record_form_view(
                "Save Income",
                FormAction::Update(&action_url),
                &form,
                &errors,
            )
            .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = update_record(RecordKind::Income, income_id, draft, &connection) {
        tracing::error!("could not update income {income_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::INCOMES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
