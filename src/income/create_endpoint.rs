//! Defines the endpoint for creating a new income.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    auth::UserID,
    record::{FormAction, RecordForm, RecordKind, create_record, record_form_view},
};

/// The state needed to create an income.
#[derive(Debug, Clone)]
pub struct CreateIncomeState {
    /// The database connection for managing incomes.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new income owned by the logged-in
/// user.
pub async fn create_income_endpoint(
    State(state): State<CreateIncomeState>,
    Extension(user_id): Extension<UserID>,
    Form(form): Form<RecordForm>,
) -> Response {
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => {
            return record_form_view(
                "Save Income",
                FormAction::Create(endpoints::POST_INCOME),
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

    if let Err(error) = create_record(RecordKind::Income, draft, user_id, &connection) {
        tracing::error!("could not create income: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::INCOMES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
        endpoints,
        record::{RecordFilter, RecordForm, RecordKind, get_all_matching_records},
        test_utils::assert_hx_redirect,
    };

    use super::{CreateIncomeState, create_income_endpoint};

    #[tokio::test]
    async fn creates_income_and_redirects() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_user(PasswordHash::new_unchecked("hunter2"), &conn).unwrap();
        let state = CreateIncomeState {
            db_connection: Arc::new(Mutex::new(conn)),
        };
        let form = RecordForm {
            description: "Gaji bulanan".to_owned(),
            amount: "8000000".to_owned(),
            date: "2024-01-25".to_owned(),
        };

        let response =
            create_income_endpoint(State(state.clone()), Extension(UserID::new(1)), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::INCOMES_VIEW);

        let connection = state.db_connection.lock().unwrap();
        let records =
            get_all_matching_records(RecordKind::Income, &RecordFilter::default(), &connection)
                .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amount, 8_000_000);
    }
}
