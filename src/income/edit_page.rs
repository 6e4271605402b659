//! The page with the form for editing an existing income.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::html;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::RecordId,
    endpoints::{self, format_endpoint},
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    record::{FormAction, RecordForm, RecordFormErrors, RecordKind, get_record, record_form_view},
};

/// The state needed for the edit income page.
#[derive(Debug, Clone)]
pub struct EditIncomePageState {
    /// The database connection for reading the income.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditIncomePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the form for editing the income with `income_id`,
/// pre-populated with its stored values.
pub async fn get_edit_income_page(
    State(state): State<EditIncomePageState>,
    Path(income_id): Path<RecordId>,
) -> Result<Response, Error> {
    let record = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_record(RecordKind::Income, income_id, &connection)?
    };

    let nav_bar = NavBar::new(endpoints::INCOMES_VIEW).into_html();
    let form = RecordForm::from_record(&record);
    let action_url = format_endpoint(endpoints::PUT_INCOME, record.id);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Income" }

            (record_form_view(
                "Save Income",
                FormAction::Update(&action_url),
                &form,
                &RecordFormErrors::default(),
            ))
        }
    );

    Ok(base("Edit Income", &content).into_response())
}
