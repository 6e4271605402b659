//! The page with the form for editing an existing expense.

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

/// The state needed for the edit expense page.
#[derive(Debug, Clone)]
pub struct EditExpensePageState {
    /// The database connection for reading the expense.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the form for editing the expense with `expense_id`,
/// pre-populated with its stored values.
pub async fn get_edit_expense_page(
    State(state): State<EditExpensePageState>,
    Path(expense_id): Path<RecordId>,
) -> Result<Response, Error> {
    let record = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_record(RecordKind::Expense, expense_id, &connection)?
    };

    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();
    let form = RecordForm::from_record(&record);
    let action_url = format_endpoint(endpoints::PUT_EXPENSE, record.id);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Expense" }

            (record_form_view(
                "Save Expense",
                FormAction::Update(&action_url),
                &form,
                &RecordFormErrors::default(),
            ))
        }
    );

    Ok(base("Edit Expense", &content).into_response())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        auth::{PasswordHash, UserID, create_user},
        db::initialize,
        record::{RecordDraft, RecordKind, create_record},
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{EditExpensePageState, get_edit_expense_page};

    fn get_test_state() -> EditExpensePageState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_user(PasswordHash::new_unchecked("hunter2"), &conn).unwrap();

        EditExpensePageState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn form_is_prepopulated_with_the_stored_values() {
        let state = get_test_state();
        let record = {
            let connection = state.db_connection.lock().unwrap();
            create_record(
                RecordKind::Expense,
                RecordDraft {
                    description: "Makan siang".to_owned(),
                    amount: 50_000,
                    date: date!(2024 - 01 - 10),
                },
                UserID::new(1),
                &connection,
            )
            .unwrap()
        };

        let response = get_edit_expense_page(State(state), Path(record.id))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = html
            .select(&Selector::parse("form").unwrap())
            .next()
            .expect("No form found");
        assert_eq!(form.attr("hx-put"), Some("/api/expenses/1"));

        let description = html
            .select(&Selector::parse("input[name='description']").unwrap())
            .next()
            .unwrap();
        assert_eq!(description.attr("value"), Some("Makan siang"));

        let amount = html
            .select(&Selector::parse("input[name='amount']").unwrap())
            .next()
            .unwrap();
        assert_eq!(amount.attr("value"), Some("50000"));

        let date = html
            .select(&Selector::parse("input[name='date']").unwrap())
            .next()
            .unwrap();
        assert_eq!(date.attr("value"), Some("2024-01-10"));
    }

    #[tokio::test]
    async fn missing_expense_renders_the_not_found_page() {
        let state = get_test_state();

        let result = get_edit_expense_page(State(state), Path(42)).await;

        let error = result.expect_err("want an error for a missing expense");
        assert_eq!(error, Error::NotFound);
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }
}
