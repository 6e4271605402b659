//! The page with the form for creating a new expense.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    record::{FormAction, RecordForm, RecordFormErrors, record_form_view},
};

/// Display the form for creating a new expense.
pub async fn get_create_expense_page() -> Response {
    let nav_bar = NavBar::new(endpoints::EXPENSES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New Expense" }

            (record_form_view(
                "Save Expense",
                FormAction::Create(endpoints::POST_EXPENSE),
                &RecordForm::default(),
                &RecordFormErrors::default(),
            ))
        }
    );

    base("New Expense", &content).into_response()
}
