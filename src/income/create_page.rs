//! The page with the form for creating a new income.

use axum::response::{IntoResponse, Response};
use maud::html;

use crate::{
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    record::{FormAction, RecordForm, RecordFormErrors, record_form_view},
};

/// Display the form for creating a new income.
pub async fn get_create_income_page() -> Response {
    let nav_bar = NavBar::new(endpoints::INCOMES_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "New Income" }

            (record_form_view(
                "Save Income",
                FormAction::Create(endpoints::POST_INCOME),
                &RecordForm::default(),
                &RecordFormErrors::default(),
            ))
        }
    );

    base("New Income", &content).into_response()
}

#[cfg(test)]
mod tests {
    use scraper::Selector;

    use crate::{
        endpoints,
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::get_create_income_page;

    #[tokio::test]
    async fn form_posts_to_the_income_endpoint() {
        let response = get_create_income_page().await;

        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = html
            .select(&Selector::parse("form").unwrap())
            .next()
            .expect("No form found");
        assert_eq!(form.attr("hx-post"), Some(endpoints::POST_INCOME));
    }
}
