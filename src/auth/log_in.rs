//! The log-in page and the route handler for log-in requests.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error, endpoints,
    auth::{
        UserID, cookie::set_auth_cookie, get_user_by_id, normalize_redirect_url,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base},
    timezone::get_local_offset,
};

/// The error message shown when the password does not match.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect password.";

/// How long the auth cookie should last if the user selects "remember
/// me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// Wrap an auth `form` in the centered card used by the log-in and
/// registration pages.
pub(super) fn auth_card(form_title: &str, form: &Markup) -> Markup {
    html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto"
        {
            p class="flex items-center mb-6 text-2xl font-semibold text-gray-900 dark:text-white"
            {
                "Catatan"
            }

            div class="w-full bg-white rounded-lg shadow dark:border md:mt-0 sm:max-w-md xl:p-0 dark:bg-gray-800 dark:border-gray-700"
            {
                div class="p-6 space-y-4 md:space-y-6 sm:p-8"
                {
                    h1 class="text-xl font-bold leading-tight tracking-tight text-gray-900 md:text-2xl dark:text-white"
                    {
                        (form_title)
                    }

                    (form)
                }
            }
        }
    }
}

fn log_in_form(error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-target="this"
            hx-swap="outerHTML"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Password" }

                input
                    type="password"
                    name="password"
                    id="password"
                    placeholder="••••••••"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    autofocus;

                @if let Some(error_message) = error_message {
                    p class="text-red-500 text-base" { (error_message) }
                }
            }

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Log in" }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "First time here? "

                a
                    href=(endpoints::REGISTER_VIEW)
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                    "Set a password"
                }
            }
        }
    }
}

/// The query parameters accepted by the log-in page.
#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    /// Where to send the user after a successful log-in.
    pub redirect_url: Option<String>,
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let form = log_in_form(None, redirect_url.as_deref());
    let content = auth_card("Log in to your account", &form);

    base("Log In", &content).into_response()
}

/// The state needed to perform a log-in.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
    /// The database connection for looking up the user.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The form data for a log-in request.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// The submitted password.
    pub password: String,
    /// Present when the "remember me" checkbox was ticked.
    #[serde(default)]
    pub remember_me: Option<String>,
    /// Where to send the user after a successful log-in.
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Handler for log-in requests via the POST method.
///
/// On success the auth cookie is set and the client is redirected to
/// the page it came from, or the expenses page. Otherwise the form is
/// returned with an error message explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match get_user_by_id(UserID::new(1), &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => {
                // No password has been set yet, send the user to
                // registration.
                return (
                    HxRedirect(endpoints::REGISTER_VIEW.to_owned()),
                    StatusCode::SEE_OTHER,
                )
                    .into_response();
            }
            Err(error) => {
                tracing::error!("could not get user: {error}");
                return error.into_response();
            }
        }
    };

    match user.password_hash.verify(&user_data.password) {
        Ok(true) => {}
        Ok(false) => {
            return log_in_form(Some(INVALID_CREDENTIALS_ERROR_MSG), redirect_url)
                .into_response();
        }
        Err(error) => {
            tracing::error!("could not verify password: {error}");
            return error.into_response();
        }
    }

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone.clone()).into_response();
    };

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    match set_auth_cookie(jar, user.id, cookie_duration, local_offset) {
        Ok(jar) => {
            let target = redirect_url.unwrap_or(endpoints::EXPENSES_VIEW);
            (jar, HxRedirect(target.to_owned()), StatusCode::SEE_OTHER).into_response()
        }
        Err(error) => {
            tracing::error!("could not set auth cookie: {error}");
            error.into_response()
        }
    }
}

#[cfg(test)]
mod log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::{StatusCode, header::SET_COOKIE},
    };
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use sha2::{Digest, Sha512};
    use time::Duration;

    use crate::{
        auth::{PasswordHash, ValidatedPassword, create_user},
        db::initialize,
        endpoints,
        test_utils::{assert_valid_html, parse_html_document},
    };

    use super::{
        INVALID_CREDENTIALS_ERROR_MSG, LogInData, LoginState, RedirectQuery, get_log_in_page,
        post_log_in,
    };

    const TEST_PASSWORD: &str = "averygoodsecret42";

    fn get_test_state() -> LoginState {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let password_hash =
            PasswordHash::with_cost(ValidatedPassword::new_unchecked(TEST_PASSWORD), 4).unwrap();
        create_user(password_hash, &connection).unwrap();

        LoginState {
            cookie_key: Key::from(&Sha512::digest("42")),
            cookie_duration: Duration::minutes(30),
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        }
    }

    fn get_jar(state: &LoginState) -> PrivateCookieJar {
        PrivateCookieJar::new(state.cookie_key.clone())
    }

    fn log_in_data(password: &str) -> LogInData {
        LogInData {
            password: password.to_owned(),
            remember_me: None,
            redirect_url: None,
        }
    }

    #[tokio::test]
    async fn log_in_page_renders_the_form() {
        let response = get_log_in_page(Query(RedirectQuery { redirect_url: None })).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert!(
            html.select(&Selector::parse("input[name='password']").unwrap())
                .next()
                .is_some(),
            "No password input found"
        );
    }

    #[tokio::test]
    async fn correct_password_sets_cookie_and_redirects() {
        let state = get_test_state();
        let jar = get_jar(&state);

        let response = post_log_in(
            State(state),
            jar,
            axum_extra::extract::Form(log_in_data(TEST_PASSWORD)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::EXPENSES_VIEW
        );
        assert!(
            response.headers().get(SET_COOKIE).is_some(),
            "expected a Set-Cookie header"
        );
    }

    #[tokio::test]
    async fn log_in_redirects_to_the_requested_page() {
        let state = get_test_state();
        let jar = get_jar(&state);
        let mut data = log_in_data(TEST_PASSWORD);
        data.redirect_url = Some("/incomes?page=2".to_owned());

        let response = post_log_in(State(state), jar, axum_extra::extract::Form(data)).await;

        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            "/incomes?page=2"
        );
    }

    #[tokio::test]
    async fn wrong_password_rerenders_the_form_with_an_error() {
        let state = get_test_state();
        let jar = get_jar(&state);

        let response = post_log_in(
            State(state),
            jar,
            axum_extra::extract::Form(log_in_data("wrong password")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = Html::parse_fragment(&String::from_utf8_lossy(&body));
        let text: String = html.root_element().text().collect();
        assert!(
            text.contains(INVALID_CREDENTIALS_ERROR_MSG),
            "expected the error message in the re-rendered form"
        );
    }

    #[tokio::test]
    async fn missing_user_redirects_to_registration() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let state = LoginState {
            cookie_key: Key::from(&Sha512::digest("42")),
            cookie_duration: Duration::minutes(30),
            local_timezone: "Etc/UTC".to_owned(),
            db_connection: Arc::new(Mutex::new(connection)),
        };
        let jar = get_jar(&state);

        let response = post_log_in(
            State(state),
            jar,
            axum_extra::extract::Form(log_in_data(TEST_PASSWORD)),
        )
        .await;

        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::REGISTER_VIEW
        );
    }
}
