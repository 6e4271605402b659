//! The registration page and route handler.
//!
//! Registration sets the app's one password and is only open while no
//! user exists; afterwards the page redirects to log-in.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
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
        PasswordHash, ValidatedPassword, cookie::set_auth_cookie, count_users, create_user,
        log_in::auth_card,
    },
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base},
    timezone::get_local_offset,
};

fn register_form(error_message: Option<&str>) -> Markup {
    let password_field = |name: &str, label: &str| {
        html!(
            div
            {
                label for=(name) class=(FORM_LABEL_STYLE) { (label) }

                input
                    type="password"
                    name=(name)
                    id=(name)
                    placeholder="••••••••"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }
        )
    };

    html! {
        form
            hx-post=(endpoints::USERS)
            hx-target="this"
            hx-swap="outerHTML"
            class="space-y-4 md:space-y-6"
        {
            (password_field("password", "Password"))
            (password_field("confirm_password", "Confirm password"))

            @if let Some(error_message) = error_message {
                p class="text-red-500 text-base" { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Set password" }
        }
    }
}

/// The state needed to register the user.
#[derive(Debug, Clone)]
pub struct RegisterState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name.
    pub local_timezone: String,
    /// The database connection for creating the user.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegisterState {
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
impl FromRef<RegisterState> for Key {
    fn from_ref(state: &RegisterState) -> Self {
        state.cookie_key.clone()
    }
}

/// Display the registration page, or redirect to log-in when a user
/// already exists.
pub async fn get_register_page(State(state): State<RegisterState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    match count_users(&connection) {
        Ok(0) => {}
        Ok(_) => return Redirect::to(endpoints::LOG_IN_VIEW).into_response(),
        Err(error) => {
            tracing::error!("could not count users: {error}");
            return error.into_response();
        }
    }

    let content = auth_card("Set a password for your records", &register_form(None));
    base("Register", &content).into_response()
}

/// The form data for registering.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// The chosen password.
    pub password: String,
    /// Must match `password`.
    pub confirm_password: String,
}

/// Handler for registration requests via the POST method.
///
/// Creates the app's one user and logs them in. Refused once a user
/// exists.
pub async fn register_user(
    State(state): State<RegisterState>,
    jar: PrivateCookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.confirm_password {
        return register_form(Some("The passwords do not match.")).into_response();
    }

    let validated_password = match ValidatedPassword::new(&form.password) {
        Ok(password) => password,
        Err(Error::TooWeak(reason)) => {
            return register_form(Some(&format!("That password is too weak: {reason}")))
                .into_response();
        }
        Err(error) => {
            tracing::error!("could not validate password: {error}");
            return error.into_response();
        }
    };

    let password_hash = match PasswordHash::new(validated_password) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("could not hash password: {error}");
            return error.into_response();
        }
    };

    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        match count_users(&connection) {
            Ok(0) => {}
            Ok(_) => {
                return register_form(Some(
                    "A password has already been set. Log in instead.",
                ))
                .into_response();
            }
            Err(error) => {
                tracing::error!("could not count users: {error}");
                return error.into_response();
            }
        }

        match create_user(password_hash, &connection) {
            Ok(user) => user,
            Err(error) => {
                tracing::error!("could not create user: {error}");
                return error.into_response();
            }
        }
    };

    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        return Error::InvalidTimezoneError(state.local_timezone.clone()).into_response();
    };

    match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => (
            jar,
            HxRedirect(endpoints::EXPENSES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not set auth cookie: {error}");
            error.into_response()
        }
    }
}
