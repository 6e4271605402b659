//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are rendered as htmx out-of-band swaps into the
//! `#alert-container` element of the base layout.

use maud::{Markup, html};

/// Alert message types for styling.
#[derive(Debug, Clone, Copy)]
pub enum AlertType {
    Success,
    Error,
}

/// An alert message with a headline and optional details.
pub struct AlertTemplate<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> AlertTemplate<'a> {
    /// Create a new success alert.
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert.
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    /// Render the alert as an out-of-band fragment.
    pub fn into_markup(self) -> Markup {
        let style = match self.alert_type {
            AlertType::Success => {
                "p-4 mb-4 rounded border border-green-300 bg-green-50 text-green-800 \
                dark:bg-gray-800 dark:text-green-400 dark:border-green-800"
            }
            AlertType::Error => {
                "p-4 mb-4 rounded border border-red-300 bg-red-50 text-red-800 \
                dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            }
        };

        html!(
            div id="alert-container" hx-swap-oob="innerHTML"
            {
                div class=(style) role="alert"
                {
                    p class="font-semibold" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="text-sm" { (self.details) }
                    }
                }
            }
        )
    }
}
