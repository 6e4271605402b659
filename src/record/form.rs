//! Form payloads, field-by-field validation, and the shared form view
//! for creating and editing records.

use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    record::core::{Record, RecordDraft},
};

/// The maximum number of characters allowed in a description.
pub const DESCRIPTION_MAX_CHARS: usize = 255;

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The raw form data for creating or updating a record.
///
/// Every field arrives as a string so each one can be validated
/// individually and reported back by name, before anything touches the
/// store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordForm {
    /// What the entry was for.
    #[serde(default)]
    pub description: String,
    /// The amount in whole rupiah.
    #[serde(default)]
    pub amount: String,
    /// The date the entry happened, in `YYYY-MM-DD` form.
    #[serde(default)]
    pub date: String,
}

/// Per-field validation messages for a [RecordForm]. A `None` field
/// passed validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFormErrors {
    /// Problem with the description, if any.
    pub description: Option<&'static str>,
    /// Problem with the amount, if any.
    pub amount: Option<&'static str>,
    /// Problem with the date, if any.
    pub date: Option<&'static str>,
}

impl RecordForm {
    /// Pre-populate a form with the values of an existing record, for
    /// the edit page.
    pub fn from_record(record: &Record) -> Self {
        Self {
            description: record.description.clone(),
            amount: record.amount.to_string(),
            date: record.date.to_string(),
        }
    }

    /// Validate every field, returning a draft ready for the store or
    /// the full set of field errors.
    ///
    /// The description is required on update exactly as on create, and
    /// the amount must be a non-negative whole number. No store write
    /// may happen until this has passed.
    pub fn validate(&self) -> Result<RecordDraft, RecordFormErrors> {
        let mut errors = RecordFormErrors::default();

        let description = self.description.trim();
        if description.is_empty() {
            errors.description = Some("The description field is required.");
        } else if description.graphemes(true).count() > DESCRIPTION_MAX_CHARS {
            errors.description = Some("The description may not be greater than 255 characters.");
        }

        let amount = self.amount.trim();
        let amount = if amount.is_empty() {
            errors.amount = Some("The amount field is required.");
            None
        } else {
            match amount.parse::<i64>() {
                Ok(amount) if amount >= 0 => Some(amount),
                Ok(_) => {
                    errors.amount = Some("The amount must be at least 0.");
                    None
                }
                Err(_) => {
                    errors.amount = Some("The amount must be a whole number of rupiah.");
                    None
                }
            }
        };

        let date = self.date.trim();
        let date = if date.is_empty() {
            errors.date = Some("The date field is required.");
            None
        } else {
            match Date::parse(date, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.date = Some("The date is not a valid date.");
                    None
                }
            }
        };

        match (amount, date) {
            (Some(amount), Some(date)) if errors.description.is_none() => Ok(RecordDraft {
                description: description.to_owned(),
                amount,
                date,
            }),
            _ => Err(errors),
        }
    }
}

/// Where a submitted record form goes.
#[derive(Debug, Clone, Copy)]
pub enum FormAction<'a> {
    /// Create a new record via `hx-post` to the given URL.
    Create(&'a str),
    /// Update an existing record via `hx-put` to the given URL.
    Update(&'a str),
}

/// The create/edit form shared by the expense and income pages.
///
/// Validation failures re-render this exact markup with the offending
/// values and messages, swapped in place of the old form.
pub fn record_form_view(
    submit_label: &str,
    action: FormAction,
    form: &RecordForm,
    errors: &RecordFormErrors,
) -> Markup {
    let (post_url, put_url) = match action {
        FormAction::Create(url) => (Some(url), None),
        FormAction::Update(url) => (None, Some(url)),
    };

    let field_error = |message: Option<&'static str>| {
        html!(
            @if let Some(message) = message {
                p class="text-red-500 text-base" { (message) }
            }
        )
    };

    html!(
        form
            hx-post=[post_url]
            hx-put=[put_url]
            hx-target="this"
            hx-swap="outerHTML"
            class=(FORM_CONTAINER_STYLE)
        {
            div class="w-full space-y-4"
            {
                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        type="text"
                        name="description"
                        id="description"
                        placeholder="What was it for?"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=(form.description)
                        maxlength="255"
                        autofocus;

                    (field_error(errors.description))
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount (Rp)" }

                    input
                        type="number"
                        name="amount"
                        id="amount"
                        min="0"
                        step="1"
                        placeholder="50000"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=(form.amount);

                    (field_error(errors.amount))
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        type="date"
                        name="date"
                        id="date"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=(form.date);

                    (field_error(errors.date))
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
            }
        }
    )
}

// ============================================================================
// TESTS
// ============================================================================
