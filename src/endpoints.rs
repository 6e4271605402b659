//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/expenses/{expense_id}/edit',
//! use [format_endpoint].

/// The root route which redirects to the expenses page.
pub const ROOT: &str = "/";
/// The page listing a user's expenses.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page for creating a new expense.
pub const NEW_EXPENSE_VIEW: &str = "/expenses/new";
/// The page for editing an existing expense.
pub const EDIT_EXPENSE_VIEW: &str = "/expenses/{expense_id}/edit";
/// The route that streams the expense list as a PDF report.
pub const EXPORT_EXPENSES_PDF: &str = "/expenses/export/pdf";
/// The page listing a user's incomes.
pub const INCOMES_VIEW: &str = "/incomes";
/// The page for creating a new income.
pub const NEW_INCOME_VIEW: &str = "/incomes/new";
/// The page for editing an existing income.
pub const EDIT_INCOME_VIEW: &str = "/incomes/{income_id}/edit";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to register a user.
pub const USERS: &str = "/api/users";
/// The route to create an expense.
pub const POST_EXPENSE: &str = "/api/expenses";
/// The route to update an expense.
pub const PUT_EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to delete an expense.
pub const DELETE_EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to create an income.
pub const POST_INCOME: &str = "/api/incomes";
/// The route to update an income.
pub const PUT_INCOME: &str = "/api/incomes/{income_id}";
/// The route to delete an income.
pub const DELETE_INCOME: &str = "/api/incomes/{income_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string delimited by braces, for example
/// '{expense_id}' in '/expenses/{expense_id}/edit'. Endpoint paths are
/// assumed to contain ASCII only and at most one parameter. If no
/// parameter is found, the original path is returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
