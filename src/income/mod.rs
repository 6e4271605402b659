//! Income management: the list page, the create/edit pages, and the
//! mutation endpoints. Incomes share the expense feature's query path
//! but have no grand total or export.

mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod incomes_page;

pub use create_endpoint::create_income_endpoint;
pub use create_page::get_create_income_page;
pub use delete_endpoint::delete_income_endpoint;
pub use edit_endpoint::edit_income_endpoint;
pub use edit_page::get_edit_income_page;
pub use incomes_page::get_incomes_page;
