//! The list page view shared by the expenses and incomes features:
//! search box, record table, optional grand-total footer, and
//! pagination links that round-trip the search filter.

use maud::{Markup, html};

use crate::{
    endpoints::format_endpoint,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links, format_rupiah,
    },
    navigation::NavBar,
    pagination::{PaginationIndicator, create_pagination_indicators},
    record::{core::Record, listing::RecordListing, query::RecordFilter},
};

/// The per-resource configuration of the shared list page.
#[derive(Debug, Clone)]
pub struct ListingPageConfig<'a> {
    /// The page heading, e.g. "Expenses".
    pub title: &'a str,
    /// The list page URL, used for the search form and pagination links.
    pub list_url: &'a str,
    /// The URL of the create page.
    pub create_url: &'a str,
    /// The URL of the PDF export, when the resource has one.
    pub export_url: Option<&'a str>,
    /// The edit page URI pattern, e.g. "/expenses/{expense_id}/edit".
    pub edit_endpoint: &'a str,
    /// The delete API URI pattern.
    pub delete_endpoint: &'a str,
    /// Whether to render the grand-total footer row.
    pub show_total: bool,
    /// The maximum number of page links in the pagination indicator.
    pub max_pages: u64,
}

/// Build a link back to the list with the filter and a page number
/// attached, so the filter survives pagination.
fn page_url(list_url: &str, filter: &RecordFilter, page: u64) -> String {
    let page = page.to_string();
    let query = match &filter.search {
        Some(search) => {
            serde_urlencoded::to_string([("search", search.as_str()), ("page", page.as_str())])
        }
        None => serde_urlencoded::to_string([("page", page.as_str())]),
    };

    match query {
        Ok(query) => format!("{list_url}?{query}"),
        Err(error) => {
            tracing::error!("Could not encode page link query string: {error}");
            list_url.to_owned()
        }
    }
}

/// Build the export URL with the filter attached, so the export sees
/// exactly what the list shows.
fn export_url_with_filter(export_url: &str, filter: &RecordFilter) -> String {
    match &filter.search {
        Some(search) => match serde_urlencoded::to_string([("search", search.as_str())]) {
            Ok(query) => format!("{export_url}?{query}"),
            Err(error) => {
                tracing::error!("Could not encode export query string: {error}");
                export_url.to_owned()
            }
        },
        None => export_url.to_owned(),
    }
}

fn pagination_nav(config: &ListingPageConfig, listing: &RecordListing) -> Markup {
    let indicators = create_pagination_indicators(
        listing.page.current_page,
        listing.page.page_count,
        config.max_pages,
    );

    let link_style = "px-3 py-2 leading-tight text-gray-500 bg-white border \
        border-gray-300 hover:bg-gray-100 hover:text-gray-700 dark:bg-gray-800 \
        dark:border-gray-700 dark:text-gray-400";
    let current_style = "px-3 py-2 leading-tight text-blue-600 bg-blue-50 border \
        border-gray-300 dark:bg-gray-700 dark:border-gray-700 dark:text-white";

    html!(
        nav class="pagination mt-4" aria-label="Pages"
        {
            ul class="pagination inline-flex -space-x-px text-sm"
            {
                @for indicator in &indicators {
                    li
                    {
                        @match indicator {
                            PaginationIndicator::BackButton(page) => {
                                a
                                    href=(page_url(config.list_url, &listing.filter, *page))
                                    class=(link_style)
                                { "Previous" }
                            }
                            PaginationIndicator::Page(page) => {
                                a
                                    href=(page_url(config.list_url, &listing.filter, *page))
                                    class=(link_style)
                                { (page) }
                            }
                            PaginationIndicator::CurrentPage(page) => {
                                span aria-current="page" class=(current_style) { (page) }
                            }
                            PaginationIndicator::Ellipsis => {
                                span class=(link_style) { "…" }
                            }
                            PaginationIndicator::NextButton(page) => {
                                a
                                    href=(page_url(config.list_url, &listing.filter, *page))
                                    class=(link_style)
                                { "Next" }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn table_row(config: &ListingPageConfig, row_number: u64, record: &Record) -> Markup {
    let edit_url = format_endpoint(config.edit_endpoint, record.id);
    let delete_url = format_endpoint(config.delete_endpoint, record.id);
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? This cannot be undone.",
        record.description
    );

    html!(
        tr class=(TABLE_ROW_STYLE) data-record-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (row_number) }

            th
                scope="row"
                class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
            {
                (record.description)
            }

            td class=(TABLE_CELL_STYLE)
            {
                time datetime=(record.date) { (record.date) }
            }

            td class="px-6 py-4 text-right" { (format_rupiah(record.amount)) }

            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    (edit_delete_action_links(&edit_url, &delete_url, &confirm_message))
                }
            }
        }
    )
}

/// Render the full list page for one resource.
pub fn records_page_view(config: &ListingPageConfig, listing: &RecordListing) -> Markup {
    let nav_bar = NavBar::new(config.list_url).into_html();
    let search_value = listing.filter.search.as_deref();
    let first_row_number = listing.page.from.unwrap_or(0);

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { (config.title) }

                    div class="flex gap-4"
                    {
                        @if let Some(export_url) = config.export_url {
                            a
                                href=(export_url_with_filter(export_url, &listing.filter))
                                class=(LINK_STYLE)
                            {
                                "Export PDF"
                            }
                        }

                        a href=(config.create_url) class=(LINK_STYLE) { "Add " (config.title.trim_end_matches('s')) }
                    }
                }

                form method="get" action=(config.list_url) class="flex gap-2"
                {
                    input
                        type="search"
                        name="search"
                        placeholder="Search descriptions"
                        class="p-2.5 rounded text-sm text-gray-900 dark:text-white bg-gray-50
                            dark:bg-gray-700 border border-gray-300 dark:border-gray-600"
                        value=[search_value];

                    button
                        type="submit"
                        class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600
                            hover:dark:bg-blue-700 text-white rounded"
                    {
                        "Search"
                    }
                }

                section class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "#" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class="px-6 py-3 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for (index, record) in listing.page.items.iter().enumerate() {
                                (table_row(config, first_row_number + index as u64, record))
                            }

                            @if listing.page.items.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        data-empty-state="true"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No entries found. Create one "
                                        a href=(config.create_url) class=(LINK_STYLE) { "here" }
                                        "."
                                    }
                                }
                            }
                        }

                        @if config.show_total {
                            tfoot
                            {
                                tr class="font-semibold text-gray-900 dark:text-white"
                                {
                                    td colspan="3" class="px-6 py-3 text-right" { "Total" }
                                    td class="px-6 py-3 text-right" data-grand-total="true"
                                    {
                                        (format_rupiah(listing.total))
                                    }
                                    td {}
                                }
                            }
                        }
                    }
                }

                (pagination_nav(config, listing))
            }
        }
    );

    base(config.title, &content)
}

// ============================================================================
// TESTS
// ============================================================================
