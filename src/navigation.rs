//! The navigation bar shown at the top of every page.

use maud::{Markup, html};

use crate::endpoints;

/// A link in the navigation bar. It changes appearance when
/// `is_current` is set. Only one link should be current at a time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent \
            lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100 \
            lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0 \
            dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700 \
            dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!( a href=(self.url) class=(style) { (self.title) } )
    }
}

/// The navigation bar with the expense, income, and log out links.
pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the navigation bar. A link matching `active_endpoint` is
    /// marked as active and displayed differently.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = vec![
            Link {
                url: endpoints::EXPENSES_VIEW,
                title: "Expenses",
                is_current: active_endpoint == endpoints::EXPENSES_VIEW,
            },
            Link {
                url: endpoints::INCOMES_VIEW,
                title: "Incomes",
                is_current: active_endpoint == endpoints::INCOMES_VIEW,
            },
            Link {
                url: endpoints::LOG_OUT,
                title: "Log out",
                is_current: false,
            },
        ];

        NavBar { links }
    }

    /// Render the navigation bar.
    pub fn into_html(self) -> Markup {
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-800 shadow-sm"
            {
                div class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::EXPENSES_VIEW)
                        class="flex items-center space-x-3 text-xl font-semibold text-gray-900 dark:text-white"
                    {
                        "Catatan"
                    }

                    ul class="flex flex-row gap-4 font-medium"
                    {
                        @for link in self.links {
                            li { (link.into_html()) }
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use scraper::{Html, Selector};

    use crate::endpoints;

    use super::NavBar;

    #[test]
    fn renders_all_links() {
        let markup = NavBar::new(endpoints::EXPENSES_VIEW).into_html();

        let html = Html::parse_fragment(&markup.into_string());
        let hrefs: Vec<_> = html
            .select(&Selector::parse("ul a").unwrap())
            .filter_map(|link| link.attr("href"))
            .collect();

        assert_eq!(
            hrefs,
            [
                endpoints::EXPENSES_VIEW,
                endpoints::INCOMES_VIEW,
                endpoints::LOG_OUT
            ]
        );
    }

    #[test]
    fn marks_the_active_link() {
        let markup = NavBar::new(endpoints::INCOMES_VIEW).into_html();

        let html = Html::parse_fragment(&markup.into_string());
        let incomes_link = html
            .select(&Selector::parse("ul a").unwrap())
            .find(|link| link.attr("href") == Some(endpoints::INCOMES_VIEW))
            .expect("No incomes link found");

        assert!(
            incomes_link
                .attr("class")
                .is_some_and(|class| class.contains("bg-blue-700")),
            "Active link should use the highlighted style"
        );
    }
}
