//! HTML parser for results pages
//!
//! This module reads two things out of a results listing page:
//! - The number of the last page, from the pagination block
//! - The finishing time of every row in the results table
//!
//! Both fail loudly when the expected markup is missing. A page without a
//! pagination block is an error, never an implicit single page.

use crate::crawler::link::PAGE_PARAM;
use crate::{ScrapeError, ScrapeResult};
use scraper::{ElementRef, Html, Selector};

/// Text of the pagination link pointing at the last page ("End")
pub const END_LINK_LABEL: &str = "Конец";

/// Zero-based column of the finishing time in a results row
pub const TIME_COLUMN: usize = 9;

fn selector(css: &str) -> ScrapeResult<Selector> {
    Selector::parse(css).map_err(|_| ScrapeError::Selector(css.to_string()))
}

/// Finds the `#members` results container
fn members(document: &Html) -> ScrapeResult<ElementRef<'_>> {
    document
        .select(&selector("#members")?)
        .next()
        .ok_or(ScrapeError::MissingElement("#members container"))
}

/// Reads the total number of results pages from the first page
///
/// The pagination block is the second `<font>` element inside the parent of
/// `#members`; its "End" link carries the last page number in `PAGEN_1`.
///
/// # Example
///
/// ```
/// use finish_times::crawler::discover_page_count;
///
/// let html = r#"<div>
///   <font>Results</font>
///   <font><a href="/results/?year=2019&PAGEN_1=2">2</a>
///         <a href="/results/?year=2019&PAGEN_1=7">Конец</a></font>
///   <div id="members"></div>
/// </div>"#;
/// assert_eq!(discover_page_count(html).unwrap(), 7);
/// ```
pub fn discover_page_count(html: &str) -> ScrapeResult<u32> {
    let document = Html::parse_document(html);
    let members = members(&document)?;

    let layout = members
        .parent()
        .and_then(ElementRef::wrap)
        .ok_or(ScrapeError::MissingElement("#members parent"))?;

    let navigation = layout
        .select(&selector("font")?)
        .nth(1)
        .ok_or(ScrapeError::MissingElement("pagination block"))?;

    let end_link = navigation
        .select(&selector("a")?)
        .find(|a| a.text().collect::<String>().trim() == END_LINK_LABEL)
        .ok_or(ScrapeError::MissingEndLink(END_LINK_LABEL))?;

    let href = end_link
        .value()
        .attr("href")
        .ok_or(ScrapeError::MissingElement("href on end link"))?;

    page_number_from_href(href)
}

/// Parses the value of the last `PAGEN_1=` parameter in an href
fn page_number_from_href(href: &str) -> ScrapeResult<u32> {
    let marker = format!("{}=", PAGE_PARAM);
    let start = href
        .rfind(&marker)
        .map(|idx| idx + marker.len())
        .ok_or_else(|| ScrapeError::InvalidPageNumber(href.to_string()))?;

    let value = href[start..]
        .split(['&', '#'])
        .next()
        .unwrap_or_default();

    match value.parse::<u32>() {
        Ok(page) if page > 0 => Ok(page),
        _ => Err(ScrapeError::InvalidPageNumber(href.to_string())),
    }
}

/// Extracts the finishing time of every results row, in document order
///
/// Times in `MM:SS` form are prefixed with `00:` so every entry has an hours
/// component.
///
/// # Example
///
/// ```
/// use finish_times::crawler::extract_times;
///
/// let cells = |t: &str| format!("{}<td>{}</td>", "<td>-</td>".repeat(9), t);
/// let html = format!(
///     r#"<div id="members"><table><tbody><tr>{}</tr><tr>{}</tr></tbody></table></div>"#,
///     cells("1:23:45"),
///     cells("9:30"),
/// );
/// assert_eq!(extract_times(&html).unwrap(), vec!["1:23:45", "00:9:30"]);
/// ```
pub fn extract_times(html: &str) -> ScrapeResult<Vec<String>> {
    let document = Html::parse_document(html);
    let members = members(&document)?;

    let table = members
        .select(&selector("table")?)
        .next()
        .ok_or(ScrapeError::MissingElement("results table"))?;

    let body = table
        .select(&selector("tbody")?)
        .next()
        .ok_or(ScrapeError::MissingElement("results table body"))?;

    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    body.select(&row_selector)
        .enumerate()
        .map(|(row, tr)| -> ScrapeResult<String> {
            let cells: Vec<ElementRef<'_>> = tr.select(&cell_selector).collect();
            let cell = cells
                .get(TIME_COLUMN)
                .ok_or(ScrapeError::MissingTimeCell {
                    row,
                    cells: cells.len(),
                    expected: TIME_COLUMN + 1,
                })?;
            Ok(normalize_time(cell.text().collect::<String>().trim()))
        })
        .collect()
}

/// Prefixes `00:` to times with a single colon
pub fn normalize_time(time: &str) -> String {
    if time.matches(':').count() == 1 {
        format!("00:{}", time)
    } else {
        time.to_string()
    }
}
