use std::{collections::HashSet, fmt};

use log::warn;
use scraper::{ElementRef, Html, Selector};

use crate::{
    error::{Result, ScrapeError},
    text_manipulators::clean_text,
};

/// 1-based column of a compare table, rendered as its css class (`col2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column(u32);

impl Column {
    pub fn new(index: u32) -> Self {
        Column(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "col{}", self.0)
    }
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScrapeError::Selector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Drops matches nested inside another match so their text isn't counted twice.
fn outermost<'a>(elements: Vec<ElementRef<'a>>) -> Vec<ElementRef<'a>> {
    let ids: HashSet<_> = elements.iter().map(|el| el.id()).collect();
    elements
        .into_iter()
        .filter(|el| !el.ancestors().any(|ancestor| ids.contains(&ancestor.id())))
        .collect()
}

fn element_text(element: ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

fn select_within<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(css) {
        Ok(selector) => element.select(&selector).collect(),
        Err(e) => {
            warn!("{e}");
            vec![]
        }
    }
}

fn is_section_header(row: &ElementRef) -> bool {
    row.value().classes().any(|class| class == "attr-header")
}

/// One page of a BOT "compare products" table. Every product occupies a
/// column, every attribute a `tr.attr-*` row.
pub struct ComparePage {
    document: Html,
}

impl ComparePage {
    pub fn parse(html: &str) -> Self {
        ComparePage {
            document: Html::parse_document(html),
        }
    }

    fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(css) {
            Ok(selector) => self.document.select(&selector).collect(),
            Err(e) => {
                warn!("{e}");
                vec![]
            }
        }
    }

    /// Session-expired and error pages come back as 200 without any rows.
    pub fn has_compare_table(&self) -> bool {
        !self.select(r#"tr[class*="attr-"]"#).is_empty() || !self.select("th").is_empty()
    }

    /// Highest `data-page` in the pager; a page without a pager is the only page.
    pub fn total_pages(&self) -> u32 {
        self.select("ul.pagination li a")
            .into_iter()
            .filter_map(|a| a.value().attr("data-page"))
            .filter_map(|page| page.trim().parse::<u32>().ok())
            .max()
            .unwrap_or(1)
            .max(1)
    }

    fn cell_elements(&self, attr: &str, col: Column, inner: &str) -> Vec<ElementRef<'_>> {
        outermost(self.select(&format!("tr.{attr} td.{col} {inner}")))
    }

    /// Text of the spans in a cell, or of the cell itself when it has none.
    pub fn cell_text(&self, attr: &str, col: Column) -> String {
        let spans = self.cell_elements(attr, col, "span");
        let elements = if spans.is_empty() {
            self.select(&format!("tr.{attr} td.{col}"))
        } else {
            spans
        };
        clean_text(
            &elements
                .into_iter()
                .map(|el| el.text().collect::<String>())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    /// Text of the first element matching `inner` inside the cell.
    pub fn cell_text_matching(&self, attr: &str, col: Column, inner: &str) -> String {
        self.cell_elements(attr, col, inner)
            .into_iter()
            .map(element_text)
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    /// One entry per span in the cell.
    pub fn cell_texts(&self, attr: &str, col: Column) -> Vec<String> {
        self.cell_texts_matching(attr, col, "span")
    }

    pub fn cell_texts_matching(&self, attr: &str, col: Column, inner: &str) -> Vec<String> {
        self.cell_elements(attr, col, inner)
            .into_iter()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// One entry per text node in the cell, so `<br>` separated lines stay apart.
    pub fn cell_lines(&self, attr: &str, col: Column) -> Vec<String> {
        self.select(&format!("tr.{attr} td.{col}"))
            .into_iter()
            .flat_map(|cell| cell.text().map(clean_text).collect::<Vec<_>>())
            .filter(|line| !line.is_empty())
            .collect()
    }

    pub fn cell_link(&self, attr: &str, col: Column) -> Option<String> {
        self.select(&format!("tr.{attr} td.{col} a"))
            .into_iter()
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .find(|href| !href.is_empty())
            .map(str::to_string)
    }

    /// Every non-empty `href` in the cell, in document order.
    pub fn cell_links(&self, attr: &str, col: Column) -> Vec<String> {
        self.select(&format!("tr.{attr} td.{col} a"))
            .into_iter()
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Rows below a `tr.attr-header.{section}` heading, up to the next heading.
    fn section_rows(&self, section: &str) -> Vec<ElementRef<'_>> {
        let Some(heading) = self
            .select(&format!("tr.attr-header.{section}"))
            .into_iter()
            .next()
        else {
            return vec![];
        };
        heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .take_while(|row| !is_section_header(row))
            .collect()
    }

    /// One entry per span of `col` in the rows of a section.
    pub fn section_texts(&self, section: &str, col: Column) -> Vec<String> {
        self.section_rows(section)
            .into_iter()
            .flat_map(|row| outermost(select_within(row, &format!("td.{col} span"))))
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    pub fn section_link(&self, section: &str, col: Column) -> Option<String> {
        self.section_rows(section)
            .into_iter()
            .flat_map(|row| select_within(row, &format!("td.{col} a")))
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .find(|href| !href.is_empty())
            .map(str::to_string)
    }

    /// Text of `inner` in `col` of the body row whose first cell reads `label`.
    /// Some tables only tell their rows apart by that label.
    pub fn labelled_cell_text(&self, label: &str, col: Column, inner: &str) -> String {
        self.select("tbody tr")
            .into_iter()
            .find(|row| {
                select_within(*row, "td.frst-col")
                    .into_iter()
                    .any(|cell| element_text(cell) == label)
            })
            .map(|row| {
                let texts: Vec<String> = outermost(select_within(row, &format!("td.{col} {inner}")))
                    .into_iter()
                    .map(element_text)
                    .filter(|text| !text.is_empty())
                    .collect();
                texts.join(" ")
            })
            .unwrap_or_default()
    }

    /// Every span of `col` in the rows whose label mentions `phrase`.
    pub fn row_texts_mentioning(&self, phrase: &str, col: Column) -> Vec<String> {
        self.select("tbody tr")
            .into_iter()
            .filter(|row| {
                select_within(*row, "td.frst-col")
                    .into_iter()
                    .any(|cell| element_text(cell).contains(phrase))
            })
            .flat_map(|row| outermost(select_within(row, &format!("td.{col} span"))))
            .map(element_text)
            .filter(|text| !text.is_empty())
            .collect()
    }

    /// Header text of the product column that sits outside its spans.
    pub fn product_note(&self, col: Column) -> String {
        self.select(&format!("th.prod-{col}"))
            .into_iter()
            .map(|th| {
                let own: String = th
                    .children()
                    .filter_map(|child| child.value().as_text().map(|text| (**text).to_string()))
                    .collect();
                clean_text(&own)
            })
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    fn first_text(&self, css: &str) -> Option<String> {
        self.select(css)
            .into_iter()
            .map(element_text)
            .find(|text| !text.is_empty())
    }

    fn last_text(&self, css: &str) -> Option<String> {
        self.select(css)
            .into_iter()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .last()
    }

    /// Provider (bank) name from the column header.
    pub fn provider(&self, col: Column) -> String {
        self.last_text(&format!("th.col-s-{} span", col.index()))
            .or_else(|| self.last_text(&format!("th.{col} .col-s span")))
            .or_else(|| self.last_text(&format!("th.{col} span")))
            .unwrap_or_default()
    }

    /// Product name from the column header.
    pub fn product(&self, col: Column) -> String {
        self.first_text(&format!("th.prod-{col} span"))
            .or_else(|| self.last_text(&format!("th.font-black.text-center.{col} span")))
            .unwrap_or_default()
    }

    /// The last page usually holds fewer products than the page limit.
    pub fn is_empty_column(&self, col: Column) -> bool {
        self.provider(col).is_empty() && self.product(col).is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Builds a compare table. `rows` are `(attr class, [cell html per column])`.
    pub fn compare_table(
        headers: &[(&str, &str)],
        rows: &[(&str, Vec<&str>)],
        pages: u32,
    ) -> String {
        let mut html = String::from("<html><body><table><thead><tr><th></th>");
        for (i, (provider, product)) in headers.iter().enumerate() {
            let n = i + 1;
            html.push_str(&format!(
                r#"<th class="col-s col-s-{n}"><span><img/></span><span>{provider}</span></th>"#
            ));
            html.push_str(&format!(
                r#"<th class="font-black text-center prod-col{n}"><span>{product}</span></th>"#
            ));
        }
        html.push_str("</tr></thead><tbody>");
        for (attr, cells) in rows {
            html.push_str(&format!(r#"<tr class="{attr}"><td>label</td>"#));
            for (i, cell) in cells.iter().enumerate() {
                html.push_str(&format!(r#"<td class="cmpr-col col{}">{cell}</td>"#, i + 1));
            }
            html.push_str("</tr>");
        }
        html.push_str("</tbody></table>");
        if pages > 1 {
            html.push_str(r#"<ul class="pagination">"#);
            for page in 1..=pages {
                html.push_str(&format!(r##"<li><a href="#" data-page="{page}">{page}</a></li>"##));
            }
            html.push_str(&format!(
                r##"<li class="MoveLast"><a href="#" data-page="{pages}">&raquo;</a></li></ul>"##
            ));
        }
        html.push_str("</body></html>");
        html
    }
}
