use std::path::PathBuf;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::{
    compare_page::parse_selector,
    error::{Result, ScrapeError},
    scraping_context::ScrapingContext,
    text_manipulators::{clean_text, first_integer, split_clean},
    writer::write_json,
};

pub const NAME: &str = "member-companies";
pub const OUTPUT_FILE: &str = "member_companies.json";
const LANGUAGES: [&str; 2] = ["th", "en"];

const SHAREHOLDER_TABLE: usize = 0;
const BOARD_TABLE: usize = 1;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberCompany {
    pub no: Option<i64>,
    pub name: String,
    pub website: Option<String>,
    #[serde(rename = "no_sharehold")]
    pub shareholders: Vec<Shareholder>,
    #[serde(rename = "board_of_director")]
    pub board_of_directors: Vec<BoardMember>,
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shareholder {
    pub no: usize,
    pub name: String,
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardMember {
    pub no: usize,
    pub name: String,
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub branch_name: String,
    pub address: String,
    pub phone_number: Vec<String>,
    pub fax_number: Vec<String>,
}

fn element_text(el: ElementRef) -> String {
    clean_text(&el.text().collect::<String>())
}

fn cell(cells: &[ElementRef], index: usize) -> String {
    cells.get(index).map(|el| element_text(*el)).unwrap_or_default()
}

/// Prefixes site-relative links with the SET root.
fn absolute_url(base_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{base_url}{href}")
    } else {
        format!("{base_url}/{href}")
    }
}

pub fn member_list_url(base_url: &str, lang: &str) -> String {
    format!("{base_url}/{lang}/market/information/member-list/main")
}

/// Company profile links of a member list page, made absolute.
pub fn company_links(html: &str, base_url: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let link = parse_selector("div.py-3 div.card.market-related-info a")?;
    Ok(document
        .select(&link)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| absolute_url(base_url, href.trim()))
        .collect())
}

/// A member company profile page, before its branches are fetched.
pub struct CompanyPage {
    document: Html,
}

impl CompanyPage {
    pub fn parse(html: &str) -> Self {
        CompanyPage {
            document: Html::parse_document(html),
        }
    }

    fn first_text(&self, css: &str) -> Result<Option<String>> {
        let selector = parse_selector(css)?;
        Ok(self
            .document
            .select(&selector)
            .map(element_text)
            .find(|text| !text.is_empty()))
    }

    fn first_href(&self, css: &str) -> Result<Option<String>> {
        let selector = parse_selector(css)?;
        Ok(self
            .document
            .select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .find(|href| !href.is_empty())
            .map(str::to_string))
    }

    /// The broker number, from the title badge or else from a span labelled
    /// with the number caption in either language.
    pub fn number(&self) -> Result<Option<i64>> {
        if let Some(text) = self.first_text("div.title-member span.text-primary")? {
            return Ok(first_integer(&text));
        }
        let span = parse_selector("span")?;
        let number = self
            .document
            .select(&span)
            .filter_map(|el| {
                let inner: Vec<String> = el.select(&span).map(element_text).collect();
                let text = element_text(el);
                if text.contains("หมายเลข") {
                    inner.first().cloned()
                } else if text.contains("Number") {
                    inner.get(1).cloned()
                } else {
                    None
                }
            })
            .find_map(|text| first_integer(&text));
        Ok(number)
    }

    pub fn name(&self) -> Result<String> {
        Ok(self
            .first_text("h2[data-element='element_heading']")?
            .or(self.first_text("h2")?)
            .unwrap_or_default())
    }

    pub fn website(&self) -> Result<Option<String>> {
        Ok(self
            .first_href("div[data-element='element_text_editor'] a")?
            .or(self.first_href("a[href^='http']")?))
    }

    /// Body rows of the `index`th table of each table style the site uses,
    /// as cell lists.
    fn table_rows(&self, index: usize) -> Result<Vec<Vec<String>>> {
        let row = parse_selector("tbody tr")?;
        let td = parse_selector("td")?;
        let mut rows = Vec::new();
        for css in [
            "table[role='table']",
            "div[data-element='element_text_editor'] table",
        ] {
            let tables = parse_selector(css)?;
            if let Some(table) = self.document.select(&tables).nth(index) {
                rows.extend(table.select(&row).map(|tr| {
                    let cells: Vec<ElementRef> = tr.select(&td).collect();
                    (0..cells.len()).map(|i| cell(&cells, i)).collect::<Vec<_>>()
                }));
            }
        }
        Ok(rows)
    }

    pub fn shareholders(&self) -> Result<Vec<Shareholder>> {
        let rows = self.table_rows(SHAREHOLDER_TABLE)?;
        Ok(rows
            .iter()
            .enumerate()
            .map(|(i, cells)| {
                let percent = cells.get(2).map(|p| p.replace(',', ""));
                Shareholder {
                    no: i + 1,
                    name: cells.get(1).cloned().unwrap_or_default(),
                    percent: percent.and_then(|p| p.trim_end_matches('%').trim().parse().ok()),
                }
            })
            .collect())
    }

    pub fn board_members(&self) -> Result<Vec<BoardMember>> {
        let rows = self.table_rows(BOARD_TABLE)?;
        Ok(rows
            .iter()
            .enumerate()
            .map(|(i, cells)| BoardMember {
                no: i + 1,
                name: cells.get(1).cloned().unwrap_or_default(),
                position: cells.get(2).cloned().unwrap_or_default(),
            })
            .collect())
    }

    pub fn branch_url(&self) -> Result<Option<String>> {
        self.first_href("div[data-element='element_button_image'] a")
    }

    pub fn company(&self) -> Result<MemberCompany> {
        let company = MemberCompany {
            no: self.number()?,
            name: self.name()?,
            website: self.website()?,
            shareholders: self.shareholders()?,
            board_of_directors: self.board_members()?,
            branches: Vec::new(),
        };
        if company.name.is_empty() {
            debug!("{NAME}: profile without a name");
        }
        Ok(company)
    }
}

/// Branch rows of the branch directory page. Rows lacking a name or an
/// address are placeholders and are skipped.
pub fn branches_from_page(html: &str) -> Result<Vec<Branch>> {
    let document = Html::parse_document(html);
    let row = parse_selector("table.rgMasterTable tbody tr")?;
    let td = parse_selector("td")?;

    Ok(document
        .select(&row)
        .filter(|tr| !tr.value().classes().any(|class| class == "rgNoRecords"))
        .filter_map(|tr| {
            let cells: Vec<ElementRef> = tr.select(&td).collect();
            let branch = Branch {
                branch_name: cell(&cells, 1),
                address: cell(&cells, 2),
                phone_number: split_clean(&cell(&cells, 3), ","),
                fax_number: split_clean(&cell(&cells, 4), ","),
            };
            (!branch.branch_name.is_empty() && !branch.address.is_empty()).then_some(branch)
        })
        .collect())
}

#[derive(Default)]
pub struct MemberCompanyScraper;

impl MemberCompanyScraper {
    pub fn new() -> Self {
        MemberCompanyScraper
    }

    async fn fetch_company(&self, ctx: &ScrapingContext, url: &str) -> Result<MemberCompany> {
        let body = ctx.request_client.get_body(url).await?;
        let (mut company, branch_url) = {
            let page = CompanyPage::parse(&body);
            (page.company()?, page.branch_url()?)
        };

        if let Some(href) = branch_url {
            let branch_url = absolute_url(ctx.scraping_config.set_base_url(), &href);
            match ctx.request_client.get_body(&branch_url).await {
                Ok(html) => company.branches = branches_from_page(&html)?,
                Err(e) => warn!("{NAME}: no branches for {}: {e}", company.name),
            }
        }
        Ok(company)
    }

    /// Every member company listed in each site language. A company whose
    /// profile fails is skipped.
    pub async fn scrape(&self, ctx: &ScrapingContext) -> Result<Vec<MemberCompany>> {
        let base_url = ctx.scraping_config.set_base_url();
        let mut links = Vec::new();
        for lang in LANGUAGES {
            let url = member_list_url(base_url, lang);
            match ctx.request_client.get_body(&url).await {
                Ok(html) => {
                    let found = company_links(&html, base_url)?;
                    info!("{NAME}: {} companies listed in {lang}", found.len());
                    links.extend(found);
                }
                Err(e) => warn!("{NAME}: skipping the {lang} member list: {e}"),
            }
        }
        if links.is_empty() {
            return Err(ScrapeError::NotFound {
                what: "member company links".to_string(),
            });
        }

        let results: Vec<(String, Result<MemberCompany>)> = stream::iter(links)
            .map(|url| async move {
                let company = self.fetch_company(ctx, &url).await;
                (url, company)
            })
            .buffered(ctx.scraping_config.scrape_concurrency())
            .collect()
            .await;

        Ok(results
            .into_iter()
            .filter_map(|(url, company)| match company {
                Ok(company) => Some(company),
                Err(e) => {
                    warn!("{NAME}: skipping {url}: {e}");
                    None
                }
            })
            .collect())
    }

    pub async fn scrape_to_file(&self, ctx: &ScrapingContext) -> Result<PathBuf> {
        let companies = self.scrape(ctx).await?;
        let path = write_json(ctx.scraping_config.output_dir(), OUTPUT_FILE, &companies)?;
        info!("{NAME}: saved {} companies to {}", companies.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"<html><body>
        <div class="title-member"><span class="text-primary">หมายเลขสมาชิก 13</span></div>
        <h2 data-element="element_heading">บริษัทหลักทรัพย์ ตัวอย่าง จำกัด</h2>
        <div data-element="element_text_editor"><a href="https://broker.example">เว็บไซต์</a></div>
        <table role="table"><tbody>
            <tr><td>1</td><td>บริษัท แม่ จำกัด</td><td>1,024.50%</td></tr>
            <tr><td>2</td><td>นาย ก</td><td>-</td></tr>
        </tbody></table>
        <table role="table"><tbody>
            <tr><td>1</td><td>นาง ข</td><td>ประธานกรรมการ</td></tr>
        </tbody></table>
        <div data-element="element_button_image"><a href="/branches/13">สาขา</a></div>
    </body></html>"#;

    #[test]
    fn reads_profile_tables() {
        let page = CompanyPage::parse(PROFILE);
        let company = page.company().unwrap();

        assert_eq!(company.no, Some(13));
        assert_eq!(company.name, "บริษัทหลักทรัพย์ ตัวอย่าง จำกัด");
        assert_eq!(company.website.as_deref(), Some("https://broker.example"));
        assert_eq!(company.shareholders.len(), 2);
        assert_eq!(company.shareholders[0].percent, Some(1024.5));
        assert_eq!(company.shareholders[1].percent, None);
        assert_eq!(
            company.board_of_directors,
            vec![BoardMember {
                no: 1,
                name: "นาง ข".to_string(),
                position: "ประธานกรรมการ".to_string(),
            }]
        );
        assert_eq!(page.branch_url().unwrap().as_deref(), Some("/branches/13"));
    }

    #[test]
    fn number_falls_back_to_captioned_span() {
        let page = CompanyPage::parse(
            "<span>Broker Number <span>Member</span><span>No. 42</span></span><h2>ABC</h2>",
        );
        assert_eq!(page.number().unwrap(), Some(42));
        assert_eq!(page.name().unwrap(), "ABC");
        assert_eq!(page.website().unwrap(), None);
    }

    #[test]
    fn branch_rows_need_name_and_address() {
        let html = r#"<table class="rgMasterTable"><tbody>
            <tr><td>1</td><td>สาขาสีลม</td><td>ถนนสีลม</td><td>02-111-1111, 02-111-2222</td>
            <td>02-111-3333</td></tr>
            <tr><td>2</td><td>สาขาว่าง</td><td></td><td></td><td></td></tr>
            <tr class="rgNoRecords"><td>ไม่มีข้อมูล</td></tr>
        </tbody></table>"#;
        let branches = branches_from_page(html).unwrap();
        assert_eq!(branches.len(), 1);
        assert_eq!(branches[0].phone_number, vec!["02-111-1111", "02-111-2222"]);
        assert_eq!(branches[0].fax_number, vec!["02-111-3333"]);
    }

    #[test]
    fn list_links_become_absolute() {
        let html = r#"<div class="py-3"><div class="card market-related-info">
            <a href="/th/market/information/member-list/13">13</a></div>
            <div class="card market-related-info"><a href="https://other.example/x">x</a></div>
        </div>"#;
        assert_eq!(
            company_links(html, "https://www.set.or.th").unwrap(),
            vec![
                "https://www.set.or.th/th/market/information/member-list/13",
                "https://other.example/x",
            ]
        );
    }
}
