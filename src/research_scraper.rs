use std::path::PathBuf;

use chrono::{Local, NaiveDate, TimeDelta};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{Result, ScrapeError},
    scraping_context::ScrapingContext,
    text_manipulators::{decode_unicode_slashes, nuxt_script, static_regex},
    writer::write_json,
};

pub const NAME: &str = "research";
pub const OUTPUT_FILE: &str = "research.json";
const SEARCH_PATH: &str = "/api/cms/v1/research-settrade/search";

static_regex!(NUXT_FILE_URL, r#""fileUrl"\s*:\s*"(https?://[^"]+?\.pdf)""#);
static_regex!(ANY_PDF_URL, r#"https?://[^\s"'<>\\]+?\.pdf"#);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchPage {
    pub research_items: ResearchItems,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResearchItems {
    pub index_from: i64,
    pub page_index: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub items: Vec<ResearchItem>,
}

/// One listing entry. The API leaves any of these null, and fields it adds
/// later are carried through `extra` untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResearchItem {
    pub uuid: Option<String>,
    pub render_type: Option<String>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub is_suggest_tag: Option<bool>,
    pub is_today_tag: Option<bool>,
    pub symbol: Option<String>,
    pub symbol_id: Option<String>,
    pub market: Option<String>,
    pub cate_uuid: Option<String>,
    pub sub_cate_uuid: Option<String>,
    pub cate_code: Option<String>,
    pub sub_cate_code: Option<String>,
    pub cate_name: Option<String>,
    pub sub_cate_name: Option<String>,
    pub start_date: Option<String>,
    pub source: Option<String>,
    pub views: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Finds the report PDF on a research detail page. The `fileUrl` inside the
/// NUXT state wins; otherwise the first PDF link anywhere on the page.
pub fn extract_file_url(html: &str) -> Option<String> {
    let html = decode_unicode_slashes(html);
    nuxt_script(&html)
        .and_then(|script| NUXT_FILE_URL.captures(script))
        .map(|captures| captures[1].to_string())
        .or_else(|| ANY_PDF_URL.find(&html).map(|m| m.as_str().to_string()))
}

/// `dd/mm/yyyy` with the slashes already percent encoded.
pub(crate) fn query_date(date: NaiveDate) -> String {
    date.format("%d%%2F%m%%2F%Y").to_string()
}

pub struct ResearchScraper {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl ResearchScraper {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        ResearchScraper {
            start_date,
            end_date,
        }
    }

    /// Window of `days` days ending today.
    pub fn last_days(days: i64) -> Result<Self> {
        let end_date = Local::now().date_naive();
        let start_date = TimeDelta::try_days(days)
            .filter(|window| *window >= TimeDelta::zero())
            .and_then(|window| end_date.checked_sub_signed(window))
            .ok_or(ScrapeError::DateWindow { days })?;
        Ok(Self::new(start_date, end_date))
    }

    pub fn search_url(&self, base_url: &str, page_size: u32, page_index: u32) -> String {
        format!(
            "{base_url}{SEARCH_PATH}?startDate={}&endDate={}\
             &pageSize={page_size}&pageIndex={page_index}",
            query_date(self.start_date),
            query_date(self.end_date),
        )
    }

    pub async fn scrape(&self, ctx: &ScrapingContext) -> Result<Vec<ResearchPage>> {
        let config = &ctx.scraping_config;
        let mut pages = Vec::new();

        for page_index in 0..config.research_max_pages() {
            let url = self.search_url(
                config.settrade_base_url(),
                config.research_page_size(),
                page_index,
            );
            let mut page: ResearchPage = match ctx.request_client.get_json(&url).await {
                Ok(page) => page,
                Err(e) if page_index == 0 => return Err(e),
                Err(e) => {
                    warn!("{NAME}: stopping at page {page_index}: {e}");
                    break;
                }
            };

            attach_file_urls(ctx, &mut page.research_items.items).await;
            let total_pages = page.research_items.total_pages;
            info!(
                "{NAME}: page {}/{total_pages}, {} items",
                page_index + 1,
                page.research_items.items.len()
            );
            pages.push(page);

            if i64::from(page_index) + 1 >= total_pages {
                break;
            }
        }

        Ok(pages)
    }

    pub async fn scrape_to_file(&self, ctx: &ScrapingContext) -> Result<PathBuf> {
        let pages = self.scrape(ctx).await?;
        let path = write_json(ctx.scraping_config.output_dir(), OUTPUT_FILE, &pages)?;
        info!("{NAME}: saved {} pages to {}", pages.len(), path.display());
        Ok(path)
    }
}

async fn attach_file_urls(ctx: &ScrapingContext, items: &mut [ResearchItem]) {
    let found: Vec<Option<String>> = stream::iter(items.iter())
        .map(|item| file_url_for(ctx, item))
        .buffered(ctx.scraping_config.scrape_concurrency())
        .collect()
        .await;

    for (item, file_url) in items.iter_mut().zip(found) {
        if file_url.is_some() {
            item.file_url = file_url;
        }
    }
}

async fn file_url_for(ctx: &ScrapingContext, item: &ResearchItem) -> Option<String> {
    let item_url = item.url.as_deref().map(str::trim).filter(|url| !url.is_empty())?;
    let url = if item_url.starts_with('/') {
        format!("{}{item_url}", ctx.scraping_config.settrade_base_url())
    } else {
        item_url.to_string()
    };

    match ctx.request_client.get_body(&url).await {
        Ok(body) => {
            let file_url = extract_file_url(&body);
            match &file_url {
                Some(file_url) => debug!("{NAME}: {url} -> {file_url}"),
                None => warn!("{NAME}: no pdf link in {url}"),
            }
            file_url
        }
        Err(e) => {
            warn!("{NAME}: skipping {url}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_the_nuxt_file_url() {
        let html = r#"<html><a href="https://cdn.example/other.pdf">x</a>
            <script>window.__NUXT__=(function(a){return {data:[{
            "fileUrl":"https://media.example/report.pdf"}]}}(1));</script>
            </html>"#;
        assert_eq!(
            extract_file_url(html).as_deref(),
            Some("https://media.example/report.pdf")
        );
    }

    #[test]
    fn falls_back_to_any_pdf_link() {
        let html =
            r#"<script>window.__NUXT__={}</script><a href="https://cdn.example/a.pdf">a</a>"#;
        assert_eq!(
            extract_file_url(html).as_deref(),
            Some("https://cdn.example/a.pdf")
        );
        assert_eq!(extract_file_url("<html>no report</html>"), None);
    }

    #[test]
    fn builds_search_url_with_encoded_dates() {
        let scraper = ResearchScraper::new(
            NaiveDate::from_ymd_opt(2024, 8, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 9).unwrap(),
        );
        assert_eq!(
            scraper.search_url("https://www.settrade.com", 20, 1),
            "https://www.settrade.com/api/cms/v1/research-settrade/search\
             ?startDate=02%2F08%2F2024&endDate=09%2F08%2F2024&pageSize=20&pageIndex=1"
        );
    }

    #[test]
    fn last_days_ends_today() {
        let scraper = ResearchScraper::last_days(7).unwrap();
        assert_eq!(scraper.end_date - scraper.start_date, TimeDelta::days(7));
        assert_eq!(scraper.end_date, Local::now().date_naive());
    }

    #[test]
    fn oversized_windows_are_errors() {
        assert!(matches!(
            ResearchScraper::last_days(i64::MAX),
            Err(ScrapeError::DateWindow { days: i64::MAX })
        ));
        assert!(ResearchScraper::last_days(400_000_000).is_err());
        assert!(ResearchScraper::last_days(-1).is_err());
    }

    #[test]
    fn listing_keeps_api_field_names() {
        let json = r#"{"researchItems":{"indexFrom":0,"pageIndex":0,"pageSize":20,
            "totalCount":1,"totalPages":1,"items":[{"title":"SET outlook","url":"/th/research/1",
            "cateName":"Strategy","subCateName":"Daily","startDate":"2024-08-02",
            "source":"KS"}]}}"#;
        let page: ResearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.research_items.items[0].cate_name.as_deref(), Some("Strategy"));

        let value = serde_json::to_value(&page).unwrap();
        assert!(value["researchItems"]["items"][0].get("fileUrl").is_none());
        assert_eq!(value["researchItems"]["totalPages"], 1);
    }

    #[test]
    fn null_fields_and_unknown_keys_survive() {
        let json = r#"{"uuid":"6f1c","renderType":"file","title":"PTT earnings","url":null,
            "isSuggestTag":false,"isTodayTag":true,"symbol":"PTT","symbolId":"S-PTT","market":"SET",
            "cateCode":"company","subCateCode":"flash","cateName":"Company","subCateName":null,
            "startDate":"2024-08-05T00:00:00","source":null,"views":42,"thumbnail":"/img/1.png"}"#;
        let item: ResearchItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.symbol.as_deref(), Some("PTT"));
        assert_eq!(item.views, Some(42));
        assert_eq!(item.is_today_tag, Some(true));
        assert!(item.source.is_none());
        assert!(item.url.is_none());
        assert_eq!(item.extra["thumbnail"], "/img/1.png");

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["symbolId"], "S-PTT");
        assert_eq!(value["subCateCode"], "flash");
        assert_eq!(value["thumbnail"], "/img/1.png");
        assert!(value["source"].is_null());
    }
}
