use std::path::PathBuf;

use chrono::{Local, NaiveDate, TimeDelta};
use futures::stream::{self, StreamExt};
use log::{info, warn};
use reqwest::Url;
use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};

use crate::{
    compare_page::parse_selector,
    error::{Result, ScrapeError},
    research_scraper::query_date,
    scraping_context::ScrapingContext,
    text_manipulators::clean_text,
    writer::write_json,
};

pub const NAME: &str = "news";
pub const OUTPUT_FILE: &str = "news.json";
const NEWS_PATH: &str = "/api/cms/v1/news/all";
const NEWS_REFERER_PATH: &str = "/th/news-and-articles/news/main";
const NEWS_PAGE_SIZE: u32 = 20;
const JS_CHALLENGE: &str = "Enable JavaScript and cookies to continue";

/// Where article bodies usually sit, tried in order before falling back to
/// the whole `body`.
const CONTENT_SELECTORS: [&str; 5] = [
    "#article .entry-content",
    "#the-post .entry-content",
    "div.article-content",
    "div.post-body",
    "article",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct NewsPage {
    page_index: i64,
    #[serde(rename = "totalpages")]
    total_pages: i64,
    items: Vec<NewsItem>,
    has_next_page: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsItem {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_content: Option<String>,
}

/// The publisher named in an article's host, `other` for the rest.
pub fn news_source(url: &str) -> &'static str {
    let host = Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_default();
    if host.contains("prachachat") {
        "prachachat"
    } else if host.contains("thunhoon") {
        "thunhoon"
    } else {
        "other"
    }
}

fn visible_text(element: ElementRef) -> String {
    let text: String = element
        .descendants()
        .filter_map(|node| {
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|e| e.name()))
                .is_some_and(|name| matches!(name, "script" | "style" | "noscript"));
            match node.value() {
                Node::Text(text) if !hidden => Some(&**text),
                _ => None,
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    clean_text(&text)
}

/// Readable text of an article page. `None` for empty pages and JavaScript
/// challenges.
pub fn article_content(html: &str) -> Result<Option<String>> {
    if html.contains(JS_CHALLENGE) {
        return Ok(None);
    }
    let document = Html::parse_document(html);
    for css in CONTENT_SELECTORS.iter().chain(&["body"]) {
        let selector = parse_selector(css)?;
        let text = document
            .select(&selector)
            .map(visible_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            return Ok(Some(text));
        }
    }
    Ok(None)
}

pub struct NewsScraper {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl NewsScraper {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        NewsScraper {
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

    pub fn news_url(&self, base_url: &str, category: &str, page_index: u32) -> String {
        format!(
            "{base_url}{NEWS_PATH}?cate={category}&fromDate={}&toDate={}\
             &orderBy=date&pageIndex={page_index}&pageSize={NEWS_PAGE_SIZE}",
            query_date(self.start_date),
            query_date(self.end_date),
        )
    }

    /// Listing items of every page while the API reports a next page, up to
    /// `NEWS_MAX_PAGES` pages, each with its article text.
    pub async fn scrape(&self, ctx: &ScrapingContext) -> Result<Vec<NewsItem>> {
        let config = &ctx.scraping_config;
        let referer = format!("{}{NEWS_REFERER_PATH}", config.settrade_base_url());
        let mut items = Vec::new();

        for page_index in 0..config.news_max_pages() {
            let url = self.news_url(config.settrade_base_url(), config.news_category(), page_index);
            let page: NewsPage = match ctx.request_client.get_cms_json(&url, &referer).await {
                Ok(page) => page,
                Err(e) if page_index == 0 => return Err(e),
                Err(e) => {
                    warn!("{NAME}: stopping at page {page_index}: {e}");
                    break;
                }
            };
            info!(
                "{NAME}: page {}/{}, {} items",
                page.page_index + 1,
                page.total_pages,
                page.items.len()
            );

            let mut page_items = page.items;
            attach_articles(ctx, &mut page_items).await;
            items.extend(page_items);

            if !page.has_next_page {
                break;
            }
        }

        Ok(items)
    }

    pub async fn scrape_to_file(&self, ctx: &ScrapingContext) -> Result<PathBuf> {
        let items = self.scrape(ctx).await?;
        let path = write_json(ctx.scraping_config.output_dir(), OUTPUT_FILE, &items)?;
        info!("{NAME}: saved {} items to {}", items.len(), path.display());
        Ok(path)
    }
}

async fn attach_articles(ctx: &ScrapingContext, items: &mut [NewsItem]) {
    let articles: Vec<Option<(String, Option<String>)>> = stream::iter(items.iter())
        .map(|item| article_for(ctx, item))
        .buffered(ctx.scraping_config.scrape_concurrency())
        .collect()
        .await;

    for (item, article) in items.iter_mut().zip(articles) {
        if let Some((source, content)) = article {
            item.source = Some(source);
            item.article_content = content;
        }
    }
}

async fn article_for(ctx: &ScrapingContext, item: &NewsItem) -> Option<(String, Option<String>)> {
    let item_url = item.url.as_deref().map(str::trim).filter(|url| !url.is_empty())?;
    let url = if item_url.starts_with('/') {
        format!("{}{item_url}", ctx.scraping_config.settrade_base_url())
    } else {
        item_url.to_string()
    };

    let content = match ctx.request_client.get_body(&url).await {
        Ok(body) => article_content(&body).unwrap_or_else(|e| {
            warn!("{NAME}: {e}");
            None
        }),
        Err(e) => {
            warn!("{NAME}: no article for {url}: {e}");
            None
        }
    };
    if content.is_none() {
        warn!("{NAME}: no readable text in {url}");
    }
    Some((news_source(&url).to_string(), content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_news_url() {
        let scraper = NewsScraper::new(
            NaiveDate::from_ymd_opt(2024, 7, 29).unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 5).unwrap(),
        );
        assert_eq!(
            scraper.news_url("https://www.settrade.com", "cat-1", 2),
            "https://www.settrade.com/api/cms/v1/news/all?cate=cat-1\
             &fromDate=29%2F07%2F2024&toDate=05%2F08%2F2024&orderBy=date&pageIndex=2&pageSize=20"
        );
    }

    #[test]
    fn negative_window_is_rejected() {
        assert!(matches!(
            NewsScraper::last_days(-1),
            Err(ScrapeError::DateWindow { days: -1 })
        ));
    }

    #[test]
    fn article_text_prefers_the_entry_content() {
        let html = r#"<html><head><style>.x{color:red}</style></head><body>
            <nav>หน้าแรก</nav>
            <div id="article"><div class="entry-content">
                <p>ตลาดหุ้นไทย&nbsp;ปิดบวก</p><script>var ad = 1;</script><p>10 จุด</p>
            </div></div>
        </body></html>"#;
        assert_eq!(
            article_content(html).unwrap().as_deref(),
            Some("ตลาดหุ้นไทย ปิดบวก 10 จุด")
        );
    }

    #[test]
    fn falls_back_to_body_and_skips_challenges() {
        let html = "<html><body><p>สรุปข่าว</p><script>track()</script></body></html>";
        assert_eq!(article_content(html).unwrap().as_deref(), Some("สรุปข่าว"));

        let challenge = "<html><body>Enable JavaScript and cookies to continue</body></html>";
        assert_eq!(article_content(challenge).unwrap(), None);
    }

    #[test]
    fn source_comes_from_the_host() {
        assert_eq!(news_source("https://www.prachachat.net/finance/news-1"), "prachachat");
        assert_eq!(news_source("https://thunhoon.com/article/2"), "thunhoon");
        assert_eq!(news_source("https://www.infoquest.co.th/3"), "other");
        assert_eq!(news_source("not a url"), "other");
    }

    #[test]
    fn listing_page_reads_paging_flags() {
        let page: NewsPage = serde_json::from_str(
            r#"{"pageIndex":0,"pageSize":20,"totalcount":21,"totalpages":2,"indexFrom":0,
            "items":[{"title":"SET ปิดบวก","url":"https://www.infoquest.co.th/1"}],
            "hasNextPage":true,"hasPreviousPage":false}"#,
        )
        .unwrap();
        assert!(page.has_next_page);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.items[0].title.as_deref(), Some("SET ปิดบวก"));
        assert!(page.items[0].article_content.is_none());
    }
}
