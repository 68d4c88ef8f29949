use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{error::Result, scraping_context::ScrapingContext, writer::write_json};

pub const NAME: &str = "popular-research";
pub const OUTPUT_FILE: &str = "popular_research.json";
const POPULAR_PATH: &str = "/api/cms/v1/research-settrade/popular-research";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    fn as_query(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PopularPage {
    total_pages: i64,
    items: Vec<PopularItem>,
}

/// A most-read research article. The API leaves any field null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopularItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
}

pub struct PopularResearchScraper {
    frequency: Frequency,
}

impl Default for PopularResearchScraper {
    fn default() -> Self {
        Self::new(Frequency::Daily)
    }
}

impl PopularResearchScraper {
    pub fn new(frequency: Frequency) -> Self {
        PopularResearchScraper { frequency }
    }

    pub fn popular_url(&self, base_url: &str, page_size: u32, page_index: u32) -> String {
        format!(
            "{base_url}{POPULAR_PATH}?frequency={}&language=TH\
             &pageIndex={page_index}&pageSize={page_size}",
            self.frequency.as_query()
        )
    }

    /// Items of every page in listing order, up to `RESEARCH_MAX_PAGES` pages.
    pub async fn scrape(&self, ctx: &ScrapingContext) -> Result<Vec<PopularItem>> {
        let config = &ctx.scraping_config;
        let mut items = Vec::new();

        for page_index in 0..config.research_max_pages() {
            let url = self.popular_url(
                config.settrade_base_url(),
                config.research_page_size(),
                page_index,
            );
            let page: PopularPage = match ctx.request_client.get_json(&url).await {
                Ok(page) => page,
                Err(e) if page_index == 0 => return Err(e),
                Err(e) => {
                    warn!("{NAME}: stopping at page {page_index}: {e}");
                    break;
                }
            };
            info!(
                "{NAME}: page {}/{}, {} items",
                page_index + 1,
                page.total_pages,
                page.items.len()
            );
            items.extend(page.items);

            if i64::from(page_index) + 1 >= page.total_pages {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_popular_url() {
        assert_eq!(
            PopularResearchScraper::default().popular_url("https://www.settrade.com", 20, 2),
            "https://www.settrade.com/api/cms/v1/research-settrade/popular-research\
             ?frequency=Daily&language=TH&pageIndex=2&pageSize=20"
        );
        assert!(
            PopularResearchScraper::new(Frequency::Weekly)
                .popular_url("", 5, 0)
                .contains("frequency=Weekly")
        );
    }

    #[test]
    fn null_fields_are_kept_as_none() {
        let page: PopularPage = serde_json::from_str(
            r#"{"pageIbdex":0,"pageSize":20,"totalCount":1,"totalPages":1,
            "items":[{"title":"SET50 weekly","url":"/th/research/9","description":null}]}"#,
        )
        .unwrap();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items[0].title.as_deref(), Some("SET50 weekly"));
        assert!(page.items[0].description.is_none());
    }
}
