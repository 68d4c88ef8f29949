use std::{marker::PhantomData, path::PathBuf};

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use serde::Serialize;

use crate::{
    compare_page::{Column, ComparePage},
    error::{Result, ScrapeError},
    scraping_context::ScrapingContext,
    writer::write_json,
};

/// A product record read from one column of a BOT compare table.
pub trait CompareProduct: Serialize + Sized {
    /// Name used on the command line.
    const NAME: &'static str;
    /// Path of the compare app under the BOT base url.
    const CATEGORY: &'static str;
    const OUTPUT_FILE: &'static str;
    /// Comma separated product ids posted as `ProductIdList`.
    const PRODUCT_IDS: &'static str;

    /// Reads the product in `col`. Empty columns never reach this.
    fn from_column(page: &ComparePage, col: Column) -> Self;
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct CompareRequest<'a> {
    product_id_list: &'a str,
    page: u32,
    limit: u32,
}

/// Every record on a parsed page, in column order.
pub fn records_from_page<T: CompareProduct>(page: &ComparePage, limit: u32) -> Vec<T> {
    (1..=limit)
        .map(Column::new)
        .filter(|&col| {
            let empty = page.is_empty_column(col);
            if empty {
                debug!("{}: {col} is empty", T::NAME);
            }
            !empty
        })
        .map(|col| T::from_column(page, col))
        .collect()
}

pub struct CompareScraper<T> {
    product_ids: String,
    _product: PhantomData<T>,
}

impl<T: CompareProduct> Default for CompareScraper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CompareProduct> CompareScraper<T> {
    pub fn new() -> Self {
        Self::with_product_ids(T::PRODUCT_IDS)
    }

    pub fn with_product_ids(product_ids: impl Into<String>) -> Self {
        CompareScraper {
            product_ids: product_ids.into(),
            _product: PhantomData,
        }
    }

    async fn fetch_page(&self, ctx: &ScrapingContext, page: u32) -> Result<String> {
        let config = &ctx.scraping_config;
        let payload = CompareRequest {
            product_id_list: &self.product_ids,
            page,
            limit: config.page_limit(),
        };
        ctx.request_client
            .post_json_body(
                &config.compare_list_url(T::CATEGORY),
                &config.compare_referer(T::CATEGORY),
                &payload,
            )
            .await
    }

    pub async fn scrape(&self, ctx: &ScrapingContext) -> Result<Vec<T>> {
        let limit = ctx.scraping_config.page_limit();

        let first_body = self.fetch_page(ctx, 1).await?;
        let (total_pages, mut records) = {
            let page = ComparePage::parse(&first_body);
            if !page.has_compare_table() {
                return Err(ScrapeError::NotFound {
                    what: format!("compare table in {} page 1", T::NAME),
                });
            }
            (page.total_pages(), records_from_page::<T>(&page, limit))
        };
        info!("{}: page 1/{total_pages}, {} records", T::NAME, records.len());

        // Page 1 is already parsed above.
        let bodies: Vec<(u32, Result<String>)> = stream::iter(2..=total_pages)
            .map(|page| async move { (page, self.fetch_page(ctx, page).await) })
            .buffered(ctx.scraping_config.scrape_concurrency())
            .collect()
            .await;

        for (page_number, body) in bodies {
            match body {
                Ok(body) => {
                    let page = ComparePage::parse(&body);
                    if !page.has_compare_table() {
                        warn!(
                            "{}: skipping page {page_number}/{total_pages}: no compare table",
                            T::NAME
                        );
                        continue;
                    }
                    let page_records = records_from_page::<T>(&page, limit);
                    info!(
                        "{}: page {page_number}/{total_pages}, {} records",
                        T::NAME,
                        page_records.len()
                    );
                    records.extend(page_records);
                }
                Err(e) => warn!("{}: skipping page {page_number}/{total_pages}: {e}", T::NAME),
            }
        }

        Ok(records)
    }

    /// Scrapes every page and writes `T::OUTPUT_FILE` into the output dir.
    pub async fn scrape_to_file(&self, ctx: &ScrapingContext) -> Result<PathBuf> {
        let records = self.scrape(ctx).await?;
        let path = write_json(ctx.scraping_config.output_dir(), T::OUTPUT_FILE, &records)?;
        info!("{}: saved {} records to {}", T::NAME, records.len(), path.display());
        Ok(path)
    }
}
