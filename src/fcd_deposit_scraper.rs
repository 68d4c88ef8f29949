use std::path::PathBuf;

use futures::stream::{self, StreamExt};
use log::{info, warn};
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{ComparePage, parse_selector},
    error::{Result, ScrapeError},
    scraping_context::ScrapingContext,
    text_manipulators::{clean_amount_text, clean_text, first_integer, first_number},
    writer::write_json,
};

pub const NAME: &str = "fcd-deposits";
pub const OUTPUT_FILE: &str = "fcd_deposits.json";

/// One foreign currency deposit account row of the BOT FCD search table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FcdAccount {
    pub bank: String,
    pub account_currency: String,
    pub minimum_deposit_for_account_opening: Amount,
    pub annual_interest_rate: Amount,
    pub deposit_term: Term,
    pub minimum_average_balance: Amount,
    pub fee_if_balance_below_minimum: Amount,
    pub fee_if_account_inactive: CurrencyAmount,
    pub individual: CurrencyAmount,
    pub corporate: CurrencyAmount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Amount {
    pub original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Amount {
    fn from_text(text: String) -> Self {
        Amount {
            value: first_number(&clean_amount_text(&text)),
            original_text: text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Term {
    pub original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months: Option<i64>,
}

impl Term {
    /// Only terms counted in months (`เดือน`) carry a number.
    fn from_text(text: String) -> Self {
        Term {
            months: text
                .contains("เดือน")
                .then(|| first_integer(&text))
                .flatten(),
            original_text: text,
        }
    }
}

/// `50 USD` as a value and its currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CurrencyAmount {
    pub original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl CurrencyAmount {
    fn from_text(text: String) -> Self {
        let mut words = text.split_whitespace();
        let value = words.next().and_then(|word| first_number(&word.replace(',', "")));
        let currency = words.next().map(str::to_string);
        CurrencyAmount {
            original_text: text,
            value,
            currency,
        }
    }
}

#[derive(Serialize)]
struct FcdSearchRequest {
    #[serde(rename = "FICodeList")]
    fi_code_list: &'static str,
    #[serde(rename = "ORG_IP_ID_List")]
    org_ip_id_list: Option<()>,
    #[serde(rename = "AR_TP_ID_List")]
    ar_tp_id_list: Option<()>,
    #[serde(rename = "INT_RATE_TYPE_List")]
    int_rate_type_list: Option<()>,
    #[serde(rename = "INACT_PERIOD_List")]
    inact_period_list: Option<()>,
    #[serde(rename = "INACT_FEE")]
    inact_fee: Option<()>,
    #[serde(rename = "CCY_ID_List")]
    ccy_id_list: Option<()>,
    #[serde(rename = "Page")]
    page: u32,
    #[serde(rename = "DisplayOrder")]
    display_order: &'static str,
}

impl FcdSearchRequest {
    /// Every bank and currency, in the site's default order.
    fn unfiltered(page: u32) -> Self {
        FcdSearchRequest {
            fi_code_list: "",
            org_ip_id_list: None,
            ar_tp_id_list: None,
            int_rate_type_list: None,
            inact_period_list: None,
            inact_fee: None,
            ccy_id_list: None,
            page,
            display_order: "1",
        }
    }
}

fn cell_text(cells: &[ElementRef], index: usize) -> String {
    cells
        .get(index)
        .map(|cell| clean_text(&cell.text().collect::<String>()))
        .unwrap_or_default()
}

/// The cell's first text node, leaving out notes rendered below it.
fn leading_text(cells: &[ElementRef], index: usize) -> String {
    cells
        .get(index)
        .and_then(|cell| {
            cell.children()
                .filter_map(|child| child.value().as_text())
                .map(|text| clean_text(text))
                .find(|text| !text.is_empty())
        })
        .unwrap_or_default()
}

/// Every account row on one search result page. Rows without a bank or a
/// currency are layout rows and are skipped.
pub fn accounts_from_page(html: &str) -> Result<Vec<FcdAccount>> {
    let document = Html::parse_document(html);
    let rows = parse_selector("tr")?;
    let bank_name = parse_selector(".prod-bank")?;
    let cell = parse_selector("td")?;

    let accounts = document
        .select(&rows)
        .filter_map(|row| {
            let bank = row
                .select(&bank_name)
                .map(|el| clean_text(&el.text().collect::<String>()))
                .find(|text| !text.is_empty())?;
            let cells: Vec<ElementRef> = row.select(&cell).collect();
            let account_currency = cell_text(&cells, 2);
            if account_currency.is_empty() {
                return None;
            }
            Some(FcdAccount {
                bank,
                account_currency,
                minimum_deposit_for_account_opening: Amount::from_text(leading_text(&cells, 3)),
                annual_interest_rate: Amount::from_text(cell_text(&cells, 5)),
                deposit_term: Term::from_text(cell_text(&cells, 6)),
                minimum_average_balance: Amount::from_text(cell_text(&cells, 7)),
                fee_if_balance_below_minimum: Amount::from_text(cell_text(&cells, 8)),
                fee_if_account_inactive: CurrencyAmount::from_text(cell_text(&cells, 9)),
                individual: CurrencyAmount::from_text(cell_text(&cells, 10)),
                corporate: CurrencyAmount::from_text(cell_text(&cells, 11)),
            })
        })
        .collect();
    Ok(accounts)
}

#[derive(Default)]
pub struct FcdDepositScraper;

impl FcdDepositScraper {
    pub fn new() -> Self {
        FcdDepositScraper
    }

    async fn fetch_page(&self, ctx: &ScrapingContext, page: u32) -> Result<String> {
        let config = &ctx.scraping_config;
        ctx.request_client
            .post_json_body(
                &config.fcd_search_url(),
                &config.fcd_referer(),
                &FcdSearchRequest::unfiltered(page),
            )
            .await
    }

    pub async fn scrape(&self, ctx: &ScrapingContext) -> Result<Vec<FcdAccount>> {
        let first_body = self.fetch_page(ctx, 1).await?;
        let total_pages = ComparePage::parse(&first_body).total_pages();
        let mut accounts = accounts_from_page(&first_body)?;
        if accounts.is_empty() {
            return Err(ScrapeError::NotFound {
                what: format!("account rows in {NAME} page 1"),
            });
        }
        info!("{NAME}: page 1/{total_pages}, {} accounts", accounts.len());

        let bodies: Vec<(u32, Result<String>)> = stream::iter(2..=total_pages)
            .map(|page| async move { (page, self.fetch_page(ctx, page).await) })
            .buffered(ctx.scraping_config.scrape_concurrency())
            .collect()
            .await;

        for (page, body) in bodies {
            match body.and_then(|body| accounts_from_page(&body)) {
                Ok(page_accounts) => {
                    info!("{NAME}: page {page}/{total_pages}, {} accounts", page_accounts.len());
                    accounts.extend(page_accounts);
                }
                Err(e) => warn!("{NAME}: skipping page {page}/{total_pages}: {e}"),
            }
        }

        Ok(accounts)
    }

    pub async fn scrape_to_file(&self, ctx: &ScrapingContext) -> Result<PathBuf> {
        let accounts = self.scrape(ctx).await?;
        let path = write_json(ctx.scraping_config.output_dir(), OUTPUT_FILE, &accounts)?;
        info!("{NAME}: saved {} accounts to {}", accounts.len(), path.display());
        Ok(path)
    }
}
