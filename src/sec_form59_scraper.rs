use std::path::PathBuf;

use chrono::{Datelike, Local, NaiveDate, SecondsFormat};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use reqwest::Url;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::{
    compare_page::parse_selector,
    error::{Result, ScrapeError},
    scraping_context::ScrapingContext,
    text_manipulators::{clean_text, optional_text},
    writer::write_json,
};

pub const NAME: &str = "form59-reports";
pub const OUTPUT_FILE: &str = "form59_reports.json";
pub const HISTORY_NAME: &str = "form59-history";
pub const HISTORY_OUTPUT_FILE: &str = "form59_history.json";

const LISTING_PATH: &str = "/public/idisc/th/r59";
const HISTORY_PATH: &str = "/public/idisc/th/Viewmore/r59-2";
const REPORT_PATH: &str = "/r59/publicapi/report";
const COMPANY_OPTIONS: &str = "select[name='ctl00$CPH$ddlCompany'] option";
const HISTORY_START_YEAR: i32 = 2012;
const BUDDHIST_ERA_OFFSET: i32 = 543;
const HISTORY_COLUMNS: usize = 9;

/// The query parameters of a report link on the SEC pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLink {
    pub batch_no: String,
    pub trans_id: String,
    pub reporter: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ReportRequest<'a> {
    batch_no: &'a str,
    lang: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct ReportResponse {
    report: Option<Report>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct Report {
    batch_no: Option<String>,
    company: Option<String>,
    reporter: Option<String>,
    position: Option<String>,
    transaction_list: Option<Vec<Transaction>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct Transaction {
    trans_executor: Option<String>,
    secu_type: Option<String>,
    trans_date: Option<String>,
    outstanding_before: Option<String>,
    trans_volumn: Option<String>,
    avg_price: Option<String>,
    outstanding_after: Option<String>,
    trans_type: Option<String>,
    market_source: Option<String>,
    target_info: Option<String>,
    record_status: Option<String>,
}

/// One securities transaction of a form 59 report, flattened with the
/// report's header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Form59Record {
    pub batch_no: String,
    pub company: String,
    pub reporter: String,
    pub position: String,
    pub trans_executor: String,
    pub secu_type: String,
    pub trans_date: Option<String>,
    pub outstanding_before: String,
    pub trans_volumn: String,
    pub avg_price: Option<f64>,
    pub outstanding_after: String,
    pub trans_type: String,
    pub market_source: String,
    pub target_info: String,
    pub record_status: String,
    pub trans_id: String,
    pub reporter_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// A row of a company's form 59 history table. `note` holds the linked
/// report's transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Form59HistoryRecord {
    pub company_name: String,
    pub reporter: String,
    pub relation: String,
    pub asset_type: String,
    pub trans_date: String,
    pub amount: String,
    pub price: String,
    pub market_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    pub note: Vec<Form59Record>,
}

impl Report {
    fn records(self, link: &ReportLink, language: Option<&str>) -> Vec<Form59Record> {
        let Report {
            batch_no,
            company,
            reporter,
            position,
            transaction_list,
        } = self;

        transaction_list
            .unwrap_or_default()
            .into_iter()
            .map(|t| Form59Record {
                batch_no: batch_no.clone().unwrap_or_default(),
                company: company.clone().unwrap_or_default(),
                reporter: reporter.clone().unwrap_or_default(),
                position: position.clone().unwrap_or_default(),
                trans_executor: t.trans_executor.unwrap_or_default(),
                secu_type: t.secu_type.unwrap_or_default(),
                trans_date: t.trans_date.as_deref().and_then(iso_date),
                outstanding_before: t.outstanding_before.unwrap_or_default(),
                trans_volumn: t.trans_volumn.unwrap_or_default(),
                avg_price: t.avg_price.as_deref().and_then(price),
                outstanding_after: t.outstanding_after.unwrap_or_default(),
                trans_type: t.trans_type.unwrap_or_default(),
                market_source: t.market_source.unwrap_or_default(),
                target_info: t.target_info.unwrap_or_default(),
                record_status: t.record_status.unwrap_or_default(),
                trans_id: link.trans_id.clone(),
                reporter_url: link.reporter.clone(),
                language: language.map(str::to_string),
            })
            .collect()
    }
}

/// `dd/mm/yyyy` as an RFC 3339 timestamp at midnight UTC.
pub fn iso_date(text: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(text.trim(), "%d/%m/%Y").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn price(text: &str) -> Option<f64> {
    text.replace(',', "").trim().parse().ok()
}

/// `yyyymmdd` in the Buddhist era, as the history search expects.
fn buddhist_date(date: NaiveDate) -> String {
    format!(
        "{:04}{:02}{:02}",
        date.year() + BUDDHIST_ERA_OFFSET,
        date.month(),
        date.day()
    )
}

/// Reads `batchNo`, `transId` and `reporter` from a report link, resolved
/// against the page it was found on. Links missing any of them are ignored.
pub fn report_link(page_url: &str, href: &str) -> Option<ReportLink> {
    let url = Url::parse(page_url).ok()?.join(href).ok()?;
    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    };
    Some(ReportLink {
        batch_no: param("batchNo")?,
        trans_id: param("transId")?,
        reporter: param("reporter")?,
    })
}

fn element_text(element: ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

/// Report links of the latest filings table, one per row.
pub fn report_links(html: &str, page_url: &str) -> Result<Vec<ReportLink>> {
    let document = Html::parse_document(html);
    let rows = parse_selector("tr")?;
    let anchor = parse_selector("td.RgCol_Center a")?;

    let mut links = Vec::new();
    for row in document.select(&rows) {
        let Some(href) = row.select(&anchor).next().and_then(|a| a.value().attr("href")) else {
            continue;
        };
        match report_link(page_url, href) {
            Some(link) => links.push(link),
            None => warn!("{NAME}: no report parameters in {href}"),
        }
    }
    Ok(links)
}

/// Company ids offered by the listing's company dropdown.
pub fn company_ids(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let options = parse_selector(COMPANY_OPTIONS)?;
    Ok(document
        .select(&options)
        .filter_map(|option| option.value().attr("value"))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect())
}

/// Rows of a company history page, each with the report link of its last
/// column when there is one.
pub fn history_rows(
    html: &str,
    page_url: &str,
) -> Result<Vec<(Form59HistoryRecord, Option<ReportLink>)>> {
    let document = Html::parse_document(html);
    let rows = parse_selector("tr")?;
    let cells = parse_selector("td")?;
    let anchor = parse_selector("a")?;

    let mut history = Vec::new();
    for row in document.select(&rows) {
        let tds: Vec<ElementRef> = row.select(&cells).collect();
        if tds.len() < HISTORY_COLUMNS {
            continue;
        }
        let text = |i: usize| element_text(tds[i]);
        let last = tds[HISTORY_COLUMNS - 1];
        let link = last
            .select(&anchor)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| report_link(page_url, href));

        let record = Form59HistoryRecord {
            company_name: text(0),
            reporter: text(1),
            relation: text(2),
            asset_type: text(3),
            trans_date: text(4),
            amount: text(5),
            price: text(6),
            market_source: text(7),
            remark: if link.is_some() {
                None
            } else {
                optional_text(&element_text(last))
            },
            note: Vec::new(),
        };
        history.push((record, link));
    }
    Ok(history)
}

async fn fetch_report(ctx: &ScrapingContext, batch_no: &str, lang: &str) -> Result<Report> {
    let url = format!("{}{REPORT_PATH}", ctx.scraping_config.sec_base_url());
    let response: ReportResponse = ctx
        .request_client
        .post_json(&url, &ReportRequest { batch_no, lang })
        .await?;
    debug!("{NAME}: fetched batch {batch_no} ({lang})");
    response.report.ok_or_else(|| ScrapeError::NotFound {
        what: format!("report of batch {batch_no}"),
    })
}

fn listing_url(ctx: &ScrapingContext) -> String {
    format!("{}{LISTING_PATH}", ctx.scraping_config.sec_base_url())
}

/// Latest form 59 filings (securities holdings changes of executives) from
/// the SEC, one record per transaction in English.
#[derive(Default)]
pub struct Form59Scraper;

impl Form59Scraper {
    pub fn new() -> Self {
        Form59Scraper
    }

    pub async fn scrape(&self, ctx: &ScrapingContext) -> Result<Vec<Form59Record>> {
        let listing_url = listing_url(ctx);
        let html = ctx.request_client.get_body(&listing_url).await?;
        let links = report_links(&html, &listing_url)?;
        if links.is_empty() {
            warn!("{NAME}: no reports listed on {listing_url}");
        }

        let reports: Vec<Vec<Form59Record>> = stream::iter(&links)
            .map(|link| async move {
                match fetch_report(ctx, &link.batch_no, "En").await {
                    Ok(report) => dated_and_priced(report.records(link, None)),
                    Err(e) => {
                        warn!("{NAME}: skipping batch {}: {e}", link.batch_no);
                        Vec::new()
                    }
                }
            })
            .buffered(ctx.scraping_config.scrape_concurrency())
            .collect()
            .await;

        let records: Vec<Form59Record> = reports.into_iter().flatten().collect();
        info!("{NAME}: {} transactions from {} reports", records.len(), links.len());
        Ok(records)
    }

    pub async fn scrape_to_file(&self, ctx: &ScrapingContext) -> Result<PathBuf> {
        let records = self.scrape(ctx).await?;
        let path = write_json(ctx.scraping_config.output_dir(), OUTPUT_FILE, &records)?;
        info!("{NAME}: saved {} records to {}", records.len(), path.display());
        Ok(path)
    }
}

fn dated_and_priced(records: Vec<Form59Record>) -> Vec<Form59Record> {
    records
        .into_iter()
        .filter(|record| {
            let complete = record.trans_date.is_some() && record.avg_price.is_some();
            if !complete {
                warn!(
                    "{NAME}: dropping a transaction of batch {} without date or price",
                    record.batch_no
                );
            }
            complete
        })
        .collect()
}

/// Form 59 history of the first `FORM59_MAX_COMPANIES` companies in the
/// listing's dropdown, with each row's report read in Thai.
pub struct Form59HistoryScraper {
    from: NaiveDate,
    to: NaiveDate,
}

impl Form59HistoryScraper {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Form59HistoryScraper { from, to }
    }

    /// From the start of 2012 up to today.
    pub fn until_today() -> Self {
        let to = Local::now().date_naive();
        let from = NaiveDate::from_ymd_opt(HISTORY_START_YEAR, 1, 1).unwrap_or(to);
        Self::new(from, to)
    }

    pub fn history_url(&self, base_url: &str, company_id: &str) -> String {
        format!(
            "{base_url}{HISTORY_PATH}?UniqueIdReference={company_id}&DateType=1\
             &DateFrom={}&DateTo={}",
            buddhist_date(self.from),
            buddhist_date(self.to),
        )
    }

    pub async fn scrape(&self, ctx: &ScrapingContext) -> Result<Vec<Form59HistoryRecord>> {
        let config = &ctx.scraping_config;
        let html = ctx.request_client.get_body(&listing_url(ctx)).await?;
        let mut companies = company_ids(&html)?;
        if companies.is_empty() {
            return Err(ScrapeError::NotFound {
                what: "form 59 company list".to_string(),
            });
        }
        companies.truncate(config.form59_max_companies());

        let mut records = Vec::new();
        for company in &companies {
            let url = self.history_url(config.sec_base_url(), company);
            let rows = match ctx.request_client.get_body(&url).await {
                Ok(html) => history_rows(&html, &url)?,
                Err(e) => {
                    warn!("{HISTORY_NAME}: skipping company {company}: {e}");
                    continue;
                }
            };
            info!("{HISTORY_NAME}: company {company} has {} rows", rows.len());

            let filled: Vec<Form59HistoryRecord> = stream::iter(rows)
                .map(|(mut record, link)| async move {
                    if let Some(link) = link {
                        match fetch_report(ctx, &link.batch_no, "Th").await {
                            Ok(report) => record.note = report.records(&link, Some("Th")),
                            Err(e) => warn!("{HISTORY_NAME}: no note for {}: {e}", link.batch_no),
                        }
                    }
                    record
                })
                .buffered(config.scrape_concurrency())
                .collect()
                .await;
            records.extend(filled);
        }
        Ok(records)
    }

    pub async fn scrape_to_file(&self, ctx: &ScrapingContext) -> Result<PathBuf> {
        let records = self.scrape(ctx).await?;
        let path = write_json(ctx.scraping_config.output_dir(), HISTORY_OUTPUT_FILE, &records)?;
        info!("{HISTORY_NAME}: saved {} rows to {}", records.len(), path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_URL: &str = "https://market.sec.or.th/public/idisc/th/r59";

    #[test]
    fn report_links_keep_their_query_parameters() {
        let html = r#"<table>
            <tr><th>บริษัท</th></tr>
            <tr><td>PTT</td><td class="RgCol_Center">
                <a href="r59/report?batchNo=B1&transId=T1&reporter=Somchai%20K">view</a></td></tr>
            <tr><td>AOT</td><td class="RgCol_Center">
                <a href="r59/report?batchNo=B2">view</a></td></tr>
        </table>"#;
        let links = report_links(html, PAGE_URL).unwrap();
        assert_eq!(
            links,
            vec![ReportLink {
                batch_no: "B1".to_string(),
                trans_id: "T1".to_string(),
                reporter: "Somchai K".to_string(),
            }]
        );
    }

    #[test]
    fn dates_become_utc_timestamps() {
        assert_eq!(iso_date("05/08/2024").as_deref(), Some("2024-08-05T00:00:00Z"));
        assert_eq!(iso_date("2024-08-05"), None);
        assert_eq!(price("1,234.50"), Some(1234.5));
        assert_eq!(price("-"), None);
    }

    #[test]
    fn every_transaction_carries_the_report_header() {
        let response: ReportResponse = serde_json::from_str(
            r#"{"ResponseStatus":{"Seq":0,"Value":"OK","TextTh":null,"TextEn":null},
            "Report":{"BatchNo":"B1","Company":"PTT PUBLIC COMPANY LIMITED",
            "Reporter":"Somchai K","Position":"Director","TransactionList":[
            {"SecuType":"Common Share","TransDate":"01/08/2024","TransVolumn":"10,000",
             "AvgPrice":"34.25","TransType":"Buy"},
            {"SecuType":"Warrant","TransDate":"","AvgPrice":null,"TransType":"Transfer"}]}}"#,
        )
        .unwrap();
        let link = ReportLink {
            batch_no: "B1".to_string(),
            trans_id: "T1".to_string(),
            reporter: "Somchai K".to_string(),
        };
        let records = response.report.unwrap().records(&link, None);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].company, "PTT PUBLIC COMPANY LIMITED");
        assert_eq!(records[0].avg_price, Some(34.25));
        assert_eq!(records[0].trans_id, "T1");
        assert_eq!(records[1].position, "Director");

        let kept = dated_and_priced(records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].trans_date.as_deref(), Some("2024-08-01T00:00:00Z"));
    }

    #[test]
    fn history_window_uses_buddhist_years() {
        let scraper = Form59HistoryScraper::new(
            NaiveDate::from_ymd_opt(2012, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 8, 5).unwrap(),
        );
        assert_eq!(
            scraper.history_url("https://market.sec.or.th", "0000012345"),
            "https://market.sec.or.th/public/idisc/th/Viewmore/r59-2\
             ?UniqueIdReference=0000012345&DateType=1&DateFrom=25550101&DateTo=25670805"
        );
    }

    #[test]
    fn history_rows_split_linked_and_plain_notes() {
        let html = r#"<table>
            <tr><td>PTT</td><td>นาย ก</td><td>กรรมการ</td><td>หุ้นสามัญ</td><td>01/08/2567</td>
                <td>10,000</td><td>34.25</td><td>ตลาดหลักทรัพย์</td>
                <td><a href="/r59/report?batchNo=B1&transId=T1&reporter=A">ดู</a></td></tr>
            <tr><td>PTT</td><td>นาง ข</td><td>คู่สมรส</td><td>หุ้นสามัญ</td><td>02/08/2567</td>
                <td>500</td><td>35.00</td><td>นอกตลาด</td>
                <td>โอนระหว่างกัน</td></tr>
            <tr><td colspan="9">ไม่มีข้อมูลเพิ่มเติม</td></tr>
        </table>"#;
        let rows = history_rows(html, PAGE_URL).unwrap();
        assert_eq!(rows.len(), 2);

        let (linked, link) = &rows[0];
        assert_eq!(linked.relation, "กรรมการ");
        assert_eq!(link.as_ref().map(|l| l.batch_no.as_str()), Some("B1"));
        assert!(linked.remark.is_none());

        let (plain, link) = &rows[1];
        assert!(link.is_none());
        assert_eq!(plain.remark.as_deref(), Some("โอนระหว่างกัน"));
    }

    #[test]
    fn dropdown_values_are_company_ids() {
        let html = r#"<select name="ctl00$CPH$ddlCompany">
            <option value="">-- ทั้งหมด --</option>
            <option value="0000012345">PTT</option>
            <option value="0000067890">AOT</option>
        </select>"#;
        assert_eq!(company_ids(html).unwrap(), vec!["0000012345", "0000067890"]);
    }
}
