use std::{fs, path::PathBuf};

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::Result,
    scraping_context::ScrapingContext,
    text_manipulators::{nuxt_script, static_regex},
    writer::write_json,
};

pub const NAME: &str = "analyst-consensus";
pub const OUTPUT_FILE: &str = "analyst_consensus.json";

static_regex!(NUXT_PAIR, r#"(\w+):("(?:[^"\\]|\\.)*"|[^,{}\[\]]+)"#);
static_regex!(
    URL,
    concat!(
        r"https?://(www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b",
        r"[-a-zA-Z0-9()@:%_+.~#?&/=]*"
    )
);

/// Objects holding any of these keys belong to the quote charts, not to the
/// analyst table.
const CHART_KEYS: [&str; 10] = [
    "datetime",
    "localDatetime",
    "price",
    "volume",
    "value",
    "highlightData",
    "quotationChartAccumulated",
    "historicalTrading",
    "esg",
    "sectorComparison",
];

const JS_ESCAPES: [(&str, &str); 6] = [
    ("\\u003c", "<"),
    ("\\u003e", ">"),
    ("\\u0026", "&"),
    ("\\u0022", "\""),
    ("\\u0027", "'"),
    ("\\u002F", "/"),
];

/// The consensus overview saved from settrade, extended with the analyst
/// table of each stock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConsensusOverview {
    pub market_time: Option<String>,
    pub overall: Vec<StockConsensus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StockConsensus {
    pub symbol: String,
    pub last_price: Option<f64>,
    pub total_coverage: Option<i64>,
    pub buy: Option<i64>,
    pub hold: Option<i64>,
    pub sell: Option<i64>,
    pub recommend_type: Option<String>,
    pub median_target_price: Option<f64>,
    pub average_target_price: Option<f64>,
    pub bullish: Option<f64>,
    pub bearish: Option<f64>,
    pub analyst_data: Vec<AnalystEstimate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalystEstimate {
    pub id: Option<String>,
    pub symbol: Option<String>,
    pub broker_name: Option<String>,
    #[serde(rename = "brokerURL")]
    pub broker_url: Option<String>,
    pub analyst_name: Option<String>,
    pub current_year_eps: Option<f64>,
    pub next_year_eps: Option<f64>,
    pub current_year_net_profit: Option<f64>,
    pub next_year_net_profit: Option<f64>,
    pub current_year_pe: Option<f64>,
    pub next_year_pe: Option<f64>,
    pub current_year_pbv: Option<f64>,
    pub next_year_pbv: Option<f64>,
    pub current_year_div: Option<f64>,
    pub next_year_div: Option<f64>,
    pub target_price: Option<f64>,
    pub target_price_change: Option<f64>,
    pub target_price_percent_change: Option<f64>,
    pub recommend: Option<String>,
    pub recommend_type: Option<String>,
    pub last_update_date: Option<String>,
    #[serde(rename = "lastResearchURL")]
    pub last_research_url: Option<String>,
    #[serde(rename = "fullResearchURL")]
    pub full_research_url: Option<String>,
    pub last_research_id: Option<String>,
    pub full_research_id: Option<String>,
}

impl AnalystEstimate {
    fn set(&mut self, key: &str, raw: &str) {
        let number = || nuxt_text(raw).and_then(|t| t.parse::<f64>().ok());
        let url = || nuxt_text(raw).and_then(|t| URL.find(&t).map(|m| m.as_str().to_string()));
        let text = nuxt_text(raw);
        match key {
            "id" => self.id = text,
            "symbol" => self.symbol = text,
            "brokerName" => self.broker_name = text,
            "brokerURL" => self.broker_url = url(),
            "analystName" => self.analyst_name = text,
            "currentYearEps" => self.current_year_eps = number(),
            "nextYearEps" => self.next_year_eps = number(),
            "currentYearNetProfit" => self.current_year_net_profit = number(),
            "nextYearNetProfit" => self.next_year_net_profit = number(),
            "currentYearPe" => self.current_year_pe = number(),
            "nextYearPe" => self.next_year_pe = number(),
            "currentYearPbv" => self.current_year_pbv = number(),
            "nextYearPbv" => self.next_year_pbv = number(),
            "currentYearDiv" => self.current_year_div = number(),
            "nextYearDiv" => self.next_year_div = number(),
            "targetPrice" => self.target_price = number(),
            "targetPriceChange" => self.target_price_change = number(),
            "targetPricePercentChange" => self.target_price_percent_change = number(),
            "recommend" => self.recommend = text,
            "recommendType" => self.recommend_type = text,
            "lastUpdateDate" => self.last_update_date = text,
            "lastResearchURL" => self.last_research_url = url(),
            "fullResearchURL" => self.full_research_url = text,
            "lastResearchId" => self.last_research_id = text,
            "fullResearchId" => self.full_research_id = text,
            _ => debug!("{NAME}: ignoring key {key}"),
        }
    }
}

/// A payload value as text: quotes and escaped quotes removed, `null` and
/// empty strings dropped.
fn nuxt_text(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let unquoted = raw
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(raw);
    let text = unquoted.replace("\\\"", "").trim().to_string();
    (!text.is_empty() && text != "null").then_some(text)
}

fn decode_js_escapes(text: &str) -> String {
    JS_ESCAPES
        .iter()
        .fold(text.to_string(), |acc, (escape, plain)| acc.replace(escape, plain))
}

/// Rows of the analyst table embedded in the page's `window.__NUXT__` payload.
pub fn analyst_estimates(html: &str) -> Vec<AnalystEstimate> {
    let Some(script) = nuxt_script(html) else {
        return Vec::new();
    };
    let decoded = decode_js_escapes(script);

    decoded
        .split("},{")
        .filter_map(|part| {
            let name = part.find("analystName")?;
            let start = part[..name].rfind('{').map_or(0, |i| i + 1);
            let end = part[name..].find('}').map_or(part.len(), |i| name + i);
            Some(&part[start..end])
        })
        .filter(|object| !CHART_KEYS.iter().any(|key| object.contains(key)))
        .map(|object| {
            let mut estimate = AnalystEstimate::default();
            for pair in NUXT_PAIR.captures_iter(object) {
                estimate.set(&pair[1], &pair[2]);
            }
            estimate
        })
        .collect()
}

pub fn consensus_url(base_url: &str, symbol: &str) -> String {
    format!("{base_url}/th/equities/quote/{symbol}/analyst-consensus")
}

#[derive(Default)]
pub struct AnalystConsensusScraper;

impl AnalystConsensusScraper {
    pub fn new() -> Self {
        AnalystConsensusScraper
    }

    pub fn load_overview(&self, ctx: &ScrapingContext) -> Result<ConsensusOverview> {
        let raw = fs::read_to_string(ctx.scraping_config.consensus_file())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// The saved overview with the analyst table filled in for its first
    /// `CONSENSUS_MAX_SYMBOLS` stocks. Stocks whose page fails keep what the
    /// overview already had.
    pub async fn scrape(&self, ctx: &ScrapingContext) -> Result<ConsensusOverview> {
        let config = &ctx.scraping_config;
        let mut overview = self.load_overview(ctx)?;
        let limit = config.consensus_max_symbols().min(overview.overall.len());

        let tables: Vec<Option<Vec<AnalystEstimate>>> = stream::iter(&overview.overall[..limit])
            .map(|stock| async move {
                let url = consensus_url(config.settrade_base_url(), &stock.symbol);
                match ctx.request_client.get_body(&url).await {
                    Ok(html) => {
                        let estimates = analyst_estimates(&html);
                        info!("{NAME}: {} has {} analysts", stock.symbol, estimates.len());
                        Some(estimates)
                    }
                    Err(e) => {
                        warn!("{NAME}: skipping {}: {e}", stock.symbol);
                        None
                    }
                }
            })
            .buffered(config.scrape_concurrency())
            .collect()
            .await;

        for (stock, table) in overview.overall.iter_mut().zip(tables) {
            if let Some(estimates) = table {
                stock.analyst_data = estimates;
            }
        }
        Ok(overview)
    }

    pub async fn scrape_to_file(&self, ctx: &ScrapingContext) -> Result<PathBuf> {
        let overview = self.scrape(ctx).await?;
        let path = write_json(ctx.scraping_config.output_dir(), OUTPUT_FILE, &overview)?;
        info!("{NAME}: saved {} stocks to {}", overview.overall.len(), path.display());
        Ok(path)
    }
}
