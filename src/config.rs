use std::path::PathBuf;

use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};

const DEFAULT_BOT_BASE_URL: &str = "https://app.bot.or.th/1213/MCPD";
const DEFAULT_SETTRADE_BASE_URL: &str = "https://www.settrade.com";
const DEFAULT_SET_BASE_URL: &str = "https://www.set.or.th";
const DEFAULT_SEC_BASE_URL: &str = "https://market.sec.or.th";
const DEFAULT_NEWS_CATEGORY: &str = "60ad3cae-ba3d-4405-af14-3ed4af1e5065";
const MAX_RESEARCH_DAYS: i64 = 3650;

/// The env vars needed for scraping. Everything has a default so a bare
/// checkout runs, but the BOT endpoints reject most requests without a
/// fresh `BOT_COOKIE` and `BOT_VERIFICATION_TOKEN`.
#[derive(Debug, Deserialize)]
pub struct ScrapingEnv {
    #[serde(default = "default_bot_base_url")]
    bot_base_url: String,
    bot_cookie: Option<String>,
    bot_verification_token: Option<String>,
    #[serde(default = "default_settrade_base_url")]
    settrade_base_url: String,
    #[serde(default = "default_set_base_url")]
    set_base_url: String,
    #[serde(default = "default_sec_base_url")]
    sec_base_url: String,
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
    #[serde(default = "default_page_limit")]
    page_limit: u32,
    #[serde(default = "default_scrape_concurrency")]
    scrape_concurrency: usize,
    #[serde(default = "default_req_per_sec")]
    req_per_sec: u32,
    #[serde(default = "default_ms_between_req")]
    ms_between_req: u64,
    #[serde(default = "default_research_days")]
    research_days: i64,
    #[serde(default = "default_research_page_size")]
    research_page_size: u32,
    #[serde(default = "default_research_max_pages")]
    research_max_pages: u32,
    #[serde(default = "default_consensus_file")]
    consensus_file: PathBuf,
    #[serde(default = "default_consensus_max_symbols")]
    consensus_max_symbols: usize,
    #[serde(default = "default_news_category")]
    news_category: String,
    #[serde(default = "default_news_max_pages")]
    news_max_pages: u32,
    #[serde(default = "default_form59_max_companies")]
    form59_max_companies: usize,
}

fn default_bot_base_url() -> String {
    DEFAULT_BOT_BASE_URL.to_string()
}

fn default_settrade_base_url() -> String {
    DEFAULT_SETTRADE_BASE_URL.to_string()
}

fn default_set_base_url() -> String {
    DEFAULT_SET_BASE_URL.to_string()
}

fn default_sec_base_url() -> String {
    DEFAULT_SEC_BASE_URL.to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_page_limit() -> u32 {
    3
}

fn default_scrape_concurrency() -> usize {
    4
}

fn default_req_per_sec() -> u32 {
    5
}

fn default_ms_between_req() -> u64 {
    200
}

fn default_research_days() -> i64 {
    7
}

fn default_research_page_size() -> u32 {
    20
}

fn default_research_max_pages() -> u32 {
    3
}

fn default_consensus_file() -> PathBuf {
    PathBuf::from("response.json")
}

fn default_consensus_max_symbols() -> usize {
    3
}

fn default_news_category() -> String {
    DEFAULT_NEWS_CATEGORY.to_string()
}

fn default_news_max_pages() -> u32 {
    5
}

fn default_form59_max_companies() -> usize {
    1
}

impl Default for ScrapingEnv {
    fn default() -> Self {
        Self {
            bot_base_url: default_bot_base_url(),
            bot_cookie: None,
            bot_verification_token: None,
            settrade_base_url: default_settrade_base_url(),
            set_base_url: default_set_base_url(),
            sec_base_url: default_sec_base_url(),
            output_dir: default_output_dir(),
            page_limit: default_page_limit(),
            scrape_concurrency: default_scrape_concurrency(),
            req_per_sec: default_req_per_sec(),
            ms_between_req: default_ms_between_req(),
            research_days: default_research_days(),
            research_page_size: default_research_page_size(),
            research_max_pages: default_research_max_pages(),
            consensus_file: default_consensus_file(),
            consensus_max_symbols: default_consensus_max_symbols(),
            news_category: default_news_category(),
            news_max_pages: default_news_max_pages(),
            form59_max_companies: default_form59_max_companies(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapingConfig {
    bot_base_url: String,
    bot_cookie: Option<String>,
    bot_verification_token: Option<String>,
    settrade_base_url: String,
    set_base_url: String,
    sec_base_url: String,
    output_dir: PathBuf,
    page_limit: u32,
    scrape_concurrency: usize,
    req_per_sec: u32,
    ms_between_req: u64,
    research_days: i64,
    research_page_size: u32,
    research_max_pages: u32,
    consensus_file: PathBuf,
    consensus_max_symbols: usize,
    news_category: String,
    news_max_pages: u32,
    form59_max_companies: usize,
}

impl ScrapingConfig {
    pub fn new() -> anyhow::Result<Self> {
        let scraping_env = ScrapingEnv::load_from_env()?;
        Self::from_env(scraping_env)
    }

    pub fn from_env(env: ScrapingEnv) -> anyhow::Result<Self> {
        let config = Self {
            bot_base_url: env.bot_base_url.trim_end_matches('/').to_string(),
            bot_cookie: env.bot_cookie.filter(|c| !c.trim().is_empty()),
            bot_verification_token: env.bot_verification_token.filter(|t| !t.trim().is_empty()),
            settrade_base_url: env.settrade_base_url.trim_end_matches('/').to_string(),
            set_base_url: env.set_base_url.trim_end_matches('/').to_string(),
            sec_base_url: env.sec_base_url.trim_end_matches('/').to_string(),
            output_dir: env.output_dir,
            page_limit: env.page_limit,
            scrape_concurrency: env.scrape_concurrency,
            req_per_sec: env.req_per_sec,
            ms_between_req: env.ms_between_req,
            research_days: env.research_days,
            research_page_size: env.research_page_size,
            research_max_pages: env.research_max_pages,
            consensus_file: env.consensus_file,
            consensus_max_symbols: env.consensus_max_symbols,
            news_category: env.news_category,
            news_max_pages: env.news_max_pages,
            form59_max_companies: env.form59_max_companies,
        };
        config.validate()?;
        Ok(config)
    }

    /// Config pointing every site at a single base url, used against mock servers.
    pub fn for_base_url(base_url: &str) -> anyhow::Result<Self> {
        Self::from_env(ScrapingEnv {
            bot_base_url: base_url.to_string(),
            settrade_base_url: base_url.to_string(),
            set_base_url: base_url.to_string(),
            sec_base_url: base_url.to_string(),
            req_per_sec: 1000,
            ms_between_req: 1,
            ..ScrapingEnv::default()
        })
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.page_limit > 0, "PAGE_LIMIT must be greater than zero");
        anyhow::ensure!(
            self.scrape_concurrency > 0,
            "SCRAPE_CONCURRENCY must be greater than zero"
        );
        anyhow::ensure!(self.req_per_sec > 0, "REQ_PER_SEC must be greater than zero");
        anyhow::ensure!(
            self.ms_between_req > 0,
            "MS_BETWEEN_REQ must be greater than zero"
        );
        anyhow::ensure!(
            (0..=MAX_RESEARCH_DAYS).contains(&self.research_days),
            "RESEARCH_DAYS must be between 0 and {MAX_RESEARCH_DAYS}"
        );
        anyhow::ensure!(
            self.consensus_max_symbols > 0,
            "CONSENSUS_MAX_SYMBOLS must be greater than zero"
        );
        anyhow::ensure!(
            self.news_max_pages > 0,
            "NEWS_MAX_PAGES must be greater than zero"
        );
        anyhow::ensure!(
            self.form59_max_companies > 0,
            "FORM59_MAX_COMPANIES must be greater than zero"
        );
        Ok(())
    }

    pub fn compare_list_url(&self, category: &str) -> String {
        format!("{}/{}/CompareProductList", self.bot_base_url, category)
    }

    pub fn compare_referer(&self, category: &str) -> String {
        format!("{}/{}/CompareProduct", self.bot_base_url, category)
    }

    pub fn fcd_search_url(&self) -> String {
        format!(
            "{}/FCDInterestAndFeeRateApp/Search/SearchProductInformation",
            self.bot_base_url
        )
    }

    pub fn fcd_referer(&self) -> String {
        format!("{}/FCDInterestAndFeeRateApp", self.bot_base_url)
    }

    /// Scheme and host of the BOT base url, sent as the `Origin` header.
    pub fn bot_origin(&self) -> String {
        match reqwest::Url::parse(&self.bot_base_url) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(_) => self.bot_base_url.clone(),
        }
    }

    pub fn bot_cookie(&self) -> Option<&str> {
        self.bot_cookie.as_deref()
    }

    pub fn bot_verification_token(&self) -> Option<&str> {
        self.bot_verification_token.as_deref()
    }

    pub fn settrade_base_url(&self) -> &str {
        &self.settrade_base_url
    }

    pub fn set_base_url(&self) -> &str {
        &self.set_base_url
    }

    pub fn sec_base_url(&self) -> &str {
        &self.sec_base_url
    }

    pub fn output_dir(&self) -> &PathBuf {
        &self.output_dir
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    pub fn scrape_concurrency(&self) -> usize {
        self.scrape_concurrency
    }

    pub fn req_per_sec(&self) -> u32 {
        self.req_per_sec
    }

    pub fn ms_between_req(&self) -> u64 {
        self.ms_between_req
    }

    pub fn research_days(&self) -> i64 {
        self.research_days
    }

    pub fn research_page_size(&self) -> u32 {
        self.research_page_size
    }

    pub fn research_max_pages(&self) -> u32 {
        self.research_max_pages
    }

    /// Saved settrade consensus overview the analyst scraper starts from.
    pub fn consensus_file(&self) -> &PathBuf {
        &self.consensus_file
    }

    pub fn consensus_max_symbols(&self) -> usize {
        self.consensus_max_symbols
    }

    pub fn news_category(&self) -> &str {
        &self.news_category
    }

    pub fn news_max_pages(&self) -> u32 {
        self.news_max_pages
    }

    /// Companies whose form 59 history is walked, in dropdown order.
    pub fn form59_max_companies(&self) -> usize {
        self.form59_max_companies
    }

    pub fn set_consensus_file(&mut self, consensus_file: PathBuf) {
        self.consensus_file = consensus_file;
    }

    pub fn set_output_dir(&mut self, output_dir: PathBuf) {
        self.output_dir = output_dir;
    }

    pub fn set_page_limit(&mut self, page_limit: u32) -> anyhow::Result<()> {
        anyhow::ensure!(page_limit > 0, "page limit must be greater than zero");
        self.page_limit = page_limit;
        Ok(())
    }

    pub fn set_scrape_concurrency(&mut self, concurrency: usize) -> anyhow::Result<()> {
        anyhow::ensure!(concurrency > 0, "concurrency must be greater than zero");
        self.scrape_concurrency = concurrency;
        Ok(())
    }
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env() -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config =
            envy::from_env::<Self>().context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> ScrapingEnv {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>();
        envy::from_iter(vars).unwrap()
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let config = ScrapingConfig::from_env(env_from(&[])).unwrap();
        assert_eq!(config.page_limit(), 3);
        assert_eq!(config.scrape_concurrency(), 4);
        assert!(config.bot_cookie().is_none());
        assert_eq!(
            config.compare_list_url("FeeApp/ChequeFee"),
            "https://app.bot.or.th/1213/MCPD/FeeApp/ChequeFee/CompareProductList"
        );
        assert_eq!(config.bot_origin(), "https://app.bot.or.th");
        assert_eq!(
            config.fcd_search_url(),
            "https://app.bot.or.th/1213/MCPD/FCDInterestAndFeeRateApp/Search/\
             SearchProductInformation"
        );
    }

    #[test]
    fn env_values_override_defaults() {
        let config = ScrapingConfig::from_env(env_from(&[
            ("BOT_BASE_URL", "http://localhost:8080/mcpd/"),
            ("BOT_COOKIE", "verify=test"),
            ("PAGE_LIMIT", "5"),
        ]))
        .unwrap();
        assert_eq!(config.page_limit(), 5);
        assert_eq!(config.bot_cookie(), Some("verify=test"));
        assert_eq!(
            config.compare_referer("ProductApp/HomeLoan"),
            "http://localhost:8080/mcpd/ProductApp/HomeLoan/CompareProduct"
        );
        assert_eq!(config.bot_origin(), "http://localhost:8080");
    }

    #[test]
    fn set_sites_have_their_own_roots() {
        let config = ScrapingConfig::from_env(env_from(&[
            ("SET_BASE_URL", "http://localhost:9000/"),
            ("CONSENSUS_FILE", "/tmp/consensus.json"),
        ]))
        .unwrap();
        assert_eq!(config.set_base_url(), "http://localhost:9000");
        assert_eq!(config.settrade_base_url(), "https://www.settrade.com");
        assert_eq!(config.consensus_file(), &PathBuf::from("/tmp/consensus.json"));
        assert_eq!(config.consensus_max_symbols(), 3);
        assert_eq!(config.sec_base_url(), "https://market.sec.or.th");
        assert_eq!(config.news_max_pages(), 5);
        assert_eq!(config.form59_max_companies(), 1);
    }

    #[test]
    fn blank_cookie_is_treated_as_unset() {
        let config = ScrapingConfig::from_env(env_from(&[("BOT_COOKIE", "  ")])).unwrap();
        assert!(config.bot_cookie().is_none());
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(ScrapingConfig::from_env(env_from(&[("PAGE_LIMIT", "0")])).is_err());
        assert!(ScrapingConfig::from_env(env_from(&[("REQ_PER_SEC", "0")])).is_err());
        assert!(ScrapingConfig::from_env(env_from(&[("RESEARCH_DAYS", "-1")])).is_err());
        assert!(
            ScrapingConfig::from_env(env_from(&[("RESEARCH_DAYS", "9223372036854775807")])).is_err()
        );
        assert!(ScrapingConfig::from_env(env_from(&[("RESEARCH_DAYS", "3650")])).is_ok());
        assert!(ScrapingConfig::from_env(env_from(&[("CONSENSUS_MAX_SYMBOLS", "0")])).is_err());
        assert!(ScrapingConfig::from_env(env_from(&[("NEWS_MAX_PAGES", "0")])).is_err());
        assert!(ScrapingConfig::from_env(env_from(&[("FORM59_MAX_COMPANIES", "0")])).is_err());

        let mut config = ScrapingConfig::from_env(env_from(&[])).unwrap();
        assert!(config.set_scrape_concurrency(0).is_err());
        assert!(config.set_page_limit(2).is_ok());
        assert_eq!(config.page_limit(), 2);
    }
}
