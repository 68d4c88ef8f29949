mod fee;
mod ratelimit;
mod requests;
mod text_manipulators;
mod writer;

pub mod compare_page;
pub mod compare_scraper;
pub mod config;
pub mod error;
pub mod research_scraper;
pub mod scraping_context;

pub mod aval_acceptance_fee_scraper;
pub mod bahtnet_fee_scraper;
pub mod bills_payment_fee_scraper;
pub mod bulk_payment_fee_scraper;
pub mod cheque_fee_scraper;
pub mod credit_card_fee_scraper;
pub mod custodian_fee_scraper;
pub mod debit_card_fee_scraper;
pub mod deposit_fee_scraper;
pub mod digital_banking_fee_scraper;
pub mod emoney_fee_scraper;
pub mod financial_certificate_fee_scraper;
pub mod guarantee_fee_scraper;
pub mod hire_purchase_fee_scraper;
pub mod home_loan_fee_scraper;
pub mod international_fee_scraper;
pub mod personal_loan_fee_scraper;
pub mod safe_box_fee_scraper;
pub mod secured_loan_fee_scraper;
pub mod sme_loan_fee_scraper;
pub mod title_loan_fee_scraper;

pub mod credit_card_scraper;
pub mod debit_card_scraper;
pub mod deposit_scraper;
pub mod emoney_scraper;
pub mod home_loan_scraper;
pub mod nano_finance_scraper;
pub mod personal_loan_scraper;
pub mod secured_loan_scraper;
pub mod sme_loan_scraper;
pub mod title_loan_scraper;

pub mod analyst_consensus_scraper;
pub mod fcd_deposit_scraper;
pub mod member_company_scraper;
pub mod news_scraper;
pub mod popular_research_scraper;
pub mod sec_form59_scraper;

pub use compare_scraper::{CompareProduct, CompareScraper};
pub use config::{LoadFromEnv, ScrapingConfig, ScrapingEnv};
pub use error::{Result, ScrapeError};
pub use fee::{FeeAmount, FeeDetail, FeeItem};
pub use research_scraper::ResearchScraper;
pub use scraping_context::ScrapingContext;
pub use writer::write_json;
