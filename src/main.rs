use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use log::{LevelFilter, error, info};
use thai_fee_scraper::{
    CompareProduct, CompareScraper, ResearchScraper, ScrapingConfig, ScrapingContext,
    analyst_consensus_scraper::AnalystConsensusScraper,
    aval_acceptance_fee_scraper::AvalAcceptanceFee, bahtnet_fee_scraper::BahtnetFee,
    bills_payment_fee_scraper::BillsPaymentFee, bulk_payment_fee_scraper::BulkPaymentFee,
    cheque_fee_scraper::ChequeFee, credit_card_fee_scraper::CreditCardFee,
    credit_card_scraper::CreditCard, custodian_fee_scraper::CustodianFee,
    debit_card_fee_scraper::DebitFee, debit_card_scraper::DebitCard,
    deposit_fee_scraper::DepositFee, deposit_scraper::Deposit,
    digital_banking_fee_scraper::DigitalBankingFee, emoney_fee_scraper::EMoneyFee,
    emoney_scraper::EMoney, fcd_deposit_scraper::FcdDepositScraper,
    financial_certificate_fee_scraper::FinancialCertificateFee,
    guarantee_fee_scraper::GuaranteeFee, hire_purchase_fee_scraper::HirePurchaseFee,
    home_loan_fee_scraper::HomeLoanFee, home_loan_scraper::HomeLoan,
    international_fee_scraper::InternationalFee, member_company_scraper::MemberCompanyScraper,
    nano_finance_scraper::NanoFinance, news_scraper::NewsScraper,
    personal_loan_fee_scraper::PersonalLoanFee,
    personal_loan_scraper::PersonalLoan, popular_research_scraper::PopularResearchScraper,
    safe_box_fee_scraper::SafeBoxFee,
    sec_form59_scraper::{Form59HistoryScraper, Form59Scraper},
    secured_loan_fee_scraper::SecuredLoanFee,
    secured_loan_scraper::SecuredLoan, sme_loan_fee_scraper::SmeLoanFee,
    sme_loan_scraper::SmeLoan, title_loan_fee_scraper::TitleLoanFee,
    title_loan_scraper::TitleLoan,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    AvalAcceptanceFees,
    BahtnetFees,
    BillsPaymentFees,
    BulkPaymentFees,
    ChequeFees,
    CreditCardFees,
    CustodianFees,
    DebitCardFees,
    DepositFees,
    DigitalBankingFees,
    EmoneyFees,
    FinancialCertificateFees,
    GuaranteeFees,
    HirePurchaseFees,
    HomeLoanFees,
    InternationalFees,
    PersonalLoanFees,
    SafeBoxFees,
    SecuredLoanFees,
    SmeLoanFees,
    TitleLoanFees,
    CreditCards,
    DebitCards,
    Deposits,
    Emoney,
    HomeLoans,
    NanoFinance,
    PersonalLoans,
    SecuredLoans,
    SmeLoans,
    TitleLoans,
    FcdDeposits,
    Research,
    PopularResearch,
    AnalystConsensus,
    MemberCompanies,
    News,
    #[value(name = "form59-reports")]
    Form59Reports,
    #[value(name = "form59-history")]
    Form59History,
    All,
}

const EVERY_TARGET: [Target; 39] = [
    Target::AvalAcceptanceFees,
    Target::BahtnetFees,
    Target::BillsPaymentFees,
    Target::BulkPaymentFees,
    Target::ChequeFees,
    Target::CreditCardFees,
    Target::CustodianFees,
    Target::DebitCardFees,
    Target::DepositFees,
    Target::DigitalBankingFees,
    Target::EmoneyFees,
    Target::FinancialCertificateFees,
    Target::GuaranteeFees,
    Target::HirePurchaseFees,
    Target::HomeLoanFees,
    Target::InternationalFees,
    Target::PersonalLoanFees,
    Target::SafeBoxFees,
    Target::SecuredLoanFees,
    Target::SmeLoanFees,
    Target::TitleLoanFees,
    Target::CreditCards,
    Target::DebitCards,
    Target::Deposits,
    Target::Emoney,
    Target::HomeLoans,
    Target::NanoFinance,
    Target::PersonalLoans,
    Target::SecuredLoans,
    Target::SmeLoans,
    Target::TitleLoans,
    Target::FcdDeposits,
    Target::Research,
    Target::PopularResearch,
    Target::AnalystConsensus,
    Target::MemberCompanies,
    Target::News,
    Target::Form59Reports,
    Target::Form59History,
];

impl Target {
    /// Targets backed by a BOT compare table, the only ones taking product ids.
    fn is_compare(self) -> bool {
        !matches!(
            self,
            Target::FcdDeposits
                | Target::Research
                | Target::PopularResearch
                | Target::AnalystConsensus
                | Target::MemberCompanies
                | Target::News
                | Target::Form59Reports
                | Target::Form59History
                | Target::All
        )
    }
}

#[derive(Parser)]
#[command(name = "thai-fee-scraper")]
#[command(about = "Scrapes BOT product comparison tables and SET market pages into JSON")]
struct Args {
    /// What to scrape
    #[arg(value_enum, required = true)]
    targets: Vec<Target>,

    /// Directory the JSON files are written to (overrides OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Products per compare page (overrides PAGE_LIMIT)
    #[arg(long)]
    page_limit: Option<u32>,

    /// Pages fetched concurrently (overrides SCRAPE_CONCURRENCY)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Comma separated product ids, only with a single compare target
    #[arg(long)]
    product_ids: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Expands `all` and drops repeats while keeping the given order.
    fn targets(&self) -> Vec<Target> {
        let mut targets = Vec::new();
        for &target in &self.targets {
            let expanded = if target == Target::All {
                EVERY_TARGET.to_vec()
            } else {
                vec![target]
            };
            for target in expanded {
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }
        targets
    }

    /// `--product-ids` narrows a single compare table, so any other target
    /// list is rejected.
    fn check_product_ids(&self) -> anyhow::Result<()> {
        if self.product_ids.is_some() {
            let targets = self.targets();
            anyhow::ensure!(
                targets.len() == 1 && targets[0].is_compare(),
                "--product-ids needs exactly one compare target"
            );
        }
        Ok(())
    }

    fn config(&self) -> anyhow::Result<ScrapingConfig> {
        let mut config = ScrapingConfig::new()?;
        if let Some(output_dir) = &self.output_dir {
            config.set_output_dir(output_dir.clone());
        }
        if let Some(page_limit) = self.page_limit {
            config.set_page_limit(page_limit)?;
        }
        if let Some(concurrency) = self.concurrency {
            config.set_scrape_concurrency(concurrency)?;
        }
        Ok(config)
    }
}

async fn run_compare<T: CompareProduct>(
    ctx: &ScrapingContext,
    product_ids: Option<&str>,
) -> anyhow::Result<PathBuf> {
    let scraper = match product_ids {
        Some(ids) => CompareScraper::<T>::with_product_ids(ids),
        None => CompareScraper::<T>::new(),
    };
    scraper
        .scrape_to_file(ctx)
        .await
        .with_context(|| format!("failed to scrape {}", T::NAME))
}

async fn run_target(
    ctx: &ScrapingContext,
    target: Target,
    product_ids: Option<&str>,
) -> anyhow::Result<PathBuf> {
    match target {
        Target::AvalAcceptanceFees => run_compare::<AvalAcceptanceFee>(ctx, product_ids).await,
        Target::BahtnetFees => run_compare::<BahtnetFee>(ctx, product_ids).await,
        Target::BillsPaymentFees => run_compare::<BillsPaymentFee>(ctx, product_ids).await,
        Target::BulkPaymentFees => run_compare::<BulkPaymentFee>(ctx, product_ids).await,
        Target::ChequeFees => run_compare::<ChequeFee>(ctx, product_ids).await,
        Target::CreditCardFees => run_compare::<CreditCardFee>(ctx, product_ids).await,
        Target::CustodianFees => run_compare::<CustodianFee>(ctx, product_ids).await,
        Target::DebitCardFees => run_compare::<DebitFee>(ctx, product_ids).await,
        Target::DepositFees => run_compare::<DepositFee>(ctx, product_ids).await,
        Target::DigitalBankingFees => run_compare::<DigitalBankingFee>(ctx, product_ids).await,
        Target::EmoneyFees => run_compare::<EMoneyFee>(ctx, product_ids).await,
        Target::FinancialCertificateFees => {
            run_compare::<FinancialCertificateFee>(ctx, product_ids).await
        }
        Target::GuaranteeFees => run_compare::<GuaranteeFee>(ctx, product_ids).await,
        Target::HirePurchaseFees => run_compare::<HirePurchaseFee>(ctx, product_ids).await,
        Target::HomeLoanFees => run_compare::<HomeLoanFee>(ctx, product_ids).await,
        Target::InternationalFees => run_compare::<InternationalFee>(ctx, product_ids).await,
        Target::PersonalLoanFees => run_compare::<PersonalLoanFee>(ctx, product_ids).await,
        Target::SafeBoxFees => run_compare::<SafeBoxFee>(ctx, product_ids).await,
        Target::SecuredLoanFees => run_compare::<SecuredLoanFee>(ctx, product_ids).await,
        Target::SmeLoanFees => run_compare::<SmeLoanFee>(ctx, product_ids).await,
        Target::TitleLoanFees => run_compare::<TitleLoanFee>(ctx, product_ids).await,
        Target::CreditCards => run_compare::<CreditCard>(ctx, product_ids).await,
        Target::DebitCards => run_compare::<DebitCard>(ctx, product_ids).await,
        Target::Deposits => run_compare::<Deposit>(ctx, product_ids).await,
        Target::Emoney => run_compare::<EMoney>(ctx, product_ids).await,
        Target::HomeLoans => run_compare::<HomeLoan>(ctx, product_ids).await,
        Target::NanoFinance => run_compare::<NanoFinance>(ctx, product_ids).await,
        Target::PersonalLoans => run_compare::<PersonalLoan>(ctx, product_ids).await,
        Target::SecuredLoans => run_compare::<SecuredLoan>(ctx, product_ids).await,
        Target::SmeLoans => run_compare::<SmeLoan>(ctx, product_ids).await,
        Target::TitleLoans => run_compare::<TitleLoan>(ctx, product_ids).await,
        Target::FcdDeposits => FcdDepositScraper::new()
            .scrape_to_file(ctx)
            .await
            .context("failed to scrape fcd-deposits"),
        Target::Research => ResearchScraper::last_days(ctx.scraping_config.research_days())?
            .scrape_to_file(ctx)
            .await
            .context("failed to scrape research"),
        Target::PopularResearch => PopularResearchScraper::default()
            .scrape_to_file(ctx)
            .await
            .context("failed to scrape popular-research"),
        Target::AnalystConsensus => AnalystConsensusScraper::new()
            .scrape_to_file(ctx)
            .await
            .context("failed to scrape analyst-consensus"),
        Target::MemberCompanies => MemberCompanyScraper::new()
            .scrape_to_file(ctx)
            .await
            .context("failed to scrape member-companies"),
        Target::News => NewsScraper::last_days(ctx.scraping_config.research_days())?
            .scrape_to_file(ctx)
            .await
            .context("failed to scrape news"),
        Target::Form59Reports => Form59Scraper::new()
            .scrape_to_file(ctx)
            .await
            .context("failed to scrape form59-reports"),
        Target::Form59History => Form59HistoryScraper::until_today()
            .scrape_to_file(ctx)
            .await
            .context("failed to scrape form59-history"),
        Target::All => anyhow::bail!("`all` is expanded before running"),
    }
}

/// Runs each target in turn. A failed target is logged and the rest still run.
async fn run_targets(ctx: &ScrapingContext, targets: &[Target], product_ids: Option<&str>) -> bool {
    let mut all_ok = true;
    for &target in targets {
        match run_target(ctx, target, product_ids).await {
            Ok(path) => info!("{target:?} done: {}", path.display()),
            Err(e) => {
                error!("{e:#}");
                all_ok = false;
            }
        }
    }
    all_ok
}

async fn run(args: Args) -> anyhow::Result<bool> {
    args.check_product_ids()?;
    let ctx = ScrapingContext::with_config(args.config()?)?;
    Ok(run_targets(&ctx, &args.targets(), args.product_ids.as_deref()).await)
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    #[test]
    fn all_expands_in_order_without_repeats() {
        let args = Args::parse_from(["thai-fee-scraper", "research", "all"]);
        let targets = args.targets();
        assert_eq!(targets.len(), EVERY_TARGET.len());
        assert_eq!(targets[0], Target::Research);
        assert_eq!(targets[1], Target::AvalAcceptanceFees);
        assert!(!targets.contains(&Target::All));
    }

    #[test]
    fn target_names_match_scrapers() {
        let name = |target: Target| {
            target
                .to_possible_value()
                .map(|value| value.get_name().to_string())
        };
        assert_eq!(name(Target::ChequeFees).as_deref(), Some(ChequeFee::NAME));
        assert_eq!(name(Target::DebitCardFees).as_deref(), Some(DebitFee::NAME));
        assert_eq!(name(Target::TitleLoans).as_deref(), Some(TitleLoan::NAME));
        assert_eq!(name(Target::NanoFinance).as_deref(), Some(NanoFinance::NAME));
        assert_eq!(name(Target::EmoneyFees).as_deref(), Some(EMoneyFee::NAME));
        assert_eq!(name(Target::Emoney).as_deref(), Some(EMoney::NAME));
        assert_eq!(name(Target::SmeLoans).as_deref(), Some(SmeLoan::NAME));
        assert_eq!(
            name(Target::FinancialCertificateFees).as_deref(),
            Some(FinancialCertificateFee::NAME)
        );
        assert_eq!(
            name(Target::FcdDeposits).as_deref(),
            Some(thai_fee_scraper::fcd_deposit_scraper::NAME)
        );
        assert_eq!(
            name(Target::PopularResearch).as_deref(),
            Some(thai_fee_scraper::popular_research_scraper::NAME)
        );
        assert_eq!(
            name(Target::AnalystConsensus).as_deref(),
            Some(thai_fee_scraper::analyst_consensus_scraper::NAME)
        );
        assert_eq!(
            name(Target::MemberCompanies).as_deref(),
            Some(thai_fee_scraper::member_company_scraper::NAME)
        );
        assert_eq!(
            name(Target::News).as_deref(),
            Some(thai_fee_scraper::news_scraper::NAME)
        );
        assert_eq!(
            name(Target::Form59Reports).as_deref(),
            Some(thai_fee_scraper::sec_form59_scraper::NAME)
        );
        assert_eq!(
            name(Target::Form59History).as_deref(),
            Some(thai_fee_scraper::sec_form59_scraper::HISTORY_NAME)
        );
    }

    #[test]
    fn product_ids_need_one_compare_target() {
        let two = Args::parse_from([
            "thai-fee-scraper",
            "--product-ids",
            "1,2",
            "cheque-fees",
            "research",
        ]);
        assert!(two.check_product_ids().is_err());

        let all = Args::parse_from(["thai-fee-scraper", "--product-ids", "1,2", "all"]);
        assert!(all.check_product_ids().is_err());

        let research = Args::parse_from(["thai-fee-scraper", "--product-ids", "1", "research"]);
        assert!(research.check_product_ids().is_err());

        let form59 = Args::parse_from(["thai-fee-scraper", "--product-ids", "1", "form59-reports"]);
        assert!(form59.check_product_ids().is_err());

        let single = Args::parse_from(["thai-fee-scraper", "--product-ids", "1,2", "cheque-fees"]);
        assert!(single.check_product_ids().is_ok());

        let without_ids = Args::parse_from(["thai-fee-scraper", "cheque-fees", "research"]);
        assert!(without_ids.check_product_ids().is_ok());
    }

    #[tokio::test]
    async fn failed_target_is_reported_without_stopping_the_run() {
        let server = MockServer::start_async().await;
        let compare = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(500);
            })
            .await;
        let output = tempfile::tempdir().unwrap();
        let mut config = ScrapingConfig::for_base_url(&server.base_url()).unwrap();
        config.set_output_dir(output.path().to_path_buf());
        let ctx = ScrapingContext::with_config(config).unwrap();

        let ok = run_targets(&ctx, &[Target::ChequeFees, Target::SafeBoxFees], None).await;

        assert!(!ok);
        assert!(compare.hits_async().await >= 2);
        assert!(!output.path().join(ChequeFee::OUTPUT_FILE).exists());
    }
}
