use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{clean_text, first_integer, optional_text, range_pair, split_clean},
};

/// An unsecured personal loan product, in camelCase like the BOT site's own
/// field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalLoan {
    pub service_provider: String,
    pub product: String,
    pub interest_rate: InterestRate,
    pub interest_conditions: Option<String>,
    pub interest_promotions: Vec<String>,
    pub penalty_rates: Vec<PenaltyRate>,
    pub minimum_payment: Option<String>,
    pub credit_limit: Vec<String>,
    pub loan_amount: Option<Range>,
    pub loan_duration_months: Option<Range>,
    pub money_transfer_method: Option<String>,
    pub money_transfer_conditions: Vec<String>,
    pub applicant_requirements: ApplicantRequirements,
    pub application_conditions: Vec<String>,
    pub revolving_credit_fee_info: RevolvingCreditFeeInfo,
    pub service_fee: ServiceFee,
    pub payment_fee_info: PaymentFeeInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestRate {
    pub salary_employee: Option<String>,
    pub business_owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyRate {
    pub rate: String,
    pub condition: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantRequirements {
    pub salary_employee: SalaryEmployee,
    pub business_owner: BusinessOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryEmployee {
    pub age: Option<i64>,
    pub minimum_income: Option<i64>,
    pub work_experience: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessOwner {
    pub age: Option<i64>,
    pub minimum_income: Option<i64>,
    pub business_duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevolvingCreditFeeInfo {
    pub installment_service: Option<String>,
    pub benefits: Option<String>,
    pub card_fee: Option<String>,
    pub card_replacement_fee: Option<String>,
    pub pin_reissuing_fee: Option<String>,
    pub fx_risk_conversion_fee: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFee {
    pub credit_check_fee: Option<String>,
    pub stamp_duty: Option<String>,
    pub early_repayment_fee: Option<String>,
    pub cheque_returned_fee: Option<String>,
    pub insufficient_direct_debit_charge: Option<String>,
    pub statement_reissuing_fee: Option<String>,
    pub transaction_verification_fee: Option<String>,
    pub collection_fee: Option<String>,
    pub other_fees: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFeeInfo {
    pub payment_methods: PaymentMethods,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethods {
    pub no_fee: Vec<String>,
    pub branch_service: Option<String>,
    pub deducting_from_other_bank: Option<String>,
    pub provider_branch_service: Option<String>,
    pub other_provider_branch: Vec<String>,
    pub counter_service: Vec<String>,
    pub online_payment: Vec<String>,
    #[serde(rename = "cDMATMPayment")]
    pub cdm_atm_payment: Vec<String>,
    pub phone_payment: Option<String>,
    pub cheque_money_order_payment: Option<String>,
    pub other_channel_payment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    pub product_website: Option<String>,
    pub fee_website: Option<String>,
}

const INCOME: &str = "รายได้";

/// Splits `รายได้ A ... - รายได้ B ...` into one tier per income band.
fn credit_limit_tiers(text: &str) -> Vec<String> {
    split_clean(text, &format!("- {INCOME}"))
        .into_iter()
        .map(|tier| {
            if tier.starts_with(INCOME) {
                tier
            } else {
                format!("{INCOME} {tier}")
            }
        })
        .collect()
}

fn range(text: &str) -> Option<Range> {
    range_pair(text).map(|(min, max)| Range { min, max })
}

/// Conditions are listed one per `-` or `/`.
fn transfer_conditions(text: &str) -> Vec<String> {
    text.split(['-', '/'])
        .map(clean_text)
        .filter(|part| !part.is_empty())
        .collect()
}

fn optional(page: &ComparePage, attr: &str, col: Column) -> Option<String> {
    optional_text(&page.cell_text(attr, col))
}

fn first_span(page: &ComparePage, attr: &str, col: Column) -> String {
    page.cell_texts(attr, col).into_iter().next().unwrap_or_default()
}

fn bullets(page: &ComparePage, attr: &str, col: Column) -> Vec<String> {
    split_clean(&first_span(page, attr, col), "-")
}

fn penalty_rates(page: &ComparePage, col: Column) -> Vec<PenaltyRate> {
    let rate = optional_text(&first_span(page, "attr-penaltyFee", col));
    let condition = split_clean(
        &page
            .cell_texts_matching("attr-penaltyFee", col, "div span.text-primary")
            .join(" "),
        "-",
    );
    match rate {
        Some(rate) if !condition.is_empty() => vec![PenaltyRate { rate, condition }],
        _ => vec![],
    }
}

fn applicant_requirements(page: &ComparePage, col: Column) -> ApplicantRequirements {
    let incomes = page.row_texts_mentioning("รายได้ขั้นต่ำ", col);
    let income = |text: Option<&String>| text.and_then(|t| first_integer(t));
    let salary_spans = page.cell_texts("attr-ageForSalaryIncome", col);

    ApplicantRequirements {
        salary_employee: SalaryEmployee {
            age: salary_spans.first().and_then(|t| first_integer(t)),
            minimum_income: income(incomes.first()),
            work_experience: salary_spans.last().cloned().unwrap_or_default(),
        },
        business_owner: BusinessOwner {
            age: first_integer(&first_span(page, "attr-ageForSelfEmployed", col)),
            minimum_income: income(incomes.last()),
            business_duration: page
                .row_texts_mentioning("อายุงานขั้นต่ำ", col)
                .pop()
                .unwrap_or_default(),
        },
    }
}

fn service_fee(page: &ComparePage, col: Column) -> ServiceFee {
    ServiceFee {
        credit_check_fee: optional(page, "attr-creditBureauFee", col),
        stamp_duty: optional(page, "attr-dutyStampFee", col),
        early_repayment_fee: optional(page, "attr-prepaymentFee", col),
        cheque_returned_fee: optional(page, "attr-chequeReturnedFee", col),
        insufficient_direct_debit_charge: optional(page, "attr-insufficientDirectDebitCharge", col),
        statement_reissuing_fee: optional(page, "attr-statementReissuingFee", col),
        transaction_verification_fee: optional(page, "attr-transactionVerificationFee", col),
        collection_fee: optional(page, "attr-collectionFee", col),
        other_fees: optional(page, "attr-otherFee", col),
    }
}

fn payment_methods(page: &ComparePage, col: Column) -> PaymentMethods {
    PaymentMethods {
        no_fee: bullets(page, "attr-freePaymentChannel", col),
        branch_service: optional(page, "attr-deductingFromBankAcFee", col),
        deducting_from_other_bank: optional(page, "attr-deductingFromOtherBankAcFee", col),
        provider_branch_service: optional(page, "attr-bankCounterServiceFee", col),
        other_provider_branch: bullets(page, "attr-otherBankCounterServiceFee", col),
        counter_service: bullets(page, "attr-otherCounterServiceFee", col),
        online_payment: bullets(page, "attr-onlinePaymentFee", col),
        cdm_atm_payment: bullets(page, "attr-cDMATMPaymentFee", col),
        phone_payment: optional(page, "attr-phonePaymentFee", col),
        cheque_money_order_payment: optional(page, "attr-chequeOrMoneyOrderPaymentFee", col),
        other_channel_payment: optional(page, "attr-otherChannelPaymentFee", col),
    }
}

impl CompareProduct for PersonalLoan {
    const NAME: &'static str = "personal-loans";
    const CATEGORY: &'static str = "ProductApp/PersonalLoan";
    const OUTPUT_FILE: &'static str = "personal_loan.json";
    const PRODUCT_IDS: &'static str = "11699-1,11698-1,11700-1,10911-2,10916-2,11903-1,10525-1,\
        10915-2,10910-2,11621-1,11543-2";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let interest = page.cell_texts("attr-interestForSalaryIncomeDisplay", col);

        PersonalLoan {
            service_provider: page.provider(col),
            product: page.product(col),
            interest_rate: InterestRate {
                salary_employee: interest.first().and_then(|t| optional_text(t)),
                business_owner: interest.last().and_then(|t| optional_text(t)),
            },
            interest_conditions: optional_text(&first_span(page, "attr-interestCondition", col)),
            interest_promotions: bullets(page, "attr-promotionOrCampaignOfInterest", col),
            penalty_rates: penalty_rates(page, col),
            minimum_payment: optional_text(&first_span(page, "attr-minimumPayment", col)),
            credit_limit: credit_limit_tiers(&first_span(
                page,
                "attr-maximumTimesOfIncomeForCreditLines",
                col,
            )),
            loan_amount: range(&first_span(page, "attr-creditLineAmoutDisplay", col)),
            loan_duration_months: range(&first_span(page, "attr-termDisplay", col)),
            money_transfer_method: optional_text(&first_span(
                page,
                "attr-channelCreditDelivery",
                col,
            )),
            money_transfer_conditions: transfer_conditions(&first_span(
                page,
                "attr-conditionOfCreditDelivery",
                col,
            )),
            applicant_requirements: applicant_requirements(page, col),
            application_conditions: bullets(page, "attr-conditionToApply", col),
            revolving_credit_fee_info: RevolvingCreditFeeInfo {
                installment_service: optional(page, "attr-cardUsedCondition", col),
                benefits: optional(page, "attr-benefit", col),
                card_fee: optional(page, "attr-cardAnnuallyFee", col),
                card_replacement_fee: optional(page, "attr-cardReplacementFee", col),
                pin_reissuing_fee: optional(page, "attr-pINReissuingFee", col),
                fx_risk_conversion_fee: optional(page, "attr-costOfFXRisk", col),
            },
            service_fee: service_fee(page, col),
            payment_fee_info: PaymentFeeInfo {
                payment_methods: payment_methods(page, col),
                additional_info: AdditionalInfo {
                    product_website: page.cell_link("attr-uRL", col),
                    fee_website: page.cell_link("attr-feeuRL", col),
                },
            },
        }
    }
}
