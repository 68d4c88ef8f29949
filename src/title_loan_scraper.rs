use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{numbered_items, optional_text, range_pair, split_clean},
};

const CONDITION_MARKER: &str = "เงื่อนไข:";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleLoan {
    pub provider: String,
    pub product: String,
    pub vehicle_type: Vec<String>,
    pub vehicle_condition: Vec<String>,
    pub loan_type: String,
    pub interest_rate: InterestRate,
    pub credit_limit_and_installment: CreditLimitAndInstallment,
    pub borrower_qualifications: BorrowerQualifications,
    pub general_fees: GeneralFees,
    pub card_fees: CardFees,
    pub payment_fees: PaymentFees,
    pub other_fees: OtherFees,
    pub additional_info: Option<AdditionalInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestRate {
    pub annual_interest_rate: String,
    pub interest_rate_conditions: Vec<String>,
    pub penalty_interest_rate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditLimit {
    pub min_limit: i64,
    pub max_limit: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPeriod {
    pub min_month: i64,
    pub max_month: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditLimitAndInstallment {
    pub credit_limit: CreditLimit,
    pub credit_limit_conditions: Vec<String>,
    pub installment_period: InstallmentPeriod,
    pub loan_receiving_channel: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeLimit {
    pub min_age: i64,
    pub max_age: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerQualifications {
    pub borrower_type: Vec<String>,
    pub age_limit: AgeLimit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_conditions: Option<String>,
    pub minimum_income: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_conditions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralFees {
    pub stamp_duty: Vec<String>,
    pub returned_cheque: String,
    pub debt_collection_fee: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFees {
    pub card_fee: String,
    pub card_replacement_fee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_withdrawal_fee: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFees {
    pub free_payment_channel: Vec<String>,
    pub deducting_from_service_provider: String,
    pub deducting_from_other_service_provider: String,
    pub service_provider_counter: String,
    pub other_provider_counter: String,
    pub payment_service_points: Vec<String>,
    pub online_payment: String,
    pub cdm_atm_payment: String,
    pub phone_payment: String,
    pub cheque_money_order_payment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_channel_payment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherFees {
    pub litigation_lawyer_fee: Vec<String>,
    pub other_fees_details: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    #[serde(rename = "productWebsite", skip_serializing_if = "Option::is_none")]
    pub product_website: Option<String>,
    #[serde(rename = "feewebsite", skip_serializing_if = "Option::is_none")]
    pub fee_website: Option<String>,
}

/// `(min, max)` of a cell, zero when it holds no number.
fn range(page: &ComparePage, attr: &str, col: Column) -> (i64, i64) {
    range_pair(&page.cell_text(attr, col)).unwrap_or((0, 0))
}

fn dash_list(page: &ComparePage, attr: &str, col: Column) -> Vec<String> {
    split_clean(&page.cell_text(attr, col), "-")
}

/// `-` separated parts of every `<br>` separated line.
fn line_list(page: &ComparePage, attr: &str, col: Column) -> Vec<String> {
    page.cell_lines(attr, col)
        .iter()
        .flat_map(|line| split_clean(line, "-"))
        .collect()
}

/// Conditions after the marker, or the whole text when there is none.
fn lawyer_fee(text: &str) -> Vec<String> {
    match text.split_once(CONDITION_MARKER) {
        Some((_, conditions)) => split_clean(conditions, "-"),
        None if text.is_empty() => vec![],
        None => vec![text.to_string()],
    }
}

fn credit_limit_and_installment(page: &ComparePage, col: Column) -> CreditLimitAndInstallment {
    let (min_limit, max_limit) = range(page, "attr-CreditLimit", col);
    let (min_month, max_month) = range(page, "attr-InstallmentPeriod", col);

    CreditLimitAndInstallment {
        credit_limit: CreditLimit {
            min_limit,
            max_limit,
        },
        credit_limit_conditions: dash_list(page, "attr-CreditLimitCondition", col),
        installment_period: InstallmentPeriod {
            min_month,
            max_month,
        },
        loan_receiving_channel: dash_list(page, "attr-LoanReceivingChannel", col),
    }
}

fn borrower_qualifications(page: &ComparePage, col: Column) -> BorrowerQualifications {
    let (min_age, max_age) = range(page, "attr-BorrowerAge", col);

    BorrowerQualifications {
        borrower_type: dash_list(page, "attr-BorrowerType", col),
        age_limit: AgeLimit { min_age, max_age },
        other_conditions: optional_text(&page.cell_text("attr-ConditionOfBorrower", col)),
        minimum_income: dash_list(page, "attr-MinimumMonthlyIncome", col),
        income_conditions: optional_text(&page.cell_text("attr-MonthlyIncomeCondition", col)),
    }
}

fn payment_fees(page: &ComparePage, col: Column) -> PaymentFees {
    PaymentFees {
        free_payment_channel: split_clean(&page.cell_text("attr-FreePaymentChannel", col), ","),
        deducting_from_service_provider: page.cell_text("attr-DeductingFromBankACFee", col),
        deducting_from_other_service_provider: page
            .cell_text("attr-DeductingFromOtherBankACFee", col),
        service_provider_counter: page.cell_text("attr-ServiceProviderCounter", col),
        other_provider_counter: page.cell_text("attr-OtherProviderCounter", col),
        payment_service_points: line_list(page, "attr-OthersPaymentCounter", col),
        online_payment: page.cell_text("attr-OnlinePaymentFee", col),
        cdm_atm_payment: page.cell_text("attr-CDMATMPaymentFee", col),
        phone_payment: page.cell_text("attr-PhonePaymentFee", col),
        cheque_money_order_payment: page.cell_text("attr-ChequeMoneyOrderPaymentFee", col),
        other_channel_payment: optional_text(&page.cell_text("attr-OtherChannelPaymentFee", col)),
    }
}

impl CompareProduct for TitleLoan {
    const NAME: &'static str = "title-loans";
    const CATEGORY: &'static str = "ProductApp/TitleLoan";
    const OUTPUT_FILE: &'static str = "title_loan.json";
    const PRODUCT_IDS: &'static str = "84,167,128,146,139,140,227,327,379,138,277,3,185,166,137,\
        351,77,330,135,136,386,395,105,104,92,103,102,91,402,276,82,278,381,380,375,39,325,155,\
        156,160,152,154,274,235,376,230,229,33,115,176,243,286,56,83,201,256,246,250,374,251,163,\
        134,237,252";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let product_website = page.cell_link("attr-URL", col);
        let fee_website = page.cell_link("attr-FeeURL", col);
        let additional_info = (product_website.is_some() || fee_website.is_some()).then(|| {
            AdditionalInfo {
                product_website,
                fee_website,
            }
        });

        TitleLoan {
            provider: page.provider(col),
            product: page.product(col),
            vehicle_type: split_clean(&page.cell_text("attr-TypeOfCollateral", col), "/"),
            vehicle_condition: dash_list(page, "attr-TypeOfCollateralCondition", col),
            loan_type: page.cell_text("attr-CreditLineType", col),
            interest_rate: InterestRate {
                annual_interest_rate: page.cell_text("attr-InterestWithServiceFee", col),
                interest_rate_conditions: dash_list(
                    page,
                    "attr-InterestWithServiceFeeCondition",
                    col,
                ),
                penalty_interest_rate: page.cell_text("attr-DefaultInterestRate", col),
            },
            credit_limit_and_installment: credit_limit_and_installment(page, col),
            borrower_qualifications: borrower_qualifications(page, col),
            general_fees: GeneralFees {
                stamp_duty: line_list(page, "attr-StampDutyFee", col),
                returned_cheque: page.cell_text("attr-ReturnedCheque", col),
                debt_collection_fee: line_list(page, "attr-DebtCollectionFee", col),
            },
            card_fees: CardFees {
                card_fee: page.cell_text("attr-CardFee", col),
                card_replacement_fee: page.cell_text("attr-CardReplacementFee", col),
                credit_withdrawal_fee: optional_text(
                    &page.cell_text("attr-CreditWithdrawalFee", col),
                ),
            },
            payment_fees: payment_fees(page, col),
            other_fees: OtherFees {
                litigation_lawyer_fee: lawyer_fee(
                    &page.cell_text("attr-lawyerFeeInCaseOfLitigation", col),
                ),
                other_fees_details: numbered_items(&page.cell_text("attr-OtherFee", col)),
            },
            additional_info,
        }
    }
}
