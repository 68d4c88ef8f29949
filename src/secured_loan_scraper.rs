use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{optional_text, split_clean, two_number_range},
};

/// A personal loan product that may be secured by collateral or life insurance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuredLoan {
    pub service_provider: String,
    pub product: String,
    pub product_details: ProductDetails,
    #[serde(rename = "interest_rate")]
    pub interest_details: InterestDetails,
    pub loan_details: LoanDetails,
    pub borrower_details: BorrowerDetails,
    pub fee_details: FeeDetails,
    #[serde(rename = "payments_fees")]
    pub payment_fees: PaymentFees,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetails {
    pub product_type: Vec<String>,
    pub credit_character: String,
    pub collateral: Vec<String>,
    pub credit_line_type: String,
    pub life_insurance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestDetails {
    pub interest_rate_per_year: String,
    #[serde(rename = "interest_rate_condition")]
    pub interest_rate_conditions: String,
    pub default_interest_rate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanDetails {
    pub credit_limit: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub credit_limit_condition: Vec<String>,
    pub installment_period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_period_condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_plan_detail: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowerDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub borrower_conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeDetails {
    pub internal_appraisal_fee: String,
    pub external_appraisal_fee: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stamp_duty_fee: Vec<String>,
    pub mortgage_fee: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub credit_check_fee: Vec<String>,
    pub returned_cheque_fee: String,
    pub insufficient_funds_fee: String,
    #[serde(rename = "statement_reissue_fee")]
    pub statement_reissuing_fee: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub debt_collection_fee: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other_fees: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFees {
    pub direct_debit_provider: String,
    pub direct_debit_other_provider: String,
    pub bank_counter_service: String,
    pub bank_counter_other_service: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub counter_service_fee: Vec<String>,
    pub online_payment_fee: String,
    pub cdm_atm_payment_fee: String,
    pub phone_payment_fee: String,
    pub cheque_payment_fee: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub other_payment_channels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub website: Option<String>,
    pub fee_website: Option<String>,
}

/// Ages are only read from an explicit `min-max` range; `ไม่มีกำหนด` has none.
fn age_range(text: &str) -> (Option<i64>, Option<i64>) {
    match two_number_range(text) {
        Some((min, max)) => (Some(min), Some(max)),
        None => (None, None),
    }
}

fn bullets(page: &ComparePage, attr: &str, col: Column) -> Vec<String> {
    split_clean(&page.cell_text(attr, col), "-")
}

fn fee_details(page: &ComparePage, col: Column) -> FeeDetails {
    FeeDetails {
        internal_appraisal_fee: page.cell_text("attr-SurveyAndAppraisalFeeByInternal", col),
        external_appraisal_fee: page.cell_text("attr-SurveyAndAppraisalFeeByExternal", col),
        stamp_duty_fee: bullets(page, "attr-StampDutyFee", col),
        mortgage_fee: page.cell_text("attr-MortgageFee", col),
        credit_check_fee: bullets(page, "attr-CreditBureau", col),
        returned_cheque_fee: page.cell_text("attr-ReturnedCheque", col),
        insufficient_funds_fee: page.cell_text("attr-InsufficientDirectDebitCharge", col),
        statement_reissuing_fee: page.cell_text("attr-StatementReIssuingFee", col),
        debt_collection_fee: bullets(page, "attr-DebtCollectionFee", col),
        other_fees: bullets(page, "attr-OtherFee", col),
    }
}

fn payment_fees(page: &ComparePage, col: Column) -> PaymentFees {
    PaymentFees {
        direct_debit_provider: page.cell_text("attr-DirectDebitFromAccountFee", col),
        direct_debit_other_provider: page.cell_text("attr-DirectDebitFromAccountFeeOther", col),
        bank_counter_service: page.cell_text("attr-BankCounterServiceFee", col),
        bank_counter_other_service: page.cell_text("attr-BankCounterServiceFeeOther", col),
        counter_service_fee: bullets(page, "attr-CounterServiceFeeOther", col),
        online_payment_fee: page.cell_text("attr-paymentOnlineFee", col),
        cdm_atm_payment_fee: page.cell_text("attr-paymentCDMATMFee", col),
        phone_payment_fee: page.cell_text("attr-paymentPhoneFee", col),
        cheque_payment_fee: page.cell_text("attr-paymentChequeOrMoneyOrderFee", col),
        other_payment_channels: bullets(page, "attr-paymentOtherChannelFee", col),
    }
}

impl CompareProduct for SecuredLoan {
    const NAME: &'static str = "secured-loans";
    const CATEGORY: &'static str = "ProductApp/PLoanwithorwithoutCollateral";
    const OUTPUT_FILE: &'static str = "secured_loans.json";
    const PRODUCT_IDS: &'static str = "6545,6536,877,875,7912,7923,7922,7908,7914,7918,7921,\
        7927,7915,7925";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let (min_age, max_age) = age_range(&page.cell_text("attr-BorrowerAge", col));

        SecuredLoan {
            service_provider: page.provider(col),
            product: page.product(col),
            product_details: ProductDetails {
                product_type: split_clean(&page.cell_text("attr-CreditType", col), "/"),
                credit_character: page.cell_text("attr-CharacterOfCredit", col),
                collateral: bullets(page, "attr-Collateral", col),
                credit_line_type: page.cell_text("attr-CreditLineType", col),
                life_insurance: page.cell_text("attr-MortgageReducingTermAssurance", col),
            },
            interest_details: InterestDetails {
                interest_rate_per_year: page.cell_text("attr-InterestRatePerYear", col),
                interest_rate_conditions: page.cell_text("attr-InterestRateCondition", col),
                default_interest_rate: page.cell_text("attr-DefaultInterestRate", col),
            },
            loan_details: LoanDetails {
                credit_limit: page.cell_text("attr-CreditLimit", col),
                credit_limit_condition: bullets(page, "attr-CreditLimitCondition", col),
                installment_period: page.cell_text("attr-InstallmentPeriod", col),
                installment_period_condition: optional_text(
                    &page.cell_text("attr-InstallmentPeriodCondition", col),
                ),
                installment_plan_detail: optional_text(
                    &page.cell_text("attr-InstallmentPlanDetail", col),
                ),
            },
            borrower_details: BorrowerDetails {
                min_age,
                max_age,
                borrower_conditions: bullets(page, "attr-ApplicationCondition", col),
            },
            fee_details: fee_details(page, col),
            payment_fees: payment_fees(page, col),
            additional_info: AdditionalInfo {
                website: page.cell_link("attr-URL", col),
                fee_website: page.cell_link("attr-FeeURL", col),
            },
        }
    }
}
