use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{optional_text, split_clean, split_numbered_list, two_number_range},
};

const UNSPECIFIED: &str = "ไม่กำหนด";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NanoFinance {
    pub service_provider: String,
    pub product: String,
    #[serde(rename = "productDetails")]
    pub product_details: ProductDetails,
    pub applicant_conditions: ApplicantConditions,
    pub credit_approval_conditions: CreditApprovalConditions,
    pub interest_rate_details: InterestRateDetails,
    pub payment_fees: PaymentFees,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetails {
    pub details: Vec<String>,
    pub credit_line: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicantConditions {
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
    pub applicant_qualifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanAmount {
    pub min_loan_amount: i64,
    pub max_loan_amount: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDuration {
    pub min_loan_month: Option<i64>,
    pub max_loan_month: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentConditions {
    pub conditions_repayment: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditApprovalConditions {
    pub loan_amount: Option<LoanAmount>,
    pub approval_conditions: Option<String>,
    pub loan_duration: LoanDuration,
    pub repayment_conditions: RepaymentConditions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestRateDetails {
    pub interest_with_service: String,
    pub interest_with_servicefee_condition: Vec<String>,
    pub default_interest_rate: String,
    pub default_interestrate_condition: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFees {
    pub free_payment_channels: Vec<String>,
    pub deduct_from_provider_account: String,
    pub deduct_from_other_provider_account: String,
    pub pay_at_provider_branch: String,
    pub pay_at_other_branch: String,
    pub pay_at_payment_counters: String,
    pub online_payment_channels: Vec<String>,
    pub atm_cdm_payment_channels: Vec<String>,
    pub phone_payment_channels: String,
    pub cheque_money_order_channels: String,
    pub other_payment_channels: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub product_website_link: String,
}

fn loan_amount(text: &str) -> Option<LoanAmount> {
    two_number_range(text).map(|(min_loan_amount, max_loan_amount)| LoanAmount {
        min_loan_amount,
        max_loan_amount,
    })
}

fn loan_duration(text: &str) -> LoanDuration {
    let range = if text == UNSPECIFIED {
        None
    } else {
        two_number_range(text)
    };
    LoanDuration {
        min_loan_month: range.map(|(min, _)| min),
        max_loan_month: range.map(|(_, max)| max),
    }
}

fn dash_list(page: &ComparePage, attr: &str, col: Column) -> Vec<String> {
    split_clean(&page.cell_text(attr, col), "-")
}

fn product_details(page: &ComparePage, col: Column) -> ProductDetails {
    let mut credit_line = vec![page.cell_text_matching("attr-CreditLine", col, "span")];
    let details = page
        .cell_texts_matching("attr-CreditLine", col, "div span")
        .join(" ");
    credit_line.extend(split_clean(&details, "-"));

    ProductDetails {
        details: dash_list(page, "attr-ProductCondition", col),
        credit_line,
    }
}

fn applicant_conditions(page: &ComparePage, col: Column) -> ApplicantConditions {
    let ages = two_number_range(&page.cell_text("attr-CustomerAge", col));
    ApplicantConditions {
        min_age: ages.map(|(min, _)| min),
        max_age: ages.map(|(_, max)| max),
        applicant_qualifications: dash_list(page, "attr-ConditionToApply", col),
    }
}

fn payment_fees(page: &ComparePage, col: Column) -> PaymentFees {
    PaymentFees {
        free_payment_channels: split_numbered_list(&page.cell_text("attr-FreePaymentChannel", col)),
        deduct_from_provider_account: page.cell_text("attr-DeductingFromBankACFee", col),
        deduct_from_other_provider_account: page.cell_text("attr-DeductingFromOtherBankACFee", col),
        pay_at_provider_branch: page.cell_text("attr-ServiceProviderCounter", col),
        pay_at_other_branch: page.cell_text("attr-OtherProviderCounter", col),
        pay_at_payment_counters: page.cell_text("attr-OthersPaymentCounter", col),
        online_payment_channels: dash_list(page, "attr-OnlinePaymentFee", col),
        atm_cdm_payment_channels: split_clean(&page.cell_text("attr-CDMATMPaymentFee", col), "/"),
        phone_payment_channels: page.cell_text("attr-PhonePaymentFee", col),
        cheque_money_order_channels: page.cell_text("attr-ChequeMoneyOrderPaymentFee", col),
        other_payment_channels: page.cell_text("attr-OtherChannelPaymentFee", col),
    }
}

impl CompareProduct for NanoFinance {
    const NAME: &'static str = "nano-finance";
    const CATEGORY: &'static str = "ProductApp/NanoFinance";
    const OUTPUT_FILE: &'static str = "nanofinance.json";
    const PRODUCT_IDS: &'static str = "192,50,52,236,133,180,139,137,141,59,256,182,257,49,181,\
        32,258,135,242,243,248,132,145,33,218,82,85,240,233,239,237,92,51,194,191,41,249,206,96,\
        245,56,229,10,231,11,196";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let credit_approval_conditions = CreditApprovalConditions {
            loan_amount: loan_amount(&page.cell_text("attr-CreditLimit", col)),
            approval_conditions: optional_text(&page.cell_text("attr-CreditLimitCondition", col)),
            loan_duration: loan_duration(&page.cell_text("attr-InstallmentPeriod", col)),
            repayment_conditions: RepaymentConditions {
                conditions_repayment: dash_list(page, "attr-InstallmentPeriodCondition", col),
            },
        };

        let interest_rate_details = InterestRateDetails {
            interest_with_service: page.cell_text("attr-InterestWithServiceFee", col),
            interest_with_servicefee_condition: dash_list(
                page,
                "attr-InterestWithServiceFeeCondition",
                col,
            ),
            default_interest_rate: page.cell_text("attr-DefaultInterestRate", col),
            default_interestrate_condition: dash_list(
                page,
                "attr-DefaultInterestRateCondition",
                col,
            ),
        };

        NanoFinance {
            service_provider: page.provider(col),
            product: page.product(col),
            product_details: product_details(page, col),
            applicant_conditions: applicant_conditions(page, col),
            credit_approval_conditions,
            interest_rate_details,
            payment_fees: payment_fees(page, col),
            additional_info: AdditionalInfo {
                product_website_link: page.cell_link("attr-URL", col).unwrap_or_default(),
            },
        }
    }
}
