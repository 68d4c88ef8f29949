use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{clean_amount_text, percentage, split_clean},
};

/// Fees of personal loans with or without collateral.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecuredLoanFee {
    pub service_provider: String,
    pub product: String,
    pub general_fees: GeneralFees,
    pub payment_fees: PaymentFees,
    pub other_fees: OtherFees,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralFees {
    pub internal_evaluation: FeeDetail,
    pub external_evaluation: FeeDetail,
    pub stamp_duty: FeeDetail,
    pub mortgage_fee: FeeDetail,
    pub credit_check: FeeDetail,
    pub returned_cheque_fee: FeeDetail,
    pub insufficient_funds_fee: FeeDetail,
    pub statement_reissuing_fee: Vec<String>,
    pub debt_collection_fee: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFees {
    pub debit_from_account: FeeDetail,
    pub debit_from_other_account: FeeDetail,
    pub pay_at_provider_branch: FeeDetail,
    pub pay_at_other_branch: FeeDetail,
    pub pay_at_service_point: FeeDetail,
    pub pay_online: FeeDetail,
    pub pay_via_cdm_atm: FeeDetail,
    pub pay_via_phone: FeeDetail,
    pub pay_via_cheque_or_money_order: FeeDetail,
    pub pay_via_other_channels: FeeDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeDetail {
    pub original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<i64>,
}

impl FeeDetail {
    /// `fee_amount` is the last standalone whole number, with or without a
    /// glued `บาท`.
    fn from_text(text: &str) -> Self {
        let original_text = clean_amount_text(text);
        FeeDetail {
            percentage: percentage(&original_text),
            fee_amount: original_text
                .split_whitespace()
                .filter_map(|word| word.trim_end_matches("บาท").parse().ok())
                .last(),
            original_text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFees {
    pub other_fee: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub fee_website: String,
}

fn fee_detail(page: &ComparePage, attr: &str, col: Column) -> FeeDetail {
    FeeDetail::from_text(&page.cell_text(attr, col))
}

fn fee_lines(page: &ComparePage, attr: &str, col: Column) -> Vec<String> {
    split_clean(&clean_amount_text(&page.cell_text(attr, col)), "-")
}

fn general_fees(page: &ComparePage, col: Column) -> GeneralFees {
    GeneralFees {
        internal_evaluation: fee_detail(page, "attr-SurveyAndAppraisalFeeByInternal", col),
        external_evaluation: fee_detail(page, "attr-SurveyAndAppraisalFeeByExternal", col),
        stamp_duty: fee_detail(page, "attr-StampDutyFee", col),
        mortgage_fee: fee_detail(page, "attr-MortgageFee", col),
        credit_check: fee_detail(page, "attr-CreditBureau", col),
        returned_cheque_fee: fee_detail(page, "attr-ReturnedCheque", col),
        insufficient_funds_fee: fee_detail(page, "attr-InsufficientDirectDebitCharge", col),
        statement_reissuing_fee: fee_lines(page, "attr-StatementReIssuingFee", col),
        debt_collection_fee: fee_lines(page, "attr-DebtCollectionFee", col),
    }
}

fn payment_fees(page: &ComparePage, col: Column) -> PaymentFees {
    PaymentFees {
        debit_from_account: fee_detail(page, "attr-DirectDebitFromAccountFee", col),
        debit_from_other_account: fee_detail(page, "attr-DirectDebitFromAccountFeeOther", col),
        pay_at_provider_branch: fee_detail(page, "attr-BankCounterServiceFee", col),
        pay_at_other_branch: fee_detail(page, "attr-BankCounterServiceFeeOther", col),
        pay_at_service_point: fee_detail(page, "attr-CounterServiceFeeOther", col),
        pay_online: fee_detail(page, "attr-paymentOnlineFee", col),
        pay_via_cdm_atm: fee_detail(page, "attr-paymentCDMATMFee", col),
        pay_via_phone: fee_detail(page, "attr-paymentPhoneFee", col),
        pay_via_cheque_or_money_order: fee_detail(page, "attr-paymentChequeOrMoneyOrderFee", col),
        pay_via_other_channels: fee_detail(page, "attr-paymentOtherChannelFee", col),
    }
}

impl CompareProduct for SecuredLoanFee {
    const NAME: &'static str = "secured-loan-fees";
    const CATEGORY: &'static str = "FeeApp/PLoanwithorwithoutCollateralFee";
    const OUTPUT_FILE: &'static str = "secured_loan_fees.json";
    const PRODUCT_IDS: &'static str = "6545,6536,877,875,7912,7923,7922,7908,7914,7918,7921,\
        7927,7915,7925";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        SecuredLoanFee {
            service_provider: page.provider(col),
            product: page.product(col),
            general_fees: general_fees(page, col),
            payment_fees: payment_fees(page, col),
            other_fees: OtherFees {
                other_fee: clean_amount_text(&page.cell_text("attr-OtherFee", col)),
            },
            additional_info: AdditionalInfo {
                fee_website: page.cell_link("attr-FeeURL", col).unwrap_or_default(),
            },
        }
    }
}
