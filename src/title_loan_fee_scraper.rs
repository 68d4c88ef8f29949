use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{
        all_integers, all_numbers, clean_amount_text, leading_number, optional_text, split_clean,
    },
};

const NO_FEE: &str = "ไม่มีค่าธรรมเนียม";
const NO_SERVICE: &str = "ไม่มีบริการ";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleLoanFee {
    pub service_provider: String,
    pub product: String,
    pub general_fees: GeneralFees,
    pub card_fees: CardFees,
    pub payment_fees: PaymentFees,
    pub other_fees: OtherFees,
    pub additional_information: AdditionalInformation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralFees {
    pub late_payment_interest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub late_payment_interest_value: Option<f64>,
    pub debt_collection_fee: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub debt_collection_fee_values: Vec<i64>,
    pub stamp_duty_fee: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub stamp_duty_fee_values: Vec<f64>,
    pub cheque_return_fee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheque_return_fee_value: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardFees {
    pub card_fee: String,
    pub card_replacement_fee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_withdrawal_fee: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFees {
    pub free_payment_channels: Vec<String>,
    pub provider_account_deduction_fee: String,
    pub other_provider_account_fee: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_provider_account_fee_value: Option<f64>,
    pub service_provider_branch_fee: String,
    pub other_branch_fee: String,
    pub service_counter_fee: String,
    pub online_payment_fee: Vec<String>,
    pub cdm_atm_payment_fee: String,
    pub telephone_payment_fee: String,
    pub cheque_or_money_order_payment_fee: String,
    pub other_payment_channels_fee: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFees {
    pub lawyer_fee_litigation: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub lawyer_fee_values: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_fees: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInformation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_website_link: Option<String>,
}

/// "No fee" reads as zero, "no service" and unparsable text as absent.
fn fee_value(text: &str) -> Option<f64> {
    match text.trim() {
        NO_FEE => Some(0.0),
        "" | NO_SERVICE => None,
        text => leading_number(text),
    }
}

fn text(page: &ComparePage, attr: &str, col: Column) -> String {
    clean_amount_text(&page.cell_text(attr, col))
}

fn parts(page: &ComparePage, attr: &str, col: Column, delimiter: &str) -> Vec<String> {
    split_clean(&text(page, attr, col), delimiter)
}

fn general_fees(page: &ComparePage, col: Column) -> GeneralFees {
    let late_payment_interest = text(page, "attr-DefaultInterestRate", col);
    let debt_collection = text(page, "attr-DebtCollectionFee", col);
    let stamp_duty = text(page, "attr-StampDutyFee", col);
    let cheque_return_fee = text(page, "attr-ReturnedCheque", col);

    GeneralFees {
        late_payment_interest_value: fee_value(&late_payment_interest),
        late_payment_interest,
        debt_collection_fee: split_clean(&debt_collection, "-"),
        debt_collection_fee_values: all_integers(&debt_collection),
        stamp_duty_fee: split_clean(&stamp_duty, "-"),
        stamp_duty_fee_values: all_numbers(&stamp_duty),
        cheque_return_fee_value: fee_value(&cheque_return_fee),
        cheque_return_fee,
    }
}

fn payment_fees(page: &ComparePage, col: Column) -> PaymentFees {
    let other_provider_account_fee = text(page, "attr-DeductingFromOtherBankACFee", col);

    PaymentFees {
        free_payment_channels: parts(page, "attr-FreePaymentChannel", col, "/"),
        provider_account_deduction_fee: text(page, "attr-DeductingFromBankACFee", col),
        other_provider_account_fee_value: fee_value(&other_provider_account_fee),
        other_provider_account_fee,
        service_provider_branch_fee: text(page, "attr-ServiceProviderCounter", col),
        other_branch_fee: text(page, "attr-OtherProviderCounter", col),
        service_counter_fee: text(page, "attr-OthersPaymentCounter", col),
        online_payment_fee: parts(page, "attr-OnlinePaymentFee", col, "-"),
        cdm_atm_payment_fee: text(page, "attr-CDMATMPaymentFee", col),
        telephone_payment_fee: text(page, "attr-PhonePaymentFee", col),
        cheque_or_money_order_payment_fee: text(page, "attr-ChequeMoneyOrderPaymentFee", col),
        other_payment_channels_fee: text(page, "attr-OtherChannelPaymentFee", col),
    }
}

impl CompareProduct for TitleLoanFee {
    const NAME: &'static str = "title-loan-fees";
    const CATEGORY: &'static str = "FeeApp/TitleLoanFee";
    const OUTPUT_FILE: &'static str = "title_loan_fees.json";
    const PRODUCT_IDS: &'static str = "128,375,115,166,246,278,103,102,83,374,243,167,325,134,\
        39,135,136,235,237,402,386,395,138,139,140,351";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let lawyer_fee = text(page, "attr-lawyerFeeInCaseOfLitigation", col);

        TitleLoanFee {
            service_provider: page.provider(col),
            product: page.product(col),
            general_fees: general_fees(page, col),
            card_fees: CardFees {
                card_fee: text(page, "attr-CardFee", col),
                card_replacement_fee: text(page, "attr-CardReplacementFee", col),
                credit_withdrawal_fee: optional_text(&text(page, "attr-CreditWithdrawalFee", col)),
            },
            payment_fees: payment_fees(page, col),
            other_fees: OtherFees {
                lawyer_fee_litigation: split_clean(&lawyer_fee, "-"),
                lawyer_fee_values: all_numbers(&lawyer_fee),
                other_fees: optional_text(&text(page, "attr-OtherFee", col)),
            },
            additional_information: AdditionalInformation {
                fee_website_link: page.cell_link("attr-FeeURL", col),
            },
        }
    }
}
