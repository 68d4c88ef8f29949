use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    fee::FeeAmount,
    text_manipulators::{clean_amount_text, first_integer, split_clean},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCardFee {
    pub provider: String,
    pub product: String,
    pub general_fees: GeneralFees,
    pub payment_fees: PaymentFees,
    pub other_fees: OthersFees,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualFee {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_amount: Option<i64>,
}

impl AnnualFee {
    fn from_text(text: String) -> Self {
        AnnualFee {
            initial_amount: first_integer(&text),
            text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralFees {
    pub main_card_entrance_fee: FeeAmount,
    pub main_card_annual_fee: Vec<AnnualFee>,
    pub currency_conversion_risk: FeeAmount,
    pub cash_advance_fee: FeeAmount,
    pub replacement_card_fee: FeeAmount,
    pub supplementary_card_entrance_fee: FeeAmount,
    pub supplementary_card_annual_fee: Vec<AnnualFee>,
    pub new_pin_request_fee: FeeAmount,
    pub statement_copy_fee: FeeAmount,
    pub transaction_verification_fee: FeeAmount,
    pub sales_slip_copy_fee: FeeAmount,
    pub returned_cheque_fee: FeeAmount,
    pub tax_payment_fee: FeeAmount,
    pub debt_collection_fee: Vec<FeeAmount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFees {
    pub fee_free_channels: Vec<String>,
    pub direct_debit_service_fee: FeeAmount,
    pub bank_counter_fee: FeeAmount,
    pub online_payment_fee: FeeAmount,
    pub atm_payment_fee: FeeAmount,
    pub phone_payment_fee: FeeAmount,
    pub other_payment_channels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OthersFees {
    pub other_fees: Option<FeeAmount>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub website_fee_link: Option<String>,
}

/// Card fee cells are read without thousands separators.
fn text(page: &ComparePage, attr: &str, col: Column) -> String {
    clean_amount_text(&page.cell_text(attr, col))
}

fn amount(page: &ComparePage, attr: &str, col: Column) -> FeeAmount {
    FeeAmount::amount(&text(page, attr, col))
}

impl CompareProduct for CreditCardFee {
    const NAME: &'static str = "credit-card-fees";
    const CATEGORY: &'static str = "FeeApp/CreditFee";
    const OUTPUT_FILE: &'static str = "creditcard_fees.json";
    const PRODUCT_IDS: &'static str =
        "5148,5180,5114,5213,5233,5177,5161,4471,4472,4445,4482,4483,4484,4479,4480,4475,4481,4452";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let provider = page.provider(col);
        let product = page.product(col);

        let entrance_fee = text(page, "attr-primaryHolderEntranceFeeDisplay", col);
        if entrance_fee.is_empty() {
            warn!("entrance fee not found for {provider} {product}");
        }

        let general_fees = GeneralFees {
            main_card_entrance_fee: FeeAmount::amount(&entrance_fee),
            main_card_annual_fee: vec![AnnualFee::from_text(text(
                page,
                "attr-primaryHolderAnnualFee",
                col,
            ))],
            currency_conversion_risk: FeeAmount::percentage(&text(page, "attr-CostFXRisk", col)),
            cash_advance_fee: amount(page, "attr-cashAdvanceFee", col),
            replacement_card_fee: amount(page, "attr-replacementCardFee", col),
            supplementary_card_entrance_fee: amount(
                page,
                "attr-supplementaryCardHolderEntranceFeeDisplay",
                col,
            ),
            supplementary_card_annual_fee: vec![AnnualFee::from_text(text(
                page,
                "attr-supplementaryCardHolderAnnualFeeFirstYear",
                col,
            ))],
            new_pin_request_fee: amount(page, "attr-replacementCardFPinFee", col),
            statement_copy_fee: amount(page, "attr-copyStatementFee", col),
            transaction_verification_fee: amount(page, "attr-TransactionVerifyFee", col),
            sales_slip_copy_fee: amount(page, "attr-copySaleSlipFee", col),
            returned_cheque_fee: amount(page, "attr-fineChequeReturn", col),
            tax_payment_fee: amount(page, "attr-GovernmentAgencyRelatedPaymentFee", col),
            debt_collection_fee: vec![amount(page, "attr-debtCollectionFee", col)],
        };

        let payment_fees = PaymentFees {
            fee_free_channels: split_clean(&text(page, "attr-freePaymentChannel", col), "-"),
            direct_debit_service_fee: amount(page, "attr-directDebitFromAccountFee", col),
            bank_counter_fee: amount(page, "attr-BankCounterServiceFee", col),
            online_payment_fee: amount(page, "attr-paymentOnlineFee", col),
            atm_payment_fee: amount(page, "attr-paymentCDMATMFee", col),
            phone_payment_fee: amount(page, "attr-paymentPhoneFee", col),
            other_payment_channels: split_clean(
                &text(page, "attr-paymentOtherChannelFee", col),
                "-",
            ),
        };

        let other_fee = text(page, "attr-other", col);

        CreditCardFee {
            provider,
            product,
            general_fees,
            payment_fees,
            other_fees: OthersFees {
                other_fees: (!other_fee.is_empty()).then(|| FeeAmount::amount(&other_fee)),
            },
            additional_info: AdditionalInfo {
                website_fee_link: page.cell_link("attr-Feeurl", col),
            },
        }
    }
}
