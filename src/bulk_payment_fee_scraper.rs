use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::split_clean,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkPaymentFee {
    pub provider: String,
    #[serde(rename = "Fees")]
    pub fees: BulkFees,
    pub other_fees: Fee,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkFees {
    pub transfer_next_day: Fee,
    pub transfer_same_day_100k: Fee,
    pub transfer_same_day_500k: Fee,
    pub transfer_same_day_two_million: Fee,
    pub promptpay_100k: Fee,
    pub promptpay_two_million: Fee,
    pub direct_credit_in_branch: Fee,
    pub direct_credit_across_branch: Fee,
    pub direct_debit_in_branch: Fee,
    pub direct_debit_across_branch: Fee,
}

/// The headline of a cell plus the conditions hidden in its collapsed panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub fee_website: Option<String>,
}

fn fee(page: &ComparePage, attr: &str, col: Column) -> Fee {
    let description = page.cell_text_matching(attr, col, "span");
    let conditions = page
        .cell_texts_matching(attr, col, "div.collapse span.text-primary")
        .join(" ");
    Fee {
        description: (!description.is_empty()).then_some(description),
        conditions: split_clean(&conditions, "-"),
    }
}

impl CompareProduct for BulkPaymentFee {
    const NAME: &'static str = "bulk-payment-fees";
    const CATEGORY: &'static str = "FeeApp/BulkPaymentFee";
    const OUTPUT_FILE: &'static str = "bulk_payment.json";
    const PRODUCT_IDS: &'static str =
        "12,34,15,10,1,44,22,14,33,39,9,2,8,31,40,32,38,13,6,36,11,43,16,42,24,3,28";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let fees = BulkFees {
            transfer_next_day: fee(page, "attr-NextDay", col),
            transfer_same_day_100k: fee(page, "attr-SameDayOneHundredK", col),
            transfer_same_day_500k: fee(page, "attr-SameDayFiveHundredK", col),
            transfer_same_day_two_million: fee(page, "attr-SameDayTwoMillion", col),
            promptpay_100k: fee(page, "attr-PromptPayOneHundredK", col),
            promptpay_two_million: fee(page, "attr-PromptPayTwoMillion", col),
            direct_credit_in_branch: fee(page, "attr-DirectCreditInbranch", col),
            direct_credit_across_branch: fee(page, "attr-DirectCreditAccross", col),
            direct_debit_in_branch: fee(page, "attr-DirectDebitInbranch", col),
            direct_debit_across_branch: fee(page, "attr-DirectDebitAccross", col),
        };

        BulkPaymentFee {
            provider: page.provider(col),
            fees,
            other_fees: fee(page, "attr-other", col),
            additional_info: AdditionalInfo {
                fee_website: page.cell_link("attr-Feeurl", col),
            },
        }
    }
}
