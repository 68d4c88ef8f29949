use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{first_integer, first_number, optional_text, split_clean},
};

const NO_FEE: &str = "ไม่มีค่าธรรมเนียม";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebitFee {
    pub provider: String,
    pub product: String,
    pub general_fees: GeneralFees,
    pub domestic_transaction_fees: DomesticTransaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub international_fees: Option<InternationalTransaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_fees: Option<OtherFees>,
    pub additional_info: Option<AdditionalInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralFees {
    pub entrance_fee: String,
    pub annual_fee: AnnualFee,
    pub card_replacement_fee: Option<Vec<String>>,
    pub pin_replacement_fee: Option<String>,
    pub statement_request_fee: Option<Vec<String>>,
    pub transaction_slip_request_fee: Option<String>,
    pub transaction_verification_fee: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualFee {
    pub amount: i64,
    pub conditions: Option<String>,
}

impl AnnualFee {
    fn parse(text: &str, conditions: &str) -> Self {
        if text.contains(NO_FEE) {
            return AnnualFee {
                amount: 0,
                conditions: None,
            };
        }
        AnnualFee {
            amount: first_integer(text).unwrap_or(0),
            conditions: (!conditions.is_empty()).then(|| conditions.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomesticTransaction {
    pub free_transaction_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_transaction_conditions: Option<Vec<String>>,
    pub balance_inquiry_fee_out: Option<String>,
    pub withdraw_fee_out: Option<String>,
    pub transfer_fee_out: Option<String>,
    pub balance_inquiry_fee_in: Option<String>,
    pub withdraw_fee_in: Option<String>,
    pub transfer_fee_in: Option<String>,
    pub balance_inquiry_fee_out_alt: Option<String>,
    pub withdraw_fee_out_alt: Option<String>,
    pub transfer_fee_out_alt: Option<String>,
    pub transfer_limit_10k: Option<String>,
    pub transfer_limit_50k: Option<String>,
    pub additional_fee: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternationalTransaction {
    pub withdrawal_fee: Option<String>,
    pub balance_inquiry_fee: Option<String>,
    pub currency_exchange_fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_exchange_fee_percent: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFees {
    pub other_fees: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub fee_website_link: String,
}

fn optional(page: &ComparePage, attr: &str, col: Column) -> Option<String> {
    optional_text(&page.cell_text(attr, col))
}

/// `-` separated parts, `None` when there are none.
fn optional_list(text: &str) -> Option<Vec<String>> {
    let parts = split_clean(text, "-");
    (!parts.is_empty()).then_some(parts)
}

fn general_fees(page: &ComparePage, col: Column) -> GeneralFees {
    let annual_fee = AnnualFee::parse(
        &page.cell_text("attr-CardHolderAnnualFee", col),
        &page.cell_text_matching("attr-CardHolderAnnualFee", col, ".text-primary"),
    );

    GeneralFees {
        entrance_fee: page.cell_text("attr-CardHolderEntranceFee", col),
        annual_fee,
        card_replacement_fee: optional_list(&page.cell_text("attr-CardReplacementFee", col)),
        pin_replacement_fee: optional(page, "attr-CardPINReplacement", col),
        statement_request_fee: optional_list(&page.cell_text("attr-CopyStatementFee", col)),
        transaction_slip_request_fee: optional(page, "attr-CopySaleSlipFee", col),
        transaction_verification_fee: optional(page, "attr-TransactionVerification", col),
    }
}

fn domestic_fees(page: &ComparePage, col: Column) -> DomesticTransaction {
    let free_transactions = page.cell_text("attr-FeeInternal", col);

    DomesticTransaction {
        free_transaction_count: first_integer(&free_transactions),
        free_transaction_conditions: optional_list(&free_transactions),
        balance_inquiry_fee_out: optional(page, "attr-KioskCheckBalanceFee", col),
        withdraw_fee_out: optional(page, "attr-KioskWitddrawFee", col),
        transfer_fee_out: optional(page, "attr-KiosTransferFee", col),
        balance_inquiry_fee_in: optional(page, "attr-KioskBalanceInFee", col),
        withdraw_fee_in: optional(page, "attr-KioskWithdrawInFee", col),
        transfer_fee_in: optional(page, "attr-KioskTransferInFee", col),
        balance_inquiry_fee_out_alt: optional(page, "attr-KioskBalanceOutFee", col),
        withdraw_fee_out_alt: optional(page, "attr-KioskWithdrawOutFee", col),
        transfer_fee_out_alt: optional(page, "attr-KioskTransferOutFee", col),
        transfer_limit_10k: optional(page, "attr-KioskTransfer10kFee", col),
        transfer_limit_50k: optional(page, "attr-KioskTransfer50kFee", col),
        additional_fee: optional(page, "attr-KioskOtherFee", col),
    }
}

fn international_fees(page: &ComparePage, col: Column) -> Option<InternationalTransaction> {
    let withdrawal_fee = optional(page, "attr-InteralWithdrawFee", col);
    let balance_inquiry_fee = optional(page, "attr-InteralBalnace", col);
    let currency_exchange_fee = optional(page, "attr-FXRiskCost", col);

    if withdrawal_fee.is_none()
        && balance_inquiry_fee.is_none()
        && currency_exchange_fee.is_none()
    {
        return None;
    }

    Some(InternationalTransaction {
        currency_exchange_fee_percent: currency_exchange_fee.as_deref().and_then(first_number),
        withdrawal_fee,
        balance_inquiry_fee,
        currency_exchange_fee,
    })
}

impl CompareProduct for DebitFee {
    const NAME: &'static str = "debit-card-fees";
    const CATEGORY: &'static str = "FeeApp/DebitFee";
    const OUTPUT_FILE: &'static str = "debit_fees.json";
    const PRODUCT_IDS: &'static str = "1474,1606,1634,1234,1237,1492,1502,1377,1378,1379,1380,\
        1381,1382,1365,1366,1256,976,954,950,961,13,14,67,1459,1466,1460,1467,1468,1463,731,733,\
        720,721,722,723,719,718,726,727,725,724,1490,1473,1476,1475,1478,1477,1482,1481,1484,\
        1480,1483,1488,1485,1487,1585,1641,1587,1593,1618,1627,1642,1592,1612,1594,1235,1239,\
        1236,1240,1504,1491,1496,1503,1501,1494,1499,473,474,475,477,472,246,946,958,962,972,\
        964,960,16,15,17,11,12,682,1457,1471,1465,1472,1461,1462,1469,1456,1470,1464,1458,1,2,\
        744,746,750,751,748,730,732,749,752,138,1601,1649,1500,1489,1497,1493,1498,139,1479,\
        1486,1238,1369,1367,728,729,1495";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        DebitFee {
            provider: page.provider(col),
            product: page.product(col),
            general_fees: general_fees(page, col),
            domestic_transaction_fees: domestic_fees(page, col),
            international_fees: international_fees(page, col),
            other_fees: optional_list(&page.cell_text("attr-OtherFee", col))
                .map(|other_fees| OtherFees { other_fees }),
            additional_info: page
                .cell_link("attr-feeurl", col)
                .map(|fee_website_link| AdditionalInfo { fee_website_link }),
        }
    }
}
