use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{
        condition_after_marker, first_integer, percentage, split_clean, split_numbered_list,
        static_regex,
    },
};

static_regex!(BAHT_AMOUNT, r"(\d+(?:\.\d+)?)\s*บาท");

const NO_FEE: &str = "ไม่มีค่าธรรมเนียม";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EMoneyFee {
    pub provider: String,
    pub product: String,
    pub top_up: TopUp,
    pub general_fees: GeneralFees,
    pub spending_fees: SpendingFees,
    pub termination_fees: TerminationFees,
    pub other_fees: OtherFees,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUp {
    pub no_fee_channels: Vec<String>,
    pub fee_channels: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralFees {
    pub entrance_fee: String,
    pub annual_fee: String,
    pub card_replacement_fee: String,
    pub card_replacement_amount: Option<f64>,
    pub card_replacement_conditions: Option<String>,
    pub maintenance_fee: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingFees {
    pub spending_fee: String,
    pub spending_alert_fee: String,
    pub overseas_withdrawal_fee: String,
    pub overseas_withdrawal_amount: Option<f64>,
    pub overseas_withdrawal_conditions: Option<String>,
    pub currency_conversion_fee: String,
    pub currency_conversion_rate: Option<f64>,
    pub currency_conversion_conditions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminationFees {
    pub cash_refund_fee: String,
    pub termination_fee: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFees {
    pub other_fee_details: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub fee_url: String,
}

/// The first `N บาท` amount, which skips counts like "ครั้งที่ 2".
fn baht_amount(text: &str) -> Option<f64> {
    BAHT_AMOUNT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn termination_fee(text: &str) -> Option<i64> {
    if text.contains(NO_FEE) {
        Some(0)
    } else {
        first_integer(text)
    }
}

fn general_fees(page: &ComparePage, col: Column) -> GeneralFees {
    let card_replacement_fee = page.cell_text("attr-CardReplacementFee", col);
    GeneralFees {
        entrance_fee: page.cell_text("attr-EntranceFeeAmount", col),
        annual_fee: page.cell_text("attr-AnnualFee", col),
        card_replacement_amount: baht_amount(&card_replacement_fee),
        card_replacement_conditions: condition_after_marker(&card_replacement_fee),
        card_replacement_fee,
        maintenance_fee: page.cell_text("attr-ProductMaintenanceFee", col),
    }
}

fn spending_fees(page: &ComparePage, col: Column) -> SpendingFees {
    let overseas_withdrawal_fee = page.cell_text("attr-OverseasCashWithdrawalFee", col);
    let currency_conversion_fee = page.cell_text("attr-CurrencyConversionRiskFeeRate", col);
    SpendingFees {
        spending_fee: page.cell_text("attr-SpendingFee", col),
        spending_alert_fee: page.cell_text("attr-SpendingAlertFee", col),
        overseas_withdrawal_amount: baht_amount(&overseas_withdrawal_fee),
        overseas_withdrawal_conditions: condition_after_marker(&overseas_withdrawal_fee),
        overseas_withdrawal_fee,
        currency_conversion_rate: percentage(&currency_conversion_fee),
        currency_conversion_conditions: condition_after_marker(&currency_conversion_fee),
        currency_conversion_fee,
    }
}

impl CompareProduct for EMoneyFee {
    const NAME: &'static str = "emoney-fees";
    const CATEGORY: &'static str = "FeeApp/EMoneyFee";
    const OUTPUT_FILE: &'static str = "emoney_fees.json";
    const PRODUCT_IDS: &'static str = "10658,10669,10670,10664,10675,10677,10644,10653,10690,\
        10689,10684,10683,10687,10688,10260,93,104,10523";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let no_fee_channels = split_clean(&page.cell_text("attr-TopUpChannelsWithoutFee", col), "-")
            .into_iter()
            .filter(|channel| channel != "null")
            .collect();

        EMoneyFee {
            provider: page.provider(col),
            product: page.product(col),
            top_up: TopUp {
                no_fee_channels,
                fee_channels: page.cell_text("attr-TopUpChannelsWithFee", col),
            },
            general_fees: general_fees(page, col),
            spending_fees: spending_fees(page, col),
            termination_fees: TerminationFees {
                cash_refund_fee: page.cell_text("attr-CashRefundFee", col),
                termination_fee: termination_fee(&page.cell_text("attr-TerminationFee", col)),
            },
            other_fees: OtherFees {
                other_fee_details: split_numbered_list(&page.cell_text("attr-OtherFees", col)),
            },
            additional_info: AdditionalInfo {
                fee_url: page.cell_link("attr-FeeURL", col).unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn amounts_need_a_baht_unit() {
        assert_eq!(baht_amount("ครั้งที่ 2 ขึ้นไป 50 บาท"), Some(50.0));
        assert_eq!(baht_amount("ฟรี"), None);
        assert_eq!(termination_fee("ไม่มีค่าธรรมเนียม"), Some(0));
        assert_eq!(termination_fee("100 บาท"), Some(100));
    }

    #[test]
    fn each_column_reads_its_own_cells() {
        let html = compare_table(
            &[("บริษัท ทรูมันนี่", "TrueMoney Wallet"), ("บริษัท แอร์เพย์", "AirPay")],
            &[
                (
                    "attr-TopUpChannelsWithoutFee",
                    vec!["<span>- ธนาคาร - null - ตู้บุญเติม</span>", "<span>- ShopeePay</span>"],
                ),
                (
                    "attr-CardReplacementFee",
                    vec!["<span>100 บาท เงื่อนไข: บัตรชำรุด</span>", "<span>ไม่มีบริการ</span>"],
                ),
                (
                    "attr-CurrencyConversionRiskFeeRate",
                    vec!["<span>2.5% เงื่อนไข: ทุกสกุลเงิน</span>", ""],
                ),
                (
                    "attr-TerminationFee",
                    vec!["<span>ไม่มีค่าธรรมเนียม</span>", "<span>20 บาท</span>"],
                ),
            ],
            1,
        );
        let records: Vec<EMoneyFee> = records_from_page(&ComparePage::parse(&html), 3);
        assert_eq!(records.len(), 2);

        let true_money = &records[0];
        assert_eq!(true_money.top_up.no_fee_channels, vec!["ธนาคาร", "ตู้บุญเติม"]);
        assert_eq!(true_money.general_fees.card_replacement_amount, Some(100.0));
        assert_eq!(
            true_money.general_fees.card_replacement_conditions.as_deref(),
            Some("บัตรชำรุด")
        );
        assert_eq!(true_money.spending_fees.currency_conversion_rate, Some(2.5));
        assert_eq!(true_money.termination_fees.termination_fee, Some(0));

        let air_pay = &records[1];
        assert_eq!(air_pay.top_up.no_fee_channels, vec!["ShopeePay"]);
        assert_eq!(air_pay.general_fees.card_replacement_amount, None);
        assert_eq!(air_pay.termination_fees.termination_fee, Some(20));
    }
}
