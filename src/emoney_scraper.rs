use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    fee::FeeAmount,
    text_manipulators::{first_integer, optional_text, percentage, split_clean},
};

const NO_FEE: &str = "ไม่มีค่าธรรมเนียม";
const NO_LIMIT: &str = "ไม่มีกำหนด";

/// An e-money (stored value) product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EMoney {
    pub provider: String,
    pub product: String,
    pub features_and_conditions: FeaturesAndConditions,
    pub top_up: TopUp,
    pub fees: Fees,
    pub spending_fees: SpendingFees,
    pub cancellation_fees: CancellationFees,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesAndConditions {
    pub highlight_features: Option<String>,
    pub age_requirement: Option<String>,
    pub applicant_qualification: Vec<String>,
    pub usage_conditions: UsageConditions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageConditions {
    pub usage_method: Option<String>,
    pub lifetime: Option<String>,
    pub payment_method: Option<String>,
    pub supported_merchants: Option<String>,
    pub website_list: Option<String>,
    pub international_service: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopUp {
    pub top_up_frequency: Option<String>,
    pub first_top_up_value: Option<String>,
    pub first_top_up_condition: Option<String>,
    pub next_top_up_value: Option<String>,
    pub next_top_up_condition: Option<String>,
    pub max_balance: Option<i64>,
    pub max_balance_condition: Option<String>,
    pub free_top_up_channels: Vec<String>,
    pub fee_top_up_channels: Vec<String>,
    pub fee_top_up_channels_numeric: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fees {
    pub initial_fee: FeeAmount,
    pub annual_fee: FeeAmount,
    pub card_reissue_fee: FeeAmount,
    pub maintenance_fee: FeeAmount,
    pub other_fees: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingFees {
    pub spending_fee: Option<i64>,
    pub spending_notification_fee: FeeAmount,
    pub international_withdrawal_fee: Option<String>,
    pub currency_conversion_fee: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationFees {
    pub cash_redemption_fee: FeeAmount,
    pub early_termination_fee: Option<String>,
    pub early_termination_fee_percentage: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub product_website: Option<String>,
    pub fee_website: Option<String>,
}

/// `None` for an open-ended balance.
fn max_balance(text: &str) -> Option<i64> {
    if text.contains(NO_LIMIT) {
        None
    } else {
        first_integer(text)
    }
}

/// A waived spending fee reads as `0`.
fn spending_fee(text: &str) -> Option<i64> {
    if text.contains(NO_FEE) {
        Some(0)
    } else {
        first_integer(text)
    }
}

fn text(page: &ComparePage, attr: &str, col: Column) -> Option<String> {
    optional_text(&page.cell_text(attr, col))
}

fn amount(page: &ComparePage, attr: &str, col: Column) -> FeeAmount {
    FeeAmount::amount(&page.cell_text(attr, col))
}

fn features_and_conditions(page: &ComparePage, col: Column) -> FeaturesAndConditions {
    FeaturesAndConditions {
        highlight_features: text(page, "attr-KeyProduct", col),
        age_requirement: text(page, "attr-CustomerAge", col),
        applicant_qualification: split_clean(&page.cell_text("attr-ConditionToApply", col), "-"),
        usage_conditions: UsageConditions {
            usage_method: text(page, "attr-UsageCharacteristic", col),
            lifetime: text(page, "attr-UsagePeriod", col),
            payment_method: text(page, "attr-Payment", col),
            supported_merchants: text(page, "attr-ParticipatedShops", col),
            website_list: text(page, "attr-ParticipatedShopsURL", col),
            international_service: text(page, "attr-OverseasSpending", col),
        },
    }
}

fn top_up(page: &ComparePage, col: Column) -> TopUp {
    let fee_top_up_channels = split_clean(&page.cell_text("attr-TopUpChannelsWithFee", col), "-");
    TopUp {
        top_up_frequency: text(page, "attr-TopUpFrequency", col),
        first_top_up_value: text(page, "attr-FirstTopUpAmount", col),
        first_top_up_condition: text(page, "attr-FirstTopUpAmountCondition", col),
        next_top_up_value: text(page, "attr-FollowingTopUpAmount", col),
        next_top_up_condition: text(page, "attr-FollowingTopUpAmountCondition", col),
        max_balance: max_balance(&page.cell_text("attr-RemainingBalance", col)),
        max_balance_condition: text(page, "attr-RemainingBalanceCondition", col),
        free_top_up_channels: split_clean(
            &page.cell_text("attr-TopUpChannelsWithoutFee", col),
            "-",
        ),
        fee_top_up_channels_numeric: fee_top_up_channels
            .iter()
            .filter_map(|channel| first_integer(channel))
            .collect(),
        fee_top_up_channels,
    }
}

impl CompareProduct for EMoney {
    const NAME: &'static str = "emoney";
    const CATEGORY: &'static str = "ProductApp/EMoney";
    const OUTPUT_FILE: &'static str = "emoney.json";
    const PRODUCT_IDS: &'static str = "93,10150,10151,10397,10485,10107,10106,10105,10108,10220,\
        10604,10675,10669,10670,10664,10677,10605,10600,10601,29,10603,92,57,54,56,104,10523,\
        10653,10228,10227,10602,85,10474,10392,10294,10292,10658,10644,10239,10219,10584,10260,\
        10152,10153,28,10674,31,10660,10235,10234,10662,30,10398,10484,10486,55,60,10291,10668,\
        10606,53,10607,10632,10609,10619,10643,10681,10290,10296,10637,10616,58";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let termination_fee = page.cell_text("attr-TerminationFee", col);

        EMoney {
            provider: page.provider(col),
            product: page.product(col),
            features_and_conditions: features_and_conditions(page, col),
            top_up: top_up(page, col),
            fees: Fees {
                initial_fee: amount(page, "attr-EntranceFeeAmount", col),
                annual_fee: amount(page, "attr-AnnualFee", col),
                card_reissue_fee: amount(page, "attr-CardReplacementFee", col),
                maintenance_fee: amount(page, "attr-ProductMaintenanceFee", col),
                other_fees: text(page, "attr-OtherFees", col),
            },
            spending_fees: SpendingFees {
                spending_fee: spending_fee(&page.cell_text("attr-SpendingFee", col)),
                spending_notification_fee: amount(page, "attr-SpendingAlertFee", col),
                international_withdrawal_fee: text(page, "attr-OverseasCashWithdrawalFee", col),
                currency_conversion_fee: text(page, "attr-CurrencyConversionRiskFeeRate", col),
            },
            cancellation_fees: CancellationFees {
                cash_redemption_fee: amount(page, "attr-CashRefundFee", col),
                early_termination_fee_percentage: percentage(&termination_fee),
                early_termination_fee: optional_text(&termination_fee),
            },
            additional_info: AdditionalInfo {
                product_website: page.cell_link("attr-URL", col),
                fee_website: page.cell_link("attr-FeeURL", col),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn open_balances_and_waived_fees() {
        assert_eq!(max_balance("ไม่มีกำหนด"), None);
        assert_eq!(max_balance("100,000"), Some(100_000));
        assert_eq!(spending_fee("ไม่มีค่าธรรมเนียม"), Some(0));
        assert_eq!(spending_fee(""), None);
    }

    #[test]
    fn reads_wallet_limits_and_channels() {
        let html = compare_table(
            &[("บริษัท ทรู มันนี่", "ทรูมันนี่ วอลเล็ท")],
            &[
                ("attr-CustomerAge", vec!["<span>7 ปีขึ้นไป</span>"]),
                ("attr-RemainingBalance", vec!["<span>100,000</span>"]),
                (
                    "attr-TopUpChannelsWithFee",
                    vec!["<span>- ตู้บุญเติม 10 บาท - เคาน์เตอร์เซอร์วิส 15 บาท</span>"],
                ),
                ("attr-TerminationFee", vec!["<span>2 % ของยอดคงเหลือ</span>"]),
                ("attr-URL", vec![r#"<a class="prod-url" href="https://truemoney.example">x</a>"#]),
            ],
            1,
        );
        let records: Vec<EMoney> = records_from_page(&ComparePage::parse(&html), 3);
        let wallet = &records[0];

        assert_eq!(
            wallet.features_and_conditions.age_requirement.as_deref(),
            Some("7 ปีขึ้นไป")
        );
        assert!(wallet.features_and_conditions.highlight_features.is_none());
        assert_eq!(wallet.top_up.max_balance, Some(100_000));
        assert_eq!(wallet.top_up.fee_top_up_channels_numeric, vec![10, 15]);
        assert_eq!(
            wallet.cancellation_fees.early_termination_fee_percentage,
            Some(2.0)
        );
        assert_eq!(
            wallet.additional_info.product_website.as_deref(),
            Some("https://truemoney.example")
        );
    }
}
