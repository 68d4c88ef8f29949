use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{
        clean_amount_text, condition_after_marker, minimum_fee, optional_text, percentage,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuaranteeFee {
    pub provider: String,
    pub fees: GuaranteeFees,
    pub other_fees: OtherFees,
    pub additional_info: AdditionalInfo,
}

/// One fee per kind of letter of guarantee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuaranteeFees {
    pub merchandise: FeeItem,
    pub advance: FeeItem,
    pub borrowing: FeeItem,
    pub bid: FeeItem,
    pub performance: FeeItem,
    pub retention: FeeItem,
    pub electricity_water: FeeItem,
    pub tax: FeeItem,
    pub others: FeeItem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeItem {
    pub original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
}

impl FeeItem {
    fn from_text(text: &str) -> Self {
        FeeItem {
            original_text: text.to_string(),
            max_percentage: percentage(text),
            min_fee: minimum_fee(text),
            conditions: condition_after_marker(text),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFees {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_website_link: Option<String>,
}

fn fee_item(page: &ComparePage, attr: &str, col: Column) -> FeeItem {
    FeeItem::from_text(&clean_amount_text(&page.cell_text(attr, col)))
}

impl CompareProduct for GuaranteeFee {
    const NAME: &'static str = "guarantee-fees";
    const CATEGORY: &'static str = "FeeApp/GuaranteeIssuingServiceFee";
    const OUTPUT_FILE: &'static str = "guarantee_fees.json";
    const PRODUCT_IDS: &'static str = "27,60,45,57,58,9,38,7,47,53,54,40,39,56,30,5,4,61,16,11,55,\
        26,43,41,21,34,52,20,8,33";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let fees = GuaranteeFees {
            merchandise: fee_item(page, "attr-Merchandise", col),
            advance: fee_item(page, "attr-Advance", col),
            borrowing: fee_item(page, "attr-Borrowing", col),
            bid: fee_item(page, "attr-Bid", col),
            performance: fee_item(page, "attr-Performance", col),
            retention: fee_item(page, "attr-Retention", col),
            electricity_water: fee_item(page, "attr-ElectricityWater", col),
            tax: fee_item(page, "attr-Tax", col),
            others: fee_item(page, "attr-Others", col),
        };
        let other = page.section_texts("attr-other", col).join(" ");

        GuaranteeFee {
            provider: page.provider(col),
            fees,
            other_fees: OtherFees {
                other: optional_text(&clean_amount_text(&other)),
            },
            additional_info: AdditionalInfo {
                fee_website_link: page.section_link("attr-additional", col),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn reads_rate_minimum_and_condition() {
        let fee = FeeItem::from_text("1.75% ต่อปี ขั้นต่ำ 500 บาท เงื่อนไข: ตามวงเงิน");
        assert_eq!(fee.max_percentage, Some(1.75));
        assert_eq!(fee.min_fee, Some(500.0));
        assert_eq!(fee.conditions.as_deref(), Some("ตามวงเงิน"));

        let json = serde_json::to_value(FeeItem::from_text("ไม่มีบริการ")).unwrap();
        assert_eq!(json, serde_json::json!({ "original_text": "ไม่มีบริการ" }));
    }

    #[test]
    fn other_fees_come_from_their_section_only() {
        let html = compare_table(
            &[("ธนาคารกรุงเทพ", "หนังสือค้ำประกัน")],
            &[
                ("attr-Bid", vec!["<span>2% ต่อปี ขั้นต่ำ 1,000 บาท</span>"]),
                ("attr-header attr-other", vec![""]),
                ("attr-OtherFee", vec!["<span>อากรแสตมป์ตามจริง</span>"]),
                ("attr-header attr-additional", vec![""]),
                (
                    "attr-Feeurl",
                    vec![r#"<a class="prod-url" href="https://bbl.example/lg">x</a>"#],
                ),
            ],
            1,
        );
        let records: Vec<GuaranteeFee> = records_from_page(&ComparePage::parse(&html), 3);
        let bbl = &records[0];

        assert_eq!(bbl.fees.bid.min_fee, Some(1000.0));
        assert_eq!(bbl.fees.tax.original_text, "");
        assert_eq!(bbl.other_fees.other.as_deref(), Some("อากรแสตมป์ตามจริง"));
        assert_eq!(
            bbl.additional_info.fee_website_link.as_deref(),
            Some("https://bbl.example/lg")
        );
    }
}
