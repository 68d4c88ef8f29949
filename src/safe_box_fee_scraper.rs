use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    fee::FeeItem,
    text_manipulators::{optional_text, split_clean},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeBoxFee {
    pub provider: String,
    pub fees: SafeBoxFees,
    pub other_fees: OtherFees,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeBoxFees {
    pub entrance_fee: Vec<FeeItem>,
    pub safe_box_size_less_than_1000: Vec<FeeItem>,
    pub safe_box_size_1000_to_2000: Vec<FeeItem>,
    pub safe_box_size_2000_to_3000: Vec<FeeItem>,
    pub safe_box_size_more_than_3000: Vec<FeeItem>,
    pub key_deposit: FeeItem,
    pub key_replacement_fee: FeeItem,
    pub safe_deposit_box_drilling_fee: FeeItem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFees {
    pub other_fees: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub fee_website_links: String,
}

/// Every `-` separated fragment of every span becomes its own item.
fn fee_items(page: &ComparePage, attr: &str, col: Column) -> Vec<FeeItem> {
    page.cell_texts(attr, col)
        .iter()
        .flat_map(|text| split_clean(text, "-"))
        .map(|part| FeeItem::from_text(&part))
        .collect()
}

fn fee_item(page: &ComparePage, attr: &str, col: Column) -> FeeItem {
    FeeItem::from_text(&page.cell_text(attr, col))
}

impl CompareProduct for SafeBoxFee {
    const NAME: &'static str = "safe-box-fees";
    const CATEGORY: &'static str = "FeeApp/OtherFee/SafeDepositBoxServiceFee";
    const OUTPUT_FILE: &'static str = "safe_fees.json";
    const PRODUCT_IDS: &'static str = "22,50,59,55,44,67,43,21,35,57,28,56,7,61,34";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let fees = SafeBoxFees {
            entrance_fee: fee_items(page, "attr-EntranceFee", col),
            safe_box_size_less_than_1000: fee_items(
                page,
                "attr-SafeDepositBoxSizeLessThan1000",
                col,
            ),
            safe_box_size_1000_to_2000: fee_items(page, "attr-SafeDepositBoxSize1000To2000", col),
            safe_box_size_2000_to_3000: fee_items(page, "attr-SafeDepositBoxSize2000To3000", col),
            safe_box_size_more_than_3000: fee_items(
                page,
                "attr-SafeDepositBoxSizeMoreThan3000",
                col,
            ),
            key_deposit: fee_item(page, "attr-DepositFeeForSafeBoxKey", col),
            key_replacement_fee: fee_item(page, "attr-SafeBoxKeyReplacementFee", col),
            safe_deposit_box_drilling_fee: fee_item(page, "attr-SafeDepositBoxDrillingFee", col),
        };

        SafeBoxFee {
            provider: page.provider(col),
            fees,
            other_fees: OtherFees {
                other_fees: optional_text(&page.cell_text("attr-other", col)),
            },
            additional_info: AdditionalInfo {
                fee_website_links: page.cell_link("attr-Feeurl", col).unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn splits_box_sizes_into_items() {
        let html = compare_table(
            &[("ธนาคารกรุงเทพ", "ตู้นิรภัย")],
            &[
                (
                    "attr-SafeDepositBoxSizeLessThan1000",
                    vec![concat!(
                        "<span>- ขนาด 5x10 นิ้ว 1,500 บาท/ปี",
                        " - ขนาด 5x22 นิ้ว 2,000 บาท/ปี เงื่อนไข: รายปี</span>"
                    )],
                ),
                ("attr-DepositFeeForSafeBoxKey", vec!["<span>ค่าประกันกุญแจ 1,000 บาท</span>"]),
                ("attr-Feeurl", vec![r#"<a href="https://bbl.example/safe">fee</a>"#]),
            ],
            1,
        );
        let records: Vec<SafeBoxFee> = records_from_page(&ComparePage::parse(&html), 3);
        assert_eq!(records.len(), 1);
        let safe = &records[0];

        let small = &safe.fees.safe_box_size_less_than_1000;
        assert_eq!(small.len(), 2);
        assert_eq!(small[0].text, "ขนาด 5x10 นิ้ว 1,500 บาท/ปี");
        assert_eq!(small[0].amounts, vec![5.0, 10.0, 1500.0]);
        assert!(small[0].condition.is_none());
        assert!(small[1].condition.is_some());

        assert_eq!(safe.fees.key_deposit.numeric_value, Some(1000.0));
        assert!(safe.fees.entrance_fee.is_empty());
        assert!(safe.other_fees.other_fees.is_none());
        assert_eq!(safe.additional_info.fee_website_links, "https://bbl.example/safe");
    }
}
