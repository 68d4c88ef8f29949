use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{condition_after_marker, first_integer, split_clean},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BahtnetFee {
    pub provider: String,
    pub fees_details: FeeDetails,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeDetails {
    pub transfer_within_bangkok_and_vicinity: Vec<FeeEntry>,
    pub transfer_from_bangkok_to_region: Vec<FeeEntry>,
    pub transfer_from_region_to_bangkok: Vec<FeeEntry>,
    pub transfer_within_region: Vec<FeeEntry>,
    pub transfer_from_bangkok_to_other_bank_account: Vec<FeeEntry>,
    pub transfer_from_region_to_other_bank_account: Vec<FeeEntry>,
    pub receive_transfer_in_bangkok_from_other_bank_account: Vec<FeeEntry>,
    pub receive_transfer_in_region_from_other_bank_account: Vec<FeeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeEntry {
    pub description: String,
    pub extracted: Extracted,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extracted {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub fee_website_link: String,
}

const PAYERS: [&str; 2] = ["ผู้รับโอน", "ผู้โอน"];

impl FeeEntry {
    fn from_text(text: &str) -> Self {
        FeeEntry {
            description: text.to_string(),
            extracted: Extracted {
                payer: PAYERS
                    .iter()
                    .find(|payer| text.contains(*payer))
                    .map(|payer| payer.to_string()),
                fee: first_integer(text),
                currency: text.contains("บาท").then(|| "THB".to_string()),
                condition: condition_after_marker(text),
            },
        }
    }
}

/// All spans of the cell joined, then one entry per `/` separated part.
fn fee_entries(page: &ComparePage, attr: &str, col: Column) -> Vec<FeeEntry> {
    split_clean(&page.cell_text(attr, col), "/")
        .iter()
        .map(|part| FeeEntry::from_text(part))
        .collect()
}

impl CompareProduct for BahtnetFee {
    const NAME: &'static str = "bahtnet-fees";
    const CATEGORY: &'static str = "FeeApp/BAHTNETFee";
    const OUTPUT_FILE: &'static str = "bahtnet_fees.json";
    const PRODUCT_IDS: &'static str = "162152,2,5,17,4,157479,23,26,15,449176,27,6,150920,194031,\
        9,162151,240,35,16,162568,13,237,28,32,241,163222,33,34,37,155024,30,24";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let fees_details = FeeDetails {
            transfer_within_bangkok_and_vicinity: fee_entries(
                page,
                "attr-SenderRecipientInBkk",
                col,
            ),
            transfer_from_bangkok_to_region: fee_entries(page, "attr-SenderInBkk", col),
            transfer_from_region_to_bangkok: fee_entries(page, "attr-SenderInRegion", col),
            transfer_within_region: fee_entries(page, "attr-SenderReceiverInRegion", col),
            transfer_from_bangkok_to_other_bank_account: fee_entries(
                page,
                "attr-SenderInBkkToOtherAcc",
                col,
            ),
            transfer_from_region_to_other_bank_account: fee_entries(
                page,
                "attr-SenderInRegionToOtherAcc",
                col,
            ),
            receive_transfer_in_bangkok_from_other_bank_account: fee_entries(
                page,
                "attr-SenderInBkkFromOtherAcc",
                col,
            ),
            receive_transfer_in_region_from_other_bank_account: fee_entries(
                page,
                "attr-SenderInRegionFromOtherAcc",
                col,
            ),
        };

        BahtnetFee {
            provider: page.provider(col),
            fees_details,
            additional_info: AdditionalInfo {
                fee_website_link: page.cell_link("attr-Feeurl", col).unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn splits_slash_separated_fees() {
        let html = compare_table(
            &[("ธนาคารกรุงเทพ", "BAHTNET"), ("ธนาคารกสิกรไทย", "BAHTNET")],
            &[
                (
                    "attr-SenderRecipientInBkk",
                    vec![
                        "<span>ผู้โอนจ่าย 10 บาท</span><span>/ ผู้รับโอนจ่าย 20 บาท</span>",
                        "<span>ไม่มีบริการ</span>",
                    ],
                ),
                (
                    "attr-SenderInRegionToOtherAcc",
                    vec!["<span>150 บาท เงื่อนไข: ต่อรายการ</span>", ""],
                ),
                (
                    "attr-Feeurl",
                    vec![r#"<a class="prod-url" href="https://bbl.example/bahtnet">x</a>"#, ""],
                ),
            ],
            1,
        );
        let records: Vec<BahtnetFee> = records_from_page(&ComparePage::parse(&html), 3);
        assert_eq!(records.len(), 2);

        let bbl = &records[0].fees_details;
        assert_eq!(bbl.transfer_within_bangkok_and_vicinity.len(), 2);
        let sender = &bbl.transfer_within_bangkok_and_vicinity[0];
        assert_eq!(sender.description, "ผู้โอนจ่าย 10 บาท");
        assert_eq!(sender.extracted.payer.as_deref(), Some("ผู้โอน"));
        assert_eq!(sender.extracted.fee, Some(10));
        assert_eq!(sender.extracted.currency.as_deref(), Some("THB"));
        assert_eq!(
            bbl.transfer_within_bangkok_and_vicinity[1].extracted.payer.as_deref(),
            Some("ผู้รับโอน")
        );
        assert_eq!(
            bbl.transfer_from_region_to_other_bank_account[0].extracted.condition.as_deref(),
            Some("ต่อรายการ")
        );
        assert!(bbl.transfer_within_region.is_empty());
        assert_eq!(
            records[0].additional_info.fee_website_link,
            "https://bbl.example/bahtnet"
        );

        let kbank = &records[1].fees_details.transfer_within_bangkok_and_vicinity[0];
        assert_eq!(kbank.extracted, Extracted::default());
    }
}
