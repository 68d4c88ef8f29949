use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{all_numbers, clean_amount_text, optional_text},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustodianFee {
    pub provider: String,
    pub fees: Vec<Fee>,
    pub other_fees: OtherFees,
    pub additional_info: AdditionalInfo,
}

/// A fee line with its first two numbers as a range, or the whole line as a
/// condition when it holds no number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl Fee {
    fn from_text(text: &str) -> Self {
        let (min, max) = match all_numbers(text).as_slice() {
            [] => (None, None),
            [only] => (Some(*only), Some(*only)),
            [min, max, ..] => (Some(*min), Some(*max)),
        };
        Fee {
            min,
            max,
            original_text: text.to_string(),
            condition: min.is_none().then(|| text.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFees {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub website: Option<String>,
}

impl CompareProduct for CustodianFee {
    const NAME: &'static str = "custodian-fees";
    const CATEGORY: &'static str = "FeeApp/CustodianServiceFee";
    const OUTPUT_FILE: &'static str = "custodian_fees.json";
    const PRODUCT_IDS: &'static str = "4,41,30,59,20,27,21,48,57,53,39,54";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let fees = page
            .section_texts("attr-fee", col)
            .iter()
            .map(|text| Fee::from_text(&clean_amount_text(text)))
            .collect();
        let other = page.section_texts("attr-other", col).join(" ");

        CustodianFee {
            provider: page.provider(col),
            fees,
            other_fees: OtherFees {
                description: optional_text(&clean_amount_text(&other)),
            },
            additional_info: AdditionalInfo {
                website: page.section_link("attr-additional", col),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn reads_ranges_and_conditions() {
        assert_eq!(
            Fee::from_text("0.01 - 0.05% ต่อปี"),
            Fee {
                min: Some(0.01),
                max: Some(0.05),
                original_text: "0.01 - 0.05% ต่อปี".to_string(),
                condition: None,
            }
        );
        assert_eq!(Fee::from_text("500 บาท").max, Some(500.0));
        assert_eq!(
            Fee::from_text("ตามตกลง").condition.as_deref(),
            Some("ตามตกลง")
        );
    }

    #[test]
    fn keeps_sections_apart() {
        let html = compare_table(
            &[("ธนาคารกสิกรไทย", "บริการรับฝากทรัพย์สิน")],
            &[
                ("attr-header attr-fee", vec![""]),
                ("attr-SafeKeeping", vec!["<span>ค่ารักษา 1,000 - 5,000 บาท</span>"]),
                ("attr-Settlement", vec!["<span>ตามตกลง</span>"]),
                ("attr-header attr-other", vec![""]),
                ("attr-other", vec!["<span>ค่าไปรษณีย์ตามจริง</span>"]),
                ("attr-header attr-additional", vec![""]),
                (
                    "attr-Feeurl",
                    vec![r#"<a class="prod-url" href="https://kbank.example/custodian">x</a>"#],
                ),
            ],
            1,
        );
        let records: Vec<CustodianFee> = records_from_page(&ComparePage::parse(&html), 3);
        let kbank = &records[0];

        assert_eq!(kbank.fees.len(), 2);
        assert_eq!(kbank.fees[0].min, Some(1000.0));
        assert_eq!(kbank.fees[0].max, Some(5000.0));
        assert_eq!(kbank.fees[1].condition.as_deref(), Some("ตามตกลง"));
        assert_eq!(kbank.other_fees.description.as_deref(), Some("ค่าไปรษณีย์ตามจริง"));
        assert_eq!(
            kbank.additional_info.website.as_deref(),
            Some("https://kbank.example/custodian")
        );
    }
}
