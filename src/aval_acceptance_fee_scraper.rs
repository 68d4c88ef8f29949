use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{minimum_fee, optional_text, percentage, split_numbered_list, static_regex},
};

static_regex!(PER_COPY_FEE, r"ค่าธรรมเนียมฉบับละ\s*(\d[\d,]*)\s*บาท");

/// Fees for guaranteeing (aval) and accepting bills of exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvalAcceptanceFee {
    pub provider: String,
    pub acceptance_fee: Vec<String>,
    pub aval_fee: Vec<String>,
    pub extracted_info: ExtractedInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_fees: Option<String>,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_acceptance_fee_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_acceptance_fee_baht: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_fee_baht: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_aval_fee_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_aval_fee_baht: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub fee_links: Vec<String>,
}

fn per_copy_fee(text: &str) -> Option<i64> {
    PER_COPY_FEE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

/// The last line naming a value wins, as the table lists tiers in order.
fn last_found<T>(lines: &[String], read: impl Fn(&str) -> Option<T>) -> Option<T> {
    lines.iter().filter_map(|line| read(line)).last()
}

impl ExtractedInfo {
    fn from_fees(acceptance_fee: &[String], aval_fee: &[String]) -> Self {
        ExtractedInfo {
            max_acceptance_fee_percentage: last_found(acceptance_fee, percentage),
            min_acceptance_fee_baht: last_found(acceptance_fee, minimum_fee),
            cancellation_fee_baht: last_found(acceptance_fee, per_copy_fee),
            max_aval_fee_percentage: last_found(aval_fee, percentage),
            min_aval_fee_baht: last_found(aval_fee, minimum_fee),
        }
    }
}

impl CompareProduct for AvalAcceptanceFee {
    const NAME: &'static str = "aval-acceptance-fees";
    const CATEGORY: &'static str = "FeeApp/AvalAndAcceptanceServiceFee";
    const OUTPUT_FILE: &'static str = "aval_acceptance_fees.json";
    const PRODUCT_IDS: &'static str = "60,46,58,52,53,33,48,7,30,61,16,5,41,11,27,21,56,34,57,\
        39,20";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let acceptance_fee = split_numbered_list(&page.cell_text("attr-Acceptance", col));
        let aval_fee = split_numbered_list(&page.cell_text("attr-Aval", col));

        AvalAcceptanceFee {
            provider: page.provider(col),
            extracted_info: ExtractedInfo::from_fees(&acceptance_fee, &aval_fee),
            acceptance_fee,
            aval_fee,
            other_fees: optional_text(&page.cell_text("attr-other", col)),
            additional_info: AdditionalInfo {
                fee_links: page.cell_links("attr-Feeurl", col),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn reads_rates_minimums_and_every_link() {
        let html = compare_table(
            &[("ธนาคารกรุงไทย", "อาวัลและรับรองตั๋วเงิน")],
            &[
                (
                    "attr-Acceptance",
                    vec![
                        "<span>1. 1.5% ต่อปี ขั้นต่ำ 500 บาท 2. ค่าธรรมเนียมฉบับละ 200 บาท</span>",
                    ],
                ),
                ("attr-Aval", vec!["<span>2% ต่อปี ขั้นต่ำ 1,000 บาท</span>"]),
                (
                    "attr-Feeurl",
                    vec![
                        r#"<a class="prod-url" href="https://ktb.example/aval">1</a>
                           <a class="prod-url" href="https://ktb.example/acceptance">2</a>"#,
                    ],
                ),
            ],
            1,
        );
        let records: Vec<AvalAcceptanceFee> = records_from_page(&ComparePage::parse(&html), 3);
        let ktb = &records[0];

        assert_eq!(
            ktb.acceptance_fee,
            vec!["1.5% ต่อปี ขั้นต่ำ 500 บาท", "ค่าธรรมเนียมฉบับละ 200 บาท"]
        );
        assert_eq!(
            ktb.extracted_info,
            ExtractedInfo {
                max_acceptance_fee_percentage: Some(1.5),
                min_acceptance_fee_baht: Some(500.0),
                cancellation_fee_baht: Some(200),
                max_aval_fee_percentage: Some(2.0),
                min_aval_fee_baht: Some(1000.0),
            }
        );
        assert!(ktb.other_fees.is_none());
        assert_eq!(
            ktb.additional_info.fee_links,
            vec!["https://ktb.example/aval", "https://ktb.example/acceptance"]
        );
    }
}
