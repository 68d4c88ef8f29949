use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    fee::FeeAmount,
    text_manipulators::{
        all_integers, first_integer, first_number, split_clean, split_numbered_list,
    },
};

const CONDITION_LABEL: &str = "เงื่อนไข:";

/// A debit or ATM card product with its features, fees and bundled insurance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebitCard {
    pub provider: String,
    pub product: String,
    pub features_and_conditions: FeaturesAndConditions,
    pub general_fees: GeneralFees,
    pub transaction_fees_domestic: DomesticFees,
    pub transaction_fees_international: InternationalFees,
    pub insurance: Insurance,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesAndConditions {
    pub product_type: String,
    pub network: String,
    pub highlights: Vec<String>,
    pub age_requirement: Option<i64>,
    pub applicant_qualifications: Vec<String>,
    pub usage_conditions: Vec<String>,
    pub card_expiry: String,
    pub payment_options: Vec<String>,
    pub supplementary_card: SupplementaryCard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplementaryCard {
    pub available: Vec<String>,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralFees {
    pub entrance_fee: FeeAmount,
    pub annual_fee: FeeAmount,
    pub card_replacement_fee: FeeAmount,
    pub pin_replacement_fee: FeeAmount,
    pub statement_copy_fee: FeeAmount,
    pub slip_copy_fee: FeeLines,
    pub transaction_investigation_fee: FeeAmount,
    pub other_fees: Vec<String>,
}

/// A fee cell of several `-` bullets and every whole number they name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeLines {
    pub original_text: Vec<String>,
    pub amounts: Vec<i64>,
}

impl FeeLines {
    fn from_text(text: &str) -> Self {
        let original_text = split_clean(text, "-");
        FeeLines {
            amounts: original_text.iter().flat_map(|line| all_integers(line)).collect(),
            original_text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomesticFees {
    pub free_transactions_per_month: Option<i64>,
    pub cash_withdrawal: Vec<String>,
    pub in_service_area_balance_inquiry_fee: FeeAmount,
    pub out_service_area_balance_inquiry_fee: FeeAmount,
    pub in_service_area_cash_withdrawal_fee: FeeAmount,
    pub out_service_area_cash_withdrawal_fee: FeeAmount,
    pub in_service_area_transfer_fee: FeeAmount,
    pub out_service_area_transfer_fee: FeeAmount,
    pub transfer_between_providers_fee: FeeAmount,
    pub under_10000_fee: FeeAmount,
    pub between_10001_and_50000_fee: FeeAmount,
    pub additional_fee: FeeAmount,
    pub other_conditions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternationalFees {
    pub withdrawal_fee: FeeAmount,
    pub balance_inquiry_fee: FeeAmount,
    pub currency_conversion_fee: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insurance {
    pub insurance_type: String,
    pub insurance_company: String,
    pub max_coverage_amount: Option<i64>,
    pub other_benefits: String,
    pub coverage_period: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub product_website: Option<String>,
    pub fee_website: Option<String>,
}

/// Bullets of a condition cell with the `เงื่อนไข:` labels dropped.
fn conditions(text: &str) -> Vec<String> {
    split_clean(&text.replace(CONDITION_LABEL, ""), "-")
}

/// Splits on `-` bullets and `N.` markers alike.
fn bullets(text: &str) -> Vec<String> {
    split_numbered_list(text)
        .iter()
        .flat_map(|item| split_clean(item, "-"))
        .collect()
}

fn amount(page: &ComparePage, attr: &str, col: Column) -> FeeAmount {
    FeeAmount::amount(&page.cell_text(attr, col))
}

fn features_and_conditions(page: &ComparePage, col: Column) -> FeaturesAndConditions {
    FeaturesAndConditions {
        product_type: page.cell_text("attr-productTypeName", col),
        network: page.cell_text("attr-networkTypeName", col),
        highlights: page.cell_texts("attr-productBenefitMain", col),
        age_requirement: first_integer(&page.cell_text("attr-cardholderAge", col)),
        applicant_qualifications: conditions(&page.cell_text("attr-conditionToApply", col)),
        usage_conditions: conditions(&page.cell_text("attr-conditionToUse", col)),
        card_expiry: page.cell_text("attr-usagePeriod", col),
        payment_options: page
            .cell_texts("attr-payment", col)
            .iter()
            .flat_map(|option| conditions(option))
            .collect(),
        supplementary_card: SupplementaryCard {
            available: conditions(&page.cell_text("attr-supplementaryCard", col)),
            conditions: conditions(&page.cell_text("attr-otherCondition", col)),
        },
    }
}

fn general_fees(page: &ComparePage, col: Column) -> GeneralFees {
    GeneralFees {
        entrance_fee: amount(page, "attr-cardHolderEntranceFeeDisplay", col),
        annual_fee: amount(page, "attr-annualFeeDisplay", col),
        card_replacement_fee: amount(page, "attr-replacementCardFee", col),
        pin_replacement_fee: amount(page, "attr-replacementOfCardPINFee", col),
        statement_copy_fee: amount(page, "attr-copyofStatementFee", col),
        slip_copy_fee: FeeLines::from_text(&page.cell_text("attr-copyOfSalesSlipFee", col)),
        transaction_investigation_fee: amount(page, "attr-transactionverificationFee", col),
        other_fees: conditions(&page.cell_text("attr-otherFee", col)),
    }
}

fn domestic_fees(page: &ComparePage, col: Column) -> DomesticFees {
    let free_transactions = page.cell_text("attr-11", col);
    DomesticFees {
        free_transactions_per_month: first_integer(&free_transactions),
        cash_withdrawal: bullets(&free_transactions),
        in_service_area_balance_inquiry_fee: amount(page, "attr-31", col),
        out_service_area_balance_inquiry_fee: amount(page, "attr-32", col),
        in_service_area_cash_withdrawal_fee: amount(page, "attr-33", col),
        out_service_area_cash_withdrawal_fee: amount(page, "attr-34", col),
        in_service_area_transfer_fee: amount(page, "attr-35", col),
        out_service_area_transfer_fee: amount(page, "attr-36", col),
        transfer_between_providers_fee: amount(page, "attr-FeeTranferDiffProvider", col),
        under_10000_fee: amount(page, "attr-41", col),
        between_10001_and_50000_fee: amount(page, "attr-42", col),
        additional_fee: amount(page, "attr-FeeAdditional", col),
        other_conditions: page.cell_text("attr-FeeOtherCondition", col),
    }
}

impl CompareProduct for DebitCard {
    const NAME: &'static str = "debit-cards";
    const CATEGORY: &'static str = "ProductApp/Debit";
    const OUTPUT_FILE: &'static str = "debit_cards.json";
    const PRODUCT_IDS: &'static str = "1234,1459,1466,1606,1460,1468,1463,976,13,14,1378,1379,\
        1380,1381,1365,1366,733,731,1492,721,722,723,1502,720,67,1377,719,718,726,727,725,724,\
        1256,1382,1474,954,950,961,1467,1237,1634,1490,246,1642,1618,16,1499,138,11,1587,682,\
        472,1585,1239,1236,1593,1504,1,946,958,730,732,960,1473,1476,1475,12,15,1457,1462,1469,\
        1456,474,744,1627,1461,1458,17,1503,1478,1477,1482,1481,1484,1480,1483,473,1235,1491,\
        1496,1240,1494,752,749,1641,1488,1485,1487,477,972,750,746,1592,2,1501,1472,1464,748,\
        751,1594,475,964,1465,1612,962,1471,1470,1649,139,1500,1497,1493,1498,1601,1489,1369,\
        1367,1238,1479,1486,728,729,1495";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let fee_website = page
            .cell_link("attr-uRLFee", col)
            .or_else(|| Some(page.cell_text("attr-uRLFee", col)).filter(|url| !url.is_empty()));

        DebitCard {
            provider: page.provider(col),
            product: page.product(col),
            features_and_conditions: features_and_conditions(page, col),
            general_fees: general_fees(page, col),
            transaction_fees_domestic: domestic_fees(page, col),
            transaction_fees_international: InternationalFees {
                withdrawal_fee: amount(page, "attr-51", col),
                balance_inquiry_fee: amount(page, "attr-52", col),
                currency_conversion_fee: first_number(&page.cell_text("attr-53", col)),
            },
            insurance: Insurance {
                insurance_type: page.cell_text("attr-insuranceTypeName", col),
                insurance_company: page.cell_text("attr-insuranceCompanyName", col),
                max_coverage_amount: first_integer(&page.cell_text("attr-maxCoverageDisplay", col)),
                other_benefits: page.cell_text("attr-OtherBenefits", col),
                coverage_period: page.cell_text("attr-CoveragePeriod", col),
            },
            additional_info: AdditionalInfo {
                product_website: page.cell_link("attr-uRL", col),
                fee_website,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn slip_copy_lines_keep_every_amount() {
        let fee = FeeLines::from_text("- ภายใน 1 ปี 100 บาท - เกิน 1 ปี 200 บาท");
        assert_eq!(fee.original_text, vec!["ภายใน 1 ปี 100 บาท", "เกิน 1 ปี 200 บาท"]);
        assert_eq!(fee.amounts, vec![1, 100, 1, 200]);
        assert_eq!(
            bullets("1. ถอนฟรี 4 ครั้ง - ครั้งที่ 5 ขึ้นไป 10 บาท 2. ต่างธนาคาร"),
            vec!["ถอนฟรี 4 ครั้ง", "ครั้งที่ 5 ขึ้นไป 10 บาท", "ต่างธนาคาร"]
        );
    }

    #[test]
    fn reads_card_features_and_fees() {
        let html = compare_table(
            &[("ธนาคารกรุงเทพ", "บัตรเดบิตบีฟิท")],
            &[
                ("attr-networkTypeName", vec!["<span>VISA</span>"]),
                (
                    "attr-productBenefitMain",
                    vec!["<span>ช้อปออนไลน์</span><span>ประกันอุบัติเหตุ</span>"],
                ),
                ("attr-cardholderAge", vec!["<span>15 ปีขึ้นไป</span>"]),
                (
                    "attr-conditionToApply",
                    vec!["<span>เงื่อนไข: - มีบัญชีออมทรัพย์ - สัญชาติไทย</span>"],
                ),
                ("attr-annualFeeDisplay", vec!["<span>300 บาท</span>"]),
                ("attr-11", vec!["<span>ถอนฟรี 4 ครั้ง/เดือน</span>"]),
                ("attr-53", vec!["<span>2.5% ของยอด</span>"]),
                ("attr-uRLFee", vec!["<span>https://bbl.example/fee</span>"]),
            ],
            1,
        );
        let records: Vec<DebitCard> = records_from_page(&ComparePage::parse(&html), 3);
        let card = &records[0];

        let features = &card.features_and_conditions;
        assert_eq!(features.network, "VISA");
        assert_eq!(features.highlights, vec!["ช้อปออนไลน์", "ประกันอุบัติเหตุ"]);
        assert_eq!(features.age_requirement, Some(15));
        assert_eq!(features.applicant_qualifications, vec!["มีบัญชีออมทรัพย์", "สัญชาติไทย"]);
        assert_eq!(card.general_fees.annual_fee.amount, Some(300));
        assert_eq!(card.transaction_fees_domestic.free_transactions_per_month, Some(4));
        assert_eq!(card.transaction_fees_international.currency_conversion_fee, Some(2.5));
        assert_eq!(
            card.additional_info.fee_website.as_deref(),
            Some("https://bbl.example/fee")
        );
        assert!(card.additional_info.product_website.is_none());
    }
}
