use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{
        clean_amount_text, first_integer, split_clean, split_numbered_list, static_regex,
    },
};

static_regex!(TRANSFER_LIMIT, r"(ไม่เกิน|เกิน)\s?(\d+)");

const NO_CHARGE: [&str; 2] = ["ไม่มีค่าธรรมเนียม", "ไม่มีค่าบริการ"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitalBankingFee {
    pub provider: String,
    pub product: String,
    pub service: Service,
    pub fees: Fees,
    pub additional_information: AdditionalInformation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub service_type: String,
    pub main_feature: String,
    pub customer_groups: Vec<CustomerGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerGroup {
    pub description: Option<String>,
    pub age_requirement: Option<String>,
    pub account_requirements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fees {
    pub promptpay_transfer_fee: Fee,
    pub interbank_transfer_fee: Vec<TransferFee>,
    pub intrabank_transfer_fee: Fee,
    pub cardless_withdrawal_fee: Fee,
    pub entrance_fee: Fee,
    pub annual_fee: Fee,
    pub other_fees: Vec<Fee>,
}

/// `amount` is zero for "no charge" wording, else the first integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    pub text: String,
    pub amount: Option<i64>,
}

impl Fee {
    fn from_text(text: &str) -> Self {
        Fee {
            text: text.to_string(),
            amount: fee_amount(text),
        }
    }
}

/// One interbank tier: a transfer amount bound and the fee charged within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferFee {
    pub condition: String,
    pub range: TransferRange,
    pub text: String,
    pub amount: Option<i64>,
}

/// `max` is open for "above N" tiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferRange {
    pub min: i64,
    pub max: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInformation {
    pub service_website: Option<String>,
    pub fee_website: Option<String>,
}

fn fee_amount(text: &str) -> Option<i64> {
    if NO_CHARGE.iter().any(|wording| text.contains(wording)) {
        return Some(0);
    }
    first_integer(text)
}

impl TransferFee {
    fn from_text(text: &str) -> Self {
        let limit = TRANSFER_LIMIT.captures(text).and_then(|caps| {
            let amount = caps.get(2)?.as_str().parse::<i64>().ok()?;
            Some((caps.get(1)?.as_str(), amount))
        });
        let (condition, range) = match limit {
            Some(("ไม่เกิน", amount)) => (
                format!("โอนเงินไม่เกิน {amount} บาท"),
                TransferRange {
                    min: 0,
                    max: Some(amount),
                },
            ),
            Some((kind, amount)) => (
                format!("โอนเงิน{kind} {amount} บาท"),
                TransferRange {
                    min: amount,
                    max: None,
                },
            ),
            None => (text.to_string(), TransferRange::default()),
        };
        // The tier bound comes first in the text, so the fee is the number after it.
        let fee_text = TRANSFER_LIMIT
            .find(text)
            .map_or(text, |bound| &text[bound.end()..]);
        TransferFee {
            condition,
            range,
            text: text.to_string(),
            amount: fee_amount(fee_text),
        }
    }
}

fn customer_groups(text: &str) -> Vec<CustomerGroup> {
    split_clean(text, "-")
        .into_iter()
        .map(|part| {
            let mut group = CustomerGroup::default();
            if part.contains("อายุตั้งแต่") {
                group.age_requirement = Some(part.clone());
            }
            if part.contains("บุคคลธรรมดา") || part.contains("นิติบุคคล") {
                group.description = Some(part.clone());
            }
            if part.contains("บัญชี") || part.contains("บัตร") {
                group.account_requirements.push(part);
            }
            group
        })
        .collect()
}

fn fee(page: &ComparePage, attr: &str, col: Column) -> Fee {
    Fee::from_text(&page.cell_text(attr, col))
}

fn fees(page: &ComparePage, col: Column) -> Fees {
    let interbank = clean_amount_text(&page.cell_text("attr-InterbankTransferFee", col));
    Fees {
        promptpay_transfer_fee: fee(page, "attr-PromptPayTransferFee", col),
        interbank_transfer_fee: split_clean(&interbank, "-")
            .iter()
            .map(|part| TransferFee::from_text(part))
            .collect(),
        intrabank_transfer_fee: fee(page, "attr-IntrabankTransferFee", col),
        cardless_withdrawal_fee: fee(page, "attr-CardlessCashWithdrawalFee", col),
        entrance_fee: fee(page, "attr-EntranceFee", col),
        annual_fee: fee(page, "attr-AnnualFee", col),
        other_fees: split_numbered_list(&page.cell_text("attr-OtherFee", col))
            .iter()
            .map(|part| Fee::from_text(part))
            .collect(),
    }
}

impl CompareProduct for DigitalBankingFee {
    const NAME: &'static str = "digital-banking-fees";
    const CATEGORY: &'static str = "FeeApp/DigitalBankingServiceFee";
    const OUTPUT_FILE: &'static str = "digital_banking_fees.json";
    const PRODUCT_IDS: &'static str = "361,364,332,328,321,70,67,69,63,66,68,64,65,397,400,402,\
        396,424,414,119,317,169,382,432,434,435,431,59,42,219,220,216,217,152,158,150,156,155,\
        157,153,154,392,385,234,204,368,372,367,370,366,374,375,365,369,401,12,362,395,100,151,\
        388,373,236,297,2,333,334,329,427,36,37,159,211,212,213,31,203";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        DigitalBankingFee {
            provider: page.provider(col),
            product: page.product(col),
            service: Service {
                service_type: page.cell_text("attr-ServiceTypeId", col),
                main_feature: page.cell_text("attr-ServiceMainCharacteristic", col),
                customer_groups: customer_groups(
                    &page.cell_text("attr-CustomerCharacterApplyCondition", col),
                ),
            },
            fees: fees(page, col),
            additional_information: AdditionalInformation {
                service_website: page.cell_link("attr-Url", col),
                fee_website: page.cell_link("attr-Feeurl", col),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn interbank_tiers() {
        let capped = TransferFee::from_text("ไม่เกิน 50000 บาท ไม่มีค่าธรรมเนียม");
        assert_eq!(capped.condition, "โอนเงินไม่เกิน 50000 บาท");
        assert_eq!(capped.range, TransferRange { min: 0, max: Some(50000) });
        assert_eq!(capped.amount, Some(0));

        let above = TransferFee::from_text("เกิน 50000 บาท ครั้งละ 10 บาท");
        assert_eq!(above.range, TransferRange { min: 50000, max: None });
        assert_eq!(above.amount, Some(10));

        let flat = TransferFee::from_text("ครั้งละ 25 บาท");
        assert_eq!(flat.condition, "ครั้งละ 25 บาท");
        assert_eq!(flat.range, TransferRange::default());
        assert_eq!(flat.amount, Some(25));
    }

    #[test]
    fn customer_groups_by_keyword() {
        let groups = customer_groups("บุคคลธรรมดา - อายุตั้งแต่ 15 ปี - มีบัญชีเงินฝาก");
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].description.as_deref(), Some("บุคคลธรรมดา"));
        assert_eq!(groups[1].age_requirement.as_deref(), Some("อายุตั้งแต่ 15 ปี"));
        assert_eq!(groups[2].account_requirements, vec!["มีบัญชีเงินฝาก"]);
    }

    #[test]
    fn reads_digital_banking_fees() {
        let html = compare_table(
            &[("ธนาคารไทยพาณิชย์", "SCB EASY")],
            &[
                ("attr-ServiceTypeId", vec!["<span>Mobile Banking</span>"]),
                ("attr-PromptPayTransferFee", vec!["<span>ไม่มีค่าธรรมเนียม</span>"]),
                (
                    "attr-InterbankTransferFee",
                    vec!["<span>- ไม่เกิน 10,000 บาท ฟรี - เกิน 10,000 บาท 15 บาท</span>"],
                ),
                ("attr-OtherFee", vec!["<span>1. ขอ statement 50 บาท 2. อายัดบัตร 100 บาท</span>"]),
                ("attr-Url", vec![r#"<a href="https://scb.example/easy">x</a>"#]),
            ],
            1,
        );
        let records: Vec<DigitalBankingFee> = records_from_page(&ComparePage::parse(&html), 3);
        let scb = &records[0];

        assert_eq!(scb.product, "SCB EASY");
        assert_eq!(scb.service.service_type, "Mobile Banking");
        assert_eq!(scb.fees.promptpay_transfer_fee.amount, Some(0));
        assert_eq!(scb.fees.interbank_transfer_fee.len(), 2);
        assert_eq!(scb.fees.interbank_transfer_fee[0].range.max, Some(10000));
        assert_eq!(scb.fees.interbank_transfer_fee[0].amount, None);
        assert_eq!(scb.fees.interbank_transfer_fee[1].amount, Some(15));
        assert_eq!(scb.fees.other_fees.len(), 2);
        assert_eq!(scb.fees.other_fees[1].amount, Some(100));
        assert_eq!(
            scb.additional_information.service_website.as_deref(),
            Some("https://scb.example/easy")
        );
        assert_eq!(scb.additional_information.fee_website, None);
    }
}
