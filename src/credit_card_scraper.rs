use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{clean_text, condition_after_marker, first_integer, optional_text},
};

/// A credit card product. Its rows are only told apart by their Thai labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCard {
    pub provider: String,
    pub product_name: String,
    pub card_type: String,
    pub main_benefit: String,
    pub product_features: Vec<String>,
    pub maximum_credit_line: String,
    pub minimum_age: String,
    pub income_condition: IncomeCondition,
    pub interest_free_period: String,
    pub fees: Fees,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeCondition {
    pub income: Option<i64>,
    pub condition: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fees {
    pub entrance_fee: String,
    pub annual_fee: AnnualFee,
    pub fx_risk_fee: String,
    pub cash_advance_fee: CashAdvanceFee,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualFee {
    pub first_year: String,
    pub subsequent_years: String,
    pub conditions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashAdvanceFee {
    pub amount: String,
    pub conditions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub product_website: Option<String>,
    pub fee_website: Option<String>,
}

const FIRST_YEAR: &str = "ปีแรก:";
const SUBSEQUENT_YEARS: &str = "ปีถัดไป:";

impl AnnualFee {
    /// Splits `ปีแรก: X ปีถัดไป: Y`. Text without both labels is kept whole as
    /// the first year's fee.
    fn from_text(text: &str) -> Self {
        let conditions = condition_after_marker(text);
        let fee_text = text.split("เงื่อนไข:").next().unwrap_or_default();
        match fee_text.split_once(SUBSEQUENT_YEARS) {
            Some((first, rest)) => AnnualFee {
                first_year: clean_text(&first.replace(FIRST_YEAR, "")),
                subsequent_years: clean_text(rest),
                conditions,
            },
            None => AnnualFee {
                first_year: clean_text(fee_text),
                subsequent_years: String::new(),
                conditions,
            },
        }
    }
}

fn row(page: &ComparePage, label: &str, col: Column) -> String {
    page.labelled_cell_text(label, col, "span")
}

impl CompareProduct for CreditCard {
    const NAME: &'static str = "credit-cards";
    const CATEGORY: &'static str = "ProductApp/Credit";
    const OUTPUT_FILE: &'static str = "credit_cards.json";
    const PRODUCT_IDS: &'static str = "3629,3622,3630,4633,4632,4634,4655,4656,1604,1607,2259,\
        5573,5161,2251,5534,5537,5177,5491,5522,5523,3627,3631,3600,3664,3624,3601,3625,3603,\
        3633,3626,3604,3661,3620,3634,3636,3635,3606,3638,3637,3640,3639,3605,3672,3668,3628,\
        3662,3621,3648,3607,3642,3649,3643,3651,3613,3644,3652,3609,3645,3653,3646,3647,3615,\
        3656,3610,3650,3671,3658,3655,3616,3670,3612,4653,4657,4658,4659,4660,5568,5528,2256,\
        5570,2245,5531,4471,4472,4467,5479,5494,5484,5497,5483,5503,1603,4760,4765,5473,3804,\
        3800,4445,4482,4483,4479,4480,4452,4453,4476,4477,4454,4456,4457,4458,4460,4461,4462,\
        4463,4464,4465,4444,4446,4447,4449,4450,4473,4470,5486,5498,5501,5540,5555,2242,5560,\
        5496,1605,1600,1601,1602,4475,2246,5563,5565,5539,5567,5525,5556,2244,5562,2255,5536,\
        2260,5574,2252,5546,5548,5538,5577,5518,5514,5521,5517,5527,3802,5529,5542,2258,5572,\
        2249,5533,5516,4459,4474,4469,5499,5492,5481,5148,5435,3608,3641,3669,3611,3617,3660,\
        5114,5287,5282,5285,5193,5137,5211,5173,5162,5156,5222,5126,5202,5158,5147,5240,5294,\
        5296,5323,5306,5300,5329,749,753,752,751,750,754,5489,5500,5480,5495,4484,4481,4478,\
        4455,4466,4451,3808,3797,3798,5502,5482,5566,2257,5571,2247,5532,5575,5576,5541,5554,\
        2248,5544,2240,5558,5429,3996,3993,5520,3994,3995,3602,3632,3654,3665,3663,3618,3657,\
        3623,1606,5526,5553,5552,3806,3799,3801,2253,5535,5564,3614,3666,3667,3619,3659,2250,\
        5545,2241,5559,5549,2254,5547,2243,5561,5550,4448,4468,5519,5493,5266,5305,5304,5246,\
        4654,5462,5213,5233,5478,5467,3997,5180,5557,5543,5551,5524,5335";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let income = page.labelled_cell_text(
            "รายได้ขั้นต่ำ และเงื่อนไขในการสมัคร",
            col,
            "span.text-primary",
        );
        let cash_advance = row(page, "ค่าธรรมเนียมเบิกถอนเงินสด", col);

        CreditCard {
            provider: page.provider(col),
            product_name: page.product(col),
            card_type: page.product_note(col),
            main_benefit: page.labelled_cell_text(
                "ประเภทสิทธิประโยชน์เด่น",
                col,
                "span.text-bold",
            ),
            product_features: optional_text(&row(page, "ลักษณะเด่น", col))
                .into_iter()
                .collect(),
            maximum_credit_line: row(page, "วงเงินสูงสุด", col),
            minimum_age: row(page, "อายุผู้สมัครบัตรหลัก", col),
            income_condition: IncomeCondition {
                income: first_integer(&income.replace(',', "")),
                condition: income,
            },
            interest_free_period: row(page, "ระยะเวลาสูงสุดที่ปลอดดอกเบี้ย", col),
            fees: Fees {
                entrance_fee: row(page, "ค่าธรรมเนียมแรกเข้าบัตรหลัก", col),
                annual_fee: AnnualFee::from_text(&row(page, "ค่าธรรมเนียมรายปีบัตรหลัก", col)),
                fx_risk_fee: row(page, "ค่าความเสี่ยงจากการแปลงสกุลเงิน", col),
                cash_advance_fee: CashAdvanceFee {
                    conditions: condition_after_marker(&cash_advance),
                    amount: cash_advance,
                },
                additional_info: AdditionalInfo {
                    product_website: page.cell_link("attr-url", col),
                    fee_website: page.cell_link("attr-feeurl", col),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare_scraper::records_from_page;

    #[test]
    fn annual_fee_splits_first_and_later_years() {
        assert_eq!(
            AnnualFee::from_text("ปีแรก: ฟรี ปีถัดไป: 1,000 บาท เงื่อนไข: ใช้จ่ายครบ 50,000 บาท"),
            AnnualFee {
                first_year: "ฟรี".to_string(),
                subsequent_years: "1,000 บาท".to_string(),
                conditions: Some("ใช้จ่ายครบ 50,000 บาท".to_string()),
            }
        );
        assert_eq!(AnnualFee::from_text("ไม่มี").first_year, "ไม่มี");
        assert_eq!(AnnualFee::from_text(""), AnnualFee::default());
    }

    #[test]
    fn reads_rows_by_label() {
        let html = r#"<html><body><table><thead><tr>
            <th class="col-s col-s-1"><span><img/></span><span>บัตรกรุงไทย</span></th>
            <th class="font-black text-center prod-col1"><span
                class="text-bold">KTC X</span> บัตรเครดิต</th>
            </tr></thead><tbody>
            <tr class="attr-header"><td class="text-center frst-col"><span>วงเงินสูงสุด</span></td>
            <td class="cmpr-col col1"><span>5 เท่าของรายได้</span></td></tr>
            <tr class="attr-header"><td class="text-center frst-col">
            <span>รายได้ขั้นต่ำ และเงื่อนไขในการสมัคร</span></td>
            <td class="cmpr-col col1"><span class="text-primary">30,000 บาทต่อเดือน</span></td></tr>
            <tr class="attr-header"><td class="text-center frst-col">
            <span>ค่าธรรมเนียมรายปีบัตรหลัก</span></td>
            <td class="cmpr-col col1"><span>ปีแรก: ฟรี ปีถัดไป: 2,000 บาท</span></td></tr>
            <tr class="attr-header attr-url"><td class="text-center frst-col">
            <span>เว็บไซต์</span></td>
            <td class="cmpr-col col1"><a href="https://ktc.example/x">x</a></td></tr>
            </tbody></table></body></html>"#;
        let records: Vec<CreditCard> = records_from_page(&ComparePage::parse(html), 3);
        assert_eq!(records.len(), 1);

        let card = &records[0];
        assert_eq!(card.card_type, "บัตรเครดิต");
        assert_eq!(card.maximum_credit_line, "5 เท่าของรายได้");
        assert_eq!(card.income_condition.income, Some(30000));
        assert_eq!(card.fees.annual_fee.subsequent_years, "2,000 บาท");
        assert!(card.product_features.is_empty());
        assert_eq!(
            card.fees.additional_info.product_website.as_deref(),
            Some("https://ktc.example/x")
        );
    }
}
