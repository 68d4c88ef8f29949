use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{
        all_numbers, clean_text, first_integer, optional_text, split_clean, split_numbered_list,
        two_number_range,
    },
};

/// A deposit account product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    pub provider: String,
    pub product: String,
    pub interest: Interest,
    pub account_opening_conditions: OpeningConditions,
    pub product_usage_conditions: UsageConditions,
    pub insurance: Insurance,
    pub product_fees: ProductFees,
    pub general_fee: GeneralFee,
    #[serde(rename = "addition_info")]
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interest {
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
    pub conditional_rate: Vec<String>,
    pub interest_calculation_method: String,
    pub tax_free: String,
    pub interest_payment_period: String,
    pub interest_payment_method: String,
    pub interest_penalty_conditions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningConditions {
    pub fixed_term: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_opening_balance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_deposit_limit: Option<i64>,
    pub other_product_requirements: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<i64>,
    pub specific_opening_conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageConditions {
    pub minimum_deposit_per_transaction: Option<i64>,
    pub additional_deposits_allowed: String,
    pub partial_withdrawals_allowed: String,
    pub deposit_withdraw_transfer_conditions: Vec<String>,
    pub account_renewal_when_due: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insurance {
    pub insurance: String,
    pub insurance_company: String,
    pub insurance_coverage_limit: Option<i64>,
    pub insurance_conditions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFees {
    pub account_maintenance_fee: String,
    pub sms_notification_fee: String,
    pub passbook_replacement_fee: Option<i64>,
    pub transaction_history_fee: ConditionalFee,
    pub account_closure_fee: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralFee {
    pub coin_counting_fee: String,
    pub cross_bank_deposit_withdrawal_fee: String,
    pub other_provider_deposit_fee_cdm_atm: Vec<String>,
    pub same_provider_deposit_fee_cdm_atm: String,
    pub deposit_withdrawal_agent_fee: String,
    pub auto_transfer_fee_savings_checking: ConditionalFee,
    pub cross_bank_transfer_fee: Vec<String>,
    pub other_fees: String,
}

/// Fee lines before the `เงื่อนไข` marker and the `-` bullets after it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionalFee {
    pub fees: Vec<String>,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub product_website_link: Option<String>,
    pub fee_website_link: Option<String>,
}

const STATEMENT_REQUEST: &str = "ขอใบแสดงรายการย้อนหลัง";
const EXCESS_DEPOSIT: &str = "เงินฝากส่วนที่เกิน";

impl ConditionalFee {
    /// `item_marker` splits the fee part further, and is kept at the front of
    /// every item it splits off.
    fn from_text(text: &str, item_marker: Option<&str>) -> Self {
        let (fee_part, condition_part) = text.split_once("เงื่อนไข").unwrap_or((text, ""));
        let fees = match item_marker {
            Some(marker) => split_clean(fee_part, marker)
                .into_iter()
                .map(|item| format!("{marker} {item}"))
                .collect(),
            None => optional_text(fee_part).into_iter().collect(),
        };
        ConditionalFee {
            fees,
            conditions: split_clean(condition_part.trim_start_matches(':'), "-"),
        }
    }
}

/// A single rate reads as both the minimum and the maximum.
fn rate_range(text: &str) -> (Option<f64>, Option<f64>) {
    match all_numbers(text).as_slice() {
        [] => (None, None),
        [only] => (Some(*only), Some(*only)),
        [min, max, ..] => (Some(*min), Some(*max)),
    }
}

/// `None` for unlimited amounts.
fn limit_amount(text: &str) -> Option<i64> {
    if text.contains("ไม่กำหนด") || text.contains("ไม่มีกำหนด") {
        None
    } else {
        first_integer(text)
    }
}

/// Both `-` bullets and numbered items start a new section.
fn sections(text: &str) -> Vec<String> {
    split_clean(text, "-")
        .iter()
        .flat_map(|part| split_numbered_list(part))
        .collect()
}

fn interest(page: &ComparePage, col: Column) -> Interest {
    let (min_rate, max_rate) =
        rate_range(&page.cell_text_matching("attr-intr", col, "span.text-bold"));
    let conditional = page.cell_lines("attr-intr", col).join(" ");

    Interest {
        min_rate,
        max_rate,
        conditional_rate: split_clean(&conditional, EXCESS_DEPOSIT),
        interest_calculation_method: page.cell_text("attr-intrmthd", col),
        tax_free: page.cell_text("attr-intrwotax", col),
        interest_payment_period: page.cell_text("attr-intrterm", col),
        interest_payment_method: page.cell_text("attr-intrch", col),
        interest_penalty_conditions: page.cell_text("attr-intrexc", col),
    }
}

fn general_fee(page: &ComparePage, col: Column) -> GeneralFee {
    GeneralFee {
        coin_counting_fee: page.cell_text("attr-feecorn", col),
        cross_bank_deposit_withdrawal_fee: page.cell_text("attr-feedeposit", col),
        other_provider_deposit_fee_cdm_atm: split_clean(&page.cell_text("attr-feecdm", col), "/"),
        same_provider_deposit_fee_cdm_atm: page.cell_text("attr-feecdm2", col),
        deposit_withdrawal_agent_fee: page.cell_text("attr-feeother2", col),
        auto_transfer_fee_savings_checking: ConditionalFee::from_text(
            &page.cell_text("attr-feetranfer", col),
            None,
        ),
        cross_bank_transfer_fee: split_clean(&page.cell_text("attr-feetranfer2", col), "/"),
        other_fees: page.cell_text("attr-feeother1", col),
    }
}

impl CompareProduct for Deposit {
    const NAME: &'static str = "deposits";
    const CATEGORY: &'static str = "ProductApp/Deposit";
    const OUTPUT_FILE: &'static str = "deposit.json";
    const PRODUCT_IDS: &'static str = "64434,63687,62863,63513,62861,62862,63726,63904,63935,\
        63888,62859,63723,63881,63659,63523,62860,63725,63642,63644,63530,64306,63864,64002,\
        63879,63908,64021,64158,64159,63722,64331,63300,62251,64066,64001,63450,64157,63294,\
        64188,64177,64189,62850,64020,62507,64124,64095,63724,63997,64433,63995,64176,63392,\
        62505,62511,63385,64004,64016,64171,64163,63366,63359,64155,62854,63443,63878,64003,\
        64014,59174,64161,64169,63346,63340,64153,62852,64230,64087,64415,62517,64499,61132,\
        61106,63880,63707,63635,59180,62856,63861,63448,61113,64316,64318,63617,63606,61123,\
        61112,61147,61131,61117,61135,63909,63982,63892,63981,63925,64484,64505,63863,63271,\
        63875,64498,61150,61095,61138,61139,61109,61126,61096,61144,61098,61128,61119,61103,\
        62516,64487,64445,63865,59183,63860,63337,63417,63446,61108,64376,63903,64192,63613,\
        61115,61146,61130,61116,61104,61120,63899,63922,62247,61136,61125,61110,61145,61149,\
        61133,63887,63919,62234,63866,63643,64421,64436,64125,63585,63900,64019,63704,64191,\
        63545,62201,62212,61107,61142,61097,61127,61151,61105,63898,62184,62227,63854,63602,\
        62502,63962,63907,63378,63874,63658,62209,62188,62195,62510,62258,64167,63877,64018,\
        63867,64256,59185,63327,63322,59182,62515,63936,63905,63937,64000,64497,64478,63929,\
        63288,64037,64503,64395,64429,64459,52356,64412,64391,62199,62192,62241,62239,62259,\
        63528,62508,62257,63876,63374,63435,64058,64193,64377,63862,63994,62858,63889,63487,\
        63615,62513,63926,63541,64447,64496,64475,64406,64071,64050,64116,64042,64130,52354,\
        62506,64467,63706,59175,64168,64160,63445,64022,64013,64267,64152,63902,59181,64100,\
        64079,64072,64028,52358,62853,61137,61124,61141,62265,62193,63916,63278,64178,64179,\
        63680,63656,22398,63356,63426,64166,64427,64451,64457,64444,64392,64476,64512,64411,\
        64190,64182,22220,63917,63976,63918,63953,63221,64092,63688,63891,64129,64101,64123,\
        62260,61100,64165,63896,63910,62242,64504,64404,64501,64393,22218,63518,63695,63570,\
        63882,63491,64080,64144,62847,64174,63987,64009,62512,62504,62266,63855,62204,64328,\
        63984,62198,63227,62501,64492,64474,64510,59184,64456,64464,64494,62851,59171,61148,\
        61118,61102,63869,63998,64049,64094,64137,64086,64108,64057,63488,63490,52355,63449,\
        22217,63489,64073,63951,62205,64164,64172,64024,64017,64353,64181,64183,22221,64156,\
        62857,62213,62194,52351,64051,64007,63988,63447,63996,64180,63890,64194,63897,22391,\
        22386,22388,22393,22394,62228,62226,62514,63930,63978,63967,64162,64170,64154,62190,\
        63314,22219,63895,64023,64015,64308,64048,64109,64093,64136,64064,64107,64056,64078,\
        64027,64070,64115,64041,64035,62243,62210,62187,62236,62855,64242,64128,64337,63964,\
        63966,62264,63893,59173,64361,62237,64151,63992,62509,62503,64065,64324,63954,63920,\
        63975,64286,63652,63709,64479,64113,64084,64121,63486,59172,64026,64138,64114,64034,\
        64085,64122,64010,62202,61134,63650,64098,64032,64076,64047,63991,61099,63287,64455,\
        64430,63230,63317,64011,63868,64413,64441,64446,64449,63217,63857,62208,62222,63297,\
        63405,64356,64382,64384,64354,22216,22390,52357,52353,61140,64143,64006,64069,62252,\
        63454,63459,59170,62186,63485,64502,64394,64490,64493,63484,64060,64097,64068,64105,\
        64127,64142,62235,52352,63853,64103,63927,63440,63441,63989,64126,64118,64089,64054,\
        64046,64134,64184,64173,64185,64040,64186,63438,62231,64221,62843,63708,63492,22222,\
        62500,64091,64062,64033,64025,64096,64067,64038,64063,64055,22392,64141,23264,64112,\
        64083,23259,22384,23263,62225,61122,63610,63646,22385,22389,64045,64133,64104,64075,\
        64031,64119,64090,64061,23270,23273,22381,63870,64139,63444,63856,63442,64111,64082,\
        64053,64039,23269,23276,60673,23260,64106,23274,23275,63977,63974,62842,64147,62845,\
        63990,63437,61129,63985,64005,64150,64246,63439,64145,64365,64146,63986,61121,64148,\
        61101,23262,23266,63993,63455,64175,64088,63859,64489,63698,22382,22380,64368,64509,\
        59179,23261,64511,64036,64491,64488,64463,64402,64428,64485,23268,63452,63458,62254,\
        37623,37616,64008,64149,23272,23267,63928,37615,37602,22387,64077,64044,64132,64074,\
        64110,64081,64052,23271,64030,64059,63894,63885,64244,64349,64131,64371,64277,64120,\
        59167,59177,59176,59168,61114,63858,63873,62848,63554,63883,63884,63886,59166,22383,\
        59178,59169,64187,63872,64448,64290,63983,37605,23258,64135,63483,63231,64012,23265,\
        64117,64140,22400,22397,22395,22399,22396";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let (min_age, max_age) = two_number_range(&page.cell_text("attr-age", col))
            .map_or((None, None), |(min, max)| (Some(min), Some(max)));

        Deposit {
            provider: page.provider(col),
            product: page.product(col),
            interest: interest(page, col),
            account_opening_conditions: OpeningConditions {
                fixed_term: page.cell_text("attr-dpstterm", col),
                minimum_opening_balance: limit_amount(&page.cell_text("attr-blncmin", col)),
                maximum_deposit_limit: limit_amount(&page.cell_text("attr-blncmax", col)),
                other_product_requirements: page.cell_text("attr-prodbuy", col),
                min_age,
                max_age,
                specific_opening_conditions: sections(&page.cell_text("attr-opencond", col)),
            },
            product_usage_conditions: UsageConditions {
                minimum_deposit_per_transaction: limit_amount(&page.cell_text("attr-mindpst", col)),
                additional_deposits_allowed: page.cell_text("attr-topup", col),
                partial_withdrawals_allowed: page.cell_text("attr-wdprtprnc", col),
                deposit_withdraw_transfer_conditions: sections(
                    &page.cell_text("attr-wdprtxnblnc", col),
                ),
                account_renewal_when_due: page.cell_text("attr-accrenew", col),
            },
            insurance: Insurance {
                insurance: page.cell_text("attr-insrnc", col),
                insurance_company: page.cell_text("attr-insrnccompany", col),
                insurance_coverage_limit: first_integer(&page.cell_text("attr-insrnclimit", col)),
                insurance_conditions: page.cell_text("attr-insrnccond", col),
            },
            product_fees: ProductFees {
                account_maintenance_fee: page.cell_text("attr-accmtnc", col),
                sms_notification_fee: page.cell_text("attr-accmsms", col),
                passbook_replacement_fee: first_integer(&page.cell_text("attr-accmopenbk", col)),
                transaction_history_fee: ConditionalFee::from_text(
                    &page.cell_text("attr-accmbranch", col),
                    Some(STATEMENT_REQUEST),
                ),
                account_closure_fee: page.cell_text("attr-accmclosebk", col),
            },
            general_fee: general_fee(page, col),
            additional_info: AdditionalInfo {
                product_website_link: page.cell_link("attr-url", col),
                fee_website_link: page.cell_link("attr-feeurl", col),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn conditional_fees_split_at_the_condition_marker() {
        let fee = ConditionalFee::from_text(
            "ครั้งละ 10 บาท เงื่อนไข: - โอนอัตโนมัติ - ต่อรายการ",
            None,
        );
        assert_eq!(fee.fees, vec!["ครั้งละ 10 บาท"]);
        assert_eq!(fee.conditions, vec!["โอนอัตโนมัติ", "ต่อรายการ"]);

        let history = ConditionalFee::from_text(
            &format!(
                "{STATEMENT_REQUEST} ไม่เกิน 1 ปี 50 บาท {STATEMENT_REQUEST} เกิน 1 ปี 100 บาท"
            ),
            Some(STATEMENT_REQUEST),
        );
        assert_eq!(history.fees.len(), 2);
        assert!(history.fees[1].starts_with(STATEMENT_REQUEST));
        assert!(history.conditions.is_empty());

        assert_eq!(ConditionalFee::from_text("-", None), ConditionalFee::default());
    }

    #[test]
    fn rates_and_limits() {
        assert_eq!(rate_range("0.25% - 1.50%"), (Some(0.25), Some(1.5)));
        assert_eq!(rate_range("0.45%"), (Some(0.45), Some(0.45)));
        assert_eq!(limit_amount("ไม่กำหนด"), None);
        assert_eq!(limit_amount("1,000 บาท"), Some(1000));
    }

    #[test]
    fn reads_interest_conditions_and_fees() {
        let html = compare_table(
            &[("ธนาคารกรุงศรีอยุธยา", "ออมทรัพย์มีแต่ได้")],
            &[
                (
                    "attr-header attr-intr trbox-shadow",
                    vec![
                        "<span class=\"text-bold\">0.5 - 1.8%</span> \
                        ไม่เกิน 1 ล้านบาท 1.8% เงินฝากส่วนที่เกิน 1 ล้านบาท 0.5%",
                    ],
                ),
                ("attr-header attr-age trbox-shadow", vec!["<span>15-60</span>"]),
                ("attr-header attr-blncmin trbox-shadow", vec!["<span>500 บาท</span>"]),
                (
                    "attr-header attr-opencond trbox-shadow",
                    vec!["<span>1. บุคคลธรรมดา 2. สัญชาติไทย</span>"],
                ),
                (
                    "attr-header attr-feecdm trbox-shadow",
                    vec!["<span>ในเขต 15 บาท / ข้ามเขต 30 บาท</span>"],
                ),
            ],
            1,
        );
        let records: Vec<Deposit> = records_from_page(&ComparePage::parse(&html), 3);
        let deposit = &records[0];

        assert_eq!(deposit.interest.min_rate, Some(0.5));
        assert_eq!(deposit.interest.max_rate, Some(1.8));
        assert_eq!(deposit.interest.conditional_rate.len(), 2);
        assert_eq!(deposit.account_opening_conditions.min_age, Some(15));
        assert_eq!(deposit.account_opening_conditions.minimum_opening_balance, Some(500));
        assert_eq!(
            deposit.account_opening_conditions.specific_opening_conditions,
            vec!["บุคคลธรรมดา", "สัญชาติไทย"]
        );
        assert_eq!(
            deposit.general_fee.other_provider_deposit_fee_cdm_atm,
            vec!["ในเขต 15 บาท", "ข้ามเขต 30 บาท"]
        );
        assert!(deposit.additional_info.product_website_link.is_none());
    }
}
