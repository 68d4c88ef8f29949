use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{optional_text, split_clean, split_numbered_list, year_conditions},
};

const CONDITION_LABEL: &str = "เงื่อนไข:";

/// An SME loan product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmeLoan {
    pub service_provider: String,
    pub product: String,
    pub interest_rates: InterestRates,
    pub product_details: ProductDetails,
    pub credit_and_loan_terms: CreditTerms,
    pub fees: Fees,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestRates {
    /// One entry per `ปีที่ N` tier, or the whole cell when it has no tiers.
    pub interest_rate_per_year: Vec<String>,
    pub default_interest: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetails {
    pub credit_line_type: String,
    pub collateral: Vec<String>,
    pub product_conditions: Vec<String>,
    pub borrower_age: String,
    pub application_conditions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditTerms {
    pub credit_limit: String,
    pub credit_limit_conditions: Vec<String>,
    pub borrowing_period: Vec<String>,
    pub borrowing_period_conditions: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fees {
    pub front_end_fee: String,
    pub management_fee: String,
    pub commitment_fee: String,
    pub cancellation_fee: String,
    pub prepayment_fee: Vec<String>,
    pub extension_fee: String,
    pub annual_fee: String,
    pub internal_appraisal_fee: String,
    pub external_appraisal_fee: Vec<String>,
    pub debt_collection_fee: String,
    pub credit_check_fee: String,
    pub statement_reissuing_fee: String,
    pub other_fees: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub product_website: Option<String>,
    pub fee_website: Option<String>,
}

fn interest_tiers(text: &str) -> Vec<String> {
    if text.contains("ปีที่") {
        year_conditions(text)
    } else {
        optional_text(text).into_iter().collect()
    }
}

fn fees(page: &ComparePage, col: Column) -> Fees {
    Fees {
        front_end_fee: page.cell_text("attr-FrontEndFeeRate", col),
        management_fee: page.cell_text("attr-ManagementFeeRate", col),
        commitment_fee: page.cell_text("attr-CommitmentFeeRate", col),
        cancellation_fee: page.cell_text("attr-CancellationFeeRate", col),
        prepayment_fee: split_clean(&page.cell_text("attr-PrepaymentFeeRate", col), "-"),
        extension_fee: page.cell_text("attr-ExtensionFeeRate", col),
        annual_fee: page.cell_text("attr-AnnualFeeRate", col),
        internal_appraisal_fee: page.cell_text("attr-SurveyAndAppraisalFeeByInternal", col),
        external_appraisal_fee: split_clean(
            &page.cell_text("attr-SurveyAndAppraisalFeeByExternal", col),
            CONDITION_LABEL,
        ),
        debt_collection_fee: page.cell_text("attr-DebtCollectionFee", col),
        credit_check_fee: page.cell_text("attr-CreditBureauFee", col),
        statement_reissuing_fee: page.cell_text("attr-StatementReIssuingFee", col),
        other_fees: optional_text(&page.cell_text("attr-OtherFee", col)),
    }
}

impl CompareProduct for SmeLoan {
    const NAME: &'static str = "sme-loans";
    const CATEGORY: &'static str = "ProductApp/SME";
    const OUTPUT_FILE: &'static str = "sme_loans.json";
    const PRODUCT_IDS: &'static str = "1775,1766,1764,1822,3114,2934,2956,2923,2922,2949,2952,\
        2944,2921,4063,4103,4138,4122,3122,3747,3867,3868,3872,3873,3883,3886,3885,3105,3107,\
        3106,3108,1138,1105,1136,1159,1115,1089,1074,1080,1117,1161,1168,1125,1103,1077,2033,\
        2926,2954,3116,3119,3110,3115,3120,1655,1660,2911,2927,2912,2930,2913,2931,2914,2932,\
        2915,2916,2940,2917,2941,2933,2953,2935,2937,2957,2918,2919,2942,2947,2924,2920,2948,\
        2929,2951,2928,2950,3381,931,662,2925,2939,2958,4117,4079,4123,4140,4066,4146,4135,4097,\
        4083,3870,3871,1654,1796,3376,2532,2531,3124,3378,1801,2723,602,599,4142,4080,1656,1657,\
        1658,1659,1778,2530,4110,1810,1790,1816,1767,1821,1798,1800,1797,1807,1781,1783,1784,\
        1805,1820,1772,1770,1792,1811,1817,1776,1794,1815,1814,1780,1765,1803,1791,1812,1777,\
        1769,1768,1763,1793,1761,1819,1813,1762,1774,1808,1786,1773,1788,1802,1804,1785,1771,\
        1787,1789,1799,1795,1779,1806,1818,4126,3133,3134,3128,3377,1809,2727,2728,601,4089,\
        3123,3379,2730,598,603,600,4145,4070,4085,4124,4129,4072,4098,4143,4071,4087,4114,2533,\
        4086,4100,4137,4132,3121,3132,3125,3135,418,421,420,419,422,1096,1172,1142,1086,1099,\
        1075,1163,1094,1166,1146,1100,1070,1076,1141,1155,1123,1124,1151,1109,1112,1114,1118,\
        1116,1170,1165,1162,1098,1082,1084,1144,1145,1133,1093,1102,1157,1072,1073,1091,1069,\
        1095,1104,1106,1143,1152,1088,1085,1097,1137,1130,1149,1150,1140,1160,1173,1126,1127,\
        1128,1120,1139,1079,1167,1156,1132,1083,1068,1119,1134,1107,1154,1121,1148,1081,1101,\
        1078,1111,1169,1164,1153,1129,1071,1135,1108,1131,1171,1110,1087,1092,1090,3380,1782,\
        3887,3757,3751,3753,3754,3745,3755,3746,3756,3749,3758,3759,3750,165,899,905,903,900,\
        901,904,902,3743,1602,1597,1592,3137,3129,3138,3130,3131,3126,3127,3136,2895,2896,2892,\
        2897,2894,2899,2893,2898,1598,1969,1970";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        SmeLoan {
            service_provider: page.provider(col),
            product: page.product(col),
            interest_rates: InterestRates {
                interest_rate_per_year: interest_tiers(
                    &page.cell_text("attr-InterestRatePerYear", col),
                ),
                default_interest: page.cell_text("attr-DefaultInterestRate", col),
            },
            product_details: ProductDetails {
                credit_line_type: page.cell_text("attr-CreditLineType", col),
                collateral: split_clean(&page.cell_text("attr-Collateral", col), "/"),
                product_conditions: split_numbered_list(
                    &page.cell_text("attr-ProductCondition", col),
                ),
                borrower_age: page.cell_text("attr-BorrowerAge", col),
                application_conditions: split_clean(
                    &page.cell_text("attr-ApplicationCondition", col),
                    "-",
                ),
            },
            credit_and_loan_terms: CreditTerms {
                credit_limit: page.cell_text("attr-CreditLimit", col),
                credit_limit_conditions: split_clean(
                    &page.cell_text("attr-CreditLimitCondition", col),
                    "-",
                ),
                borrowing_period: split_clean(&page.cell_text("attr-BorrowingPeriod", col), "-"),
                borrowing_period_conditions: optional_text(
                    &page.cell_text("attr-ConditionOfBorrowingPeriod", col),
                ),
            },
            fees: fees(page, col),
            additional_info: AdditionalInfo {
                product_website: page.cell_link("attr-uRL", col),
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
    fn interest_tiers_split_on_years_only() {
        assert_eq!(
            interest_tiers("ปีที่ 1-2 MLR-1% ต่อปี ปีที่ 3 เป็นต้นไป MLR"),
            vec!["ปีที่ 1-2 MLR-1% ต่อปี", "ปีที่ 3 เป็นต้นไป MLR"]
        );
        assert_eq!(interest_tiers("MOR ต่อปี"), vec!["MOR ต่อปี"]);
        assert!(interest_tiers("").is_empty());
    }

    #[test]
    fn reads_sme_terms_and_fees() {
        let html = compare_table(
            &[("ธนาคารกรุงเทพ", "บัวหลวง SME")],
            &[
                ("attr-Collateral", vec!["<span>ที่ดิน / อาคาร / เงินฝาก</span>"]),
                (
                    "attr-ProductCondition",
                    vec!["<span>1. เป็นนิติบุคคล 2. ดำเนินธุรกิจ 3 ปี</span>"],
                ),
                (
                    "attr-SurveyAndAppraisalFeeByExternal",
                    vec!["<span>ตามที่จ่ายจริง เงื่อนไข: บริษัทประเมินภายนอก</span>"],
                ),
                ("attr-uRL", vec![r#"<a href="https://bbl.example/sme">x</a>"#]),
            ],
            1,
        );
        let records: Vec<SmeLoan> = records_from_page(&ComparePage::parse(&html), 3);
        let loan = &records[0];

        assert_eq!(loan.product_details.collateral, vec!["ที่ดิน", "อาคาร", "เงินฝาก"]);
        assert_eq!(
            loan.product_details.product_conditions,
            vec!["เป็นนิติบุคคล", "ดำเนินธุรกิจ 3 ปี"]
        );
        assert_eq!(
            loan.fees.external_appraisal_fee,
            vec!["ตามที่จ่ายจริง", "บริษัทประเมินภายนอก"]
        );
        assert!(loan.credit_and_loan_terms.borrowing_period_conditions.is_none());
        assert_eq!(
            loan.additional_info.product_website.as_deref(),
            Some("https://bbl.example/sme")
        );
    }
}
