use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{
        all_integers, all_percentages, clean_amount_text, first_integer, optional_text,
        split_clean,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmeLoanFee {
    pub service_provider: String,
    pub product: String,
    pub loan_fees: LoanFees,
    pub other_fees: Option<String>,
    pub fee_website_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanFees {
    pub front_end_fee: String,
    pub management_fee: String,
    pub commitment_fee: String,
    pub cancellation_fee: String,
    pub prepayment_fee: PercentageRange,
    pub extension_fee: PercentageRange,
    pub appraisal_fee_internal: AmountRange,
    pub appraisal_fee_external: AmountRange,
    pub debt_collection_fee: Vec<String>,
    pub credit_check_fee: String,
    pub statement_re_issuing_fee: String,
    pub debt_collection_fee_amount: Option<i64>,
    pub credit_check_fee_amount: Option<i64>,
    pub statement_re_issuing_fee_amount: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageRange {
    pub description: String,
    pub min_percentage: Option<f64>,
    pub max_percentage: Option<f64>,
}

impl PercentageRange {
    fn from_text(text: &str) -> Self {
        let rates = all_percentages(text);
        PercentageRange {
            description: text.to_string(),
            min_percentage: rates.iter().copied().reduce(f64::min),
            max_percentage: rates.iter().copied().reduce(f64::max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountRange {
    pub description: String,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
}

impl AmountRange {
    fn from_text(text: &str) -> Self {
        let amounts = all_integers(text);
        AmountRange {
            description: text.to_string(),
            min_amount: amounts.iter().copied().min(),
            max_amount: amounts.iter().copied().max(),
        }
    }
}

fn cell(page: &ComparePage, attr: &str, col: Column) -> String {
    clean_amount_text(&page.cell_text(attr, col))
}

fn loan_fees(page: &ComparePage, col: Column) -> LoanFees {
    let debt_collection_fee = split_clean(&cell(page, "attr-DebtCollectionFee", col), "-");
    let credit_check_fee = cell(page, "attr-CreditBureauFee", col);
    let statement_re_issuing_fee = cell(page, "attr-StatementReIssuingFee", col);

    LoanFees {
        front_end_fee: cell(page, "attr-FrontEndFee", col),
        management_fee: cell(page, "attr-ManagementFee", col),
        commitment_fee: cell(page, "attr-CommitmentFee", col),
        cancellation_fee: cell(page, "attr-CancellationFee", col),
        prepayment_fee: PercentageRange::from_text(&cell(page, "attr-PrepaymentFee", col)),
        extension_fee: PercentageRange::from_text(&cell(page, "attr-ExtensionFee", col)),
        appraisal_fee_internal: AmountRange::from_text(&cell(
            page,
            "attr-SurveyAndAppraisalFeeByInternal",
            col,
        )),
        appraisal_fee_external: AmountRange::from_text(&cell(
            page,
            "attr-SurveyAndAppraisalFeeByExternal",
            col,
        )),
        debt_collection_fee_amount: debt_collection_fee
            .iter()
            .find_map(|line| first_integer(line).filter(|amount| *amount != 0)),
        debt_collection_fee,
        credit_check_fee_amount: first_integer(&credit_check_fee),
        credit_check_fee,
        statement_re_issuing_fee_amount: first_integer(&statement_re_issuing_fee),
        statement_re_issuing_fee,
    }
}

impl CompareProduct for SmeLoanFee {
    const NAME: &'static str = "sme-loan-fees";
    const CATEGORY: &'static str = "FeeApp/SMEFee";
    const OUTPUT_FILE: &'static str = "sme_loan_fees.json";
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
        SmeLoanFee {
            service_provider: page.provider(col),
            product: page.product(col),
            loan_fees: loan_fees(page, col),
            other_fees: optional_text(&cell(page, "attr-other", col)),
            fee_website_link: page.cell_link("attr-Feeurl", col),
        }
    }
}
