use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{clean_amount_text, first_number, optional_text, split_clean, static_regex},
};

static_regex!(MIN_PER_COPY, r"ไม่ต่ำกว่าฉบับละ\s*(\d+(?:\.\d+)?)\s*บาท");
static_regex!(MAX_CAP, r"สูงสุดไม่เกิน\s*(\d+(?:\.\d+)?)\s*บาท");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeLoanFee {
    pub provider: String,
    pub product: String,
    pub general_fees: GeneralFees,
    pub payment_fees: PaymentFees,
    pub other_fees: OtherFees,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralFees {
    pub default_interest_rate: LoanFee,
    pub survey_and_appraisal_fee: LoanFee,
    pub mrta: LoanFee,
    pub stamp_duty: LoanFee,
    pub mortgage_fee: LoanFee,
    pub transfer_ownership_fee: LoanFee,
    pub credit_bureau_fee: LoanFee,
    pub fire_insurance_premium: LoanFee,
    pub other_cheque_returned_fee: LoanFee,
    pub insufficient_direct_debit_fee: LoanFee,
    pub copy_statement_reissuing_fee: LoanFee,
    pub cheque_returned_fee: LoanFee,
    pub debt_collection_fee: LoanFee,
    pub changing_interest_rate_fee: LoanFee,
    pub refinance_fee: LoanFee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFees {
    pub direct_debit_from_provider: LoanFee,
    pub direct_debit_from_other_provider: LoanFee,
    pub at_provider_branch: LoanFee,
    pub at_other_provider_branch: LoanFee,
    pub at_payment_service_point: LoanFee,
    pub online_payment: LoanFee,
    pub cdm_or_atm: LoanFee,
    pub phone_payment: LoanFee,
    pub cheque_or_money_order_payment: LoanFee,
    pub other_payment_channels: LoanFee,
}

/// A fee cell as its `-` bullets, with the first number and any per-copy
/// minimum or cap pulled out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanFee {
    pub original_text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee: Option<f64>,
}

fn captured_number(re: &regex::Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

impl LoanFee {
    fn from_text(text: &str) -> Self {
        let original_text = split_clean(&clean_amount_text(text), "-");
        let joined = original_text.join(" ");
        LoanFee {
            numeric: first_number(&joined),
            min_fee: captured_number(&MIN_PER_COPY, &joined),
            max_fee: captured_number(&MAX_CAP, &joined),
            original_text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFees {
    pub other_fees: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub fee_website_link: String,
}

fn loan_fee(page: &ComparePage, attr: &str, col: Column) -> LoanFee {
    LoanFee::from_text(&page.cell_text(attr, col))
}

fn general_fees(page: &ComparePage, col: Column) -> GeneralFees {
    GeneralFees {
        default_interest_rate: loan_fee(page, "attr-DfltInterestRate", col),
        survey_and_appraisal_fee: loan_fee(page, "attr-SurveyAndAppraisalFee", col),
        mrta: loan_fee(page, "attr-MortgageReducingTermAssuranceCancelled", col),
        stamp_duty: loan_fee(page, "attr-DutyStampFee", col),
        mortgage_fee: loan_fee(page, "attr-MortgateFee", col),
        transfer_ownership_fee: loan_fee(page, "attr-TranfersOwnerFee", col),
        credit_bureau_fee: loan_fee(page, "attr-CreditBureauFee", col),
        fire_insurance_premium: loan_fee(page, "attr-FireInsuracePremiumsFee", col),
        other_cheque_returned_fee: loan_fee(page, "attr-OtherChequeReturnedFee", col),
        insufficient_direct_debit_fee: loan_fee(page, "attr-InsufficientDirectDebitFee", col),
        copy_statement_reissuing_fee: loan_fee(page, "attr-CopyStatementReissuingFee", col),
        cheque_returned_fee: loan_fee(page, "attr-ChequeReturnedFee", col),
        debt_collection_fee: loan_fee(page, "attr-DebtCollectionFee", col),
        changing_interest_rate_fee: loan_fee(page, "attr-ChangingInterestRateFee", col),
        refinance_fee: loan_fee(page, "attr-RefinanceFee", col),
    }
}

fn payment_fees(page: &ComparePage, col: Column) -> PaymentFees {
    PaymentFees {
        direct_debit_from_provider: loan_fee(page, "attr-DirectDebitFromAccountFee", col),
        direct_debit_from_other_provider: loan_fee(
            page,
            "attr-DirectDebitFromAccountFeeOther",
            col,
        ),
        at_provider_branch: loan_fee(page, "attr-BankCounterServiceFee", col),
        at_other_provider_branch: loan_fee(page, "attr-BankCounterServiceFeeOther", col),
        at_payment_service_point: loan_fee(page, "attr-CounterServiceFee", col),
        online_payment: loan_fee(page, "attr-PaymentOnlineFee", col),
        cdm_or_atm: loan_fee(page, "attr-PaymentCDMATMFee", col),
        phone_payment: loan_fee(page, "attr-PaymentPhoneFee", col),
        cheque_or_money_order_payment: loan_fee(page, "attr-PaymentChequeOrMoneyOrderFee", col),
        other_payment_channels: loan_fee(page, "attr-PaymentOtherChannelFee", col),
    }
}

impl CompareProduct for HomeLoanFee {
    const NAME: &'static str = "home-loan-fees";
    const CATEGORY: &'static str = "FeeApp/homeloanFee";
    const OUTPUT_FILE: &'static str = "home_loan_fees.json";
    const PRODUCT_IDS: &'static str = "21510,17709,20310,20242,20275,20317,20274,20315,20271,\
        20312,20308,20299,20259,20314,20287,20276,20260,20270,20289,20311,20269,20328,20272,\
        20313,20257,20330,20307,20306,20258,20268,20321,20281,20331,20241,20316,20283,20262,\
        20261,20318,20319,20280,20253,20326,20294,20298,20255,20336,20250,20302,20277,20266,\
        20252,20245,20278,20325,20290,20323,20322,20332,20247,20285,20320,20244,20263,20291,\
        20333,20264,20324,20293,20246,20288,20295,20243,20303,20334,20248,20297,20273,20335,\
        20249,20286,20301,20305,20300,20256,20265,20309,20304,20279,20267,20329,20296,20251,\
        20284,20327,20292,20282,20254,21476,21504,21472,21514,21471,21462,21505,21488,21506,\
        21515,21478,21498,21473,21487,21477,21481,21467,21492,21469,21475,21466,21493,21517,\
        21497,21519,21512,21500,21483,21502,21474,21460,21461,21465,21489,21494,21513,21499,\
        21480,21485,21518,21491,21486,21457,21463,21520,21496,21501,21459,21479,16469,16461,\
        20220,20219,20222,20221,20229,20224,20223,20226,20225,20228,20227,15219,15221,15220,\
        15222,20843,20822,20833,20852,20854,20856,1740,20939,20932,20936,20927,20938,20925,\
        20923,20924,20942,20928,20940,20921,20922,20929,20941,20920,20931,20926,20937,20934,\
        20933,20935,20919,20930,1738,1739,21210,21233,21133,21113,21244,21142,21053,21060,21227,\
        21115,21095,21134,21226,21114,21242,21135,21453,21455,21454,21456,20794,20770,20789,\
        20790,20779,20780,20792,20772,20773,20788,20778,20781,20791,20771,20796,20793,20795,\
        20776,20783,20798,20768,20787,20782,20785,20775,20777,20774,20784,20786,20797,20769,\
        17220,17221,17226,17227,17222,17223,17224,17225,17216,17217,17218,17219,16203,16176,\
        16184,16193,16183,16171,16204,16233,16214,16223,16194,16213,16254,16234,16244,16249,\
        16243,16224,14965,14981,14980,14982,21085,21170,21173,21194,21195,21218,21221,21084,\
        21124,21030,21116,21193,21185,21182,21223,21126,21092,21093,21127,21032,21035,21086,\
        21087,21196,21197,21172,21175,21220,21091,21187,21222,21198,21199,21045,21089,21184,\
        21129,21096,21206,21241,21219,21048,21051,21140,21141,21243,21240,21132,21213,21112,\
        21061,21139,21040,21217,21214,21215,21038,21041,21130,21131,21238,21118,21209,21103,\
        21049,21039,21201,21059,21101,21212,21192,21239,21119,21047,21036,21098,21099,21224,\
        21225,21189,21128,21037,21208,21211,21110,21111,21058,21121,21123,21100,21216,21043,\
        21056,21138,700,706,707,701,702,708,703,709,710,705,704,21004,21005,21006,21007,21008,\
        21009,21010,21011,21016,21017,21018,21019,21012,21013,21014,21015,21020,21021,21022,\
        21023,21245,21247,21257,21256,21255,21248,21246,21249,21250,21260,21258,21259,21251,\
        21253,21262,21254,21261,21263,21252,12618,17712,17710,17711,15456,15455";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let other = split_clean(&clean_amount_text(&page.cell_text("attr-other", col)), "-");

        HomeLoanFee {
            provider: page.provider(col),
            product: page.product(col),
            general_fees: general_fees(page, col),
            payment_fees: payment_fees(page, col),
            other_fees: OtherFees {
                other_fees: optional_text(&other.join(" ")),
            },
            additional_info: AdditionalInfo {
                fee_website_link: page.cell_link("attr-Feeurl", col).unwrap_or_default(),
            },
        }
    }
}
