use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{optional_text, split_clean, year_conditions},
};

const AGE_SUFFIX: &str = "ปีขึ้นไป";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeLoan {
    pub service_provider: String,
    pub product: String,
    pub interest_rate: InterestRate,
    pub product_details: ProductDetails,
    pub loan_credit_repayment: LoanCreditRepayment,
    pub insurance_details: InsuranceDetails,
    pub general_fees: GeneralFees,
    pub payment_fees: PaymentFees,
    pub product_website: String,
    pub fee_website: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestRate {
    pub average_interest_rate_three_years: f64,
    pub interest_rate_conditions: Vec<String>,
    pub effective_interest_rate: String,
    pub maximum_normal_interest_rate: f64,
    pub default_interest_rate: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetails {
    pub loan_type: String,
    pub collateral_type: String,
    pub borrower_qualifications: String,
    pub loan_conditions: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined_loan_conditions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_specific_conditions: Option<String>,
    pub borrower_age: Option<i64>,
    pub minimum_income: String,
    pub application_conditions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanCreditRepayment {
    pub credit_limit_range: String,
    pub ltv_ratio: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_limit_conditions: Option<String>,
    pub loan_term: String,
    pub repayment_conditions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceDetails {
    pub mrta_conditions: String,
    pub mrta_cancellation_fee: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralFees {
    pub survey_and_appraisal_fee: Vec<String>,
    pub stamp_duty: String,
    pub mortgage_fee: String,
    pub transfer_fee: String,
    pub credit_info_verification_fee: String,
    pub fire_insurance_premium: String,
    pub cheque_return_fee: String,
    pub deficiency_balance_fee: String,
    pub statement_copy_fee: String,
    pub cheque_return_fine: Vec<String>,
    pub debt_collection_fee: Vec<String>,
    pub interest_rate_change_fee: String,
    pub refinance_fee: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_fees: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFees {
    pub deducting_from_bank_account: String,
    pub deducting_from_other_bank_account: Vec<String>,
    pub bank_counter_service: String,
    pub other_bank_counter_service: String,
    pub other_counter_service: Vec<String>,
    pub online_payment: Vec<String>,
    pub cdm_atm_payment: String,
    pub phone_payment: String,
    pub cheque_or_money_order_payment: String,
    pub other_channel_payment: String,
}

/// `"3.25%"` -> `3.25`; anything unparsable reads as zero.
fn parse_rate(text: &str) -> f64 {
    text.replace('%', "").trim().parse().unwrap_or(0.0)
}

/// `"20 ปีขึ้นไป"` -> `20`.
fn parse_borrower_age(text: &str) -> Option<i64> {
    let head = text.split_once(AGE_SUFFIX).map_or(text, |(head, _)| head);
    head.split_whitespace().collect::<String>().parse().ok()
}

fn dash_list(page: &ComparePage, attr: &str, col: Column) -> Vec<String> {
    split_clean(&page.cell_text(attr, col), "-")
}

fn interest_rate(page: &ComparePage, col: Column) -> InterestRate {
    InterestRate {
        average_interest_rate_three_years: parse_rate(&page.cell_text_matching(
            "attr-percentAverageInterestRateForThreeYearsDisplay",
            col,
            "span.text-bold",
        )),
        interest_rate_conditions: year_conditions(
            &page.cell_text("attr-conditionOfYearInterestRateDisplay", col),
        ),
        effective_interest_rate: page.cell_text("attr-effectiveInterestRateDisplay", col),
        maximum_normal_interest_rate: parse_rate(
            &page.cell_text("attr-maximumNormalInterestRateDisplay", col),
        ),
        default_interest_rate: page.cell_text("attr-defaultInterestRateAndRelatedCondition", col),
    }
}

fn product_details(page: &ComparePage, col: Column) -> ProductDetails {
    let product_conditions = optional_text(&page.cell_text("attr-conditionOfProduct", col));

    ProductDetails {
        loan_type: page.cell_text("attr-loanTypeName", col),
        collateral_type: page.cell_text("attr-typeOfCollateraDisplay", col),
        borrower_qualifications: page
            .cell_text("attr-characterOfBorrowerToLoanInterestRate", col),
        loan_conditions: page.cell_text("attr-conditionOfLoanWithOtherProducts", col),
        combined_loan_conditions: product_conditions.clone(),
        product_specific_conditions: product_conditions,
        borrower_age: parse_borrower_age(&page.cell_text("attr-borrowerAge", col)),
        minimum_income: page.cell_text("attr-minimumMonthlyIncomeDisplay", col),
        application_conditions: page.cell_text("attr-conditionToApply", col),
    }
}

fn general_fees(page: &ComparePage, col: Column) -> GeneralFees {
    GeneralFees {
        survey_and_appraisal_fee: dash_list(page, "attr-surveyAndAppraisalFeeDisplay", col),
        stamp_duty: page.cell_text("attr-stampDuty", col),
        mortgage_fee: page.cell_text("attr-mortgageFee", col),
        transfer_fee: page.cell_text("attr-transferFee", col),
        credit_info_verification_fee: page.cell_text("attr-creditInformationVerificationFee", col),
        fire_insurance_premium: page.cell_text("attr-fireInsurancePremiums", col),
        cheque_return_fee: page.cell_text("attr-feeForChequeReturned", col),
        deficiency_balance_fee: page.cell_text("attr-feeForDeficiencyBalanceAC", col),
        statement_copy_fee: page.cell_text("attr-copyOfStatementFee", col),
        cheque_return_fine: dash_list(page, "attr-finesForChequeReturned", col),
        debt_collection_fee: dash_list(page, "attr-debtCollectionFee", col),
        interest_rate_change_fee: page.cell_text("attr-feeforChangingInterestRate", col),
        refinance_fee: dash_list(page, "attr-refinanceFee", col),
        other_fees: optional_text(&page.cell_text("attr-otherFees", col)),
    }
}

fn payment_fees(page: &ComparePage, col: Column) -> PaymentFees {
    PaymentFees {
        deducting_from_bank_account: page.cell_text("attr-deductingFromBankACFee", col),
        deducting_from_other_bank_account: dash_list(page, "attr-deductingFromOtherBankACFee", col),
        bank_counter_service: page.cell_text("attr-bankCounterServiceFee", col),
        other_bank_counter_service: page.cell_text("attr-otherBankCounterServiceFee", col),
        other_counter_service: dash_list(page, "attr-otherCounterServiceFee", col),
        online_payment: dash_list(page, "attr-onlinePaymentFee", col),
        cdm_atm_payment: page.cell_text("attr-cDMATMPaymentFee", col),
        phone_payment: page.cell_text("attr-phonePaymentFee", col),
        cheque_or_money_order_payment: page.cell_text("attr-chequeOrMoneyOrderPaymentFee", col),
        other_channel_payment: page.cell_text("attr-otherChannelPaymentFee", col),
    }
}

impl CompareProduct for HomeLoan {
    const NAME: &'static str = "home-loans";
    const CATEGORY: &'static str = "ProductApp/HomeLoan";
    const OUTPUT_FILE: &'static str = "house_loan.json";
    const PRODUCT_IDS: &'static str = "21430,21389,21396,21425,21452,21423,21404,17220,17216,\
        700,703,710,21443,21440,21419,21403,21411,21392,21414,21451,17218,17217,17226,1739,\
        21431,17222,21444,21390,21418,21397,21441,20822,708,704,21433,21004,21006,21432,21391,\
        17224,21413,17223,21408,21005,21007,21439,21427,15220,17219,17221,20229,20854,21417,\
        21442,20833,21412,21401,21426,21436,21400,20789,20791,20776,20261,20306,21012,15219,\
        17225,20852,20281,20328,21020,15222,21437,21098,21060,20241,20313,21013,21128,21113,\
        21008,21010,17227,20283,20262,20330,20307,21021,20770,20771,20768,20783,21428,21252,\
        21263,20255,20300,20263,21009,21011,15221,20308,20321,20269,21445,20252,20267,20331,\
        20246,20272,20260,21429,21036,21242,20924,21225,21210,21016,21245,21192,21095,21415,\
        20843,20250,20265,20333,20259,21233,709,705,20790,20794,20796,20793,20782,20798,20795,\
        21253,21261,21254,21262,21193,21059,20316,20257,21014,21030,21118,21037,21133,21395,\
        21017,16243,20298,20277,20305,20304,20244,20324,20856,20287,20311,21135,20319,20268,\
        20777,20785,20266,20279,20293,21022,16213,16234,21249,21260,20276,21239,21115,21015,\
        20942,20336,20256,20291,20299,14980,21218,21214,20253,20294,21185,21049,21099,21244,\
        21023,16224,20775,21221,21215,21212,21227,20289,21407,21448,20302,20309,21224,21142,\
        21053,20318,20264,20258,21438,16204,16254,16249,20314,21196,20290,20312,20278,21124,\
        21197,21201,21189,21018,16194,16244,20315,16223,21258,21259,21250,21251,20280,20326,\
        21194,21038,21101,21134,21019,20922,706,20270,21047,21226,21114,20774,14981,21035,20325,\
        21084,21172,21039,16233,20271,20245,21173,21032,21131,21119,20274,21116,21209,20929,\
        16214,21182,21087,21103,20934,20931,16183,21085,21092,21238,21424,21398,21420,21170,\
        21130,21220,20923,20937,21195,21127,21041,21246,21257,21086,16176,21175,20920,16171,\
        16193,21223,20928,20941,21126,16203,21093,21255,21256,21247,21248,20921,16184,20787,\
        20926,1738,20219,20221,20223,20225,20227,701,20940,21409,20296,17711,14982,20301,20284,\
        20780,20781,20784,20792,20788,20786,20933,20249,20329,20286,20251,21406,20936,20919,\
        20779,20778,20797,20772,20773,20769,20254,20220,20222,20224,20226,20228,20335,20292,707,\
        20273,20927,20282,20327,20248,21449,20930,20297,20334,14965,20935,21421,21199,20925,702,\
        20932,12618,21089,20938,20939,20322,20317,20320,20303,21045,21456,21405,20323,20275,\
        20285,20243,20242,20247,20295,21184,21112,21216,21040,21100,21455,1740,20310,20332,\
        20288,21051,21110,21206,21139,21048,21111,21241,21061,21141,21208,21217,21056,21240,\
        21121,21198,21132,21138,21213,21043,21219,21058,21243,21123,21091,21140,21211,21222,\
        21454,21187,21096,21453,21129,17710,17709,17712,16469,16461,15456,15455";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let loan_credit_repayment = LoanCreditRepayment {
            credit_limit_range: page.cell_text("attr-creditLimitDisplay", col),
            ltv_ratio: split_clean(&page.cell_text("attr-loanToValueRatio", col), "/"),
            credit_limit_conditions: optional_text(
                &page.cell_text("attr-conditionOfCreditLimit", col),
            ),
            loan_term: page.cell_text("attr-periodOfBorrowing", col),
            repayment_conditions: page.cell_text("attr-conditionOfInstallment", col),
        };

        HomeLoan {
            service_provider: page.provider(col),
            product: page.product(col),
            interest_rate: interest_rate(page, col),
            product_details: product_details(page, col),
            loan_credit_repayment,
            insurance_details: InsuranceDetails {
                mrta_conditions: page.cell_text("attr-mortgageReducingTermAssuranceDisplay", col),
                mrta_cancellation_fee: page.cell_text("attr-mRTACancellationFee", col),
            },
            general_fees: general_fees(page, col),
            payment_fees: payment_fees(page, col),
            product_website: page.cell_link("attr-uRL", col).unwrap_or_default(),
            fee_website: page.cell_link("attr-feeuRL", col).unwrap_or_default(),
        }
    }
}
