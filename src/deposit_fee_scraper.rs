use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{first_number, split_clean},
};

/// Declares a section of `-` separated fee lists together with its numeric
/// twin holding the first number of every cell.
macro_rules! fee_section {
    ($lists:ident, $numbers:ident { $($field:ident => $attr:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Default, Serialize, Deserialize)]
        pub struct $lists {
            $(pub $field: Vec<String>,)+
        }

        #[derive(Debug, Clone, Default, Serialize, Deserialize)]
        pub struct $numbers {
            $(pub $field: Option<f64>,)+
        }

        impl $lists {
            fn read(page: &ComparePage, col: Column) -> ($lists, $numbers) {
                $(let $field = page.cell_text($attr, col);)+
                (
                    $lists { $($field: split_clean(&$field, "-"),)+ },
                    $numbers { $($field: first_number(&$field),)+ },
                )
            }
        }
    };
}

fee_section!(ProductFees, NumericProductFees {
    account_maintenance_fee => "attr-AccountMaintenanceFee",
    statement_require_fee => "attr-StatementRequireFee",
    statement_require_six_month => "attr-StatementRequireSixMonth",
    statement_require_six_month_to_two_year => "attr-StatementRequiresixMonthToTwoYear",
    statement_require_two_year => "attr-StatementRequireTwoYear",
    short_message_service => "attr-ShortMessageService",
    short_message_service_fee_monthly => "attr-ShortMessageServiceFeeMonthy",
    short_message_service_annual_fee => "attr-ShortMessageServiceAnnaulFee",
    lost_passbook_fee => "attr-LostPassBookFee",
    account_close_fee => "attr-AccountCloseFee",
});

fee_section!(GeneralFees, NumericGeneralFees {
    coin_collect_fee => "attr-CoinCollectFee",
    branch_fee => "attr-BRFee",
    kiosk_other_fee => "attr-KioskOtherFee",
    kiosk_fee => "attr-KioskFee",
    agent_fee => "attr-AgentFee",
    shop_agent_fee => "attr-ShopAgentFee",
    post_agent_fee => "attr-PostAgentFee",
    topup_agent_fee => "attr-TopupAgentFee",
    other_agent_fee => "attr-OtherAgentFee",
    transfer_between_saving_current_account_fee => "attr-TransferBetweenSavingCurrentAccoutnFee",
    transfer_between_banking_fee => "attr-TransferBetweenBankingFee",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositFee {
    pub provider: String,
    pub product: String,
    pub product_fees: ProductFees,
    pub numeric_product_fees: NumericProductFees,
    pub general_fees: GeneralFees,
    pub numeric_general_fees: NumericGeneralFees,
    pub other_fees: OtherFees,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFees {
    pub other_fee: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub fee_url: Option<String>,
}

impl CompareProduct for DepositFee {
    const NAME: &'static str = "deposit-fees";
    const CATEGORY: &'static str = "FeeApp/DepositFee";
    const OUTPUT_FILE: &'static str = "deposit_fees.json";
    const PRODUCT_IDS: &'static str = "64178,64190,64179,64191,64180,64192,64181,64193,64182,\
        64194,64183,64184,64176,64188,64177,64189,64157,64158,64159,64160,64168,64169,64161,64162,\
        64170,64171,64163,64164,64172,64165,64166,64167,64147,64148,64151,64152,64153,64154,64155,\
        64156,64324,64230,64244,64221,64368,64349,64306,64331,64267,64376,64308,64316,64318,64353,\
        64356,64354,64242,64286,64382,64384,64361,64256,64377,62848,62851,62850,62853,62852,62855,\
        62854,62857,62856,62858,62842,63610,63554,63708,63658,63545,63613,63695,63617,63570,63606,\
        63680,63656,63518,63585,63688,63706,63644,63530,63659,63523,63687,63635,63704,63541,63643,\
        63707,63528,63698,63962,63916,63964,63966,63951,63917,63926,63918,63927,63910,63976,63953,\
        63937,63954,63919,63920,63975,63930,63978,63967,63984,63905,63935,63936,63907,63981,63922,\
        63977,37616,37615,37623,63898,63887,63899,63889,63900,63890,63891,63902,63893,63903,63895,\
        63904,63897,63888,63896,63892,63883,63886,61129,61101,61148,61102,61118,61116,61120,61104,\
        61139,61109,61126,61096,61144,61098,61128,61103,61119,61137,61124,61141,61150,61095,61138,\
        61107,61142,61097,61123,61147,61112,61127,61151,61105,61131,61135,61117,61136,61110,61125,\
        61145,61149,61133,61115,61146,61130,61132,61106,61108,61113,63872,63858,63873,63859,63874,\
        63860,63875,63861,63876,63862,63877,63863,63878,63864,63879,63865,63880,63866,63881,63867,\
        63870,63857,64020,64001,64021,64002,63993,64022,64013,63994,64003,64014,63995,64023,64015,\
        63996,64004,64016,63997,64024,64017,63998,64018,64019,64000,63985,64005,22391,22386,22392,\
        22388,22393,22390,22394,22398,22395,22399,22396,22400,22397,22383,22384,23262,23259,23263,\
        23260,23264,62209,62247,62198,62204,62266,62190,62186,62264,62187,62265,62210,62236,62188,\
        62226,62227,62194,62212,62243,62193,62195,62228,62184,62201,62213,62205,62237,62234,63724,\
        63722,63725,63723,63726,62860,62859,62862,62861,62863,63513,22222,22216,22217,22218,22219,\
        22220,22221,62511,62512,62513,62514,62515,62516,62517,62501,62500,62502,62503,62504,62505,\
        62506,62507,62508,62509,62510,63484,63485,63486,63487,63488,63489,63490,63491,64084,64104,\
        64121,64075,64062,64082,64096,64067,64038,64126,64118,64033,64053,64089,64092,64060,64097,\
        64068,64025,64045,64091,64111,64113,64133,64135,64063,64039,64070,64046,64115,64041,64125,\
        64134,64035,64129,64105,64123,64049,64127,64094,64137,64142,64086,64108,64057,64055,64031,\
        64100,64098,64028,64026,64119,64071,64076,64116,64114,64090,64034,64042,64085,64061,64122,\
        64048,64058,64141,64093,64130,64136,64037,64112,64064,64107,64083,64056,64078,64054,64027,\
        64079,64032,64050,64047,64124,64095,64066,64087,64139,64073,64120,64128,64101,64072,64138,\
        64109,64421,64487,64484,64415,64497,64449,64446,64392,64476,64411,64512,64447,64496,64490,\
        64493,64475,64406,64503,64395,64430,64455,64429,64459,64492,64474,64391,64412,64510,64456,\
        64464,64494,64504,64404,64393,64501,64394,64502,64451,64427,64444,64457,64436,64445,64505,\
        64499,64478,64498,64433,64489,64479,64509,64511,64413,64441,64485,64488,64434,64467,64463,\
        64402,64428,63445,63446,63447,63448,63449,63450,63442,63443,63437,63452,63454,63455,63458,\
        63459,52351,52354,52353,52356,52355,52358,52357,59183,59174,59184,59175,59185,59166,59170,\
        59180,59171,59181,59172,59182,59173,63327,63337,63346,63356,63366,63374,63378,63271,63385,\
        63278,63392,63288,63294,63300,63217,63221,63314,63322,63417,63340,63426,63359,63435,63405,\
        22380,22385,22381,22387,22382,22389,63438,63439,63440,63441,63444,64187,64173,64174,64185,\
        64186,64175,64143,64144,64149,64150,64145,64146,64365,64246,64277,64371,64337,64328,62843,\
        62845,62847,63642,63646,63615,63709,63652,63650,63602,63974,63909,63982,63929,63925,63908,\
        63894,63882,63885,63884,61140,61121,61100,61099,61114,61134,61122,63853,63856,63868,63869,\
        63855,63854,64007,63988,64008,63989,64009,63986,64006,63987,60673,62251,62225,63483,63492,\
        59176,59167,59177,59168,59178,59169,59179,63287,63297,63227,63230,64290,63983,63928,64012,\
        63990,64010,63991,64011,63992,23258,23261,62254,64051,64117,64080,64131,64106,64077,64040,\
        64069,64044,64036,64065,64132,64074,64030,64110,64103,64140,64081,64088,64052,64059,64491,\
        64448,52352,63231,63317,37605,37602,23265,23266,23272,23273,23274,23267,23275,23268,23269,\
        23276,23270,23271,62208,62231,62202,62258,62259,62239,62192,62241,62199,62260,62242,62222,\
        62257,62252,62235";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let (product_fees, numeric_product_fees) = ProductFees::read(page, col);
        let (general_fees, numeric_general_fees) = GeneralFees::read(page, col);

        DepositFee {
            provider: page.provider(col),
            product: page.product(col),
            product_fees,
            numeric_product_fees,
            general_fees,
            numeric_general_fees,
            other_fees: OtherFees {
                other_fee: split_clean(&page.cell_text("attr-OtherFee", col), "-"),
            },
            additional_info: AdditionalInfo {
                fee_url: page.cell_link("attr_feeurl", col),
            },
        }
    }
}
