use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{
        clean_amount_text, condition_after_marker, leading_number, split_clean, split_numbered_list,
    },
};

const NO_FEE: &str = "ไม่มีค่าธรรมเนียม";
const NO_SERVICE: &str = "ไม่มีบริการ";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalLoanFee {
    pub service_provider: String,
    pub product: String,
    pub general_fees: GeneralFees,
    pub revolving_fees: RevolvingFees,
    pub payment_fees: PaymentFees,
    pub other_fees: OtherFees,
    pub additional_info: AdditionalInfo,
}

/// `fee` is `0` for a waived fee and absent when there is no service or the
/// cell doesn't open with an amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargedFee {
    pub text: String,
    pub fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
}

impl ChargedFee {
    fn from_text(text: &str) -> Self {
        let fee = if text.contains(NO_FEE) {
            Some(0.0)
        } else if text.contains(NO_SERVICE) {
            None
        } else {
            leading_number(text)
        };
        ChargedFee {
            text: text.to_string(),
            fee,
            conditions: condition_after_marker(text),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralFees {
    pub default_interest: ChargedFee,
    pub debt_collection: ChargedFee,
    pub prepayment: ChargedFee,
    pub credit_bureau_check: ChargedFee,
    pub stamp_duty: ChargedFee,
    pub cheque_return: ChargedFee,
    pub insufficient_funds: ChargedFee,
    pub statement_reissue: ChargedFee,
    pub transaction_inquiry: ChargedFee,
}

/// Fees of the card that comes with a revolving loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevolvingFees {
    pub card_fee: ChargedFee,
    pub card_replacement: ChargedFee,
    pub pin_replacement: ChargedFee,
    pub currency_risk: ChargedFee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentFees {
    pub free_payment_methods: Vec<String>,
    pub debit_from_provider: ChargedFee,
    pub debit_from_others: ChargedFee,
    pub bank_branch: ChargedFee,
    pub other_branch: ChargedFee,
    pub counter_service: ChargedFee,
    pub online_payment: ChargedFee,
    pub atm_cdm: ChargedFee,
    pub phone_payment: ChargedFee,
    pub cheque_payment: ChargedFee,
    pub other_methods: ChargedFee,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFees {
    pub other_fee_details: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub fee_website: String,
}

fn charged_fee(page: &ComparePage, attr: &str, col: Column) -> ChargedFee {
    ChargedFee::from_text(&clean_amount_text(&page.cell_text(attr, col)))
}

fn general_fees(page: &ComparePage, col: Column) -> GeneralFees {
    GeneralFees {
        default_interest: charged_fee(page, "attr-DfltIntRateFee", col),
        debt_collection: charged_fee(page, "attr-DebtCollectionFee", col),
        prepayment: charged_fee(page, "attr-PrepaymentFee", col),
        credit_bureau_check: charged_fee(page, "attr-CreditBureauFee", col),
        stamp_duty: charged_fee(page, "attr-DutyStampFee", col),
        cheque_return: charged_fee(page, "attr-ChequeReturnedFee", col),
        insufficient_funds: charged_fee(page, "attr-InsufficientDirectDebitFee", col),
        statement_reissue: charged_fee(page, "attr-CopyStatementReissuing", col),
        transaction_inquiry: charged_fee(page, "attr-TransactionVerificationFee", col),
    }
}

fn payment_fees(page: &ComparePage, col: Column) -> PaymentFees {
    PaymentFees {
        free_payment_methods: split_clean(&page.cell_text("attr-FreePaymentMethod", col), "-"),
        debit_from_provider: charged_fee(page, "attr-DirectDebitFromAccountFee", col),
        debit_from_others: charged_fee(page, "attr-DirectDebitFromAccountFeeOther", col),
        bank_branch: charged_fee(page, "attr-BankCounterServiceFee", col),
        other_branch: charged_fee(page, "attr-BankCounterServiceFeeOther", col),
        counter_service: charged_fee(page, "attr-CounterServiceFee", col),
        online_payment: charged_fee(page, "attr-PaymentOnlineFee", col),
        atm_cdm: charged_fee(page, "attr-PaymentCDMATMFee", col),
        phone_payment: charged_fee(page, "attr-PaymentPhoneFee", col),
        cheque_payment: charged_fee(page, "attr-PaymentChequeOrMoneyOrderFee", col),
        other_methods: charged_fee(page, "attr-PaymentOtherChannelFee", col),
    }
}

impl CompareProduct for PersonalLoanFee {
    const NAME: &'static str = "personal-loan-fees";
    const CATEGORY: &'static str = "FeeApp/personalloanFee";
    const OUTPUT_FILE: &'static str = "personal_loan_fees.json";
    const PRODUCT_IDS: &'static str = "249-1,244-1,245-1,247-1,246-1,251-1,10819-1,487-1,489-1,\
        10478-2,376-1,272-2,11701-1,10978-1,10537-2,11678-1,278-2,279-2,375-1,11917-1,121-1,\
        273-1,10796-1,10797-1,11452-1,11096-1,11699-1,11698-1,10818-1,10574-1,11625-1,10913-1,\
        11700-1,10548-1,10613-1,11036-1";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        PersonalLoanFee {
            service_provider: page.provider(col),
            product: page.product(col),
            general_fees: general_fees(page, col),
            revolving_fees: RevolvingFees {
                card_fee: charged_fee(page, "attr-CardHolderAnnualFee", col),
                card_replacement: charged_fee(page, "attr-CardReplacementFee", col),
                pin_replacement: charged_fee(page, "attr-CardPINReplacement", col),
                currency_risk: charged_fee(page, "attr-FXRiskCost", col),
            },
            payment_fees: payment_fees(page, col),
            other_fees: OtherFees {
                other_fee_details: split_numbered_list(&page.cell_text("attr-other", col)),
            },
            additional_info: AdditionalInfo {
                fee_website: page.cell_link("attr-Feeurl", col).unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn waived_missing_and_charged_fees() {
        assert_eq!(ChargedFee::from_text("ไม่มีค่าธรรมเนียม").fee, Some(0.0));
        assert_eq!(ChargedFee::from_text("ไม่มีบริการ").fee, None);
        assert_eq!(ChargedFee::from_text("ตามที่จ่ายจริง").fee, None);

        let fee = ChargedFee::from_text("300 บาท ต่อครั้ง เงื่อนไข: ทวงถามทางจดหมาย");
        assert_eq!(fee.fee, Some(300.0));
        assert_eq!(fee.conditions.as_deref(), Some("ทวงถามทางจดหมาย"));
    }

    #[test]
    fn reads_loan_and_card_fees_per_column() {
        let html = compare_table(
            &[("ธนาคารกสิกรไทย", "สินเชื่อบุคคล Xpress Cash"), ("ธนาคารยูโอบี", "UOB CashPlus")],
            &[
                (
                    "attr-DebtCollectionFee",
                    vec!["<span>100 บาท</span>", "<span>ไม่มีค่าธรรมเนียม</span>"],
                ),
                (
                    "attr-CardHolderAnnualFee",
                    vec!["<span>ไม่มีบริการ</span>", "<span>1,500 บาท</span>"],
                ),
                (
                    "attr-FreePaymentMethod",
                    vec!["<span>- หักบัญชี - Mobile Banking</span>", ""],
                ),
                ("attr-other", vec!["<span>1. ค่าปิดบัญชี 2. ค่าออกบัตรใหม่</span>", ""]),
            ],
            1,
        );
        let records: Vec<PersonalLoanFee> = records_from_page(&ComparePage::parse(&html), 3);
        assert_eq!(records.len(), 2);

        let kbank = &records[0];
        assert_eq!(kbank.product, "สินเชื่อบุคคล Xpress Cash");
        assert_eq!(kbank.general_fees.debt_collection.fee, Some(100.0));
        assert_eq!(kbank.revolving_fees.card_fee.fee, None);
        assert_eq!(
            kbank.payment_fees.free_payment_methods,
            vec!["หักบัญชี", "Mobile Banking"]
        );
        assert_eq!(
            kbank.other_fees.other_fee_details,
            vec!["ค่าปิดบัญชี", "ค่าออกบัตรใหม่"]
        );

        let uob = &records[1];
        assert_eq!(uob.general_fees.debt_collection.fee, Some(0.0));
        assert_eq!(uob.revolving_fees.card_fee.fee, Some(1500.0));
        assert!(uob.other_fees.other_fee_details.is_empty());
    }
}
