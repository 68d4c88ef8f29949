use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{
        all_integers, all_numbers, clean_amount_text, first_integer, percentage, split_clean,
        split_numbered_list, static_regex,
    },
};

static_regex!(BAHT_AMOUNT, r"(\d+(?:\.\d+)?)\s*บาท");

const COMPENSATION_MARKER: &str = "ค่าธรรมเนียมชดเชยอัตราแลกเปลี่ยน";
const FIXED_RATE: &str = "ตามอัตราที่กำหนด";
const NO_SERVICE: &str = "ไม่มีบริการ";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternationalFee {
    pub provider: String,
    pub international_transfer_fees: TransferFees,
    pub cheque_and_draft_fees: ChequeAndDraftFees,
    pub letter_of_credit_fees: LetterOfCreditFees,
    pub bill_collection_fees: BillCollectionFees,
    pub other_fees: OtherFees,
    pub additional_information: AdditionalInformation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferFees {
    pub inward_remittance: InwardRemittance,
    pub outward_remittance: OutwardRemittance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InwardRemittance {
    pub fee: Vec<String>,
    pub fee_numeric: Vec<f64>,
    pub exchange_compensation_fee: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutwardRemittance {
    pub fee_type: String,
    pub conditions: Vec<String>,
    pub conditions_numeric: ConditionsNumeric,
    pub exchange_compensation_fee: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionsNumeric {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_range: Option<(i64, i64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_per_transaction: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_fee: Option<i64>,
}

impl ConditionsNumeric {
    fn from_conditions(conditions: &[String]) -> Self {
        let mut numeric = ConditionsNumeric::default();
        for condition in conditions {
            if condition.contains("ตั้งแต่") && condition.contains("บาท") {
                if let [min, max, ..] = all_integers(condition).as_slice() {
                    numeric.transaction_range = Some((*min, *max));
                }
            }
            if condition.contains("ยกเลิก") && condition.contains("เรียกเก็บ") {
                numeric.cancellation_fee = first_integer(condition);
            } else if condition.contains("เรียกเก็บที่") {
                numeric.fee_per_transaction = first_integer(condition);
            }
        }
        numeric
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChequeAndDraftFees {
    pub traveler_cheque_buying_fee: ChequeFee,
    pub traveler_cheque_selling_fee: ChequeFee,
    pub draft_buying_fee: ChequeFee,
    pub draft_selling_fee: ChequeFee,
    pub foreign_bill_buying_fee: ChequeFee,
    pub foreign_bill_selling_fee: ChequeFee,
    pub exchange_compensation_fee: Vec<String>,
}

/// The `-` bullets of a cheque or draft fee cell and the amounts they name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChequeFee {
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_fee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stamp_duty: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_fee: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_payment_fee: Option<i64>,
}

impl ChequeFee {
    fn from_text(text: &str) -> Self {
        let text = split_clean(&clean_amount_text(text), "-");
        let mut fee = ChequeFee {
            text: vec![],
            base_fee: None,
            stamp_duty: None,
            return_fee: None,
            stop_payment_fee: None,
        };
        for line in &text {
            if line.contains("บาท") && line.contains("ฉบับ") {
                let numbers = all_integers(line);
                fee.base_fee = numbers.first().copied().or(fee.base_fee);
                fee.stamp_duty = numbers.get(1).copied().or(fee.stamp_duty);
            }
            if line.contains("เช็คคืน") {
                fee.return_fee = first_integer(line);
            }
            if line.contains("Stop Payment") {
                fee.stop_payment_fee = first_integer(line);
            }
        }
        fee.text = text;
        fee
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterOfCreditFees {
    pub foreign_lc: LetterOfCreditFee,
    pub domestic_lc: LetterOfCreditFee,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterOfCreditFee {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_fee: Option<f64>,
}

impl LetterOfCreditFee {
    fn from_text(text: &str) -> Self {
        let text = clean_amount_text(text);
        LetterOfCreditFee {
            percent_fee: percentage(&text),
            min_fee: BAHT_AMOUNT
                .captures(&text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok()),
            text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillCollectionFees {
    pub inward_bill_fee: String,
    pub outward_bill_fee_exporter: String,
    pub outward_bill_fee_importer: String,
    pub import_bill_fee: String,
    pub export_bill_fee_seller: InvoiceFees,
    pub export_bill_fee_buyer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceFees {
    pub first_invoice: String,
    pub subsequent_invoices: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFees {
    pub other_fee: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInformation {
    pub fee_url: Option<String>,
}

/// Splits a remittance cell into the fee proper and the exchange
/// compensation sentence that some banks append to it.
fn split_compensation(text: &str) -> (&str, Option<String>) {
    match text.split_once(COMPENSATION_MARKER) {
        Some((fee, rest)) => (fee.trim(), Some(format!("{COMPENSATION_MARKER}{rest}"))),
        None => (text.trim(), None),
    }
}

fn inward_remittance(page: &ComparePage, col: Column) -> InwardRemittance {
    let text = page.cell_text("attr-InwardRemittanceFee", col);
    let (fee, exchange_compensation_fee) = split_compensation(&text);
    let fee = split_clean(fee, "-");
    InwardRemittance {
        fee_numeric: fee.iter().flat_map(|part| all_numbers(part)).collect(),
        fee,
        exchange_compensation_fee,
    }
}

fn outward_remittance(page: &ComparePage, col: Column) -> OutwardRemittance {
    let text = page.cell_text("attr-OutwardRemittanceFee", col);
    let (fee, exchange_compensation_fee) = split_compensation(&text);
    let conditions = split_numbered_list(&clean_amount_text(fee));
    let fee_type = if text.contains(FIXED_RATE) {
        FIXED_RATE
    } else {
        NO_SERVICE
    };
    OutwardRemittance {
        fee_type: fee_type.to_string(),
        conditions_numeric: ConditionsNumeric::from_conditions(&conditions),
        conditions,
        exchange_compensation_fee,
    }
}

fn cheque_fee(page: &ComparePage, attr: &str, col: Column) -> ChequeFee {
    ChequeFee::from_text(&page.cell_text(attr, col))
}

fn cheque_and_draft_fees(page: &ComparePage, col: Column) -> ChequeAndDraftFees {
    let exchange_compensation_fee = page
        .cell_texts("attr-ExchangeCompensationFee", col)
        .into_iter()
        .filter(|text| text.contains(COMPENSATION_MARKER))
        .flat_map(|text| split_clean(&text, "-"))
        .collect();
    ChequeAndDraftFees {
        traveler_cheque_buying_fee: cheque_fee(page, "attr-TravelerChequeBuyingFee", col),
        traveler_cheque_selling_fee: cheque_fee(page, "attr-TravelerChequeSellingFee", col),
        draft_buying_fee: cheque_fee(page, "attr-DraftBuyingFee", col),
        draft_selling_fee: cheque_fee(page, "attr-DraftSellingFee", col),
        foreign_bill_buying_fee: cheque_fee(page, "attr-ForeignBillBuyingFee", col),
        foreign_bill_selling_fee: cheque_fee(page, "attr-ForeignBillSellingFee", col),
        exchange_compensation_fee,
    }
}

fn bill_collection_fees(page: &ComparePage, col: Column) -> BillCollectionFees {
    BillCollectionFees {
        inward_bill_fee: page.cell_text("attr-InwardBillFee", col),
        outward_bill_fee_exporter: page.cell_text("attr-OutwardBillFeeFromExporter", col),
        outward_bill_fee_importer: page.cell_text("attr-OutwardBillFeeFromImporter", col),
        import_bill_fee: page.cell_text("attr-ImportBillFee", col),
        export_bill_fee_seller: InvoiceFees {
            first_invoice: page.cell_text("attr-FirstInvoice", col),
            subsequent_invoices: page.cell_text("attr-SubsequentInvoices", col),
        },
        export_bill_fee_buyer: page.cell_text("attr-ExportBillFeeFromBuyer", col),
    }
}

impl CompareProduct for InternationalFee {
    const NAME: &'static str = "international-fees";
    const CATEGORY: &'static str = "FeeApp/InternationalTransactionFee";
    const OUTPUT_FILE: &'static str = "international_fees.json";
    const PRODUCT_IDS: &'static str = "122,107,108,97,81,116,13,34,39,37,99,72,20,30,38,118,12,\
        4,52,24,19,85,50,91,104,73,15,109,100,21,66,65,51";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        InternationalFee {
            provider: page.provider(col),
            international_transfer_fees: TransferFees {
                inward_remittance: inward_remittance(page, col),
                outward_remittance: outward_remittance(page, col),
            },
            cheque_and_draft_fees: cheque_and_draft_fees(page, col),
            letter_of_credit_fees: LetterOfCreditFees {
                foreign_lc: LetterOfCreditFee::from_text(
                    &page.cell_text("attr-ForeignLetterOfCreditFee", col),
                ),
                domestic_lc: LetterOfCreditFee::from_text(
                    &page.cell_text("attr-DomesticLetterOfCreditFee", col),
                ),
            },
            bill_collection_fees: bill_collection_fees(page, col),
            other_fees: OtherFees {
                other_fee: split_clean(&page.cell_text("attr-OtherFees", col), "-"),
            },
            additional_information: AdditionalInformation {
                fee_url: page.cell_link("attr-FeeURL", col),
            },
        }
    }
}
