use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    fee::FeeDetail,
};

const FEE_UNIT: &str = "บาท/ฉบับ";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChequeFee {
    pub providers: String,
    pub fees_types: ChequeFeesTypes,
    pub others_fees: OthersFees,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChequeFeesTypes {
    pub cheque_book_purchase: Vec<FeeDetail>,
    pub cheque_deposit_across: Vec<FeeDetail>,
    pub cheque_deposit_inbranch: Vec<FeeDetail>,
    pub cheque_return_from_insufficient_funds: Vec<FeeDetail>,
    pub cheque_fee_returned: Vec<FeeDetail>,
    pub cheque_gift_purchase: FeeDetail,
    pub cheque_cash_withdraw_across: Vec<FeeDetail>,
    pub cheque_cash_withdraw_inbranch: FeeDetail,
    pub cashier_cheque_purchase: Vec<FeeDetail>,
    pub cashier_cheque_cash_withdraw_across: Vec<FeeDetail>,
    pub cashier_cheque_cash_withdraw_inbranch: Vec<FeeDetail>,
    pub draft_purchase_fee: Vec<FeeDetail>,
    pub publication_fee: FeeDetail,
    pub cheque_cancellation_fee: FeeDetail,
    pub cheque_advance_deposit_fee: FeeDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OthersFees {
    pub other_fees: FeeDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub website_fee_link: Option<String>,
}

fn fee(page: &ComparePage, attr: &str, col: Column) -> FeeDetail {
    FeeDetail::from_text(&page.cell_text(attr, col), Some(FEE_UNIT))
}

/// One fee per line of the cell.
fn fee_lines(page: &ComparePage, attr: &str, col: Column) -> Vec<FeeDetail> {
    page.cell_lines(attr, col)
        .iter()
        .map(|line| FeeDetail::from_text(line, Some(FEE_UNIT)))
        .collect()
}

impl CompareProduct for ChequeFee {
    const NAME: &'static str = "cheque-fees";
    const CATEGORY: &'static str = "FeeApp/ChequeFee";
    const OUTPUT_FILE: &'static str = "cheque_fees.json";
    const PRODUCT_IDS: &'static str = "162152,2,5,17,4,157479,15,27,34,6,194031,162151,240,\
        155024,16,162568,237,28,241,24,163222,150920,32,9,23,37,35,30,33,26,449176,13";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let fees_types = ChequeFeesTypes {
            cheque_book_purchase: fee_lines(page, "attr-ChequeBookPurchase", col),
            cheque_deposit_across: fee_lines(page, "attr-ChequeDepositAcross", col),
            cheque_deposit_inbranch: fee_lines(page, "attr-ChequeDepositInbranch", col),
            cheque_return_from_insufficient_funds: fee_lines(
                page,
                "attr-ChequeReturnFromInstrument",
                col,
            ),
            cheque_fee_returned: fee_lines(page, "attr-ChequeFeeReturned", col),
            cheque_gift_purchase: fee(page, "attr-ChequeGiftPurchase", col),
            cheque_cash_withdraw_across: fee_lines(page, "attr-ChequeCashWithdrawAcross", col),
            cheque_cash_withdraw_inbranch: fee(page, "attr-ChequeCashWithdrawInbranch", col),
            cashier_cheque_purchase: fee_lines(page, "attr-ChequeCashierPurchase", col),
            cashier_cheque_cash_withdraw_across: fee_lines(
                page,
                "attr-ChequeCashierCashWithdrawAcross",
                col,
            ),
            cashier_cheque_cash_withdraw_inbranch: fee_lines(
                page,
                "attr-ChequeCashierCashWithdrawInbranch",
                col,
            ),
            draft_purchase_fee: fee_lines(page, "attr-DraftPurchaseFee", col),
            publication_fee: fee(page, "attr-PublicationFee", col),
            cheque_cancellation_fee: fee(page, "attr-ChequeCancellationFee", col),
            cheque_advance_deposit_fee: fee(page, "attr-ChequeAdvanceDepositFee", col),
        };

        ChequeFee {
            providers: page.provider(col),
            fees_types,
            others_fees: OthersFees {
                other_fees: fee(page, "attr-other", col),
            },
            additional_info: AdditionalInfo {
                website_fee_link: page.cell_link("attr-Feeurl", col),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn reads_cheque_fees() {
        let html = compare_table(
            &[("ธนาคารกสิกรไทย", "เช็ค")],
            &[
                (
                    "attr-ChequeBookPurchase",
                    vec!["<span>เล่มละ 200 บาท<br>เล่ม 50 ฉบับ 500 บาท</span>"],
                ),
                ("attr-ChequeDepositAcross", vec!["<span>ร้อยละ 0.1% ขั้นต่ำ 20 บาท</span>"]),
                ("attr-ChequeGiftPurchase", vec!["<span>10 - 30 บาท เงื่อนไข: ต่อฉบับ</span>"]),
                ("attr-Feeurl", vec![r#"<a href="https://kasikorn.example/fee">เว็บไซต์</a>"#]),
            ],
            1,
        );
        let records: Vec<ChequeFee> = records_from_page(&ComparePage::parse(&html), 3);
        assert_eq!(records.len(), 1);

        let cheque = &records[0];
        assert_eq!(cheque.providers, "ธนาคารกสิกรไทย");

        let book = &cheque.fees_types.cheque_book_purchase;
        assert_eq!(book.len(), 2);
        assert_eq!(book[0].min_fee, Some(200.0));
        assert_eq!(book[1].max_fee, Some(500.0));
        assert_eq!(book[0].fee_unit.as_deref(), Some(FEE_UNIT));

        let across = &cheque.fees_types.cheque_deposit_across[0];
        assert_eq!(across.percentage_fee, Some(0.1));
        assert_eq!(across.min_fee, None);

        let gift = &cheque.fees_types.cheque_gift_purchase;
        assert_eq!((gift.min_fee, gift.max_fee), (Some(10.0), Some(30.0)));
        assert_eq!(gift.condition.as_deref(), Some("ต่อฉบับ"));

        assert!(cheque.fees_types.draft_purchase_fee.is_empty());
        assert_eq!(cheque.others_fees.other_fees.text, "");
        assert_eq!(
            cheque.additional_info.website_fee_link.as_deref(),
            Some("https://kasikorn.example/fee")
        );
    }
}
