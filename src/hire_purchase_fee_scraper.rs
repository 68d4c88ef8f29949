use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{all_integers, clean_amount_text, optional_text, split_clean},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HirePurchaseFee {
    pub provider: String,
    pub contract_effective_date: Option<String>,
    pub general_fees: GeneralFees,
    pub payment_fees: PaymentFees,
    pub other_fees: OtherFees,
    pub additional_info: AdditionalInfo,
}

/// `text` holds the `-` separated parts; the amounts span every integer in the cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeDetail {
    pub text: Vec<String>,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
}

impl FeeDetail {
    fn from_text(text: &str) -> Self {
        let text = clean_amount_text(text);
        let amounts = all_integers(&text);
        FeeDetail {
            text: split_clean(&text, "-"),
            min_amount: amounts.iter().min().copied(),
            max_amount: amounts.iter().max().copied(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralFees {
    pub new_vehicle_registration_fee: FeeDetail,
    pub ownership_transfer_fee_one_step: FeeDetail,
    pub ownership_transfer_fee_two_step: FeeDetail,
    pub vehicle_inspection_fee: FeeDetail,
    pub service_provider_ownership_transfer_fee_one_step: FeeDetail,
    pub service_provider_ownership_transfer_fee_two_step: FeeDetail,
    pub lease_transfer_fee: FeeDetail,
    pub contract_termination_fee: FeeDetail,
    pub late_payment_penalty: FeeDetail,
    pub debt_collection_fee: FeeDetail,
    pub tax_renewal_fee: FeeDetail,
    pub license_plate_processing_fee: FeeDetail,
    pub registration_address_change_fee: FeeDetail,
    pub document_copy_service_fee: FeeDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFees {
    pub direct_debit_from_provider_account: FeeDetail,
    pub direct_debit_from_other_provider_account: FeeDetail,
    pub provider_branch_payment: FeeDetail,
    pub other_branch_payment: FeeDetail,
    pub payment_service_points: FeeDetail,
    pub online_payment: FeeDetail,
    pub cdm_atm_payment: FeeDetail,
    pub phone_payment: FeeDetail,
    pub cheque_money_order_payment: FeeDetail,
    pub other_channels_payment: FeeDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherFees {
    pub other_fees_and_charges: FeeDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfo {
    pub fee_website_links: Option<String>,
}

fn fee(page: &ComparePage, attr: &str, col: Column) -> FeeDetail {
    FeeDetail::from_text(&page.cell_text(attr, col))
}

fn general_fees(page: &ComparePage, col: Column) -> GeneralFees {
    GeneralFees {
        new_vehicle_registration_fee: fee(page, "attr-NewVehicleRegister", col),
        ownership_transfer_fee_one_step: fee(page, "attr-OneStepUponFullPayment", col),
        ownership_transfer_fee_two_step: fee(page, "attr-TwoStepUponFullPayment", col),
        vehicle_inspection_fee: fee(page, "attr-VehicleInspection", col),
        service_provider_ownership_transfer_fee_one_step: fee(
            page,
            "attr-OneStepOwnerTransfer",
            col,
        ),
        service_provider_ownership_transfer_fee_two_step: fee(
            page,
            "attr-TwoStepOwnerTransfer",
            col,
        ),
        lease_transfer_fee: fee(page, "attr-HirePurchaseTransfer", col),
        contract_termination_fee: fee(page, "attr-ContractTermination", col),
        late_payment_penalty: fee(page, "attr-PenaltyChargeForLate", col),
        debt_collection_fee: fee(page, "attr-DebtCollectionFee", col),
        tax_renewal_fee: fee(page, "attr-CarTaxRenewal", col),
        license_plate_processing_fee: fee(page, "attr-RegistrationPlate", col),
        registration_address_change_fee: fee(page, "attr-ChangeAddress", col),
        document_copy_service_fee: fee(page, "attr-ContractsAndDocuments", col),
    }
}

fn payment_fees(page: &ComparePage, col: Column) -> PaymentFees {
    PaymentFees {
        direct_debit_from_provider_account: fee(page, "attr-DirectDebitFromAccountFee", col),
        direct_debit_from_other_provider_account: fee(
            page,
            "attr-DirectDebitFromAccountFeeOther",
            col,
        ),
        provider_branch_payment: fee(page, "attr-BankCounterServiceFee", col),
        other_branch_payment: fee(page, "attr-BankCounterServiceFeeOther", col),
        payment_service_points: fee(page, "attr-CounterServiceFee", col),
        online_payment: fee(page, "attr-PaymentOnlineFee", col),
        cdm_atm_payment: fee(page, "attr-PaymentCDMATMFee", col),
        phone_payment: fee(page, "attr-PaymentPhoneFee", col),
        cheque_money_order_payment: fee(page, "attr-PaymentChequeOrMoneyOrderFee", col),
        other_channels_payment: fee(page, "attr-PaymentOtherChannelFee", col),
    }
}

impl CompareProduct for HirePurchaseFee {
    const NAME: &'static str = "hire-purchase-fees";
    const CATEGORY: &'static str = "FeeApp/HirePurchaseFee";
    const OUTPUT_FILE: &'static str = "carloan_fees_details.json";
    const PRODUCT_IDS: &'static str = "33,337,246,357,331,327,223,259,258,335,301,299,193,260,\
        277,273,34,341,261,241,237,233,232,318,358,226,317,275,270,249";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        HirePurchaseFee {
            provider: page.provider(col),
            contract_effective_date: optional_text(&page.cell_text("attr-ContractDate", col)),
            general_fees: general_fees(page, col),
            payment_fees: payment_fees(page, col),
            other_fees: OtherFees {
                other_fees_and_charges: fee(page, "attr-other", col),
            },
            additional_info: AdditionalInfo {
                fee_website_links: page.cell_link("attr-Feeurl", col),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn amounts_span_every_integer() {
        assert_eq!(
            FeeDetail::from_text("- รถยนต์ 1,500 บาท - รถจักรยานยนต์ 300 บาท"),
            FeeDetail {
                text: vec!["รถยนต์ 1500 บาท".to_string(), "รถจักรยานยนต์ 300 บาท".to_string()],
                min_amount: Some(300),
                max_amount: Some(1500),
            }
        );
        let free = FeeDetail::from_text("ไม่มีค่าธรรมเนียม");
        assert_eq!(free.min_amount, None);
        assert_eq!(free.max_amount, None);
    }

    #[test]
    fn reads_hire_purchase_fees() {
        let html = compare_table(
            &[("บริษัท โตโยต้า ลีสซิ่ง", "เช่าซื้อรถยนต์")],
            &[
                ("attr-ContractDate", vec!["<span>1 มกราคม 2567</span>"]),
                ("attr-NewVehicleRegister", vec!["<span>ตามที่จ่ายจริง 2,000 บาท</span>"]),
                ("attr-PaymentOnlineFee", vec!["<span>ฟรี</span>"]),
                ("attr-Feeurl", vec![r#"<a href="https://tlt.example/fees">x</a>"#]),
            ],
            1,
        );
        let records: Vec<HirePurchaseFee> = records_from_page(&ComparePage::parse(&html), 3);
        let toyota = &records[0];
        assert_eq!(toyota.contract_effective_date.as_deref(), Some("1 มกราคม 2567"));
        assert_eq!(toyota.general_fees.new_vehicle_registration_fee.min_amount, Some(2000));
        assert_eq!(toyota.payment_fees.online_payment.text, vec!["ฟรี"]);
        assert!(toyota.other_fees.other_fees_and_charges.text.is_empty());

        let json = serde_json::to_value(toyota).unwrap();
        assert_eq!(json["contractEffectiveDate"], "1 มกราคม 2567");
        assert_eq!(json["additionalInfo"]["feeWebsiteLinks"], "https://tlt.example/fees");
        assert!(json["generalFees"]["vehicleInspectionFee"]["minAmount"].is_null());
    }
}
