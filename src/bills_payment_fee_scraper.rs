use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillsPaymentFee {
    pub provider: String,
    pub fees: BillFees,
    pub additional_info: AdditionalInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BillFees {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub electricity_bill: Vec<BillFee>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub water_bill: Vec<BillFee>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub phone_or_internet_bill: Vec<BillFee>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub insurance_bill: Vec<BillFee>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub vehicle_registration_bill: Vec<BillFee>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub motorcycle_registration_bill: Vec<BillFee>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tax_bill: Vec<BillFee>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub other_utilities_bill: Vec<BillFee>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub product_or_service_bill: Vec<BillFee>,
}

/// `description` is the bill type as the table names it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillFee {
    pub description: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInfo {
    pub fee_url: String,
}

fn bill_fees(page: &ComparePage, bill_type: &str, col: Column) -> Vec<BillFee> {
    let details = page.cell_lines(&format!("attr-{bill_type}"), col);
    if details.is_empty() {
        return vec![];
    }
    vec![BillFee {
        description: bill_type.to_string(),
        details,
    }]
}

impl CompareProduct for BillsPaymentFee {
    const NAME: &'static str = "bills-payment-fees";
    const CATEGORY: &'static str = "FeeApp/BillPaymentFee";
    const OUTPUT_FILE: &'static str = "bills_payment_fee.json";
    const PRODUCT_IDS: &'static str = "2-0785800001,2-0785800005,5-0785800005,17-0785800004,\
        17-0785800005,157479-0785800005,26-0785800004,26-0785800005,26-0785800008,\
        150920-0785800001,194031-0785800001,9-0785800003,9-0785800004,9-0785800005,9-0785800007,\
        162152-0785800001,162152-0785800002,5-0785800002,5-0785800003,5-0785800004,\
        241-0785800001,2-0785800004,15-0785800001,13518965-0785800003,163579-0785800003,\
        9-0785800002,237-0785800005,15-0785800005,163579-0785800007,13518965-0785800007,\
        157479-0785800004,471989-0785800005,162568-0785800001,2-0785800002,10651-0785800002,\
        10651-0785800005,471989-0785800002,163579-0785800002,13518965-0785800002,6-0785800002,\
        6-0785800003,6-0785800004,6-0785800005,13519357-0785800002,13519357-0785800003,\
        237-0785800002,237-0785800004,241-0785800002,162568-0785800002,4-0785800004,\
        4-0785800005,15-0785800002,157479-0785800002,13519357-0785800005,4-0785800002,\
        17-0785800002,17-0785800003,17-0785800001,13518965-0785800005,163579-0785800005,\
        5-0785800008,237-0785800001,2-0785800003,5-0785800006,5-0785800007,4-0785800003,\
        1036847-0785800005,422974-0785800007,15-0785800004,15-0785800007,870537-0785800005,\
        163579-0785800001,13518965-0785800001,150920-0785800002,150920-0785800003,\
        150920-0785800005,194031-0785800002,517619-0785800003,162152-0785800004,\
        162152-0785800005,37-0785800007,892849-0785800005,16-0785800001,16-0785800002,\
        16-0785800003,16-0785800004,16-0785800005,162568-0785800004,162568-0785800005,\
        237-0785800003,163222-0785800004,163222-0785800005,390797-0785800002,390797-0785800004,\
        33-0785800007";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        let fees = BillFees {
            electricity_bill: bill_fees(page, "ElectricityBill", col),
            water_bill: bill_fees(page, "WaterBill", col),
            phone_or_internet_bill: bill_fees(page, "PhoneOrInternetBill", col),
            insurance_bill: bill_fees(page, "InsuranceBill", col),
            vehicle_registration_bill: bill_fees(page, "VehicleRegistrationBill", col),
            motorcycle_registration_bill: bill_fees(page, "MotorcycleRegistrationBill", col),
            tax_bill: bill_fees(page, "TaxBill", col),
            other_utilities_bill: bill_fees(page, "OtherUtilitiesBill", col),
            product_or_service_bill: bill_fees(page, "ProductOrServiceBill", col),
        };

        BillsPaymentFee {
            provider: page.provider(col),
            fees,
            additional_info: AdditionalInfo {
                fee_url: page.cell_link("attr-Feeurl", col).unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn keeps_each_line_of_a_bill_cell() {
        let html = compare_table(
            &[("ธนาคารออมสิน", "ชำระค่าสาธารณูปโภค")],
            &[
                (
                    "attr-header attr-ElectricityBill",
                    vec!["<span>สาขา 10 บาท</span><br><span>ATM 5 บาท</span>"],
                ),
                ("attr-header attr-WaterBill", vec!["<span>ฟรี</span>"]),
                (
                    "attr-header attr-Feeurl",
                    vec![r#"<a class="prod-url" href="https://gsb.example/bill">x</a>"#],
                ),
            ],
            1,
        );
        let records: Vec<BillsPaymentFee> = records_from_page(&ComparePage::parse(&html), 3);
        let gsb = &records[0];
        assert_eq!(gsb.provider, "ธนาคารออมสิน");
        assert_eq!(
            gsb.fees.electricity_bill,
            vec![BillFee {
                description: "ElectricityBill".to_string(),
                details: vec!["สาขา 10 บาท".to_string(), "ATM 5 บาท".to_string()],
            }]
        );
        assert_eq!(gsb.fees.water_bill[0].details, vec!["ฟรี"]);
        assert_eq!(gsb.additional_info.fee_url, "https://gsb.example/bill");

        let json = serde_json::to_value(gsb).unwrap();
        assert!(json["fees"].get("tax_bill").is_none());
        assert!(json["fees"].get("electricity_bill").is_some());
    }
}
