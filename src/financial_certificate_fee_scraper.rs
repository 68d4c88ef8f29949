use serde::{Deserialize, Serialize};

use crate::{
    compare_page::{Column, ComparePage},
    compare_scraper::CompareProduct,
    text_manipulators::{
        clean_amount_text, first_integer, optional_text, split_clean, split_numbered_list,
    },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialCertificateFee {
    pub provider: String,
    pub financial_status: FinancialStatus,
    pub credit_certification: CreditCertification,
    pub other_fees: OtherFees,
    pub additional_information: AdditionalInformation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialStatus {
    pub financial_certification_for_visa: Certification,
    pub financial_certification_for_government: Certification,
    pub financial_certification_for_audit: Certification,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub original_text: String,
    pub value: Option<i64>,
}

impl Certification {
    fn from_text(text: &str) -> Self {
        Certification {
            original_text: text.to_string(),
            value: first_integer(text),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditCertification {
    pub conditional_credit_certification: Vec<Certification>,
    pub unconditional_credit_certification: Vec<Certification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtherFees {
    pub other_fees_details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalInformation {
    pub website_fee_link: String,
}

/// A cell of `-` bullets, each possibly holding a numbered list, as one flat
/// list of certifications.
fn certification_list(text: &str) -> Vec<Certification> {
    split_clean(&clean_amount_text(text), "-")
        .iter()
        .flat_map(|part| split_numbered_list(part))
        .map(|part| Certification::from_text(&part))
        .collect()
}

fn certification(page: &ComparePage, attr: &str, col: Column) -> Certification {
    Certification::from_text(&page.cell_text(attr, col))
}

impl CompareProduct for FinancialCertificateFee {
    const NAME: &'static str = "financial-certificate-fees";
    const CATEGORY: &'static str = "FeeApp/ConfirmationLetterIssuingServiceFee";
    const OUTPUT_FILE: &'static str = "financial_certificate_fees.json";
    const PRODUCT_IDS: &'static str = "21,49,56,27,52,41,11,62,39,58,53,20,34,30,5,54,43,38,8,64,\
        4,16,44,9,46,7,33,26,60";

    fn from_column(page: &ComparePage, col: Column) -> Self {
        FinancialCertificateFee {
            provider: page.provider(col),
            financial_status: FinancialStatus {
                financial_certification_for_visa: certification(page, "attr-VisaEmbassy", col),
                financial_certification_for_government: certification(
                    page,
                    "attr-GovernantPrivateAgencyInstitution",
                    col,
                ),
                financial_certification_for_audit: certification(page, "attr-Audit", col),
            },
            credit_certification: CreditCertification {
                conditional_credit_certification: certification_list(
                    &page.cell_text("attr-Conditional", col),
                ),
                unconditional_credit_certification: certification_list(
                    &page.cell_text("attr-Unconditional", col),
                ),
            },
            other_fees: OtherFees {
                other_fees_details: optional_text(&page.cell_text("attr-other", col)),
            },
            additional_information: AdditionalInformation {
                website_fee_link: page.cell_link("attr-Feeurl", col).unwrap_or_default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compare_page::fixtures::compare_table, compare_scraper::records_from_page};

    #[test]
    fn bullets_and_numbers_both_split_lists() {
        let list = certification_list("- 1. ฉบับละ 200 บาท 2. ภาษาอังกฤษ 300 บาท - ด่วน 1,000 บาท");
        let texts: Vec<&str> = list.iter().map(|c| c.original_text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["ฉบับละ 200 บาท", "ภาษาอังกฤษ 300 บาท", "ด่วน 1000 บาท"]
        );
        assert_eq!(list[2].value, Some(1000));
    }

    #[test]
    fn reads_status_letters_per_column() {
        let html = compare_table(
            &[("ธนาคารกรุงไทย", "หนังสือรับรอง"), ("ธนาคารออมสิน", "หนังสือรับรอง")],
            &[
                (
                    "attr-VisaEmbassy",
                    vec!["<span>ฉบับละ 100 บาท</span>", "<span>ไม่มีบริการ</span>"],
                ),
                ("attr-Audit", vec!["<span>ฉบับละ 200 บาท</span>", "<span>ฉบับละ 150 บาท</span>"]),
                ("attr-other", vec!["", "<span>ค่าส่งไปรษณีย์ 50 บาท</span>"]),
            ],
            1,
        );
        let records: Vec<FinancialCertificateFee> =
            records_from_page(&ComparePage::parse(&html), 3);
        assert_eq!(records.len(), 2);

        let ktb = &records[0];
        assert_eq!(
            ktb.financial_status.financial_certification_for_visa.value,
            Some(100)
        );
        assert!(ktb.other_fees.other_fees_details.is_none());

        let gsb = &records[1];
        assert_eq!(gsb.financial_status.financial_certification_for_visa.value, None);
        assert_eq!(
            gsb.financial_status.financial_certification_for_audit.value,
            Some(150)
        );
        assert_eq!(
            gsb.other_fees.other_fees_details.as_deref(),
            Some("ค่าส่งไปรษณีย์ 50 บาท")
        );
    }
}
