//! Numeric readings of a fee cell, shared by the product scrapers.

use serde::{Deserialize, Serialize};

use crate::text_manipulators::{
    all_numbers, condition_after_marker, first_integer, first_number, mentions_condition,
    min_max_fee, percentage,
};

/// A fee cell read as a range, a percentage, or both absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeDetail {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl FeeDetail {
    pub fn from_text(text: &str, unit: Option<&str>) -> Self {
        let (min_fee, max_fee, percentage_fee) = if text.contains('%') {
            (None, None, percentage(text))
        } else {
            let (min, max) = min_max_fee(text);
            (min, max, None)
        };

        FeeDetail {
            text: text.to_string(),
            min_fee,
            max_fee,
            percentage_fee,
            fee_unit: unit.map(str::to_string),
            condition: condition_after_marker(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeAmount {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
}

impl FeeAmount {
    pub fn amount(text: &str) -> Self {
        FeeAmount {
            text: text.to_string(),
            amount: first_integer(text),
            percentage: None,
        }
    }

    pub fn percentage(text: &str) -> Self {
        FeeAmount {
            text: text.to_string(),
            amount: None,
            percentage: first_number(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeItem {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    pub amounts: Vec<f64>,
}

impl FeeItem {
    pub fn from_text(text: &str) -> Self {
        let amounts = all_numbers(text);
        FeeItem {
            text: text.to_string(),
            numeric_value: amounts.first().copied(),
            condition: mentions_condition(text).then(|| text.to_string()),
            amounts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_detail_reads_percentages_only_when_present() {
        let fee = FeeDetail::from_text("1% ของจำนวนเงิน", Some("บาท/ฉบับ"));
        assert_eq!(fee.percentage_fee, Some(1.0));
        assert_eq!(fee.min_fee, None);
        assert_eq!(fee.fee_unit.as_deref(), Some("บาท/ฉบับ"));

        let fee = FeeDetail::from_text("10 - 30 บาท เงื่อนไข: ต่างเขต", None);
        assert_eq!(fee.min_fee, Some(10.0));
        assert_eq!(fee.max_fee, Some(30.0));
        assert_eq!(fee.percentage_fee, None);
        assert_eq!(fee.condition.as_deref(), Some("ต่างเขต"));
    }

    #[test]
    fn fee_detail_skips_missing_numbers_in_json() {
        let json = serde_json::to_value(FeeDetail::from_text("ฟรี", None)).unwrap();
        assert_eq!(json, serde_json::json!({ "text": "ฟรี" }));
    }

    #[test]
    fn fee_amount_variants() {
        assert_eq!(FeeAmount::amount("1,500 บาท").amount, Some(1500));
        assert_eq!(FeeAmount::percentage("2.5% ของยอด").percentage, Some(2.5));
        assert_eq!(FeeAmount::amount("ไม่มี").amount, None);
    }

    #[test]
    fn fee_item_collects_every_amount() {
        let item = FeeItem::from_text("ขนาด 5x10 นิ้ว 1500 บาท/ปี เงื่อนไข ชำระล่วงหน้า");
        assert_eq!(item.amounts, vec![5.0, 10.0, 1500.0]);
        assert_eq!(item.numeric_value, Some(5.0));
        assert!(item.condition.is_some());
    }
}
