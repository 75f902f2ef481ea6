//! CNPJ（巴西公司登記號碼）檢查碼驗證
//!
//! 14 位數字，最後兩位為模 11 加權檢查碼。輸入可含遮罩標點
//! （例如 `11.222.333/0001-81`），驗證前一律先移除非數字字元。

use crate::utils::error::{IntakeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CNPJ_LENGTH: usize = 14;

const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// 移除所有非十進位數字的字元
pub fn strip_punctuation(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// 加權和取模 11；餘數小於 2 時檢查碼為 0
pub fn check_digit(digits: &[u8], weights: &[u32]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(&d, &w)| u32::from(d) * w)
        .sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        (11 - remainder) as u8
    }
}

fn normalized_digits(input: &str) -> Option<[u8; CNPJ_LENGTH]> {
    let stripped = strip_punctuation(input);
    if stripped.len() != CNPJ_LENGTH {
        return None;
    }

    let mut digits = [0u8; CNPJ_LENGTH];
    for (slot, byte) in digits.iter_mut().zip(stripped.bytes()) {
        *slot = byte - b'0';
    }
    Some(digits)
}

fn has_valid_check_digits(digits: &[u8; CNPJ_LENGTH]) -> bool {
    // 全部相同的數字序列（00000000000000、11111111111111 ...）直接拒絕
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    if digits[12] != check_digit(&digits[..12], &FIRST_WEIGHTS) {
        return false;
    }

    digits[13] == check_digit(&digits[..13], &SECOND_WEIGHTS)
}

/// Returns `true` when `input` is a structurally valid CNPJ.
///
/// Formatting characters are ignored. Malformed input never panics; it
/// simply yields `false`.
pub fn validate_cnpj(input: &str) -> bool {
    normalized_digits(input)
        .map(|digits| has_valid_check_digits(&digits))
        .unwrap_or(false)
}

/// 已通過檢查碼驗證的 CNPJ，只保存 14 位數字
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cnpj {
    digits: String,
}

impl Cnpj {
    pub fn parse(input: &str) -> Result<Self> {
        match normalized_digits(input) {
            Some(digits) if has_valid_check_digits(&digits) => Ok(Self {
                digits: strip_punctuation(input),
            }),
            _ => Err(IntakeError::InvalidCnpj {
                value: input.to_string(),
            }),
        }
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl fmt::Display for Cnpj {
    /// 標準遮罩 NN.NNN.NNN/NNNN-NN
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.digits;
        write!(
            f,
            "{}.{}.{}/{}-{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..14]
        )
    }
}

impl TryFrom<String> for Cnpj {
    type Error = IntakeError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Cnpj> for String {
    fn from(value: Cnpj) -> Self {
        value.digits
    }
}

impl std::str::FromStr for Cnpj {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_digit_remainder_rule() {
        // 1*2 = 2 → 餘數 2 → 11 - 2 = 9
        assert_eq!(check_digit(&[1], &[2]), 9);
        // 餘數 0 與 1 都對應到 0
        assert_eq!(check_digit(&[0], &[2]), 0);
        assert_eq!(check_digit(&[6], &[2]), 0);
    }

    #[test]
    fn test_known_identifier_digits() {
        let digits = normalized_digits("11.222.333/0001-81").unwrap();
        assert_eq!(check_digit(&digits[..12], &FIRST_WEIGHTS), 8);
        assert_eq!(check_digit(&digits[..13], &SECOND_WEIGHTS), 1);
    }

    #[test]
    fn test_non_ascii_digits_are_stripped() {
        // 全形數字不是十進位 ASCII 數字
        assert_eq!(strip_punctuation("１１.222"), "222");
        assert!(!validate_cnpj("１１.222.333/0001-81"));
    }

    #[test]
    fn test_parse_and_display() {
        let cnpj = Cnpj::parse("11222333000181").unwrap();
        assert_eq!(cnpj.digits(), "11222333000181");
        assert_eq!(cnpj.to_string(), "11.222.333/0001-81");

        let masked: Cnpj = "11.222.333/0001-81".parse().unwrap();
        assert_eq!(masked, cnpj);
    }

    #[test]
    fn test_parse_rejects_invalid() {
        assert!(matches!(
            Cnpj::parse("11.222.333/0001-82"),
            Err(IntakeError::InvalidCnpj { .. })
        ));
    }

    #[test]
    fn test_serde_goes_through_validation() {
        let cnpj: Cnpj = serde_json::from_str("\"11.222.333/0001-81\"").unwrap();
        assert_eq!(serde_json::to_string(&cnpj).unwrap(), "\"11222333000181\"");
        assert!(serde_json::from_str::<Cnpj>("\"00000000000000\"").is_err());
    }
}
