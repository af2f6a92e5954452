//! VIN validation and vehicle record normalization.
//!
//! A Vehicle Identification Number is 17 characters drawn from the digits
//! and the upper-case Latin letters minus `I`, `O`, and `Q`. Position 9
//! (index 8) is a check character computed from the other sixteen.
//!
//! # Check Character Algorithm
//!
//! 1. Map each character to a value: digits to themselves, letters through
//!    the fixed transliteration table (`A=1 … H=8, J=1 … N=5, P=7, R=9,
//!    S=2 … Z=9`).
//! 2. Multiply each value by its positional weight
//!    (`8 7 6 5 4 3 2 10 0 9 8 7 6 5 4 3 2`).
//! 3. Sum the products and take the remainder modulo 11.
//! 4. A remainder of 10 is written `X`; anything else is its decimal digit.
//!
//! ```rust
//! use dreamcar_core::vin::{check_character, is_valid_vin};
//!
//! assert!(is_valid_vin("1HGCM82633A004352"));
//! assert_eq!(check_character("1HGCM82633A004352"), Some('3'));
//! assert!(!is_valid_vin("1HGCM82643A004352"));
//! ```
//!
//! The same module owns the pure half of remote decoding: the lookup
//! service's `{Variable, Value}` rows are mapped into a [`VehicleRecord`]
//! by [`VehicleRecord::from_results`]. The HTTP transport lives in the
//! application crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Required VIN length.
pub const VIN_LENGTH: usize = 17;

/// Index of the check character.
pub const CHECK_INDEX: usize = 8;

const WEIGHTS: [u32; VIN_LENGTH] = [8, 7, 6, 5, 4, 3, 2, 10, 0, 9, 8, 7, 6, 5, 4, 3, 2];

/// Sentinel the lookup service uses for fields that do not apply.
const NOT_APPLICABLE: &str = "Not Applicable";

/// Why a candidate VIN was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VinError {
    #[error("VIN must be exactly 17 characters (got {0})")]
    WrongLength(usize),
    #[error("VIN may not contain the letter '{0}'")]
    ForbiddenCharacter(char),
    #[error("VIN contains invalid character '{0}'")]
    InvalidCharacter(char),
    #[error("VIN check character is '{found}', expected '{expected}'")]
    ChecksumMismatch { expected: char, found: char },
}

/// Returns `true` if `code` is a well-formed VIN with a correct check character.
pub fn is_valid_vin(code: &str) -> bool {
    validate_vin(code).is_ok()
}

/// Validate a VIN, reporting the first rule it breaks.
///
/// Checks run in order: length, forbidden letters (`I`, `O`, `Q`), the
/// allowed alphabet, then the check character. Matching is
/// case-sensitive; callers normalize user input with
/// `trim().to_uppercase()` first.
pub fn validate_vin(code: &str) -> Result<(), VinError> {
    let len = code.chars().count();
    if len != VIN_LENGTH {
        return Err(VinError::WrongLength(len));
    }

    if let Some(c) = code.chars().find(|c| matches!(c, 'I' | 'O' | 'Q')) {
        return Err(VinError::ForbiddenCharacter(c));
    }

    if let Some(c) = code.chars().find(|c| transliterate(*c).is_none()) {
        return Err(VinError::InvalidCharacter(c));
    }

    let expected = check_character(code).ok_or(VinError::WrongLength(len))?;
    let found = code.as_bytes()[CHECK_INDEX] as char;
    if found != expected {
        return Err(VinError::ChecksumMismatch { expected, found });
    }

    Ok(())
}

/// Returns `true` if the character at index 8 matches the computed check character.
///
/// Returns `false` for inputs that are not 17 characters of the VIN
/// alphabet, since no check character can be computed for them.
pub fn validate_checksum(code: &str) -> bool {
    match check_character(code) {
        Some(expected) => code.as_bytes()[CHECK_INDEX] as char == expected,
        None => false,
    }
}

/// Compute the check character for a 17-character VIN.
///
/// The character currently at index 8 carries weight 0, so it does not
/// influence the result. Returns `None` if the input is the wrong length
/// or contains characters outside the VIN alphabet.
pub fn check_character(code: &str) -> Option<char> {
    if code.len() != VIN_LENGTH {
        return None;
    }

    let mut sum = 0u32;
    for (c, weight) in code.chars().zip(WEIGHTS) {
        sum += transliterate(c)? * weight;
    }

    match sum % 11 {
        10 => Some('X'),
        r => char::from_digit(r, 10),
    }
}

/// Numeric value of a VIN character, or `None` outside the alphabet.
fn transliterate(c: char) -> Option<u32> {
    let value = match c {
        '0'..='9' => return c.to_digit(10),
        'A' | 'J' => 1,
        'B' | 'K' | 'S' => 2,
        'C' | 'L' | 'T' => 3,
        'D' | 'M' | 'U' => 4,
        'E' | 'N' | 'V' => 5,
        'F' | 'W' => 6,
        'G' | 'P' | 'X' => 7,
        'H' | 'Y' => 8,
        'R' | 'Z' => 9,
        _ => return None,
    };
    Some(value)
}

// ============ Remote decode mapping ============

/// Body returned by the vehicle lookup service.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResponse {
    #[serde(rename = "Results", default)]
    pub results: Vec<LookupResult>,
    /// Free-form status text; an error condition is signalled when it mentions `error`.
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
}

impl LookupResponse {
    /// Whether the service reported an application-level failure.
    pub fn reports_error(&self) -> bool {
        self.message
            .as_deref()
            .map(|m| m.contains("error"))
            .unwrap_or(false)
    }
}

/// One `{Variable, Value}` row from the lookup service.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResult {
    #[serde(rename = "Variable")]
    pub variable: String,
    #[serde(rename = "Value", default)]
    pub value: Option<String>,
}

/// Normalized vehicle attributes decoded from a VIN lookup.
///
/// Every field is optional: the source may not know it, or may report it
/// as not applicable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cylinders: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub displacement: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_config: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horsepower_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horsepower_to: Option<String>,
}

impl VehicleRecord {
    /// Map lookup rows into a record.
    ///
    /// Rows whose variable is not in the field table, or whose value is
    /// missing, empty, or `"Not Applicable"`, are skipped. When a variable
    /// appears more than once the last usable value wins.
    pub fn from_results(results: &[LookupResult]) -> Self {
        let mut record = VehicleRecord::default();

        for row in results {
            let value = match row.value.as_deref() {
                Some(v) if !v.is_empty() && v != NOT_APPLICABLE => v,
                _ => continue,
            };
            if let Some(slot) = record.slot_for(&row.variable) {
                *slot = Some(value.to_string());
            }
        }

        record
    }

    fn slot_for(&mut self, variable: &str) -> Option<&mut Option<String>> {
        let slot = match variable {
            "Make" => &mut self.make,
            "Model" => &mut self.model,
            "Model Year" => &mut self.year,
            "Vehicle Type" => &mut self.vehicle_type,
            "Body Class" => &mut self.body_style,
            "Engine Number of Cylinders" => &mut self.cylinders,
            "Displacement (L)" => &mut self.displacement,
            "Fuel Type - Primary" => &mut self.fuel_type,
            "Drive Type" => &mut self.drive_type,
            "Transmission Style" => &mut self.transmission,
            "Plant City" => &mut self.plant_city,
            "Plant Country" => &mut self.plant_country,
            "Series" => &mut self.series,
            "Trim" => &mut self.trim,
            "Engine Configuration" => &mut self.engine_config,
            "Engine HP (From)" => &mut self.horsepower_from,
            "Engine HP (To)" => &mut self.horsepower_to,
            _ => return None,
        };
        Some(slot)
    }

    /// Human-readable name: `"<year> <make> <model> <trim>"`.
    ///
    /// Falls back to `"Vehicle Information"` when none of those fields are known.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [&self.year, &self.make, &self.model, &self.trim]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .collect();

        if parts.is_empty() {
            "Vehicle Information".to_string()
        } else {
            parts.join(" ")
        }
    }

    /// Labelled detail rows for display, skipping unknown fields.
    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        let fields: [(&'static str, &Option<String>, &str); 7] = [
            ("Body Style", &self.body_style, ""),
            ("Vehicle Type", &self.vehicle_type, ""),
            ("Cylinders", &self.cylinders, ""),
            ("Engine Size", &self.displacement, "L"),
            ("Fuel Type", &self.fuel_type, ""),
            ("Drive Type", &self.drive_type, ""),
            ("Transmission", &self.transmission, ""),
        ];

        fields
            .into_iter()
            .filter_map(|(label, value, suffix)| {
                value.as_ref().map(|v| (label, format!("{}{}", v, suffix)))
            })
            .collect()
    }
}
