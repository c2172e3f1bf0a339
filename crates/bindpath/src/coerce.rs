//! Declared value coercions applied to resolved scalars.
use crate::ast::BindingPath;
use crate::error::BindingError;
use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use titlepress_record::Scalar;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberFormat {
    #[serde(default)]
    pub decimals: Option<usize>,
    #[serde(default)]
    pub grouping: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateFormat {
    pub input: String,
    pub output: String,
}

/// How a resolved scalar is turned into the text placed on the page.
///
/// In JSON a coercion is either a bare name (`"upper"`) or a single-key
/// object (`{ "number": { "decimals": 2, "grouping": true } }`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coercion {
    #[default]
    Text,
    Upper,
    Number(NumberFormat),
    Date(DateFormat),
}

fn has_invalid_items(format: &str) -> bool {
    StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

impl Coercion {
    /// Checks format strings ahead of any record being bound.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Coercion::Date(fmt) => {
                if has_invalid_items(&fmt.input) {
                    return Err(format!("invalid date input format '{}'", fmt.input));
                }
                if has_invalid_items(&fmt.output) {
                    return Err(format!("invalid date output format '{}'", fmt.output));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub fn apply(&self, value: &Scalar, path: &BindingPath) -> Result<String, BindingError> {
        let mismatch = |expected: &str| BindingError::TypeMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            found: format!("'{}'", value.as_text()),
        };
        match self {
            Coercion::Text => Ok(value.as_text()),
            Coercion::Upper => Ok(value.as_text().to_uppercase()),
            Coercion::Number(fmt) => {
                let number = match value {
                    Scalar::Number(n) => n.as_f64(),
                    Scalar::Text(s) => s.trim().replace(',', "").parse::<f64>().ok(),
                    _ => None,
                };
                number
                    .map(|n| format_number(n, fmt))
                    .ok_or_else(|| mismatch("number"))
            }
            Coercion::Date(fmt) => {
                let text = value.as_text();
                let text = text.trim();
                let mut out = String::new();
                let written = if let Ok(dt) = NaiveDateTime::parse_from_str(text, &fmt.input) {
                    write!(&mut out, "{}", dt.format(&fmt.output))
                } else if let Ok(d) = NaiveDate::parse_from_str(text, &fmt.input) {
                    write!(&mut out, "{}", d.format(&fmt.output))
                } else {
                    return Err(mismatch(&format!("date '{}'", fmt.input)));
                };
                written.map_err(|_| mismatch(&format!("date formattable as '{}'", fmt.output)))?;
                Ok(out)
            }
        }
    }
}

fn format_number(value: f64, fmt: &NumberFormat) -> String {
    let raw = match fmt.decimals {
        Some(d) => format!("{:.*}", d, value),
        None if value.fract() == 0.0 && value.abs() < 1e15 => format!("{}", value as i64),
        None => value.to_string(),
    };
    if !fmt.grouping {
        return raw;
    }
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int, frac) = match digits.find('.') {
        Some(i) => digits.split_at(i),
        None => (digits, ""),
    };
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}{}", sign, grouped, frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_path;

    fn path() -> BindingPath {
        parse_path("/v").unwrap()
    }

    #[test]
    fn test_number_grouping_and_decimals() {
        let c = Coercion::Number(NumberFormat {
            decimals: Some(2),
            grouping: true,
        });
        let v = Scalar::Number(serde_json::Number::from_f64(1234567.5).unwrap());
        assert_eq!(c.apply(&v, &path()).unwrap(), "1,234,567.50");
        let v = Scalar::Text("-1000".into());
        assert_eq!(c.apply(&v, &path()).unwrap(), "-1,000.00");
    }

    #[test]
    fn test_number_rejects_text() {
        let c = Coercion::Number(NumberFormat::default());
        let err = c.apply(&Scalar::Text("n/a".into()), &path()).unwrap_err();
        assert!(matches!(err, BindingError::TypeMismatch { .. }));
    }

    #[test]
    fn test_date_reformat() {
        let c = Coercion::Date(DateFormat {
            input: "%Y-%m-%d".into(),
            output: "%B %-d, %Y".into(),
        });
        let out = c.apply(&Scalar::Text("2024-03-05".into()), &path()).unwrap();
        assert_eq!(out, "March 5, 2024");
    }

    #[test]
    fn test_upper() {
        let out = Coercion::Upper.apply(&Scalar::Text("Fee simple".into()), &path()).unwrap();
        assert_eq!(out, "FEE SIMPLE");
    }

    #[test]
    fn test_deserialize_forms() {
        let c: Coercion = serde_json::from_str(r#""upper""#).unwrap();
        assert_eq!(c, Coercion::Upper);
        let c: Coercion = serde_json::from_str(r#"{"number":{"decimals":0}}"#).unwrap();
        assert_eq!(
            c,
            Coercion::Number(NumberFormat {
                decimals: Some(0),
                grouping: false
            })
        );
    }

    #[test]
    fn test_validate_rejects_bad_format() {
        let c = Coercion::Date(DateFormat {
            input: "%Y-%!".into(),
            output: "%Y".into(),
        });
        assert!(c.validate().is_err());
    }
}
