//! Numeric sequence extraction for ENTER and TAKE PROFIT values

use crate::error::TranspileError;

/// Separator classes allowed between numbers in a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Comma,
    Dash,
    And,
}

impl Separator {
    fn as_str(&self) -> &'static str {
        match self {
            Separator::Comma => ",",
            Separator::Dash => "-",
            Separator::And => "AND",
        }
    }
}

/// Split an upper-cased value list into floats.
///
/// Exactly one separator class may appear. Any token failing to parse aborts
/// the whole sequence, and so does a sequence holding no number at all.
pub fn extract_float_sequence(content: &str) -> Result<Vec<f64>, TranspileError> {
    let has_dash = content.contains('-');
    let has_and = content.contains("AND");
    let cleaned = if has_dash || has_and {
        strip_thousands_separators(content)
    } else {
        content.to_string()
    };
    let has_comma = cleaned.contains(',');

    let present: Vec<Separator> = [
        (has_comma, Separator::Comma),
        (has_dash, Separator::Dash),
        (has_and, Separator::And),
    ]
    .into_iter()
    .filter_map(|(present, separator)| present.then_some(separator))
    .collect();

    if present.len() > 1 {
        return Err(TranspileError::MixedSeparators {
            content: content.trim().to_string(),
        });
    }

    let chunks: Vec<&str> = match present.first() {
        Some(separator) => cleaned.split(separator.as_str()).collect(),
        None => vec![cleaned.as_str()],
    };

    let mut values = Vec::new();
    for chunk in chunks {
        for token in chunk.split_whitespace() {
            let value = token
                .parse::<f64>()
                .map_err(|_| TranspileError::MalformedFloat {
                    content: content.trim().to_string(),
                })?;
            values.push(value);
        }
    }
    if values.is_empty() {
        return Err(TranspileError::MalformedFloat {
            content: content.trim().to_string(),
        });
    }
    Ok(values)
}

/// Parse a single value, dropping every comma
pub fn parse_single_float(content: &str) -> Result<f64, TranspileError> {
    let cleaned = content.trim().replace(',', "");
    cleaned
        .parse::<f64>()
        .map_err(|_| TranspileError::MalformedFloat {
            content: content.trim().to_string(),
        })
}

/// Remove commas sitting between a digit and a group of exactly three digits
fn strip_thousands_separators(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    let mut result = String::with_capacity(content.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ',' && is_thousands_separator(&chars, i) {
            continue;
        }
        result.push(c);
    }
    result
}

fn is_thousands_separator(chars: &[char], i: usize) -> bool {
    let digit_before = i > 0 && chars[i - 1].is_ascii_digit();
    let group_after = chars.len() >= i + 4 && chars[i + 1..i + 4].iter().all(|c| c.is_ascii_digit());
    let group_ends = chars.get(i + 4).map_or(true, |c| !c.is_ascii_digit());
    digit_before && group_after && group_ends
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_sequence() {
        assert_eq!(extract_float_sequence("1.2, 1.4").unwrap(), vec![1.2, 1.4]);
    }

    #[test]
    fn test_dash_and_word_separators() {
        assert_eq!(extract_float_sequence("0.1 - 0.5").unwrap(), vec![0.1, 0.5]);
        assert_eq!(extract_float_sequence("10 AND 12").unwrap(), vec![10.0, 12.0]);
    }

    #[test]
    fn test_whitespace_only_sequence() {
        assert_eq!(extract_float_sequence("3 4 5").unwrap(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_mixed_separators_rejected() {
        let err = extract_float_sequence("1, 2-3").unwrap_err();
        assert!(matches!(err, TranspileError::MixedSeparators { .. }));
        assert!(extract_float_sequence("1, 2 AND 3").is_err());
        assert!(extract_float_sequence("1 - 2 AND 3").is_err());
    }

    #[test]
    fn test_thousands_separators_with_dash() {
        assert_eq!(
            extract_float_sequence("1,200 - 1,350.5").unwrap(),
            vec![1200.0, 1350.5]
        );
        assert_eq!(
            extract_float_sequence("29,000 AND 31,000").unwrap(),
            vec![29000.0, 31000.0]
        );
    }

    #[test]
    fn test_commas_split_when_only_class() {
        assert_eq!(
            extract_float_sequence("100,200,300").unwrap(),
            vec![100.0, 200.0, 300.0]
        );
    }

    #[test]
    fn test_malformed_float() {
        let err = extract_float_sequence("1.2.3, 4").unwrap_err();
        assert_eq!(err.to_string(), "malformed float with content 1.2.3, 4");
    }

    #[test]
    fn test_single_float_strips_commas() {
        assert_eq!(parse_single_float("1,250.5").unwrap(), 1250.5);
        assert!(parse_single_float("1..2").is_err());
    }

    #[test]
    fn test_separators_without_numbers() {
        assert_eq!(
            extract_float_sequence(", ,"),
            Err(TranspileError::MalformedFloat {
                content: ", ,".to_string()
            })
        );
    }
}
