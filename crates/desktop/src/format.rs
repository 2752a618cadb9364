//! Localized currency text.

use serde::{Deserialize, Serialize};

use invoicer_core::Money;

/// Where the currency symbol goes relative to the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    /// `$15.00`
    Prefix,
    /// `15,00 €` (separated by a no-break space)
    Suffix,
}

/// Currency formatting rules for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub position: SymbolPosition,
    pub decimal_separator: char,
    pub group_separator: Option<char>,
    pub fraction_digits: u32,
}

const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';

impl CurrencyFormat {
    pub fn en_us() -> Self {
        Self {
            symbol: "$".to_string(),
            position: SymbolPosition::Prefix,
            decimal_separator: '.',
            group_separator: Some(','),
            fraction_digits: 2,
        }
    }

    pub fn en_gb() -> Self {
        Self {
            symbol: "£".to_string(),
            ..Self::en_us()
        }
    }

    pub fn fr_fr() -> Self {
        Self {
            symbol: "€".to_string(),
            position: SymbolPosition::Suffix,
            decimal_separator: ',',
            group_separator: Some(NARROW_NBSP),
            fraction_digits: 2,
        }
    }

    pub fn de_de() -> Self {
        Self {
            group_separator: Some('.'),
            ..Self::fr_fr()
        }
    }

    /// Preset for a BCP 47 tag such as `en-US` (`_` is accepted too).
    pub fn for_locale(tag: &str) -> Option<Self> {
        match tag.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "en-us" | "en" => Some(Self::en_us()),
            "en-gb" => Some(Self::en_gb()),
            "fr-fr" | "fr" => Some(Self::fr_fr()),
            "de-de" | "de" => Some(Self::de_de()),
            _ => None,
        }
    }

    /// Format `amount`, rounding half away from zero to `fraction_digits`.
    pub fn format(&self, amount: Money) -> String {
        let rounded = amount.round_dp(self.fraction_digits);
        let negative = rounded.is_negative();

        let mut magnitude = rounded.amount().abs();
        magnitude.rescale(self.fraction_digits);
        let digits = magnitude.to_string();
        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (digits.as_str(), None),
        };

        let mut number = match self.group_separator {
            Some(sep) => group_thousands(int_part, sep),
            None => int_part.to_string(),
        };
        if let Some(frac) = frac_part {
            number.push(self.decimal_separator);
            number.push_str(frac);
        }

        let sign = if negative { "-" } else { "" };
        match self.position {
            SymbolPosition::Prefix => format!("{sign}{}{number}", self.symbol),
            SymbolPosition::Suffix => format!("{sign}{number}{NBSP}{}", self.symbol),
        }
    }
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self::en_us()
    }
}

fn group_thousands(int_part: &str, sep: char) -> String {
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}
