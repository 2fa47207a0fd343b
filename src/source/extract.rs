//! Price extraction from rendered HTML

use super::FetchError;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use std::str::FromStr;

/// Locates the price element and parses its text
#[derive(Debug, Clone)]
pub struct PriceExtractor {
    selector: Selector,
    pattern: String,
}

impl PriceExtractor {
    /// Compile a CSS selector
    pub fn new(pattern: &str) -> anyhow::Result<Self> {
        let selector = Selector::parse(pattern)
            .map_err(|e| anyhow::anyhow!("Invalid price selector {:?}: {}", pattern, e))?;
        Ok(Self {
            selector,
            pattern: pattern.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Extract the price from a rendered document
    ///
    /// The first element in document order wins; product pages commonly repeat
    /// the price markup further down (related items, bundles).
    pub fn extract(&self, html: &str) -> Result<Decimal, FetchError> {
        let document = Html::parse_document(html);
        let mut matches = document.select(&self.selector);

        let element = matches.next().ok_or_else(|| FetchError::ElementNotFound {
            selector: self.pattern.clone(),
        })?;
        let text: String = element.text().collect();

        tracing::debug!(
            text = %truncate(&text, 200),
            extra_matches = matches.count(),
            "Located price element"
        );

        parse_price(&text)
    }
}

/// Parse price text such as `¥1,980`, `￥１，９８０` or `$1,234.56`
///
/// Full-width digits are folded to ASCII. A currency marker may lead or
/// trail the amount and commas must group the integer part in thousands.
/// Anything else (ranges, unit prices, signs, annotations) is rejected.
pub fn parse_price(text: &str) -> Result<Decimal, FetchError> {
    let unparseable = || FetchError::Unparseable {
        text: text.trim().to_string(),
    };

    let folded: String = text.chars().map(fold_full_width).collect();
    let amount = folded
        .trim_matches(|c: char| c.is_whitespace() || is_currency_marker(c))
        .trim();

    let digits = strip_thousands_separators(amount).ok_or_else(unparseable)?;
    let price = Decimal::from_str(&digits).map_err(|_| unparseable())?;
    if price <= Decimal::ZERO {
        return Err(unparseable());
    }

    Ok(price)
}

fn fold_full_width(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
        '．' => '.',
        '，' => ',',
        _ => c,
    }
}

/// Currency symbols and ISO code letters (`USD`, `JPY`)
fn is_currency_marker(c: char) -> bool {
    matches!(c, '¥' | '￥' | '円' | '$' | '＄' | '€' | '£' | '￡' | '₩' | '￦' | '₹')
        || c.is_ascii_uppercase()
}

/// `1,234,567.89` -> `1234567.89`; `None` unless the text is a plain
/// unsigned amount with well-formed grouping
fn strip_thousands_separators(amount: &str) -> Option<String> {
    let (int_part, frac_part) = match amount.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (amount, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    let mut groups = int_part.split(',');
    let lead = groups.next()?;
    if !all_digits(lead) {
        return None;
    }
    let mut digits = lead.to_string();
    let mut grouped = false;
    for group in groups {
        if group.len() != 3 || !all_digits(group) {
            return None;
        }
        digits.push_str(group);
        grouped = true;
    }
    if grouped && lead.len() > 3 {
        return None;
    }

    if let Some(frac_part) = frac_part {
        if !all_digits(frac_part) {
            return None;
        }
        digits.push('.');
        digits.push_str(frac_part);
    }

    Some(digits)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
