//! Article/clause number handling: sort keys, roman numerals, and the slug
//! form of a number.

/// Roman numerals I…XX, the range clause enumerations actually use.
const ROMAN_TABLE: [(&str, u32); 20] = [
    ("I", 1),
    ("II", 2),
    ("III", 3),
    ("IV", 4),
    ("V", 5),
    ("VI", 6),
    ("VII", 7),
    ("VIII", 8),
    ("IX", 9),
    ("X", 10),
    ("XI", 11),
    ("XII", 12),
    ("XIII", 13),
    ("XIV", 14),
    ("XV", 15),
    ("XVI", 16),
    ("XVII", 17),
    ("XVIII", 18),
    ("XIX", 19),
    ("XX", 20),
];

/// Convert an uppercase roman numeral to arabic.
///
/// Table lookup for I…XX; longer numerals fall back to subtractive
/// accumulation. Returns `None` on any non-roman character.
pub fn roman_to_arabic(roman: &str) -> Option<u32> {
    let roman = roman.trim();
    if roman.is_empty() {
        return None;
    }
    if let Some((_, v)) = ROMAN_TABLE.iter().find(|(r, _)| *r == roman) {
        return Some(*v);
    }

    let digit = |c: char| -> Option<u32> {
        match c {
            'I' => Some(1),
            'V' => Some(5),
            'X' => Some(10),
            'L' => Some(50),
            'C' => Some(100),
            'D' => Some(500),
            'M' => Some(1000),
            _ => None,
        }
    };

    let values: Option<Vec<u32>> = roman.chars().map(digit).collect();
    let values = values?;
    let mut total: i64 = 0;
    for (i, v) in values.iter().enumerate() {
        if values[i + 1..].iter().any(|n| n > v) {
            total -= i64::from(*v);
        } else {
            total += i64::from(*v);
        }
    }
    u32::try_from(total).ok().filter(|n| *n > 0)
}

/// `true` when the string is a plausible roman numeral.
pub fn is_roman(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| matches!(c, 'I' | 'V' | 'X' | 'L' | 'C' | 'D' | 'M'))
}

/// Split a canonical number into its sort key `(numeric_prefix, suffix)`.
///
/// Internal dots are thousands separators (`"1.029"` → 1029). Malformed
/// numbers fall back to `(0, original)` so sorting never fails.
pub fn sort_key(number: &str) -> (i64, String) {
    let trimmed = number.trim();
    let digits: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .filter(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<i64>() {
        Ok(n) => {
            let rest: String = trimmed
                .chars()
                .skip_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            let suffix = rest.trim_matches(['-', ' ']).to_ascii_uppercase();
            (n, suffix)
        }
        Err(_) => (0, trimmed.to_string()),
    }
}

/// Lowercase, separator-free form of a number, used in slugs and URN
/// fragment tokens: `"121-A"` → `"121a"`, `"1.029"` → `"1029"`.
pub fn slug_number(number: &str) -> String {
    number
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Arabic slug form of a roman clause number: `"IV"` → `"4"`,
/// `"X-A"` → `"10a"`. Non-roman input falls back to [`slug_number`].
pub fn clause_arabic(number: &str) -> String {
    let (roman, suffix) = match number.split_once('-') {
        Some((r, s)) => (r, s.to_ascii_lowercase()),
        None => (number, String::new()),
    };
    match roman_to_arabic(roman) {
        Some(n) => format!("{n}{suffix}"),
        None => slug_number(number),
    }
}

/// Canonical number form from a URN token body: digits, then an optional
/// letter suffix re-attached with a hyphen (`"121a"` → `"121-A"`).
pub fn number_from_token(token: &str) -> String {
    let token = token.trim();
    let split = token
        .char_indices()
        .find(|(_, c)| c.is_ascii_alphabetic())
        .map(|(i, _)| i);
    match split {
        Some(0) | None => token.to_string(),
        Some(i) => {
            let (digits, letters) = token.split_at(i);
            format!("{}-{}", digits, letters.to_ascii_uppercase())
        }
    }
}
