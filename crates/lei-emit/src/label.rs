//! Legislative typography for block labels.
//!
//! Brazilian drafting convention numbers articles and paragraphs ordinally
//! through nine (`Art. 9º`, `§ 2º`) and cardinally from ten (`Art. 10`,
//! `§ 11`); letter suffixes follow the ordinal glyph (`Art. 1º-A`).

use lei_core::number::sort_key;

/// `Art. 1º` / `Art. 10` / `Art. 121-A` / `Art. 1.029`.
pub fn article_label(number: &str) -> String {
    let (n, suffix) = split_display(number);
    let value = sort_key(number).0;
    match (value <= 9, suffix.is_empty()) {
        (true, true) => format!("Art. {n}º"),
        (true, false) => format!("Art. {n}º-{suffix}"),
        (false, true) => format!("Art. {n}"),
        (false, false) => format!("Art. {n}-{suffix}"),
    }
}

/// `§ 2º` / `§ 10` / `Parágrafo único`.
pub fn paragraph_label(number: &str) -> String {
    if number == "unico" {
        return "Parágrafo único".to_string();
    }
    let (n, suffix) = split_display(number);
    let value = sort_key(number).0;
    match (value <= 9, suffix.is_empty()) {
        (true, true) => format!("§ {n}º"),
        (true, false) => format!("§ {n}º-{suffix}"),
        (false, true) => format!("§ {n}"),
        (false, false) => format!("§ {n}-{suffix}"),
    }
}

/// `IV -`, as clauses are printed.
pub fn inciso_label(number: &str) -> String {
    format!("{number} -")
}

/// `a)`.
pub fn alinea_label(letter: &str) -> String {
    format!("{letter})")
}

/// `1.`.
pub fn item_label(number: &str) -> String {
    format!("{number}.")
}

/// `Pena -`.
pub fn penalty_label() -> String {
    "Pena -".to_string()
}

/// Digits (with thousands dots) and the uppercase letter suffix.
fn split_display(number: &str) -> (String, String) {
    let number = number.trim();
    let digits: String = number
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let suffix: String = number
        .chars()
        .skip_while(|c| c.is_ascii_digit() || *c == '.')
        .collect::<String>()
        .trim_matches(['-', ' '])
        .to_ascii_uppercase();
    (digits.trim_end_matches('.').to_string(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_ordinal_through_nine() {
        assert_eq!(article_label("1"), "Art. 1º");
        assert_eq!(article_label("9"), "Art. 9º");
    }

    #[test]
    fn article_cardinal_from_ten() {
        assert_eq!(article_label("10"), "Art. 10");
        assert_eq!(article_label("121"), "Art. 121");
    }

    #[test]
    fn article_suffix_placement() {
        assert_eq!(article_label("121-A"), "Art. 121-A");
        assert_eq!(article_label("1-A"), "Art. 1º-A");
    }

    #[test]
    fn article_thousands_dot_is_kept() {
        assert_eq!(article_label("1.029"), "Art. 1.029");
    }

    #[test]
    fn paragraph_labels() {
        assert_eq!(paragraph_label("2"), "§ 2º");
        assert_eq!(paragraph_label("10"), "§ 10");
        assert_eq!(paragraph_label("unico"), "Parágrafo único");
    }

    #[test]
    fn clause_labels() {
        assert_eq!(inciso_label("IV"), "IV -");
        assert_eq!(alinea_label("b"), "b)");
        assert_eq!(item_label("3"), "3.");
        assert_eq!(penalty_label(), "Pena -");
    }
}
