//! Slug assembly for emitted blocks.
//!
//! The dotted scheme `artigo-N[.paragrafo-M[.inciso-K[.alinea-L[.item-J]]]]`
//! plus the `-revogado` shift on the component where revocation starts.

use lei_core::element::ElementKind;
use lei_core::number::{clause_arabic, slug_number};

/// `artigo-121`, `artigo-121-revogado`.
pub fn article_base(number: &str, textually_revoked: bool) -> String {
    let mut slug = format!("artigo-{}", slug_number(number));
    if textually_revoked {
        slug.push_str("-revogado");
    }
    slug
}

/// The slug component for a child element. `revoked_shift` applies the
/// `-revogado` marker when revocation starts at this element (a revoked
/// clause inside an in-force article); descendants of an already-shifted
/// ancestor inherit the prefix and are not double-marked.
pub fn child_component(kind: ElementKind, number: &str, revoked_shift: bool) -> String {
    let base = match kind {
        ElementKind::Paragraph => format!("paragrafo-{}", slug_number(number)),
        ElementKind::Inciso => format!("inciso-{}", clause_arabic(number)),
        ElementKind::Alinea => format!("alinea-{}", slug_number(number)),
        ElementKind::Item => format!("item-{}", slug_number(number)),
        ElementKind::Penalty => "pena".to_string(),
        ElementKind::Caput => "caput".to_string(),
        _ => slug_number(number),
    };
    if revoked_shift {
        format!("{base}-revogado")
    } else {
        base
    }
}

/// Slug of an article-level epigraph block.
pub fn epigraph_slug(article_base: &str) -> String {
    format!("{article_base}_epigrafe")
}

/// Slug of a rubric bound to a paragraph/clause inside an article.
pub fn rubric_slug(owner_slug: &str) -> String {
    format!("{owner_slug}-epigrafe")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_base_forms() {
        assert_eq!(article_base("121", false), "artigo-121");
        assert_eq!(article_base("121-A", false), "artigo-121a");
        assert_eq!(article_base("121", true), "artigo-121-revogado");
        assert_eq!(article_base("1.029", false), "artigo-1029");
    }

    #[test]
    fn child_components() {
        assert_eq!(
            child_component(ElementKind::Paragraph, "unico", false),
            "paragrafo-unico"
        );
        assert_eq!(child_component(ElementKind::Inciso, "IV", false), "inciso-4");
        assert_eq!(child_component(ElementKind::Alinea, "b", false), "alinea-b");
        assert_eq!(child_component(ElementKind::Item, "3", false), "item-3");
        assert_eq!(child_component(ElementKind::Caput, "", false), "caput");
    }

    #[test]
    fn revoked_shift_marks_component() {
        assert_eq!(
            child_component(ElementKind::Paragraph, "1", true),
            "paragrafo-1-revogado"
        );
    }

    #[test]
    fn epigraph_slugs() {
        assert_eq!(epigraph_slug("artigo-121"), "artigo-121_epigrafe");
        assert_eq!(
            rubric_slug("artigo-121.paragrafo-1"),
            "artigo-121.paragrafo-1-epigrafe"
        );
    }
}
