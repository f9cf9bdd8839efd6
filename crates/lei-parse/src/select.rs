//! Parser strategy selection.
//!
//! Planalto-styled sources carry too little markup for bold-span detection,
//! so they go through the text parser first; everything else starts with the
//! tag parser. Whichever strategy runs first, the other one is the fallback,
//! and a successful parse means at least one article came out.

use lei_core::structure::ParsedLaw;
use log::{info, warn};

use crate::error::Result;
use crate::tag::parse_tag_html;
use crate::textual::parse_text_html;

/// Environment switch forcing the text parser first regardless of source.
pub const TEXT_PARSER_ENV: &str = "IMPORTER_TEXT_PARSER";

/// Which parser runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    TagFirst,
    TextFirst,
}

/// Choose the strategy for `html`.
pub fn choose(html: &str) -> Strategy {
    if std::env::var(TEXT_PARSER_ENV).is_ok_and(|v| v == "1") {
        return Strategy::TextFirst;
    }
    if html.to_lowercase().contains("planalto") {
        return Strategy::TextFirst;
    }
    Strategy::TagFirst
}

/// Parse `html` with the chosen strategy, falling back to the other parser
/// when the first raises or recognizes no articles.
pub fn parse_html(html: &str, base_urn: &str) -> Result<ParsedLaw> {
    match choose(html) {
        Strategy::TextFirst => {
            info!("trying text parser first");
            match parse_text_html(html, base_urn) {
                Ok(parsed) => Ok(parsed),
                Err(err) => {
                    warn!("text parser failed ({err}); falling back to tag parser");
                    parse_tag_html(html, base_urn)
                }
            }
        }
        Strategy::TagFirst => {
            info!("trying tag parser first");
            match parse_tag_html(html, base_urn) {
                Ok(parsed) => Ok(parsed),
                Err(err) => {
                    warn!("tag parser failed ({err}); falling back to text parser");
                    parse_text_html(html, base_urn)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planalto_source_selects_text_first() {
        let html = "<html><!-- www.planalto.gov.br --><p>Art. 1º X.</p></html>";
        assert_eq!(choose(html), Strategy::TextFirst);
    }

    #[test]
    fn other_sources_select_tag_first() {
        assert_eq!(choose("<p>Art. 1º X.</p>"), Strategy::TagFirst);
    }

    #[test]
    fn both_strategies_parse_a_simple_law() {
        let html = "<p>Art. 1º Não há crime sem lei anterior.</p>";
        let parsed = parse_html(html, "urn:lex:br:federal:lei:2000;1").unwrap();
        assert_eq!(parsed.articles.len(), 1);

        let planalto = "<html><!-- planalto --><p>Art. 1º Não há crime sem lei anterior.</p></html>";
        let parsed = parse_html(planalto, "urn:lex:br:federal:lei:2000;1").unwrap();
        assert_eq!(parsed.articles.len(), 1);
    }

    #[test]
    fn fallback_error_is_the_second_parsers() {
        let err = parse_html("<p>sem artigos</p>", "urn:x").unwrap_err();
        assert!(matches!(err, crate::error::ParseError::NoArticles));
    }
}
