//! Revoked-version merging.
//!
//! Two same-numbered articles coexist in a law only when all but one are
//! revoked. The in-force article absorbs the revoked payloads into
//! `revoked_versions` and the revoked entries leave the top-level list.

use std::collections::HashMap;

use lei_core::article::Article;
use log::debug;

/// Merge revoked variants into their in-force counterparts. Returns the
/// surviving list and the number of versions absorbed.
pub fn merge_revoked_versions(articles: Vec<Article>) -> (Vec<Article>, usize) {
    let mut in_force_count: HashMap<String, usize> = HashMap::new();
    for article in &articles {
        if article.in_force {
            *in_force_count.entry(article.number.clone()).or_insert(0) += 1;
        }
    }

    let mut survivors: Vec<Article> = Vec::new();
    let mut absorbed: Vec<Article> = Vec::new();
    let mut merged = 0usize;

    for article in articles {
        let mergeable = !article.in_force && in_force_count.get(&article.number) == Some(&1);
        if mergeable {
            absorbed.push(article);
        } else {
            survivors.push(article);
        }
    }

    for revoked in absorbed {
        let Some(owner) = survivors
            .iter_mut()
            .find(|a| a.in_force && a.number == revoked.number)
        else {
            survivors.push(revoked);
            continue;
        };
        debug!("absorbing revoked version of article {}", revoked.number);
        if owner.epigraph.is_none() && revoked.epigraph.is_some() {
            owner.epigraph = revoked.epigraph.clone();
        }
        owner.revoked_versions.push(revoked);
        merged += 1;
    }

    (survivors, merged)
}
