//! Anti-forgery token discovery on the appointments listing page

use scraper::{Html, Selector};

use crate::constants;

/// True when the listing request ended on the login form instead of the page
pub fn is_login_redirect(final_url: &str) -> bool {
    final_url.contains(constants::LOGIN_REDIRECT_MARKER)
}

/// Find the anti-forgery token in the listing page markup.
///
/// Each known name is tried in order, first as an `<input name=..>` value and
/// then as a `<meta name=..>` content. When none of them match, any input
/// whose name contains "nonce" is accepted. Empty values never count.
pub fn find_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for name in constants::TOKEN_FIELD_NAMES {
        if let Some(token) = attr_of_named(&document, "input", name, "value") {
            return Some(token);
        }
        if let Some(token) = attr_of_named(&document, "meta", name, "content") {
            return Some(token);
        }
    }

    let inputs = Selector::parse("input[name]").ok()?;
    document
        .select(&inputs)
        .filter(|el| {
            el.value()
                .attr("name")
                .is_some_and(|n| n.to_lowercase().contains(constants::NONCE_MARKER))
        })
        .filter_map(|el| non_empty(el.value().attr("value")))
        .next()
}

/// `attr` of the first `tag` element named exactly `name` that has a non-empty `attr`
fn attr_of_named(document: &Html, tag: &str, name: &str, attr: &str) -> Option<String> {
    let selector = Selector::parse(&format!("{}[name=\"{}\"]", tag, name)).ok()?;
    document
        .select(&selector)
        .filter_map(|el| non_empty(el.value().attr(attr)))
        .next()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Shorten a token for log output
pub fn preview(token: &str) -> String {
    token.chars().take(20).collect()
}
