// src/page/html.rs
// =============================================================================
// This module pulls structural facts out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// Extracted facts:
// - the HTML version, read from the <!DOCTYPE> node
// - the <title> text
// - how many h1..h6 headings the page has
// - the raw href of every <a> tag (classification happens in checker/)
// - whether any <form> looks like a login form
// =============================================================================

use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

/// Count of each heading level on the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeadingCounts {
    pub h1: usize,
    pub h2: usize,
    pub h3: usize,
    pub h4: usize,
    pub h5: usize,
    pub h6: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFeatures {
    pub html_version: String,
    pub title: String,
    pub headings: HeadingCounts,
    /// One entry per <a> tag; None when the tag has no href attribute
    pub hrefs: Vec<Option<String>>,
    pub login_form: bool,
}

impl PageFeatures {
    pub fn extract(html: &str) -> Self {
        let document = Html::parse_document(html);

        Self {
            html_version: html_version(&document),
            title: title(&document),
            headings: heading_counts(&document),
            hrefs: anchor_hrefs(&document),
            login_form: has_login_form(&document),
        }
    }
}

// All selectors below are string constants, so parsing can only fail if
// we typo one; that's a programmer error and a panic points straight at it.
fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {:?}: {:?}", css, e))
}

// A page with no doctype, or with the bare `<!DOCTYPE html>`, is HTML5.
// Older doctypes carry a public identifier like "-//W3C//DTD HTML 4.01//EN".
fn html_version(document: &Html) -> String {
    document
        .tree
        .root()
        .children()
        .find_map(|node| match node.value() {
            Node::Doctype(doctype) => Some(doctype.public_id().trim().to_string()),
            _ => None,
        })
        .filter(|public_id| !public_id.is_empty())
        .unwrap_or_else(|| "HTML5".to_string())
}

fn title(document: &Html) -> String {
    document
        .select(&selector("title"))
        .flat_map(|element| element.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn heading_counts(document: &Html) -> HeadingCounts {
    let count = |tag: &str| document.select(&selector(tag)).count();

    HeadingCounts {
        h1: count("h1"),
        h2: count("h2"),
        h3: count("h3"),
        h4: count("h4"),
        h5: count("h5"),
        h6: count("h6"),
    }
}

fn anchor_hrefs(document: &Html) -> Vec<Option<String>> {
    document
        .select(&selector("a"))
        .map(|element| element.value().attr("href").map(str::to_string))
        .collect()
}

fn has_login_form(document: &Html) -> bool {
    document.select(&selector("form")).any(is_login_form)
}

// A login form needs three things: something to type a username or email
// into, a password field, and a way to submit.
fn is_login_form(form: ElementRef<'_>) -> bool {
    let mut has_username = false;
    let mut has_password = false;

    for input in form.select(&selector("input")) {
        let attr = |name: &str| input.value().attr(name).unwrap_or("").to_ascii_lowercase();
        let kind = attr("type");
        let name = attr("name");
        let id = attr("id");

        if kind == "text"
            || kind == "email"
            || name.contains("user")
            || name.contains("email")
            || id.contains("user")
            || id.contains("email")
        {
            has_username = true;
        }

        if kind == "password" || name.contains("password") || id.contains("password") {
            has_password = true;
        }
    }

    has_username && has_password && has_submit_control(form)
}

fn has_submit_control(form: ElementRef<'_>) -> bool {
    if form
        .select(&selector(r#"button[type="submit"], input[type="submit"]"#))
        .next()
        .is_some()
    {
        return true;
    }

    form.select(&selector("button")).any(|button| {
        let text: String = button.text().collect();
        text.contains("Login") || text.contains("Sign in")
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why keep `Option<String>` for hrefs?
//    - `<a name="top">` is valid HTML with no href at all
//    - Keeping None (instead of skipping) lets the classifier decide
//
// 2. What is `document.tree`?
//    - The raw node tree scraper builds; selectors only see elements
//    - The doctype is a node, not an element, so we walk the root's children
//
// 3. Why `.any(...)`?
//    - It stops at the first form that matches
//    - Like `Array.prototype.some` in JavaScript
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_and_headings() {
        let html = r#"
            <html><head><title> Rust Docs </title></head>
            <body>
                <h1>One</h1>
                <h2>Two</h2><h2>Two again</h2>
                <h6>Six</h6>
            </body></html>
        "#;
        let features = PageFeatures::extract(html);

        assert_eq!(features.title, "Rust Docs");
        assert_eq!(
            features.headings,
            HeadingCounts {
                h1: 1,
                h2: 2,
                h6: 1,
                ..HeadingCounts::default()
            }
        );
    }

    #[test]
    fn test_html5_doctype_and_default() {
        let with_doctype = PageFeatures::extract("<!DOCTYPE html><html><body></body></html>");
        assert_eq!(with_doctype.html_version, "HTML5");

        let without = PageFeatures::extract("<html><body></body></html>");
        assert_eq!(without.html_version, "HTML5");
    }

    #[test]
    fn test_legacy_doctype_public_id() {
        let html = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd"><html></html>"#;
        let features = PageFeatures::extract(html);
        assert_eq!(features.html_version, "-//W3C//DTD HTML 4.01//EN");
    }

    #[test]
    fn test_anchor_without_href_is_kept_as_none() {
        let html = r#"
            <a href="/docs">Docs</a>
            <a name="top">Anchor</a>
            <a href="">Empty</a>
        "#;
        let features = PageFeatures::extract(html);

        assert_eq!(
            features.hrefs,
            vec![Some("/docs".to_string()), None, Some(String::new())]
        );
    }

    #[test]
    fn test_detects_login_form() {
        let html = r#"
            <form action="/session">
                <input type="email" name="email">
                <input type="password" name="pass">
                <button type="submit">Go</button>
            </form>
        "#;
        assert!(PageFeatures::extract(html).login_form);
    }

    #[test]
    fn test_detects_login_form_by_button_text() {
        let html = r#"
            <form>
                <input id="UserName">
                <input name="user_password">
                <button>Sign in</button>
            </form>
        "#;
        assert!(PageFeatures::extract(html).login_form);
    }

    #[test]
    fn test_search_form_is_not_login() {
        let html = r#"
            <form action="/search">
                <input type="text" name="q">
                <input type="submit" value="Search">
            </form>
        "#;
        assert!(!PageFeatures::extract(html).login_form);
    }

    #[test]
    fn test_login_fields_without_submit_is_not_login() {
        let html = r#"
            <form>
                <input type="text" name="username">
                <input type="password" name="password">
            </form>
        "#;
        assert!(!PageFeatures::extract(html).login_form);
    }
}
