//! Link extraction for directory listings
//!
//! Open-directory pages are flat lists of anchors. Every anchor's first
//! `href` goes through an ordered chain of filters; a candidate is dropped
//! as soon as one filter matches:
//!
//! 1. it carries a query (`?`) - sort/filter links of the listing itself
//! 2. it is empty, a single space, `.`, `..` or `/`
//! 3. it contains a `../` segment
//!
//! Resolved paths have runs of `/` collapsed, so `sub//` and `sub/` name the
//! same directory. After that:
//!
//! 4. its scheme, host or port differ from the listing URL's
//! 5. its path equals the listing path
//! 6. its path is not below the listing path

use crate::url::{collapse_slashes, is_descendant, same_origin};
use scraper::{Html, Selector};
use url::Url;

/// Why a candidate link was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkRejection {
    Query,
    SelfOrParent,
    Traversal,
    Unresolvable,
    CrossSite,
    SelfLink,
    OutsideSubtree,
}

/// Extracts the child links of a directory listing
///
/// Links come back absolute, in listing order, and are not deduplicated.
///
/// # Example
///
/// ```
/// use od_crawler::crawler::extract_links;
/// use url::Url;
///
/// let base = Url::parse("http://host/root/").unwrap();
/// let html = r#"<a href="../">Parent</a><a href="sub/">sub/</a><a href="?C=M">Sort</a>"#;
/// let links = extract_links(html, &base);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "http://host/root/sub/");
/// ```
pub fn extract_links(body: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(body);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a") {
        for element in document.select(&a_selector) {
            let href = element.value().attr("href").unwrap_or("");
            match resolve_link(href, base) {
                Ok(link) => links.push(link),
                Err(reason) => {
                    tracing::trace!("Dropping link {:?} on {}: {:?}", href, base, reason);
                }
            }
        }
    }

    links
}

/// Runs one href through the filter chain and resolves it against `base`
pub fn resolve_link(href: &str, base: &Url) -> Result<Url, LinkRejection> {
    if href.contains('?') {
        return Err(LinkRejection::Query);
    }

    if matches!(href, "" | " " | "." | ".." | "/") {
        return Err(LinkRejection::SelfOrParent);
    }

    if href.contains("../") {
        return Err(LinkRejection::Traversal);
    }

    let mut link = base.join(href).map_err(|_| LinkRejection::Unresolvable)?;
    link.set_fragment(None);
    let path = collapse_slashes(link.path());
    link.set_path(&path);

    if !same_origin(base, &link) {
        return Err(LinkRejection::CrossSite);
    }

    if link.path() == base.path() {
        return Err(LinkRejection::SelfLink);
    }

    if !is_descendant(base, &link) {
        return Err(LinkRejection::OutsideSubtree);
    }

    Ok(link)
}
