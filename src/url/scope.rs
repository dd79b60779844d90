use url::Url;

/// Checks whether two URLs share scheme, host and port
///
/// # Examples
///
/// ```
/// use od_crawler::url::same_origin;
/// use url::Url;
///
/// let a = Url::parse("http://host/a/").unwrap();
/// let b = Url::parse("http://host:80/b").unwrap();
/// let c = Url::parse("https://host/a/").unwrap();
/// assert!(same_origin(&a, &b));
/// assert!(!same_origin(&a, &c));
/// ```
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Checks whether `candidate` lies strictly below `base` in the path hierarchy
///
/// Equal paths are rejected so that a listing linking to itself never
/// produces a job for the same directory again.
pub fn is_descendant(base: &Url, candidate: &Url) -> bool {
    candidate.path() != base.path() && candidate.path().starts_with(base.path())
}
