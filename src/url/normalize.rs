use crate::url::is_supported_scheme;
use crate::UrlError;
use url::Url;

/// Cleans a URL path into its canonical rooted form
///
/// # Cleaning Steps
///
/// 1. Collapse duplicate slashes
/// 2. Remove `.` segments
/// 3. Resolve `..` segments (never above the root)
/// 4. Drop the trailing slash (except for the root `/`)
///
/// # Examples
///
/// ```
/// use od_crawler::url::clean_path;
///
/// assert_eq!(clean_path("/a//b/./c/"), "/a/b/c");
/// assert_eq!(clean_path("/a/../b"), "/b");
/// assert_eq!(clean_path(""), "/");
/// ```
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    format!("/{}", segments.join("/"))
}

/// Collapses runs of `/` in a URL path, keeping any trailing slash
///
/// ```
/// use od_crawler::url::collapse_slashes;
///
/// assert_eq!(collapse_slashes("/pub//iso///"), "/pub/iso/");
/// assert_eq!(collapse_slashes("/pub/a.txt"), "/pub/a.txt");
/// ```
pub fn collapse_slashes(path: &str) -> String {
    let mut collapsed = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && collapsed.ends_with('/') {
            continue;
        }
        collapsed.push(c);
    }
    collapsed
}

/// Returns the last segment of a cleaned path, or an empty string for the root
pub fn file_name(path: &str) -> String {
    let cleaned = clean_path(path);
    cleaned
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Computes the path of `url` relative to the crawl root, without leading or
/// trailing slashes
///
/// Paths outside the root are returned relative to the server root instead.
///
/// # Examples
///
/// ```
/// use od_crawler::url::relative_path;
/// use url::Url;
///
/// let root = Url::parse("http://host/pub/").unwrap();
/// let file = Url::parse("http://host/pub/iso//debian.iso").unwrap();
/// assert_eq!(relative_path(&root, &file), "iso/debian.iso");
/// ```
pub fn relative_path(root: &Url, url: &Url) -> String {
    let root_path = clean_path(root.path());
    let path = clean_path(url.path());

    let relative = if root_path == "/" {
        path.as_str()
    } else if path == root_path {
        ""
    } else {
        path.strip_prefix(&root_path)
            .filter(|rest| rest.starts_with('/'))
            .unwrap_or(path.as_str())
    };

    relative.trim_matches('/').to_string()
}

/// Parses the root URL of a task
///
/// The returned URL always has a path ending in `/` so that prefix checks
/// against child links are made on whole segments.
///
/// # Returns
///
/// * `Ok(Url)` - A crawlable root URL
/// * `Err(UrlError::UnsupportedScheme)` - The scheme cannot be crawled
/// * `Err(UrlError)` - The URL is malformed
pub fn parse_task_url(raw: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !is_supported_scheme(url.scheme()) {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    let mut path = collapse_slashes(url.path());
    if !path.ends_with('/') {
        path.push('/');
    }
    url.set_path(&path);

    Ok(url)
}

/// Parses a URL given on the command line
///
/// Bare hosts such as `example.com/pub` are treated as `http://`.
pub fn parse_crawl_argument(arg: &str) -> Result<Url, UrlError> {
    let arg = arg.trim();
    if arg.contains("://") {
        parse_task_url(arg)
    } else {
        parse_task_url(&format!("http://{}", arg))
    }
}
