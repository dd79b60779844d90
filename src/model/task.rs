use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

/// A crawl assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier assigned by the task source (0 for local crawls)
    #[serde(alias = "website_id")]
    pub id: i64,

    /// Root URL of the directory tree to crawl
    pub url: String,
}

impl Task {
    pub fn new(id: i64, url: impl Into<String>) -> Self {
        Self {
            id,
            url: url.into(),
        }
    }
}

/// A unit of crawl work
///
/// Jobs are immutable once created. The root is shared by every job of the
/// same task.
#[derive(Debug, Clone)]
pub struct Job {
    /// Fully-qualified URL to fetch
    pub url: Url,

    /// Root URL of the task this job belongs to
    pub root: Arc<Url>,
}

impl Job {
    /// Creates the root job of a task
    pub fn root(url: Url) -> Self {
        let root = Arc::new(url.clone());
        Self { url, root }
    }

    /// Creates a job for a link discovered below this one
    pub fn child(&self, url: Url) -> Self {
        Self {
            url,
            root: Arc::clone(&self.root),
        }
    }

    /// Links ending in `/` are directory listings, everything else is a file
    pub fn is_dir(&self) -> bool {
        self.url.path().ends_with('/')
    }

    /// Returns true for the task's own root job
    pub fn is_root(&self) -> bool {
        self.url.path() == self.root.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_deserializes_website_id() {
        let task: Task = serde_json::from_str(r#"{"website_id": 42, "url": "http://host/"}"#).unwrap();
        assert_eq!(task, Task::new(42, "http://host/"));
    }

    #[test]
    fn test_job_kind() {
        let root = Job::root(Url::parse("http://host/root/").unwrap());
        assert!(root.is_dir());
        assert!(root.is_root());

        let file = root.child(Url::parse("http://host/root/a.txt").unwrap());
        assert!(!file.is_dir());
        assert!(!file.is_root());
        assert_eq!(file.root.as_str(), "http://host/root/");
    }
}
