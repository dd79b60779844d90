use crate::CrawlerError;

/// Coarse classification of an HTTP status code
///
/// This is the only input to failure handling: bodies are never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// 200
    Ok,
    /// 429
    RateLimited,
    /// 401 or 403
    Forbidden,
    /// Anything else, carrying the code for diagnostics
    Other(u16),
}

impl StatusClass {
    /// Classifies a transport status code
    ///
    /// # Examples
    ///
    /// ```
    /// use od_crawler::StatusClass;
    ///
    /// assert_eq!(StatusClass::classify(200), StatusClass::Ok);
    /// assert_eq!(StatusClass::classify(401), StatusClass::Forbidden);
    /// assert_eq!(StatusClass::classify(500), StatusClass::Other(500));
    /// ```
    pub fn classify(status: u16) -> Self {
        match status {
            200 => Self::Ok,
            429 => Self::RateLimited,
            401 | 403 => Self::Forbidden,
            other => Self::Other(other),
        }
    }

    /// Converts a non-`Ok` class into the job error for `url`
    pub fn into_result(self, url: &str) -> Result<(), CrawlerError> {
        match self {
            Self::Ok => Ok(()),
            Self::RateLimited => Err(CrawlerError::RateLimited {
                url: url.to_string(),
            }),
            Self::Forbidden => Err(CrawlerError::Forbidden {
                url: url.to_string(),
            }),
            Self::Other(status) => Err(CrawlerError::HttpStatus {
                url: url.to_string(),
                status,
            }),
        }
    }
}

/// Classifies `status` and returns the matching job error, if any
pub fn check_status(status: u16, url: &str) -> Result<(), CrawlerError> {
    StatusClass::classify(status).into_result(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FailureKind;

    #[test]
    fn test_classify() {
        assert_eq!(StatusClass::classify(200), StatusClass::Ok);
        assert_eq!(StatusClass::classify(429), StatusClass::RateLimited);
        assert_eq!(StatusClass::classify(401), StatusClass::Forbidden);
        assert_eq!(StatusClass::classify(403), StatusClass::Forbidden);
        assert_eq!(StatusClass::classify(404), StatusClass::Other(404));
        assert_eq!(StatusClass::classify(204), StatusClass::Other(204));
        assert_eq!(StatusClass::classify(503), StatusClass::Other(503));
    }

    #[test]
    fn test_error_mapping() {
        assert!(check_status(200, "http://host/").is_ok());

        let err = check_status(429, "http://host/").unwrap_err();
        assert_eq!(err.failure_kind(), FailureKind::RateLimited);
        assert!(err.failure_kind().is_retryable());

        let err = check_status(403, "http://host/").unwrap_err();
        assert_eq!(err.failure_kind(), FailureKind::Forbidden);
        assert!(!err.failure_kind().is_retryable());

        let err = check_status(500, "http://host/").unwrap_err();
        assert_eq!(err.failure_kind(), FailureKind::Status(500));
        assert_eq!(err.to_string(), "Got HTTP status 500 for http://host/");
    }
}
