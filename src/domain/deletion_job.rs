//! Deletion job model for asynchronous soft deletion.

/// A request to flag a chunk of keys as deleted on behalf of one owner.
///
/// Jobs are created by
/// [`crate::application::services::ShortenerService::request_deletion`] and
/// consumed by [`crate::domain::deletion_worker::DeletionPool`] workers, which
/// decouples the caller's acknowledgement from the actual store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionJob {
    pub owner_id: String,
    pub keys: Vec<String>,
}

impl DeletionJob {
    /// Creates a new deletion job.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let job = DeletionJob::new("user-1", vec!["Ab3dEf7h".to_string()]);
    /// ```
    pub fn new(owner_id: impl Into<String>, keys: Vec<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            keys,
        }
    }

    /// Splits `keys` into jobs of at most `chunk_size` keys each.
    ///
    /// A `chunk_size` of zero is treated as one.
    pub fn chunked(owner_id: &str, keys: &[String], chunk_size: usize) -> Vec<Self> {
        keys.chunks(chunk_size.max(1))
            .map(|chunk| Self::new(owner_id, chunk.to_vec()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_deletion_job_creation() {
        let job = DeletionJob::new("user-1", keys(&["a", "b"]));

        assert_eq!(job.owner_id, "user-1");
        assert_eq!(job.keys, keys(&["a", "b"]));
    }

    #[test]
    fn test_chunked_pairs_with_remainder() {
        let jobs = DeletionJob::chunked("u", &keys(&["a", "b", "c", "d", "e"]), 2);

        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[0].keys, keys(&["a", "b"]));
        assert_eq!(jobs[1].keys, keys(&["c", "d"]));
        assert_eq!(jobs[2].keys, keys(&["e"]));
        assert!(jobs.iter().all(|j| j.owner_id == "u"));
    }

    #[test]
    fn test_chunked_empty_input() {
        assert!(DeletionJob::chunked("u", &[], 2).is_empty());
    }

    #[test]
    fn test_chunked_zero_size() {
        let jobs = DeletionJob::chunked("u", &keys(&["a", "b"]), 0);
        assert_eq!(jobs.len(), 2);
    }
}
