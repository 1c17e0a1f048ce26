//! Background release check
//!
//! The lookup itself is behind [`VersionSource`]; this module only bounds
//! it in time and compares versions. Failures never reach the caller.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Duration;

/// Published release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseInfo {
    /// Release tag, such as `v1.4.0`
    pub tag_name: String,
    /// Page describing the release
    pub html_url: String,
}

/// Release lookup failure
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    /// Source could not be reached or answered with an error
    #[error("release source unavailable: {0}")]
    Unavailable(String),

    /// Source answered with something that is not a release
    #[error("malformed release data: {0}")]
    Malformed(String),
}

/// Where the latest release is looked up
#[async_trait::async_trait]
pub trait VersionSource: Send + Sync {
    /// Latest published release
    async fn latest_release(&self) -> Result<ReleaseInfo, VersionError>;
}

/// Look up the latest release and return it if it is newer than `current`
///
/// Returns `None` when the lookup fails, exceeds `timeout`, or the release
/// is not newer.
pub async fn check_for_update(source: &dyn VersionSource, current: &str, timeout: Duration) -> Option<ReleaseInfo> {
    let release = match tokio::time::timeout(timeout, source.latest_release()).await {
        Ok(Ok(release)) => release,
        Ok(Err(error)) => {
            tracing::debug!(%error, "release check failed");
            return None;
        }
        Err(_) => {
            tracing::debug!(?timeout, "release check timed out");
            return None;
        }
    };

    if is_newer(&release.tag_name, current) {
        tracing::info!(current, latest = %release.tag_name, "newer release available");
        Some(release)
    } else {
        None
    }
}

/// Compare dotted numeric versions, ignoring a leading `v`
///
/// Missing components count as zero. If either side is not numeric, any
/// difference counts as newer.
#[must_use]
pub fn is_newer(candidate: &str, current: &str) -> bool {
    match (parse_version(candidate), parse_version(current)) {
        (Some(candidate), Some(current)) => compare(&candidate, &current) == Ordering::Greater,
        _ => candidate.trim() != current.trim(),
    }
}

fn parse_version(version: &str) -> Option<Vec<u64>> {
    let version = version.trim();
    let version = version.strip_prefix(['v', 'V']).unwrap_or(version);
    version.split('.').map(|part| part.parse().ok()).collect()
}

fn compare(a: &[u64], b: &[u64]) -> Ordering {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| a.get(i).copied().unwrap_or(0).cmp(&b.get(i).copied().unwrap_or(0)))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    #[async_trait::async_trait]
    impl VersionSource for Fixed {
        async fn latest_release(&self) -> Result<ReleaseInfo, VersionError> {
            Ok(ReleaseInfo {
                tag_name: self.0.to_string(),
                html_url: format!("https://example.org/releases/{}", self.0),
            })
        }
    }

    struct Failing;

    #[async_trait::async_trait]
    impl VersionSource for Failing {
        async fn latest_release(&self) -> Result<ReleaseInfo, VersionError> {
            Err(VersionError::Unavailable("offline".into()))
        }
    }

    struct Slow;

    #[async_trait::async_trait]
    impl VersionSource for Slow {
        async fn latest_release(&self) -> Result<ReleaseInfo, VersionError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Err(VersionError::Unavailable("never".into()))
        }
    }

    #[test]
    fn version_ordering() {
        assert!(is_newer("v1.2.0", "1.1.9"));
        assert!(is_newer("1.10", "1.9.3"));
        assert!(!is_newer("1.2", "1.2.0"));
        assert!(!is_newer("v0.9.0", "1.0.0"));
        assert!(is_newer("nightly", "1.0.0"));
        assert!(!is_newer("1.0.0-rc1", "1.0.0-rc1"));
    }

    #[tokio::test]
    async fn newer_release_is_reported() {
        let found = check_for_update(&Fixed("v2.0.0"), "1.0.0", Duration::from_secs(1)).await;
        assert_eq!(found.map(|r| r.tag_name), Some("v2.0.0".to_string()));

        let same = check_for_update(&Fixed("1.0.0"), "1.0.0", Duration::from_secs(1)).await;
        assert!(same.is_none());
    }

    #[tokio::test]
    async fn failure_resolves_to_none() {
        assert!(check_for_update(&Failing, "1.0.0", Duration::from_secs(1)).await.is_none());
    }

    #[tokio::test]
    async fn timeout_resolves_to_none() {
        assert!(check_for_update(&Slow, "1.0.0", Duration::from_millis(50)).await.is_none());
    }
}
