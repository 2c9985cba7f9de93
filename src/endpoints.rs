//! Endpoint pool: ordered, duplicate-free list of endpoint hosts.

use crate::error::StoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointPool {
    hosts: Vec<String>,
}

impl EndpointPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_hosts(hosts: impl IntoIterator<Item = String>) -> Self {
        let mut p = Self::default();
        for h in hosts {
            // persisted garbage (empty hosts) is skipped silently
            let _ = p.add(&h);
        }
        p
    }

    /// Ignores duplicates. Returns true if the host was added.
    pub fn add(&mut self, host: &str) -> Result<bool, StoreError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(StoreError::EmptyEndpoint);
        }
        if self.contains(host) {
            return Ok(false);
        }
        self.hosts.push(host.to_string());
        Ok(true)
    }

    /// Ignores absent hosts. Returns true if the host was removed.
    pub fn remove(&mut self, host: &str) -> bool {
        let host = host.trim();
        let before = self.hosts.len();
        self.hosts.retain(|h| h != host);
        self.hosts.len() != before
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h == host.trim())
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_like_semantics() {
        let mut p = EndpointPool::new();
        assert!(p.add("162.159.192.1").unwrap());
        assert!(p.add("engage.cloudflareclient.com").unwrap());
        assert!(!p.add(" 162.159.192.1 ").unwrap());
        assert_eq!(p.hosts(), ["162.159.192.1", "engage.cloudflareclient.com"]);
        assert!(!p.remove("10.0.0.1"));
        assert!(p.remove("162.159.192.1"));
        assert_eq!(p.len(), 1);
        assert_eq!(p.add(""), Err(StoreError::EmptyEndpoint));
    }

    #[test]
    fn from_hosts_dedupes() {
        let p = EndpointPool::from_hosts(vec!["a".into(), "".into(), "a".into(), "b".into()]);
        assert_eq!(p.hosts(), ["a", "b"]);
    }
}
