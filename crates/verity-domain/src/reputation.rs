//! Publisher reputation: domains known to spread misinformation

/// A domain on the unreliable-source list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreliableDomain {
    /// Registrable domain, lower-case, without a leading `www.`
    pub domain: String,

    /// Category such as "satire" or "fabricated"
    pub category: String,

    /// Why the domain is listed
    pub reason: String,
}

impl UnreliableDomain {
    /// Create an entry; the domain is normalized
    pub fn new(
        domain: impl AsRef<str>,
        category: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            domain: normalize_host(domain.as_ref()),
            category: category.into(),
            reason: reason.into(),
        }
    }

    /// Whether `host` is this domain or one of its subdomains
    ///
    /// ```
    /// use verity_domain::UnreliableDomain;
    ///
    /// let listed = UnreliableDomain::new("fakenews.example", "fabricated", "");
    /// assert!(listed.covers("www.FakeNews.example"));
    /// assert!(listed.covers("politics.fakenews.example"));
    /// assert!(!listed.covers("notfakenews.example"));
    /// ```
    pub fn covers(&self, host: &str) -> bool {
        let host = normalize_host(host);
        if self.domain.is_empty() {
            return false;
        }
        host == self.domain
            || host
                .strip_suffix(self.domain.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

/// Lower-case a host name and drop a leading `www.`
pub fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}
