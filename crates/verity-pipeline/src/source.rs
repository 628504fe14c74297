//! Source URL checks
//!
//! A claim's source URL is checked two ways: its host against the
//! unreliable-domain list, and its shape against common warning signs
//! (raw IP host, link shorteners, throwaway TLDs, bait words). The list hit
//! decides a verdict; the warning signs are only passed on to the reasoner.

use regex::Regex;
use std::sync::LazyLock;
use verity_domain::reputation::normalize_host;
use verity_domain::UnreliableDomain;

static HOST: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://(?:[^@/?#]*@)?([^/?#:]+)").ok());

static IPV4: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b").ok());

const SHORTENERS: &[&str] = &["bit.ly", "tinyurl.com", "t.co", "goo.gl"];
const SUSPICIOUS_TLDS: &[&str] = &[".tk", ".ml", ".ga", ".cf", ".gq"];
const BAIT_WORDS: &[&str] = &["free", "click", "prize", "winner"];

/// Warning signs in a URL's structure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlSignals {
    /// Host is a raw IPv4 address
    pub ip_address: bool,
    /// More than four host labels
    pub excessive_subdomains: bool,
    /// Host ends in a TLD popular with throwaway sites
    pub suspicious_tld: bool,
    /// Host is a link shortener
    pub url_shortener: bool,
    /// URL contains bait words
    pub bait_words: bool,
}

impl UrlSignals {
    /// Number of warning signs present
    pub fn score(&self) -> usize {
        [
            self.ip_address,
            self.excessive_subdomains,
            self.suspicious_tld,
            self.url_shortener,
            self.bait_words,
        ]
        .into_iter()
        .filter(|&flag| flag)
        .count()
    }

    /// Two or more warning signs
    pub fn is_suspicious(&self) -> bool {
        self.score() >= 2
    }

    /// Names of the signs present
    pub fn flags(&self) -> Vec<String> {
        let named = [
            (self.ip_address, "ip address host"),
            (self.excessive_subdomains, "excessive subdomains"),
            (self.suspicious_tld, "suspicious tld"),
            (self.url_shortener, "url shortener"),
            (self.bait_words, "bait words"),
        ];
        named
            .into_iter()
            .filter(|(present, _)| *present)
            .map(|(_, name)| name.to_string())
            .collect()
    }
}

/// Result of checking one source URL
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCheck {
    /// URL as given
    pub url: String,
    /// Host, lower-cased, without `www.`
    pub domain: String,
    /// Structural warning signs
    pub signals: UrlSignals,
    /// Listing that covers the host, if any
    pub listed: Option<UnreliableDomain>,
}

impl SourceCheck {
    /// Whether the host is on the unreliable-domain list
    pub fn is_unreliable(&self) -> bool {
        self.listed.is_some()
    }
}

/// Host of an absolute URL, normalized; `None` if the URL has no host
pub fn extract_domain(url: &str) -> Option<String> {
    let host = HOST.as_ref()?.captures(url.trim())?.get(1)?.as_str();
    let host = normalize_host(host);
    (!host.is_empty()).then_some(host)
}

/// Structural warning signs of `url`
pub fn url_signals(url: &str) -> UrlSignals {
    let domain = extract_domain(url).unwrap_or_default();
    let lower = url.to_lowercase();
    UrlSignals {
        ip_address: IPV4.as_ref().is_some_and(|re| re.is_match(&domain)),
        excessive_subdomains: domain.split('.').count() > 4,
        suspicious_tld: SUSPICIOUS_TLDS.iter().any(|tld| domain.ends_with(tld)),
        url_shortener: SHORTENERS
            .iter()
            .any(|s| domain == *s || domain.ends_with(&format!(".{}", s))),
        bait_words: BAIT_WORDS.iter().any(|w| lower.contains(w)),
    }
}

/// Check `url` against the unreliable-domain list
///
/// Returns `None` when the URL has no recognizable host.
pub fn check_source(url: &str, listed: &[UnreliableDomain]) -> Option<SourceCheck> {
    let domain = extract_domain(url)?;
    let listed = listed.iter().find(|entry| entry.covers(&domain)).cloned();
    Some(SourceCheck {
        url: url.trim().to_string(),
        signals: url_signals(url),
        domain,
        listed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_extract_domain() {
        assert_eq!(
            extract_domain("https://www.News.example/a/b?c=1").as_deref(),
            Some("news.example")
        );
        assert_eq!(
            extract_domain("http://user:pw@host.example:8080/x").as_deref(),
            Some("host.example")
        );
        assert_eq!(extract_domain("news.example/a"), None);
        assert_eq!(extract_domain("not a url"), None);
    }

    #[test]
    fn test_clean_url_has_no_signals() {
        let signals = url_signals("https://www.thehindu.com/news/national/article1.ece");
        assert_eq!(signals, UrlSignals::default());
        assert!(!signals.is_suspicious());
    }

    #[test]
    fn test_suspicious_url() {
        let signals = url_signals("http://bit.ly/free-laptop-prize");
        assert!(signals.url_shortener);
        assert!(signals.bait_words);
        assert_eq!(signals.score(), 2);
        assert!(signals.is_suspicious());
        assert_eq!(signals.flags(), vec!["url shortener", "bait words"]);
    }

    #[test]
    fn test_ip_host_and_tld() {
        let signals = url_signals("http://192.168.10.4/login");
        assert!(signals.ip_address);
        assert!(!signals.is_suspicious());

        let signals = url_signals("https://a.b.c.d.offers.tk/");
        assert!(signals.suspicious_tld);
        assert!(signals.excessive_subdomains);
        assert!(signals.is_suspicious());
    }

    #[test]
    fn test_shortener_match_is_by_host() {
        assert!(!url_signals("https://microsoft.com/").url_shortener);
        assert!(url_signals("https://t.co/abc").url_shortener);
    }

    #[test]
    fn test_check_source_against_list() {
        let listed = vec![
            UnreliableDomain::new("satire.example", "satire", "Parody site"),
            UnreliableDomain::new("hoax.example", "fabricated", ""),
        ];

        let url = "https://politics.satire.example/pm-free-power";
        let check = check_source(url, &listed).unwrap();
        assert!(check.is_unreliable());
        assert_eq!(check.domain, "politics.satire.example");
        assert_eq!(check.listed.unwrap().category, "satire");

        let check = check_source("https://news.example/story", &listed).unwrap();
        assert!(!check.is_unreliable());

        assert!(check_source("no-scheme.example", &listed).is_none());
    }

    proptest! {
        #[test]
        fn prop_score_matches_flags(url in "[a-z]{1,6}://[a-z0-9.]{1,30}/[a-z0-9/-]{0,20}") {
            let signals = url_signals(&url);
            prop_assert_eq!(signals.score(), signals.flags().len());
        }
    }
}
