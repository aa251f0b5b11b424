use once_cell::sync::Lazy;
use regex::Regex;

/// Literal string prefixes, not segment aware: `api/installation2` passes
/// because it starts with `api/installation`.
const VALID_PREFIXES: [&'static str; 8] = [
    "api/installation",
    "/api/installation",
    "api/cluster_installation",
    "/api/cluster_installation",
    "api/webhooks",
    "/api/webhooks",
    "/api/webhook",
    "api/webhook",
];

const EXACT_MATCH_PATTERNS: [&'static str; 2] = [
    "^/api/security/installation/[a-zA-Z0-9]{26}/deletion/lock$",
    "^/api/security/installation/[a-zA-Z0-9]{26}/deletion/unlock$",
];

static EXACT_MATCH_REGEXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    EXACT_MATCH_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

/// Checks an escaped URL path against the relay allow-list.
pub fn is_authorized(escaped_path: &str) -> bool {
    if VALID_PREFIXES
        .iter()
        .any(|prefix| escaped_path.starts_with(prefix))
    {
        return true;
    }

    EXACT_MATCH_REGEXES
        .iter()
        .any(|regex| regex.is_match(escaped_path))
}

#[cfg(test)]
mod tests {
    use crate::authorizer::{is_authorized, EXACT_MATCH_PATTERNS, EXACT_MATCH_REGEXES};

    const INSTALLATION_ID: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAA";

    #[test]
    fn test_exact_match_patterns_compile() {
        assert_eq!(EXACT_MATCH_REGEXES.len(), EXACT_MATCH_PATTERNS.len());
    }

    #[test]
    fn test_allowed_prefixes() {
        for path in &[
            "api/installation",
            "/api/installation",
            "api/cluster_installation/x",
            "/api/cluster_installations",
            "api/webhooks/foo",
            "/api/webhook",
            "/api/installation/abc/group",
        ] {
            assert!(is_authorized(path), "{} should be authorized", path);
        }
    }

    #[test]
    fn test_rejected_paths() {
        for path in &[
            "/api/other",
            "/api/instal",
            "/API/installation",
            "/v1/api/installation",
            "",
            "/",
            "/api/security/installation/abc/deletion/lock",
        ] {
            assert!(!is_authorized(path), "{} should be rejected", path);
        }
    }

    #[test]
    fn test_prefix_match_is_not_segment_aware() {
        assert!(is_authorized("api/installation2"));
        assert!(is_authorized("/api/installationX/delete"));
    }

    #[test]
    fn test_deletion_lock_and_unlock() {
        let lock = format!("/api/security/installation/{}/deletion/lock", INSTALLATION_ID);
        let unlock = format!("/api/security/installation/{}/deletion/unlock", INSTALLATION_ID);
        assert!(is_authorized(&lock));
        assert!(is_authorized(&unlock));
    }

    #[test]
    fn test_deletion_lock_requires_26_character_id() {
        let short = format!(
            "/api/security/installation/{}/deletion/lock",
            &INSTALLATION_ID[..25]
        );
        let long = format!(
            "/api/security/installation/{}A/deletion/lock",
            INSTALLATION_ID
        );
        assert!(!is_authorized(&short));
        assert!(!is_authorized(&long));
    }

    #[test]
    fn test_deletion_lock_is_anchored() {
        let trailing = format!(
            "/api/security/installation/{}/deletion/lock/extra",
            INSTALLATION_ID
        );
        let relative = format!("api/security/installation/{}/deletion/lock", INSTALLATION_ID);
        let symbol = "/api/security/installation/AAAAAAAAAAAAAAAAAAAAAAAAA-/deletion/lock";
        assert!(!is_authorized(&trailing));
        assert!(!is_authorized(&relative));
        assert!(!is_authorized(symbol));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        for path in &["/api/webhooks", "/api/other"] {
            assert_eq!(is_authorized(path), is_authorized(path));
        }
    }
}
