//! Domain names carried by mint transactions.

const MIN_DOMAIN_LEN: usize = 4;
const MAX_DOMAIN_LEN: usize = 255;
const MAX_LABEL_LEN: usize = 63;

/// Lowercase dotted name with at least two labels. Labels hold ASCII letters, digits and
/// interior hyphens.
pub fn is_valid_domain(domain: &str) -> bool {
    if !(MIN_DOMAIN_LEN..=MAX_DOMAIN_LEN).contains(&domain.len()) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| is_valid_label(label))
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        for domain in ["example.com", "pool.example.com", "a-b.c0", "x1.io"] {
            assert!(is_valid_domain(domain), "{domain}");
        }
    }

    #[test]
    fn rejects_malformed_names() {
        let too_long = format!("{}.com", "a".repeat(64));
        let way_too_long = format!("{}.com", ["abc"; 70].join("."));
        for domain in [
            "",
            "a.b",
            "localhost",
            "Example.com",
            "exa_mple.com",
            "-ex.com",
            "ex-.com",
            "ex..com",
            ".example.com",
            "example.com.",
            too_long.as_str(),
            way_too_long.as_str(),
        ] {
            assert!(!is_valid_domain(domain), "{domain}");
        }
    }
}
