//! Record and zone name handling.
//!
//! Zone names are canonically stored with a trailing dot; record names inside
//! a zone are relative, with `@` denoting the apex.

/// Strip the trailing dot from a domain name.
#[must_use]
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// Convert a fully-qualified name to a zone-relative one.
///
/// `"www.example.com"` + `"example.com."` → `"www"`;
/// `"example.com"` + `"example.com."` → `"@"`.
#[must_use]
pub fn full_name_to_relative(full_name: &str, zone_name: &str) -> String {
    let full = normalize_domain_name(full_name);
    let zone = normalize_domain_name(zone_name);

    if full == zone {
        "@".to_string()
    } else if let Some(subdomain) = full.strip_suffix(&format!(".{zone}")) {
        subdomain.to_string()
    } else {
        full
    }
}

/// Convert a zone-relative name to a fully-qualified one.
///
/// `"www"` + `"example.com."` → `"www.example.com"`;
/// `"@"` + `"example.com."` → `"example.com"`.
#[must_use]
pub fn relative_to_full_name(relative_name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);

    if relative_name == "@" || relative_name.is_empty() {
        zone
    } else {
        format!("{relative_name}.{zone}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_conversion() {
        assert_eq!(full_name_to_relative("www.example.com", "example.com."), "www");
        assert_eq!(full_name_to_relative("example.com.", "example.com."), "@");
        assert_eq!(
            full_name_to_relative("_abc.www.example.com.", "example.com."),
            "_abc.www"
        );
        assert_eq!(full_name_to_relative("other.org", "example.com."), "other.org");
    }

    #[test]
    fn full_conversion() {
        assert_eq!(relative_to_full_name("www", "example.com."), "www.example.com");
        assert_eq!(relative_to_full_name("@", "example.com."), "example.com");
        assert_eq!(relative_to_full_name("", "example.com."), "example.com");
    }
}
