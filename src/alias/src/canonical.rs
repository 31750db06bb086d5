//! Internal-form address canonicalization

use localmail_core::Canonicalizer;

/// Appends `@<myorigin>` to addresses that carry no domain
pub struct OriginCanonicalizer {
    origin: String,
}

impl OriginCanonicalizer {
    /// Create a canonicalizer for a local origin domain
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }

    /// The origin domain
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl Canonicalizer for OriginCanonicalizer {
    fn canonicalize(&self, address: &str) -> String {
        if address.contains('@') || address.is_empty() {
            address.to_string()
        } else {
            format!("{}@{}", address, self.origin)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_origin() {
        let canon = OriginCanonicalizer::new("example.com");
        assert_eq!(canon.canonicalize("owner-staff"), "owner-staff@example.com");
    }

    #[test]
    fn test_keeps_qualified_and_null_addresses() {
        let canon = OriginCanonicalizer::new("example.com");
        assert_eq!(canon.canonicalize("bob@example.org"), "bob@example.org");
        assert_eq!(canon.canonicalize(""), "");
    }
}
