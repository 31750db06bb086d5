//! Address canonicalization trait

/// Rewrites an address to internal canonical form
pub trait Canonicalizer: Send + Sync {
    /// Canonicalize an address
    fn canonicalize(&self, address: &str) -> String;
}
