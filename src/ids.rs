//! Random record identifiers

use crate::error::{MarketError, Result};

/// Generate `prefix` followed by 8 random bytes, hex encoded
pub fn generate_id(prefix: &str) -> Result<String> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| MarketError::Internal(format!("random source unavailable: {e}")))?;
    Ok(format!("{prefix}{}", hex::encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_carry_prefix_and_differ() {
        let a = generate_id("user-").unwrap();
        let b = generate_id("user-").unwrap();
        assert!(a.starts_with("user-"));
        assert_eq!(a.len(), "user-".len() + 16);
        assert!(a["user-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
