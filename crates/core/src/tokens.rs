//! Token (credit) rules: generation cost and purchasable packages.

use serde::Serialize;

use crate::error::CoreError;

/// Tokens debited when a generation is recorded as a creation.
pub const GENERATION_COST: i32 = 1;

/// A purchasable bundle of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenPackage {
    pub amount: i32,
    /// Price in US cents.
    pub price_cents: i32,
    pub popular: bool,
}

pub const TOKEN_PACKAGES: &[TokenPackage] = &[
    TokenPackage {
        amount: 10,
        price_cents: 499,
        popular: false,
    },
    TokenPackage {
        amount: 25,
        price_cents: 999,
        popular: true,
    },
    TokenPackage {
        amount: 50,
        price_cents: 1899,
        popular: false,
    },
    TokenPackage {
        amount: 100,
        price_cents: 3499,
        popular: false,
    },
];

/// Find the package matching a requested token amount.
pub fn find_package(amount: i32) -> Result<&'static TokenPackage, CoreError> {
    TOKEN_PACKAGES
        .iter()
        .find(|p| p.amount == amount)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "No token package of {amount} tokens. Available: {}",
                TOKEN_PACKAGES
                    .iter()
                    .map(|p| p.amount.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_existing_package() {
        let pkg = find_package(25).unwrap();
        assert_eq!(pkg.price_cents, 999);
        assert!(pkg.popular);
    }

    #[test]
    fn rejects_unknown_amount() {
        let err = find_package(7).unwrap_err();
        assert!(err.to_string().contains("10, 25, 50, 100"));
    }

    #[test]
    fn exactly_one_popular_package() {
        assert_eq!(TOKEN_PACKAGES.iter().filter(|p| p.popular).count(), 1);
    }
}
