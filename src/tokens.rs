//! Token Metadata
//!
//! Static registry of the coin types the agent trades in, and decimal
//! conversion between human amounts and base units (1 SUI = 1e9 MIST).

use anyhow::{anyhow, Result};

/// Metadata for a supported token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub symbol: &'static str,
    pub decimals: u32,
    pub coin_type: &'static str,
}

/// SUI coin type tag.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Number of MIST per SUI.
pub const MIST_PER_SUI: u64 = 1_000_000_000;

/// Metadata for the native coin.
pub const SUI: TokenMetadata = TokenMetadata {
    symbol: "SUI",
    decimals: 9,
    coin_type: SUI_COIN_TYPE,
};

const TOKENS: &[TokenMetadata] = &[
    SUI,
    TokenMetadata {
        symbol: "wUSDC",
        decimals: 6,
        coin_type: "0x5d4b302506645c37ff133b98c4b50a5ae14841659738d6d733d59d0d217a93bf::coin::COIN",
    },
    TokenMetadata {
        symbol: "USDC",
        decimals: 6,
        coin_type: "0xdba34672e30cb065b1f93e3ab55318768fd6fef66c15942c9f7cb846e2f900e7::usdc::USDC",
    },
    TokenMetadata {
        symbol: "USDT",
        decimals: 6,
        coin_type: "0xc060006111016b8a020ad5b33834984a437aaa7d3c74c18e09a95d48aceab08c::coin::COIN",
    },
    TokenMetadata {
        symbol: "DEEP",
        decimals: 6,
        coin_type: "0xdeeb7a4662eec9f2f3def03fb937a663dddaa2e215b8078a284d026b7946c270::deep::DEEP",
    },
    TokenMetadata {
        symbol: "BUCK",
        decimals: 9,
        coin_type: "0xce7ff77a83ea0cb6fd39bd8748e2ec89a3f41e8efdc3f4eb123e0ca37b184db2::buck::BUCK",
    },
    TokenMetadata {
        symbol: "CETUS",
        decimals: 9,
        coin_type: "0x06864a6f921804860930db6ddbe2e16acdf8504495ea7481637a1c8b9a8fe54b::cetus::CETUS",
    },
    TokenMetadata {
        symbol: "WETH",
        decimals: 8,
        coin_type: "0xaf8cd5edc19c4512f4259f0bee101a40d41ebed738ade5874359610ef8eeced5::coin::COIN",
    },
    TokenMetadata {
        symbol: "HIPPO",
        decimals: 9,
        coin_type: "0x8993129d72e733985f7f1a00396cbd055bad6f817fee36576ce483c8bbb8b87b::sudeng::SUDENG",
    },
];

/// Look up token metadata by symbol (case-insensitive).
pub fn get_token_metadata(symbol: &str) -> Option<&'static TokenMetadata> {
    TOKENS
        .iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(symbol))
}

/// Convert a decimal amount string into base units for the given token.
///
/// Integer-exact: fails on more fractional digits than the token supports
/// rather than rounding.
pub fn to_base_units(amount: &str, meta: &TokenMetadata) -> Result<u64> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(anyhow!("Empty amount"));
    }

    let (whole, frac) = match amount.split_once('.') {
        Some((w, f)) => (w, f),
        None => (amount, ""),
    };

    if frac.len() > meta.decimals as usize {
        return Err(anyhow!(
            "Amount {} has more than {} decimal places",
            amount,
            meta.decimals
        ));
    }

    let whole: u64 = if whole.is_empty() {
        0
    } else {
        whole
            .parse()
            .map_err(|_| anyhow!("Invalid amount: {}", amount))?
    };

    let mut frac_units: u64 = 0;
    if !frac.is_empty() {
        frac_units = frac
            .parse()
            .map_err(|_| anyhow!("Invalid amount: {}", amount))?;
        frac_units *= 10u64.pow(meta.decimals - frac.len() as u32);
    }

    whole
        .checked_mul(10u64.pow(meta.decimals))
        .and_then(|w| w.checked_add(frac_units))
        .ok_or_else(|| anyhow!("Amount {} overflows u64 base units", amount))
}

/// Convert SUI (as a decimal string) to MIST.
pub fn sui_to_mist(amount: &str) -> Result<u64> {
    to_base_units(amount, &SUI)
}

/// Format a MIST amount as SUI with the given number of decimal places.
pub fn mist_to_sui_string(mist: u64, places: usize) -> String {
    format!("{:.*}", places, mist as f64 / MIST_PER_SUI as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(get_token_metadata("sui").unwrap().decimals, 9);
        assert_eq!(get_token_metadata("Usdc").unwrap().decimals, 6);
        assert!(get_token_metadata("DOGE").is_none());
    }

    #[test]
    fn test_sui_to_mist() {
        assert_eq!(sui_to_mist("1").unwrap(), 1_000_000_000);
        assert_eq!(sui_to_mist("0.1").unwrap(), 100_000_000);
        assert_eq!(sui_to_mist("0.5").unwrap(), 500_000_000);
        assert_eq!(sui_to_mist("2.000000001").unwrap(), 2_000_000_001);
        assert_eq!(sui_to_mist(".25").unwrap(), 250_000_000);
    }

    #[test]
    fn test_to_base_units_rejects_excess_precision() {
        assert!(sui_to_mist("1.0000000001").is_err());
        let usdc = get_token_metadata("USDC").unwrap();
        assert!(to_base_units("1.1234567", usdc).is_err());
        assert_eq!(to_base_units("1.123456", usdc).unwrap(), 1_123_456);
    }

    #[test]
    fn test_to_base_units_rejects_garbage() {
        assert!(sui_to_mist("").is_err());
        assert!(sui_to_mist("abc").is_err());
        assert!(sui_to_mist("1.2.3").is_err());
        assert!(sui_to_mist("-1").is_err());
    }

    #[test]
    fn test_mist_to_sui_string() {
        assert_eq!(mist_to_sui_string(1_500_000_000, 2), "1.50");
        assert_eq!(mist_to_sui_string(0, 2), "0.00");
        assert_eq!(mist_to_sui_string(123_456_789, 4), "0.1235");
    }
}
