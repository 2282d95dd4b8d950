//! Sui keypair decoding and address derivation.
//!
//! Secret keys arrive in three encodings depending on the source: the wallet
//! standard bech32 `suiprivkey...`, base64 (optionally with a leading scheme
//! flag byte), or raw hex. Only ed25519 keys are supported.

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use sui_crypto::ed25519::Ed25519PrivateKey;
use sui_sdk_types as sui;

/// Decode a secret key string into its 32 raw ed25519 bytes.
///
/// Accepted formats, tried in order:
/// 1. bech32 `suiprivkey...` (33-byte payload: scheme flag || key)
/// 2. base64 (32 bytes, or 33 with a leading 0x00 ed25519 flag)
/// 3. hex, with or without a `0x` prefix (same length rules)
pub fn decode_secret_key(raw: &str) -> Result<[u8; 32]> {
    let key_part = raw.trim();
    if key_part.is_empty() {
        return Err(anyhow!("Empty secret key"));
    }

    if key_part.starts_with("suiprivkey") {
        let (hrp, data, _variant) =
            bech32::decode(key_part).context("Failed to decode bech32 secret key")?;
        if hrp != "suiprivkey" {
            return Err(anyhow!("Invalid bech32 hrp: {}", hrp));
        }
        let bytes: Vec<u8> = bech32::FromBase32::from_base32(&data)
            .context("Invalid bech32 payload")?;
        if bytes.len() != 33 {
            return Err(anyhow!("bech32 payload must be 33 bytes (flag || key)"));
        }
        if bytes[0] != 0x00 {
            return Err(anyhow!(
                "Unsupported key scheme flag 0x{:02x}; only ed25519 is supported",
                bytes[0]
            ));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes[1..]);
        return Ok(arr);
    }

    // A 64-char hex key is also valid base64, so hex-shaped strings are
    // decoded as hex first.
    let hex_str = key_part.strip_prefix("0x").unwrap_or(key_part);
    let looks_hex = matches!(hex_str.len(), 64 | 66)
        && hex_str.chars().all(|c| c.is_ascii_hexdigit());

    let bytes = if looks_hex {
        hex::decode(hex_str).context("Failed to decode hex secret key")?
    } else {
        match STANDARD.decode(key_part) {
            Ok(v) => v,
            Err(_) => {
                hex::decode(hex_str).context("Secret key is neither bech32, base64, nor hex")?
            }
        }
    };

    strip_flag_byte(bytes)
}

/// Drop a leading ed25519 scheme flag if present and check the length.
fn strip_flag_byte(mut bytes: Vec<u8>) -> Result<[u8; 32]> {
    if bytes.len() == 33 {
        if bytes[0] != 0x00 {
            return Err(anyhow!(
                "Unsupported key scheme flag 0x{:02x}; only ed25519 is supported",
                bytes[0]
            ));
        }
        bytes = bytes[1..].to_vec();
    }
    if bytes.len() != 32 {
        return Err(anyhow!(
            "Secret key must be 32 bytes, got {}",
            bytes.len()
        ));
    }
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}

/// Derive the Sui address for a raw ed25519 secret key.
pub fn derive_address(secret_key_bytes: &[u8; 32]) -> sui::Address {
    let signing_key = ed25519_dalek::SigningKey::from_bytes(secret_key_bytes);
    let verifying_key = signing_key.verifying_key();
    let mut pk_bytes = [0u8; 32];
    pk_bytes.copy_from_slice(verifying_key.as_bytes());

    let sui_public_key = sui::Ed25519PublicKey::new(pk_bytes);
    sui_public_key.derive_address()
}

/// Load a signer from a secret key string in any supported encoding.
pub fn load_keypair(raw: &str) -> Result<(sui::Address, Ed25519PrivateKey)> {
    let bytes = decode_secret_key(raw)?;
    let address = derive_address(&bytes);
    let sk = Ed25519PrivateKey::new(bytes);
    Ok((address, sk))
}
