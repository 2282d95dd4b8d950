//! SUI coin queries and the balance-wait helper.

use std::future::Future;

use anyhow::Result;
use sui_rpc::field::{FieldMask, FieldMaskUtil};
use sui_rpc::proto::sui::rpc::v2 as proto;
use sui_rpc::Client;
use sui_sdk_types as sui;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::error::ChainError;

const SUI_COIN_OBJECT_TYPE: &str = "0x2::coin::Coin<0x2::sui::SUI>";

/// List the sender's SUI coins as (reference, balance in MIST) pairs.
/// Follows `next_page_token` so holdings beyond one page are counted.
async fn list_sui_coins(
    client: &mut Client,
    owner: sui::Address,
) -> Result<Vec<(sui::ObjectReference, u64)>> {
    let mut state = client.state_client();

    let mut coins = Vec::new();
    let mut page_token = None;

    loop {
        let mut request = proto::ListOwnedObjectsRequest::default();
        request.owner = Some(owner.to_string());
        request.page_size = Some(100);
        request.page_token = page_token.take();
        request.read_mask = Some(FieldMask::from_paths([
            "object_id",
            "version",
            "digest",
            "object_type",
            "contents",
        ]));
        request.object_type = Some(SUI_COIN_OBJECT_TYPE.to_string());

        let resp = state
            .list_owned_objects(request)
            .await
            .map_err(|e| ChainError::RpcConnection(e.to_string()))?
            .into_inner();

        for obj in &resp.objects {
            if let Some(coin) = coin_from_object(obj)? {
                coins.push(coin);
            }
        }

        match resp.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    Ok(coins)
}

/// (reference, balance) for a listed coin object. `None` when the listing
/// entry is missing its reference fields.
fn coin_from_object(obj: &proto::Object) -> Result<Option<(sui::ObjectReference, u64)>> {
    let (Some(id_str), Some(version), Some(digest_str)) =
        (&obj.object_id, obj.version, &obj.digest)
    else {
        return Ok(None);
    };
    let object_id: sui::Address = id_str
        .parse()
        .map_err(|e| ChainError::Parse(format!("coin object_id: {}", e)))?;
    let digest = sui::Digest::from_base58(digest_str)
        .map_err(|e| ChainError::Parse(format!("coin digest: {}", e)))?;
    let object_ref = sui::ObjectReference::new(object_id, version, digest);

    let balance = obj
        .contents
        .as_ref()
        .and_then(|c| c.value.as_deref())
        .map(coin_balance_from_contents)
        .unwrap_or(0);
    Ok(Some((object_ref, balance)))
}

/// Coin<T> layout is { id: UID, balance: Balance<T> }: 32 bytes of UID, then
/// the balance as a little-endian u64.
fn coin_balance_from_contents(contents: &[u8]) -> u64 {
    if contents.len() >= 40 {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&contents[32..40]);
        u64::from_le_bytes(bytes)
    } else {
        0
    }
}

/// Total SUI held by an address, in MIST.
pub async fn get_sui_balance(client: &mut Client, owner: sui::Address) -> Result<u64> {
    let coins = list_sui_coins(client, owner).await?;
    let total = coins.iter().map(|(_, balance)| balance).sum();
    debug!(
        "Address {} holds {} MIST across {} coins",
        owner,
        total,
        coins.len()
    );
    Ok(total)
}

/// Pick the smallest SUI coin holding at least `min_balance` MIST. Smaller
/// coins first, so large coins stay intact for later splits.
pub async fn pick_gas_coin(
    client: &mut Client,
    owner: sui::Address,
    min_balance: u64,
) -> Result<Option<sui::ObjectReference>> {
    let mut coins = list_sui_coins(client, owner).await?;
    coins.retain(|(_, balance)| *balance >= min_balance);
    coins.sort_by_key(|(_, balance)| *balance);
    Ok(coins.into_iter().next().map(|(object_ref, _)| object_ref))
}

/// Poll `fetch` until it reports at least `required` MIST, sleeping
/// `interval` between attempts. Fetch failures count as attempts. Returns
/// the observed balance on success; never sleeps after the final attempt.
pub async fn wait_for_balance<F, Fut>(
    required: u64,
    max_attempts: u32,
    interval: Duration,
    mut fetch: F,
) -> Result<u64, ChainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<u64>>,
{
    let mut last_seen = 0u64;

    for attempt in 1..=max_attempts {
        match fetch().await {
            Ok(balance) => {
                last_seen = balance;
                if balance >= required {
                    debug!(
                        "Balance {} MIST >= required {} MIST on attempt {}",
                        balance, required, attempt
                    );
                    return Ok(balance);
                }
                debug!(
                    "Attempt {}/{}: balance {} MIST below required {} MIST",
                    attempt, max_attempts, balance, required
                );
            }
            Err(e) => warn!("Attempt {}/{}: balance query failed: {}", attempt, max_attempts, e),
        }

        if attempt < max_attempts {
            sleep(interval).await;
        }
    }

    Err(ChainError::BalanceWaitTimeout {
        last_seen,
        required,
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_coin_from_object() {
        let mut contents = proto::Bcs::default();
        let mut bcs = vec![0u8; 40];
        bcs[32..40].copy_from_slice(&750u64.to_le_bytes());
        contents.value = Some(bcs.into());

        let mut obj = proto::Object::default();
        obj.object_id = Some(
            "0x0000000000000000000000000000000000000000000000000000000000000042".to_string(),
        );
        obj.version = Some(3);
        // 32 zero bytes in base58
        obj.digest = Some("1".repeat(32));
        obj.contents = Some(contents);

        let (object_ref, balance) = coin_from_object(&obj).unwrap().unwrap();
        assert_eq!(object_ref.version(), 3);
        assert_eq!(balance, 750);

        // Listing entries without reference fields are skipped, not errors.
        let empty = proto::Object::default();
        assert!(coin_from_object(&empty).unwrap().is_none());
    }

    #[test]
    fn test_coin_balance_from_contents() {
        let mut contents = vec![0u8; 40];
        contents[32..40].copy_from_slice(&1_000_000_000u64.to_le_bytes());
        assert_eq!(coin_balance_from_contents(&contents), 1_000_000_000);
        assert_eq!(coin_balance_from_contents(&[0u8; 32]), 0);
        assert_eq!(coin_balance_from_contents(&[]), 0);
    }

    #[tokio::test]
    async fn test_wait_for_balance_succeeds_once_funded() {
        let calls = Arc::new(AtomicU64::new(0));
        let calls_clone = calls.clone();

        let result = wait_for_balance(100, 5, Duration::from_millis(1), move || {
            let calls = calls_clone.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(if n >= 3 { 150 } else { 10 })
            }
        })
        .await;

        assert_eq!(result.unwrap(), 150);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_wait_for_balance_times_out_with_last_seen() {
        let result = wait_for_balance(1_000, 3, Duration::from_millis(1), || async { Ok(40) }).await;

        match result {
            Err(ChainError::BalanceWaitTimeout {
                last_seen,
                required,
                attempts,
            }) => {
                assert_eq!(last_seen, 40);
                assert_eq!(required, 1_000);
                assert_eq!(attempts, 3);
            }
            other => panic!("expected BalanceWaitTimeout, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_wait_for_balance_tolerates_fetch_errors() {
        let calls = Arc::new(AtomicU64::new(0));
        let calls_clone = calls.clone();

        let result = wait_for_balance(50, 4, Duration::from_millis(1), move || {
            let calls = calls_clone.clone();
            async move {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n == 1 {
                    Err(anyhow::anyhow!("transient"))
                } else {
                    Ok(60)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 60);
    }

    #[tokio::test]
    async fn test_wait_for_balance_exact_threshold() {
        let result = wait_for_balance(100, 1, Duration::from_millis(1), || async { Ok(100) }).await;
        assert_eq!(result.unwrap(), 100);
    }
}
