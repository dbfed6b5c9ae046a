//! Durable cache behavior across store instances

use swapdesk::chrono::Duration;
use swapdesk::storage::{read_fresh, write_now, CacheEntry, CacheStore, FileStore};
use swapdesk::{Token, TokenAddress};

fn usdc() -> Token {
	Token::new(
		1,
		"0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
			.parse::<TokenAddress>()
			.unwrap(),
		"USDC",
		"USD Coin",
		6,
	)
}

#[tokio::test]
async fn entries_survive_reopening_the_store() {
	let dir = tempfile::tempdir().unwrap();
	let key = "swapdesk.token.metadata.v1.1";

	{
		let store = FileStore::new(dir.path());
		write_now(&store, key, &vec![usdc()]).await.unwrap();
	}

	let reopened = FileStore::new(dir.path());
	let tokens: Option<Vec<Token>> = read_fresh(&reopened, key, Duration::minutes(30)).await;
	assert_eq!(tokens, Some(vec![usdc()]));
}

#[tokio::test]
async fn corrupt_payload_reads_as_a_miss() {
	let dir = tempfile::tempdir().unwrap();
	let store = FileStore::new(dir.path());

	store
		.write_raw("swapdesk.networks.v1", "{truncated".to_string())
		.await
		.unwrap();

	let networks: Option<Vec<swapdesk::Network>> =
		read_fresh(&store, "swapdesk.networks.v1", Duration::minutes(30)).await;
	assert_eq!(networks, None);
}

#[tokio::test]
async fn expired_entries_read_as_a_miss_but_stay_on_disk() {
	let dir = tempfile::tempdir().unwrap();
	let store = FileStore::new(dir.path());
	let key = "swapdesk.token.metadata.v1.1";

	let stale = CacheEntry {
		data: vec![usdc()],
		updated_at: swapdesk::chrono::Utc::now() - Duration::minutes(31),
	};
	store
		.write_raw(key, swapdesk::serde_json::to_string(&stale).unwrap())
		.await
		.unwrap();

	let tokens: Option<Vec<Token>> = read_fresh(&store, key, Duration::minutes(30)).await;
	assert_eq!(tokens, None);
	// The raw payload is untouched; only reads apply the TTL.
	assert!(store.read_raw(key).await.unwrap().is_some());
}

#[tokio::test]
async fn removal_is_idempotent() {
	let dir = tempfile::tempdir().unwrap();
	let store = FileStore::new(dir.path());

	write_now(&store, "k", &1u32).await.unwrap();
	store.remove("k").await.unwrap();
	store.remove("k").await.unwrap();
	assert!(store.read_raw("k").await.unwrap().is_none());
}
