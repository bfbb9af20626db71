use std::sync::Arc;
use std::time::Duration;

use action_primitives::memory::{MemoryNode, MemoryPage};
use consign_core_types::{EntityId, SellerRecord};
use display_sync::{ReconcileConfig, Reconciler, TickOutcome};
use network_tap_light::RecordCache;
use perceiver_structural::EntityResolver;

const LABEL: &str = ".MuiTypography-root.MuiTypography-body2";
const EMAIL: &str = r#"p[data-testid="seller-email"]"#;
const NAME: &str = r#"p[data-testid="seller-name"]"#;
const PHONE: &str = r#"p[data-testid="seller-phone"]"#;

fn record(email: &str) -> SellerRecord {
    SellerRecord {
        email: Some(email.into()),
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        ..SellerRecord::default()
    }
}

fn listing_page(id: &str) -> Arc<MemoryPage> {
    let page = Arc::new(MemoryPage::new());
    page.mount(LABEL, MemoryNode::html(format!("Coat<br>ID: {id}"), ""));
    page.mount(EMAIL, MemoryNode::text("Consignor: hidden"));
    page.mount(NAME, MemoryNode::text("Consignor: hidden"));
    page.mount(PHONE, MemoryNode::text("Consignor: hidden"));
    page
}

fn reconciler(page: &Arc<MemoryPage>, cache: &RecordCache) -> Reconciler<MemoryPage> {
    Reconciler::new(
        Arc::clone(page),
        EntityResolver::default(),
        cache.clone(),
        ReconcileConfig::default(),
    )
}

fn id(raw: &str) -> EntityId {
    EntityId::parse(raw).unwrap()
}

#[tokio::test]
async fn no_label_is_a_no_op() {
    let page = Arc::new(MemoryPage::new());
    page.mount(EMAIL, MemoryNode::text("Consignor: hidden"));
    let cache = RecordCache::new();
    cache.upsert(id("L1"), record("a@b.com"));

    let outcome = reconciler(&page, &cache).tick().await.unwrap();

    assert_eq!(outcome, TickOutcome::NoEntity);
    assert_eq!(page.snapshot(EMAIL).unwrap().text_writes, 0);
}

#[tokio::test]
async fn uncached_entity_is_a_no_op() {
    let page = listing_page("L1");
    let cache = RecordCache::new();

    let outcome = reconciler(&page, &cache).tick().await.unwrap();

    assert_eq!(outcome, TickOutcome::NotCached(id("L1")));
    assert_eq!(page.snapshot(EMAIL).unwrap().text, "Consignor: hidden");
}

#[tokio::test]
async fn repeated_ticks_write_each_value_once() {
    let page = listing_page("L1");
    let cache = RecordCache::new();
    cache.upsert(id("L1"), record("a@b.com"));
    let reconciler = reconciler(&page, &cache);

    let first = reconciler.tick().await.unwrap();
    assert_eq!(
        first,
        TickOutcome::Synced {
            entity: id("L1"),
            writes: 2
        }
    );
    for _ in 0..5 {
        let again = reconciler.tick().await.unwrap();
        assert_eq!(
            again,
            TickOutcome::Synced {
                entity: id("L1"),
                writes: 0
            }
        );
    }

    let email = page.snapshot(EMAIL).unwrap();
    assert_eq!(email.text, "Consignor: a@b.com");
    assert_eq!(email.text_writes, 1);
    assert_eq!(page.snapshot(NAME).unwrap().text_writes, 1);
    // no phone in the record, node left untouched
    assert_eq!(page.snapshot(PHONE).unwrap().text_writes, 0);
}

#[tokio::test]
async fn cache_update_triggers_one_more_write() {
    let page = listing_page("L1");
    let cache = RecordCache::new();
    cache.upsert(id("L1"), record("a@b.com"));
    let reconciler = reconciler(&page, &cache);

    reconciler.tick().await.unwrap();
    cache.upsert(id("L1"), record("new@b.com"));
    reconciler.tick().await.unwrap();
    reconciler.tick().await.unwrap();

    let email = page.snapshot(EMAIL).unwrap();
    assert_eq!(email.text, "Consignor: new@b.com");
    assert_eq!(email.text_writes, 2);
    assert_eq!(page.snapshot(NAME).unwrap().text_writes, 1);
}

#[tokio::test(start_paused = true)]
async fn spawned_loop_syncs_late_records_and_stops_on_shutdown() {
    let page = listing_page("L1");
    let cache = RecordCache::new();
    let handle = Arc::new(reconciler(&page, &cache)).spawn();
    assert!(handle.is_running());

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(page.snapshot(EMAIL).unwrap().text_writes, 0);

    cache.upsert(id("L1"), record("a@b.com"));
    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(page.snapshot(EMAIL).unwrap().text, "Consignor: a@b.com");

    handle.shutdown().await.unwrap();

    cache.upsert(id("L1"), record("after@b.com"));
    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(page.snapshot(EMAIL).unwrap().text, "Consignor: a@b.com");
    assert_eq!(page.snapshot(EMAIL).unwrap().text_writes, 1);
}
