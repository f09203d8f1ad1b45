/// Integration test for the per-display refresh loop
///
/// Tests the following scenarios:
/// 1. First cycle always publishes a versioned status
/// 2. Unchanged content keeps its version across cycles
/// 3. Changed content mints a fresh, non-colliding version
/// 4. Failed cycles leave the previously published status untouched
/// 5. The loop keeps running through failures and recovers on success
/// 6. Cancellation stops the loop without corrupting the status
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use epaperd::engine::{DisplayUpdater, StatusCache};
use epaperd::source::{Artifact, ContentSource, SourceError};

/// Content source that replays a pre-scripted sequence of outcomes
#[derive(Debug)]
struct ScriptedSource {
    interval: Duration,
    script: Mutex<VecDeque<Result<Artifact, SourceError>>>,
}

impl ScriptedSource {
    fn new(interval: Duration, script: Vec<Result<Artifact, SourceError>>) -> Self {
        Self { interval, script: Mutex::new(script.into_iter().collect()) }
    }
}

#[async_trait]
impl ContentSource for ScriptedSource {
    fn refresh_interval(&self) -> Duration {
        self.interval
    }

    async fn produce(&self) -> Result<Artifact, SourceError> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(SourceError::Upstream("script exhausted".to_string())))
    }
}

fn frame(body: &'static [u8]) -> Artifact {
    Artifact { bytes: Bytes::from_static(body), content_type: "image/png".to_string() }
}

fn upstream_failure() -> Result<Artifact, SourceError> {
    Err(SourceError::Upstream("connection refused".to_string()))
}

/// Updater wired to a fresh single-display cache
fn updater_with_cache(
    script: Vec<Result<Artifact, SourceError>>,
    interval: Duration,
) -> (DisplayUpdater, StatusCache) {
    let cache = StatusCache::new(["kitchen".to_string()]);
    let updater = DisplayUpdater::new(
        "kitchen".to_string(),
        Box::new(ScriptedSource::new(interval, script)),
        cache.slot("kitchen").unwrap(),
        CancellationToken::new(),
    );
    (updater, cache)
}

#[tokio::test(start_paused = true)]
async fn first_cycle_publishes_a_versioned_status() {
    let (mut updater, cache) =
        updater_with_cache(vec![Ok(frame(b"frame one"))], Duration::from_secs(30));

    assert!(cache.read("kitchen").await.is_none());
    updater.refresh_once().await.expect("first cycle should succeed");

    let status = cache.read("kitchen").await.expect("status must be published");
    assert_eq!(status.version.len(), 32);
    assert_eq!(&status.artifact.bytes[..], b"frame one");
    // next_update = now + interval + 20s margin
    assert_eq!(status.next_update, Instant::now() + Duration::from_secs(50));
}

#[tokio::test(start_paused = true)]
async fn unchanged_content_keeps_its_version() {
    let (mut updater, cache) = updater_with_cache(
        vec![Ok(frame(b"frame one")), Ok(frame(b"frame one"))],
        Duration::from_secs(30),
    );

    updater.refresh_once().await.unwrap();
    let first = cache.read("kitchen").await.unwrap();

    tokio::time::advance(Duration::from_secs(30)).await;
    updater.refresh_once().await.unwrap();
    let second = cache.read("kitchen").await.unwrap();

    assert_eq!(first.version, second.version);
    // the freshness window still moves forward
    assert!(second.next_update > first.next_update);
}

#[tokio::test(start_paused = true)]
async fn changed_content_mints_a_new_version() {
    let (mut updater, cache) = updater_with_cache(
        vec![Ok(frame(b"frame one")), Ok(frame(b"frame two"))],
        Duration::from_secs(30),
    );

    updater.refresh_once().await.unwrap();
    let first = cache.read("kitchen").await.unwrap();

    updater.refresh_once().await.unwrap();
    let second = cache.read("kitchen").await.unwrap();

    assert_ne!(first.version, second.version);
    assert_eq!(&second.artifact.bytes[..], b"frame two");
}

#[tokio::test(start_paused = true)]
async fn failed_cycles_leave_the_published_status_untouched() {
    let (mut updater, cache) = updater_with_cache(
        vec![
            Ok(frame(b"frame one")),
            upstream_failure(),
            upstream_failure(),
            upstream_failure(),
            Ok(frame(b"frame two")),
        ],
        Duration::from_secs(30),
    );

    updater.refresh_once().await.unwrap();
    let published = cache.read("kitchen").await.unwrap();

    for _ in 0..3 {
        updater.refresh_once().await.expect_err("scripted failure");
        let still = cache.read("kitchen").await.expect("status must stay readable");
        assert_eq!(still.version, published.version);
        assert_eq!(&still.artifact.bytes[..], b"frame one");
    }

    updater.refresh_once().await.unwrap();
    let recovered = cache.read("kitchen").await.unwrap();
    assert_ne!(recovered.version, published.version);
    assert_eq!(&recovered.artifact.bytes[..], b"frame two");
}

#[tokio::test(start_paused = true)]
async fn failure_on_the_very_first_cycle_publishes_nothing() {
    let (mut updater, cache) =
        updater_with_cache(vec![upstream_failure()], Duration::from_secs(30));

    updater.refresh_once().await.expect_err("scripted failure");
    assert!(cache.read("kitchen").await.is_none());
}

#[tokio::test]
async fn loop_publishes_and_stops_on_cancellation() {
    let cache = StatusCache::new(["kitchen".to_string()]);
    let cancel = CancellationToken::new();
    let script = vec![
        Ok(frame(b"frame one")),
        Ok(frame(b"frame one")),
        Ok(frame(b"frame two")),
        Ok(frame(b"frame two")),
        Ok(frame(b"frame two")),
    ];
    let updater = DisplayUpdater::new(
        "kitchen".to_string(),
        Box::new(ScriptedSource::new(Duration::from_millis(20), script)),
        cache.slot("kitchen").unwrap(),
        cancel.clone(),
    );

    let handle = tokio::spawn(updater.run());

    // wait for the first publish
    let mut status = None;
    for _ in 0..100 {
        status = cache.read("kitchen").await;
        if status.is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let status = status.expect("loop should publish within the test window");
    assert_eq!(status.version.len(), 32);

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("loop should stop promptly after cancellation")
        .expect("updater task should not panic");

    // the last published status survives shutdown
    assert!(cache.read("kitchen").await.is_some());
}
