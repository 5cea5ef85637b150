//! End-to-end tests for the reminder driver.
//!
//! These run the real driver loop under tokio's paused clock: sleeping in the
//! test lets the interval fire deterministically, while a manual clock pins
//! the wall-clock minute the engine sees.

use dosette::testing::{FailingSink, FailingStore, ManualClock, RecordingSink};
use dosette::{MemoryStore, MinuteOfDay, ReminderDriver, ScheduleEntry, ScheduleStore};
use std::sync::Arc;
use std::time::Duration;

fn minute(m: u16) -> MinuteOfDay {
    MinuteOfDay::new(m).unwrap()
}

fn entry(name: &str, m: u16) -> ScheduleEntry {
    ScheduleEntry::new(name, "", "", minute(m)).unwrap()
}

/// Let spawned sink deliveries settle.
async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn fires_once_per_minute_despite_repeated_ticks() {
    let store = Arc::new(MemoryStore::with_entries(vec![
        entry("Aspirin", 540),
        entry("Iron", 480),
    ]));
    let sink = Arc::new(RecordingSink::new());
    let clock = Arc::new(ManualClock::new(minute(540)));

    let driver = ReminderDriver::new(store, sink.clone(), clock.clone())
        .with_warmup(Duration::from_secs(5))
        .with_cadence(Duration::from_secs(30));
    let (handle, _task) = driver.start();

    // Several automatic ticks pass while the clock stays at 09:00.
    tokio::time::sleep(Duration::from_secs(125)).await;
    settle().await;
    assert_eq!(sink.messages(), ["It's time to take Aspirin"]);

    // The clock moves on; nothing is scheduled at 09:01.
    clock.set(minute(541));
    tokio::time::sleep(Duration::from_secs(60)).await;
    settle().await;
    assert_eq!(sink.messages().len(), 1);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn rearms_when_the_minute_advances() {
    let store = Arc::new(MemoryStore::with_entries(vec![
        entry("Aspirin", 540),
        entry("Iron", 541),
    ]));
    let sink = Arc::new(RecordingSink::new());
    let clock = Arc::new(ManualClock::new(minute(540)));

    let driver = ReminderDriver::new(store, sink.clone(), clock.clone())
        .with_warmup(Duration::from_secs(5))
        .with_cadence(Duration::from_secs(30));
    let (handle, _task) = driver.start();

    tokio::time::sleep(Duration::from_secs(10)).await;
    settle().await;
    assert_eq!(sink.messages(), ["It's time to take Aspirin"]);

    clock.set(minute(541));
    tokio::time::sleep(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(
        sink.messages(),
        ["It's time to take Aspirin", "It's time to take Iron"]
    );

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn check_now_reannounces_within_the_same_minute() {
    let store = Arc::new(MemoryStore::with_entries(vec![entry("Aspirin", 540)]));
    let sink = Arc::new(RecordingSink::new());
    let clock = Arc::new(ManualClock::new(minute(540)));

    let driver = ReminderDriver::new(store, sink.clone(), clock)
        .with_warmup(Duration::from_secs(1))
        .with_cadence(Duration::from_secs(30));
    let (handle, _task) = driver.start();

    tokio::time::sleep(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(sink.messages().len(), 1);

    // Forced check bypasses the dedup guard.
    let event = handle.check_now().await.unwrap().unwrap();
    assert_eq!(event.minute.get(), 540);
    assert_eq!(event.matched, ["Aspirin"]);
    settle().await;
    assert_eq!(sink.messages().len(), 2);

    // Automatic ticks in the same minute stay suppressed afterwards.
    tokio::time::sleep(Duration::from_secs(90)).await;
    settle().await;
    assert_eq!(sink.messages().len(), 2);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn check_now_works_before_the_first_automatic_tick() {
    let store = Arc::new(MemoryStore::with_entries(vec![entry("Aspirin", 540)]));
    let sink = Arc::new(RecordingSink::new());
    let clock = Arc::new(ManualClock::new(minute(540)));

    // Warm-up far in the future: only the forced check can fire.
    let driver = ReminderDriver::new(store, sink.clone(), clock)
        .with_warmup(Duration::from_secs(3600))
        .with_cadence(Duration::from_secs(30));
    let (handle, _task) = driver.start();

    let event = handle.check_now().await.unwrap();
    assert!(event.is_some());
    settle().await;
    assert_eq!(sink.messages(), ["It's time to take Aspirin"]);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn combined_message_preserves_store_order() {
    let store = Arc::new(MemoryStore::with_entries(vec![
        entry("Vitamin D", 480),
        entry("Iron", 480),
    ]));
    let sink = Arc::new(RecordingSink::new());
    let clock = Arc::new(ManualClock::new(minute(480)));

    let driver = ReminderDriver::new(store, sink.clone(), clock)
        .with_warmup(Duration::from_secs(1))
        .with_cadence(Duration::from_secs(30));
    let (handle, _task) = driver.start();

    tokio::time::sleep(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(sink.messages(), ["It's time to take Vitamin D & Iron"]);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn entries_added_mid_session_are_picked_up() {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(RecordingSink::new());
    let clock = Arc::new(ManualClock::new(minute(540)));

    let driver = ReminderDriver::new(store.clone(), sink.clone(), clock)
        .with_warmup(Duration::from_secs(5))
        .with_cadence(Duration::from_secs(30));
    let (handle, _task) = driver.start();

    tokio::time::sleep(Duration::from_secs(10)).await;
    settle().await;
    assert!(sink.messages().is_empty());

    // The driver re-reads the store on every tick.
    store.append(entry("Aspirin", 540)).await.unwrap();
    tokio::time::sleep(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(sink.messages(), ["It's time to take Aspirin"]);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn failed_store_reads_do_not_stop_polling() {
    let sink = Arc::new(RecordingSink::new());
    let clock = Arc::new(ManualClock::new(minute(540)));

    let driver = ReminderDriver::new(Arc::new(FailingStore), sink.clone(), clock)
        .with_warmup(Duration::from_secs(1))
        .with_cadence(Duration::from_secs(30));
    let (handle, _task) = driver.start();

    tokio::time::sleep(Duration::from_secs(120)).await;
    settle().await;
    assert!(sink.messages().is_empty());

    // The loop is still alive and answering.
    assert!(handle.is_running().await);
    let event = handle.check_now().await.unwrap();
    assert!(event.is_none());

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn failed_sink_delivery_is_swallowed() {
    let store = Arc::new(MemoryStore::with_entries(vec![entry("Aspirin", 540)]));
    let clock = Arc::new(ManualClock::new(minute(540)));

    let driver = ReminderDriver::new(store, Arc::new(FailingSink), clock.clone())
        .with_warmup(Duration::from_secs(1))
        .with_cadence(Duration::from_secs(30));
    let (handle, _task) = driver.start();

    tokio::time::sleep(Duration::from_secs(60)).await;
    settle().await;

    // Delivery failed every time, but polling kept going and the forced
    // check still reports the match.
    assert!(handle.is_running().await);
    let event = handle.check_now().await.unwrap().unwrap();
    assert_eq!(event.matched, ["Aspirin"]);

    handle.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_driver() {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(RecordingSink::new());
    let clock = Arc::new(ManualClock::new(minute(0)));

    let driver = ReminderDriver::new(store, sink, clock);
    let (handle, task) = driver.start();

    assert!(handle.is_running().await);
    handle.shutdown().await.unwrap();
    assert!(!handle.is_running().await);

    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn restart_resets_the_dedup_guard() {
    let store = Arc::new(MemoryStore::with_entries(vec![entry("Aspirin", 540)]));
    let clock = Arc::new(ManualClock::new(minute(540)));

    let first_sink = Arc::new(RecordingSink::new());
    let driver = ReminderDriver::new(store.clone(), first_sink.clone(), clock.clone())
        .with_warmup(Duration::from_secs(1))
        .with_cadence(Duration::from_secs(30));
    let (handle, _task) = driver.start();
    tokio::time::sleep(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(first_sink.messages().len(), 1);
    handle.shutdown().await.unwrap();

    // A new session within the same minute fires again: the guard is
    // per-session state and is not persisted.
    let second_sink = Arc::new(RecordingSink::new());
    let driver = ReminderDriver::new(store, second_sink.clone(), clock)
        .with_warmup(Duration::from_secs(1))
        .with_cadence(Duration::from_secs(30));
    let (handle, _task) = driver.start();
    tokio::time::sleep(Duration::from_secs(5)).await;
    settle().await;
    assert_eq!(second_sink.messages().len(), 1);

    handle.shutdown().await.unwrap();
}
