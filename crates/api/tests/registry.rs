//! Unit tests for `ConnectionRegistry`.
//!
//! These tests exercise the connection registry directly, without
//! performing any HTTP upgrades. They verify the connecting →
//! authenticated lifecycle, per-user fan-out, idempotent unregister,
//! bounded-queue overflow, and graceful shutdown behaviour.

use assert_matches::assert_matches;
use axum::extract::ws::Message;
use clipflow_api::ws::registry::PUSH_QUEUE_CAPACITY;
use clipflow_api::ws::ConnectionRegistry;
use tokio::sync::broadcast::error::TryRecvError;

// ---------------------------------------------------------------------------
// Test: new registry starts with zero connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_registry_has_zero_connections() {
    let registry = ConnectionRegistry::new();

    assert_eq!(registry.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: register/unregister lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_and_unregister_adjust_count() {
    let registry = ConnectionRegistry::new();

    let _rx = registry.register("conn-1".to_string()).await;
    assert_eq!(registry.connection_count().await, 1);

    registry.unregister("conn-1").await;
    assert_eq!(registry.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: duplicate unregister is a no-op
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_unregister_is_noop() {
    let registry = ConnectionRegistry::new();

    let _rx = registry.register("conn-1".to_string()).await;
    registry.unregister("conn-1").await;
    registry.unregister("conn-1").await;
    registry.unregister("nonexistent").await;

    assert_eq!(registry.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: unauthenticated connections receive no pushes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unauthenticated_connection_receives_nothing() {
    let registry = ConnectionRegistry::new();

    let mut rx = registry.register("conn-1".to_string()).await;

    let sent = registry
        .send_to_user(42, Message::Text("hello".into()))
        .await;

    assert_eq!(sent, 0);
    assert_matches!(rx.try_recv(), Err(TryRecvError::Empty));
    assert!(registry.active_connections(42).await.is_empty());
}

// ---------------------------------------------------------------------------
// Test: authenticate promotes the connection to push eligibility
// ---------------------------------------------------------------------------

#[tokio::test]
async fn authenticated_connection_receives_pushes() {
    let registry = ConnectionRegistry::new();

    let mut rx = registry.register("conn-1".to_string()).await;
    assert!(registry.authenticate("conn-1", 42).await);

    assert_eq!(registry.active_connections(42).await, vec!["conn-1"]);

    let sent = registry
        .send_to_user(42, Message::Text("hello".into()))
        .await;
    assert_eq!(sent, 1);

    let msg = rx.recv().await.expect("should receive the push");
    assert!(matches!(&msg, Message::Text(t) if *t == "hello"));
}

// ---------------------------------------------------------------------------
// Test: authenticating a vanished connection reports failure
// ---------------------------------------------------------------------------

#[tokio::test]
async fn authenticate_after_disconnect_returns_false() {
    let registry = ConnectionRegistry::new();

    let _rx = registry.register("conn-1".to_string()).await;
    registry.unregister("conn-1").await;

    assert!(!registry.authenticate("conn-1", 42).await);
}

// ---------------------------------------------------------------------------
// Test: fan-out reaches every connection of the user and nobody else
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_to_user_targets_only_that_users_connections() {
    let registry = ConnectionRegistry::new();

    let mut rx1 = registry.register("conn-1".to_string()).await;
    let mut rx2 = registry.register("conn-2".to_string()).await;
    let mut rx3 = registry.register("conn-3".to_string()).await;
    registry.authenticate("conn-1", 1).await;
    registry.authenticate("conn-2", 1).await;
    registry.authenticate("conn-3", 2).await;

    let sent = registry
        .send_to_user(1, Message::Text("for user one".into()))
        .await;
    assert_eq!(sent, 2);

    let msg1 = rx1.recv().await.expect("device 1 should receive");
    let msg2 = rx2.recv().await.expect("device 2 should receive");
    assert!(matches!(&msg1, Message::Text(t) if *t == "for user one"));
    assert!(matches!(&msg2, Message::Text(t) if *t == "for user one"));

    assert_matches!(rx3.try_recv(), Err(TryRecvError::Empty));
}

// ---------------------------------------------------------------------------
// Test: disconnecting one device still delivers to the other
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delivery_survives_one_device_disconnecting() {
    let registry = ConnectionRegistry::new();

    let _rx1 = registry.register("conn-1".to_string()).await;
    let mut rx2 = registry.register("conn-2".to_string()).await;
    registry.authenticate("conn-1", 1).await;
    registry.authenticate("conn-2", 1).await;

    registry.unregister("conn-1").await;

    let sent = registry
        .send_to_user(1, Message::Text("still delivered".into()))
        .await;
    assert_eq!(sent, 1);

    let msg = rx2.recv().await.expect("remaining device should receive");
    assert!(matches!(&msg, Message::Text(t) if *t == "still delivered"));
}

// ---------------------------------------------------------------------------
// Test: per-connection delivery order follows send order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pushes_arrive_in_send_order() {
    let registry = ConnectionRegistry::new();

    let mut rx = registry.register("conn-1".to_string()).await;
    registry.authenticate("conn-1", 1).await;

    for i in 0..3 {
        registry
            .send_to_user(1, Message::Text(format!("msg-{i}").into()))
            .await;
    }

    for i in 0..3 {
        let msg = rx.recv().await.expect("should receive in order");
        let expected = format!("msg-{i}");
        assert!(matches!(&msg, Message::Text(t) if *t == expected.as_str()));
    }
}

// ---------------------------------------------------------------------------
// Test: queue overflow drops the oldest pushes, keeps the newest
// ---------------------------------------------------------------------------

#[tokio::test]
async fn overflow_drops_oldest_pushes() {
    let registry = ConnectionRegistry::new();

    let mut rx = registry.register("conn-1".to_string()).await;
    registry.authenticate("conn-1", 1).await;

    let total = PUSH_QUEUE_CAPACITY * 2;
    for i in 0..total {
        registry
            .send_to_user(1, Message::Text(format!("msg-{i}").into()))
            .await;
    }

    // The receiver lagged: the oldest frames are gone.
    assert_matches!(rx.try_recv(), Err(TryRecvError::Lagged(_)));

    // Everything still queued arrives in order and ends with the newest.
    let mut received = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(Message::Text(t)) => received.push(t.to_string()),
            Ok(_) => {}
            Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }

    assert!(!received.is_empty());
    assert!(received.len() <= PUSH_QUEUE_CAPACITY);
    assert_eq!(received.last().unwrap(), &format!("msg-{}", total - 1));
}

// ---------------------------------------------------------------------------
// Test: shutdown_all sends Close and clears all connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_all_sends_close_and_clears() {
    let registry = ConnectionRegistry::new();

    let mut rx1 = registry.register("conn-1".to_string()).await;
    let mut rx2 = registry.register("conn-2".to_string()).await;
    registry.authenticate("conn-1", 1).await;
    assert_eq!(registry.connection_count().await, 2);

    registry.shutdown_all().await;

    // Connection count should be zero after shutdown.
    assert_eq!(registry.connection_count().await, 0);

    // Both receivers should have received a Close message.
    let msg1 = rx1.recv().await.expect("rx1 should receive Close");
    assert!(
        matches!(msg1, Message::Close(None)),
        "Expected Close(None), got: {msg1:?}"
    );

    let msg2 = rx2.recv().await.expect("rx2 should receive Close");
    assert!(
        matches!(msg2, Message::Close(None)),
        "Expected Close(None), got: {msg2:?}"
    );

    // After Close, the channel is closed (no more messages).
    assert!(
        rx1.recv().await.is_err(),
        "Channel should be closed after shutdown"
    );
}

// ---------------------------------------------------------------------------
// Test: registering with a duplicate ID replaces the previous connection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_id_replaces_previous_connection() {
    let registry = ConnectionRegistry::new();

    let _rx_old = registry.register("conn-1".to_string()).await;
    assert_eq!(registry.connection_count().await, 1);

    // Re-register with the same ID -- should replace, not duplicate.
    let mut rx_new = registry.register("conn-1".to_string()).await;
    registry.authenticate("conn-1", 1).await;
    assert_eq!(registry.connection_count().await, 1);

    registry
        .send_to_user(1, Message::Text("replaced".into()))
        .await;
    let msg = rx_new.recv().await.expect("new rx should receive message");
    assert!(matches!(&msg, Message::Text(t) if *t == "replaced"));
}
