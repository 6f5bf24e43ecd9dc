//! Suspendable Operation Tests
//!
//! Tests for the `_async` wrapper variants:
//! - The scope stays open across suspension points until the future settles
//! - Commit/abort/error semantics are identical to the synchronous forms
//! - Interleaved suspended scopes on one object commit independently

use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::sleep;

use verstate::field::Field;
use verstate::scope::{AbortChange, AbortUpdate, UpdateError};
use verstate::tracked::Versioned;
use verstate::version::Version;

static VALUE: Field<i64> = Field::new("value", || 0);
static NAME: Field<String> = Field::new("name", || String::from("default"));

/// A suspendable mutating operation with a suspension point mid-body.
async fn increment(obj: &Versioned, amount: i64) -> i64 {
    obj.changes_async(|cx| async move {
        sleep(Duration::from_millis(5)).await;
        let value = cx.modify(&VALUE, |v| {
            *v += amount;
            *v
        });
        Ok(value)
    })
    .await
}

// =============================================================================
// Suspendable Wrapper Tests
// =============================================================================

/// An async `changes` commits once when the future settles.
#[tokio::test]
async fn test_async_changes_commits() {
    let obj = Versioned::new();
    let initial_version = obj.version();

    let result = increment(&obj, 5).await;

    assert_eq!(result, 5);
    assert_eq!(obj.get(&VALUE), 5);
    assert_eq!(obj.version(), initial_version.next());
}

/// An async `waits` never moves the version.
#[tokio::test]
async fn test_async_waits_never_commits() {
    let obj = Versioned::new();
    obj.set(&VALUE, 42);
    let initial_version = obj.version();

    let result = obj
        .waits_async(async {
            sleep(Duration::from_millis(5)).await;
            obj.get(&VALUE)
        })
        .await;

    assert_eq!(result, 42);
    assert_eq!(obj.version(), initial_version);
}

/// A token held across awaits brackets exactly one mutation.
#[tokio::test]
async fn test_scope_token_survives_suspension() {
    let obj = Versioned::new();
    let initial_version = obj.version();

    let change = obj.change();
    change.set(&VALUE, 10);
    sleep(Duration::from_millis(5)).await;
    change.set(&NAME, "test".to_string());
    change.commit();

    assert_eq!(obj.get(&VALUE), 10);
    assert_eq!(obj.get(&NAME), "test");
    assert_eq!(obj.version(), initial_version.next());
}

// =============================================================================
// Suspendable Abort Tests
// =============================================================================

/// An abort after a suspension point still suppresses the commit.
#[tokio::test]
async fn test_async_abort_resolves_to_none() {
    let obj = Versioned::new();
    let initial_version = obj.version();

    let set_checked = |value: i64| {
        obj.updates_async(move |cx| async move {
            sleep(Duration::from_millis(5)).await;
            if value < 0 {
                return Err(AbortUpdate);
            }
            cx.set(&VALUE, value);
            Ok(value)
        })
    };

    let aborted = set_checked(-5).await;
    assert_eq!(aborted, None);
    assert_eq!(obj.version(), initial_version);

    let committed = set_checked(5).await;
    assert_eq!(committed, Some(5));
    assert_eq!(obj.version(), initial_version.next());
}

/// An abort in an async block keeps the writes already applied and skips
/// the commit, exactly like the synchronous form.
#[tokio::test]
async fn test_async_abort_keeps_side_effects() {
    let obj = Versioned::new();
    let initial_version = obj.version();

    let result = obj
        .updates_async(|cx| async move {
            cx.set(&VALUE, 5);
            sleep(Duration::from_millis(5)).await;
            Err::<(), _>(AbortUpdate)
        })
        .await;

    assert_eq!(result, None);
    assert_eq!(obj.version(), initial_version);
    assert_eq!(obj.get(&VALUE), 5);
}

/// The payload flavor works across suspension points too.
#[tokio::test]
async fn test_async_abort_payload_is_returned() {
    let obj = Versioned::new();

    let result = obj
        .changes_async(|_cx| async move {
            sleep(Duration::from_millis(5)).await;
            Err(AbortChange("Return this"))
        })
        .await;

    assert_eq!(result, "Return this");
    assert_eq!(obj.version(), Version::ZERO);
}

// =============================================================================
// Suspendable Error Pass-Through Tests
// =============================================================================

/// Non-signal errors pass through the suspendable wrappers unchanged,
/// with no commit.
#[tokio::test]
async fn test_async_error_passes_through() {
    #[derive(Debug, PartialEq)]
    struct Offline;

    let obj = Versioned::new();

    let result: Result<i64, Offline> = obj
        .try_changes_async(|cx| async move {
            cx.set(&VALUE, 3);
            sleep(Duration::from_millis(5)).await;
            Err(Offline.into())
        })
        .await;

    assert_eq!(result, Err(Offline));
    assert_eq!(obj.version(), Version::ZERO);
    assert_eq!(obj.get(&VALUE), 3);

    // The update flavor separates aborts from errors the same way.
    let result: Result<Option<i64>, Offline> = obj
        .try_updates_async(|cx| async move {
            cx.set(&VALUE, 4);
            Err(UpdateError::abort())
        })
        .await;

    assert_eq!(result, Ok(None));
    assert_eq!(obj.version(), Version::ZERO);
}

/// Cancelling a suspended mutation behaves like any other error: the
/// scope exits without committing, writes already applied are kept.
#[tokio::test]
async fn test_cancellation_abandons_the_scope() {
    let obj = Versioned::new();

    let attempt = obj.changes_async(|cx| async move {
        cx.set(&VALUE, 1);
        sleep(Duration::from_secs(3600)).await;
        Ok(())
    });
    let cancelled = tokio::time::timeout(Duration::from_millis(20), attempt).await;

    assert!(cancelled.is_err());
    assert_eq!(obj.version(), Version::ZERO);
    assert_eq!(obj.get(&VALUE), 1);
    assert_eq!(obj.metrics().abandons, 1);
}

// =============================================================================
// Nested Suspendable Operation Tests
// =============================================================================

/// Suspendable operations nest through the token like synchronous ones:
/// one commit at the outermost exit, inner aborts stop at their own
/// boundary.
#[tokio::test]
async fn test_nested_async_operations_commit_once() {
    let obj = Versioned::new();

    obj.changes_async(|cx| async move {
        cx.set(&VALUE, 1);

        let inner = cx
            .changes_async(|inner| async move {
                inner.set(&NAME, "inner".to_string());
                sleep(Duration::from_millis(5)).await;
                Ok(2)
            })
            .await;
        assert_eq!(inner, 2);

        let aborted = cx
            .updates_async(|inner| async move {
                inner.set(&VALUE, 9);
                Err::<(), _>(AbortUpdate)
            })
            .await;
        assert_eq!(aborted, None);

        Ok(())
    })
    .await;

    assert_eq!(obj.version(), Version::new(1));
    assert_eq!(obj.get(&NAME), "inner");
    assert_eq!(obj.get(&VALUE), 9);
}

// =============================================================================
// Interleaved Scope Tests
// =============================================================================

/// Concurrent suspended scopes on one object each commit independently.
#[tokio::test]
async fn test_concurrent_async_operations() {
    let obj = Versioned::new();
    let initial_version = obj.version();

    let results = join_all((1..=5).map(|amount| increment(&obj, amount))).await;

    // Every increment landed exactly once, in some interleaving.
    assert_eq!(obj.get(&VALUE), 15);
    assert_eq!(obj.version(), Version::new(initial_version.value() + 5));

    let mut sorted = results;
    sorted.sort_unstable();
    assert_eq!(sorted.len(), 5);
    // Each result is a strictly positive running total.
    assert!(sorted.iter().all(|v| *v > 0));
}
