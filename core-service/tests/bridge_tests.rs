//! End-to-end tests for the bridge service: dispatch by name, reply values,
//! notification ordering and the blocking delay.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bridge_traits::BridgeError;
use core_runtime::config::{BridgeConfig, NotificationConfig, LEGACY_MODULE_NAME};
use core_service::{BridgeService, ServiceError, GET_NUM_TRANSACTIONS};
use futures::future::join_all;
use serde_json::{json, Value};
use tokio::sync::mpsc;

fn plain_service() -> BridgeService {
    BridgeService::new(BridgeConfig::builder().build().unwrap()).unwrap()
}

fn notifying_service(delay: Duration) -> BridgeService {
    let config = BridgeConfig::builder()
        .notification(NotificationConfig::default().with_delay(delay))
        .build()
        .unwrap();
    BridgeService::new(config).unwrap()
}

fn bridge_error(err: ServiceError) -> BridgeError {
    match err {
        ServiceError::Bridge(err) => err,
        other => panic!("expected a bridge rejection, got {other}"),
    }
}

#[tokio::test]
async fn test_zero_yields_43() {
    let result = plain_service().get_num_transactions(0).await.unwrap();
    assert_eq!(result.as_f64(), Some(43.0));
}

#[tokio::test]
async fn test_minus_43_yields_zero() {
    let result = plain_service().get_num_transactions(-43).await.unwrap();
    assert_eq!(result.as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_fractional_input_uses_float_addition() {
    let service = plain_service();
    for value in [0.5_f64, -1.25, 1e-9, 123_456.789] {
        let result = service.get_num_transactions(value).await.unwrap();
        assert_eq!(result.as_f64(), Some(value + 43.0));
    }
}

#[tokio::test]
async fn test_non_numeric_input_rejects() {
    let service = plain_service();

    for input in [json!("five"), json!(null), json!([1]), json!({ "n": 1 })] {
        let err = service.get_num_transactions(input).await.unwrap_err();
        assert_eq!(err.code(), "Err");
        assert!(!err.to_string().is_empty());
        assert!(matches!(bridge_error(err), BridgeError::InvalidArgument(_)));
    }
}

#[tokio::test]
async fn test_non_finite_input_rejects_by_name() {
    let service = notifying_service(Duration::ZERO);
    let mut stream = service.subscribe();

    for (value, name) in [(f64::INFINITY, "inf"), (f64::NAN, "NaN")] {
        let err = service.get_num_transactions(value).await.unwrap_err();
        assert_eq!(err.code(), "Err");
        assert!(err.to_string().contains(name), "{err}");
        assert!(matches!(bridge_error(err), BridgeError::InvalidArgument(_)));
    }

    // Rejected before dispatch, so nothing was announced.
    assert!(stream.try_recv().is_none());

    let result = service.get_num_transactions(f64::MAX).await.unwrap();
    assert_eq!(result.as_f64(), Some(f64::MAX + 43.0));
}

#[tokio::test]
async fn test_legacy_module_is_integer_only() {
    let service = plain_service();

    let result = service
        .call(LEGACY_MODULE_NAME, GET_NUM_TRANSACTIONS, vec![json!(-43)])
        .await
        .unwrap();
    assert_eq!(result, json!(0));

    let err = service
        .call(LEGACY_MODULE_NAME, GET_NUM_TRANSACTIONS, vec![json!(2.5)])
        .await
        .unwrap_err();
    assert!(matches!(bridge_error(err), BridgeError::InvalidArgument(_)));

    let err = service
        .call(LEGACY_MODULE_NAME, GET_NUM_TRANSACTIONS, vec![json!(i64::MAX)])
        .await
        .unwrap_err();
    assert!(matches!(bridge_error(err), BridgeError::Overflow(_)));
}

#[tokio::test]
async fn test_unknown_module_and_method() {
    let service = plain_service();

    let err = service
        .call("RNBitcoin", GET_NUM_TRANSACTIONS, vec![json!(1)])
        .await
        .unwrap_err();
    assert_eq!(
        bridge_error(err),
        BridgeError::UnknownModule("RNBitcoin".to_string())
    );

    let err = service
        .call("RNZcash", "getShieldedBalance", vec![])
        .await
        .unwrap_err();
    assert!(matches!(bridge_error(err), BridgeError::UnknownMethod { .. }));
}

#[tokio::test]
async fn test_plain_variant_emits_nothing() {
    let service = plain_service();
    let mut stream = service.subscribe();

    service.get_num_transactions(1).await.unwrap();

    assert!(stream.try_recv().is_none());
}

#[tokio::test]
async fn test_notifying_variant_emits_exactly_one_event_before_reply() {
    let service = notifying_service(Duration::from_millis(20));
    let mut stream = service.subscribe();

    let result = service.get_num_transactions(1).await.unwrap();
    assert_eq!(result.as_f64(), Some(44.0));

    // Emission happens on the invoking thread before the reply is settled,
    // so the event is already buffered once the reply is observed.
    let event = stream.try_recv().expect("event before reply").unwrap();
    assert_eq!(event.name, "FooEvent");
    assert_eq!(event.payload.len(), 1);
    assert_eq!(event.payload.get("foo"), Some(&"bar3".to_string()));

    assert!(stream.try_recv().is_none());
}

#[tokio::test]
async fn test_notifying_variant_waits_for_configured_delay() {
    let delay = Duration::from_millis(80);
    let service = notifying_service(delay);

    let started = Instant::now();
    service.get_num_transactions(0).await.unwrap();

    assert!(started.elapsed() >= delay);
}

#[tokio::test]
async fn test_legacy_module_never_notifies() {
    let service = notifying_service(Duration::from_millis(50));
    let mut stream = service.subscribe();

    service
        .call(LEGACY_MODULE_NAME, GET_NUM_TRANSACTIONS, vec![json!(1)])
        .await
        .unwrap();

    assert!(stream.try_recv().is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_calls_do_not_serialize() {
    let delay = Duration::from_millis(200);
    let service = Arc::new(notifying_service(delay));

    let started = Instant::now();
    let calls = (0..4).map(|i| {
        let service = Arc::clone(&service);
        async move { service.get_num_transactions(i).await }
    });
    let results: Vec<Value> = join_all(calls)
        .await
        .into_iter()
        .map(|result| result.unwrap())
        .collect();

    let elapsed = started.elapsed();
    assert!(elapsed >= delay);
    assert!(elapsed < delay * 4);

    let mut values: Vec<f64> = results.iter().filter_map(Value::as_f64).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(values, vec![43.0, 44.0, 45.0, 46.0]);
}

#[tokio::test]
async fn test_subscribe_to_foo_listener() {
    let service = notifying_service(Duration::ZERO);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let subscription = service.subscribe_to_foo(move |event| {
        let _ = tx.send(event);
    });
    assert_eq!(subscription.event_name(), "FooEvent");

    service.get_num_transactions(5).await.unwrap();

    let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("listener called")
        .expect("channel open");
    assert_eq!(event.payload.get("foo"), Some(&"bar3".to_string()));

    subscription.remove().await;
    service.get_num_transactions(5).await.unwrap();
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_custom_notification_event() {
    let config = BridgeConfig::builder()
        .notification(
            NotificationConfig::default()
                .with_event_name("ProgressEvent")
                .with_delay(Duration::ZERO),
        )
        .build()
        .unwrap();
    let service = BridgeService::new(config).unwrap();
    let mut stream = service.subscribe().for_event("ProgressEvent");

    service.get_num_transactions(0).await.unwrap();

    let event = stream.try_recv().unwrap().unwrap();
    assert_eq!(event.name, "ProgressEvent");
}

#[test]
fn test_invalid_config_is_rejected_by_service() {
    let mut config = BridgeConfig::builder().build().unwrap();
    config.event_buffer_size = 0;

    let err = BridgeService::new(config).unwrap_err();
    assert!(matches!(err, ServiceError::Runtime(_)));
    assert_eq!(err.code(), "Err");
}

#[test]
fn test_registered_modules() {
    let service = plain_service();
    assert_eq!(
        service.registry().module_names(),
        vec!["RNReactNativeZcash".to_string(), "RNZcash".to_string()]
    );
}
