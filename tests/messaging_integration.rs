//! Client messaging through a real HTTP round trip

mod common;

use std::sync::Arc;
use std::time::Duration;

use clinic_queue::core::retry::RetryPolicy;
use clinic_queue::messaging::{HttpSmsSender, SmsSettings};
use clinic_queue::serving::api::{NewEntry, QueueService, TrackingLinks};
use clinic_queue::store::MemoryEntryStore;
use clinic_queue::notifications::api::new_notification_manager;
use common::gateway::FakeGateway;

fn service_with_gateway(url: &str, max_attempts: usize) -> QueueService {
    let tracking = TrackingLinks::new("https://clinic.example");
    let settings = SmsSettings {
        gateway_url: url.to_string(),
        auth_token: None,
        timeout: Duration::from_secs(2),
        retry: RetryPolicy {
            max_attempts,
            delay: Duration::from_millis(5),
        },
    };
    let sender = HttpSmsSender::new(settings, tracking.clone()).unwrap();
    QueueService::new(Arc::new(MemoryEntryStore::new()), new_notification_manager())
        .with_sender(Arc::new(sender))
        .with_tracking(tracking)
}

#[tokio::test]
async fn test_registration_texts_the_client() {
    let gateway = FakeGateway::start(vec![202]).await;
    let service = service_with_gateway(&gateway.url, 1);

    let registration = service
        .register(NewEntry::booked("Ana", "+1 (555) 010-0200"))
        .await
        .unwrap();

    assert!(registration.notified);
    let bodies = gateway.bodies();
    assert_eq!(bodies.len(), 1);
    let payload: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(payload["to"], "+15550100200");
    assert_eq!(
        payload["body"],
        "Hi Ana, you are number 1 in the queue. Track your place: https://clinic.example/track/1"
    );
}

#[tokio::test]
async fn test_gateway_outage_does_not_block_registration() {
    let gateway = FakeGateway::start(vec![503, 503]).await;
    let service = service_with_gateway(&gateway.url, 2);

    let registration = service
        .register(NewEntry::walk_in("Bruno", "5550101"))
        .await
        .unwrap();

    assert!(!registration.notified);
    assert_eq!(gateway.requests.lock().unwrap().len(), 2);
    let snapshot = service.snapshot().await.unwrap();
    assert_eq!(snapshot.len(), 1);
}

#[tokio::test]
async fn test_unreachable_gateway_is_reported_not_fatal() {
    // Bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);
    let service = service_with_gateway(&format!("http://{address}/messages"), 1);

    let registration = service
        .register(NewEntry::walk_in("Carla", "5550102"))
        .await
        .unwrap();
    assert!(!registration.notified);
    assert_eq!(registration.entry.sequence_number, 1);
}
