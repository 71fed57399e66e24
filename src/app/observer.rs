//! Console observer printing every published queue

use tokio::sync::broadcast;

use crate::app::cli::display::render_snapshot;
use crate::core::styles::StyleRole;
use crate::notifications::api::{
    Event, EventFilter, EventReceiver, QueueEvent, SharedNotificationManager, SystemEvent,
    SystemEventType,
};

pub const OBSERVER_ID: &str = "front-desk-display";

/// Subscribe the display to queue and system events
pub async fn subscribe_observer(broadcaster: &SharedNotificationManager) -> EventReceiver {
    broadcaster.lock().await.subscribe(
        OBSERVER_ID.to_string(),
        EventFilter::All,
        "console".to_string(),
    )
}

/// Text to print for an event, if any
pub fn describe_event(event: &Event, use_color: bool) -> Option<String> {
    match event {
        Event::Queue(QueueEvent {
            event_type,
            snapshot,
            ..
        }) => {
            let title = StyleRole::Notice.paint(&format!("[{event_type:?}]"), use_color);
            Some(format!("{title}\n{}", render_snapshot(snapshot, use_color)))
        }
        Event::System(SystemEvent {
            event_type: SystemEventType::Startup,
            message,
            ..
        }) => Some(StyleRole::Dim.paint(
            message.as_deref().unwrap_or("Front desk ready"),
            use_color,
        )),
        Event::System(_) => None,
    }
}

/// Print events until shutdown is signalled or announced
pub async fn run_observer(
    mut events: EventReceiver,
    mut shutdown_rx: broadcast::Receiver<()>,
    use_color: bool,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => return,

            event = events.recv() => match event {
                Some(Event::System(SystemEvent { event_type: SystemEventType::Shutdown, .. })) | None => {
                    return;
                }
                Some(event) => {
                    if let Some(text) = describe_event(&event, use_color) {
                        println!("{text}");
                    }
                }
            }
        }
    }
}
