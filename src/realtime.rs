//! Realtime Socket
//!
//! Optional WebSocket carrying execution and stage updates into the open
//! execution modal. No reconnection: a dropped socket stays dropped until
//! the next login.

use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{MessageEvent, WebSocket};

use harness_client::models::ExecutionId;
use harness_client::realtime::{join_frame, RealtimeEvent};
use harness_client::View;

use crate::context::AppContext;

/// Open the socket and route its frames into `ctx`
pub fn connect(url: &str, ctx: AppContext) -> Option<WebSocket> {
    let socket = match WebSocket::new(url) {
        Ok(socket) => socket,
        Err(e) => {
            log::warn!("Realtime connection to {} failed: {:?}", url, e);
            return None;
        }
    };

    let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
        let Some(text) = ev.data().as_string() else {
            return;
        };
        match RealtimeEvent::from_frame(&text) {
            Ok(Some(event)) => handle_event(ctx, &event),
            Ok(None) => {}
            Err(e) => log::warn!("Dropping malformed realtime frame: {}", e),
        }
    });
    socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
    on_message.forget();

    log::info!("Realtime connected to {}", url);
    Some(socket)
}

fn handle_event(ctx: AppContext, event: &RealtimeEvent) {
    ctx.execution.update(|open| {
        if let Some(detail) = open {
            detail.apply(event);
        }
    });
    // finished runs change the dashboard counters and pipeline badges
    if let RealtimeEvent::Execution(update) = event {
        let view = ctx.current_view.get_untracked();
        if update.status.is_finished() && matches!(view, View::Dashboard | View::Pipelines) {
            ctx.reload();
        }
    }
}

/// Ask the server for updates on `execution_id`, if a socket is open
pub fn join_execution(ctx: AppContext, execution_id: ExecutionId) {
    ctx.with_socket(|socket| {
        let Some(socket) = socket else {
            return;
        };
        if socket.ready_state() != WebSocket::OPEN {
            return;
        }
        if let Err(e) = socket.send_with_str(&join_frame(execution_id)) {
            log::warn!("Failed to join execution {}: {:?}", execution_id, e);
        }
    });
}
