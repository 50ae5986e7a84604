//! Notification Toast

use leptos::prelude::*;

use crate::context::use_app_context;

/// The single visible notification, if any
#[component]
pub fn NotificationToast() -> impl IntoView {
    let ctx = use_app_context();

    move || {
        ctx.notification().map(|n| {
            let id = n.id;
            view! {
                <div class=format!("notification {}", n.kind.css_class())>
                    <i class=format!("fas fa-{}", n.kind.icon())></i>
                    <span class="notification-message">{n.message}</span>
                    <button class="notification-close" on:click=move |_| ctx.dismiss(id)>
                        <i class="fas fa-times"></i>
                    </button>
                </div>
            }
        })
    }
}
