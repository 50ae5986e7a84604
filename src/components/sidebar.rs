//! Sidebar Navigation

use leptos::prelude::*;

use harness_client::View;

use crate::context::use_app_context;

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <nav class="sidebar">
            <div class="sidebar-brand">
                <i class="fas fa-rocket"></i>
                " Harness"
            </div>
            <ul class="nav-list">
                {View::ALL
                    .iter()
                    .map(|&view| {
                        let is_active = move || ctx.current_view.get() == view;
                        view! {
                            <li
                                class=move || if is_active() { "nav-item active" } else { "nav-item" }
                                on:click=move |_| ctx.switch_view(view)
                            >
                                <i class=format!("fas fa-{}", view.icon())></i>
                                <span>{view.title()}</span>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        </nav>
    }
}
