//! Top Bar Component
//!
//! Page title, search box and the signed-in user.

use leptos::prelude::*;

use crate::actions;
use crate::context::use_app_context;
use crate::store::use_app_store;

#[component]
pub fn TopBar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let username = move || {
        ctx.session()
            .user()
            .map(|user| user.username.clone())
            .unwrap_or_default()
    };

    view! {
        <header class="top-bar">
            <h2 class="page-title">{move || ctx.current_view.get().title()}</h2>
            <div class="search-box">
                <i class="fas fa-search"></i>
                <input
                    type="text"
                    placeholder="Search..."
                    prop:value=move || ctx.search.get()
                    on:input=move |ev| ctx.search.set(event_target_value(&ev))
                />
            </div>
            <div class="user-menu">
                <i class="fas fa-user-circle"></i>
                <span class="username">{username}</span>
                <button class="btn btn-sm btn-outline" on:click=move |_| actions::logout(ctx, store)>
                    <i class="fas fa-sign-out-alt"></i>
                    " Logout"
                </button>
            </div>
        </header>
    }
}
