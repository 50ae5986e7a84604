//! Row Action Buttons
//!
//! Renders the typed actions a row description carries and routes clicks
//! through `actions::dispatch`.

use leptos::prelude::*;

use harness_client::render::{ActionButton, ButtonStyle, EmptyState};

use crate::actions;
use crate::components::DeleteConfirmButton;
use crate::context::use_app_context;
use crate::store::use_app_store;

#[component]
pub fn ActionButtons(buttons: Vec<ActionButton>) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let rendered = buttons
        .into_iter()
        .map(|button| {
            let action = button.action;
            if button.style == ButtonStyle::Danger {
                view! {
                    <DeleteConfirmButton
                        button_class=button.style.css_class()
                        label=button.label
                        on_confirm=move |_: ()| actions::dispatch(ctx, store, action)
                    />
                }
                .into_any()
            } else {
                view! {
                    <button
                        class=button.style.css_class()
                        on:click=move |ev| {
                            ev.stop_propagation();
                            actions::dispatch(ctx, store, action);
                        }
                    >
                        <i class=format!("fas fa-{}", button.icon)></i>
                        " "
                        {button.label}
                    </button>
                }
                .into_any()
            }
        })
        .collect_view();

    view! { <div class="item-actions">{rendered}</div> }
}

/// Empty list placeholder with an optional create button
#[component]
pub fn EmptyStateView(
    empty: EmptyState,
    #[prop(optional)] on_create: Option<Callback<()>>,
) -> impl IntoView {
    let create = empty
        .create_label
        .zip(on_create)
        .map(|(label, on_create)| {
            view! {
                <button class="btn btn-primary" on:click=move |_| on_create.run(())>
                    <i class="fas fa-plus"></i>
                    " "
                    {label}
                </button>
            }
        });

    view! {
        <div class="empty-state">
            <i class=format!("fas fa-{}", empty.icon)></i>
            <p>{empty.message}</p>
            {create}
        </div>
    }
}
