//! Execution Detail Modal
//!
//! Shows whatever `ctx.execution` holds. Realtime events patch it in place.

use leptos::prelude::*;

use harness_client::render::{ExecutionDetail, ListView};

use crate::actions;
use crate::components::{EmptyStateView, ModalFrame};
use crate::context::use_app_context;

#[component]
pub fn ExecutionModal() -> impl IntoView {
    let ctx = use_app_context();

    move || {
        ctx.execution.get().map(|detail| {
            let title = format!("Execution #{}", detail.id);
            view! {
                <ModalFrame
                    title=title
                    on_close=Callback::new(move |_| ctx.execution.set(None))
                >
                    <ExecutionBody detail=detail/>
                </ModalFrame>
            }
        })
    }
}

#[component]
fn ExecutionBody(detail: ExecutionDetail) -> impl IntoView {
    let ctx = use_app_context();
    let id = detail.id;
    let cancellable = detail.cancellable();

    let stages = match detail.stages {
        ListView::Empty(empty) => view! { <EmptyStateView empty=empty/> }.into_any(),
        ListView::Rows(rows) => view! {
            <ul class="stage-list">
                {rows
                    .into_iter()
                    .map(|stage| {
                        view! {
                            <li class=format!("stage-item status-{}", stage.status.as_str())>
                                <i
                                    class=format!("fas fa-{}", stage.status.icon())
                                    style=format!("color: {}", stage.status.color())
                                ></i>
                                <span class="stage-name">{stage.name}</span>
                                <span class="stage-type">{stage.stage_type}</span>
                                <span class="stage-duration">{stage.duration}</span>
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
        }
        .into_any(),
    };

    view! {
        <div class="execution-summary">
            <span class=format!("status-badge status-{}", detail.status.as_str())>
                {detail.status.as_str()}
            </span>
            <span class="execution-started">"Started " {detail.started}</span>
            <Show when=move || cancellable>
                <button class="btn btn-sm btn-danger" on:click=move |_| actions::cancel_execution(ctx, id)>
                    <i class="fas fa-stop"></i>
                    " Cancel"
                </button>
            </Show>
        </div>
        <h4>"Stages"</h4>
        {stages}
        <h4>"Logs"</h4>
        <pre class="execution-logs">
            {detail.logs.into_iter().map(|line| view! { <div>{line}</div> }).collect_view()}
        </pre>
    }
}
