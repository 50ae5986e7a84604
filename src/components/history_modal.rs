//! Pipeline History Modal
//!
//! Past executions of one pipeline, newest first as the server returns them.

use leptos::prelude::*;
use leptos::task::spawn_local;

use harness_client::format::format_date;
use harness_client::models::{Execution, PipelineId};

use crate::actions;
use crate::components::ModalFrame;
use crate::context::use_app_context;

#[component]
pub fn HistoryModal(pipeline: PipelineId) -> impl IntoView {
    let ctx = use_app_context();

    // None while loading
    let (executions, set_executions) = signal(None::<Vec<Execution>>);

    spawn_local(async move {
        match ctx.services().views.pipeline_history(pipeline).await {
            Ok(list) => set_executions.set(Some(list)),
            Err(e) => {
                set_executions.set(Some(Vec::new()));
                ctx.failure("Failed to load execution history", &e);
            }
        }
    });

    let close = move || ctx.modal.set(None);
    let open = move |id| {
        close();
        actions::open_execution(ctx, id);
    };

    view! {
        <ModalFrame title="Execution History" on_close=Callback::new(move |_| close())>
            {move || match executions.get() {
                None => view! { <div class="loading">"Loading..."</div> }.into_any(),
                Some(list) if list.is_empty() => view! {
                    <div class="empty-state">
                        <i class="fas fa-history"></i>
                        <p>"No executions yet."</p>
                    </div>
                }
                .into_any(),
                Some(list) => {
                    let now = chrono::Utc::now();
                    view! {
                        <ul class="history-list">
                            {list
                                .into_iter()
                                .map(|execution| {
                                    let id = execution.id;
                                    let status = execution.status;
                                    view! {
                                        <li class="history-item" on:click=move |_| open(id)>
                                            <i
                                                class=format!("fas fa-{}", status.icon())
                                                style=format!("color: {}", status.color())
                                            ></i>
                                            <span class="history-id">"#" {id}</span>
                                            <span class=format!("status-badge status-{}", status.as_str())>
                                                {status.as_str()}
                                            </span>
                                            <span class="history-started">
                                                {format_date(execution.started_at.as_deref(), now)}
                                            </span>
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    }
                    .into_any()
                }
            }}
        </ModalFrame>
    }
}
