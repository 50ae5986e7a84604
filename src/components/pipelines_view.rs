//! Pipelines View
//!
//! Pipeline rows with a project filter. The filter lives in the app context
//! so it survives view switches.

use leptos::prelude::*;

use harness_client::models::ProjectId;
use harness_client::render::{FilterOption, ListView, PipelineRow};

use crate::components::{ActionButtons, EmptyStateView};
use crate::context::{use_app_context, Modal};

#[component]
pub fn PipelinesView(
    filter_options: Vec<FilterOption>,
    selected: Option<ProjectId>,
    list: ListView<PipelineRow>,
) -> impl IntoView {
    let ctx = use_app_context();
    let open_create = move || {
        let preselected = ctx.project_filter.get_untracked();
        ctx.modal.set(Some(Modal::NewPipeline(preselected)));
    };

    let options = filter_options
        .into_iter()
        .map(|option| {
            let value = option.value.map(|id| id.to_string()).unwrap_or_default();
            view! {
                <option value=value selected={option.value == selected}>
                    {option.label}
                </option>
            }
        })
        .collect_view();

    let body = match list {
        ListView::Empty(empty) => view! {
            <EmptyStateView empty=empty on_create=Callback::new(move |_| open_create())/>
        }
        .into_any(),
        ListView::Rows(rows) => rows
            .into_iter()
            .map(|row| view! { <PipelineItem row=row/> })
            .collect_view()
            .into_any(),
    };

    view! {
        <section class="pipelines">
            <div class="section-header">
                <select
                    class="project-filter"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        ctx.project_filter.set(value.parse::<ProjectId>().ok());
                    }
                >
                    {options}
                </select>
                <button class="btn btn-primary" on:click=move |_| open_create()>
                    <i class="fas fa-plus"></i>
                    " New Pipeline"
                </button>
            </div>
            <div class="pipeline-list">{body}</div>
        </section>
    }
}

#[component]
fn PipelineItem(row: PipelineRow) -> impl IntoView {
    let status_class = row
        .last_status
        .map(|s| format!("status-badge status-{}", s.as_str()))
        .unwrap_or_else(|| "status-badge status-none".to_string());
    let status_label = row.status_label();

    view! {
        <div class="pipeline-item">
            <div class="pipeline-info">
                <div class="pipeline-title">
                    {row.name}
                    {row.project_name.map(|name| view! { <span class="project-tag">{name}</span> })}
                </div>
                <p class="description">{row.description}</p>
                <div class="pipeline-meta">
                    <span><i class="fas fa-bolt"></i> " " {row.trigger}</span>
                    {row.last_run.map(|when| view! {
                        <span><i class="fas fa-clock"></i> " " {when}</span>
                    })}
                </div>
            </div>
            <span class=status_class>{status_label}</span>
            <ActionButtons buttons=row.actions/>
        </div>
    }
}
