//! Dashboard View
//!
//! Stat cards and the most recent executions.

use leptos::prelude::*;

use harness_client::models::DashboardStats;
use harness_client::render::{ExecutionRow, ListView};

use crate::components::{ActionButtons, EmptyStateView};

#[component]
pub fn DashboardView(stats: DashboardStats, recent: ListView<ExecutionRow>) -> impl IntoView {
    let cards = [
        ("folder", "Projects", stats.total_projects, "stat-primary"),
        ("code-branch", "Pipelines", stats.total_pipelines, "stat-info"),
        ("check-circle", "Successful", stats.successful_deployments, "stat-success"),
        ("times-circle", "Failed", stats.failed_deployments, "stat-danger"),
    ];

    let recent_list = match recent {
        ListView::Empty(empty) => view! { <EmptyStateView empty=empty/> }.into_any(),
        ListView::Rows(rows) => rows
            .into_iter()
            .map(|row| view! { <ExecutionItem row=row/> })
            .collect_view()
            .into_any(),
    };

    view! {
        <section class="dashboard">
            <div class="stats-grid">
                {cards
                    .into_iter()
                    .map(|(icon, label, value, class)| {
                        view! {
                            <div class=format!("stat-card {}", class)>
                                <i class=format!("fas fa-{}", icon)></i>
                                <div class="stat-value">{value}</div>
                                <div class="stat-label">{label}</div>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="card">
                <h3>"Recent Executions"</h3>
                <div class="execution-list">{recent_list}</div>
            </div>
        </section>
    }
}

#[component]
fn ExecutionItem(row: ExecutionRow) -> impl IntoView {
    view! {
        <div class="execution-item">
            <i
                class=format!("fas fa-{}", row.status.icon())
                style=format!("color: {}", row.status.color())
            ></i>
            <div class="execution-info">
                <div class="execution-title">{row.pipeline_name}</div>
                <div class="execution-meta">{row.project_name} " · " {row.started}</div>
            </div>
            <span class=format!("status-badge status-{}", row.status.as_str())>
                {row.status.as_str()}
            </span>
            <ActionButtons buttons=row.actions/>
        </div>
    }
}
