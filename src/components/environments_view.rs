//! Environments View

use leptos::prelude::*;

use harness_client::render::{EnvironmentRow, ListView};

use crate::components::EmptyStateView;

#[component]
pub fn EnvironmentsView(list: ListView<EnvironmentRow>) -> impl IntoView {
    match list {
        ListView::Empty(empty) => view! { <EmptyStateView empty=empty/> }.into_any(),
        ListView::Rows(rows) => view! {
            <section class="environment-grid">
                {rows
                    .into_iter()
                    .map(|env| {
                        view! {
                            <div class="environment-card">
                                <h3><i class="fas fa-layer-group"></i> " " {env.name}</h3>
                                <p class="description">{env.description}</p>
                                <div class="environment-meta">
                                    {env.project_name.map(|name| view! {
                                        <span class="project-tag">{name}</span>
                                    })}
                                    <span><i class="fas fa-clock"></i> " " {env.created}</span>
                                </div>
                            </div>
                        }
                    })
                    .collect_view()}
            </section>
        }
        .into_any(),
    }
}
