//! Projects View

use leptos::prelude::*;

use harness_client::render::{ListView, ProjectCard};

use crate::components::{ActionButtons, EmptyStateView};
use crate::context::{use_app_context, Modal};

#[component]
pub fn ProjectsView(list: ListView<ProjectCard>) -> impl IntoView {
    let ctx = use_app_context();
    let open_create = move || ctx.modal.set(Some(Modal::NewProject));

    let body = match list {
        ListView::Empty(empty) => view! {
            <EmptyStateView empty=empty on_create=Callback::new(move |_| open_create())/>
        }
        .into_any(),
        ListView::Rows(cards) => view! {
            <div class="project-grid">
                {cards
                    .into_iter()
                    .map(|card| {
                        view! {
                            <div class="project-card">
                                <h3>{card.name}</h3>
                                <p class="description">{card.description}</p>
                                <div class="project-meta">
                                    <span><i class="fas fa-code-branch"></i> " " {card.pipelines}</span>
                                    <span><i class="fas fa-layer-group"></i> " " {card.environments}</span>
                                    <span><i class="fas fa-clock"></i> " " {card.created}</span>
                                </div>
                                <ActionButtons buttons=card.actions/>
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
        }
        .into_any(),
    };

    view! {
        <section class="projects">
            <div class="section-header">
                <button class="btn btn-primary" on:click=move |_| open_create()>
                    <i class="fas fa-plus"></i>
                    " New Project"
                </button>
            </div>
            {body}
        </section>
    }
}
