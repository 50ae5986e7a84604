//! Pipeline Modal
//!
//! Create a pipeline, or edit one when `editing` is set. The project list is
//! fetched fresh when the dialog opens.

use leptos::prelude::*;
use leptos::task::spawn_local;

use harness_client::models::{NewPipeline, PipelineId, Project, ProjectId};

use crate::actions;
use crate::components::ModalFrame;
use crate::context::use_app_context;
use crate::store::use_app_store;

const TRIGGERS: [(&str, &str); 3] = [
    ("manual", "Manual"),
    ("webhook", "Webhook"),
    ("schedule", "Schedule"),
];

const DEFAULT_YAML: &str = "stages:\n  - name: build\n    type: build\n";

#[component]
pub fn PipelineModal(
    #[prop(optional)] project: Option<ProjectId>,
    #[prop(optional)] editing: Option<PipelineId>,
) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let existing = editing.and_then(|id| {
        ctx.services()
            .views
            .pipelines()
            .into_iter()
            .find(|p| p.id == id)
    });
    let form = existing
        .as_ref()
        .map(|p| NewPipeline {
            name: p.name.clone(),
            description: p.description.clone().unwrap_or_default(),
            trigger_type: p.trigger_type.clone(),
            yaml_config: p.yaml_config.clone().unwrap_or_default(),
        })
        .unwrap_or_else(|| NewPipeline {
            trigger_type: "manual".to_string(),
            yaml_config: DEFAULT_YAML.to_string(),
            ..NewPipeline::default()
        });

    let preselected = existing.as_ref().and_then(|p| p.owner_id()).or(project);
    let (project_id, set_project_id) = signal(preselected);
    let (projects, set_projects) = signal(Vec::<Project>::new());
    let (name, set_name) = signal(form.name);
    let (description, set_description) = signal(form.description);
    let (trigger, set_trigger) = signal(form.trigger_type);
    let (yaml, set_yaml) = signal(form.yaml_config);

    spawn_local(async move {
        match ctx.services().api.get_projects().await {
            Ok(list) => set_projects.set(list),
            Err(e) => ctx.failure("Failed to load projects", &e),
        }
    });

    let close = move || ctx.modal.set(None);
    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let pipeline = NewPipeline {
            name: name.get().trim().to_string(),
            description: description.get().trim().to_string(),
            trigger_type: trigger.get(),
            yaml_config: yaml.get(),
        };
        match editing {
            Some(id) => actions::update_pipeline(ctx, store, id, pipeline, close),
            None => actions::create_pipeline(ctx, store, project_id.get(), pipeline, close),
        }
    };

    let title = if editing.is_some() { "Edit Pipeline" } else { "Create Pipeline" };

    view! {
        <ModalFrame title=title on_close=Callback::new(move |_| close())>
            <form class="modal-form" on:submit=submit>
                <label>"Project"</label>
                <select
                    disabled={editing.is_some()}
                    on:change=move |ev| set_project_id.set(event_target_value(&ev).parse().ok())
                >
                    <option value="" selected=move || project_id.get().is_none()>
                        "Select a project"
                    </option>
                    {move || {
                        projects
                            .get()
                            .into_iter()
                            .map(|p| {
                                let id = p.id;
                                view! {
                                    <option value={id.to_string()} selected=move || project_id.get() == Some(id)>
                                        {p.name}
                                    </option>
                                }
                            })
                            .collect_view()
                    }}
                </select>
                <label>"Name"</label>
                <input
                    type="text"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <label>"Description"</label>
                <textarea
                    rows="2"
                    prop:value=move || description.get()
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                ></textarea>
                <label>"Trigger"</label>
                <select on:change=move |ev| set_trigger.set(event_target_value(&ev))>
                    {TRIGGERS
                        .iter()
                        .map(|&(value, label)| {
                            view! {
                                <option value=value selected=move || trigger.get() == value>
                                    {label}
                                </option>
                            }
                        })
                        .collect_view()}
                </select>
                <label>"Configuration (YAML)"</label>
                <textarea
                    class="yaml-editor"
                    rows="10"
                    prop:value=move || yaml.get()
                    on:input=move |ev| set_yaml.set(event_target_value(&ev))
                ></textarea>
                <div class="modal-actions">
                    <button type="button" class="btn btn-outline" on:click=move |_| close()>
                        "Cancel"
                    </button>
                    <button type="submit" class="btn btn-primary">
                        {if editing.is_some() { "Save" } else { "Create" }}
                    </button>
                </div>
            </form>
        </ModalFrame>
    }
}
