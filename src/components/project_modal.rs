//! New Project Modal

use leptos::prelude::*;

use harness_client::models::NewProject;

use crate::actions;
use crate::components::ModalFrame;
use crate::context::use_app_context;
use crate::store::use_app_store;

#[component]
pub fn ProjectModal() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (repository_url, set_repository_url) = signal(String::new());

    let close = move || ctx.modal.set(None);
    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let project = NewProject {
            name: name.get().trim().to_string(),
            description: description.get().trim().to_string(),
            repository_url: repository_url.get().trim().to_string(),
        };
        actions::create_project(ctx, store, project, close);
    };

    view! {
        <ModalFrame title="Create Project" on_close=Callback::new(move |_| close())>
            <form class="modal-form" on:submit=submit>
                <label>"Name"</label>
                <input
                    type="text"
                    placeholder="my-service"
                    prop:value=move || name.get()
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                />
                <label>"Description"</label>
                <textarea
                    rows="3"
                    prop:value=move || description.get()
                    on:input=move |ev| set_description.set(event_target_value(&ev))
                ></textarea>
                <label>"Repository URL"</label>
                <input
                    type="url"
                    placeholder="https://github.com/org/repo"
                    prop:value=move || repository_url.get()
                    on:input=move |ev| set_repository_url.set(event_target_value(&ev))
                />
                <div class="modal-actions">
                    <button type="button" class="btn btn-outline" on:click=move |_| close()>
                        "Cancel"
                    </button>
                    <button type="submit" class="btn btn-primary">"Create"</button>
                </div>
            </form>
        </ModalFrame>
    }
}
