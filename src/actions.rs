//! User Actions
//!
//! Every button and form ends up here. Each action runs the core operation
//! on the local executor, copies the result into the store and reports the
//! outcome as a notification. Nothing is retried.

use leptos::prelude::*;
use leptos::task::spawn_local;

use harness_client::models::{
    Credentials, ExecutionId, NewPipeline, NewProject, PipelineId, Priority, ProjectId,
    Registration, TodoId,
};
use harness_client::render::{render_execution, RowAction};
use harness_client::View;

use crate::context::{AppContext, Modal};
use crate::realtime;
use crate::store::{
    store_apply_view_data, store_begin_load, store_clear, store_finish_load, store_sync_catalog,
    store_sync_todos, AppStore,
};

/// Route a row action to its handler
pub fn dispatch(ctx: AppContext, store: AppStore, action: RowAction) {
    log::debug!("Row action {:?}", action);
    match action {
        RowAction::ViewProject(id) => {
            ctx.project_filter.set(Some(id));
            ctx.switch_view(View::Pipelines);
        }
        RowAction::NewPipelineFor(id) => ctx.modal.set(Some(Modal::NewPipeline(Some(id)))),
        RowAction::DeleteProject(id) => delete_project(ctx, store, id),
        RowAction::RunPipeline(id) => run_pipeline(ctx, id),
        RowAction::EditPipeline(id) => ctx.modal.set(Some(Modal::EditPipeline(id))),
        RowAction::PipelineHistory(id) => ctx.modal.set(Some(Modal::History(id))),
        RowAction::DeletePipeline(id) => delete_pipeline(ctx, store, id),
        RowAction::ViewExecution(id) => open_execution(ctx, id),
        RowAction::ToggleTodo(id) => toggle_todo(ctx, store, id),
        RowAction::DeleteTodo(id) => delete_todo(ctx, store, id),
    }
}

// ========================
// Views
// ========================

pub fn load_view(ctx: AppContext, store: AppStore, view: View) {
    store_begin_load(&store);
    spawn_local(async move {
        let services = ctx.services();
        match services.views.switch_view(view).await {
            Ok(data) => store_apply_view_data(&store, data),
            Err(e) => ctx.failure(&format!("Failed to load {} data", view.as_str()), &e),
        }
        store_finish_load(&store);
    });
}

// ========================
// Session
// ========================

pub fn login(ctx: AppContext, credentials: Credentials) {
    spawn_local(async move {
        match ctx.services().api.login(&credentials).await {
            Ok(user) => {
                log::info!("Logged in as {}", user.username);
                ctx.refresh_session();
                ctx.success("Welcome back! You have been successfully logged in.");
                ctx.switch_view(View::Dashboard);
            }
            Err(e) => ctx.error(e.to_string()),
        }
    });
}

pub fn register(ctx: AppContext, registration: Registration) {
    spawn_local(async move {
        match ctx.services().api.register(&registration).await {
            Ok(user) => {
                log::info!("Registered {}", user.username);
                ctx.refresh_session();
                ctx.success("Account created successfully! Welcome to Harness.");
                ctx.switch_view(View::Dashboard);
            }
            Err(e) => ctx.error(e.to_string()),
        }
    });
}

pub fn logout(ctx: AppContext, store: AppStore) {
    if let Err(e) = ctx.services().session.logout() {
        ctx.failure("Logout failed", &e);
        return;
    }
    reset_workspace(ctx, store);
    ctx.success("You have been successfully logged out.");
}

/// Forget everything tied to the previous session
pub fn reset_workspace(ctx: AppContext, store: AppStore) {
    ctx.set_socket(None);
    ctx.execution.set(None);
    ctx.modal.set(None);
    ctx.project_filter.set(None);
    store_clear(&store);
    ctx.refresh_session();
}

// ========================
// Projects
// ========================

pub fn create_project(
    ctx: AppContext,
    store: AppStore,
    project: NewProject,
    on_done: impl FnOnce() + 'static,
) {
    spawn_local(async move {
        let services = ctx.services();
        match services.views.create_project(&project).await {
            Ok(_) => {
                store_sync_catalog(&store, &services.views);
                ctx.success("Project created successfully!");
                on_done();
            }
            Err(e) => ctx.failure("Failed to create project", &e),
        }
    });
}

fn delete_project(ctx: AppContext, store: AppStore, id: ProjectId) {
    spawn_local(async move {
        let services = ctx.services();
        match services.views.delete_project(id).await {
            Ok(()) => {
                store_sync_catalog(&store, &services.views);
                if ctx.project_filter.get_untracked() == Some(id) {
                    ctx.project_filter.set(None);
                }
                ctx.success("Project deleted");
            }
            Err(e) => ctx.failure("Failed to delete project", &e),
        }
    });
}

// ========================
// Pipelines
// ========================

pub fn create_pipeline(
    ctx: AppContext,
    store: AppStore,
    project_id: Option<ProjectId>,
    pipeline: NewPipeline,
    on_done: impl FnOnce() + 'static,
) {
    spawn_local(async move {
        let services = ctx.services();
        match services.views.create_pipeline(project_id, &pipeline).await {
            Ok(_) => {
                store_sync_catalog(&store, &services.views);
                ctx.success("Pipeline created successfully!");
                on_done();
            }
            Err(e) => ctx.failure("Failed to create pipeline", &e),
        }
    });
}

pub fn update_pipeline(
    ctx: AppContext,
    store: AppStore,
    id: PipelineId,
    pipeline: NewPipeline,
    on_done: impl FnOnce() + 'static,
) {
    spawn_local(async move {
        let services = ctx.services();
        match services.views.update_pipeline(id, &pipeline).await {
            Ok(_) => {
                store_sync_catalog(&store, &services.views);
                ctx.success("Pipeline updated");
                on_done();
            }
            Err(e) => ctx.failure("Failed to update pipeline", &e),
        }
    });
}

fn delete_pipeline(ctx: AppContext, store: AppStore, id: PipelineId) {
    spawn_local(async move {
        let services = ctx.services();
        match services.views.delete_pipeline(id).await {
            Ok(()) => {
                store_sync_catalog(&store, &services.views);
                ctx.success("Pipeline deleted");
            }
            Err(e) => ctx.failure("Failed to delete pipeline", &e),
        }
    });
}

fn run_pipeline(ctx: AppContext, id: PipelineId) {
    spawn_local(async move {
        match ctx.services().views.execute_pipeline(id).await {
            Ok(started) => {
                ctx.success("Pipeline execution started!");
                open_execution(ctx, started.execution_id);
            }
            Err(e) => ctx.failure("Failed to execute pipeline", &e),
        }
    });
}

// ========================
// Executions
// ========================

pub fn open_execution(ctx: AppContext, id: ExecutionId) {
    spawn_local(async move {
        match ctx.services().views.open_execution(id).await {
            Ok(execution) => {
                ctx.execution
                    .set(Some(render_execution(&execution, chrono::Utc::now())));
                realtime::join_execution(ctx, id);
            }
            Err(e) => ctx.failure("Failed to load execution", &e),
        }
    });
}

pub fn cancel_execution(ctx: AppContext, id: ExecutionId) {
    spawn_local(async move {
        match ctx.services().views.cancel_execution(id).await {
            Ok(execution) => {
                ctx.execution
                    .set(Some(render_execution(&execution, chrono::Utc::now())));
                ctx.info("Execution cancelled");
                ctx.reload();
            }
            Err(e) => ctx.failure("Failed to cancel execution", &e),
        }
    });
}

// ========================
// Todos
// ========================

pub fn add_todo(
    ctx: AppContext,
    store: AppStore,
    text: String,
    priority: Priority,
    on_done: impl FnOnce() + 'static,
) {
    spawn_local(async move {
        let services = ctx.services();
        match services.todos.add(&text, priority).await {
            Ok(_) => {
                store_sync_todos(&store, &services.todos);
                on_done();
            }
            Err(e) => ctx.failure("Failed to add todo", &e),
        }
    });
}

fn toggle_todo(ctx: AppContext, store: AppStore, id: TodoId) {
    spawn_local(async move {
        let services = ctx.services();
        match services.todos.toggle(id).await {
            Ok(_) => store_sync_todos(&store, &services.todos),
            Err(e) => ctx.failure("Failed to update todo", &e),
        }
    });
}

pub fn edit_todo(ctx: AppContext, store: AppStore, id: TodoId, text: String) {
    spawn_local(async move {
        let services = ctx.services();
        match services.todos.edit_text(id, &text).await {
            Ok(_) => store_sync_todos(&store, &services.todos),
            Err(e) => ctx.failure("Failed to update todo", &e),
        }
    });
}

pub fn set_todo_priority(ctx: AppContext, store: AppStore, id: TodoId, priority: Priority) {
    spawn_local(async move {
        let services = ctx.services();
        match services.todos.set_priority(id, priority).await {
            Ok(_) => store_sync_todos(&store, &services.todos),
            Err(e) => ctx.failure("Failed to update todo", &e),
        }
    });
}

fn delete_todo(ctx: AppContext, store: AppStore, id: TodoId) {
    spawn_local(async move {
        let services = ctx.services();
        match services.todos.remove(id).await {
            Ok(()) => store_sync_todos(&store, &services.todos),
            Err(e) => ctx.failure("Failed to delete todo", &e),
        }
    });
}

pub fn clear_completed(ctx: AppContext, store: AppStore) {
    spawn_local(async move {
        let services = ctx.services();
        match services.todos.clear_completed().await {
            Ok(removed) => {
                store_sync_todos(&store, &services.todos);
                ctx.info(format!("Cleared {} completed", removed));
            }
            Err(e) => ctx.failure("Failed to clear completed todos", &e),
        }
    });
}

/// Partial progress stays applied when one update fails
pub fn mark_all_complete(ctx: AppContext, store: AppStore) {
    spawn_local(async move {
        let services = ctx.services();
        let result = services.todos.mark_all_complete().await;
        store_sync_todos(&store, &services.todos);
        if let Err(e) = result {
            ctx.failure("Failed to complete all todos", &e);
        }
    });
}
