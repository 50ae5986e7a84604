//! Dashboard State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The core
//! services own the mirrors; the store holds their latest snapshots and is
//! refreshed after every load or confirmed write.

use leptos::prelude::*;
use reactive_stores::Store;

use harness_client::models::{
    DashboardStats, Environment, Pipeline, Project, RecentExecution, Todo,
};
use harness_client::{TodoList, View, ViewController, ViewData};

/// Snapshot of everything the views render
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// View loads still in flight
    pub pending_loads: usize,
    pub stats: DashboardStats,
    pub recent: Vec<RecentExecution>,
    pub projects: Vec<Project>,
    pub pipelines: Vec<Pipeline>,
    pub environments: Vec<Environment>,
    pub todos: Vec<Todo>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Copy freshly loaded view data into the store
pub fn store_apply_view_data(store: &AppStore, data: ViewData) {
    match data {
        ViewData::Dashboard { stats, recent } => {
            *store.stats().write() = stats;
            *store.recent().write() = recent;
        }
        ViewData::Projects(projects) => *store.projects().write() = projects,
        ViewData::Pipelines {
            projects,
            pipelines,
        } => {
            *store.projects().write() = projects;
            *store.pipelines().write() = pipelines;
        }
        ViewData::Environments {
            projects,
            environments,
        } => {
            *store.projects().write() = projects;
            *store.environments().write() = environments;
        }
        ViewData::Todos(todos) => *store.todos().write() = todos,
        ViewData::Empty(_) => {}
    }
}

/// Reassemble `ViewData` for `view` from the store (tracks the fields read)
pub fn store_view_data(store: &AppStore, view: View) -> ViewData {
    match view {
        View::Dashboard => ViewData::Dashboard {
            stats: store.stats().get(),
            recent: store.recent().get(),
        },
        View::Projects => ViewData::Projects(store.projects().get()),
        View::Pipelines => ViewData::Pipelines {
            projects: store.projects().get(),
            pipelines: store.pipelines().get(),
        },
        View::Environments => ViewData::Environments {
            projects: store.projects().get(),
            environments: store.environments().get(),
        },
        View::Todos => ViewData::Todos(store.todos().get()),
        View::Deployments | View::Monitoring => ViewData::Empty(view),
    }
}

/// Mark a view load as started
pub fn store_begin_load(store: &AppStore) {
    *store.pending_loads().write() += 1;
}

/// Mark a view load as finished; the bar stays up until every load is done
pub fn store_finish_load(store: &AppStore) {
    let binding = store.pending_loads();
    let mut pending = binding.write();
    *pending = pending.saturating_sub(1);
}

/// True while any view load is in flight (tracked)
pub fn store_is_loading(store: &AppStore) -> bool {
    store.pending_loads().get() > 0
}

/// Refresh the todo list after a confirmed write
pub fn store_sync_todos(store: &AppStore, todos: &TodoList) {
    *store.todos().write() = todos.snapshot();
}

/// Refresh projects and pipelines after a confirmed write
pub fn store_sync_catalog(store: &AppStore, views: &ViewController) {
    *store.projects().write() = views.projects();
    *store.pipelines().write() = views.pipelines();
}

/// Drop everything on logout
pub fn store_clear(store: &AppStore) {
    *store.stats().write() = DashboardStats::default();
    store.recent().write().clear();
    store.projects().write().clear();
    store.pipelines().write().clear();
    store.environments().write().clear();
    store.todos().write().clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_loads_keep_loading_until_last_finishes() {
        let store: AppStore = Store::new(AppState::default());
        assert!(!store_is_loading(&store));

        store_begin_load(&store);
        store_begin_load(&store);
        store_finish_load(&store);
        assert!(store_is_loading(&store));

        store_finish_load(&store);
        assert!(!store_is_loading(&store));

        // an extra finish never underflows
        store_finish_load(&store);
        assert_eq!(store.pending_loads().get_untracked(), 0);
    }
}
