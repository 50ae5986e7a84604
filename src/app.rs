//! Harness Dashboard App
//!
//! Root component: login gate, sidebar layout and the active view.

use leptos::prelude::*;
use reactive_stores::Store;

use harness_client::render::{render, Screen};
use harness_client::storage::first_visit;
use harness_client::{Services, SessionEvent};

use crate::actions;
use crate::components::{
    DashboardView, EnvironmentsView, ExecutionModal, HistoryModal, LoginForm, NotificationToast,
    PipelineModal, PipelinesView, PlaceholderView, ProjectModal, ProjectsView, Sidebar, TodosView,
    TopBar,
};
use crate::context::{AppContext, Modal};
use crate::realtime;
use crate::store::{store_is_loading, store_view_data, AppState, AppStore};

const WELCOME: &str = "🎉 Welcome to Harness! Create your first project to get started with CI/CD.";
const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";

#[component]
pub fn App(services: Services) -> impl IntoView {
    let ctx = AppContext::new(services.clone());
    let store: AppStore = Store::new(AppState::default());
    provide_context(ctx);
    provide_context(store);

    // Session changes made by the core (401s included) flow into the signal
    services.session.subscribe(move |event, state| match event {
        SessionEvent::Expired => {
            actions::reset_workspace(ctx, store);
            ctx.error(SESSION_EXPIRED);
        }
        SessionEvent::LoggedIn | SessionEvent::LoggedOut => ctx.set_session(state.clone()),
    });

    match first_visit(services.store.as_ref()) {
        Ok(true) => ctx.info(WELCOME),
        Ok(false) => {}
        Err(e) => log::warn!("Could not record first visit: {}", e),
    }

    // Load the current view whenever a reload is requested
    Effect::new(move |_| {
        let _ = ctx.reload_trigger();
        let view = ctx.current_view.get_untracked();
        if ctx.services().session.is_authenticated() {
            actions::load_view(ctx, store, view);
        }
    });

    // One socket per authenticated session
    let realtime_url = services.config.realtime_url.clone();
    Effect::new(move |_| {
        let authenticated = ctx.is_authenticated();
        match (&realtime_url, authenticated) {
            (Some(url), true) => ctx.set_socket(realtime::connect(url, ctx)),
            _ => ctx.set_socket(None),
        }
    });

    view! {
        <Show when=move || ctx.is_authenticated() fallback=|| view! { <LoginForm/> }>
            <div class="app-layout">
                <Sidebar/>
                <main class="main-content">
                    <TopBar/>
                    <Show when=move || store_is_loading(&store)>
                        <div class="loading-bar"></div>
                    </Show>
                    <div class="view-container">{move || current_screen(ctx, store)}</div>
                </main>
            </div>
            {move || ctx.modal.get().map(modal_view)}
            <ExecutionModal/>
        </Show>
        <NotificationToast/>
    }
}

/// Render the active view from the store snapshot
fn current_screen(ctx: AppContext, store: AppStore) -> AnyView {
    let view = ctx.current_view.get();
    let data = store_view_data(&store, view);
    match render(&data, &ctx.render_context()) {
        Screen::Dashboard { stats, recent } => {
            view! { <DashboardView stats=stats recent=recent/> }.into_any()
        }
        Screen::Projects(list) => view! { <ProjectsView list=list/> }.into_any(),
        Screen::Pipelines {
            filter_options,
            selected,
            list,
        } => view! {
            <PipelinesView filter_options=filter_options selected=selected list=list/>
        }
        .into_any(),
        Screen::Environments(list) => view! { <EnvironmentsView list=list/> }.into_any(),
        Screen::Todos(screen) => view! { <TodosView screen=screen/> }.into_any(),
        Screen::Placeholder { title, message } => {
            view! { <PlaceholderView title=title message=message/> }.into_any()
        }
    }
}

fn modal_view(modal: Modal) -> AnyView {
    match modal {
        Modal::NewProject => view! { <ProjectModal/> }.into_any(),
        Modal::NewPipeline(project) => match project {
            Some(project) => view! { <PipelineModal project=project/> }.into_any(),
            None => view! { <PipelineModal/> }.into_any(),
        },
        Modal::EditPipeline(id) => view! { <PipelineModal editing=id/> }.into_any(),
        Modal::History(id) => view! { <HistoryModal pipeline=id/> }.into_any(),
    }
}
