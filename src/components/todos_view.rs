//! Todos View
//!
//! Add form, filter tabs, the list itself and the bulk actions footer.

use leptos::prelude::*;

use harness_client::models::Priority;
use harness_client::render::{ListView, RowAction, TodoRow, TodoScreen};
use harness_client::TodoFilter;

use crate::actions;
use crate::components::{ActionButtons, EmptyStateView};
use crate::context::use_app_context;
use crate::store::use_app_store;

#[component]
pub fn TodosView(screen: TodoScreen) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let body = match screen.rows {
        ListView::Empty(empty) => view! { <EmptyStateView empty=empty/> }.into_any(),
        ListView::Rows(rows) => view! {
            <ul class="todo-list">
                {rows.into_iter().map(|row| view! { <TodoItem row=row/> }).collect_view()}
            </ul>
        }
        .into_any(),
    };

    let set_filter = move |filter: TodoFilter| {
        ctx.services().todos.set_filter(filter);
        ctx.todo_filter.set(filter);
    };
    let current = screen.filter;
    let has_completed = screen.counts.completed > 0;
    let has_active = screen.counts.active > 0;

    view! {
        <section class="todos">
            <NewTodoForm/>
            <div class="todo-filters">
                {TodoFilter::ALL
                    .iter()
                    .map(|&filter| {
                        view! {
                            <button
                                class={if filter == current { "filter-btn active" } else { "filter-btn" }}
                                on:click=move |_| set_filter(filter)
                            >
                                {filter.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            {body}
            <footer class="todo-footer">
                <span class="todo-count">{screen.summary}</span>
                <Show when=move || has_active>
                    <button class="btn btn-sm btn-outline" on:click=move |_| actions::mark_all_complete(ctx, store)>
                        "Mark all complete"
                    </button>
                </Show>
                <Show when=move || has_completed>
                    <button class="btn btn-sm btn-outline" on:click=move |_| actions::clear_completed(ctx, store)>
                        "Clear completed"
                    </button>
                </Show>
            </footer>
        </section>
    }
}

#[component]
fn NewTodoForm() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let (text, set_text) = signal(String::new());
    let (priority, set_priority) = signal(Priority::Medium);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let value = text.get();
        if value.trim().is_empty() {
            return;
        }
        actions::add_todo(ctx, store, value, priority.get(), move || set_text.set(String::new()));
    };

    view! {
        <form class="new-todo-form" on:submit=submit>
            <input
                type="text"
                placeholder="What needs to be done?"
                prop:value=move || text.get()
                on:input=move |ev| set_text.set(event_target_value(&ev))
            />
            <PrioritySelect
                value=priority.get_untracked()
                on_change=Callback::new(move |p| set_priority.set(p))
            />
            <button type="submit" class="btn btn-primary">"Add"</button>
        </form>
    }
}

#[component]
fn TodoItem(row: TodoRow) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let id = row.id;
    let (editing, set_editing) = signal(false);
    let (draft, set_draft) = signal(row.text.clone());
    let original = row.text.clone();

    let commit = move || {
        set_editing.set(false);
        let text = draft.get_untracked();
        if text.trim() != original.trim() {
            actions::edit_todo(ctx, store, id, text);
        }
    };
    let commit_on_key = commit.clone();

    let buttons = row
        .actions
        .into_iter()
        .filter(|button| !matches!(button.action, RowAction::ToggleTodo(_)))
        .collect::<Vec<_>>();
    let item_class = if row.completed { "todo-item completed" } else { "todo-item" };
    let text = row.text;

    view! {
        <li class=item_class>
            <input
                type="checkbox"
                prop:checked=row.completed
                on:change=move |_| actions::dispatch(ctx, store, RowAction::ToggleTodo(id))
            />
            <Show
                when=move || editing.get()
                fallback=move || view! {
                    <span
                        class="todo-text"
                        title="Double-click to edit"
                        on:dblclick=move |_| set_editing.set(true)
                    >
                        {text.clone()}
                    </span>
                }
            >
                <input
                    type="text"
                    class="todo-edit"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                    on:blur={
                        let commit = commit.clone();
                        move |_| commit()
                    }
                    on:keydown={
                        let commit = commit_on_key.clone();
                        move |ev| match ev.key().as_str() {
                            "Enter" => commit(),
                            "Escape" => set_editing.set(false),
                            _ => {}
                        }
                    }
                />
            </Show>
            <PrioritySelect
                value=row.priority
                on_change=Callback::new(move |p| actions::set_todo_priority(ctx, store, id, p))
            />
            <ActionButtons buttons=buttons/>
        </li>
    }
}

#[component]
fn PrioritySelect(value: Priority, on_change: Callback<Priority>) -> impl IntoView {
    view! {
        <select
            class=format!("priority-select priority-{}", value.as_str())
            on:change=move |ev| on_change.run(Priority::from_str(&event_target_value(&ev)))
        >
            {Priority::ALL
                .iter()
                .map(|&p| view! { <option value=p.as_str() selected={p == value}>{p.as_str()}</option> })
                .collect_view()}
        </select>
    }
}
