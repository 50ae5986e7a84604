//! Placeholder for views without data

use leptos::prelude::*;

#[component]
pub fn PlaceholderView(title: &'static str, message: &'static str) -> impl IntoView {
    view! {
        <section class="placeholder">
            <i class="fas fa-tools"></i>
            <h3>{title}</h3>
            <p>{message}</p>
        </section>
    }
}
