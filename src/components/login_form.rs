//! Login Form Component
//!
//! Sign in, or create an account from the same card.

use leptos::prelude::*;

use harness_client::models::{Credentials, Registration};

use crate::actions;
use crate::context::use_app_context;

#[component]
pub fn LoginForm() -> impl IntoView {
    let ctx = use_app_context();

    let (registering, set_registering) = signal(false);
    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let username = username.get().trim().to_string();
        let password = password.get();
        if username.is_empty() || password.is_empty() {
            ctx.error("Please enter username and password");
            return;
        }
        if registering.get() {
            actions::register(
                ctx,
                Registration {
                    username,
                    email: email.get().trim().to_string(),
                    password,
                },
            );
        } else {
            actions::login(ctx, Credentials { username, password });
        }
        set_password.set(String::new());
    };

    view! {
        <div class="login-screen">
            <form class="login-card" on:submit=submit>
                <h1>
                    <i class="fas fa-rocket"></i>
                    " Harness"
                </h1>
                <p class="login-subtitle">
                    {move || if registering.get() { "Create your account" } else { "Sign in to continue" }}
                </p>
                <input
                    type="text"
                    placeholder="Username"
                    autocomplete="username"
                    prop:value=move || username.get()
                    on:input=move |ev| set_username.set(event_target_value(&ev))
                />
                <Show when=move || registering.get()>
                    <input
                        type="email"
                        placeholder="Email"
                        prop:value=move || email.get()
                        on:input=move |ev| set_email.set(event_target_value(&ev))
                    />
                </Show>
                <input
                    type="password"
                    placeholder="Password"
                    autocomplete="current-password"
                    prop:value=move || password.get()
                    on:input=move |ev| set_password.set(event_target_value(&ev))
                />
                <button type="submit" class="btn btn-primary">
                    {move || if registering.get() { "Register" } else { "Login" }}
                </button>
                <button
                    type="button"
                    class="btn btn-link"
                    on:click=move |_| set_registering.update(|r| *r = !*r)
                >
                    {move || {
                        if registering.get() {
                            "Already have an account? Login"
                        } else {
                            "Need an account? Register"
                        }
                    }}
                </button>
            </form>
        </div>
    }
}
