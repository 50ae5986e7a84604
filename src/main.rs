//! Harness Dashboard Frontend Entry Point

mod actions;
mod app;
mod components;
mod config;
mod context;
mod logger;
mod realtime;
mod storage;
mod store;

use std::rc::Rc;

use app::App;
use harness_client::{ClientResult, ReqwestTransport, Services};
use leptos::prelude::*;

use crate::storage::BrowserStorage;

fn build_services() -> ClientResult<Services> {
    let config = config::load();
    logger::init(config.log_level_filter());
    let base_url = config.resolved_base_url(&config::page_origin());
    let storage = BrowserStorage::local()?;
    Services::new(
        config,
        &base_url,
        Rc::new(ReqwestTransport::new()),
        Rc::new(storage),
    )
}

fn main() {
    console_error_panic_hook::set_once();
    match build_services() {
        Ok(services) => mount_to_body(move || view! { <App services=services/> }),
        Err(e) => log::error!("Dashboard failed to start: {}", e),
    }
}
