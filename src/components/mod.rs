//! UI Components
//!
//! Reusable Leptos components.

mod action_buttons;
mod dashboard_view;
mod delete_confirm_button;
mod environments_view;
mod execution_modal;
mod history_modal;
mod login_form;
mod modal_frame;
mod notification_toast;
mod pipeline_modal;
mod pipelines_view;
mod placeholder_view;
mod project_modal;
mod projects_view;
mod sidebar;
mod todos_view;
mod top_bar;

pub use action_buttons::{ActionButtons, EmptyStateView};
pub use dashboard_view::DashboardView;
pub use delete_confirm_button::DeleteConfirmButton;
pub use environments_view::EnvironmentsView;
pub use execution_modal::ExecutionModal;
pub use history_modal::HistoryModal;
pub use login_form::LoginForm;
pub use modal_frame::ModalFrame;
pub use notification_toast::NotificationToast;
pub use pipeline_modal::PipelineModal;
pub use pipelines_view::PipelinesView;
pub use placeholder_view::PlaceholderView;
pub use project_modal::ProjectModal;
pub use projects_view::ProjectsView;
pub use sidebar::Sidebar;
pub use todos_view::TodosView;
pub use top_bar::TopBar;
