//! View Rendering
//!
//! Pure functions from loaded data to screen descriptions. Nothing here
//! touches the network or the DOM; the UI rebuilds its markup from a
//! `Screen` and binds each `RowAction` to a handler.

use chrono::{DateTime, Utc};

use crate::format::{format_date, format_duration};
use crate::models::{
    DashboardStats, Environment, Execution, ExecutionId, ExecutionStatus, Pipeline, PipelineId,
    Priority, Project, ProjectId, RecentExecution, Stage, Todo, TodoId,
};
use crate::realtime::RealtimeEvent;
use crate::todos::{count_todos, TodoCounts, TodoFilter};
use crate::view::{View, ViewData};

pub const NO_DESCRIPTION: &str = "No description provided";
pub const NO_STAGES: &str = "No stages available";
pub const NO_LOGS: &str = "No logs available";

/// Inputs that shape a render besides the data itself
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    pub now: DateTime<Utc>,
    pub search: String,
    pub project_filter: Option<ProjectId>,
    pub todo_filter: TodoFilter,
}

impl RenderContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            search: String::new(),
            project_filter: None,
            todo_filter: TodoFilter::All,
        }
    }

    fn matches_search(&self, name: &str, description: Option<&str>) -> bool {
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || name.to_lowercase().contains(&needle)
            || description.is_some_and(|d| d.to_lowercase().contains(&needle))
    }
}

/// Per-item action, bound to the item's id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    ViewProject(ProjectId),
    NewPipelineFor(ProjectId),
    DeleteProject(ProjectId),
    RunPipeline(PipelineId),
    EditPipeline(PipelineId),
    PipelineHistory(PipelineId),
    DeletePipeline(PipelineId),
    ViewExecution(ExecutionId),
    ToggleTodo(TodoId),
    DeleteTodo(TodoId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonStyle {
    Primary,
    Outline,
    Success,
    Danger,
}

impl ButtonStyle {
    pub fn css_class(&self) -> &'static str {
        match self {
            ButtonStyle::Primary => "btn btn-sm btn-primary",
            ButtonStyle::Outline => "btn btn-sm btn-outline",
            ButtonStyle::Success => "btn btn-sm btn-success",
            ButtonStyle::Danger => "btn btn-sm btn-danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub label: &'static str,
    pub icon: &'static str,
    pub style: ButtonStyle,
    pub action: RowAction,
}

impl ActionButton {
    fn new(label: &'static str, icon: &'static str, style: ButtonStyle, action: RowAction) -> Self {
        Self {
            label,
            icon,
            style,
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub icon: &'static str,
    pub message: &'static str,
    /// Label of the "create" button, if the empty list offers one
    pub create_label: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListView<T> {
    Empty(EmptyState),
    Rows(Vec<T>),
}

impl<T> ListView<T> {
    fn from_rows(rows: Vec<T>, empty: EmptyState) -> Self {
        if rows.is_empty() {
            ListView::Empty(empty)
        } else {
            ListView::Rows(rows)
        }
    }

    pub fn rows(&self) -> &[T] {
        match self {
            ListView::Empty(_) => &[],
            ListView::Rows(rows) => rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }
}

// ========================
// Rows
// ========================

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRow {
    pub id: ExecutionId,
    pub pipeline_name: String,
    pub project_name: String,
    pub status: ExecutionStatus,
    pub started: String,
    pub actions: Vec<ActionButton>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCard {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub pipelines: String,
    pub environments: String,
    pub created: String,
    pub actions: Vec<ActionButton>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRow {
    pub id: PipelineId,
    pub project_id: Option<ProjectId>,
    pub project_name: Option<String>,
    pub name: String,
    pub description: String,
    pub trigger: String,
    /// `None` when the pipeline never ran
    pub last_status: Option<ExecutionStatus>,
    pub last_run: Option<String>,
    pub actions: Vec<ActionButton>,
}

impl PipelineRow {
    pub fn status_label(&self) -> &'static str {
        self.last_status
            .map(|s| s.as_str())
            .unwrap_or("Never executed")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentRow {
    pub id: u32,
    pub name: String,
    pub description: String,
    pub project_name: Option<String>,
    pub created: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TodoRow {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub actions: Vec<ActionButton>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub value: Option<ProjectId>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TodoScreen {
    pub rows: ListView<TodoRow>,
    pub filter: TodoFilter,
    pub counts: TodoCounts,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Dashboard {
        stats: DashboardStats,
        recent: ListView<ExecutionRow>,
    },
    Projects(ListView<ProjectCard>),
    Pipelines {
        filter_options: Vec<FilterOption>,
        selected: Option<ProjectId>,
        list: ListView<PipelineRow>,
    },
    Environments(ListView<EnvironmentRow>),
    Todos(TodoScreen),
    Placeholder {
        title: &'static str,
        message: &'static str,
    },
}

// ========================
// Render
// ========================

pub fn render(data: &ViewData, ctx: &RenderContext) -> Screen {
    match data {
        ViewData::Dashboard { stats, recent } => Screen::Dashboard {
            stats: *stats,
            recent: render_recent(recent, ctx),
        },
        ViewData::Projects(projects) => Screen::Projects(render_projects(projects, ctx)),
        ViewData::Pipelines {
            projects,
            pipelines,
        } => Screen::Pipelines {
            filter_options: project_options(projects),
            selected: ctx.project_filter,
            list: render_pipelines(pipelines, ctx),
        },
        ViewData::Environments {
            projects,
            environments,
        } => Screen::Environments(render_environments(projects, environments, ctx)),
        ViewData::Todos(todos) => Screen::Todos(render_todos(todos, ctx.todo_filter)),
        ViewData::Empty(view) => Screen::Placeholder {
            title: view.title(),
            message: placeholder_message(*view),
        },
    }
}

fn placeholder_message(view: View) -> &'static str {
    match view {
        View::Deployments => "Deployment history will appear here.",
        View::Monitoring => "Monitoring dashboards will appear here.",
        _ => "Nothing to show yet.",
    }
}

pub fn render_recent(recent: &[RecentExecution], ctx: &RenderContext) -> ListView<ExecutionRow> {
    let rows = recent
        .iter()
        .map(|r| ExecutionRow {
            id: r.execution.id,
            pipeline_name: r.pipeline.name.clone(),
            project_name: r.project.as_ref().map(|p| p.name.clone()).unwrap_or_default(),
            status: r.execution.status,
            started: format_date(r.execution.started_at.as_deref(), ctx.now),
            actions: vec![ActionButton::new(
                "View",
                "eye",
                ButtonStyle::Outline,
                RowAction::ViewExecution(r.execution.id),
            )],
        })
        .collect();
    ListView::from_rows(
        rows,
        EmptyState {
            icon: "play-circle",
            message: "No recent executions",
            create_label: None,
        },
    )
}

pub fn render_projects(projects: &[Project], ctx: &RenderContext) -> ListView<ProjectCard> {
    let rows: Vec<ProjectCard> = projects
        .iter()
        .filter(|p| ctx.matches_search(&p.name, p.description.as_deref()))
        .map(|p| ProjectCard {
            id: p.id,
            name: p.name.clone(),
            description: describe(p.description.as_deref()),
            pipelines: format!("{} pipelines", p.pipeline_count),
            environments: format!("{} environments", p.environment_count),
            created: format_date(p.created_at.as_deref(), ctx.now),
            actions: vec![
                ActionButton::new("View", "eye", ButtonStyle::Outline, RowAction::ViewProject(p.id)),
                ActionButton::new(
                    "Pipeline",
                    "plus",
                    ButtonStyle::Primary,
                    RowAction::NewPipelineFor(p.id),
                ),
                ActionButton::new("Delete", "trash", ButtonStyle::Danger, RowAction::DeleteProject(p.id)),
            ],
        })
        .collect();

    let empty = if projects.is_empty() {
        EmptyState {
            icon: "folder",
            message: "No projects found. Create your first project to get started.",
            create_label: Some("Create Project"),
        }
    } else {
        EmptyState {
            icon: "search",
            message: "No projects match your search.",
            create_label: None,
        }
    };
    ListView::from_rows(rows, empty)
}

pub fn render_pipelines(pipelines: &[Pipeline], ctx: &RenderContext) -> ListView<PipelineRow> {
    let rows: Vec<PipelineRow> = pipelines
        .iter()
        .filter(|p| ctx.project_filter.is_none() || p.owner_id() == ctx.project_filter)
        .filter(|p| ctx.matches_search(&p.name, p.description.as_deref()))
        .map(|p| PipelineRow {
            id: p.id,
            project_id: p.owner_id(),
            project_name: p.project.as_ref().map(|proj| proj.name.clone()),
            name: p.name.clone(),
            description: describe(p.description.as_deref()),
            trigger: p.trigger_type.clone(),
            last_status: p.last_execution.as_ref().map(|e| e.status),
            last_run: p
                .last_execution
                .as_ref()
                .map(|e| format_date(e.started_at.as_deref(), ctx.now)),
            actions: vec![
                ActionButton::new("Run", "play", ButtonStyle::Success, RowAction::RunPipeline(p.id)),
                ActionButton::new("Edit", "edit", ButtonStyle::Outline, RowAction::EditPipeline(p.id)),
                ActionButton::new(
                    "History",
                    "history",
                    ButtonStyle::Outline,
                    RowAction::PipelineHistory(p.id),
                ),
                ActionButton::new(
                    "Delete",
                    "trash",
                    ButtonStyle::Danger,
                    RowAction::DeletePipeline(p.id),
                ),
            ],
        })
        .collect();

    let empty = if pipelines.is_empty() {
        EmptyState {
            icon: "code-branch",
            message: "No pipelines found. Create your first pipeline to get started.",
            create_label: Some("Create Pipeline"),
        }
    } else {
        EmptyState {
            icon: "filter",
            message: "No pipelines match the current filter.",
            create_label: None,
        }
    };
    ListView::from_rows(rows, empty)
}

/// "All Projects" followed by one option per project
pub fn project_options(projects: &[Project]) -> Vec<FilterOption> {
    std::iter::once(FilterOption {
        value: None,
        label: "All Projects".to_string(),
    })
    .chain(projects.iter().map(|p| FilterOption {
        value: Some(p.id),
        label: p.name.clone(),
    }))
    .collect()
}

pub fn render_environments(
    projects: &[Project],
    environments: &[Environment],
    ctx: &RenderContext,
) -> ListView<EnvironmentRow> {
    let rows = environments
        .iter()
        .filter(|e| ctx.matches_search(&e.name, e.description.as_deref()))
        .map(|e| EnvironmentRow {
            id: e.id,
            name: e.name.clone(),
            description: describe(e.description.as_deref()),
            project_name: e
                .project_id
                .and_then(|id| projects.iter().find(|p| p.id == id))
                .map(|p| p.name.clone()),
            created: format_date(e.created_at.as_deref(), ctx.now),
        })
        .collect();
    ListView::from_rows(
        rows,
        EmptyState {
            icon: "layer-group",
            message: "No environments found.",
            create_label: None,
        },
    )
}

pub fn render_todos(todos: &[Todo], filter: TodoFilter) -> TodoScreen {
    let rows = todos
        .iter()
        .filter(|t| filter.matches(t))
        .map(|t| TodoRow {
            id: t.id,
            text: t.text.clone(),
            completed: t.completed,
            priority: t.priority,
            actions: vec![
                ActionButton::new(
                    if t.completed { "Undo" } else { "Done" },
                    if t.completed { "undo" } else { "check" },
                    ButtonStyle::Outline,
                    RowAction::ToggleTodo(t.id),
                ),
                ActionButton::new("Delete", "trash", ButtonStyle::Danger, RowAction::DeleteTodo(t.id)),
            ],
        })
        .collect();

    let message = match filter {
        TodoFilter::All => "No todos yet. Add one above.",
        TodoFilter::Active => "No active todos.",
        TodoFilter::Completed => "No completed todos.",
    };
    let counts = count_todos(todos);
    TodoScreen {
        rows: ListView::from_rows(
            rows,
            EmptyState {
                icon: "check-square",
                message,
                create_label: None,
            },
        ),
        filter,
        counts,
        summary: items_left(counts.active),
    }
}

fn items_left(active: usize) -> String {
    if active == 1 {
        "1 item left".to_string()
    } else {
        format!("{} items left", active)
    }
}

fn describe(description: Option<&str>) -> String {
    match description {
        Some(d) if !d.trim().is_empty() => d.to_string(),
        _ => NO_DESCRIPTION.to_string(),
    }
}

// ========================
// Execution detail
// ========================

#[derive(Debug, Clone, PartialEq)]
pub struct StageRow {
    pub name: String,
    pub stage_type: String,
    pub status: ExecutionStatus,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionDetail {
    pub id: ExecutionId,
    pub status: ExecutionStatus,
    pub started: String,
    pub stages: ListView<StageRow>,
    pub logs: Vec<String>,
}

impl ExecutionDetail {
    pub fn cancellable(&self) -> bool {
        !self.status.is_finished()
    }

    /// Apply a pushed status change. Returns whether anything changed.
    pub fn apply(&mut self, event: &RealtimeEvent) -> bool {
        if event.execution_id() != self.id {
            return false;
        }
        match event {
            RealtimeEvent::Execution(update) => {
                let changed = self.status != update.status;
                self.status = update.status;
                changed
            }
            RealtimeEvent::Stage(update) => match &mut self.stages {
                ListView::Rows(rows) => rows
                    .iter_mut()
                    .filter(|s| s.name == update.stage_name)
                    .fold(false, |changed, stage| {
                        let differs = stage.status != update.status;
                        stage.status = update.status;
                        changed || differs
                    }),
                ListView::Empty(_) => false,
            },
        }
    }
}

pub fn render_execution(execution: &Execution, now: DateTime<Utc>) -> ExecutionDetail {
    let stages = execution
        .stages
        .iter()
        .map(|stage| render_stage(stage, now))
        .collect();
    let logs = match execution.logs.as_deref() {
        Some(text) if !text.is_empty() => text.lines().map(str::to_string).collect(),
        _ => vec![NO_LOGS.to_string()],
    };
    ExecutionDetail {
        id: execution.id,
        status: execution.status,
        started: match execution.started_at.as_deref() {
            Some(started) => format_date(Some(started), now),
            None => "Not started".to_string(),
        },
        stages: ListView::from_rows(
            stages,
            EmptyState {
                icon: "stream",
                message: NO_STAGES,
                create_label: None,
            },
        ),
        logs,
    }
}

fn render_stage(stage: &Stage, now: DateTime<Utc>) -> StageRow {
    StageRow {
        name: stage.name.clone(),
        stage_type: stage.stage_type.clone(),
        status: stage.status,
        duration: format_duration(
            stage.started_at.as_deref(),
            stage.finished_at.as_deref(),
            now,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::Mirror;
    use crate::realtime::{ExecutionUpdate, StageUpdate};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn todo(id: u32, text: &str, completed: bool) -> Todo {
        Todo {
            id,
            text: text.into(),
            completed,
            priority: Priority::Medium,
            created_at: None,
        }
    }

    fn project(id: u32, name: &str) -> Project {
        Project {
            id,
            name: name.into(),
            description: None,
            repository_url: None,
            pipeline_count: 0,
            environment_count: 0,
            created_at: None,
        }
    }

    fn pipeline(id: u32, project_id: u32, name: &str) -> Pipeline {
        Pipeline {
            id,
            project_id: Some(project_id),
            name: name.into(),
            description: None,
            trigger_type: "manual".into(),
            yaml_config: None,
            last_execution: None,
            project: None,
        }
    }

    fn todo_ids(screen: &Screen) -> Vec<TodoId> {
        match screen {
            Screen::Todos(todos) => todos.rows.rows().iter().map(|r| r.id).collect(),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn created_todo_renders_once() {
        let mut mirror = Mirror::new();
        mirror.apply_created(todo(1, "Buy milk", false));
        mirror.apply_created(todo(1, "Buy milk", false));

        let screen = render(&ViewData::Todos(mirror.snapshot()), &RenderContext::new(now()));
        match &screen {
            Screen::Todos(todos) => {
                assert_eq!(todos.rows.len(), 1);
                assert_eq!(todos.rows.rows()[0].text, "Buy milk");
                assert_eq!(todos.summary, "1 item left");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn deleted_todo_disappears() {
        let mut mirror = Mirror::from_items(vec![todo(1, "a", false), todo(2, "b", false)]);
        mirror.apply_deleted(1);
        let screen = render(&ViewData::Todos(mirror.snapshot()), &RenderContext::new(now()));
        assert_eq!(todo_ids(&screen), vec![2]);
    }

    #[test]
    fn completed_filter() {
        let ctx = RenderContext {
            todo_filter: TodoFilter::Completed,
            ..RenderContext::new(now())
        };
        let screen = render(
            &ViewData::Todos(vec![todo(1, "a", true), todo(2, "b", false)]),
            &ctx,
        );
        assert_eq!(todo_ids(&screen), vec![1]);
    }

    #[test]
    fn row_actions_carry_ids() {
        let screen = render_todos(&[todo(7, "a", false)], TodoFilter::All);
        let actions: Vec<RowAction> = screen.rows.rows()[0].actions.iter().map(|a| a.action).collect();
        assert_eq!(actions, vec![RowAction::ToggleTodo(7), RowAction::DeleteTodo(7)]);
    }

    #[test]
    fn empty_projects_offer_create() {
        match render_projects(&[], &RenderContext::new(now())) {
            ListView::Empty(empty) => assert_eq!(empty.create_label, Some("Create Project")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn project_search_is_case_insensitive() {
        let ctx = RenderContext {
            search: "SHOP".into(),
            ..RenderContext::new(now())
        };
        let list = render_projects(&[project(1, "webshop"), project(2, "api")], &ctx);
        assert_eq!(list.rows().iter().map(|c| c.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(list.rows()[0].description, NO_DESCRIPTION);
    }

    #[test]
    fn pipeline_project_filter() {
        let ctx = RenderContext {
            project_filter: Some(2),
            ..RenderContext::new(now())
        };
        let list = render_pipelines(&[pipeline(10, 1, "a"), pipeline(20, 2, "b")], &ctx);
        assert_eq!(list.rows().iter().map(|r| r.id).collect::<Vec<_>>(), vec![20]);
        assert_eq!(list.rows()[0].status_label(), "Never executed");
    }

    #[test]
    fn filter_options_start_with_all() {
        let options = project_options(&[project(4, "api")]);
        assert_eq!(options[0].value, None);
        assert_eq!(options[1].label, "api");
    }

    #[test]
    fn placeholder_views() {
        let screen = render(&ViewData::Empty(View::Monitoring), &RenderContext::new(now()));
        assert!(matches!(screen, Screen::Placeholder { title: "Monitoring", .. }));
    }

    fn execution() -> Execution {
        Execution {
            id: 5,
            pipeline_id: Some(1),
            status: ExecutionStatus::Running,
            started_at: Some("2024-03-01T11:59:30Z".into()),
            finished_at: None,
            stages: vec![Stage {
                name: "Build".into(),
                stage_type: "build".into(),
                status: ExecutionStatus::Running,
                started_at: Some("2024-03-01T11:59:30Z".into()),
                finished_at: Some("2024-03-01T11:59:42Z".into()),
            }],
            logs: Some("cloning\nbuilding".into()),
        }
    }

    #[test]
    fn execution_detail() {
        let detail = render_execution(&execution(), now());
        assert_eq!(detail.started, "Just now");
        assert_eq!(detail.stages.rows()[0].duration, "12s");
        assert_eq!(detail.logs, vec!["cloning", "building"]);
        assert!(detail.cancellable());
    }

    #[test]
    fn execution_placeholders() {
        let bare = Execution {
            stages: Vec::new(),
            logs: None,
            started_at: None,
            ..execution()
        };
        let detail = render_execution(&bare, now());
        assert_eq!(detail.started, "Not started");
        match &detail.stages {
            ListView::Empty(empty) => assert_eq!(empty.message, NO_STAGES),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(detail.logs, vec![NO_LOGS]);
    }

    #[test]
    fn realtime_updates_only_matching_execution() {
        let mut detail = render_execution(&execution(), now());

        let other = RealtimeEvent::Execution(ExecutionUpdate {
            execution_id: 6,
            status: ExecutionStatus::Failed,
        });
        assert!(!detail.apply(&other));
        assert_eq!(detail.status, ExecutionStatus::Running);

        let stage = RealtimeEvent::Stage(StageUpdate {
            execution_id: 5,
            stage_name: "Build".into(),
            status: ExecutionStatus::Success,
        });
        assert!(detail.apply(&stage));
        assert_eq!(detail.stages.rows()[0].status, ExecutionStatus::Success);

        let done = RealtimeEvent::Execution(ExecutionUpdate {
            execution_id: 5,
            status: ExecutionStatus::Success,
        });
        assert!(detail.apply(&done));
        assert!(!detail.cancellable());
    }
}
