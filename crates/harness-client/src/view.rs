//! View Controller
//!
//! Typed views, an explicit loader table, and the project/pipeline mirrors
//! the dashboard screens render from.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::str::FromStr;

use crate::api::{dashboard_stats, recent_executions, Api};
use crate::error::{ClientError, ClientResult};
use crate::mirror::Mirror;
use crate::models::{
    DashboardStats, Environment, Execution, ExecutionId, ExecutionStarted, NewPipeline,
    NewProject, Pipeline, PipelineId, Project, ProjectId, RecentExecution, Todo,
};
use crate::todos::TodoList;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Dashboard,
    Projects,
    Pipelines,
    Deployments,
    Environments,
    Monitoring,
    Todos,
}

impl View {
    /// Navigation order
    pub const ALL: [View; 7] = [
        View::Dashboard,
        View::Projects,
        View::Pipelines,
        View::Deployments,
        View::Environments,
        View::Monitoring,
        View::Todos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Projects => "projects",
            View::Pipelines => "pipelines",
            View::Deployments => "deployments",
            View::Environments => "environments",
            View::Monitoring => "monitoring",
            View::Todos => "todos",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Projects => "Projects",
            View::Pipelines => "Pipelines",
            View::Deployments => "Deployments",
            View::Environments => "Environments",
            View::Monitoring => "Monitoring",
            View::Todos => "Todos",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            View::Dashboard => "tachometer-alt",
            View::Projects => "folder",
            View::Pipelines => "code-branch",
            View::Deployments => "rocket",
            View::Environments => "layer-group",
            View::Monitoring => "chart-line",
            View::Todos => "check-square",
        }
    }
}

impl FromStr for View {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ClientError::validation(format!("unknown view: {}", s)))
    }
}

/// Everything a view needs to render
#[derive(Debug, Clone, PartialEq)]
pub enum ViewData {
    Dashboard {
        stats: DashboardStats,
        recent: Vec<RecentExecution>,
    },
    Projects(Vec<Project>),
    Pipelines {
        projects: Vec<Project>,
        pipelines: Vec<Pipeline>,
    },
    Environments {
        projects: Vec<Project>,
        environments: Vec<Environment>,
    },
    Todos(Vec<Todo>),
    /// Views with nothing to fetch yet
    Empty(View),
}

type LoadFuture<'a> = Pin<Box<dyn Future<Output = ClientResult<ViewData>> + 'a>>;
type Loader = for<'a> fn(&'a ViewController, View) -> LoadFuture<'a>;

/// View → loader dispatch table
const LOADERS: [(View, Loader); 7] = [
    (View::Dashboard, load_dashboard),
    (View::Projects, load_projects),
    (View::Pipelines, load_pipelines),
    (View::Deployments, load_nothing),
    (View::Environments, load_environments),
    (View::Monitoring, load_nothing),
    (View::Todos, load_todos),
];

pub struct ViewController {
    api: Rc<Api>,
    todos: Rc<TodoList>,
    projects: RefCell<Mirror<Project>>,
    pipelines: RefCell<Mirror<Pipeline>>,
    current: Cell<View>,
    recent_limit: usize,
}

impl ViewController {
    pub fn new(api: Rc<Api>, todos: Rc<TodoList>, recent_limit: usize) -> Self {
        Self {
            api,
            todos,
            projects: RefCell::new(Mirror::new()),
            pipelines: RefCell::new(Mirror::new()),
            current: Cell::new(View::Dashboard),
            recent_limit,
        }
    }

    pub fn current_view(&self) -> View {
        self.current.get()
    }

    pub fn todos(&self) -> &Rc<TodoList> {
        &self.todos
    }

    /// Make `view` current and load it
    pub async fn switch_view(&self, view: View) -> ClientResult<ViewData> {
        self.current.set(view);
        self.load_view_data(view).await
    }

    pub async fn load_view_data(&self, view: View) -> ClientResult<ViewData> {
        let loader = LOADERS
            .iter()
            .find(|(v, _)| *v == view)
            .map(|(_, loader)| *loader)
            .unwrap_or(load_nothing);
        log::debug!("Loading {} view", view.as_str());
        loader(self, view).await.map_err(|e| {
            log::error!("Failed to load {} data: {}", view.as_str(), e);
            e
        })
    }

    pub fn projects(&self) -> Vec<Project> {
        self.projects.borrow().snapshot()
    }

    pub fn pipelines(&self) -> Vec<Pipeline> {
        self.pipelines.borrow().snapshot()
    }

    // ========================
    // Project actions
    // ========================

    pub async fn create_project(&self, project: &NewProject) -> ClientResult<Project> {
        if project.name.trim().is_empty() {
            return Err(ClientError::validation("Please enter a project name"));
        }
        let created = self.api.create_project(project).await?;
        self.projects.borrow_mut().apply_created(created.clone());
        Ok(created)
    }

    pub async fn update_project(&self, id: ProjectId, project: &NewProject) -> ClientResult<Project> {
        let updated = self.api.update_project(id, project).await?;
        self.projects.borrow_mut().apply_updated(updated.clone());
        Ok(updated)
    }

    pub async fn delete_project(&self, id: ProjectId) -> ClientResult<()> {
        self.api.delete_project(id).await?;
        self.projects.borrow_mut().apply_deleted(id);
        self.pipelines
            .borrow_mut()
            .remove_where(|p| p.owner_id() == Some(id));
        Ok(())
    }

    // ========================
    // Pipeline actions
    // ========================

    /// `project_id` is whatever the form's project select held
    pub async fn create_pipeline(
        &self,
        project_id: Option<ProjectId>,
        pipeline: &NewPipeline,
    ) -> ClientResult<Pipeline> {
        let project_id =
            project_id.ok_or_else(|| ClientError::validation("Please select a project"))?;
        let mut created = self.api.create_pipeline(project_id, pipeline).await?;
        self.attach_project(&mut created, project_id);
        self.pipelines.borrow_mut().apply_created(created.clone());
        Ok(created)
    }

    pub async fn update_pipeline(&self, id: PipelineId, pipeline: &NewPipeline) -> ClientResult<Pipeline> {
        let mut updated = self.api.update_pipeline(id, pipeline).await?;
        let owner = self
            .pipelines
            .borrow()
            .get(id)
            .and_then(Pipeline::owner_id)
            .or(updated.project_id);
        if let Some(project_id) = owner {
            self.attach_project(&mut updated, project_id);
        }
        self.pipelines.borrow_mut().apply_updated(updated.clone());
        Ok(updated)
    }

    pub async fn delete_pipeline(&self, id: PipelineId) -> ClientResult<()> {
        self.api.delete_pipeline(id).await?;
        self.pipelines.borrow_mut().apply_deleted(id);
        Ok(())
    }

    pub async fn execute_pipeline(&self, id: PipelineId) -> ClientResult<ExecutionStarted> {
        self.api.execute_pipeline(id).await
    }

    pub async fn pipeline_history(&self, id: PipelineId) -> ClientResult<Vec<Execution>> {
        self.api.get_executions(id).await
    }

    // ========================
    // Execution actions
    // ========================

    pub async fn open_execution(&self, id: ExecutionId) -> ClientResult<Execution> {
        self.api.get_execution(id).await
    }

    pub async fn cancel_execution(&self, id: ExecutionId) -> ClientResult<Execution> {
        self.api.cancel_execution(id).await?;
        self.api.get_execution(id).await
    }

    fn attach_project(&self, pipeline: &mut Pipeline, project_id: ProjectId) {
        pipeline.project_id.get_or_insert(project_id);
        if pipeline.project.is_none() {
            pipeline.project = self.projects.borrow().get(project_id).cloned();
        }
    }
}

// ========================
// Loaders
// ========================

fn load_dashboard(vc: &ViewController, _view: View) -> LoadFuture<'_> {
    Box::pin(async move {
        let (stats, recent) = match vc.api.projects_and_pipelines().await {
            Ok((projects, pipelines)) => (
                dashboard_stats(&projects, &pipelines),
                recent_executions(&pipelines, vc.recent_limit),
            ),
            Err(e) => {
                log::error!("Failed to get dashboard stats: {}", e);
                (DashboardStats::default(), Vec::new())
            }
        };
        Ok(ViewData::Dashboard { stats, recent })
    })
}

fn load_projects(vc: &ViewController, _view: View) -> LoadFuture<'_> {
    Box::pin(async move {
        let projects = vc.api.get_projects().await?;
        vc.projects.borrow_mut().replace_all(projects.clone());
        Ok(ViewData::Projects(projects))
    })
}

fn load_pipelines(vc: &ViewController, _view: View) -> LoadFuture<'_> {
    Box::pin(async move {
        let (projects, pipelines) = vc.api.projects_and_pipelines().await?;
        vc.projects.borrow_mut().replace_all(projects.clone());
        vc.pipelines.borrow_mut().replace_all(pipelines.clone());
        Ok(ViewData::Pipelines {
            projects,
            pipelines,
        })
    })
}

fn load_environments(vc: &ViewController, _view: View) -> LoadFuture<'_> {
    Box::pin(async move {
        let projects = vc.api.get_projects().await?;
        let environments = vc.api.get_all_environments(&projects).await;
        vc.projects.borrow_mut().replace_all(projects.clone());
        Ok(ViewData::Environments {
            projects,
            environments,
        })
    })
}

fn load_todos(vc: &ViewController, _view: View) -> LoadFuture<'_> {
    Box::pin(async move { Ok(ViewData::Todos(vc.todos.reload().await?)) })
}

fn load_nothing(_vc: &ViewController, view: View) -> LoadFuture<'_> {
    Box::pin(async move { Ok(ViewData::Empty(view)) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture, Fixture};
    use crate::transport::Method;
    use serde_json::json;

    fn controller(fx: &Fixture) -> ViewController {
        let todos = Rc::new(TodoList::new(fx.api.clone()));
        ViewController::new(fx.api.clone(), todos, 5)
    }

    #[test]
    fn view_names_round_trip() {
        for view in View::ALL {
            assert_eq!(view.as_str().parse::<View>().unwrap(), view);
        }
        assert!("settings".parse::<View>().is_err());
    }

    #[test]
    fn every_view_has_a_loader() {
        for view in View::ALL {
            assert!(LOADERS.iter().any(|(v, _)| *v == view), "{:?}", view);
        }
    }

    #[tokio::test]
    async fn switch_view_records_and_loads() {
        let fx = fixture();
        fx.transport.respond(
            Method::Get,
            "/api/projects",
            200,
            json!([{"id": 1, "name": "shop"}]),
        );
        let vc = controller(&fx);

        let data = vc.switch_view(View::Projects).await.unwrap();
        assert_eq!(vc.current_view(), View::Projects);
        match data {
            ViewData::Projects(projects) => assert_eq!(projects[0].name, "shop"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(vc.projects().len(), 1);
    }

    #[tokio::test]
    async fn placeholder_views_fetch_nothing() {
        let fx = fixture();
        let vc = controller(&fx);
        let data = vc.switch_view(View::Monitoring).await.unwrap();
        assert_eq!(data, ViewData::Empty(View::Monitoring));
        assert!(fx.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn pipeline_requires_project_selection() {
        let fx = fixture();
        let vc = controller(&fx);
        let err = vc
            .create_pipeline(None, &NewPipeline::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Please select a project");
    }

    #[tokio::test]
    async fn created_pipeline_joins_mirror_with_project() {
        let fx = fixture();
        fx.transport.respond(
            Method::Get,
            "/api/projects",
            200,
            json!([{"id": 3, "name": "api"}]),
        );
        fx.transport
            .respond(Method::Get, "/api/projects/3/pipelines", 200, json!([]));
        fx.transport.respond(
            Method::Post,
            "/api/projects/3/pipelines",
            200,
            json!({"id": 11, "name": "deploy", "trigger_type": "manual"}),
        );
        let vc = controller(&fx);
        vc.switch_view(View::Pipelines).await.unwrap();

        let created = vc
            .create_pipeline(
                Some(3),
                &NewPipeline {
                    name: "deploy".into(),
                    ..NewPipeline::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(created.project.as_ref().unwrap().name, "api");
        let pipelines = vc.pipelines();
        assert_eq!(pipelines.iter().filter(|p| p.id == 11).count(), 1);
    }

    #[tokio::test]
    async fn deleting_project_drops_its_pipelines() {
        let fx = fixture();
        fx.transport.respond(
            Method::Get,
            "/api/projects",
            200,
            json!([{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]),
        );
        fx.transport.respond(
            Method::Get,
            "/api/projects/1/pipelines",
            200,
            json!([{"id": 10, "name": "p10", "trigger_type": "manual"}]),
        );
        fx.transport.respond(
            Method::Get,
            "/api/projects/2/pipelines",
            200,
            json!([{"id": 20, "name": "p20", "trigger_type": "manual"}]),
        );
        fx.transport.respond_raw(Method::Delete, "/api/projects/1", 204, "");
        let vc = controller(&fx);
        vc.switch_view(View::Pipelines).await.unwrap();

        vc.delete_project(1).await.unwrap();
        assert_eq!(vc.projects().iter().map(|p| p.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(vc.pipelines().iter().map(|p| p.id).collect::<Vec<_>>(), vec![20]);
    }

    #[tokio::test]
    async fn failed_load_propagates() {
        let fx = fixture();
        fx.transport.fail(Method::Get, "/api/todos", "offline");
        let vc = controller(&fx);
        assert!(vc.switch_view(View::Todos).await.is_err());
        assert_eq!(vc.current_view(), View::Todos);
    }

    #[tokio::test]
    async fn dashboard_survives_backend_failure() {
        let fx = fixture();
        fx.transport.fail(Method::Get, "/api/projects", "offline");
        let vc = controller(&fx);
        let data = vc.switch_view(View::Dashboard).await.unwrap();
        assert_eq!(
            data,
            ViewData::Dashboard {
                stats: DashboardStats::default(),
                recent: Vec::new()
            }
        );
    }
}
