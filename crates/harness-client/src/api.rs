//! Typed API
//!
//! One method per backend endpoint, plus the aggregated reads the dashboard
//! builds out of them (all pipelines, stats, recent executions).

use std::cmp::Reverse;
use std::rc::Rc;

use serde_json::json;

use crate::client::{server_error, RequestOptions, ResourceClient};
use crate::error::{ClientError, ClientResult};
use crate::format::parse_timestamp;
use crate::models::{
    AuthResponse, ClearedTodos, Credentials, DashboardStats, Environment, EnvironmentId,
    Execution, ExecutionId, ExecutionStarted, ExecutionStatus, NewEnvironment, NewPipeline,
    NewProject, NewTodo, Pipeline, PipelineId, Project, ProjectId, RecentExecution,
    Registration, Todo, TodoId, TodoPatch, User,
};
use crate::session::validate_registration;

pub struct Api {
    client: Rc<ResourceClient>,
}

impl Api {
    pub fn new(client: Rc<ResourceClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Rc<ResourceClient> {
        &self.client
    }

    // ========================
    // Auth
    // ========================

    /// Log in and store the session on success
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<User> {
        let options = RequestOptions::post(credentials)?.public();
        self.authenticate("/api/auth/login", options, "Login failed").await
    }

    /// Validate, register and store the session on success
    pub async fn register(&self, registration: &Registration) -> ClientResult<User> {
        validate_registration(&registration.username, &registration.password)?;
        let options = RequestOptions::post(registration)?.public();
        self.authenticate("/api/auth/register", options, "Registration failed").await
    }

    async fn authenticate(
        &self,
        endpoint: &str,
        options: RequestOptions,
        fallback: &str,
    ) -> ClientResult<User> {
        let response = self.client.send(endpoint, options).await?;
        if !response.is_success() {
            return Err(ClientError::Http {
                status: response.status,
                message: server_error(&response.body).unwrap_or_else(|| fallback.to_string()),
            });
        }
        let auth: AuthResponse = serde_json::from_str(&response.body)?;
        self.client.session().set_auth(auth.token, auth.user.clone())?;
        Ok(auth.user)
    }

    // ========================
    // Projects
    // ========================

    pub async fn get_projects(&self) -> ClientResult<Vec<Project>> {
        self.client.call_json("/api/projects", RequestOptions::get()).await
    }

    pub async fn create_project(&self, project: &NewProject) -> ClientResult<Project> {
        self.client
            .call_json("/api/projects", RequestOptions::post(project)?)
            .await
    }

    pub async fn update_project(&self, id: ProjectId, project: &NewProject) -> ClientResult<Project> {
        self.client
            .call_json(&format!("/api/projects/{}", id), RequestOptions::put(project)?)
            .await
    }

    pub async fn delete_project(&self, id: ProjectId) -> ClientResult<()> {
        self.client
            .call(&format!("/api/projects/{}", id), RequestOptions::delete())
            .await
            .map(|_| ())
    }

    // ========================
    // Pipelines
    // ========================

    pub async fn get_pipelines(&self, project_id: ProjectId) -> ClientResult<Vec<Pipeline>> {
        self.client
            .call_json(&format!("/api/projects/{}/pipelines", project_id), RequestOptions::get())
            .await
    }

    /// Every project's pipelines with the project attached. A project whose
    /// pipelines fail to load is logged and skipped.
    pub async fn get_all_pipelines(&self) -> ClientResult<Vec<Pipeline>> {
        let projects = self.get_projects().await?;
        Ok(self.pipelines_for(&projects).await)
    }

    async fn pipelines_for(&self, projects: &[Project]) -> Vec<Pipeline> {
        let mut all = Vec::new();
        for project in projects {
            match self.get_pipelines(project.id).await {
                Ok(pipelines) => all.extend(pipelines.into_iter().map(|mut pipeline| {
                    pipeline.project_id.get_or_insert(project.id);
                    pipeline.project = Some(project.clone());
                    pipeline
                })),
                Err(e) => log::error!("Failed to get pipelines for project {}: {}", project.id, e),
            }
        }
        all
    }

    pub async fn create_pipeline(
        &self,
        project_id: ProjectId,
        pipeline: &NewPipeline,
    ) -> ClientResult<Pipeline> {
        self.client
            .call_json(
                &format!("/api/projects/{}/pipelines", project_id),
                RequestOptions::post(pipeline)?,
            )
            .await
    }

    pub async fn update_pipeline(&self, id: PipelineId, pipeline: &NewPipeline) -> ClientResult<Pipeline> {
        self.client
            .call_json(&format!("/api/pipelines/{}", id), RequestOptions::put(pipeline)?)
            .await
    }

    pub async fn delete_pipeline(&self, id: PipelineId) -> ClientResult<()> {
        self.client
            .call(&format!("/api/pipelines/{}", id), RequestOptions::delete())
            .await
            .map(|_| ())
    }

    // ========================
    // Executions
    // ========================

    pub async fn execute_pipeline(&self, id: PipelineId) -> ClientResult<ExecutionStarted> {
        self.client
            .call_json(
                &format!("/api/pipelines/{}/execute", id),
                RequestOptions::post(&json!({}))?,
            )
            .await
    }

    pub async fn get_execution(&self, id: ExecutionId) -> ClientResult<Execution> {
        self.client
            .call_json(&format!("/api/executions/{}", id), RequestOptions::get())
            .await
    }

    pub async fn get_executions(&self, pipeline_id: PipelineId) -> ClientResult<Vec<Execution>> {
        self.client
            .call_json(&format!("/api/pipelines/{}/executions", pipeline_id), RequestOptions::get())
            .await
    }

    pub async fn cancel_execution(&self, id: ExecutionId) -> ClientResult<()> {
        self.client
            .call(&format!("/api/executions/{}/cancel", id), RequestOptions::post_empty())
            .await
            .map(|_| ())
    }

    // ========================
    // Environments
    // ========================

    pub async fn get_environments(&self, project_id: ProjectId) -> ClientResult<Vec<Environment>> {
        self.client
            .call_json(&format!("/api/projects/{}/environments", project_id), RequestOptions::get())
            .await
    }

    /// Environments of every project; failing projects are logged and skipped
    pub async fn get_all_environments(&self, projects: &[Project]) -> Vec<Environment> {
        let mut all = Vec::new();
        for project in projects {
            match self.get_environments(project.id).await {
                Ok(environments) => all.extend(environments.into_iter().map(|mut env| {
                    env.project_id.get_or_insert(project.id);
                    env
                })),
                Err(e) => log::error!("Failed to get environments for project {}: {}", project.id, e),
            }
        }
        all
    }

    pub async fn create_environment(
        &self,
        project_id: ProjectId,
        environment: &NewEnvironment,
    ) -> ClientResult<Environment> {
        self.client
            .call_json(
                &format!("/api/projects/{}/environments", project_id),
                RequestOptions::post(environment)?,
            )
            .await
    }

    pub async fn update_environment(
        &self,
        id: EnvironmentId,
        environment: &NewEnvironment,
    ) -> ClientResult<Environment> {
        self.client
            .call_json(&format!("/api/environments/{}", id), RequestOptions::put(environment)?)
            .await
    }

    pub async fn delete_environment(&self, id: EnvironmentId) -> ClientResult<()> {
        self.client
            .call(&format!("/api/environments/{}", id), RequestOptions::delete())
            .await
            .map(|_| ())
    }

    // ========================
    // Todos
    // ========================

    pub async fn get_todos(&self) -> ClientResult<Vec<Todo>> {
        self.client.call_json("/api/todos", RequestOptions::get()).await
    }

    pub async fn create_todo(&self, todo: &NewTodo) -> ClientResult<Todo> {
        self.client.call_json("/api/todos", RequestOptions::post(todo)?).await
    }

    pub async fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> ClientResult<Todo> {
        self.client
            .call_json(&format!("/api/todos/{}", id), RequestOptions::put(patch)?)
            .await
    }

    pub async fn delete_todo(&self, id: TodoId) -> ClientResult<()> {
        self.client
            .call(&format!("/api/todos/{}", id), RequestOptions::delete())
            .await
            .map(|_| ())
    }

    pub async fn clear_completed_todos(&self) -> ClientResult<ClearedTodos> {
        self.client
            .call_json("/api/todos/clear-completed", RequestOptions::delete())
            .await
    }

    // ========================
    // Dashboard
    // ========================

    /// Every project plus every pipeline reachable from them
    pub(crate) async fn projects_and_pipelines(&self) -> ClientResult<(Vec<Project>, Vec<Pipeline>)> {
        let projects = self.get_projects().await?;
        let pipelines = self.pipelines_for(&projects).await;
        Ok((projects, pipelines))
    }
}

/// Count projects, pipelines and last-execution outcomes
pub fn dashboard_stats(projects: &[Project], pipelines: &[Pipeline]) -> DashboardStats {
    let mut stats = DashboardStats {
        total_projects: projects.len(),
        total_pipelines: pipelines.len(),
        ..DashboardStats::default()
    };
    for execution in pipelines.iter().filter_map(|p| p.last_execution.as_ref()) {
        match execution.status {
            ExecutionStatus::Success => stats.successful_deployments += 1,
            ExecutionStatus::Failed => stats.failed_deployments += 1,
            _ => {}
        }
    }
    stats
}

/// Last executions sorted by start time, newest first, truncated to `limit`.
/// Executions without a readable start time sort last.
pub fn recent_executions(pipelines: &[Pipeline], limit: usize) -> Vec<RecentExecution> {
    let mut recent: Vec<RecentExecution> = pipelines
        .iter()
        .filter_map(|pipeline| {
            pipeline.last_execution.as_ref().map(|execution| RecentExecution {
                execution: execution.clone(),
                pipeline: pipeline.clone(),
                project: pipeline.project.clone(),
            })
        })
        .collect();
    recent.sort_by_key(|r| Reverse(r.execution.started_at.as_deref().and_then(parse_timestamp)));
    recent.truncate(limit);
    recent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;
    use crate::storage::{KeyValueStore, TOKEN_KEY};
    use crate::test_support::fixture;
    use crate::transport::Method;
    use serde_json::json;

    fn project(id: u32, name: &str) -> serde_json::Value {
        json!({"id": id, "name": name, "pipeline_count": 1, "environment_count": 0})
    }

    fn pipeline(id: u32, status: &str, started: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": format!("pipe-{}", id),
            "trigger_type": "webhook",
            "last_execution": {"id": id * 10, "status": status, "started_at": started}
        })
    }

    #[tokio::test]
    async fn all_pipelines_attaches_projects_and_skips_failures() {
        let fx = fixture();
        fx.transport.respond(
            Method::Get,
            "/api/projects",
            200,
            json!([project(1, "shop"), project(2, "blog")]),
        );
        fx.transport.respond(
            Method::Get,
            "/api/projects/1/pipelines",
            200,
            json!([pipeline(7, "success", "2024-01-01T10:00:00Z")]),
        );
        fx.transport.respond(
            Method::Get,
            "/api/projects/2/pipelines",
            500,
            json!({"error": "db down"}),
        );

        let pipelines = fx.api.get_all_pipelines().await.unwrap();
        assert_eq!(pipelines.len(), 1);
        assert_eq!(pipelines[0].project.as_ref().unwrap().name, "shop");
        assert_eq!(pipelines[0].owner_id(), Some(1));
    }

    #[tokio::test]
    async fn dashboard_stats_count_outcomes() {
        let fx = fixture();
        fx.transport
            .respond(Method::Get, "/api/projects", 200, json!([project(1, "shop")]));
        fx.transport.respond(
            Method::Get,
            "/api/projects/1/pipelines",
            200,
            json!([
                pipeline(1, "success", "2024-01-01T10:00:00Z"),
                pipeline(2, "failed", "2024-01-02T10:00:00Z"),
                pipeline(3, "running", "2024-01-03T10:00:00Z"),
                {"id": 4, "name": "never", "trigger_type": "manual"}
            ]),
        );

        let (projects, pipelines) = fx.api.projects_and_pipelines().await.unwrap();
        assert_eq!(
            dashboard_stats(&projects, &pipelines),
            DashboardStats {
                total_projects: 1,
                total_pipelines: 4,
                successful_deployments: 1,
                failed_deployments: 1,
            }
        );
    }

    #[tokio::test]
    async fn recent_executions_newest_first() {
        let fx = fixture();
        fx.transport
            .respond(Method::Get, "/api/projects", 200, json!([project(1, "shop")]));
        fx.transport.respond(
            Method::Get,
            "/api/projects/1/pipelines",
            200,
            json!([
                pipeline(1, "success", "2024-01-01T10:00:00Z"),
                pipeline(2, "failed", "2024-03-01T10:00:00Z"),
                pipeline(3, "running", "2024-02-01T10:00:00Z"),
            ]),
        );

        let pipelines = fx.api.get_all_pipelines().await.unwrap();
        let recent = recent_executions(&pipelines, 2);
        let ids: Vec<u32> = recent.iter().map(|r| r.pipeline.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(recent[0].project.as_ref().unwrap().id, 1);
    }

    #[tokio::test]
    async fn login_stores_session() {
        let fx = fixture();
        fx.session.logout().unwrap();
        fx.transport.respond(
            Method::Post,
            "/api/auth/login",
            200,
            json!({"token": "fresh", "user": {"id": 2, "username": "dev"}}),
        );

        let user = fx
            .api
            .login(&Credentials {
                username: "dev".into(),
                password: "hunter22".into(),
            })
            .await
            .unwrap();

        assert_eq!(user.username, "dev");
        assert_eq!(fx.store.get(TOKEN_KEY).unwrap().as_deref(), Some("fresh"));
        assert!(fx.session.is_authenticated());
        assert_eq!(fx.transport.requests()[0].header("Authorization"), None);
    }

    #[tokio::test]
    async fn login_failure_uses_fallback_message() {
        let fx = fixture();
        fx.session.logout().unwrap();
        fx.transport
            .respond_raw(Method::Post, "/api/auth/login", 401, "Unauthorized");

        let err = fx
            .api
            .login(&Credentials {
                username: "dev".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Login failed");
        assert_eq!(fx.session.state(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn register_validates_before_sending() {
        let fx = fixture();
        let err = fx
            .api
            .register(&Registration {
                username: "ab".into(),
                email: "a@b.c".into(),
                password: "secret12".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert!(fx.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn execute_returns_execution_id() {
        let fx = fixture();
        fx.transport.respond(
            Method::Post,
            "/api/pipelines/4/execute",
            200,
            json!({"execution_id": 99}),
        );
        let started = fx.api.execute_pipeline(4).await.unwrap();
        assert_eq!(started.execution_id, 99);
    }

    #[tokio::test]
    async fn cancel_accepts_no_content() {
        let fx = fixture();
        fx.transport
            .respond_raw(Method::Post, "/api/executions/5/cancel", 204, "");
        fx.api.cancel_execution(5).await.unwrap();
        assert_eq!(fx.transport.paths(Method::Post), vec!["/api/executions/5/cancel"]);
    }

    #[tokio::test]
    async fn environment_writes_hit_project_and_environment_routes() {
        let fx = fixture();
        let staging = NewEnvironment {
            name: "staging".into(),
            description: "pre-prod".into(),
        };
        fx.transport.respond(
            Method::Post,
            "/api/projects/3/environments",
            201,
            json!({"id": 8, "project_id": 3, "name": "staging", "description": "pre-prod"}),
        );
        fx.transport.respond(
            Method::Put,
            "/api/environments/8",
            200,
            json!({"id": 8, "project_id": 3, "name": "prod", "description": "live"}),
        );
        fx.transport
            .respond_raw(Method::Delete, "/api/environments/8", 204, "");

        let created = fx.api.create_environment(3, &staging).await.unwrap();
        assert_eq!(created.id, 8);
        assert_eq!(created.project_id, Some(3));

        let updated = fx
            .api
            .update_environment(
                8,
                &NewEnvironment {
                    name: "prod".into(),
                    description: "live".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "prod");

        fx.api.delete_environment(8).await.unwrap();

        assert_eq!(fx.transport.paths(Method::Post), vec!["/api/projects/3/environments"]);
        assert_eq!(fx.transport.paths(Method::Put), vec!["/api/environments/8"]);
        assert_eq!(fx.transport.paths(Method::Delete), vec!["/api/environments/8"]);

        let sent: serde_json::Value =
            serde_json::from_str(fx.transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, json!({"name": "staging", "description": "pre-prod"}));
    }
}
