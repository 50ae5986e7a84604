//! Dashboard Models
//!
//! Data structures matching the backend JSON. Timestamps stay as the
//! server's strings and are parsed on demand by `format`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::mirror::Entity;

pub type ProjectId = u32;
pub type PipelineId = u32;
pub type ExecutionId = u32;
pub type EnvironmentId = u32;
pub type TodoId = u32;

/// Lifecycle of an execution or stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    #[default]
    Pending,
    Running,
    Success,
    Failed,
    Cancelled,
    /// Anything the client does not recognise
    #[serde(other)]
    Unknown,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::Running => "running",
            ExecutionStatus::Success => "success",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Cancelled => "cancelled",
            ExecutionStatus::Unknown => "unknown",
        }
    }

    /// Icon name (font-awesome suffix)
    pub fn icon(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "clock",
            ExecutionStatus::Running => "spinner fa-spin",
            ExecutionStatus::Success => "check-circle",
            ExecutionStatus::Failed => "times-circle",
            ExecutionStatus::Cancelled => "ban",
            ExecutionStatus::Unknown => "question-circle",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "#64748b",
            ExecutionStatus::Running => "#d97706",
            ExecutionStatus::Success => "#16a34a",
            ExecutionStatus::Failed => "#dc2626",
            ExecutionStatus::Cancelled => "#6b7280",
            ExecutionStatus::Unknown => "#64748b",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Success | ExecutionStatus::Failed | ExecutionStatus::Cancelled
        )
    }
}

/// Todo priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "low" => Priority::Low,
            "high" => Priority::High,
            _ => Priority::Medium,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub pipeline_count: u32,
    #[serde(default)]
    pub environment_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub name: String,
    #[serde(rename = "type", default)]
    pub stage_type: String,
    #[serde(default)]
    pub status: ExecutionStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    #[serde(deserialize_with = "flexible_id")]
    pub id: ExecutionId,
    #[serde(default)]
    pub pipeline_id: Option<PipelineId>,
    #[serde(default)]
    pub status: ExecutionStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub finished_at: Option<String>,
    #[serde(default)]
    pub stages: Vec<Stage>,
    #[serde(default)]
    pub logs: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: PipelineId,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub trigger_type: String,
    #[serde(default)]
    pub yaml_config: Option<String>,
    #[serde(default)]
    pub last_execution: Option<Execution>,
    /// Owning project, attached client-side after aggregation
    #[serde(default)]
    pub project: Option<Project>,
}

impl Pipeline {
    /// Project id from the record or from the attached project
    pub fn owner_id(&self) -> Option<ProjectId> {
        self.project_id.or_else(|| self.project.as_ref().map(|p| p.id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub id: EnvironmentId,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Last execution of a pipeline with its pipeline and project attached
#[derive(Debug, Clone, PartialEq)]
pub struct RecentExecution {
    pub execution: Execution,
    pub pipeline: Pipeline,
    pub project: Option<Project>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardStats {
    pub total_projects: usize,
    pub total_pipelines: usize,
    pub successful_deployments: usize,
    pub failed_deployments: usize,
}

// ========================
// Request Payloads
// ========================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub repository_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewPipeline {
    pub name: String,
    pub description: String,
    pub trigger_type: String,
    pub yaml_config: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewEnvironment {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTodo {
    pub text: String,
    pub priority: Priority,
}

/// Partial todo update, absent fields are left untouched by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutionStarted {
    #[serde(deserialize_with = "flexible_id")]
    pub execution_id: ExecutionId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ClearedTodos {
    #[serde(default)]
    pub removed: usize,
}

// ========================
// Entity impls
// ========================

impl Entity for Project {
    type Id = ProjectId;
    fn id(&self) -> ProjectId {
        self.id
    }
}

impl Entity for Pipeline {
    type Id = PipelineId;
    fn id(&self) -> PipelineId {
        self.id
    }
}

impl Entity for Execution {
    type Id = ExecutionId;
    fn id(&self) -> ExecutionId {
        self.id
    }
}

impl Entity for Environment {
    type Id = EnvironmentId;
    fn id(&self) -> EnvironmentId {
        self.id
    }
}

impl Entity for Todo {
    type Id = TodoId;
    fn id(&self) -> TodoId {
        self.id
    }
}

/// Execution ids arrive as numbers from REST and sometimes as strings from
/// the event channel.
pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(u32),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Num(n) => Ok(n),
        RawId::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_decodes_to_unknown() {
        let status: ExecutionStatus = serde_json::from_str("\"queued\"").unwrap();
        assert_eq!(status, ExecutionStatus::Unknown);
        assert_eq!(status.icon(), "question-circle");
    }

    #[test]
    fn todo_priority_defaults_to_medium() {
        let todo: Todo = serde_json::from_str(r#"{"id":3,"text":"x","completed":false}"#).unwrap();
        assert_eq!(todo.priority, Priority::Medium);
    }

    #[test]
    fn execution_id_accepts_strings() {
        let started: ExecutionStarted =
            serde_json::from_str(r#"{"execution_id":"42"}"#).unwrap();
        assert_eq!(started.execution_id, 42);
    }

    #[test]
    fn todo_patch_omits_absent_fields() {
        let patch = TodoPatch {
            completed: Some(true),
            ..Default::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"completed":true}"#);
    }
}
