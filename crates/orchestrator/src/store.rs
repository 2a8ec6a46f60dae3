//! In-memory registry owning every task, project and stored plan.
//!
//! One `Registry` is built per process (or per test) and shared by handle.
//! Each map sits behind its own `RwLock`; every mutation is a single
//! write-locked step, and no lock is held across an oracle call.

use std::collections::{BTreeMap, HashMap};

use patterns_core::{CoreError, PlanView, Project, Task};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{OrchestratorError, Result};
use crate::resources::InFlightSet;

/// A plan as kept by the registry: its steps plus the tasks created for them.
#[derive(Debug, Clone)]
pub struct StoredPlan {
    pub goal: String,
    pub steps: Vec<String>,
    /// Step tasks in step order.
    pub task_ids: Vec<Uuid>,
    pub completed: bool,
}

impl StoredPlan {
    pub fn view(&self) -> PlanView {
        PlanView {
            goal: self.goal.clone(),
            steps: self.steps.clone(),
            completed: self.completed,
        }
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    tasks: RwLock<HashMap<Uuid, Task>>,
    projects: RwLock<HashMap<Uuid, Project>>,
    plans: RwLock<HashMap<String, StoredPlan>>,
    in_flight: InFlightSet,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_flight(&self) -> &InFlightSet {
        &self.in_flight
    }

    // Tasks

    pub async fn insert_tasks(&self, tasks: impl IntoIterator<Item = Task>) {
        let mut map = self.tasks.write().await;
        for task in tasks {
            map.insert(task.id(), task);
        }
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task> {
        self.tasks
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(OrchestratorError::TaskNotFound(id))
    }

    /// Tasks for `ids`, in the given order. Unknown ids are skipped.
    pub async fn tasks_in_order(&self, ids: &[Uuid]) -> Vec<Task> {
        let map = self.tasks.read().await;
        ids.iter().filter_map(|id| map.get(id).cloned()).collect()
    }

    pub async fn task_count(&self) -> usize {
        self.tasks.read().await.len()
    }

    /// Apply one transition to a task under the write lock.
    ///
    /// The change is made on a copy and only written back if it succeeds, so
    /// readers never see a half-applied transition.
    pub async fn update_task<F>(&self, id: Uuid, f: F) -> Result<Task>
    where
        F: FnOnce(&mut Task) -> std::result::Result<(), CoreError>,
    {
        let mut map = self.tasks.write().await;
        let current = map.get(&id).ok_or(OrchestratorError::TaskNotFound(id))?;

        let mut next = current.clone();
        f(&mut next).map_err(|e| OrchestratorError::from_core(id, e))?;
        map.insert(id, next.clone());
        Ok(next)
    }

    // Projects

    pub async fn insert_project(&self, project: Project) {
        self.projects.write().await.insert(project.id, project);
    }

    pub async fn get_project(&self, id: Uuid) -> Result<Project> {
        self.projects
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(OrchestratorError::ProjectNotFound(id))
    }

    // Plans

    /// Store `plan` under its trimmed goal, returning the plan it replaced.
    pub async fn put_plan(&self, mut plan: StoredPlan) -> Option<StoredPlan> {
        plan.goal = plan_key(&plan.goal).to_string();
        self.plans.write().await.insert(plan.goal.clone(), plan)
    }

    pub async fn get_plan(&self, goal: &str) -> Result<StoredPlan> {
        let key = plan_key(goal);
        self.plans
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| OrchestratorError::PlanNotFound(key.to_string()))
    }

    /// Every stored plan, ordered by goal.
    pub async fn plan_views(&self) -> BTreeMap<String, PlanView> {
        self.plans
            .read()
            .await
            .iter()
            .map(|(goal, plan)| (goal.clone(), plan.view()))
            .collect()
    }

    /// Set the completed flag, but only if `goal` still maps to the plan
    /// whose tasks were executed.
    pub async fn mark_plan_completed(&self, goal: &str, task_ids: &[Uuid]) -> Result<StoredPlan> {
        let key = plan_key(goal);
        let mut plans = self.plans.write().await;
        let plan = plans
            .get_mut(key)
            .ok_or_else(|| OrchestratorError::PlanNotFound(key.to_string()))?;

        if plan.task_ids == task_ids {
            plan.completed = true;
        }
        Ok(plan.clone())
    }
}

/// Plans are keyed by their goal with surrounding whitespace removed.
fn plan_key(goal: &str) -> &str {
    goal.trim()
}
