use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use events::{Event, EventBus};
use patterns_core::{
    HandlerRole, Plan, PlanExecution, PlanView, Project, ProjectCreated, ProjectExecution,
    ReactResponse, ReflectionResponse, StepExecution, Task, TaskExecution,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::OrchestratorConfig;
use crate::delegation::DelegationEngine;
use crate::error::{OrchestratorError, Result};
use crate::executor::ExecutionEngine;
use crate::oracle::{complete_non_empty, Oracle};
use crate::parser::final_answer;
use crate::planner::PlanGenerator;
use crate::prompts::PatternPrompts;
use crate::reflection::ReflectionLoop;
use crate::store::{Registry, StoredPlan};

/// Entry point composing delegation, planning, execution and reflection
/// over one shared [`Registry`].
#[derive(Clone)]
pub struct Orchestrator {
    oracle: Arc<dyn Oracle>,
    registry: Arc<Registry>,
    delegation: DelegationEngine,
    planner: PlanGenerator,
    executor: ExecutionEngine,
    reflection: ReflectionLoop,
    config: OrchestratorConfig,
    event_bus: Option<EventBus>,
}

impl Orchestrator {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self::with_registry(oracle, Arc::new(Registry::new()))
    }

    pub fn with_registry(oracle: Arc<dyn Oracle>, registry: Arc<Registry>) -> Self {
        Self {
            delegation: DelegationEngine::new(oracle.clone()),
            planner: PlanGenerator::new(oracle.clone()),
            executor: ExecutionEngine::new(oracle.clone(), registry.clone()),
            reflection: ReflectionLoop::new(oracle.clone()),
            oracle,
            registry,
            config: OrchestratorConfig::default(),
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.executor = self.executor.with_event_bus(bus.clone());
        self.reflection = self.reflection.with_event_bus(bus.clone());
        self.event_bus = Some(bus);
        self
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn reflection(&self) -> &ReflectionLoop {
        &self.reflection
    }

    fn emit(&self, event: Event) {
        if let Some(ref bus) = self.event_bus {
            bus.emit(event);
        }
    }

    // Multi-agent delegation

    /// Decompose `request`, classify every task and store the assigned set.
    ///
    /// Nothing is stored unless every classification succeeds.
    pub async fn create_project(&self, request: &str) -> Result<ProjectCreated> {
        let request = request.trim();
        if request.is_empty() {
            return Err(OrchestratorError::Validation(
                "Project request cannot be empty".to_string(),
            ));
        }

        let descriptions = self.delegation.decompose(request).await?;
        let mut tasks = descriptions
            .into_iter()
            .map(Task::new)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for task in tasks.iter_mut() {
            let role = self.delegation.classify(task.description()).await?;
            task.assign(role)
                .map_err(|e| OrchestratorError::from_core(task.id(), e))?;
        }

        let project = Project::new(request, tasks.iter().map(Task::id).collect());
        let project_id = project.id;
        self.registry.insert_tasks(tasks.iter().cloned()).await;
        self.registry.insert_project(project).await;

        for task in &tasks {
            self.emit(Event::TaskCreated {
                task_id: task.id(),
                description: task.description().to_string(),
            });
            if let Some(handler) = task.handler() {
                self.emit(Event::TaskAssigned {
                    task_id: task.id(),
                    handler: handler.to_string(),
                });
            }
        }
        self.emit(Event::ProjectCreated {
            project_id,
            task_count: tasks.len(),
        });
        info!(project_id = %project_id, tasks = tasks.len(), "Project created");

        Ok(ProjectCreated { project_id, tasks })
    }

    /// Tasks of a project in stored order.
    pub async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>> {
        let project = self.registry.get_project(project_id).await?;
        Ok(self.registry.tasks_in_order(&project.task_ids).await)
    }

    pub async fn get_task(&self, task_id: Uuid) -> Result<Task> {
        self.registry.get_task(task_id).await
    }

    pub async fn execute_task(&self, task_id: Uuid) -> Result<TaskExecution> {
        self.executor.execute(task_id).await
    }

    /// Execute every task of a project in order, stopping at the first error.
    pub async fn execute_all(&self, project_id: Uuid) -> Result<ProjectExecution> {
        let project = self.registry.get_project(project_id).await?;
        info!(project_id = %project_id, tasks = project.task_ids.len(), "Executing project");

        let executions = self.executor.execute_batch(&project.task_ids).await?;
        let results: HashMap<Uuid, String> = executions
            .into_iter()
            .map(|execution| (execution.task_id, execution.result))
            .collect();

        Ok(ProjectExecution {
            project_id,
            tasks: self.registry.tasks_in_order(&project.task_ids).await,
            results,
        })
    }

    // Planning

    /// Generate a plan without storing it.
    pub async fn generate_plan(&self, goal: &str) -> Result<Plan> {
        self.planner.generate(goal).await
    }

    /// Store `plan` under its goal, replacing any plan with the same goal.
    ///
    /// Each step becomes a task assigned to the step executor. Tasks of a
    /// replaced plan stay in the registry.
    pub async fn store_plan(&self, plan: Plan) -> Result<PlanView> {
        let mut tasks = Vec::with_capacity(plan.steps.len());
        for step in &plan.steps {
            let mut task = Task::new(step.as_str())?;
            task.assign(HandlerRole::StepExecutor)
                .map_err(|e| OrchestratorError::from_core(task.id(), e))?;
            tasks.push(task);
        }

        let stored = StoredPlan {
            goal: plan.goal.clone(),
            steps: plan.steps,
            task_ids: tasks.iter().map(Task::id).collect(),
            completed: false,
        };
        let view = stored.view();

        self.registry.insert_tasks(tasks).await;
        if self.registry.put_plan(stored).await.is_some() {
            warn!(goal = %plan.goal, "Replaced existing plan with the same goal");
        }

        self.emit(Event::PlanStored {
            goal: view.goal.clone(),
            step_count: view.steps.len(),
        });
        info!(goal = %view.goal, steps = view.steps.len(), "Plan stored");
        Ok(view)
    }

    /// Generate a plan for `goal` and store it.
    pub async fn create_plan(&self, goal: &str) -> Result<PlanView> {
        let plan = self.generate_plan(goal).await?;
        self.store_plan(plan).await
    }

    pub async fn get_plan(&self, goal: &str) -> Result<PlanView> {
        Ok(self.registry.get_plan(goal).await?.view())
    }

    pub async fn list_plans(&self) -> BTreeMap<String, PlanView> {
        self.registry.plan_views().await
    }

    /// Execute every step of the plan stored under `goal`, in order.
    ///
    /// The plan is marked completed only after all steps succeed. A plan that
    /// already ran fails on its first step, which is no longer assigned.
    pub async fn execute_plan(&self, goal: &str) -> Result<PlanExecution> {
        let plan = self.registry.get_plan(goal).await?;
        info!(goal = %goal, steps = plan.steps.len(), "Executing plan");

        let executions = self.executor.execute_batch(&plan.task_ids).await?;
        let plan = self.registry.mark_plan_completed(goal, &plan.task_ids).await?;
        self.emit(Event::PlanCompleted {
            goal: plan.goal.clone(),
        });

        Ok(PlanExecution {
            goal: plan.goal,
            steps: plan.steps,
            results: executions.into_iter().map(|e| e.result).collect(),
            completed: plan.completed,
        })
    }

    pub async fn execute_step(&self, step: &str) -> Result<StepExecution> {
        let result = self.executor.execute_step(step).await?;
        Ok(StepExecution {
            task: step.trim().to_string(),
            result,
        })
    }

    // Reflection

    /// Generate and refine an answer. `iterations` defaults to the configured
    /// round count and may not exceed the configured maximum.
    pub async fn reflect(&self, query: &str, iterations: Option<u32>) -> Result<ReflectionResponse> {
        let rounds = iterations.unwrap_or(self.config.default_reflection_iterations);
        if rounds > self.config.max_reflection_iterations {
            return Err(OrchestratorError::Validation(format!(
                "iterations must be at most {}",
                self.config.max_reflection_iterations
            )));
        }
        self.reflection.reflect(query, rounds).await
    }

    // Assistant

    /// Answer a query directly with the general assistant prompt.
    pub async fn ask(&self, query: &str) -> Result<String> {
        let query = query.trim();
        if query.is_empty() {
            return Err(OrchestratorError::Validation("Query cannot be empty".to_string()));
        }
        Ok(complete_non_empty(self.oracle.as_ref(), &PatternPrompts::assist(query)).await?)
    }

    /// Answer a query through one reason/act pass and split out the
    /// conclusion. No tools are invoked.
    pub async fn react(&self, query: &str) -> Result<ReactResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(OrchestratorError::Validation("Query cannot be empty".to_string()));
        }

        let transcript =
            complete_non_empty(self.oracle.as_ref(), &PatternPrompts::react(query)).await?;
        let final_answer = final_answer(&transcript);
        info!(
            transcript_len = transcript.len(),
            answer_len = final_answer.len(),
            "Reason/act query answered"
        );

        Ok(ReactResponse {
            query: query.to_string(),
            transcript,
            final_answer,
        })
    }
}
