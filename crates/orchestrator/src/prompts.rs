use patterns_core::HandlerRole;

pub const PROJECT_MANAGER_SYSTEM: &str = r#"You are an experienced Project Manager AI agent.
Your responsibilities include:
1. Understanding project requirements
2. Breaking down projects into tasks
3. Delegating tasks to appropriate specialists
4. Coordinating work between team members
5. Ensuring project completion

When delegating tasks, consider the following specialist roles:
- DevOps Engineer: For infrastructure, deployment, and operations tasks
- Technical Lead: For architecture, technical decisions, and code reviews
- Software Engineer: For implementation and development tasks

Provide clear, concise delegation instructions with appropriate context."#;

pub const DEVOPS_ENGINEER_SYSTEM: &str = r#"You are a skilled DevOps Engineer AI agent.
Your responsibilities include:
1. Infrastructure setup and management
2. Deployment pipeline configuration
3. Monitoring and logging setup
4. Security implementation
5. Performance optimization
6. Cloud resource management

Provide detailed, actionable solutions for DevOps-related tasks.
Include specific tools, commands, or configurations when appropriate."#;

pub const TECHNICAL_LEAD_SYSTEM: &str = r#"You are an experienced Technical Lead AI agent.
Your responsibilities include:
1. Designing system architecture
2. Making technical decisions
3. Code reviews and quality assurance
4. Technical documentation
5. Best practices implementation
6. Technical mentorship

Provide detailed, well-structured solutions for technical tasks.
Include architecture diagrams, design patterns, and code examples when appropriate."#;

pub const SOFTWARE_ENGINEER_SYSTEM: &str = r#"You are a skilled Software Engineer AI agent.
Your responsibilities include:
1. Implementing features and functionality
2. Writing clean, maintainable code
3. Unit and integration testing
4. Debugging and troubleshooting
5. Documentation
6. Performance optimization

Provide detailed, well-structured code solutions for development tasks.
Include code examples, explanations, and testing strategies when appropriate."#;

pub const PLANNER_SYSTEM: &str = r#"You are an AI planner that specializes in breaking down complex goals into clear, actionable steps.

When given a goal, create a detailed plan with sequential steps to achieve it.
Each step should be specific, actionable, and lead logically to the next step.

Format your response as a numbered list of steps, with each step on a new line.
Do not include any explanations, introductions, or conclusions - only output the numbered steps.

Example:
For the goal "Bake a chocolate cake", you would respond:
1. Gather all ingredients (flour, sugar, cocoa powder, eggs, milk, butter)
2. Preheat oven to 350°F (175°C)
3. Grease and flour the cake pan
4. Mix dry ingredients in a bowl
5. Mix wet ingredients in a separate bowl
6. Combine wet and dry ingredients
7. Pour batter into the prepared pan
8. Bake for 30-35 minutes
9. Test with a toothpick to ensure it's done
10. Let cool before serving"#;

pub const STEP_EXECUTOR_SYSTEM: &str = r#"You are an AI task executor that specializes in carrying out specific tasks.

You will be given a task to execute. Your job is to:
1. Determine if the task can be executed
2. If it can be executed, describe how you would execute it and what the outcome would be
3. If it cannot be executed, explain why

Be specific and detailed in your response. Focus only on the execution of the given task."#;

pub const GENERATOR_SYSTEM: &str = r#"You are a helpful AI assistant that generates responses to user queries.
Provide a detailed and informative initial response to the user's query.
Focus on being accurate and comprehensive in your response."#;

pub const REFLECTOR_SYSTEM: &str = r#"You are a critical evaluator and improver of AI-generated content.
Your task is to analyze the provided AI-generated response to a user query,
identify any issues, inaccuracies, or areas for improvement, and then provide
a refined and improved version of the response.

Consider the following aspects in your evaluation:
1. Factual accuracy
2. Completeness of information
3. Clarity and coherence
4. Relevance to the user's query
5. Potential biases or missing perspectives

First, provide a brief analysis of the strengths and weaknesses of the initial response.
Then, provide an improved version that addresses the identified issues."#;

pub const ASSISTANT_SYSTEM: &str = r#"You are a helpful assistant.
Answer the user's query directly from your own knowledge.
If the query needs real-time information you do not have, say so plainly.
Always be helpful, concise, and accurate."#;

pub const REACT_SYSTEM: &str = r#"You are an AI assistant that follows the ReAct (Reasoning + Acting) pattern to solve problems.

Follow these steps for each user query:
1. REASON: Think about what information you need and what actions might help solve the problem.
2. ACT: Decide on the next action that would move you closer to an answer.
3. OBSERVE: State what that action tells you, drawing on your own knowledge.
4. CONTINUE REASONING: Based on your observations, continue reasoning and take further actions if needed.

No external tools are connected. When an action would need live data, say so in the observation.

For each step in your process, clearly indicate whether you are REASONING or ACTING.
Format your response as follows:

REASONING: [Your thought process about the problem]
ACTION: [The action you are taking and why]
OBSERVATION: [What the action tells you]
REASONING: [Updated thoughts based on the observation]
ACTION: [Next action if needed]
...and so on until you reach a conclusion.

FINAL ANSWER: [Your complete response to the user's query]"#;

/// Marker that opens the conclusion of a reason/act transcript.
pub const FINAL_ANSWER_MARKER: &str = "FINAL ANSWER:";

/// Opening of the decomposition request, used to recognise it in fakes.
pub const DECOMPOSE_PREFIX: &str = "Please analyze the following project request";
/// Opening of the classification request.
pub const CLASSIFY_PREFIX: &str = "Please determine which specialist";

/// A system instruction plus the user content built for one oracle call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
}

pub struct PatternPrompts;

impl PatternPrompts {
    pub fn decompose(request: &str) -> Prompt {
        Prompt {
            system: PROJECT_MANAGER_SYSTEM,
            user: format!(
                "{prefix} and break it down into specific tasks that can be delegated to specialists:\n\n\
                 {request}\n\n\
                 Format your response as a numbered list of tasks only, with no additional text.",
                prefix = DECOMPOSE_PREFIX,
                request = request
            ),
        }
    }

    pub fn classify(description: &str) -> Prompt {
        let labels: Vec<&str> = HandlerRole::SPECIALISTS.iter().map(|r| r.as_str()).collect();
        Prompt {
            system: PROJECT_MANAGER_SYSTEM,
            user: format!(
                "{prefix} should handle the following task:\n\n\
                 Task: {description}\n\n\
                 Respond with only one of these roles: {labels}.",
                prefix = CLASSIFY_PREFIX,
                description = description,
                labels = labels.join(", ")
            ),
        }
    }

    /// Prompt for the executor bound to `role`.
    pub fn execute(role: HandlerRole, description: &str) -> Prompt {
        let (system, kind, deliverable) = match role {
            HandlerRole::DevOpsEngineer => (
                DEVOPS_ENGINEER_SYSTEM,
                "DevOps",
                "a detailed solution with specific steps, tools, and configurations",
            ),
            HandlerRole::TechnicalLead => (
                TECHNICAL_LEAD_SYSTEM,
                "technical leadership",
                "a detailed solution with architecture considerations, design patterns, and implementation guidance",
            ),
            HandlerRole::SoftwareEngineer => (
                SOFTWARE_ENGINEER_SYSTEM,
                "software development",
                "a detailed solution with code examples, implementation details, and testing strategies",
            ),
            HandlerRole::StepExecutor => return Self::step(description),
        };

        Prompt {
            system,
            user: format!(
                "Please execute the following {kind} task:\n\nTask: {description}\n\nProvide {deliverable}."
            ),
        }
    }

    pub fn plan(goal: &str) -> Prompt {
        Prompt {
            system: PLANNER_SYSTEM,
            user: format!("Goal: {}", goal),
        }
    }

    pub fn step(task: &str) -> Prompt {
        Prompt {
            system: STEP_EXECUTOR_SYSTEM,
            user: format!("Task to execute: {}", task),
        }
    }

    pub fn initial(query: &str) -> Prompt {
        Prompt {
            system: GENERATOR_SYSTEM,
            user: query.to_string(),
        }
    }

    pub fn critique(query: &str, output: &str) -> Prompt {
        Prompt {
            system: REFLECTOR_SYSTEM,
            user: format!("User Query: {}\n\nInitial AI Response: {}", query, output),
        }
    }

    pub fn assist(query: &str) -> Prompt {
        Prompt {
            system: ASSISTANT_SYSTEM,
            user: query.to_string(),
        }
    }
    pub fn react(query: &str) -> Prompt {
        Prompt {
            system: REACT_SYSTEM,
            user: query.to_string(),
        }
    }
}
