mod assistant;
mod health;
mod multi_agent;
mod planning;
mod react;
mod reflection;
pub mod sse;

pub use assistant::*;
pub use health::*;
pub use multi_agent::*;
pub use planning::*;
pub use react::*;
pub use reflection::*;
