//! Rule execution: run a rule set against one parsed script, isolating
//! failures per rule.

pub mod executor;
pub mod parallel;
pub mod sequential;

pub use executor::{
    create_executor, ExecutionPolicy, RuleExecutionError, RuleExecutor, RuleFailure,
};
pub use parallel::ParallelRuleExecutor;
pub use sequential::SequentialRuleExecutor;
