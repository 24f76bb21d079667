pub mod eligibility;
pub mod pipeline;
