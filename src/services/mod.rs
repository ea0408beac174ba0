pub mod aggregation;
pub mod calories;
pub mod dashboard;
pub mod dates;
pub mod llm;
pub mod news;
pub mod prompt;
