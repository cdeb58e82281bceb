pub mod error;
pub mod models;
pub mod orchestrator;
pub mod traits;

pub use error::{KbError, Result};
pub use models::*;
pub use orchestrator::{ClosureFailure, ClosureOrchestrator, ClosureReport, Stage};
pub use traits::{ArticlePublisher, ArticleWriter, IssueSource};
