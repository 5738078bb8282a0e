pub mod code_host;
pub mod coding_agent;
pub mod issue_tracker;
pub mod version_control;

pub use code_host::CodeHostService;
pub use coding_agent::CodingAgentService;
pub use issue_tracker::IssueTrackerService;
pub use version_control::VersionControlService;
