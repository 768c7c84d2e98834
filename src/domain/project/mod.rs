pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;

pub use entities::{MemberInfo, Project, ProjectMember, ProjectRole, ProjectSummary, ProjectUpdate};
pub use errors::ProjectError;
pub use ports::{ProjectMemberRepository, ProjectRepository};
pub use services::{MemberTarget, ProjectService};
