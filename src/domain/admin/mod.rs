pub mod entities;
pub mod ports;

pub use entities::{
  AdminProjectFilter, AdminSummary, AdminTaskFilter, ProjectNode, ProjectOverview,
  RecentActivity, TaskOverview, Totals, UserNode, UserOverview,
};
pub use ports::AdminRepository;
