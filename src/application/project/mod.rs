pub mod add_project_member;
pub mod create_project;
pub mod delete_project;
pub mod get_project_details;
pub mod list_project_members;
pub mod list_projects;
pub mod remove_project_member;
pub mod update_project;

pub use add_project_member::{
  AddProjectMemberCommand, AddProjectMemberResponse, AddProjectMemberUseCase,
};
pub use create_project::{CreateProjectCommand, CreateProjectResponse, CreateProjectUseCase};
pub use delete_project::{DeleteProjectCommand, DeleteProjectUseCase};
pub use get_project_details::{
  GetProjectDetailsCommand, GetProjectDetailsResponse, GetProjectDetailsUseCase,
};
pub use list_project_members::{
  ListProjectMembersCommand, ListProjectMembersResponse, ListProjectMembersUseCase,
};
pub use list_projects::{
  ListProjectsCommand, ListProjectsUseCase, MemberSummaryDto, ProjectListItemDto,
};
pub use remove_project_member::{RemoveProjectMemberCommand, RemoveProjectMemberUseCase};
pub use update_project::{UpdateProjectCommand, UpdateProjectResponse, UpdateProjectUseCase};
