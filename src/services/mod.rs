pub mod profile_service;
pub mod template_service;

pub use profile_service::{ProfileError, ProfileService};
pub use template_service::{TemplateError, TemplateService};
