pub mod content;
pub mod profile;
pub mod template;

pub use content::{
    ContentError, PagePadding, PageOrientation, PageSettings, PaperFormat, TemplateContent,
};
pub use profile::Profile;
pub use template::{Template, TemplateWithContent};
