pub mod api_key;
pub mod onboarding;
pub mod profile;
pub mod templates;
