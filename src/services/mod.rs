//! Service layer modules for external integrations.
//!
//! Currently a single client: the agency-forms service used by the
//! onboarding existence probe.

pub mod forms;

pub use forms::{FormStatus, FormsClient};
