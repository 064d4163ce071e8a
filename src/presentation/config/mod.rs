mod access_policy;
mod settings;

pub use access_policy::AccessPolicy;
pub use settings::{EngineSettings, ServerSettings, Settings, VendorSettings};
