mod config;
mod deploy;
mod environment;
mod status;
pub mod timestamp;

pub use self::config::{ApiConfig, DEFAULT_PORT};
pub use self::deploy::{AnchorField, DELETION_MESSAGE, Deploy};
pub use self::environment::{EnvironmentState, sort_newest_first};
pub use self::status::DeployStatus;
