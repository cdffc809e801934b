pub mod release;
pub mod repo_config;

pub use release::{Asset, Release};
pub use repo_config::RepoConfig;
