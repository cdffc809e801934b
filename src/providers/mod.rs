pub mod github;

