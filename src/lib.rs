// Library surface for headless/integration tests and reuse.
// Terminal setup and argument parsing stay in main.rs.
pub mod animation;
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod corpus;
pub mod cursor;
pub mod logging;
pub mod runtime;
pub mod scene;
pub mod scheduler;
pub mod trainer;
pub mod ui;
