//! Command handlers, one module per subcommand.

pub mod completion;
pub mod run;
pub mod session;
pub mod show;
pub mod template;
pub mod validate;
pub mod version;
pub mod view;
