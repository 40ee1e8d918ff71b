//! One module per subcommand.  Each exposes `execute`.

pub mod add;
pub mod audit_cmd;
pub mod completions;
pub mod delete;
pub mod export;
pub mod init;
pub mod list;
pub mod status;
pub mod tag;
pub mod trash;
pub mod update;
pub mod verify;
pub mod view;
