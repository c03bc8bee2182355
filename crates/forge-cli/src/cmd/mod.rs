pub mod generate;
pub mod guidance;
pub mod init;
pub mod prompt;
pub mod steps;
pub mod template;
pub mod ui;
pub mod validate;
