pub mod common;
pub mod demo;
pub mod email;
pub mod gl;
pub mod init;
pub mod intake;
pub mod reminder;
pub mod review;
pub mod show;
pub mod stage;
pub mod status;
