pub mod cert;
pub mod health;
pub mod hello;
