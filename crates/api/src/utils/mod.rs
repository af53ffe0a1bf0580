pub mod health;
pub mod logging;
pub mod time;
