mod broadcast;
mod health_check;
mod home;
mod webhook;

pub use broadcast::*;
pub use health_check::*;
pub use home::*;
pub use webhook::*;
