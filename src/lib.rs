pub mod configuration;
pub mod domain;
pub mod routes;
pub mod sms_client;
pub mod startup;
pub mod telemetry;
