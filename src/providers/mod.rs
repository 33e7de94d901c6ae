//! Concrete message providers

pub mod mqtt;

pub use mqtt::MqttProvider;
