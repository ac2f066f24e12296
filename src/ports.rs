//! Ports - boundary interfaces between the self-play core and collaborators

pub mod network;

pub use network::PolicyNetwork;
