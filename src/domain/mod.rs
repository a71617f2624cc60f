//! Domain Layer - Core detection entities and value objects

pub mod entities;
pub mod value_objects;

pub use entities::{DetectionResult, Repository};
pub use value_objects::{
    Interface, InterfaceDirection, InterfaceType, Signal, Technology, TechnologyCategory,
};
