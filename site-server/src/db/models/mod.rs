//! Database Models

// Serde helpers
pub mod serde_helpers;

// Auth
pub mod user;

// Content
pub mod business_info;
pub mod client;
pub mod project;
pub mod service;

// Re-exports
pub use business_info::{
    About, BusinessInfo, BusinessInfoUpdate, Contact, Socials, Stat, TimelineItem, ValueItem,
    WorkingHours,
};
pub use client::{Client, ClientCreate, ClientUpdate};
pub use project::{Project, ProjectCreate, ProjectUpdate};
pub use service::{Service, ServiceCreate, ServiceUpdate};
pub use user::{NewUser, ROLE_ADMIN, User};
