// Application layer - Loading, transforms and chart binding
pub mod binding;
pub mod dashboard_service;
pub mod dataset_repository;
pub mod loader;
pub mod transform;
