// Library for tests to access modules

pub mod classify;
pub mod collector;
pub mod config;
pub mod error;
pub mod kube_repo;
pub mod models;
pub mod provider;
pub mod routes;
pub mod talos_repo;
