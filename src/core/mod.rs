//! Core module: records, filters, paging and the data provider contract

pub mod error;
pub mod filter;
pub mod provider;
pub mod query;
pub mod record;

pub use error::{ConfigError, ProbeError, ProbeResult};
pub use filter::{
    BeanFilters, DeploymentModules, EventFilters, Filters, InvocationFilters, ObserverFilters,
};
pub use provider::DataProvider;
pub use query::{Page, QueryParams, paginate};
pub use record::Record;
