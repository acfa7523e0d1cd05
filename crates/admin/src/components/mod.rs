//! UI composition for admin pages.

pub mod dashboard;
pub mod data_table;

pub use dashboard::{
    Composition, DashboardError, DashboardVariant, DashboardView, HeaderProps, Panel, Tab,
    compose,
};
pub use data_table::DataTableConfig;
