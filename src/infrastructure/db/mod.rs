pub mod connection;
pub mod entities;
pub mod instances;
pub mod questionnaires;
pub mod share_links;
pub mod suggestions;
