/// Client listing, creation, updates and deletion
pub mod client;
/// Delimited-text serialization of records
pub mod codec;
pub(crate) mod columns;
/// Doer listing, creation, updates and deletion
pub mod doer;
/// Export files, templates and the projects log
pub mod export;
/// Commission rates and profit margin derivation
pub mod finance;
/// Bulk import with skip-and-report semantics
pub mod import;
/// Outreach messages and send links
pub mod outreach;
/// Project persistence with derived profit margin
pub mod project;
/// Attribute-bag records and entity kinds
pub mod record;
/// Project metrics, name resolution and currency formatting
pub mod report;
/// Serializable filter state for list screens
pub mod search;
/// Project lifecycle statuses
pub mod status;
/// The record store seam
pub mod store;
