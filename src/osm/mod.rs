pub mod api;
pub mod source;
pub mod store;
pub mod types;

pub use api::OsmApiClient;
pub use source::{FetchError, OsmSource};
pub use store::EntityStore;
pub use types::{
    Changeset, Completeness, Entity, EntityRef, EntityType, Member, Membership, RefParseError,
    WireElement, WireMember,
};
