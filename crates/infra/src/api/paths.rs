//! Identity-provider API paths

use rulesync_domain::MappingId;

pub const TOKEN: &str = "/auth/oauth2/v2/token";

pub const MAPPINGS: &str = "/api/2/mappings";
pub const MAPPINGS_SORT: &str = "/api/2/mappings/sort";

pub const ROLES: &str = "/api/2/roles";
pub const APPS: &str = "/api/2/apps";
pub const USERS: &str = "/api/2/users";
pub const CONNECTORS: &str = "/api/2/connectors";

/// Path of a single mapping rule
pub fn mapping(id: MappingId) -> String {
    format!("{MAPPINGS}/{id}")
}
