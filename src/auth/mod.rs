pub mod jwt;
pub mod password;
pub mod role_layer;
pub mod types;

pub use jwt::{JwtKeys, TokenCodec};
pub use password::PasswordHasher;
pub use role_layer::{RequireRolesLayer, RoleRequirement, authorize};
pub use types::{Claims, Principal, PublicUser, Role, TokenPair};
