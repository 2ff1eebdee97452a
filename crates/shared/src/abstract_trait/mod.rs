mod hashing;
mod jwt;
mod rate_limit;
mod session;

pub use self::hashing::{DynHashing, HashingTrait};
pub use self::jwt::{DynJwtService, JwtServiceTrait};
pub use self::rate_limit::{DynRateLimitMiddleware, RateLimitMiddlewareTrait};
pub use self::session::{DynSessionMiddleware, SessionMiddlewareTrait};
