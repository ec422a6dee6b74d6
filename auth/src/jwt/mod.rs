pub mod claims;
pub mod clock;
pub mod errors;
pub mod handler;
pub mod lookup;
pub mod service;

pub use claims::Claims;
pub use clock::Clock;
pub use clock::SystemClock;
pub use errors::TokenError;
pub use handler::JwtHandler;
pub use lookup::TokenLookup;
pub use lookup::TokenSource;
pub use service::IssuedToken;
pub use service::TokenConfig;
pub use service::TokenService;
