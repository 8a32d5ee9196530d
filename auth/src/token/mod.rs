pub mod claims;
pub mod clock;
pub mod codec;
pub mod errors;

pub use claims::TokenClaims;
pub use claims::TokenType;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use codec::Principal;
pub use codec::TokenCodec;
pub use codec::TokenLifetimes;
pub use errors::TokenError;
