pub mod login;
pub mod session_registry;
pub mod token_exchange;

#[cfg(test)]
pub(crate) mod test_support;

pub use login::{LoginOutcome, LoginUseCase};
pub use session_registry::{IssuedSession, SessionRegistry};
pub use token_exchange::{TokenExchangeOutcome, TokenExchangeUseCase};
