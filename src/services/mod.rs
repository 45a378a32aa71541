//! Service layer
//!
//! Everything between "a request for a code arrived" and "here is what to
//! show": challenge handling, dispatching, the resolver that ties the
//! pipeline together, GeoIP lookups and upstream credentials.

pub mod challenge;
pub mod challenge_store;
pub mod dispatcher;
pub mod geoip;
pub mod resolver;
pub mod session;

pub use challenge::{Challenge, ChallengeState, Operator, Question, Verification};
pub use challenge_store::{ChallengeStore, ChallengeSubmission, IssuedChallenge};
pub use dispatcher::{Dispatcher, FailureKind, Outcome, Render};
pub use geoip::{GeoInfo, GeoIpLookup, GeoIpProvider};
pub use resolver::{Decided, Resolver};
pub use session::{Session, SessionStore};
