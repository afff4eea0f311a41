//! Token lifecycle, revocation, and credential policy.
//!
//! This module owns everything with real invariants: the password strength
//! policy enforced at account creation, HS256 session token issuance and
//! verification, the self-cleaning revocation blacklist, the one-time email
//! verification codes, and the per-request authentication gate.

pub mod middleware;
pub mod password;
pub mod revocation;
pub mod service;
pub mod token;
pub mod verification;

pub use middleware::{authenticate, AuthContext};
pub use password::{hash_password, validate, verify_password, ValidationResult};
pub use revocation::RevocationRegistry;
pub use service::{AuthError, AuthService, LoginOutcome, SignupOutcome};
pub use token::{Claims, TokenEngine, TokenError};
pub use verification::{CodeCheck, VerificationCodeRegistry, CODE_TTL};
