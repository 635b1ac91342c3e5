//! Self-healing resilience for the GAIA engine.
//!
//! The circuit breaker consumes the composite threat score each cycle and
//! drives the CLOSED -> OPEN -> HALF_OPEN state machine, signalling an
//! autonomous reset of the evidence windows on successful recovery.

mod breaker;

pub use breaker::{BreakerDecision, CircuitBreaker, CircuitState};
