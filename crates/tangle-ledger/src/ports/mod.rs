//! Ports layer (Hexagonal Architecture)
//!
//! - `inbound`: the API this subsystem offers
//! - `outbound`: the collaborators it depends on

pub mod inbound;
pub mod outbound;

pub use inbound::LedgerApi;
pub use outbound::{
    BundleValidator, ConfirmedTipResolver, RoundStore, TransactionStore, ValidatorSetRecord,
};
