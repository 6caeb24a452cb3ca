//! Marketplace logic that sits on top of the entity store: listing queries,
//! inbox aggregation and sale completion.

pub mod conversations;
pub mod filter;
pub mod sales;

pub use conversations::{count_unread, summarize};
pub use filter::{Page, PetFilter};
pub use sales::{complete_sale, CompletedSale};
