//! Shared types: the vault item model and cancellation

mod item;
mod cancellation;

pub use item::{
    VaultItem, VaultRef, Field, FieldType, Section, SectionRef, ItemUrl,
    NOTES_PURPOSE,
};
pub use cancellation::CancellationToken;
