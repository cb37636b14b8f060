//! Core staging model for catalog-import.
//!
//! This crate holds the in-memory representation of one import candidate
//! (a [`Product`]) together with its sub-entities: per-store-view attribute
//! overrides, stock records, images, product links, tier prices and custom
//! options. Records are staged by the caller, resolved by the resolution
//! stage (names and paths become numeric ids) and committed by the write
//! pipeline; this crate performs no I/O of its own.
//!
//! # Design Overview
//!
//! Two invariants run through the whole model:
//!
//! 1. References to other entities (attribute sets, categories, websites)
//!    are held as closed enums that carry either the numeric id or the raw
//!    caller-supplied name, never both. Whichever form was set last is
//!    authoritative; overwriting the other form is recorded as a warning
//!    on the product.
//! 2. Collection-valued attributes (links, tier prices, custom options)
//!    distinguish "the caller did not touch this" from "the caller wants
//!    this cleared" via [`FieldUpdate`]. The two must never be conflated:
//!    an untouched link kind leaves existing rows alone on re-import, a
//!    cleared one deletes them.

mod links;
mod media;
mod pricing;
mod product;
mod refs;
mod scope;
mod stock;
mod update;
mod url_key;

pub use links::{LinkKind, LinkSet};
pub use media::{Image, ImageRole};
pub use pricing::{CustomOption, PriceType, TierPrice};
pub use product::{Product, ProductType, RecordState, DEFAULT_STOCK_NAME, GLOBAL_STORE_VIEW_CODE};
pub use refs::{AttributeSetRef, CategoryRef, WebsiteRef};
pub use scope::{attr, AttributeValue, StoreView};
pub use stock::StockRecord;
pub use update::FieldUpdate;
pub use url_key::url_key_from_name;
