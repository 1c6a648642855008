//! Format-agnostic versioned data migration.
//!
//! `datafixer-core` is the whole algebra and pipeline a document migration
//! system needs — a tree algebra any format can implement
//! ([`value::DynamicOps`]), reversible encode/decode between application
//! types and trees ([`codec::Codec`]), composable rewrites and optics
//! ([`rewrite::TypeRewriteRule`], [`finder::Finder`]), and the registries and
//! pipeline that turn a list of registered fixes into a single
//! `update(type, document, from, to)` call ([`fixer::DataFixer`]).
//!
//! Concrete formats live in their own crates (`datafixer-json`,
//! `datafixer-yaml`, `datafixer-toml`, `datafixer-xml`); this crate never
//! depends on a serialization library itself.

pub mod batch;
pub mod builder;
pub mod codec;
pub mod context;
pub mod finder;
pub mod fix;
pub mod fixer;
pub mod result;
pub mod rewrite;
pub mod schema;
pub mod value;
pub mod version;

pub use builder::{DataFixerBootstrap, DataFixerBuilder, DataFixerRuntimeFactory, FixRegistrar};
pub use codec::Codec;
pub use context::{DataFixerContext, DataFixerError, RecordingContext, SilentContext, SystemContext};
pub use finder::Finder;
pub use fix::{DataFix, DataFixRegistry, FixId};
pub use fixer::DataFixer;
pub use result::DataResult;
pub use rewrite::{Type, Typed, TypeRewriteRule};
pub use schema::{RegistryFrozenError, Schema, SchemaRegistry};
pub use value::{convert_value, Dynamic, DynamicOps, Number};
pub use version::{DataVersion, TypeReference};
