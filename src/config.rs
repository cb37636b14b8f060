//! Import run configuration.

use clap::ValueEnum;

/// Default number of records sent to the database at once. A tested
/// balance between speed and transaction size; raising it speeds the
/// import up only marginally.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default separator between segments of a category name path.
pub const DEFAULT_CATEGORY_PATH_SEPARATOR: &str = "/";

/// How to handle attribute values that are present but empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmptyValueStrategy {
    /// Skip the value; the stored value, if any, stays.
    Ignore,
    /// Remove the stored value from the product.
    Remove,
}

/// What to derive a generated url key from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UrlKeyScheme {
    FromName,
    FromSku,
}

/// What to do when a generated url key is already taken by another
/// product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DuplicateUrlKeyStrategy {
    /// Record an error on the product.
    Error,
    /// Append the normalized sku: `white-dwarf` becomes
    /// `white-dwarf-wd-011`.
    AddSku,
    /// Append an increasing serial: `white-dwarf` becomes
    /// `white-dwarf-1`.
    AddSerial,
    /// Keep the duplicate key as-is.
    Allow,
}

/// Options honored by the import pipeline. Policy lives here; the
/// pipeline and the write engine only carry it out.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Number of buffered records per flush, and the row budget handed
    /// to the write engine.
    pub batch_size: usize,
    /// Validate and resolve, but write nothing.
    pub dry_run: bool,
    /// Create referenced categories that do not exist yet. When false a
    /// missing category rejects the record instead.
    pub auto_create_categories: bool,
    /// Separator between segments of a category name path. Change it
    /// when category names themselves contain `/`.
    pub category_path_separator: String,
    /// Handling of textual attribute values that are present but empty.
    pub empty_text_strategy: EmptyValueStrategy,
    /// Handling of numeric attribute values that are present but empty.
    pub empty_numeric_strategy: EmptyValueStrategy,
    /// Source of generated url keys for records that do not carry one.
    pub url_key_scheme: UrlKeyScheme,
    /// Collision handling for generated url keys.
    pub duplicate_url_key_strategy: DuplicateUrlKeyStrategy,
    /// Website assigned to records carrying no website information.
    pub default_website_code: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
            auto_create_categories: true,
            category_path_separator: DEFAULT_CATEGORY_PATH_SEPARATOR.to_string(),
            empty_text_strategy: EmptyValueStrategy::Ignore,
            empty_numeric_strategy: EmptyValueStrategy::Ignore,
            url_key_scheme: UrlKeyScheme::FromName,
            duplicate_url_key_strategy: DuplicateUrlKeyStrategy::Error,
            default_website_code: None,
        }
    }
}
