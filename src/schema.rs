//! Destination table names and bootstrap DDL.
//!
//! The engine itself is schema-agnostic (tables are addressed by column
//! list and key); this module pins down the names the pipeline writes to
//! and ships the DDL used by `init-schema` and the e2e tests.

/// Main product rows, keyed by the unique sku.
pub const PRODUCT: &str = "catalog_product";
/// Per-scope attribute values.
pub const PRODUCT_ATTRIBUTE: &str = "catalog_product_attribute";
/// Product-to-website assignments.
pub const PRODUCT_WEBSITE: &str = "catalog_product_website";
/// Product-to-category assignments.
pub const PRODUCT_CATEGORY: &str = "catalog_product_category";
/// Product-to-product links (related / up-sell / cross-sell).
pub const PRODUCT_LINK: &str = "catalog_product_link";
/// Quantity-break prices.
pub const PRODUCT_TIER_PRICE: &str = "catalog_product_tier_price";
/// Buyer-facing custom options.
pub const PRODUCT_OPTION: &str = "catalog_product_option";
/// Per-stock inventory rows.
pub const PRODUCT_STOCK: &str = "catalog_product_stock";
/// Staged image references.
pub const PRODUCT_IMAGE: &str = "catalog_product_image";

/// Category reference table, keyed by the full name path.
pub const CATEGORY: &str = "category";
/// Website reference table, keyed by code.
pub const WEBSITE: &str = "website";
/// Attribute set reference table, keyed by name.
pub const ATTRIBUTE_SET: &str = "attribute_set";

/// CREATE TABLE statements for a fresh destination, in dependency order.
pub fn create_statements() -> Vec<String> {
    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS `{ATTRIBUTE_SET}` (
                `id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
                `name` VARCHAR(255) NOT NULL,
                PRIMARY KEY (`id`),
                UNIQUE KEY `uk_attribute_set_name` (`name`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{WEBSITE}` (
                `id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
                `code` VARCHAR(64) NOT NULL,
                PRIMARY KEY (`id`),
                UNIQUE KEY `uk_website_code` (`code`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{CATEGORY}` (
                `id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
                `path` VARCHAR(512) NOT NULL,
                `name` VARCHAR(255) NOT NULL,
                PRIMARY KEY (`id`),
                UNIQUE KEY `uk_category_path` (`path`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{PRODUCT}` (
                `id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT,
                `sku` VARCHAR(64) NOT NULL,
                `type` VARCHAR(16) NOT NULL,
                `attribute_set_id` BIGINT UNSIGNED NULL,
                `has_options` TINYINT(1) NOT NULL DEFAULT 0,
                `created_at` DATETIME NOT NULL,
                `updated_at` DATETIME NOT NULL,
                PRIMARY KEY (`id`),
                UNIQUE KEY `uk_product_sku` (`sku`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{PRODUCT_ATTRIBUTE}` (
                `product_id` BIGINT UNSIGNED NOT NULL,
                `store_view` VARCHAR(64) NOT NULL,
                `attribute` VARCHAR(64) NOT NULL,
                `value` TEXT NOT NULL,
                PRIMARY KEY (`product_id`, `store_view`, `attribute`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{PRODUCT_WEBSITE}` (
                `product_id` BIGINT UNSIGNED NOT NULL,
                `website_id` BIGINT UNSIGNED NOT NULL,
                PRIMARY KEY (`product_id`, `website_id`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{PRODUCT_CATEGORY}` (
                `category_id` BIGINT UNSIGNED NOT NULL,
                `product_id` BIGINT UNSIGNED NOT NULL,
                PRIMARY KEY (`category_id`, `product_id`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{PRODUCT_LINK}` (
                `product_id` BIGINT UNSIGNED NOT NULL,
                `linked_id` BIGINT UNSIGNED NOT NULL,
                `kind` VARCHAR(16) NOT NULL,
                `position` INT NOT NULL DEFAULT 0,
                PRIMARY KEY (`product_id`, `linked_id`, `kind`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{PRODUCT_TIER_PRICE}` (
                `product_id` BIGINT UNSIGNED NOT NULL,
                `customer_group` VARCHAR(64) NOT NULL DEFAULT '',
                `qty` INT UNSIGNED NOT NULL,
                `price` DECIMAL(20, 6) NOT NULL,
                `price_type` VARCHAR(8) NOT NULL,
                PRIMARY KEY (`product_id`, `customer_group`, `qty`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{PRODUCT_OPTION}` (
                `product_id` BIGINT UNSIGNED NOT NULL,
                `title` VARCHAR(255) NOT NULL,
                `required` TINYINT(1) NOT NULL DEFAULT 0,
                `sku` VARCHAR(64) NULL,
                `price` DECIMAL(20, 6) NULL,
                `price_type` VARCHAR(8) NOT NULL,
                `sort_order` INT NOT NULL DEFAULT 0,
                PRIMARY KEY (`product_id`, `title`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{PRODUCT_STOCK}` (
                `product_id` BIGINT UNSIGNED NOT NULL,
                `stock_name` VARCHAR(64) NOT NULL,
                `qty` DECIMAL(12, 4) NULL,
                `is_in_stock` TINYINT(1) NULL,
                `min_sale_qty` DECIMAL(12, 4) NULL,
                `max_sale_qty` DECIMAL(12, 4) NULL,
                PRIMARY KEY (`product_id`, `stock_name`)
            )"
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS `{PRODUCT_IMAGE}` (
                `product_id` BIGINT UNSIGNED NOT NULL,
                `source` VARCHAR(512) NOT NULL,
                `label` VARCHAR(255) NULL,
                `roles` VARCHAR(64) NOT NULL DEFAULT '',
                PRIMARY KEY (`product_id`, `source`)
            )"
        ),
    ]
}
