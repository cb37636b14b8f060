//! The staged import pipeline.
//!
//! Records are buffered up to the configured batch size, then each flush
//! runs the same sequence: validate, generate url keys, resolve named
//! references, and commit every record that survived through the bulk
//! write engine. Records that picked up an error anywhere along the way
//! never reach a write statement but are always reported through the
//! result callback, keyed by their input line number.
//!
//! Commit failures surface at chunk granularity: the records still in
//! flight are rejected with the chunk error and the error propagates to
//! the caller, while chunks already executed keep their effects.

use anyhow::{Context, Result};
use import_core::{attr, url_key_from_name, LinkKind, Product, RecordState};
use mysql_bulk::{statement, BulkConnection, Value};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::config::{DuplicateUrlKeyStrategy, EmptyValueStrategy, ImportConfig, UrlKeyScheme};
use crate::resolver::ReferenceResolver;
use crate::schema;

const MAIN_COLUMNS: &[&str] = &[
    "sku",
    "type",
    "attribute_set_id",
    "has_options",
    "created_at",
    "updated_at",
];

const MAIN_UPSERT: &str = "`type` = VALUES(`type`), \
    `attribute_set_id` = COALESCE(VALUES(`attribute_set_id`), `attribute_set_id`), \
    `has_options` = VALUES(`has_options`), \
    `updated_at` = VALUES(`updated_at`)";

const STOCK_UPSERT: &str = "`qty` = COALESCE(VALUES(`qty`), `qty`), \
    `is_in_stock` = COALESCE(VALUES(`is_in_stock`), `is_in_stock`), \
    `min_sale_qty` = COALESCE(VALUES(`min_sale_qty`), `min_sale_qty`), \
    `max_sale_qty` = COALESCE(VALUES(`max_sale_qty`), `max_sale_qty`)";

/// Per-record outcome delivered through the result callback after every
/// flush. This is the only externally observable per-record signal.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub sku: String,
    pub line_number: u64,
    pub ok: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ImportResult {
    fn of(product: &Product) -> Self {
        ImportResult {
            sku: product.sku().to_string(),
            line_number: product.line_number,
            ok: product.is_ok(),
            errors: product.errors().to_vec(),
            warnings: product.warnings().to_vec(),
        }
    }
}

pub type ResultCallback = Box<dyn FnMut(ImportResult) + Send>;

/// Running totals over all flushes of one import run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportSummary {
    pub imported: u64,
    pub rejected: u64,
}

/// Buffered product importer against one MySQL connection.
pub struct Importer {
    db: BulkConnection,
    config: ImportConfig,
    resolver: ReferenceResolver,
    buffer: Vec<Product>,
    callback: Option<ResultCallback>,
    summary: ImportSummary,
}

impl Importer {
    pub fn new(db: BulkConnection, config: ImportConfig) -> Self {
        Importer {
            db,
            config,
            resolver: ReferenceResolver::new(),
            buffer: Vec::new(),
            callback: None,
            summary: ImportSummary::default(),
        }
    }

    /// Install the per-record result callback.
    pub fn with_result_callback(mut self, callback: impl FnMut(ImportResult) + Send + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn summary(&self) -> ImportSummary {
        self.summary
    }

    /// Stage one record; flushes automatically when the buffer reaches
    /// the configured batch size.
    pub async fn import(&mut self, product: Product) -> Result<()> {
        self.buffer.push(product);
        if self.buffer.len() >= self.config.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Process everything currently buffered. Must also be called once
    /// after the last record was staged; [`finish`](Self::finish) does so.
    pub async fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let mut batch = std::mem::take(&mut self.buffer);
        debug!(records = batch.len(), "flushing batch");

        match self.process_batch(&mut batch).await {
            Ok(()) => {
                self.deliver(batch);
                Ok(())
            }
            Err(e) => {
                // Chunk-level failure: reject what was still in flight,
                // keep what was already committed, report everything.
                for product in batch.iter_mut() {
                    if product.is_ok() && product.state() != RecordState::Committed {
                        product.add_error(format!("batch write failed: {e:#}"));
                    }
                }
                self.deliver(batch);
                Err(e)
            }
        }
    }

    /// Flush the remaining records and close the connection.
    pub async fn finish(mut self) -> Result<ImportSummary> {
        self.flush().await?;
        self.db.disconnect().await?;
        Ok(self.summary)
    }

    async fn process_batch(&mut self, batch: &mut [Product]) -> Result<()> {
        validate_batch(batch, &self.config);
        self.apply_url_keys(batch).await.context("checking url keys")?;
        self.resolver
            .resolve(&mut self.db, batch, &self.config)
            .await
            .context("resolving named references")?;

        for product in batch.iter_mut() {
            if product.is_ok() && product.state() == RecordState::Staging {
                product.mark_validated();
            }
        }

        if self.config.dry_run {
            debug!("dry run, skipping commit");
            return Ok(());
        }
        self.commit(batch).await
    }

    /// Generate missing url keys and apply the duplicate-key strategy.
    ///
    /// Duplicates are checked against the keys already stored for other
    /// skus and against keys assigned earlier in the same batch. Keys the
    /// caller supplied explicitly are taken as-is.
    async fn apply_url_keys(&mut self, batch: &mut [Product]) -> Result<()> {
        let mut candidates: Vec<(usize, String, String)> = Vec::new();
        let mut underivable: Vec<usize> = Vec::new();
        for (idx, product) in batch.iter().enumerate() {
            if !product.is_ok() {
                continue;
            }
            for (scope, view) in product.store_views() {
                if view.attribute(attr::URL_KEY).is_some() {
                    continue;
                }
                let key = match self.config.url_key_scheme {
                    UrlKeyScheme::FromName => match view.attribute(attr::NAME).and_then(|v| v.as_text()) {
                        Some(name) => url_key_from_name(name),
                        None => continue,
                    },
                    UrlKeyScheme::FromSku => url_key_from_name(product.sku()),
                };
                if key.is_empty() {
                    underivable.push(idx);
                } else {
                    candidates.push((idx, scope.to_string(), key));
                }
            }
        }
        for idx in underivable {
            batch[idx].add_error("cannot derive a usable url key");
        }
        if candidates.is_empty() {
            return Ok(());
        }

        let mut keys: Vec<&str> = candidates.iter().map(|(_, _, k)| k.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        let sql = format!(
            "SELECT a.`value`, p.`sku` FROM `{}` a \
             JOIN `{}` p ON p.`id` = a.`product_id` \
             WHERE a.`attribute` = 'url_key' AND a.`value` IN ({})",
            schema::PRODUCT_ATTRIBUTE,
            schema::PRODUCT,
            statement::marks(keys.len())
        );
        let params = keys.iter().map(|k| Value::from(*k)).collect();
        let taken: HashMap<String, String> = self.db.fetch_map(&sql, params).await?;

        let mut assigned: HashSet<(String, String)> = HashSet::new();
        for (idx, scope, key) in candidates {
            let product = &mut batch[idx];
            if !product.is_ok() {
                continue;
            }
            let sku = product.sku().to_string();
            let mut final_key = key;
            if is_taken(&taken, &assigned, &scope, &final_key, &sku) {
                match self.config.duplicate_url_key_strategy {
                    DuplicateUrlKeyStrategy::Error => {
                        product.add_error(format!("url key already in use: {final_key}"));
                        continue;
                    }
                    DuplicateUrlKeyStrategy::AddSku => {
                        final_key = format!("{final_key}-{}", url_key_from_name(&sku));
                        if is_taken(&taken, &assigned, &scope, &final_key, &sku) {
                            product.add_error(format!("url key already in use: {final_key}"));
                            continue;
                        }
                    }
                    DuplicateUrlKeyStrategy::AddSerial => {
                        let base = final_key.clone();
                        let mut serial = 1u32;
                        while is_taken(&taken, &assigned, &scope, &final_key, &sku) {
                            final_key = format!("{base}-{serial}");
                            serial += 1;
                        }
                    }
                    DuplicateUrlKeyStrategy::Allow => {}
                }
            }
            assigned.insert((scope.clone(), final_key.clone()));
            product.store_view(&scope).set_url_key(&final_key);
        }
        Ok(())
    }

    async fn commit(&mut self, batch: &mut [Product]) -> Result<()> {
        let ready = ready_indexes(batch);
        if ready.is_empty() {
            return Ok(());
        }
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();

        // Main rows first, idempotent by sku.
        let values = main_row_values(batch, &ready, &now);
        self.db
            .insert_many_upsert(schema::PRODUCT, MAIN_COLUMNS, values, MAIN_UPSERT)
            .await
            .context("writing product rows")?;

        // Back-fill ids for everything in this batch.
        let skus: Vec<Value> = ready.iter().map(|&i| Value::from(batch[i].sku())).collect();
        let sql = format!(
            "SELECT `sku`, `id` FROM `{}` WHERE `sku` IN ({})",
            schema::PRODUCT,
            statement::marks(skus.len())
        );
        let ids: HashMap<String, u64> = self
            .db
            .fetch_map(&sql, skus)
            .await
            .context("reading back product ids")?;
        for &i in &ready {
            match ids.get(batch[i].sku()) {
                Some(id) => batch[i].set_id(*id),
                None => batch[i].add_error("product row missing after write"),
            }
        }
        let ready = ready_indexes(batch);

        self.commit_attributes(batch, &ready).await?;
        self.commit_websites(batch, &ready).await?;
        self.commit_categories(batch, &ready).await?;
        self.commit_links(batch, &ready).await?;
        self.commit_tier_prices(batch, &ready).await?;
        self.commit_custom_options(batch, &ready).await?;
        self.commit_stocks(batch, &ready).await?;
        self.commit_images(batch, &ready).await?;

        for &i in &ready {
            batch[i].mark_committed();
        }
        Ok(())
    }

    async fn commit_attributes(&mut self, batch: &mut [Product], ready: &[usize]) -> Result<()> {
        let mut values: Vec<Value> = Vec::new();
        let mut removals: HashMap<(String, String), Vec<Value>> = HashMap::new();
        for &i in ready {
            let product = &batch[i];
            for (scope, view) in product.store_views() {
                for (code, value) in view.attributes() {
                    values.push(id_value(product));
                    values.push(Value::from(scope));
                    values.push(Value::from(code));
                    values.push(Value::from(value.to_column_value()));
                }
                for code in view.removals() {
                    removals
                        .entry((scope.to_string(), code.clone()))
                        .or_default()
                        .push(id_value(product));
                }
            }
        }
        self.db
            .insert_many_upsert(
                schema::PRODUCT_ATTRIBUTE,
                &["product_id", "store_view", "attribute", "value"],
                values,
                "`value` = VALUES(`value`)",
            )
            .await
            .context("writing attribute values")?;

        // Scope and attribute codes are caller data, so removals go
        // through fully parameterized statements instead of an opaque
        // condition fragment.
        for ((scope, code), pids) in removals {
            for chunk in statement::key_chunks(&pids, self.db.chunk_size()) {
                let sql = format!(
                    "DELETE FROM `{}` WHERE `store_view` = ? AND `attribute` = ? AND `product_id` IN ({})",
                    schema::PRODUCT_ATTRIBUTE,
                    statement::marks(chunk.len())
                );
                let mut params = vec![Value::from(scope.as_str()), Value::from(code.as_str())];
                params.extend(chunk.to_vec());
                self.db.execute(&sql, params).await.context("removing attribute values")?;
            }
        }
        Ok(())
    }

    async fn commit_websites(&mut self, batch: &[Product], ready: &[usize]) -> Result<()> {
        let mut values: Vec<Value> = Vec::new();
        for &i in ready {
            let product = &batch[i];
            if let Some(ids) = product.websites().ids() {
                for website_id in ids {
                    values.push(id_value(product));
                    values.push(Value::from(*website_id));
                }
            }
        }
        self.db
            .insert_many_ignore(schema::PRODUCT_WEBSITE, &["product_id", "website_id"], values)
            .await
            .context("writing website assignments")
    }

    async fn commit_categories(&mut self, batch: &[Product], ready: &[usize]) -> Result<()> {
        let mut values: Vec<Value> = Vec::new();
        for &i in ready {
            let product = &batch[i];
            if let Some(ids) = product.categories().ids() {
                for category_id in ids {
                    values.push(Value::from(*category_id));
                    values.push(id_value(product));
                }
            }
        }
        self.db
            .insert_many_ignore(schema::PRODUCT_CATEGORY, &["category_id", "product_id"], values)
            .await
            .context("writing category assignments")
    }

    async fn commit_links(&mut self, batch: &mut [Product], ready: &[usize]) -> Result<()> {
        // One lookup for every sku referenced as a link target.
        let mut link_skus: Vec<String> = Vec::new();
        for &i in ready {
            for kind in LinkKind::ALL {
                if let Some(skus) = batch[i].linked_skus(kind) {
                    link_skus.extend(skus.iter().cloned());
                }
            }
        }
        link_skus.sort_unstable();
        link_skus.dedup();
        let sku_ids: HashMap<String, u64> = if link_skus.is_empty() {
            HashMap::new()
        } else {
            let sql = format!(
                "SELECT `sku`, `id` FROM `{}` WHERE `sku` IN ({})",
                schema::PRODUCT,
                statement::marks(link_skus.len())
            );
            let params = link_skus.iter().map(|s| Value::from(s.as_str())).collect();
            self.db.fetch_map(&sql, params).await.context("resolving link targets")?
        };

        for kind in LinkKind::ALL {
            let mut pids: Vec<Value> = Vec::new();
            let mut rows: Vec<Value> = Vec::new();
            let mut link_warnings: Vec<(usize, String)> = Vec::new();
            for &i in ready {
                let product = &batch[i];
                let explicit = product.linked_ids(kind);
                let by_sku = product.linked_skus(kind);
                if explicit.is_none() && by_sku.is_none() {
                    // Untouched: stored links of this kind stay as they are.
                    continue;
                }
                pids.push(id_value(product));
                let mut targets: Vec<u64> = explicit.map(<[u64]>::to_vec).unwrap_or_default();
                if let Some(skus) = by_sku {
                    for sku in skus {
                        match sku_ids.get(sku) {
                            Some(id) => targets.push(*id),
                            None => link_warnings
                                .push((i, format!("{kind} link target not found: {sku}"))),
                        }
                    }
                }
                for (position, target) in targets.iter().enumerate() {
                    rows.push(id_value(product));
                    rows.push(Value::from(*target));
                    rows.push(Value::from(kind.as_str()));
                    rows.push(Value::from(position as u32));
                }
            }
            if pids.is_empty() {
                continue;
            }
            // The kind value is a closed-enum literal, not caller data.
            self.db
                .delete_many_where(
                    schema::PRODUCT_LINK,
                    "product_id",
                    pids,
                    &format!("`kind` = '{}'", kind.as_str()),
                )
                .await
                .context("clearing product links")?;
            self.db
                .insert_many_ignore(
                    schema::PRODUCT_LINK,
                    &["product_id", "linked_id", "kind", "position"],
                    rows,
                )
                .await
                .context("writing product links")?;
            for (i, warning) in link_warnings {
                batch[i].add_warning(warning);
            }
        }
        Ok(())
    }

    async fn commit_tier_prices(&mut self, batch: &[Product], ready: &[usize]) -> Result<()> {
        let mut pids: Vec<Value> = Vec::new();
        let mut rows: Vec<Value> = Vec::new();
        for &i in ready {
            let product = &batch[i];
            let Some(prices) = product.tier_prices().values() else {
                continue;
            };
            pids.push(id_value(product));
            for tier in prices {
                rows.push(id_value(product));
                rows.push(Value::from(tier.customer_group.as_deref().unwrap_or("")));
                rows.push(Value::from(tier.qty));
                rows.push(Value::from(tier.price.to_string()));
                rows.push(Value::from(tier.price_type.as_str()));
            }
        }
        if pids.is_empty() {
            return Ok(());
        }
        self.db
            .delete_many(schema::PRODUCT_TIER_PRICE, "product_id", pids)
            .await
            .context("clearing tier prices")?;
        self.db
            .insert_many(
                schema::PRODUCT_TIER_PRICE,
                &["product_id", "customer_group", "qty", "price", "price_type"],
                rows,
            )
            .await
            .context("writing tier prices")
    }

    async fn commit_custom_options(&mut self, batch: &[Product], ready: &[usize]) -> Result<()> {
        let mut pids: Vec<Value> = Vec::new();
        let mut rows: Vec<Value> = Vec::new();
        for &i in ready {
            let product = &batch[i];
            let Some(options) = product.custom_options().values() else {
                continue;
            };
            pids.push(id_value(product));
            for (position, option) in options.iter().enumerate() {
                rows.push(id_value(product));
                rows.push(Value::from(option.title.as_str()));
                rows.push(Value::from(option.required));
                rows.push(Value::from(option.sku.as_deref()));
                rows.push(Value::from(option.price.map(|p| p.to_string())));
                rows.push(Value::from(option.price_type.as_str()));
                rows.push(Value::from(position as u32));
            }
        }
        if pids.is_empty() {
            return Ok(());
        }
        self.db
            .delete_many(schema::PRODUCT_OPTION, "product_id", pids)
            .await
            .context("clearing custom options")?;
        self.db
            .insert_many(
                schema::PRODUCT_OPTION,
                &["product_id", "title", "required", "sku", "price", "price_type", "sort_order"],
                rows,
            )
            .await
            .context("writing custom options")
    }

    async fn commit_stocks(&mut self, batch: &[Product], ready: &[usize]) -> Result<()> {
        let mut values: Vec<Value> = Vec::new();
        for &i in ready {
            let product = &batch[i];
            for (name, stock) in product.stocks() {
                if stock.is_empty() {
                    continue;
                }
                values.push(id_value(product));
                values.push(Value::from(name));
                values.push(Value::from(stock.qty().map(|q| q.to_string())));
                values.push(Value::from(stock.is_in_stock()));
                values.push(Value::from(stock.min_sale_qty().map(|q| q.to_string())));
                values.push(Value::from(stock.max_sale_qty().map(|q| q.to_string())));
            }
        }
        self.db
            .insert_many_upsert(
                schema::PRODUCT_STOCK,
                &["product_id", "stock_name", "qty", "is_in_stock", "min_sale_qty", "max_sale_qty"],
                values,
                STOCK_UPSERT,
            )
            .await
            .context("writing stock records")
    }

    async fn commit_images(&mut self, batch: &[Product], ready: &[usize]) -> Result<()> {
        let mut values: Vec<Value> = Vec::new();
        for &i in ready {
            let product = &batch[i];
            for image in product.images() {
                let roles: Vec<&str> = image.roles().iter().map(|r| r.as_str()).collect();
                values.push(id_value(product));
                values.push(Value::from(image.source_path()));
                values.push(Value::from(image.label()));
                values.push(Value::from(roles.join(",")));
            }
        }
        self.db
            .insert_many_ignore(
                schema::PRODUCT_IMAGE,
                &["product_id", "source", "label", "roles"],
                values,
            )
            .await
            .context("writing image references")
    }

    fn deliver(&mut self, batch: Vec<Product>) {
        for product in &batch {
            let result = ImportResult::of(product);
            if result.ok {
                self.summary.imported += 1;
            } else {
                self.summary.rejected += 1;
            }
            if let Some(callback) = self.callback.as_mut() {
                callback(result);
            }
        }
    }
}

/// Batch-local validation: skus must be non-empty and unique within the
/// batch, and present-but-empty textual values are folded per the
/// configured strategy.
fn validate_batch(batch: &mut [Product], config: &ImportConfig) {
    let mut seen: HashSet<String> = HashSet::new();
    for product in batch.iter_mut() {
        if product.sku().is_empty() {
            product.add_error("missing sku");
        } else if !seen.insert(product.sku().to_string()) {
            product.add_error(format!("duplicate sku in batch: {}", product.sku()));
        }
        if product.is_ok() {
            apply_empty_text_strategy(product, config.empty_text_strategy);
        }
    }
}

fn apply_empty_text_strategy(product: &mut Product, strategy: EmptyValueStrategy) {
    let mut empties: Vec<(String, Vec<String>)> = Vec::new();
    for (scope, view) in product.store_views() {
        let codes: Vec<String> = view
            .attributes()
            .filter(|(_, value)| value.is_empty_text())
            .map(|(code, _)| code.to_string())
            .collect();
        if !codes.is_empty() {
            empties.push((scope.to_string(), codes));
        }
    }
    for (scope, codes) in empties {
        let view = product.store_view(&scope);
        for code in &codes {
            match strategy {
                EmptyValueStrategy::Ignore => view.drop_attribute(code),
                EmptyValueStrategy::Remove => view.remove_attribute(code),
            }
        }
    }
}

/// Indexes of records cleared for commit.
fn ready_indexes(batch: &[Product]) -> Vec<usize> {
    batch
        .iter()
        .enumerate()
        .filter(|(_, p)| p.state() == RecordState::Validated)
        .map(|(i, _)| i)
        .collect()
}

/// Flatten the main product rows of the ready records into a
/// column-oriented value buffer matching [`MAIN_COLUMNS`].
fn main_row_values(batch: &[Product], ready: &[usize], now: &str) -> Vec<Value> {
    let mut values = Vec::with_capacity(ready.len() * MAIN_COLUMNS.len());
    for &i in ready {
        let product = &batch[i];
        let has_options = product.product_type().has_options()
            || product
                .custom_options()
                .values()
                .is_some_and(|options| !options.is_empty());
        values.push(Value::from(product.sku()));
        values.push(Value::from(product.product_type().as_str()));
        values.push(Value::from(product.attribute_set().id()));
        values.push(Value::from(has_options));
        values.push(Value::from(now));
        values.push(Value::from(now));
    }
    values
}

fn id_value(product: &Product) -> Value {
    // Ready records carry an id after the back-fill step.
    Value::from(product.id())
}

fn is_taken(
    taken: &HashMap<String, String>,
    assigned: &HashSet<(String, String)>,
    scope: &str,
    key: &str,
    sku: &str,
) -> bool {
    assigned.contains(&(scope.to_string(), key.to_string()))
        || taken.get(key).is_some_and(|owner| owner != sku)
}

#[cfg(test)]
mod tests {
    use super::*;
    use import_core::{ProductType, StoreView};

    fn staged(sku: &str) -> Product {
        Product::new(sku, ProductType::Simple)
    }

    #[test]
    fn duplicate_sku_in_batch_is_rejected() {
        let mut batch = vec![staged("a"), staged("a"), staged("b")];
        validate_batch(&mut batch, &ImportConfig::default());

        assert!(batch[0].is_ok());
        assert!(!batch[1].is_ok());
        assert!(batch[2].is_ok());
    }

    #[test]
    fn missing_sku_is_rejected() {
        let mut batch = vec![staged("   ")];
        validate_batch(&mut batch, &ImportConfig::default());
        assert!(!batch[0].is_ok());
    }

    #[test]
    fn rejected_record_never_reaches_the_flattened_batch() {
        let mut good = staged("good");
        good.global().set_name("A good product");
        let mut bad = staged("bad");
        bad.add_error("category not found: Nope");

        let mut batch = vec![good, bad];
        for product in batch.iter_mut() {
            if product.is_ok() {
                product.mark_validated();
            }
        }
        let ready = ready_indexes(&batch);
        assert_eq!(ready, vec![0]);

        let values = main_row_values(&batch, &ready, "2026-01-01 00:00:00");
        assert_eq!(values.len(), MAIN_COLUMNS.len());
        assert_eq!(values[0], Value::from("good"));

        // The rejected record still shows up in the reported results.
        let results: Vec<ImportResult> = batch.iter().map(ImportResult::of).collect();
        assert_eq!(results.len(), 2);
        assert!(!results[1].ok);
        assert_eq!(results[1].errors, vec!["category not found: Nope".to_string()]);
    }

    #[test]
    fn empty_text_strategy_ignore_drops_the_value() {
        let mut product = staged("a");
        product.global().set_name("Name");
        product.global().set_description("");

        apply_empty_text_strategy(&mut product, EmptyValueStrategy::Ignore);
        let global = product.global();
        assert!(global.attribute(attr::DESCRIPTION).is_none());
        assert!(global.removals().is_empty());
    }

    #[test]
    fn empty_text_strategy_remove_records_a_removal() {
        let mut product = staged("a");
        product.global().set_description("");

        apply_empty_text_strategy(&mut product, EmptyValueStrategy::Remove);
        let global = product.global();
        assert!(global.attribute(attr::DESCRIPTION).is_none());
        assert_eq!(global.removals(), &[attr::DESCRIPTION.to_string()]);
    }

    #[test]
    fn placeholder_alignment_of_main_rows() {
        let mut batch: Vec<Product> = (0..5)
            .map(|i| {
                let mut p = staged(&format!("sku-{i}"));
                p.global().set_name("n");
                p.mark_validated();
                p
            })
            .collect();
        batch[3] = staged("rejected");
        batch[3].add_error("boom");

        let ready = ready_indexes(&batch);
        let values = main_row_values(&batch, &ready, "2026-01-01 00:00:00");
        assert_eq!(values.len() % MAIN_COLUMNS.len(), 0);
        assert_eq!(values.len() / MAIN_COLUMNS.len(), 4);
    }

    #[test]
    fn url_key_conflicts_consider_the_owning_sku() {
        let mut taken = HashMap::new();
        taken.insert("blue-shirt".to_string(), "SKU-1".to_string());
        let assigned = HashSet::new();

        // Re-importing the owner of the key is not a conflict.
        assert!(!is_taken(&taken, &assigned, "global", "blue-shirt", "SKU-1"));
        // Another sku wanting the same key is.
        assert!(is_taken(&taken, &assigned, "global", "blue-shirt", "SKU-2"));
    }

    #[test]
    fn store_view_is_reusable_across_helpers() {
        // Guard: StoreView stays constructible stand-alone for tests and
        // callers that prepare bags before attaching them to a record.
        let mut view = StoreView::new();
        view.set_name("X");
        assert!(view.attribute(attr::NAME).is_some());
    }
}
