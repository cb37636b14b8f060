//! Batched resolution of named entity references.
//!
//! Records arrive referencing attribute sets, websites and categories by
//! name, code or path. Before commit those names must become numeric
//! ids. Resolution runs once per flush: the names of a whole batch are
//! collected, looked up in single IN-list statements, cached for the
//! rest of the run, and written back onto each record. A name that
//! cannot be resolved becomes an error that rejects its record.

use anyhow::Result;
use import_core::{AttributeSetRef, CategoryRef, Product, WebsiteRef};
use mysql_bulk::{statement, BulkConnection, Value};
use std::collections::HashMap;
use tracing::debug;

use crate::config::ImportConfig;
use crate::schema;

/// Name-to-id resolution with per-run caches.
#[derive(Debug, Default)]
pub struct ReferenceResolver {
    attribute_sets: HashMap<String, u64>,
    websites: HashMap<String, u64>,
    /// Keyed by normalized category path.
    categories: HashMap<String, u64>,
}

impl ReferenceResolver {
    pub fn new() -> Self {
        ReferenceResolver::default()
    }

    /// Drain every deferred reference in the batch. Records whose names
    /// cannot be resolved get an error and drop out of the commit path;
    /// the rest carry ids afterwards.
    pub async fn resolve(
        &mut self,
        db: &mut BulkConnection,
        products: &mut [Product],
        config: &ImportConfig,
    ) -> Result<()> {
        self.resolve_attribute_sets(db, products).await?;
        self.resolve_websites(db, products, config).await?;
        self.resolve_categories(db, products, config).await?;
        Ok(())
    }

    async fn resolve_attribute_sets(
        &mut self,
        db: &mut BulkConnection,
        products: &mut [Product],
    ) -> Result<()> {
        let mut wanted: Vec<String> = Vec::new();
        for product in products.iter() {
            if let AttributeSetRef::Named(name) = product.attribute_set() {
                if !self.attribute_sets.contains_key(name) && !wanted.contains(name) {
                    wanted.push(name.clone());
                }
            }
        }
        if !wanted.is_empty() {
            let sql = format!(
                "SELECT `name`, `id` FROM `{}` WHERE `name` IN ({})",
                schema::ATTRIBUTE_SET,
                statement::marks(wanted.len())
            );
            let params = wanted.iter().map(|n| Value::from(n.as_str())).collect();
            let found: HashMap<String, u64> = db.fetch_map(&sql, params).await?;
            debug!(wanted = wanted.len(), found = found.len(), "attribute set lookup");
            self.attribute_sets.extend(found);
        }

        for product in products.iter_mut() {
            let name = match product.attribute_set() {
                AttributeSetRef::Named(name) => name.clone(),
                _ => continue,
            };
            match self.attribute_sets.get(&name) {
                Some(id) => product.resolve_attribute_set(*id),
                None => product.add_error(format!("attribute set not found: {name}")),
            }
        }
        Ok(())
    }

    async fn resolve_websites(
        &mut self,
        db: &mut BulkConnection,
        products: &mut [Product],
        config: &ImportConfig,
    ) -> Result<()> {
        let mut wanted: Vec<String> = Vec::new();
        for product in products.iter() {
            let codes = match product.websites() {
                WebsiteRef::Codes(codes) => codes.as_slice(),
                WebsiteRef::Unset => match &config.default_website_code {
                    Some(code) => std::slice::from_ref(code),
                    None => continue,
                },
                WebsiteRef::Ids(_) => continue,
            };
            for code in codes {
                if !self.websites.contains_key(code) && !wanted.contains(code) {
                    wanted.push(code.clone());
                }
            }
        }
        if !wanted.is_empty() {
            let sql = format!(
                "SELECT `code`, `id` FROM `{}` WHERE `code` IN ({})",
                schema::WEBSITE,
                statement::marks(wanted.len())
            );
            let params = wanted.iter().map(|c| Value::from(c.as_str())).collect();
            let found: HashMap<String, u64> = db.fetch_map(&sql, params).await?;
            debug!(wanted = wanted.len(), found = found.len(), "website lookup");
            self.websites.extend(found);
        }

        for product in products.iter_mut() {
            let codes: Vec<String> = match product.websites() {
                WebsiteRef::Codes(codes) => codes.clone(),
                WebsiteRef::Unset => match &config.default_website_code {
                    Some(code) => vec![code.clone()],
                    None => continue,
                },
                WebsiteRef::Ids(_) => continue,
            };
            let mut ids = Vec::with_capacity(codes.len());
            let mut missing = false;
            for code in &codes {
                match self.websites.get(code) {
                    Some(id) => ids.push(*id),
                    None => {
                        product.add_error(format!("website not found: {code}"));
                        missing = true;
                    }
                }
            }
            if !missing {
                product.resolve_websites(ids);
            }
        }
        Ok(())
    }

    async fn resolve_categories(
        &mut self,
        db: &mut BulkConnection,
        products: &mut [Product],
        config: &ImportConfig,
    ) -> Result<()> {
        let separator = config.category_path_separator.as_str();

        let mut wanted: Vec<String> = Vec::new();
        for product in products.iter() {
            if let CategoryRef::Paths(paths) = product.categories() {
                for path in paths {
                    let path = normalize_path(path, separator);
                    if !self.categories.contains_key(&path) && !wanted.contains(&path) {
                        wanted.push(path);
                    }
                }
            }
        }
        if !wanted.is_empty() {
            let sql = format!(
                "SELECT `path`, `id` FROM `{}` WHERE `path` IN ({})",
                schema::CATEGORY,
                statement::marks(wanted.len())
            );
            let params = wanted.iter().map(|p| Value::from(p.as_str())).collect();
            let found: HashMap<String, u64> = db.fetch_map(&sql, params).await?;
            debug!(wanted = wanted.len(), found = found.len(), "category lookup");
            self.categories.extend(found);
        }

        if config.auto_create_categories {
            let missing: Vec<String> = wanted
                .iter()
                .filter(|p| !self.categories.contains_key(*p))
                .cloned()
                .collect();
            for path in missing {
                self.create_category_path(db, &path, separator).await?;
            }
        }

        for product in products.iter_mut() {
            let paths: Vec<String> = match product.categories() {
                CategoryRef::Paths(paths) => paths.clone(),
                _ => continue,
            };
            let mut ids = Vec::with_capacity(paths.len());
            let mut missing = false;
            for path in &paths {
                let path = normalize_path(path, separator);
                match self.categories.get(&path) {
                    Some(id) => ids.push(*id),
                    None => {
                        product.add_error(format!(
                            "category not found and auto-creation disabled: {path}"
                        ));
                        missing = true;
                    }
                }
            }
            if !missing {
                product.resolve_categories(ids);
            }
        }
        Ok(())
    }

    /// Create a category path including any missing ancestors, caching
    /// every created or re-read id.
    async fn create_category_path(
        &mut self,
        db: &mut BulkConnection,
        path: &str,
        separator: &str,
    ) -> Result<()> {
        let segments: Vec<&str> = path.split(separator).collect();
        for depth in 1..=segments.len() {
            let ancestor = segments[..depth].join(separator);
            if self.categories.contains_key(&ancestor) {
                continue;
            }
            let name = segments[depth - 1];
            // IGNORE keeps a concurrently created path from failing the run;
            // the id is re-read either way.
            db.insert_many_ignore(
                schema::CATEGORY,
                &["path", "name"],
                vec![Value::from(ancestor.as_str()), Value::from(name)],
            )
            .await?;
            let sql = format!("SELECT `id` FROM `{}` WHERE `path` = ?", schema::CATEGORY);
            let id: Option<u64> = db.fetch_scalar(&sql, vec![Value::from(ancestor.as_str())]).await?;
            match id {
                Some(id) => {
                    debug!(path = %ancestor, id, "category created");
                    self.categories.insert(ancestor, id);
                }
                None => anyhow::bail!("category `{ancestor}` missing after insert"),
            }
        }
        Ok(())
    }
}

/// Trim every segment of a category path and rejoin with the canonical
/// separator, so `" Books / Novels "` and `"Books/Novels"` address the
/// same category.
fn normalize_path(path: &str, separator: &str) -> String {
    path.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_normalization_trims_segments() {
        assert_eq!(normalize_path(" Books / Novels ", "/"), "Books/Novels");
        assert_eq!(normalize_path("Books//Novels", "/"), "Books/Novels");
        assert_eq!(normalize_path("Summer $ Winter", "$"), "Summer$Winter");
    }
}
