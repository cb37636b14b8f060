//! Product image references.
//!
//! Only the reference is staged here (source path, label, roles); the
//! download/caching subsystem is a separate collaborator.

use serde::{Deserialize, Serialize};

/// Display role an image fills for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRole {
    Base,
    Small,
    Thumbnail,
    Swatch,
}

impl ImageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageRole::Base => "base",
            ImageRole::Small => "small",
            ImageRole::Thumbnail => "thumbnail",
            ImageRole::Swatch => "swatch",
        }
    }
}

impl TryFrom<&str> for ImageRole {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "base" => Ok(ImageRole::Base),
            "small" => Ok(ImageRole::Small),
            "thumbnail" => Ok(ImageRole::Thumbnail),
            "swatch" => Ok(ImageRole::Swatch),
            other => Err(format!("unknown image role: {other}")),
        }
    }
}

/// One staged image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    source_path: String,
    label: Option<String>,
    roles: Vec<ImageRole>,
}

impl Image {
    pub fn new(source_path: &str) -> Self {
        Image {
            source_path: source_path.trim().to_string(),
            label: None,
            roles: Vec::new(),
        }
    }

    pub fn set_label(&mut self, label: &str) -> &mut Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn add_role(&mut self, role: ImageRole) -> &mut Self {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
        self
    }

    pub fn source_path(&self) -> &str {
        &self.source_path
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn roles(&self) -> &[ImageRole] {
        &self.roles
    }
}
