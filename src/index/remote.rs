// cmt-deps: CMake Tools Dependency Manifest Processor
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP index.
//!
//! ```text
//! GET {base}/v1/recipes/{name}/{version}   200 -> Recipe (JSON)
//!                                          404 -> not found
//!                                          *   -> IndexError::Http
//! GET {base}/v1/search?q={pattern}         200 -> ["name/version", ...]
//! ```

use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use super::{IndexResult, PackageIndex, Recipe};
use crate::error::IndexError;
use crate::manifest::reference::Reference;

/// Index served over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteIndex {
    client: Client,
    base: Url,
    label: String,
}

impl RemoteIndex {
    /// Creates a remote index rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidUrl` for unparsable URLs and
    /// `IndexError::Request` if the HTTP client cannot be built.
    pub fn new(base: &str, timeout: Duration) -> IndexResult<Self> {
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{base}/")
        };
        let base = Url::parse(&normalized).map_err(|e| IndexError::InvalidUrl(format!("{base}: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(IndexError::InvalidUrl(format!(
                "{base}: only http and https are supported"
            )));
        }

        let client = Client::builder()
            .user_agent(format!("cmt-deps/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            label: format!("remote:{base}"),
            base,
        })
    }

    fn endpoint(&self, path: &str) -> IndexResult<Url> {
        self.base
            .join(path)
            .map_err(|e| IndexError::InvalidUrl(format!("{}{path}: {e}", self.base)))
    }

    async fn fetch_recipe(&self, reference: &Reference) -> IndexResult<Option<Recipe>> {
        let url = self.endpoint(&format!(
            "v1/recipes/{}/{}",
            reference.name(),
            reference.version()
        ))?;
        debug!(%url, "Fetching recipe");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IndexError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let recipe: Recipe = serde_json::from_str(&body).map_err(|e| IndexError::Decode {
            source_name: url.to_string(),
            message: e.to_string(),
        })?;
        if recipe.name != reference.name() || recipe.version != reference.version() {
            return Err(IndexError::Decode {
                source_name: url.to_string(),
                message: format!(
                    "expected {reference}, got {}/{}",
                    recipe.name, recipe.version
                ),
            });
        }
        recipe.validate().map_err(|e| IndexError::Decode {
            source_name: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(recipe))
    }

    async fn fetch_search(&self, pattern: &str) -> IndexResult<Vec<Reference>> {
        let endpoint = self.endpoint("v1/search")?;
        let url = Url::parse_with_params(endpoint.as_str(), &[("q", pattern)])
            .map_err(|e| IndexError::InvalidUrl(format!("{endpoint}: {e}")))?;
        debug!(%url, "Searching index");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(IndexError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let mut references: Vec<Reference> =
            serde_json::from_str(&body).map_err(|e| IndexError::Decode {
                source_name: url.to_string(),
                message: e.to_string(),
            })?;
        references.sort();
        Ok(references)
    }
}

impl PackageIndex for RemoteIndex {
    fn name(&self) -> &str {
        &self.label
    }

    fn lookup<'a>(&'a self, reference: &'a Reference) -> BoxFuture<'a, IndexResult<Option<Recipe>>> {
        Box::pin(self.fetch_recipe(reference))
    }

    fn search<'a>(&'a self, pattern: &'a str) -> BoxFuture<'a, IndexResult<Vec<Reference>>> {
        Box::pin(self.fetch_search(pattern))
    }
}
