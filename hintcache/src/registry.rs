// Copyright 2025 hintcache Project Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{fmt::Debug, sync::Arc};

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::group::Group;

/// Name to [`Group`] registry shared by the groups of a process and the peer server.
///
/// Cloning a registry gives another handle of the same registry.
#[derive(Clone, Default)]
pub struct Registry {
    groups: Arc<RwLock<HashMap<String, Arc<Group>>>>,
}

impl Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("groups", &self.names()).finish()
    }
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `group` under its name, returning the group it replaces.
    pub fn register(&self, group: Arc<Group>) -> Option<Arc<Group>> {
        let name = group.name().to_string();
        let old = self.groups.write().insert(name, group);
        if let Some(old) = old.as_ref() {
            tracing::warn!(group = old.name(), "[registry]: group replaced");
        }
        old
    }

    /// Look up the group named `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Sorted names of the registered groups.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.groups.read().keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }

    /// Count of registered groups.
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    /// Returns `true` if no group is registered.
    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupBuilder;

    fn echo(key: String) -> impl std::future::Future<Output = anyhow::Result<Vec<u8>>> {
        async move { Ok(key.into_bytes()) }
    }

    #[test_log::test(tokio::test)]
    async fn test_register_and_lookup() {
        let registry = Registry::new();
        assert!(registry.is_empty());

        GroupBuilder::new("b").with_loader(echo).build(&registry).unwrap();
        GroupBuilder::new("a").with_loader(echo).build(&registry).unwrap();

        assert_eq!(registry.names(), vec!["a", "b"]);
        assert_eq!(registry.len(), 2);
        let group = registry.get("a").unwrap();
        assert_eq!(group.get("key").await.unwrap().as_string(), "key");
        assert!(registry.get("c").is_none());
    }

    #[test_log::test(tokio::test)]
    async fn test_duplicate_name_replaces() {
        let registry = Registry::new();
        let first = GroupBuilder::new("g").with_loader(echo).build(&registry).unwrap();
        let second = GroupBuilder::new("g")
            .with_capacity(64)
            .with_loader(echo)
            .build(&registry)
            .unwrap();

        assert_eq!(registry.len(), 1);
        let current = registry.get("g").unwrap();
        assert!(Arc::ptr_eq(&current, &second));
        assert!(!Arc::ptr_eq(&current, &first));

        let replaced = registry.clone().register(first.clone()).unwrap();
        assert!(Arc::ptr_eq(&replaced, &second));
        assert!(Arc::ptr_eq(&registry.get("g").unwrap(), &first));
    }
}
