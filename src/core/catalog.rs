//! Module lookup under a module root.
//!
//! The catalog answers "what does module X need?" for the emitters. A
//! module's `juce_module_info` is the source of truth; the built-in tables
//! are consulted only when a module has no descriptor, and the answer says
//! which of the two it came from.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::core::module_info::{
    descriptor_path, package_name, DescriptorError, ModuleDescriptor,
};
use crate::core::platform::Platform;
use crate::core::tables;
use crate::util::diagnostic::suggestions;
use crate::util::fs::{glob_files, list_dirs};

/// Where a module's requirements were read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementSource {
    Descriptor,
    Table,
}

impl fmt::Display for RequirementSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequirementSource::Descriptor => write!(f, "descriptor"),
            RequirementSource::Table => write!(f, "built-in table"),
        }
    }
}

/// Everything the emitters need to know about one module.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleRequirements {
    pub id: String,
    pub version: Option<String>,
    pub source: RequirementSource,
    /// Sibling module identifiers.
    pub dependencies: Vec<String>,
    /// Framework tokens (mac only).
    pub frameworks: Vec<String>,
    /// Linker flags (linux only).
    pub link_flags: Vec<String>,
}

impl ModuleRequirements {
    fn from_descriptor(desc: &ModuleDescriptor, platform: &Platform) -> Self {
        ModuleRequirements {
            id: desc.id.clone(),
            version: Some(desc.version.clone()).filter(|v| !v.is_empty()),
            source: RequirementSource::Descriptor,
            dependencies: desc.dependency_ids().into_iter().map(str::to_string).collect(),
            frameworks: desc.osx_frameworks(platform),
            link_flags: desc.link_flags(platform),
        }
    }

    fn from_tables(id: &str, platform: &Platform) -> Self {
        let frameworks = if platform.is_mac() {
            tables::frameworks_of(id).iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };
        let link_flags = if platform.is_linux() {
            tables::linux_libs_of(id)
                .iter()
                .map(|lib| format!("-l{}", lib))
                .collect()
        } else {
            Vec::new()
        };

        ModuleRequirements {
            id: id.to_string(),
            version: None,
            source: RequirementSource::Table,
            dependencies: tables::dependencies_of(id)
                .iter()
                .map(|s| s.to_string())
                .collect(),
            frameworks,
            link_flags,
        }
    }

    /// Use tokens for a per-module shared library: dependency packages
    /// followed by frameworks.
    pub fn use_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        let deps = self.dependencies.iter().map(|d| package_name(d));
        for token in deps.chain(self.frameworks.iter().cloned()) {
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
        tokens
    }
}

/// Module lookup for one module root and platform.
#[derive(Debug, Clone)]
pub struct ModuleCatalog {
    root: PathBuf,
    platform: Platform,
}

impl ModuleCatalog {
    pub fn new(root: impl Into<PathBuf>, platform: Platform) -> Self {
        ModuleCatalog {
            root: root.into(),
            platform,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Directory of a module.
    pub fn module_dir(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }

    /// The module's descriptor, if it has one.
    pub fn descriptor(&self, id: &str) -> Result<Option<ModuleDescriptor>, DescriptorError> {
        ModuleDescriptor::load(&self.root, id)
    }

    /// Requirements of a module: descriptor first, built-in table otherwise.
    pub fn requirements(&self, id: &str) -> Result<ModuleRequirements, DescriptorError> {
        match self.descriptor(id)? {
            Some(desc) => {
                let reqs = ModuleRequirements::from_descriptor(&desc, &self.platform);
                let table = tables::dependencies_of(id);
                if !table.is_empty() && !same_members(&reqs.dependencies, table) {
                    tracing::warn!(
                        "descriptor for {} lists dependencies {:?}, built-in table has {:?}; using the descriptor",
                        id,
                        reqs.dependencies,
                        table
                    );
                }
                Ok(reqs)
            }
            None => {
                tracing::debug!("{} has no descriptor, using built-in tables", id);
                Ok(ModuleRequirements::from_tables(id, &self.platform))
            }
        }
    }

    /// Modules present under the root.
    ///
    /// A directory counts as a module when it holds a descriptor or its unity
    /// source, so stray directories such as `.git` or `docs` are skipped.
    pub fn available_modules(&self) -> Result<Vec<String>> {
        let mut modules = Vec::new();
        for name in list_dirs(&self.root)? {
            if self.is_present(&name) {
                modules.push(name);
            } else {
                tracing::debug!("skipping {}: not a module directory", name);
            }
        }
        Ok(modules)
    }

    /// Whether `<root>/<id>` holds a descriptor or a unity source.
    pub fn is_present(&self, id: &str) -> bool {
        let dir = self.module_dir(id);
        descriptor_path(&dir, id).is_some()
            || ["cpp", "mm"]
                .iter()
                .any(|ext| dir.join(format!("{}.{}", id, ext)).is_file())
    }

    /// Version of the framework, read from `juce_core`'s descriptor.
    pub fn framework_version(&self) -> Result<Option<String>, DescriptorError> {
        if !self.root.is_dir() {
            return Ok(None);
        }
        Ok(self.descriptor("juce_core")?.map(|d| d.version))
    }

    /// The single translation unit of a module.
    ///
    /// Looks at `<root>/<id>/<id><ext>` first, then anywhere under the root.
    pub fn unity_source(&self, id: &str) -> Result<PathBuf> {
        let file_name = format!("{}{}", id, self.platform.unity_extension());
        let direct = self.module_dir(id).join(&file_name);
        if direct.is_file() {
            return Ok(direct);
        }

        let found = glob_files(&self.root, &format!("**/{}", file_name))?;
        match found.into_iter().next() {
            Some(path) => Ok(path),
            None => bail!(
                "no `{}` found under module path {}\n{}",
                file_name,
                self.root.display(),
                suggestions::NO_UNITY_SOURCE
            ),
        }
    }

    /// `ids` and everything they depend on, dependencies first.
    pub fn transitive_dependencies(&self, ids: &[&str]) -> Result<Vec<String>> {
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut nodes: HashMap<String, NodeIndex> = HashMap::new();
        let mut pending: Vec<String> = ids.iter().map(|s| s.to_string()).collect();

        while let Some(id) = pending.pop() {
            let node = node_for(&mut graph, &mut nodes, &id);
            let reqs = self.requirements(&id)?;
            for dep in reqs.dependencies {
                let known = nodes.contains_key(&dep);
                let dep_node = node_for(&mut graph, &mut nodes, &dep);
                graph.update_edge(dep_node, node, ());
                if !known {
                    pending.push(dep);
                }
            }
        }

        match toposort(&graph, None) {
            Ok(order) => Ok(order.into_iter().map(|n| graph[n].clone()).collect()),
            Err(cycle) => bail!(
                "dependency cycle involving module `{}`",
                graph[cycle.node_id()]
            ),
        }
    }
}

fn node_for(
    graph: &mut DiGraph<String, ()>,
    nodes: &mut HashMap<String, NodeIndex>,
    id: &str,
) -> NodeIndex {
    *nodes
        .entry(id.to_string())
        .or_insert_with(|| graph.add_node(id.to_string()))
}

fn same_members(a: &[String], b: &[&str]) -> bool {
    a.len() == b.len() && a.iter().all(|x| b.contains(&x.as_str()))
}
