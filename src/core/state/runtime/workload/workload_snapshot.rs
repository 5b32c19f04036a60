use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a deployment: `(namespace, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkloadRef {
    pub namespace: String,
    pub name: String,
}

impl WorkloadRef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for WorkloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Opaque optimistic-concurrency token handed out by the API server.
///
/// Only ever compared for equality, never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceVersion(String);

impl ResourceVersion {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl fmt::Display for ResourceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last observed state of one deployment as held by the cache.
///
/// `observed_replicas` is the status replica count reported by the cluster,
/// which may lag behind the most recently requested spec for a while.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSnapshot {
    pub workload_ref: WorkloadRef,
    pub observed_replicas: i32,
    pub resource_version: Option<ResourceVersion>,
}

impl WorkloadSnapshot {
    pub fn new(
        workload_ref: WorkloadRef,
        observed_replicas: i32,
        resource_version: Option<ResourceVersion>,
    ) -> Self {
        Self {
            workload_ref,
            observed_replicas: observed_replicas.max(0),
            resource_version,
        }
    }
}
