/// Kubernetes resource types used by the gateway
pub use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, DeploymentStatus};

pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
