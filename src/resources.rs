//! rest resources
//!
//! concrete operations against the rest api, declared as plain data over
//! the [`Resource`] contract. identifiers interpolate positionally into
//! slash-joined paths.

use crate::config::ApiVersion;
use crate::error::{Error, Result};
use crate::models::{
    Agent, Annotation, Artifact, Build, NewBuild, NewPipeline, Organization, Pipeline, User,
};
use crate::resource::Resource;
use reqwest::Method;
use serde::Serialize;

const REST: ApiVersion = ApiVersion::Rest(2);

fn encode<T: Serialize>(body: &T) -> Result<Option<Vec<u8>>> {
    serde_json::to_vec(body).map(Some).map_err(Error::Encode)
}

/// fetch the user who owns the token
#[derive(Debug, Clone, Default)]
pub struct GetUser;

impl Resource for GetUser {
    type Content = User;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        "user".to_string()
    }
}

/// list organizations visible to the token
#[derive(Debug, Clone, Default)]
pub struct ListOrganizations;

impl Resource for ListOrganizations {
    type Content = Vec<Organization>;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        "organizations".to_string()
    }

    fn paginated(&self) -> bool {
        true
    }
}

/// fetch one organization by slug
#[derive(Debug, Clone)]
pub struct GetOrganization {
    pub org: String,
}

impl Resource for GetOrganization {
    type Content = Organization;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!("organizations/{}", self.org)
    }
}

/// list pipelines in an organization
#[derive(Debug, Clone)]
pub struct ListPipelines {
    pub org: String,
}

impl Resource for ListPipelines {
    type Content = Vec<Pipeline>;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!("organizations/{}/pipelines", self.org)
    }

    fn paginated(&self) -> bool {
        true
    }
}

/// fetch one pipeline by slug
#[derive(Debug, Clone)]
pub struct GetPipeline {
    pub org: String,
    pub pipeline: String,
}

impl Resource for GetPipeline {
    type Content = Pipeline;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!("organizations/{}/pipelines/{}", self.org, self.pipeline)
    }
}

/// create a pipeline
#[derive(Debug, Clone)]
pub struct CreatePipeline {
    pub org: String,
    pub body: NewPipeline,
}

impl Resource for CreatePipeline {
    type Content = Pipeline;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!("organizations/{}/pipelines", self.org)
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn request_body(&self) -> Result<Option<Vec<u8>>> {
        encode(&self.body)
    }
}

/// delete a pipeline
#[derive(Debug, Clone)]
pub struct DeletePipeline {
    pub org: String,
    pub pipeline: String,
}

impl Resource for DeletePipeline {
    type Content = ();

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!("organizations/{}/pipelines/{}", self.org, self.pipeline)
    }

    fn method(&self) -> Method {
        Method::DELETE
    }

    fn decode_content(&self, _body: &[u8]) -> Result<Self::Content> {
        Ok(())
    }
}

/// list builds for a pipeline
#[derive(Debug, Clone)]
pub struct ListBuilds {
    pub org: String,
    pub pipeline: String,
}

impl Resource for ListBuilds {
    type Content = Vec<Build>;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!(
            "organizations/{}/pipelines/{}/builds",
            self.org, self.pipeline
        )
    }

    fn paginated(&self) -> bool {
        true
    }
}

/// list builds across a whole organization
#[derive(Debug, Clone)]
pub struct ListOrganizationBuilds {
    pub org: String,
}

impl Resource for ListOrganizationBuilds {
    type Content = Vec<Build>;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!("organizations/{}/builds", self.org)
    }

    fn paginated(&self) -> bool {
        true
    }
}

/// fetch one build by number
#[derive(Debug, Clone)]
pub struct GetBuild {
    pub org: String,
    pub pipeline: String,
    pub number: u64,
}

impl Resource for GetBuild {
    type Content = Build;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!(
            "organizations/{}/pipelines/{}/builds/{}",
            self.org, self.pipeline, self.number
        )
    }
}

/// trigger a new build
#[derive(Debug, Clone)]
pub struct CreateBuild {
    pub org: String,
    pub pipeline: String,
    pub body: NewBuild,
}

impl Resource for CreateBuild {
    type Content = Build;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!(
            "organizations/{}/pipelines/{}/builds",
            self.org, self.pipeline
        )
    }

    fn method(&self) -> Method {
        Method::POST
    }

    fn request_body(&self) -> Result<Option<Vec<u8>>> {
        encode(&self.body)
    }
}

/// cancel a running build
#[derive(Debug, Clone)]
pub struct CancelBuild {
    pub org: String,
    pub pipeline: String,
    pub number: u64,
}

impl Resource for CancelBuild {
    type Content = Build;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!(
            "organizations/{}/pipelines/{}/builds/{}/cancel",
            self.org, self.pipeline, self.number
        )
    }

    fn method(&self) -> Method {
        Method::PUT
    }
}

/// rebuild a finished build
#[derive(Debug, Clone)]
pub struct RebuildBuild {
    pub org: String,
    pub pipeline: String,
    pub number: u64,
}

impl Resource for RebuildBuild {
    type Content = Build;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!(
            "organizations/{}/pipelines/{}/builds/{}/rebuild",
            self.org, self.pipeline, self.number
        )
    }

    fn method(&self) -> Method {
        Method::PUT
    }
}

/// list agents in an organization
#[derive(Debug, Clone)]
pub struct ListAgents {
    pub org: String,
}

impl Resource for ListAgents {
    type Content = Vec<Agent>;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!("organizations/{}/agents", self.org)
    }

    fn paginated(&self) -> bool {
        true
    }
}

/// fetch one agent by id
#[derive(Debug, Clone)]
pub struct GetAgent {
    pub org: String,
    pub agent: String,
}

impl Resource for GetAgent {
    type Content = Agent;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!("organizations/{}/agents/{}", self.org, self.agent)
    }
}

/// ask an agent to stop, optionally killing its current job
#[derive(Debug, Clone)]
pub struct StopAgent {
    pub org: String,
    pub agent: String,
    pub force: bool,
}

impl Resource for StopAgent {
    type Content = ();

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!("organizations/{}/agents/{}/stop", self.org, self.agent)
    }

    fn method(&self) -> Method {
        Method::PUT
    }

    fn request_body(&self) -> Result<Option<Vec<u8>>> {
        encode(&serde_json::json!({ "force": self.force }))
    }

    fn decode_content(&self, _body: &[u8]) -> Result<Self::Content> {
        Ok(())
    }
}

/// list artifacts uploaded by a build
#[derive(Debug, Clone)]
pub struct ListArtifacts {
    pub org: String,
    pub pipeline: String,
    pub number: u64,
}

impl Resource for ListArtifacts {
    type Content = Vec<Artifact>;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!(
            "organizations/{}/pipelines/{}/builds/{}/artifacts",
            self.org, self.pipeline, self.number
        )
    }

    fn paginated(&self) -> bool {
        true
    }
}

/// resolve an artifact's download location
///
/// the server answers 302 Found; the `Location` header carries the
/// short-lived url, which can then be fetched via [`crate::Follow`].
#[derive(Debug, Clone)]
pub struct DownloadArtifact {
    pub org: String,
    pub pipeline: String,
    pub number: u64,
    pub job: String,
    pub artifact: String,
}

impl Resource for DownloadArtifact {
    type Content = ();

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!(
            "organizations/{}/pipelines/{}/builds/{}/jobs/{}/artifacts/{}/download",
            self.org, self.pipeline, self.number, self.job, self.artifact
        )
    }

    fn decode_content(&self, _body: &[u8]) -> Result<Self::Content> {
        Ok(())
    }
}

/// list annotations created by a build
#[derive(Debug, Clone)]
pub struct ListAnnotations {
    pub org: String,
    pub pipeline: String,
    pub number: u64,
}

impl Resource for ListAnnotations {
    type Content = Vec<Annotation>;

    fn api_version(&self) -> ApiVersion {
        REST
    }

    fn path(&self) -> String {
        format!(
            "organizations/{}/pipelines/{}/builds/{}/annotations",
            self.org, self.pipeline, self.number
        )
    }

    fn paginated(&self) -> bool {
        true
    }
}
