// Shareable respondent access to an instance. The token leaves the
// server exactly once, at mint time; only its sha256 digest is stored.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::error::{AppError, Result};
use crate::domain::questionnaire::{QuestionnaireInstance, ShareLink};
use crate::infrastructure::db::instances::InstanceRepository;
use crate::infrastructure::db::share_links::ShareLinkRepository;

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub struct ShareLinkService {
    links: ShareLinkRepository,
    instances: InstanceRepository,
}

impl ShareLinkService {
    pub fn new(links: ShareLinkRepository, instances: InstanceRepository) -> Self {
        Self { links, instances }
    }

    /// Mint a link for an instance the caller owns. Returns the
    /// one-time token alongside the stored record.
    pub async fn mint(&self, instance_id: i64, caller_id: &str) -> Result<(String, ShareLink)> {
        let instance = self.instances.get_instance(instance_id).await?;
        if instance.owner_id != caller_id {
            return Err(AppError::Unauthorized(
                "Only the owner can create share links".to_string(),
            ));
        }

        let token = Uuid::new_v4().to_string();
        let link = self.links.create(instance_id, &hash_token(&token)).await?;
        Ok((token, link))
    }

    /// Resolve a presented token to its instance. Unknown and revoked
    /// tokens are indistinguishable to the caller.
    pub async fn resolve(&self, token: &str) -> Result<QuestionnaireInstance> {
        let link = self.links.find_active_by_hash(&hash_token(token)).await?;
        self.instances.get_instance(link.instance_id).await
    }

    pub async fn revoke(&self, link_id: i64, caller_id: &str) -> Result<()> {
        let link = self.links.get(link_id).await?;
        let instance = self.instances.get_instance(link.instance_id).await?;
        if instance.owner_id != caller_id {
            return Err(AppError::Unauthorized(
                "Only the owner can revoke share links".to_string(),
            ));
        }
        self.links.revoke(link_id).await
    }
}
