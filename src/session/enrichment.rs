//! Best-effort enrichment of the provider user before normalization
//!
//! When the field mapping references top-level provider fields the
//! registration/login response did not include, the current user is fetched
//! once with those relations populated and shallow-merged in. Any failure
//! leaves the record untouched; callers never see an error from here.

use log::{debug, warn};

use crate::models::ProviderUser;
use crate::session::field_map::FieldMap;
use crate::strapi::StrapiClient;

/// Enrich `provider_user` in place for the given mapping
///
/// Issues no request when every mapped source is already present.
pub async fn enrich_provider_user(
    client: &StrapiClient,
    field_map: &FieldMap,
    provider_jwt: &str,
    provider_user: ProviderUser,
) -> ProviderUser {
    let populate = field_map.missing_sources(&provider_user);
    if populate.is_empty() {
        debug!("All mapped user fields present, skipping enrichment");
        return provider_user;
    }

    match client.fetch_current_user(provider_jwt, &populate).await {
        Ok(fetched) => merge_shallow(provider_user, fetched),
        Err(e) => {
            warn!("User enrichment skipped: {e}");
            provider_user
        }
    }
}

/// Shallow merge: keys of `update` overwrite or extend `base`
fn merge_shallow(mut base: ProviderUser, update: ProviderUser) -> ProviderUser {
    for (key, value) in update {
        base.insert(key, value);
    }
    base
}
